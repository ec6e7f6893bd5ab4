//! Fatetell: reveal a card, let rules argue about it, classify it.
//!
//! A fatetell is an ordinary action; everything interesting happens in its
//! apply effect, which is composed out of the same primitives content uses:
//!
//! 1. the top card of the draw pile migrates into the target's fatetell
//!    zone (a normal migration, so `card_migration` handlers see it);
//! 2. the `fatetell` event opens the malleate window: handlers may swap the
//!    tell card via [`Fatetell::set_card`], moving their replacement through
//!    the zones themselves;
//! 3. the caller's criterion runs against whatever card ended up as the
//!    tell, producing the verdict;
//! 4. the tell card, if still sitting in a fatetell or disputed zone,
//!    settles onto the dropped pile.
//!
//! The action's `succeeded` flag carries the verdict, so
//! `game.process_action(Action::fatetell(p, crit))?.succeeded` reads as "did
//! the tell succeed".

use crate::cards::{Card, CardId};
use crate::core::Result;
use crate::game::Game;
use crate::handlers::ActionPhase;
use crate::zones::ZoneKind;

use super::Action;

/// Classifies the revealed card. Plain function pointer so fatetell actions
/// stay cheap to clone and free of hidden state.
pub type FatetellCriterion = fn(&Card) -> bool;

/// Payload of [`ActionKind::Fatetell`].
#[derive(Clone, Debug)]
pub struct Fatetell {
    /// Success predicate, supplied by whoever started the fatetell.
    pub criterion: FatetellCriterion,
    /// The current tell card. Set at reveal; malleate handlers may replace
    /// it.
    pub card: Option<CardId>,
    /// The verdict, once the criterion has run.
    pub verdict: Option<bool>,
}

impl Fatetell {
    /// A fatetell payload awaiting its reveal.
    #[must_use]
    pub fn new(criterion: FatetellCriterion) -> Self {
        Self {
            criterion,
            card: None,
            verdict: None,
        }
    }

    /// Whether the verdict is in and positive.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.verdict == Some(true)
    }

    /// Replace the tell card during the malleate window. The handler is
    /// responsible for having moved `card` somewhere sensible (typically the
    /// disputed zone) first.
    pub fn set_card(&mut self, card: CardId) {
        self.card = Some(card);
    }
}

/// The fatetell effect. Returns the verdict.
pub(crate) fn apply_fatetell(game: &mut Game, action: &mut Action) -> Result<bool> {
    let Some(target) = action.target() else {
        return Ok(false);
    };

    let draw_pile = game.shared_zones().draw_pile;
    if game.zones().zone(draw_pile).is_empty() {
        game.refill_draw_pile()?;
    }
    let Some(&revealed) = game.zones().cards(draw_pile).last() else {
        log::debug!("fatetell for {target} finds no card to reveal");
        return Ok(false);
    };

    let fatetell_zone = game.player(target).zones().fatetell;
    game.migrate_cards(&[revealed], fatetell_zone)?;
    if let Some(ft) = action.as_fatetell_mut() {
        ft.card = Some(revealed);
    }

    // Malleate window: handlers may swap the tell card.
    game.dispatch_observe(ActionPhase::Fatetell, action)?;

    let (tell, criterion) = match action.as_fatetell() {
        Some(ft) => match ft.card {
            Some(card) => (card, ft.criterion),
            None => return Ok(false),
        },
        None => return Ok(false),
    };

    let verdict = criterion(game.cards().get(tell));
    if let Some(ft) = action.as_fatetell_mut() {
        ft.verdict = Some(verdict);
    }
    log::debug!(
        "fatetell for {target} shows {tell}: {}",
        if verdict { "success" } else { "failure" }
    );

    // Settle the tell card unless a handler already claimed it.
    if let Some(at) = game.zones().zone_of(tell) {
        if matches!(
            game.zones().zone(at).kind,
            ZoneKind::Fatetell | ZoneKind::Disputed
        ) {
            let dropped = game.shared_zones().dropped;
            game.migrate_cards(&[tell], dropped)?;
        }
    }

    Ok(verdict)
}
