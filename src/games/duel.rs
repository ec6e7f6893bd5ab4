//! A small free-for-all duel, exercising most of the engine.
//!
//! Each player draws, strikes once per turn, mends when hurt, and wears
//! whatever equipment comes up. Two equipment skills show the handler seams:
//!
//! - **Keen Edge** (weapon): before-phase mutation, +1 to the wearer's
//!   damage.
//! - **Aegis** (shield): before-phase reaction, fatetells on incoming
//!   damage and cancels it on a red tell.
//!
//! Strikes and mends are custom actions, so the demo covers registration,
//! validity predicates, and effects that nest further actions.

use std::sync::Arc;

use crate::actions::{Action, ActionKind};
use crate::cards::{Card, CardId, CardSpec, CardStore, Category, Color, EquipKind, Rank, Suit};
use crate::core::{check, CheckFailed, PlayerId, Result};
use crate::game::{Checkpoint, Game, GameMode, GameResult, PlayerSpec};
use crate::handlers::{
    ActionPhase, ContentRegistry, CustomActionId, EventHandler, EventKind, HandlerRef,
    OrderingDecl, Ruling, SkillCategory, SkillId,
};

/// IDs minted by [`DuelMode::content`]; the mode and its handlers share
/// them.
#[derive(Clone, Copy, Debug)]
pub struct DuelContent {
    pub aegis: SkillId,
    pub keen_edge: SkillId,
    pub strike: CustomActionId,
    pub mend: CustomActionId,
}

/// The duel mode. Build the paired registry with [`DuelMode::content`]:
///
/// ```
/// use std::sync::Arc;
/// use duelcore::game::Game;
/// use duelcore::games::DuelMode;
///
/// let (registry, content) = DuelMode::content();
/// let game = Game::builder(Arc::new(DuelMode::new(2, content)))
///     .with_registry(registry)
///     .with_seed(7)
///     .build()
///     .unwrap();
/// assert_eq!(game.players().player_count(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct DuelMode {
    seats: usize,
    max_life: i32,
    opening_hand: usize,
    turn_limit: u32,
    content: DuelContent,
}

impl DuelMode {
    /// A duel for `seats` players with default life, opening hand, and turn
    /// limit.
    #[must_use]
    pub fn new(seats: usize, content: DuelContent) -> Self {
        assert!((2..=8).contains(&seats), "duel supports 2-8 players");
        Self {
            seats,
            max_life: 4,
            opening_hand: 4,
            turn_limit: 200,
            content,
        }
    }

    /// Cards dealt to each player before the game begins.
    #[must_use]
    pub fn with_opening_hand(mut self, cards: usize) -> Self {
        self.opening_hand = cards;
        self
    }

    /// Turn count at which an unfinished duel is declared a draw.
    #[must_use]
    pub fn with_turn_limit(mut self, turns: u32) -> Self {
        self.turn_limit = turns;
        self
    }

    /// Register the duel's skills, handlers, and custom actions.
    #[must_use]
    pub fn content() -> (ContentRegistry, DuelContent) {
        let mut registry = ContentRegistry::new();

        let aegis = registry.register_skill(
            "Aegis",
            &[SkillCategory::Equipment, SkillCategory::Passive],
        );
        let keen_edge = registry.register_skill(
            "Keen Edge",
            &[SkillCategory::Equipment, SkillCategory::Passive],
        );
        let strike = registry.register_action("Strike", Some(strike_validate), strike_apply);
        let mend = registry.register_action("Mend", Some(mend_validate), mend_apply);

        registry.register_handler(Arc::new(KeenEdge { skill: keen_edge }));
        registry.register_handler(Arc::new(AegisWard { skill: aegis }));

        let content = DuelContent {
            aegis,
            keen_edge,
            strike,
            mend,
        };
        (registry, content)
    }

    /// The next living opponent after `player` in seat order.
    fn next_opponent(&self, game: &Game, player: PlayerId) -> Option<PlayerId> {
        let count = game.players().player_count() as u8;
        (1..count)
            .map(|step| PlayerId::new((player.0 + step) % count))
            .find(|&p| game.player(p).is_alive())
    }

    fn find_in_hand(game: &Game, player: PlayerId, pred: impl Fn(&Card) -> bool) -> Option<CardId> {
        let hand = game.player(player).zones().hand;
        game.zones()
            .cards(hand)
            .iter()
            .copied()
            .find(|&card| pred(game.cards().get(card)))
    }
}

impl GameMode for DuelMode {
    fn name(&self) -> &'static str {
        "duel"
    }

    fn players(&self) -> Vec<PlayerSpec> {
        (0..self.seats)
            .map(|_| PlayerSpec::new(self.max_life))
            .collect()
    }

    fn deck(&self, cards: &mut CardStore) {
        let suits = [Suit::Spade, Suit::Heart, Suit::Club, Suit::Diamond];

        for &suit in &suits {
            for rank in 1..=9 {
                cards.add(CardSpec::new("Strike", suit, Rank::new(rank), Category::Basic));
            }
        }

        for (suit, rank) in [
            (Suit::Heart, 2),
            (Suit::Heart, 6),
            (Suit::Heart, 9),
            (Suit::Diamond, 4),
            (Suit::Diamond, 8),
            (Suit::Diamond, 12),
        ] {
            cards.add(CardSpec::new("Mend", suit, Rank::new(rank), Category::Spell));
        }

        // One shield and one blade per seat, so equipment keeps circulating.
        for _ in 0..self.seats {
            cards.add(
                CardSpec::new(
                    "Aegis Shield",
                    Suit::Club,
                    Rank::new(2),
                    Category::Equipment(EquipKind::Shield),
                )
                .with_equip_skill(self.content.aegis),
            );
            cards.add(
                CardSpec::new(
                    "Keen Blade",
                    Suit::Spade,
                    Rank::new(5),
                    Category::Equipment(EquipKind::Weapon),
                )
                .with_equip_skill(self.content.keen_edge),
            );
        }
    }

    fn setup(&self, game: &mut Game) -> Result<()> {
        let draw_pile = game.shared_zones().draw_pile;
        let players: Vec<PlayerId> = game.players().player_ids().collect();
        for player in players {
            let hand = game.player(player).zones().hand;
            let cards = game.zones().top_cards(draw_pile, self.opening_hand);
            game.migrate_cards(&cards, hand)?;
        }
        Ok(())
    }

    fn next_play(&self, game: &mut Game, player: PlayerId) -> Result<Option<Action>> {
        // Wear equipment as soon as it turns up.
        if let Some(card) = Self::find_in_hand(game, player, |c| c.equip_kind().is_some()) {
            return Ok(Some(Action::equip(player, card)));
        }

        // Mend when hurt.
        if game.player(player).life < game.player(player).max_life {
            if let Some(card) =
                Self::find_in_hand(game, player, |c| matches!(c.category, Category::Spell))
            {
                return Ok(Some(
                    Action::custom(self.content.mend)
                        .with_source(player)
                        .with_target(player)
                        .with_cards(&[card]),
                ));
            }
        }

        // One strike per turn at the next living opponent.
        let seat = game.player(player);
        if seat.tag("struck") < seat.tag("turn_count") {
            if let (Some(card), Some(target)) = (
                Self::find_in_hand(game, player, |c| matches!(c.category, Category::Basic)),
                self.next_opponent(game, player),
            ) {
                return Ok(Some(
                    Action::custom(self.content.strike)
                        .with_source(player)
                        .with_target(target)
                        .with_cards(&[card]),
                ));
            }
        }

        Ok(None)
    }

    fn evaluate(&self, game: &Game, _at: Checkpoint) -> Option<GameResult> {
        let alive = game.alive_players();
        match alive.len() {
            0 => Some(GameResult::Draw),
            1 => Some(GameResult::Winner(alive[0])),
            _ if game.turn_number() >= self.turn_limit => Some(GameResult::Draw),
            _ => None,
        }
    }
}

fn red_tell(card: &Card) -> bool {
    card.suit.color() == Color::Red
}

fn strike_validate(game: &Game, action: &Action) -> bool {
    let run = || -> std::result::Result<(), CheckFailed> {
        let source = action.source.ok_or(CheckFailed)?;
        let target = action.target().ok_or(CheckFailed)?;
        check(source != target)?;
        check(game.player(target).is_alive())?;
        check(action.cards.len() == 1)?;
        let hand = game.player(source).zones().hand;
        check(game.zones().is_in_zone(action.cards[0], hand))?;
        Ok(())
    };
    run().is_ok()
}

fn strike_apply(game: &mut Game, action: &mut Action) -> Result<bool> {
    let Some(source) = action.source else {
        return Ok(false);
    };
    let Some(target) = action.target() else {
        return Ok(false);
    };

    let cards: Vec<CardId> = action.cards.to_vec();
    let dropped = game.shared_zones().dropped;
    game.migrate_cards(&cards, dropped)?;

    let turn = game.player(source).tag("turn_count");
    game.player_mut(source).set_tag("struck", turn);

    let hit = game.process_action(Action::damage(source, target, 1))?;
    Ok(hit.succeeded)
}

fn mend_validate(game: &Game, action: &Action) -> bool {
    let run = || -> std::result::Result<(), CheckFailed> {
        let source = action.source.ok_or(CheckFailed)?;
        let target = action.target().ok_or(CheckFailed)?;
        check(source == target)?;
        check(game.player(target).life < game.player(target).max_life)?;
        check(action.cards.len() == 1)?;
        let hand = game.player(source).zones().hand;
        check(game.zones().is_in_zone(action.cards[0], hand))?;
        check(matches!(
            game.cards().get(action.cards[0]).category,
            Category::Spell
        ))?;
        Ok(())
    };
    run().is_ok()
}

fn mend_apply(game: &mut Game, action: &mut Action) -> Result<bool> {
    let Some(target) = action.target() else {
        return Ok(false);
    };

    let cards: Vec<CardId> = action.cards.to_vec();
    let dropped = game.shared_zones().dropped;
    game.migrate_cards(&cards, dropped)?;

    let healed = game.process_action(Action::heal(target, target, 1))?;
    Ok(healed.succeeded)
}

/// Weapon skill: +1 to the wearer's damage, once per action lineage.
struct KeenEdge {
    skill: SkillId,
}

impl EventHandler for KeenEdge {
    fn name(&self) -> &'static str {
        "KeenEdge"
    }

    fn interests(&self) -> &'static [EventKind] {
        &[EventKind::ActionBefore]
    }

    fn ordering(&self) -> OrderingDecl {
        OrderingDecl::in_group("offense")
    }

    fn on_phase(&self, game: &mut Game, _phase: ActionPhase, action: &mut Action) -> Result<Ruling> {
        if !matches!(action.kind, ActionKind::Damage { .. }) {
            return Ok(Ruling::Continue);
        }
        let Some(source) = action.source else {
            return Ok(Ruling::Continue);
        };
        if !game.player(source).has_skill(self.skill) || !action.mark_once("keen_edge") {
            return Ok(Ruling::Continue);
        }

        if let ActionKind::Damage { amount } = &mut action.kind {
            *amount += 1;
            log::debug!("{source}'s keen blade raises the damage to {amount}");
        }
        Ok(Ruling::Continue)
    }
}

/// Shield skill: fatetell on incoming damage; a red tell wards it off.
struct AegisWard {
    skill: SkillId,
}

impl EventHandler for AegisWard {
    fn name(&self) -> &'static str {
        "AegisWard"
    }

    fn interests(&self) -> &'static [EventKind] {
        &[EventKind::ActionBefore]
    }

    fn ordering(&self) -> OrderingDecl {
        // React to the final numbers, after every offensive adjustment.
        OrderingDecl::in_group("defense").with_after(&[HandlerRef::Group("offense")])
    }

    fn on_phase(&self, game: &mut Game, _phase: ActionPhase, action: &mut Action) -> Result<Ruling> {
        if !matches!(action.kind, ActionKind::Damage { .. }) || action.cancelled {
            return Ok(Ruling::Continue);
        }
        let Some(target) = action.target() else {
            return Ok(Ruling::Continue);
        };
        if !game.player(target).has_skill(self.skill) || !action.mark_once("aegis") {
            return Ok(Ruling::Continue);
        }

        let tell = game.process_action(Action::fatetell(target, red_tell))?;
        if tell.succeeded {
            log::debug!("{target}'s aegis wards off the blow");
            action.cancelled = true;
        }
        Ok(Ruling::Continue)
    }
}
