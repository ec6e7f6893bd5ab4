//! Batched, atomic card movement.
//!
//! A [`MigrationTransaction`] buffers moves as `(cards, from, to)` triples.
//! Nothing touches the zones until the game commits the transaction, at
//! which point every removal is validated against live state before the
//! first card moves. A commit produces exactly one `card_migration` event
//! carrying the full triple list, followed by exactly one
//! `post_card_migration` event, no matter how many triples it holds.
//!
//! The source zone of each triple is captured when the move is queued,
//! taking earlier queued moves into account, so a card can be routed through
//! several zones in one transaction and the triples still read coherently.

use rustc_hash::FxHashMap;

use crate::actions::Action;
use crate::cards::CardId;
use crate::core::{GameError, Result};

use super::manager::{ZoneId, ZoneManager};

/// One buffered move: these cards, from this zone, to that zone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardMove {
    pub cards: Vec<CardId>,
    pub from: ZoneId,
    pub to: ZoneId,
}

/// A batch of card moves committed as one atomic unit.
#[derive(Debug, Default)]
pub struct MigrationTransaction {
    moves: Vec<CardMove>,
    /// Where each queued card will be once earlier moves apply.
    pending: FxHashMap<CardId, ZoneId>,
}

impl MigrationTransaction {
    /// Open an empty transaction.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `cards` to move to `to`.
    ///
    /// The source zone is recorded now, per card, honoring moves already
    /// queued in this transaction. Panics on a card the game does not track;
    /// every card is seeded into a zone at setup, so an untracked ID belongs
    /// to another game instance.
    pub fn migrate(&mut self, zones: &ZoneManager, cards: &[CardId], to: ZoneId) {
        for &card in cards {
            let from = self
                .pending
                .get(&card)
                .copied()
                .or_else(|| zones.zone_of(card))
                .unwrap_or_else(|| panic!("{card} is not tracked by this game"));

            match self.moves.last_mut() {
                Some(m) if m.from == from && m.to == to => m.cards.push(card),
                _ => self.moves.push(CardMove {
                    cards: vec![card],
                    from,
                    to,
                }),
            }
            self.pending.insert(card, to);
        }
    }

    /// The buffered triples, in queue order.
    #[must_use]
    pub fn moves(&self) -> &[CardMove] {
        &self.moves
    }

    /// Whether nothing has been queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Check every removal against live zone state, walking the triples in
    /// order with an overlay so intra-transaction re-moves validate against
    /// where the card will actually be.
    pub(crate) fn validate(&self, zones: &ZoneManager) -> Result<()> {
        let mut overlay: FxHashMap<CardId, ZoneId> = FxHashMap::default();
        for m in &self.moves {
            for &card in &m.cards {
                let at = overlay
                    .get(&card)
                    .copied()
                    .or_else(|| zones.zone_of(card));
                if at != Some(m.from) {
                    return Err(GameError::NotInZone {
                        card,
                        zone: m.from,
                    });
                }
                overlay.insert(card, m.to);
            }
        }
        Ok(())
    }

    /// Apply all moves in queue order. Callers validate first; a failure
    /// here after a clean validation is unreachable.
    pub(crate) fn apply(&self, zones: &mut ZoneManager) -> Result<()> {
        for m in &self.moves {
            for &card in &m.cards {
                zones.remove_from(card, m.from)?;
                zones.append(card, m.to);
            }
        }
        Ok(())
    }

    /// Consume the transaction into its triples.
    pub(crate) fn into_moves(self) -> Vec<CardMove> {
        self.moves
    }
}

/// Payload of the `card_migration` and `post_card_migration` events: the
/// committed triples plus a snapshot of the action whose apply produced
/// them, so handlers can filter by context.
#[derive(Debug)]
pub struct MigrationEvent {
    pub moves: Vec<CardMove>,
    pub during: Option<Action>,
}

impl MigrationEvent {
    /// Iterate over every (card, from, to) in the batch.
    pub fn card_moves(&self) -> impl Iterator<Item = (CardId, ZoneId, ZoneId)> + '_ {
        self.moves
            .iter()
            .flat_map(|m| m.cards.iter().map(move |&c| (c, m.from, m.to)))
    }
}
