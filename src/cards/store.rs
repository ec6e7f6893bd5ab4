//! The per-game card store.
//!
//! Mints [`CardId`]s and owns every [`Card`] in the instance. The total card
//! population is fixed once the game starts; zones only shuffle references
//! around.

use serde::{Deserialize, Serialize};

use super::card::{Card, CardId, CardSpec};

/// Allocates and stores all cards for one game instance.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CardStore {
    cards: Vec<Card>,
}

impl CardStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a card from a spec, returning its ID.
    pub fn add(&mut self, spec: CardSpec) -> CardId {
        let id = CardId::new(self.cards.len() as u32);
        self.cards.push(Card::new(id, spec));
        id
    }

    /// Look up a card. Panics on an ID from another game instance.
    #[must_use]
    pub fn get(&self, id: CardId) -> &Card {
        &self.cards[id.raw() as usize]
    }

    /// Number of cards minted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether no cards have been minted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all cards in mint order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }
}
