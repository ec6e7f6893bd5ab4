//! Zone storage and card location tracking.
//!
//! The `ZoneManager` owns every zone in a game instance and the single
//! card-to-zone map that makes "each card is in exactly one zone" a property
//! of one data structure. Zones keep their cards in insertion order; the top
//! of a pile is the end of the list.
//!
//! Mutation is crate-private on purpose: the only way content moves a card
//! is through a migration transaction, which batches, validates, and reports
//! the moves as events.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::{GameError, GameRng, PlayerId, Result};

/// Zone identifier, unique within one game instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZoneId(pub u16);

impl ZoneId {
    /// Create a new zone ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Zone#{}", self.0)
    }
}

/// What a zone is for. The engine attaches behavior to a few of these
/// (equipment skill transfer, fatetell settling); the rest is convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneKind {
    /// A player's private hand.
    Hand,
    /// Cards shown face-up but still held by a player.
    Shown,
    /// Equipment a player is wearing.
    Equips,
    /// Delayed-effect cards waiting on a fatetell.
    Fatetell,
    /// The shared face-down pile cards are drawn and revealed from.
    DrawPile,
    /// The shared face-up discard pile.
    Dropped,
    /// Shared staging area for cards under contention mid-resolution.
    Disputed,
    /// Content-created zones with game-specific meaning.
    Special,
}

/// Who a zone belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneOwner {
    Player(PlayerId),
    Shared,
}

impl ZoneOwner {
    /// The owning player, if any.
    #[must_use]
    pub fn player(self) -> Option<PlayerId> {
        match self {
            ZoneOwner::Player(p) => Some(p),
            ZoneOwner::Shared => None,
        }
    }
}

/// One zone: kind, owner, debug label, and its cards in insertion order.
#[derive(Clone, Debug)]
pub struct Zone {
    id: ZoneId,
    pub kind: ZoneKind,
    pub owner: ZoneOwner,
    /// Label for logs, e.g. `p0.hand` or `draw_pile`.
    pub label: String,
    cards: Vec<CardId>,
}

impl Zone {
    /// This zone's ID.
    #[must_use]
    pub fn id(&self) -> ZoneId {
        self.id
    }

    /// Cards in insertion order; the last element is the top.
    #[must_use]
    pub fn cards(&self) -> &[CardId] {
        &self.cards
    }

    /// Number of cards in the zone.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the zone is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Whether `card` is in this zone.
    #[must_use]
    pub fn contains(&self, card: CardId) -> bool {
        self.cards.contains(&card)
    }
}

/// Owns all zones and tracks where every card is.
#[derive(Clone, Debug, Default)]
pub struct ZoneManager {
    zones: Vec<Zone>,
    /// Card locations: card -> zone. The authoritative residence map.
    locations: FxHashMap<CardId, ZoneId>,
}

impl ZoneManager {
    /// Create a new empty zone manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a zone. IDs are handed out sequentially.
    pub fn create_zone(
        &mut self,
        kind: ZoneKind,
        owner: ZoneOwner,
        label: impl Into<String>,
    ) -> ZoneId {
        let id = ZoneId::new(self.zones.len() as u16);
        self.zones.push(Zone {
            id,
            kind,
            owner,
            label: label.into(),
            cards: Vec::new(),
        });
        id
    }

    /// Look up a zone. Panics on an ID from another game instance.
    #[must_use]
    pub fn zone(&self, id: ZoneId) -> &Zone {
        &self.zones[id.raw() as usize]
    }

    /// Cards in a zone, bottom to top.
    #[must_use]
    pub fn cards(&self, zone: ZoneId) -> &[CardId] {
        self.zone(zone).cards()
    }

    /// The zone a card currently resides in.
    #[must_use]
    pub fn zone_of(&self, card: CardId) -> Option<ZoneId> {
        self.locations.get(&card).copied()
    }

    /// Whether `card` is in `zone`.
    #[must_use]
    pub fn is_in_zone(&self, card: CardId, zone: ZoneId) -> bool {
        self.locations.get(&card) == Some(&zone)
    }

    /// Whether the manager tracks `card` at all.
    #[must_use]
    pub fn contains(&self, card: CardId) -> bool {
        self.locations.contains_key(&card)
    }

    /// The top `n` cards of a zone (at most), topmost last.
    #[must_use]
    pub fn top_cards(&self, zone: ZoneId, n: usize) -> Vec<CardId> {
        let cards = self.cards(zone);
        let start = cards.len().saturating_sub(n);
        cards[start..].to_vec()
    }

    /// Iterate over all zones in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter()
    }

    /// Number of zones.
    #[must_use]
    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// Total number of cards tracked. Constant for the life of a game.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.locations.len()
    }

    /// Place a card that is not yet tracked. Setup only; panics if the card
    /// is already somewhere.
    pub(crate) fn seed_card(&mut self, card: CardId, zone: ZoneId) {
        assert!(
            !self.locations.contains_key(&card),
            "{card} is already tracked; use a migration to move it"
        );
        self.locations.insert(card, zone);
        self.zones[zone.raw() as usize].cards.push(card);
    }

    /// Remove a card from a specific zone.
    ///
    /// Fails with [`GameError::NotInZone`] when the card is not there; the
    /// caller (the migration commit) treats that as fatal.
    pub(crate) fn remove_from(&mut self, card: CardId, zone: ZoneId) -> Result<()> {
        if !self.is_in_zone(card, zone) {
            return Err(GameError::NotInZone { card, zone });
        }
        self.locations.remove(&card);
        self.zones[zone.raw() as usize].cards.retain(|&c| c != card);
        Ok(())
    }

    /// Append a card to a zone. The card must have just been removed.
    pub(crate) fn append(&mut self, card: CardId, zone: ZoneId) {
        debug_assert!(!self.locations.contains_key(&card));
        self.locations.insert(card, zone);
        self.zones[zone.raw() as usize].cards.push(card);
    }

    /// Shuffle a zone in place.
    pub(crate) fn shuffle(&mut self, zone: ZoneId, rng: &mut GameRng) {
        rng.shuffle(&mut self.zones[zone.raw() as usize].cards);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager_with_zone() -> (ZoneManager, ZoneId) {
        let mut mgr = ZoneManager::new();
        let zone = mgr.create_zone(ZoneKind::Hand, ZoneOwner::Player(PlayerId::new(0)), "p0.hand");
        (mgr, zone)
    }

    #[test]
    fn test_create_and_lookup() {
        let (mgr, zone) = manager_with_zone();

        assert_eq!(mgr.zone(zone).kind, ZoneKind::Hand);
        assert_eq!(mgr.zone(zone).owner.player(), Some(PlayerId::new(0)));
        assert_eq!(mgr.zone(zone).label, "p0.hand");
        assert!(mgr.zone(zone).is_empty());
    }

    #[test]
    fn test_seed_and_insertion_order() {
        let (mut mgr, zone) = manager_with_zone();

        mgr.seed_card(CardId::new(5), zone);
        mgr.seed_card(CardId::new(3), zone);
        mgr.seed_card(CardId::new(9), zone);

        assert_eq!(
            mgr.cards(zone),
            &[CardId::new(5), CardId::new(3), CardId::new(9)]
        );
        assert_eq!(mgr.zone_of(CardId::new(3)), Some(zone));
        assert_eq!(mgr.total_cards(), 3);
    }

    #[test]
    #[should_panic(expected = "already tracked")]
    fn test_seed_twice_panics() {
        let (mut mgr, zone) = manager_with_zone();
        mgr.seed_card(CardId::new(1), zone);
        mgr.seed_card(CardId::new(1), zone);
    }

    #[test]
    fn test_remove_from_wrong_zone_fails() {
        let mut mgr = ZoneManager::new();
        let a = mgr.create_zone(ZoneKind::Hand, ZoneOwner::Shared, "a");
        let b = mgr.create_zone(ZoneKind::Dropped, ZoneOwner::Shared, "b");

        mgr.seed_card(CardId::new(1), a);

        let err = mgr.remove_from(CardId::new(1), b).unwrap_err();
        assert_eq!(
            err,
            GameError::NotInZone {
                card: CardId::new(1),
                zone: b
            }
        );
        // Nothing changed.
        assert!(mgr.is_in_zone(CardId::new(1), a));
    }

    #[test]
    fn test_remove_then_append_relocates() {
        let mut mgr = ZoneManager::new();
        let a = mgr.create_zone(ZoneKind::Hand, ZoneOwner::Shared, "a");
        let b = mgr.create_zone(ZoneKind::Dropped, ZoneOwner::Shared, "b");

        mgr.seed_card(CardId::new(1), a);
        mgr.remove_from(CardId::new(1), a).unwrap();
        mgr.append(CardId::new(1), b);

        assert!(mgr.cards(a).is_empty());
        assert_eq!(mgr.cards(b), &[CardId::new(1)]);
        assert_eq!(mgr.total_cards(), 1);
    }

    #[test]
    fn test_top_cards() {
        let (mut mgr, zone) = manager_with_zone();
        for i in 0..5 {
            mgr.seed_card(CardId::new(i), zone);
        }

        assert_eq!(
            mgr.top_cards(zone, 2),
            vec![CardId::new(3), CardId::new(4)]
        );
        assert_eq!(mgr.top_cards(zone, 99).len(), 5);
    }

    #[test]
    fn test_shuffle_preserves_membership() {
        let (mut mgr, zone) = manager_with_zone();
        for i in 0..20 {
            mgr.seed_card(CardId::new(i), zone);
        }

        let before = mgr.cards(zone).to_vec();
        let mut rng = GameRng::new(42);
        mgr.shuffle(zone, &mut rng);
        let after = mgr.cards(zone).to_vec();

        assert_ne!(before, after);
        let mut sorted = after.clone();
        sorted.sort();
        assert_eq!(sorted, before);
    }
}
