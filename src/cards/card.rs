//! Card identity.
//!
//! Cards are immutable once created: suit, rank, category and the optional
//! skill an equipment card grants while worn. Where a card *is* (its zone)
//! is tracked by the zone manager, not by the card, so cards can be passed
//! around as plain ids.

use serde::{Deserialize, Serialize};

use crate::handlers::SkillId;

/// Card identifier, unique within one game instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card#{}", self.0)
    }
}

/// French suits, as used by fatetell criteria.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Spade,
    Heart,
    Club,
    Diamond,
}

impl Suit {
    /// Suit color, the most common fatetell criterion.
    #[must_use]
    pub fn color(self) -> Color {
        match self {
            Suit::Spade | Suit::Club => Color::Black,
            Suit::Heart | Suit::Diamond => Color::Red,
        }
    }
}

/// Suit color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Black,
}

/// Card rank, 1 (ace) through 13 (king).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rank(u8);

impl Rank {
    /// Create a rank. Panics outside 1..=13.
    #[must_use]
    pub fn new(value: u8) -> Self {
        assert!((1..=13).contains(&value), "rank must be 1..=13, got {value}");
        Self(value)
    }

    /// Get the raw rank value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            1 => write!(f, "A"),
            11 => write!(f, "J"),
            12 => write!(f, "Q"),
            13 => write!(f, "K"),
            n => write!(f, "{n}"),
        }
    }
}

/// Equipment slot. Wearing a piece replaces the piece already occupying the
/// same slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipKind {
    Weapon,
    Shield,
    Accessory,
    GreenUfo,
    RedUfo,
}

/// Broad card family. The engine cares about the distinction only where slot
/// replacement and equipment skill transfer are involved; everything else is
/// content's business.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Basic,
    Spell,
    Equipment(EquipKind),
}

/// An immutable card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    id: CardId,
    /// Display name, for logs and tests.
    pub name: String,
    pub suit: Suit,
    pub rank: Rank,
    pub category: Category,
    /// Skill granted to the owner while this card sits in an equips zone.
    pub equip_skill: Option<SkillId>,
}

impl Card {
    pub(crate) fn new(id: CardId, spec: CardSpec) -> Self {
        Self {
            id,
            name: spec.name,
            suit: spec.suit,
            rank: spec.rank,
            category: spec.category,
            equip_skill: spec.equip_skill,
        }
    }

    /// This card's ID.
    #[must_use]
    pub fn id(&self) -> CardId {
        self.id
    }

    /// The equipment slot, if this is an equipment card.
    #[must_use]
    pub fn equip_kind(&self) -> Option<EquipKind> {
        match self.category {
            Category::Equipment(kind) => Some(kind),
            _ => None,
        }
    }
}

/// Everything needed to mint a card, minus the ID the store assigns.
#[derive(Clone, Debug)]
pub struct CardSpec {
    pub name: String,
    pub suit: Suit,
    pub rank: Rank,
    pub category: Category,
    pub equip_skill: Option<SkillId>,
}

impl CardSpec {
    /// A card with no equipment skill.
    #[must_use]
    pub fn new(name: impl Into<String>, suit: Suit, rank: Rank, category: Category) -> Self {
        Self {
            name: name.into(),
            suit,
            rank,
            category,
            equip_skill: None,
        }
    }

    /// Attach the skill the card grants while worn.
    #[must_use]
    pub fn with_equip_skill(mut self, skill: SkillId) -> Self {
        self.equip_skill = Some(skill);
        self
    }
}
