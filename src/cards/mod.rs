//! Card system: identity and storage.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for a card within one game instance
//! - `Card`: Immutable card data (suit, rank, category, equip skill)
//! - `CardSpec`: Builder input for minting cards
//! - `CardStore`: Allocates IDs and owns all cards
//!
//! Residence is deliberately absent here: the zone manager owns the
//! card-to-zone mapping, keeping "each card is in exactly one zone" a
//! property of a single data structure instead of a cross-object invariant.

pub mod card;
pub mod store;

pub use card::{Card, CardId, CardSpec, Category, Color, EquipKind, Rank, Suit};
pub use store::CardStore;
