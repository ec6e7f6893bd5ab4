//! Zones and card movement.
//!
//! ## Key Types
//!
//! - `ZoneId` / `ZoneKind` / `ZoneOwner`: zone identity
//! - `Zone` / `ZoneManager`: storage and the card-to-zone map
//! - `MigrationTransaction`: the only mutation path, batched and atomic
//! - `MigrationEvent`: what handlers see after a commit
//!
//! Cards move, they are never copied or destroyed: the total card count of a
//! game instance is constant from setup to the end.

pub mod manager;
pub mod migration;

pub use manager::{Zone, ZoneId, ZoneKind, ZoneManager, ZoneOwner};
pub use migration::{CardMove, MigrationEvent, MigrationTransaction};
