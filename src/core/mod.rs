//! Core engine types: players, RNG, errors, options.
//!
//! This module contains the fundamental building blocks that are
//! game-agnostic. Game content configures and extends the engine through the
//! registry and mode traits rather than modifying the core.

pub mod error;
pub mod options;
pub mod player;
pub mod rng;

pub use error::{check, CheckFailed, GameError, Result};
pub use options::{GameOptions, HandLimit};
pub use player::{Player, PlayerId, PlayerMap, PlayerZones};
pub use rng::{GameRng, GameRngState};
