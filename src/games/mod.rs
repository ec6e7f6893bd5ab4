//! Ready-made game modes.

pub mod duel;

pub use duel::{DuelContent, DuelMode};
