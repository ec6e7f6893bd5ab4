//! Tunable engine parameters.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the drop stage computes a player's maximum hand size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandLimit {
    /// Hand size tracks the player's current life total (never below zero).
    CurrentLife,
    /// A flat cap independent of life.
    Fixed(usize),
}

impl HandLimit {
    /// The concrete card cap for a player with the given life total.
    #[must_use]
    pub fn cap(self, life: i32) -> usize {
        match self {
            HandLimit::CurrentLife => life.max(0) as usize,
            HandLimit::Fixed(cap) => cap,
        }
    }
}

/// Knobs the game mode or hosting shell can adjust before construction.
///
/// ```
/// use duelcore::core::GameOptions;
/// use std::time::Duration;
///
/// let opts = GameOptions::default()
///     .with_draw_per_turn(3)
///     .with_input_timeout(Duration::from_secs(10));
/// assert_eq!(opts.draw_per_turn, 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOptions {
    /// Cards drawn in the draw stage of each turn.
    pub draw_per_turn: usize,
    /// Hand size rule enforced by the drop stage.
    pub hand_limit: HandLimit,
    /// Timeout threaded through every input request. Enforcement is the
    /// broker's job; the engine only supplies the value and handles the
    /// unavailable outcome.
    pub input_timeout: Duration,
    /// Maximum action nesting before the pipeline refuses with
    /// `GameError::DepthLimit`.
    pub max_action_depth: usize,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            draw_per_turn: 2,
            hand_limit: HandLimit::CurrentLife,
            input_timeout: Duration::from_secs(30),
            max_action_depth: 64,
        }
    }
}

impl GameOptions {
    /// Set the cards drawn per draw stage.
    #[must_use]
    pub fn with_draw_per_turn(mut self, count: usize) -> Self {
        self.draw_per_turn = count;
        self
    }

    /// Set the hand size rule.
    #[must_use]
    pub fn with_hand_limit(mut self, rule: HandLimit) -> Self {
        self.hand_limit = rule;
        self
    }

    /// Set the input timeout.
    #[must_use]
    pub fn with_input_timeout(mut self, timeout: Duration) -> Self {
        self.input_timeout = timeout;
        self
    }

    /// Set the action nesting limit.
    #[must_use]
    pub fn with_max_action_depth(mut self, depth: usize) -> Self {
        self.max_action_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = GameOptions::default();
        assert_eq!(opts.draw_per_turn, 2);
        assert_eq!(opts.hand_limit, HandLimit::CurrentLife);
        assert_eq!(opts.max_action_depth, 64);
    }

    #[test]
    fn test_builder_chain() {
        let opts = GameOptions::default()
            .with_draw_per_turn(1)
            .with_max_action_depth(16);
        assert_eq!(opts.draw_per_turn, 1);
        assert_eq!(opts.max_action_depth, 16);
    }

    #[test]
    fn test_hand_limit_caps() {
        assert_eq!(HandLimit::CurrentLife.cap(3), 3);
        assert_eq!(HandLimit::CurrentLife.cap(-2), 0);
        assert_eq!(HandLimit::Fixed(7).cap(1), 7);
    }
}
