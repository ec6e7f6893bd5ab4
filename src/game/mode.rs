//! Game mode trait: what a concrete game contributes to the engine.
//!
//! A mode defines:
//! - Who plays (rosters of [`PlayerSpec`]s)
//! - The deck contents
//! - Optional setup (opening deals, starting tags)
//! - Turn-by-turn play selection via [`GameMode::next_play`]
//! - Win/loss evaluation at checkpoints

use crate::actions::{Action, TurnStage};
use crate::cards::CardStore;
use crate::core::{PlayerId, Result};
use crate::game::Game;
use crate::handlers::SkillId;

/// Points during a turn where the mode is asked whether the game is over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Checkpoint {
    /// A turn stage of the given player just finished.
    StageEnd(PlayerId, TurnStage),
    /// The given player's whole turn just finished.
    TurnEnd(PlayerId),
}

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Multiple winners (team games, shared victory).
    Winners(Vec<PlayerId>),
    /// Draw (no winner).
    Draw,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Winners(ps) => ps.contains(&player),
            GameResult::Draw => false,
        }
    }
}

/// Roster entry for one seat.
#[derive(Clone, Debug)]
pub struct PlayerSpec {
    /// Starting and maximum life.
    pub max_life: i32,
    /// Skills granted before the game begins.
    pub skills: Vec<SkillId>,
}

impl PlayerSpec {
    #[must_use]
    pub fn new(max_life: i32) -> Self {
        Self {
            max_life,
            skills: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_skills(mut self, skills: &[SkillId]) -> Self {
        self.skills.extend_from_slice(skills);
        self
    }
}

/// Game mode trait.
///
/// Modes implement this trait to define a concrete game on top of the
/// engine's turn and action machinery.
///
/// ## Implementation Notes
///
/// - `deck` runs once at build time; every card added starts in the shared
///   draw pile.
/// - `setup` runs after zones and players exist but before `GameBegin`
///   handlers fire. Opening deals go here.
/// - `next_play` is polled repeatedly during the action stage and must
///   eventually return `Ok(None)` or the stage never ends.
/// - `evaluate` must be cheap; it runs at every checkpoint.
pub trait GameMode: Send + Sync {
    /// Mode name for logs.
    fn name(&self) -> &'static str;

    /// The seats, in turn order.
    fn players(&self) -> Vec<PlayerSpec>;

    /// Populate the card store.
    fn deck(&self, cards: &mut CardStore);

    /// One-time setup before the game begins.
    fn setup(&self, _game: &mut Game) -> Result<()> {
        Ok(())
    }

    /// The next action the given player takes during their action stage,
    /// or `None` when the player is done.
    fn next_play(&self, _game: &mut Game, _player: PlayerId) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Check if the game is over.
    ///
    /// Returns `Some(result)` if the game has ended, `None` if it continues.
    fn evaluate(&self, _game: &Game, _at: Checkpoint) -> Option<GameResult> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_result_is_winner() {
        let result = GameResult::Winner(PlayerId::new(1));
        assert!(!result.is_winner(PlayerId::new(0)));
        assert!(result.is_winner(PlayerId::new(1)));

        let draw = GameResult::Draw;
        assert!(!draw.is_winner(PlayerId::new(0)));

        let team = GameResult::Winners(vec![PlayerId::new(0), PlayerId::new(2)]);
        assert!(team.is_winner(PlayerId::new(0)));
        assert!(!team.is_winner(PlayerId::new(1)));
        assert!(team.is_winner(PlayerId::new(2)));
    }
}
