//! Error types for the engine.
//!
//! Two failure families with very different handling:
//!
//! - [`CheckFailed`] is local control flow inside a validity predicate. It is
//!   converted to a plain `bool` at the action boundary and never crosses a
//!   handler boundary.
//! - [`GameError`] is structural: the game instance itself is broken. With
//!   the exception of [`GameError::OrderingCycle`] (a construction-time
//!   error), a structural failure during play marks the instance crashed and
//!   every further call returns [`GameError::Crashed`].
//!
//! Input timeouts and declined prompts are *neither*: they are ordinary
//! values ([`crate::input::InputOutcome::Unavailable`]) with defined
//! fallbacks at every asking site.

use thiserror::Error;

use crate::cards::CardId;
use crate::handlers::{CustomActionId, EventKind};
use crate::zones::ZoneId;

/// Convenient alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GameError>;

/// Structural failures that invalidate the game instance.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// A migration referenced a card that is not in the zone it was queued
    /// from. The transaction is aborted before any zone mutates.
    #[error("card {card} is not in zone {zone}")]
    NotInZone { card: CardId, zone: ZoneId },

    /// Handler ordering constraints for an event kind form a cycle.
    /// Returned from game construction, never mid-game.
    #[error("handler ordering cycle on {event:?} among {names:?}")]
    OrderingCycle {
        event: EventKind,
        names: Vec<String>,
    },

    /// Action nesting exceeded the configured depth limit, which almost
    /// always means two handlers are spawning each other's actions forever.
    #[error("action nesting exceeded depth limit {0}")]
    DepthLimit(usize),

    /// An action referenced a custom kind that was never registered.
    #[error("unknown custom action {0}")]
    UnknownAction(CustomActionId),

    /// The game previously hit a structural failure and accepts no further
    /// actions.
    #[error("game instance has crashed")]
    Crashed,
}

/// Marker for a failed validity check.
///
/// Returned by [`check`] so validity predicates can be written as a straight
/// line of `check(...)?` calls and collapsed to a `bool` with
/// [`Result::is_ok`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckFailed;

/// Succeeds when `cond` holds.
///
/// ```
/// use duelcore::core::{check, CheckFailed};
///
/// fn valid(hand_size: usize, life: i32) -> bool {
///     let run = || -> Result<(), CheckFailed> {
///         check(hand_size > 0)?;
///         check(life > 0)?;
///         Ok(())
///     };
///     run().is_ok()
/// }
///
/// assert!(valid(3, 2));
/// assert!(!valid(0, 2));
/// ```
pub fn check(cond: bool) -> std::result::Result<(), CheckFailed> {
    if cond {
        Ok(())
    } else {
        Err(CheckFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_short_circuits() {
        fn predicate(a: bool, b: bool) -> std::result::Result<(), CheckFailed> {
            check(a)?;
            check(b)?;
            Ok(())
        }

        assert!(predicate(true, true).is_ok());
        assert!(predicate(false, true).is_err());
        assert!(predicate(true, false).is_err());
    }

    #[test]
    fn test_error_display() {
        let err = GameError::DepthLimit(128);
        assert_eq!(err.to_string(), "action nesting exceeded depth limit 128");

        let err = GameError::Crashed;
        assert_eq!(err.to_string(), "game instance has crashed");
    }
}
