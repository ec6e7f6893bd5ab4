//! External input: synchronous request/response with failure as a value.
//!
//! The engine never waits on a socket. When a rule needs a decision it
//! builds an [`InputRequest`] and hands it to the game's [`InputBroker`],
//! which returns either an answer or [`InputOutcome::Unavailable`] (timeout,
//! decline, disconnect). Unavailable is not an error: every asking site has
//! a defined fallback, typically a random choice through the game RNG.
//!
//! Every outcome is appended to the game's input log. The log plus the RNG
//! seed is a complete replay ([`ReplayLog`]); feeding it back through
//! [`ScriptedInput`] reproduces the run exactly.

use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::PlayerId;
use crate::zones::ZoneId;

/// What is being asked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputQuery {
    /// Pick `count` distinct cards from `zone`.
    Cards { zone: ZoneId, count: usize },
    /// Pick one of the listed options by index.
    Option { options: Vec<String> },
    /// Pick one of the candidate players.
    Player { candidates: Vec<PlayerId> },
}

/// One question for the outside world.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRequest {
    /// Monotonic per game; pairs requests with log entries.
    pub seq: u64,
    /// Who may answer.
    pub players: Vec<PlayerId>,
    /// Why the engine is asking, e.g. the skill name. Display only.
    pub prompt: String,
    pub query: InputQuery,
    /// How long the broker should wait before giving up. The engine only
    /// threads the value; enforcement is transport's job.
    pub timeout: Duration,
}

/// An actual answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputValue {
    Cards(Vec<CardId>),
    Option(usize),
    Player(PlayerId),
}

/// Why no answer arrived. All of these are ordinary outcomes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnavailableReason {
    TimedOut,
    Declined,
    Disconnected,
}

/// What came back from the broker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputOutcome {
    Answer(InputValue),
    Unavailable(UnavailableReason),
}

impl InputOutcome {
    /// The answered cards, if this outcome is one.
    #[must_use]
    pub fn cards(&self) -> Option<&[CardId]> {
        match self {
            InputOutcome::Answer(InputValue::Cards(cards)) => Some(cards),
            _ => None,
        }
    }
}

/// The transport seam. Implementations live outside the engine; the two
/// provided ones cover tests and replays.
pub trait InputBroker: Send {
    fn request(&mut self, request: &InputRequest) -> InputOutcome;
}

/// Answers requests from a pre-recorded list, in order. Once the list runs
/// out every request is declined.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    answers: VecDeque<InputOutcome>,
}

impl ScriptedInput {
    /// Script the given outcomes.
    #[must_use]
    pub fn new(answers: Vec<InputOutcome>) -> Self {
        Self {
            answers: answers.into(),
        }
    }

    /// Replay the answers of a recorded run. Pair with
    /// `GameBuilder::with_seed(log.seed)` for a faithful replay.
    #[must_use]
    pub fn from_log(log: &ReplayLog) -> Self {
        Self::new(log.answers.clone())
    }
}

impl InputBroker for ScriptedInput {
    fn request(&mut self, _request: &InputRequest) -> InputOutcome {
        self.answers
            .pop_front()
            .unwrap_or(InputOutcome::Unavailable(UnavailableReason::Declined))
    }
}

/// Declines everything, driving every asking site down its fallback path.
/// The default broker.
#[derive(Clone, Copy, Debug, Default)]
pub struct AutoDecline;

impl InputBroker for AutoDecline {
    fn request(&mut self, _request: &InputRequest) -> InputOutcome {
        InputOutcome::Unavailable(UnavailableReason::Declined)
    }
}

/// One entry of the game's input log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    pub seq: u64,
    pub prompt: String,
    pub outcome: InputOutcome,
}

/// Everything needed to reproduce a run: the RNG seed and the input answers
/// in ask order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayLog {
    pub seed: u64,
    pub answers: Vec<InputOutcome>,
}
