//! # duelcore
//!
//! A deterministic card-battle rules engine with pluggable skill and rule
//! handlers.
//!
//! ## Design Principles
//!
//! 1. **Everything is an action**: turns, draws, damage, and content-defined
//!    verbs all run through one before/apply/after pipeline. Rules hook the
//!    pipeline; nothing mutates the game behind its back.
//!
//! 2. **Handlers, not subclasses**: content plugs in `EventHandler`s with
//!    declarative ordering constraints, resolved once per game into a total
//!    order. Two runs never disagree about who reacts first.
//!
//! 3. **Determinism as a feature**: one seeded RNG, synchronous input with
//!    failure as a value, and an input log that makes any run replayable
//!    bit for bit.
//!
//! ## Architecture
//!
//! - **Action pipeline**: validity gate, before phase (cancel/substitute),
//!   gate again, apply exactly once, after phase always. Re-entrant, with a
//!   depth-limited action stack handlers can inspect.
//!
//! - **Atomic migrations**: card movement is batched into transactions that
//!   validate against live state before any card moves, then report as one
//!   event per batch.
//!
//! - **Crash, don't limp**: structural failures poison the instance; rule
//!   "no"s are cancelled actions, never errors.
//!
//! ## Modules
//!
//! - `core`: errors, options, players, RNG
//! - `zones`: zones, card residence, migration transactions
//! - `cards`: card identity and the per-game store
//! - `actions`: actions as values and the built-in verbs
//! - `handlers`: the plugin seam, ordering resolution, content registry
//! - `input`: synchronous input brokering and replay logs
//! - `game`: the game root and the pipeline
//! - `games`: ready-made modes

pub mod core;
pub mod zones;
pub mod cards;
pub mod actions;
pub mod handlers;
pub mod input;
pub mod game;
pub mod games;

// Re-export commonly used types
pub use crate::core::{
    check, CheckFailed, GameError, GameOptions, HandLimit,
    GameRng, GameRngState,
    Player, PlayerId, PlayerMap, PlayerZones,
    Result,
};

pub use crate::zones::{
    CardMove, MigrationEvent, MigrationTransaction,
    Zone, ZoneId, ZoneKind, ZoneManager, ZoneOwner,
};

pub use crate::cards::{
    Card, CardId, CardSpec, CardStore,
    Category, Color, EquipKind, Rank, Suit,
};

pub use crate::actions::{Action, ActionKind, Fatetell, FatetellCriterion, TurnStage};

pub use crate::handlers::{
    ActionPhase, EventHandler, EventKind, Ruling,
    HandlerRef, HandlerSet, OrderingDecl,
    ApplyFn, ContentRegistry, CustomActionDef, CustomActionId, ValidateFn,
    SkillCategory, SkillId, SkillSpec,
};

pub use crate::input::{
    AutoDecline, InputBroker, InputOutcome, InputQuery, InputRecord, InputRequest,
    InputValue, ReplayLog, ScriptedInput, UnavailableReason,
};

pub use crate::game::{
    ActionFrame, Checkpoint, Game, GameBuilder, GameMode, GameResult,
    PlayerSpec, SharedZones,
};
