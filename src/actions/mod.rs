//! Actions: every game-state mutation, as a value.
//!
//! ## Key Types
//!
//! - `Action`: kind + actors + cards + the flags the pipeline maintains
//! - `ActionKind`: the closed set of engine verbs, plus `Custom` for
//!   content-registered kinds
//! - `TurnStage`: the three stages a turn runs through
//!
//! An action is a plain value. Handlers mutate it in place or hand the
//! dispatcher a replacement ([`crate::handlers::Ruling::Substitute`]); they
//! never change its type at runtime. A substitute that conceptually wraps
//! the action it replaced keeps it in `inner`, so downstream handlers and
//! the after phase can still see what was originally attempted.
//!
//! ## Marks
//!
//! Marks are named counters a handler can attach to an action, replacing
//! ad-hoc flag attributes. [`Action::mark_once`] is the standard one-shot
//! guard:
//!
//! ```
//! use duelcore::actions::Action;
//!
//! let mut action = Action::turn(duelcore::core::PlayerId::new(0));
//! assert!(action.mark_once("riposte"));
//! assert!(!action.mark_once("riposte"));
//! ```

pub(crate) mod apply;
pub mod fatetell;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::CardId;
use crate::core::PlayerId;
use crate::handlers::CustomActionId;

pub use fatetell::{Fatetell, FatetellCriterion};

/// The stages of one player turn, in running order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnStage {
    /// Draw from the shared pile.
    Draw,
    /// Offer and resolve plays.
    Action,
    /// Discard down to the hand limit.
    Drop,
}

impl TurnStage {
    /// The stages in running order.
    pub const ALL: [TurnStage; 3] = [TurnStage::Draw, TurnStage::Action, TurnStage::Drop];
}

/// The closed set of engine action verbs.
///
/// Content extends the vocabulary through `Custom`, whose validity and
/// effect functions live in the [`crate::handlers::ContentRegistry`].
#[derive(Clone, Debug)]
pub enum ActionKind {
    /// One player's full turn.
    Turn,
    /// One stage of a turn.
    Stage(TurnStage),
    /// Draw cards from the shared pile into the target's hand.
    Draw { count: usize },
    /// Move the action's cards to the dropped pile.
    Drop,
    /// Wear an equipment card, displacing the same-slot piece in the same
    /// transaction.
    Equip,
    /// Reduce the target's life. Life may go below zero; the game mode
    /// decides what that means.
    Damage { amount: u32 },
    /// Raise the target's life, capped at max life.
    Heal { amount: u32 },
    /// Reveal-and-classify; see [`fatetell`].
    Fatetell(Fatetell),
    /// A content-registered kind.
    Custom(CustomActionId),
}

impl ActionKind {
    /// Short label for logs. Custom kinds resolve their registered name at
    /// the logging site.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::Turn => "turn",
            ActionKind::Stage(TurnStage::Draw) => "stage.draw",
            ActionKind::Stage(TurnStage::Action) => "stage.action",
            ActionKind::Stage(TurnStage::Drop) => "stage.drop",
            ActionKind::Draw { .. } => "draw",
            ActionKind::Drop => "drop",
            ActionKind::Equip => "equip",
            ActionKind::Damage { .. } => "damage",
            ActionKind::Heal { .. } => "heal",
            ActionKind::Fatetell(_) => "fatetell",
            ActionKind::Custom(_) => "custom",
        }
    }
}

/// A game-state mutation moving through the pipeline.
#[derive(Clone, Debug)]
pub struct Action {
    pub kind: ActionKind,
    /// The player who caused this action, if any.
    pub source: Option<PlayerId>,
    /// The players it operates on. Most kinds read the first entry.
    pub targets: SmallVec<[PlayerId; 2]>,
    /// The cards it operates on.
    pub cards: SmallVec<[CardId; 2]>,
    /// Set by a before-phase handler to veto the effect. Apply is skipped;
    /// the after phase still runs and must check this flag.
    pub cancelled: bool,
    /// Set by the pipeline once the effect has run (or definitively not
    /// run). For a fatetell this is the verdict.
    pub succeeded: bool,
    marks: FxHashMap<String, i64>,
    inner: Option<Box<Action>>,
}

impl Action {
    /// A bare action of the given kind.
    #[must_use]
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            source: None,
            targets: SmallVec::new(),
            cards: SmallVec::new(),
            cancelled: false,
            succeeded: false,
            marks: FxHashMap::default(),
            inner: None,
        }
    }

    /// A substitute that wraps the action it replaces, inheriting its
    /// actors and cards. The original stays reachable through [`inner`].
    ///
    /// [`inner`]: Action::inner
    #[must_use]
    pub fn wrapping(kind: ActionKind, original: Action) -> Self {
        let mut action = Action::new(kind);
        action.source = original.source;
        action.targets = original.targets.clone();
        action.cards = original.cards.clone();
        action.inner = Some(Box::new(original));
        action
    }

    /// A full turn for `player`.
    #[must_use]
    pub fn turn(player: PlayerId) -> Self {
        Action::new(ActionKind::Turn).with_target(player)
    }

    /// One turn stage for `player`.
    #[must_use]
    pub fn stage(player: PlayerId, stage: TurnStage) -> Self {
        Action::new(ActionKind::Stage(stage)).with_target(player)
    }

    /// Draw `count` cards for `player`.
    #[must_use]
    pub fn draw(player: PlayerId, count: usize) -> Self {
        Action::new(ActionKind::Draw { count }).with_target(player)
    }

    /// Drop `cards` from `player`'s possession.
    #[must_use]
    pub fn drop_cards(player: PlayerId, cards: &[CardId]) -> Self {
        Action::new(ActionKind::Drop)
            .with_target(player)
            .with_cards(cards)
    }

    /// Wear `card` from `player`'s hand.
    #[must_use]
    pub fn equip(player: PlayerId, card: CardId) -> Self {
        Action::new(ActionKind::Equip)
            .with_target(player)
            .with_cards(&[card])
    }

    /// `amount` damage from `source` to `target`.
    #[must_use]
    pub fn damage(source: PlayerId, target: PlayerId, amount: u32) -> Self {
        Action::new(ActionKind::Damage { amount })
            .with_source(source)
            .with_target(target)
    }

    /// Heal `target` by `amount`.
    #[must_use]
    pub fn heal(source: PlayerId, target: PlayerId, amount: u32) -> Self {
        Action::new(ActionKind::Heal { amount })
            .with_source(source)
            .with_target(target)
    }

    /// A fatetell for `target` with the given criterion.
    #[must_use]
    pub fn fatetell(target: PlayerId, criterion: FatetellCriterion) -> Self {
        Action::new(ActionKind::Fatetell(Fatetell::new(criterion))).with_target(target)
    }

    /// A content-registered action.
    #[must_use]
    pub fn custom(id: CustomActionId) -> Self {
        Action::new(ActionKind::Custom(id))
    }

    /// Set the source player.
    #[must_use]
    pub fn with_source(mut self, source: PlayerId) -> Self {
        self.source = Some(source);
        self
    }

    /// Add a target player.
    #[must_use]
    pub fn with_target(mut self, target: PlayerId) -> Self {
        self.targets.push(target);
        self
    }

    /// Replace the card list.
    #[must_use]
    pub fn with_cards(mut self, cards: &[CardId]) -> Self {
        self.cards = SmallVec::from_slice(cards);
        self
    }

    /// The primary (first) target.
    #[must_use]
    pub fn target(&self) -> Option<PlayerId> {
        self.targets.first().copied()
    }

    /// Set a mark to 1.
    pub fn mark(&mut self, name: impl Into<String>) {
        self.marks.insert(name.into(), 1);
    }

    /// Set a mark to a specific value.
    pub fn set_mark(&mut self, name: impl Into<String>, value: i64) {
        self.marks.insert(name.into(), value);
    }

    /// Whether a mark is present.
    #[must_use]
    pub fn marked(&self, name: &str) -> bool {
        self.marks.contains_key(name)
    }

    /// Read a mark, defaulting to 0.
    #[must_use]
    pub fn mark_value(&self, name: &str) -> i64 {
        self.marks.get(name).copied().unwrap_or(0)
    }

    /// Mark-and-test: true the first time, false ever after. The standard
    /// guard for handlers that must act once per action.
    pub fn mark_once(&mut self, name: &str) -> bool {
        if self.marked(name) {
            false
        } else {
            self.mark(name);
            true
        }
    }

    /// The action this one replaced, when built with [`Action::wrapping`].
    #[must_use]
    pub fn inner(&self) -> Option<&Action> {
        self.inner.as_deref()
    }

    /// Mutable access to the wrapped action.
    pub fn inner_mut(&mut self) -> Option<&mut Action> {
        self.inner.as_deref_mut()
    }

    /// Take the wrapped action out, typically to process it from a custom
    /// apply.
    pub fn take_inner(&mut self) -> Option<Action> {
        self.inner.take().map(|boxed| *boxed)
    }

    /// The fatetell payload, if this is a fatetell.
    #[must_use]
    pub fn as_fatetell(&self) -> Option<&Fatetell> {
        match &self.kind {
            ActionKind::Fatetell(ft) => Some(ft),
            _ => None,
        }
    }

    /// Mutable fatetell payload; how malleate handlers swap the tell card.
    pub fn as_fatetell_mut(&mut self) -> Option<&mut Fatetell> {
        match &mut self.kind {
            ActionKind::Fatetell(ft) => Some(ft),
            _ => None,
        }
    }

    /// Whether `handler` already substituted in this action's lineage.
    #[must_use]
    pub fn substituted_by(&self, handler: &str) -> bool {
        self.marked(&substitution_mark(handler))
    }

    /// Stamp a substitution onto this action and its wrapped original.
    pub(crate) fn stamp_substitution(&mut self, handler: &str) {
        let mark = substitution_mark(handler);
        if let Some(inner) = self.inner.as_deref_mut() {
            inner.mark(mark.clone());
        }
        self.mark(mark);
    }
}

fn substitution_mark(handler: &str) -> String {
    format!("substituted:{handler}")
}
