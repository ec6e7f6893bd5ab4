//! Event handlers: the plugin seam every rule flows through.
//!
//! ## Model
//!
//! Rule modules implement [`EventHandler`] and register with the
//! [`ContentRegistry`]. For every event kind the engine resolves the
//! registered handlers' declarative ordering constraints into one total
//! order at game construction; dispatch then walks that order, always.
//!
//! ## Phases
//!
//! An action passes through `action_before` (handlers may cancel it or
//! substitute a different action), `action_apply` (observers, fired right
//! before the effect runs), and `action_after` (observers, fired whether or
//! not the action was cancelled). Migrations report through
//! `card_migration` / `post_card_migration`, fatetells open a `fatetell`
//! window, and plays offered during the action stage pass through
//! `action_stage_action`.
//!
//! ## Key Types
//!
//! - `EventKind` / `ActionPhase`: what is being dispatched
//! - `EventHandler` / `Ruling`: the plugin trait and its before-phase verdict
//! - `OrderingDecl` / `HandlerRef`: declarative ordering constraints
//! - `HandlerSet`: the frozen, resolved handler order
//! - `ContentRegistry`: skills, handlers, custom actions

pub mod equip;
pub mod order;
pub mod registry;

use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::core::Result;
use crate::game::Game;
use crate::zones::MigrationEvent;

pub use equip::EquipSkillTransfer;
pub use order::HandlerSet;
pub use registry::{
    ApplyFn, ContentRegistry, CustomActionDef, CustomActionId, SkillCategory, SkillId, SkillSpec,
    ValidateFn,
};

/// Every kind of event the engine dispatches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Once, after setup completes.
    GameBegin,
    /// An action is about to run; cancellation and substitution happen here.
    ActionBefore,
    /// An action passed its gates and its effect is about to execute.
    ActionApply,
    /// An action finished (applied or cancelled; check the flag).
    ActionAfter,
    /// A play offered during the action stage, before it is processed.
    StageAction,
    /// A migration transaction just applied its moves.
    CardMigration,
    /// The same batch, after all `CardMigration` handlers finished.
    PostCardMigration,
    /// A fatetell card is revealed and may still be swapped.
    Fatetell,
}

impl EventKind {
    /// All kinds, in a fixed order. Ordering resolution walks this.
    pub const ALL: [EventKind; 8] = [
        EventKind::GameBegin,
        EventKind::ActionBefore,
        EventKind::ActionApply,
        EventKind::ActionAfter,
        EventKind::StageAction,
        EventKind::CardMigration,
        EventKind::PostCardMigration,
        EventKind::Fatetell,
    ];
}

/// The action-carrying dispatch points, as handlers see them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionPhase {
    Before,
    Apply,
    After,
    /// A play offered during the action stage.
    Stage,
    /// The malleate window between a fatetell's reveal and its verdict.
    Fatetell,
}

impl ActionPhase {
    /// The event kind this phase dispatches as.
    #[must_use]
    pub fn event_kind(self) -> EventKind {
        match self {
            ActionPhase::Before => EventKind::ActionBefore,
            ActionPhase::Apply => EventKind::ActionApply,
            ActionPhase::After => EventKind::ActionAfter,
            ActionPhase::Stage => EventKind::StageAction,
            ActionPhase::Fatetell => EventKind::Fatetell,
        }
    }
}

/// A before-phase handler's verdict on an action.
#[derive(Debug)]
pub enum Ruling {
    /// Keep going. Covers in-place mutation too, including setting
    /// `action.cancelled`.
    Continue,
    /// Replace the action for every subsequent handler and for apply. Only
    /// honored in the before phase; the dispatcher stamps the substitute so
    /// the same handler never substitutes twice in one action lineage.
    Substitute(Action),
}

/// A reference in an ordering constraint.
///
/// References to names nobody registered are ignored, so a rule module can
/// order itself against handlers that only exist in some game modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandlerRef {
    /// A single handler, by `EventHandler::name`.
    Handler(&'static str),
    /// Every currently registered member of an ordering group.
    Group(&'static str),
}

/// Declarative ordering constraints for one handler.
///
/// `before`/`after` express "must run before/after" edges; a group reference
/// expands to every registered member of that group (excluding the declaring
/// handler itself, so membership plus a group constraint is not a cycle).
#[derive(Clone, Copy, Debug, Default)]
pub struct OrderingDecl {
    /// Group this handler belongs to, if any.
    pub group: Option<&'static str>,
    /// Handlers/groups this one must precede.
    pub before: &'static [HandlerRef],
    /// Handlers/groups this one must follow.
    pub after: &'static [HandlerRef],
}

impl OrderingDecl {
    /// No constraints: ties resolve by registration order.
    pub const NONE: OrderingDecl = OrderingDecl {
        group: None,
        before: &[],
        after: &[],
    };

    /// Join an ordering group.
    #[must_use]
    pub const fn in_group(group: &'static str) -> Self {
        OrderingDecl {
            group: Some(group),
            before: &[],
            after: &[],
        }
    }

    /// Add "must run before" references.
    #[must_use]
    pub const fn with_before(mut self, refs: &'static [HandlerRef]) -> Self {
        self.before = refs;
        self
    }

    /// Add "must run after" references.
    #[must_use]
    pub const fn with_after(mut self, refs: &'static [HandlerRef]) -> Self {
        self.after = refs;
        self
    }
}

/// A rule module.
///
/// Handlers are registered before the game starts, shared behind `Arc`, and
/// must keep their own state out: everything they need lives in the `Game`
/// they are handed. The engine guarantees a fixed invocation order per event
/// kind (see [`order`]) and re-entrancy: a handler may freely call
/// `game.process_action` and commit migrations.
///
/// ```
/// use duelcore::handlers::{EventHandler, EventKind, HandlerRef, OrderingDecl};
///
/// struct ShieldVeto;
///
/// impl EventHandler for ShieldVeto {
///     fn name(&self) -> &'static str {
///         "ShieldVeto"
///     }
///
///     fn interests(&self) -> &'static [EventKind] {
///         &[EventKind::ActionBefore]
///     }
///
///     fn ordering(&self) -> OrderingDecl {
///         OrderingDecl::in_group("defense").with_after(&[HandlerRef::Handler("WeaponBoost")])
///     }
/// }
/// ```
pub trait EventHandler: Send + Sync {
    /// Unique handler name; ordering references and substitution marks use
    /// it.
    fn name(&self) -> &'static str;

    /// Event kinds this handler wants. Dispatch never calls a handler for a
    /// kind it did not declare.
    fn interests(&self) -> &'static [EventKind];

    /// Ordering constraints. Defaults to none.
    fn ordering(&self) -> OrderingDecl {
        OrderingDecl::NONE
    }

    /// Called once for `GameBegin`.
    fn on_begin(&self, _game: &mut Game) -> Result<()> {
        Ok(())
    }

    /// Called for every action-carrying phase the handler declared interest
    /// in. Mutating the action in place is allowed in every phase;
    /// substitution is honored only in [`ActionPhase::Before`].
    fn on_phase(&self, _game: &mut Game, _phase: ActionPhase, _action: &mut Action) -> Result<Ruling> {
        Ok(Ruling::Continue)
    }

    /// Called for `CardMigration` and `PostCardMigration`.
    fn on_migration(&self, _game: &mut Game, _kind: EventKind, _event: &MigrationEvent) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_event_kinds() {
        assert_eq!(ActionPhase::Before.event_kind(), EventKind::ActionBefore);
        assert_eq!(ActionPhase::Apply.event_kind(), EventKind::ActionApply);
        assert_eq!(ActionPhase::After.event_kind(), EventKind::ActionAfter);
        assert_eq!(ActionPhase::Stage.event_kind(), EventKind::StageAction);
        assert_eq!(ActionPhase::Fatetell.event_kind(), EventKind::Fatetell);
    }

    #[test]
    fn test_ordering_decl_builders() {
        const DECL: OrderingDecl = OrderingDecl::in_group("defense")
            .with_before(&[HandlerRef::Group("offense")])
            .with_after(&[HandlerRef::Handler("Armory")]);

        assert_eq!(DECL.group, Some("defense"));
        assert_eq!(DECL.before, &[HandlerRef::Group("offense")]);
        assert_eq!(DECL.after, &[HandlerRef::Handler("Armory")]);
    }

    #[test]
    fn test_all_kinds_distinct() {
        for (i, a) in EventKind::ALL.iter().enumerate() {
            for b in &EventKind::ALL[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
