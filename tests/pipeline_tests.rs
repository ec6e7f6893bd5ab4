//! Action pipeline integration tests.
//!
//! Cancellation, substitution, the double validity gate, the always-running
//! after phase, and the action stack, all driven through real handlers and
//! custom actions.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use duelcore::actions::{Action, ActionKind};
use duelcore::cards::{CardSpec, CardStore, Category, Rank, Suit};
use duelcore::core::{GameError, GameOptions, PlayerId, Result};
use duelcore::game::{Game, GameMode, PlayerSpec};
use duelcore::handlers::{ActionPhase, ContentRegistry, EventHandler, EventKind, Ruling};

struct ArenaMode;

impl GameMode for ArenaMode {
    fn name(&self) -> &'static str {
        "arena"
    }

    fn players(&self) -> Vec<PlayerSpec> {
        vec![PlayerSpec::new(4), PlayerSpec::new(4)]
    }

    fn deck(&self, cards: &mut CardStore) {
        for i in 0..16 {
            cards.add(CardSpec::new(
                format!("c{i}"),
                Suit::Club,
                Rank::new((i % 13 + 1) as u8),
                Category::Basic,
            ));
        }
    }
}

fn arena(registry: ContentRegistry) -> Game {
    Game::builder(Arc::new(ArenaMode))
        .with_registry(registry)
        .with_seed(11)
        .build()
        .unwrap()
}

/// Cancels every damage action in the before phase.
struct Pacifist;

impl EventHandler for Pacifist {
    fn name(&self) -> &'static str {
        "Pacifist"
    }

    fn interests(&self) -> &'static [EventKind] {
        &[EventKind::ActionBefore]
    }

    fn on_phase(&self, _game: &mut Game, _phase: ActionPhase, action: &mut Action) -> Result<Ruling> {
        if matches!(action.kind, ActionKind::Damage { .. }) {
            action.cancelled = true;
        }
        Ok(Ruling::Continue)
    }
}

/// Counts apply and after dispatches.
struct PhaseCounter {
    applies: Arc<AtomicUsize>,
    afters: Arc<AtomicUsize>,
}

impl EventHandler for PhaseCounter {
    fn name(&self) -> &'static str {
        "PhaseCounter"
    }

    fn interests(&self) -> &'static [EventKind] {
        &[EventKind::ActionApply, EventKind::ActionAfter]
    }

    fn on_phase(&self, _game: &mut Game, phase: ActionPhase, _action: &mut Action) -> Result<Ruling> {
        match phase {
            ActionPhase::Apply => self.applies.fetch_add(1, Ordering::SeqCst),
            ActionPhase::After => self.afters.fetch_add(1, Ordering::SeqCst),
            _ => 0,
        };
        Ok(Ruling::Continue)
    }
}

#[test]
fn test_cancelled_action_skips_apply_but_not_after() {
    let applies = Arc::new(AtomicUsize::new(0));
    let afters = Arc::new(AtomicUsize::new(0));

    let mut registry = ContentRegistry::new();
    registry.register_handler(Arc::new(Pacifist));
    registry.register_handler(Arc::new(PhaseCounter {
        applies: Arc::clone(&applies),
        afters: Arc::clone(&afters),
    }));
    let mut game = arena(registry);

    let (p0, p1) = (PlayerId::new(0), PlayerId::new(1));
    let done = game.process_action(Action::damage(p0, p1, 2)).unwrap();

    assert!(done.cancelled);
    assert!(!done.succeeded);
    assert_eq!(game.player(p1).life, 4, "cancelled damage must not land");
    assert_eq!(applies.load(Ordering::SeqCst), 0);
    assert_eq!(afters.load(Ordering::SeqCst), 1, "the after phase always runs");
}

/// Substitutes a wrapping heal for every damage action.
struct DamageToHeal;

impl EventHandler for DamageToHeal {
    fn name(&self) -> &'static str {
        "DamageToHeal"
    }

    fn interests(&self) -> &'static [EventKind] {
        &[EventKind::ActionBefore]
    }

    fn on_phase(&self, _game: &mut Game, _phase: ActionPhase, action: &mut Action) -> Result<Ruling> {
        if let ActionKind::Damage { amount } = action.kind {
            let replacement = Action::wrapping(ActionKind::Heal { amount }, action.clone());
            return Ok(Ruling::Substitute(replacement));
        }
        Ok(Ruling::Continue)
    }
}

#[test]
fn test_substitution_redirects_the_effect() {
    let mut registry = ContentRegistry::new();
    registry.register_handler(Arc::new(DamageToHeal));
    let mut game = arena(registry);

    let (p0, p1) = (PlayerId::new(0), PlayerId::new(1));
    game.player_mut(p1).life = 2;

    let done = game.process_action(Action::damage(p0, p1, 1)).unwrap();

    assert!(matches!(done.kind, ActionKind::Heal { amount: 1 }));
    assert!(done.succeeded);
    assert_eq!(game.player(p1).life, 3, "the substitute healed instead");
    assert!(done.substituted_by("DamageToHeal"));
    assert!(
        matches!(done.inner().unwrap().kind, ActionKind::Damage { amount: 1 }),
        "the replaced action stays reachable"
    );
}

#[test]
fn test_substituting_handler_skipped_for_marked_lineage() {
    let mut registry = ContentRegistry::new();
    registry.register_handler(Arc::new(DamageToHeal));
    let mut game = arena(registry);

    let (p0, p1) = (PlayerId::new(0), PlayerId::new(1));
    game.player_mut(p1).life = 2;

    let mut done = game.process_action(Action::damage(p0, p1, 1)).unwrap();
    let inner = done.take_inner().unwrap();
    assert!(inner.substituted_by("DamageToHeal"));

    // Reprocessing the stamped original: the handler must not substitute
    // again, so this time the damage lands.
    let done = game.process_action(inner).unwrap();

    assert!(matches!(done.kind, ActionKind::Damage { amount: 1 }));
    assert!(done.succeeded);
    assert_eq!(game.player(p1).life, 2, "3 after the heal, minus 1");
}

/// Zeroes damage in the before phase, leaving the action invalid.
struct Dampen;

impl EventHandler for Dampen {
    fn name(&self) -> &'static str {
        "Dampen"
    }

    fn interests(&self) -> &'static [EventKind] {
        &[EventKind::ActionBefore]
    }

    fn on_phase(&self, _game: &mut Game, _phase: ActionPhase, action: &mut Action) -> Result<Ruling> {
        if let ActionKind::Damage { amount } = &mut action.kind {
            *amount = 0;
        }
        Ok(Ruling::Continue)
    }
}

#[test]
fn test_mutation_is_revalidated_after_before_phase() {
    let mut registry = ContentRegistry::new();
    registry.register_handler(Arc::new(Dampen));
    let mut game = arena(registry);

    let (p0, p1) = (PlayerId::new(0), PlayerId::new(1));
    let done = game.process_action(Action::damage(p0, p1, 3)).unwrap();

    assert!(done.cancelled, "zero damage fails the second validity gate");
    assert_eq!(game.player(p1).life, 4);
}

/// Tries to substitute outside the before phase.
struct LateSwap;

impl EventHandler for LateSwap {
    fn name(&self) -> &'static str {
        "LateSwap"
    }

    fn interests(&self) -> &'static [EventKind] {
        &[EventKind::ActionApply]
    }

    fn on_phase(&self, _game: &mut Game, _phase: ActionPhase, _action: &mut Action) -> Result<Ruling> {
        Ok(Ruling::Substitute(Action::turn(PlayerId::new(0))))
    }
}

#[test]
fn test_apply_phase_substitution_is_ignored() {
    let mut registry = ContentRegistry::new();
    registry.register_handler(Arc::new(LateSwap));
    let mut game = arena(registry);

    let (p0, p1) = (PlayerId::new(0), PlayerId::new(1));
    let done = game.process_action(Action::damage(p0, p1, 1)).unwrap();

    assert!(matches!(done.kind, ActionKind::Damage { amount: 1 }));
    assert!(done.succeeded);
    assert_eq!(game.player(p1).life, 3);
}

/// Records what the action stack looks like when damage enters its before
/// phase.
struct DepthProbe {
    depth: Arc<AtomicUsize>,
    nested_in_custom: Arc<AtomicUsize>,
}

impl EventHandler for DepthProbe {
    fn name(&self) -> &'static str {
        "DepthProbe"
    }

    fn interests(&self) -> &'static [EventKind] {
        &[EventKind::ActionBefore]
    }

    fn on_phase(&self, game: &mut Game, _phase: ActionPhase, action: &mut Action) -> Result<Ruling> {
        if matches!(action.kind, ActionKind::Damage { .. }) {
            let frames = game.action_stack();
            self.depth.store(frames.len(), Ordering::SeqCst);
            let nested = frames
                .first()
                .is_some_and(|f| matches!(f.action.kind, ActionKind::Custom(_)));
            self.nested_in_custom.store(nested as usize, Ordering::SeqCst);
        }
        Ok(Ruling::Continue)
    }
}

fn volley_apply(game: &mut Game, action: &mut Action) -> Result<bool> {
    let Some(source) = action.source else {
        return Ok(false);
    };
    let Some(target) = action.target() else {
        return Ok(false);
    };
    for _ in 0..2 {
        game.process_action(Action::damage(source, target, 1))?;
    }
    Ok(true)
}

#[test]
fn test_action_stack_shows_nesting() {
    let depth = Arc::new(AtomicUsize::new(0));
    let nested = Arc::new(AtomicUsize::new(0));

    let mut registry = ContentRegistry::new();
    registry.register_handler(Arc::new(DepthProbe {
        depth: Arc::clone(&depth),
        nested_in_custom: Arc::clone(&nested),
    }));
    let volley = registry.register_action("Volley", None, volley_apply);
    let mut game = arena(registry);

    let (p0, p1) = (PlayerId::new(0), PlayerId::new(1));
    let done = game
        .process_action(Action::custom(volley).with_source(p0).with_target(p1))
        .unwrap();

    assert!(done.succeeded);
    assert_eq!(game.player(p1).life, 2, "both volley hits landed");
    assert_eq!(depth.load(Ordering::SeqCst), 2, "volley frame plus damage frame");
    assert_eq!(nested.load(Ordering::SeqCst), 1, "outermost frame is the volley");
    assert!(game.action_stack().is_empty(), "stack drains after processing");
}

fn ouroboros_apply(game: &mut Game, action: &mut Action) -> Result<bool> {
    let ActionKind::Custom(id) = action.kind else {
        return Ok(false);
    };
    game.process_action(Action::custom(id))?;
    Ok(true)
}

#[test]
fn test_runaway_nesting_hits_depth_limit_and_crashes() {
    let mut registry = ContentRegistry::new();
    let ouroboros = registry.register_action("Ouroboros", None, ouroboros_apply);

    let mut game = Game::builder(Arc::new(ArenaMode))
        .with_registry(registry)
        .with_options(GameOptions::default().with_max_action_depth(8))
        .build()
        .unwrap();

    let err = game.process_action(Action::custom(ouroboros)).unwrap_err();
    assert_eq!(err, GameError::DepthLimit(8));
    assert!(game.is_crashed());

    let err = game
        .process_action(Action::damage(PlayerId::new(0), PlayerId::new(1), 1))
        .unwrap_err();
    assert_eq!(err, GameError::Crashed);
}

/// Observes invalid actions arriving in the before phase already cancelled.
struct BeforeSeen {
    count: Arc<AtomicUsize>,
    cancelled: Arc<AtomicUsize>,
}

impl EventHandler for BeforeSeen {
    fn name(&self) -> &'static str {
        "BeforeSeen"
    }

    fn interests(&self) -> &'static [EventKind] {
        &[EventKind::ActionBefore]
    }

    fn on_phase(&self, _game: &mut Game, _phase: ActionPhase, action: &mut Action) -> Result<Ruling> {
        if matches!(action.kind, ActionKind::Damage { .. }) {
            self.count.fetch_add(1, Ordering::SeqCst);
            self.cancelled
                .store(action.cancelled as usize, Ordering::SeqCst);
        }
        Ok(Ruling::Continue)
    }
}

#[test]
fn test_invalid_action_still_passes_through_before_phase() {
    let count = Arc::new(AtomicUsize::new(0));
    let cancelled = Arc::new(AtomicUsize::new(0));

    let mut registry = ContentRegistry::new();
    registry.register_handler(Arc::new(BeforeSeen {
        count: Arc::clone(&count),
        cancelled: Arc::clone(&cancelled),
    }));
    let mut game = arena(registry);

    // Zero damage is invalid: cancelled at the first gate, not an error.
    let done = game
        .process_action(Action::damage(PlayerId::new(0), PlayerId::new(1), 0))
        .unwrap();

    assert!(done.cancelled);
    assert_eq!(count.load(Ordering::SeqCst), 1, "before phase saw it anyway");
    assert_eq!(cancelled.load(Ordering::SeqCst), 1, "already flagged cancelled");
}

/// Leaves a mark on every action it sees.
struct Witness;

impl EventHandler for Witness {
    fn name(&self) -> &'static str {
        "Witness"
    }

    fn interests(&self) -> &'static [EventKind] {
        &[EventKind::ActionBefore]
    }

    fn on_phase(&self, _game: &mut Game, _phase: ActionPhase, action: &mut Action) -> Result<Ruling> {
        action.set_mark("witnessed", 7);
        Ok(Ruling::Continue)
    }
}

#[test]
fn test_finished_action_carries_handler_marks() {
    let mut registry = ContentRegistry::new();
    registry.register_handler(Arc::new(Witness));
    let mut game = arena(registry);

    let done = game
        .process_action(Action::damage(PlayerId::new(0), PlayerId::new(1), 1))
        .unwrap();

    assert_eq!(done.mark_value("witnessed"), 7);
    assert!(done.marked("witnessed"));
}
