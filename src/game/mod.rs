//! The game root: state ownership and the action pipeline.
//!
//! A [`Game`] owns everything with game-lifetime state: players, zones,
//! cards, the RNG, the resolved handler order, the input broker, and the
//! action stack. Content never holds references into the game between
//! events; it is handed `&mut Game` and works through the public surface.
//!
//! ## Pipeline
//!
//! [`Game::process_action`] runs every action through the same path, however
//! deeply nested:
//!
//! 1. validity gate (invalid actions are cancelled, not errors);
//! 2. before phase: handlers may mutate, cancel, or substitute;
//! 3. validity gate again, since substitution may have changed everything;
//! 4. apply: observers fire, then the effect runs exactly once;
//! 5. after phase: observers fire whether or not the action was cancelled.
//!
//! Structural failures ([`GameError`]) mark the instance crashed; every
//! later call returns [`GameError::Crashed`]. Rule-level "no" is never an
//! error: it is a cancelled action or a `false` verdict.

pub mod mode;
pub mod stack;

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rustc_hash::FxHasher;

use crate::actions::{apply, Action};
use crate::cards::{CardId, CardStore};
use crate::core::{
    GameError, GameOptions, GameRng, GameRngState, Player, PlayerId, PlayerMap, PlayerZones,
    Result,
};
use crate::handlers::{ActionPhase, ContentRegistry, EventKind, HandlerSet, Ruling};
use crate::input::{
    AutoDecline, InputBroker, InputOutcome, InputQuery, InputRecord, InputRequest, InputValue,
    ReplayLog,
};
use crate::zones::{MigrationEvent, MigrationTransaction, ZoneId, ZoneKind, ZoneManager, ZoneOwner};

pub use mode::{Checkpoint, GameMode, GameResult, PlayerSpec};
pub use stack::ActionFrame;

use stack::ActionStack;

/// Handles to the three zones every game shares.
#[derive(Clone, Copy, Debug)]
pub struct SharedZones {
    /// Face-down pile cards are drawn and revealed from.
    pub draw_pile: ZoneId,
    /// Face-up discard pile; refills the draw pile when it runs dry.
    pub dropped: ZoneId,
    /// Staging area for cards under contention mid-resolution.
    pub disputed: ZoneId,
}

/// One running game instance.
pub struct Game {
    mode: Arc<dyn GameMode>,
    registry: Arc<ContentRegistry>,
    handlers: Arc<HandlerSet>,
    players: PlayerMap<Player>,
    zones: ZoneManager,
    cards: CardStore,
    shared: SharedZones,
    rng: GameRng,
    options: GameOptions,
    input: Box<dyn InputBroker>,
    input_log: Vec<InputRecord>,
    next_input_seq: u64,
    stack: ActionStack,
    turn: u32,
    turn_cursor: u8,
    finished: Option<GameResult>,
    crashed: bool,
}

/// Builds a [`Game`] from a mode plus optional registry, input, seed, and
/// options.
pub struct GameBuilder {
    mode: Arc<dyn GameMode>,
    registry: ContentRegistry,
    input: Box<dyn InputBroker>,
    seed: u64,
    options: GameOptions,
}

impl GameBuilder {
    /// Use a registry with content plugged in. Defaults to a fresh one with
    /// only the engine's infrastructure handlers.
    #[must_use]
    pub fn with_registry(mut self, registry: ContentRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Use an input broker. Defaults to [`AutoDecline`].
    #[must_use]
    pub fn with_input(mut self, input: impl InputBroker + 'static) -> Self {
        self.input = Box::new(input);
        self
    }

    /// Seed the game RNG. Defaults to 0.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Override the default [`GameOptions`].
    #[must_use]
    pub fn with_options(mut self, options: GameOptions) -> Self {
        self.options = options;
        self
    }

    /// Construct the game: create zones, seed and shuffle the deck, resolve
    /// handler ordering, run mode setup, and fire `GameBegin`.
    ///
    /// Fails with [`GameError::OrderingCycle`] when handler constraints
    /// cannot be satisfied; ordering problems never surface mid-game.
    pub fn build(self) -> Result<Game> {
        let specs = self.mode.players();

        let mut zones = ZoneManager::new();
        let shared = SharedZones {
            draw_pile: zones.create_zone(ZoneKind::DrawPile, ZoneOwner::Shared, "draw_pile"),
            dropped: zones.create_zone(ZoneKind::Dropped, ZoneOwner::Shared, "dropped"),
            disputed: zones.create_zone(ZoneKind::Disputed, ZoneOwner::Shared, "disputed"),
        };

        let mut seats: Vec<Player> = Vec::with_capacity(specs.len());
        for (i, spec) in specs.iter().enumerate() {
            let id = PlayerId::new(i as u8);
            let owner = ZoneOwner::Player(id);
            let player_zones = PlayerZones {
                hand: zones.create_zone(ZoneKind::Hand, owner, format!("p{i}.hand")),
                shown: zones.create_zone(ZoneKind::Shown, owner, format!("p{i}.shown")),
                equips: zones.create_zone(ZoneKind::Equips, owner, format!("p{i}.equips")),
                fatetell: zones.create_zone(ZoneKind::Fatetell, owner, format!("p{i}.fatetell")),
            };
            let mut player = Player::new(id, spec.max_life, player_zones);
            for &skill in &spec.skills {
                player.grant_skill(skill);
            }
            seats.push(player);
        }
        let players = PlayerMap::new(seats.len(), |id| seats[id.index()].clone());

        let mut cards = CardStore::new();
        self.mode.deck(&mut cards);
        for card in 0..cards.len() {
            zones.seed_card(CardId::new(card as u32), shared.draw_pile);
        }

        let handlers = HandlerSet::resolve(self.registry.handlers().to_vec())?;

        let mut game = Game {
            mode: Arc::clone(&self.mode),
            registry: Arc::new(self.registry),
            handlers: Arc::new(handlers),
            players,
            zones,
            cards,
            shared,
            rng: GameRng::new(self.seed),
            options: self.options,
            input: self.input,
            input_log: Vec::new(),
            next_input_seq: 0,
            stack: ActionStack::default(),
            turn: 0,
            turn_cursor: 0,
            finished: None,
            crashed: false,
        };

        log::info!(
            "game '{}' starting: {} players, {} cards, seed {}",
            game.mode.name(),
            game.players.player_count(),
            game.cards.len(),
            game.rng.seed()
        );

        game.shuffle_draw_pile();
        let mode = Arc::clone(&game.mode);
        mode.setup(&mut game)?;
        game.dispatch_begin()?;

        Ok(game)
    }
}

impl Game {
    /// Start building a game for `mode`.
    #[must_use]
    pub fn builder(mode: Arc<dyn GameMode>) -> GameBuilder {
        GameBuilder {
            mode,
            registry: ContentRegistry::new(),
            input: Box::new(AutoDecline),
            seed: 0,
            options: GameOptions::default(),
        }
    }

    // === Pipeline ===

    /// Run an action through the full pipeline and hand back the finished
    /// action, flags and marks included.
    ///
    /// Re-entrant: handlers and effects call this for the actions they
    /// spawn, which is what the action stack records. Nesting past
    /// `GameOptions::max_action_depth` is a structural failure.
    pub fn process_action(&mut self, action: Action) -> Result<Action> {
        if self.crashed {
            return Err(GameError::Crashed);
        }
        if self.stack.depth() >= self.options.max_action_depth {
            let err = GameError::DepthLimit(self.options.max_action_depth);
            self.crash(&err);
            return Err(err);
        }

        let mut action = action;
        self.stack.push(action.clone());
        let result = self.run_pipeline(&mut action);
        self.stack.pop();

        match result {
            Ok(()) => Ok(action),
            Err(err) => {
                self.crash(&err);
                Err(err)
            }
        }
    }

    fn run_pipeline(&mut self, action: &mut Action) -> Result<()> {
        log::trace!("processing {}", action.kind.label());

        if !apply::validate(self, action)? {
            action.cancelled = true;
        }

        self.dispatch_before(action)?;

        // Substitution or before-phase mutation may have invalidated what
        // was valid at entry.
        if !action.cancelled && !apply::validate(self, action)? {
            action.cancelled = true;
        }
        self.stack.refresh_top(action);

        if action.cancelled {
            log::trace!("{} cancelled before its effect", action.kind.label());
        } else {
            self.dispatch_observe(ActionPhase::Apply, action)?;
            if !action.cancelled {
                action.succeeded = apply::apply(self, action)?;
            }
            self.stack.refresh_top(action);
        }

        // The after phase always runs; handlers check `cancelled`.
        self.dispatch_observe(ActionPhase::After, action)
    }

    fn dispatch_before(&mut self, action: &mut Action) -> Result<()> {
        let handlers = Arc::clone(&self.handlers);
        for handler in handlers.iter_for(EventKind::ActionBefore) {
            // A handler that already substituted anywhere in this action's
            // lineage is skipped, so substitution chains terminate.
            if action.substituted_by(handler.name()) {
                continue;
            }
            match handler.on_phase(self, ActionPhase::Before, action)? {
                Ruling::Continue => {}
                Ruling::Substitute(replacement) => {
                    log::debug!(
                        "{} substitutes {} for {}",
                        handler.name(),
                        replacement.kind.label(),
                        action.kind.label()
                    );
                    *action = replacement;
                    action.stamp_substitution(handler.name());
                    self.stack.refresh_top(action);
                }
            }
        }
        Ok(())
    }

    pub(crate) fn dispatch_observe(&mut self, phase: ActionPhase, action: &mut Action) -> Result<()> {
        let handlers = Arc::clone(&self.handlers);
        for handler in handlers.iter_for(phase.event_kind()) {
            match handler.on_phase(self, phase, action)? {
                Ruling::Continue => {}
                Ruling::Substitute(_) => {
                    log::warn!(
                        "{} tried to substitute during {phase:?}; only the before phase may",
                        handler.name()
                    );
                }
            }
        }
        Ok(())
    }

    fn dispatch_begin(&mut self) -> Result<()> {
        let handlers = Arc::clone(&self.handlers);
        for handler in handlers.iter_for(EventKind::GameBegin) {
            handler.on_begin(self)?;
        }
        Ok(())
    }

    fn dispatch_migration(&mut self, kind: EventKind, event: &MigrationEvent) -> Result<()> {
        let handlers = Arc::clone(&self.handlers);
        for handler in handlers.iter_for(kind) {
            handler.on_migration(self, kind, event)?;
        }
        Ok(())
    }

    fn crash(&mut self, err: &GameError) {
        if !self.crashed {
            self.crashed = true;
            log::error!("game '{}' crashed: {err}", self.mode.name());
        }
    }

    // === Migrations ===

    /// Move cards to `to` as a single-move transaction.
    pub fn migrate_cards(&mut self, cards: &[CardId], to: ZoneId) -> Result<()> {
        let mut trans = MigrationTransaction::new();
        trans.migrate(&self.zones, cards, to);
        self.commit_migration(trans)
    }

    /// Commit a transaction: validate every move against live state, apply
    /// them all, then fire one `card_migration` and one
    /// `post_card_migration` event for the whole batch.
    ///
    /// A validation failure aborts before any card moves and is structural:
    /// the instance crashes when this happens inside an action.
    pub fn commit_migration(&mut self, trans: MigrationTransaction) -> Result<()> {
        if trans.is_empty() {
            return Ok(());
        }
        trans.validate(&self.zones)?;
        trans.apply(&mut self.zones)?;

        let event = MigrationEvent {
            moves: trans.into_moves(),
            during: self.stack.frames().last().map(|f| f.action.clone()),
        };
        log::trace!("migration committed: {} moves", event.moves.len());
        self.dispatch_migration(EventKind::CardMigration, &event)?;
        self.dispatch_migration(EventKind::PostCardMigration, &event)
    }

    /// Shuffle the draw pile with the game RNG.
    pub fn shuffle_draw_pile(&mut self) {
        let pile = self.shared.draw_pile;
        self.zones.shuffle(pile, &mut self.rng);
    }

    /// Refill an empty draw pile from the dropped pile, then shuffle. Does
    /// nothing while the draw pile still has cards or when the dropped pile
    /// has none either.
    pub(crate) fn refill_draw_pile(&mut self) -> Result<()> {
        let SharedZones {
            draw_pile, dropped, ..
        } = self.shared;
        if !self.zones.zone(draw_pile).is_empty() || self.zones.zone(dropped).is_empty() {
            return Ok(());
        }
        let cards = self.zones.cards(dropped).to_vec();
        log::debug!("reshuffling {} dropped cards into the draw pile", cards.len());
        self.migrate_cards(&cards, draw_pile)?;
        self.shuffle_draw_pile();
        Ok(())
    }

    // === Turn flow ===

    /// Run turns until the mode declares a result (or [`GameResult::Draw`]
    /// when nobody is left to take a turn).
    pub fn run(&mut self) -> Result<GameResult> {
        loop {
            if let Some(result) = &self.finished {
                return Ok(result.clone());
            }
            match self.next_turn_player() {
                Some(player) => self.run_turn(player)?,
                None => {
                    log::info!("no player can take a turn; game is a draw");
                    self.finished = Some(GameResult::Draw);
                }
            }
        }
    }

    /// Run one full turn for `player`.
    pub fn run_turn(&mut self, player: PlayerId) -> Result<()> {
        self.process_action(Action::turn(player))?;
        self.checkpoint(Checkpoint::TurnEnd(player));
        Ok(())
    }

    /// The next living player in seat order, advancing the cursor.
    fn next_turn_player(&mut self) -> Option<PlayerId> {
        let count = self.players.player_count() as u8;
        for _ in 0..count {
            let candidate = PlayerId::new(self.turn_cursor % count);
            self.turn_cursor = (self.turn_cursor + 1) % count;
            if self.players[candidate].is_alive() {
                return Some(candidate);
            }
        }
        None
    }

    pub(crate) fn begin_turn(&mut self, player: PlayerId) {
        self.turn += 1;
        let turn = self.turn;
        self.player_mut(player).add_tag("turn_count", 1);
        log::debug!("turn {turn}: {player}");
    }

    pub(crate) fn checkpoint(&mut self, at: Checkpoint) {
        if self.finished.is_some() {
            return;
        }
        let mode = Arc::clone(&self.mode);
        if let Some(result) = mode.evaluate(self, at) {
            log::info!("game '{}' finished at {at:?}: {result:?}", mode.name());
            self.finished = Some(result);
        }
    }

    pub(crate) fn mode_next_play(&mut self, player: PlayerId) -> Result<Option<Action>> {
        let mode = Arc::clone(&self.mode);
        mode.next_play(self, player)
    }

    // === Input ===

    /// Ask the input broker one question, logging the outcome.
    ///
    /// [`InputOutcome::Unavailable`] is an ordinary value; the asking site
    /// supplies the fallback.
    pub fn request_input(&mut self, players: Vec<PlayerId>, prompt: &str, query: InputQuery) -> InputOutcome {
        let request = InputRequest {
            seq: self.next_input_seq,
            players,
            prompt: prompt.to_owned(),
            query,
            timeout: self.options.input_timeout,
        };
        self.next_input_seq += 1;

        let outcome = self.input.request(&request);
        log::trace!("input #{} '{}': {outcome:?}", request.seq, request.prompt);
        self.input_log.push(InputRecord {
            seq: request.seq,
            prompt: request.prompt,
            outcome: outcome.clone(),
        });
        outcome
    }

    /// Ask `player` to pick `count` distinct cards from `zone`; fall back to
    /// a uniform random pick when the answer is unavailable or malformed.
    pub fn choose_cards_or_random(
        &mut self,
        player: PlayerId,
        zone: ZoneId,
        count: usize,
        prompt: &str,
    ) -> Vec<CardId> {
        let count = count.min(self.zones.zone(zone).len());
        if count == 0 {
            return Vec::new();
        }

        let outcome = self.request_input(vec![player], prompt, InputQuery::Cards { zone, count });
        if let InputOutcome::Answer(InputValue::Cards(chosen)) = outcome {
            if self.card_choice_valid(&chosen, zone, count) {
                return chosen;
            }
            log::debug!("{player} gave an invalid pick for '{prompt}'; choosing at random");
        }

        let mut pool = self.zones.cards(zone).to_vec();
        self.rng.shuffle(&mut pool);
        pool.truncate(count);
        pool
    }

    fn card_choice_valid(&self, chosen: &[CardId], zone: ZoneId, count: usize) -> bool {
        if chosen.len() != count {
            return false;
        }
        let mut distinct = chosen.to_vec();
        distinct.sort_unstable();
        distinct.dedup();
        distinct.len() == count && chosen.iter().all(|&c| self.zones.is_in_zone(c, zone))
    }

    // === Accessors ===

    /// The card store.
    #[must_use]
    pub fn cards(&self) -> &CardStore {
        &self.cards
    }

    /// The zones.
    #[must_use]
    pub fn zones(&self) -> &ZoneManager {
        &self.zones
    }

    /// Handles to the shared zones.
    #[must_use]
    pub fn shared_zones(&self) -> SharedZones {
        self.shared
    }

    /// All players.
    #[must_use]
    pub fn players(&self) -> &PlayerMap<Player> {
        &self.players
    }

    /// One player.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id]
    }

    /// One player, mutably.
    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id]
    }

    /// IDs of the players currently alive, in seat order.
    #[must_use]
    pub fn alive_players(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|(_, p)| p.is_alive())
            .map(|(id, _)| id)
            .collect()
    }

    /// The content registry this game was built with.
    #[must_use]
    pub fn registry(&self) -> &ContentRegistry {
        &self.registry
    }

    /// The resolved handler set.
    #[must_use]
    pub fn handlers(&self) -> &HandlerSet {
        &self.handlers
    }

    /// Engine options.
    #[must_use]
    pub fn options(&self) -> &GameOptions {
        &self.options
    }

    /// The live action stack, outermost first.
    #[must_use]
    pub fn action_stack(&self) -> &[ActionFrame] {
        self.stack.frames()
    }

    /// The innermost action currently processing.
    #[must_use]
    pub fn current_action(&self) -> Option<&Action> {
        self.stack.frames().last().map(|f| &f.action)
    }

    /// Completed turn-starts so far.
    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn
    }

    /// Whether a structural failure has invalidated this instance.
    #[must_use]
    pub fn is_crashed(&self) -> bool {
        self.crashed
    }

    /// Whether the mode has declared a result.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished.is_some()
    }

    /// The declared result, once there is one.
    #[must_use]
    pub fn result(&self) -> Option<&GameResult> {
        self.finished.as_ref()
    }

    /// Direct RNG access for content that rolls its own dice.
    pub fn rng_mut(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    /// The seed this game was built with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Snapshot of the RNG position.
    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    /// Every input outcome so far, in ask order.
    #[must_use]
    pub fn input_log(&self) -> &[InputRecord] {
        &self.input_log
    }

    /// Seed plus recorded answers: everything a faithful replay needs.
    #[must_use]
    pub fn replay_log(&self) -> ReplayLog {
        ReplayLog {
            seed: self.rng.seed(),
            answers: self.input_log.iter().map(|r| r.outcome.clone()).collect(),
        }
    }

    /// Order-independent-enough digest of observable state: zone contents,
    /// player life, skills, tags, and the turn counter. Two runs of the same
    /// seed and script fingerprint identically at every point.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        for zone in self.zones.iter() {
            zone.id().raw().hash(&mut hasher);
            zone.cards().hash(&mut hasher);
        }
        for (id, player) in self.players.iter() {
            id.hash(&mut hasher);
            player.life.hash(&mut hasher);
            player.max_life.hash(&mut hasher);
            player.skills().hash(&mut hasher);
            let mut tags: Vec<(&String, &i64)> = player.tags.iter().collect();
            tags.sort();
            tags.hash(&mut hasher);
        }
        self.turn.hash(&mut hasher);
        hasher.finish()
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("mode", &self.mode.name())
            .field("players", &self.players.player_count())
            .field("turn", &self.turn)
            .field("finished", &self.finished)
            .field("crashed", &self.crashed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardSpec, Category, Rank, Suit};
    use crate::handlers::CustomActionId;

    struct TestMode {
        seats: usize,
        deck_size: usize,
    }

    impl GameMode for TestMode {
        fn name(&self) -> &'static str {
            "test"
        }

        fn players(&self) -> Vec<PlayerSpec> {
            (0..self.seats).map(|_| PlayerSpec::new(4)).collect()
        }

        fn deck(&self, cards: &mut CardStore) {
            for i in 0..self.deck_size {
                cards.add(CardSpec::new(
                    format!("card{i}"),
                    Suit::Spade,
                    Rank::new((i % 13 + 1) as u8),
                    Category::Basic,
                ));
            }
        }
    }

    fn game() -> Game {
        Game::builder(Arc::new(TestMode {
            seats: 2,
            deck_size: 12,
        }))
        .with_seed(7)
        .build()
        .unwrap()
    }

    #[test]
    fn test_build_seeds_draw_pile() {
        let game = game();

        let pile = game.shared_zones().draw_pile;
        assert_eq!(game.zones().zone(pile).len(), 12);
        assert_eq!(game.zones().total_cards(), 12);
        assert_eq!(game.turn_number(), 0);
        assert!(!game.is_finished());
    }

    #[test]
    fn test_same_seed_same_fingerprint() {
        let a = game();
        let b = game();
        assert_eq!(a.fingerprint(), b.fingerprint());

        let c = Game::builder(Arc::new(TestMode {
            seats: 2,
            deck_size: 12,
        }))
        .with_seed(8)
        .build()
        .unwrap();
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn test_draw_moves_top_cards() {
        let mut game = game();
        let p0 = PlayerId::new(0);
        let hand = game.player(p0).zones().hand;

        let done = game.process_action(Action::draw(p0, 3)).unwrap();

        assert!(done.succeeded);
        assert_eq!(game.zones().zone(hand).len(), 3);
        assert_eq!(game.zones().zone(game.shared_zones().draw_pile).len(), 9);
        assert_eq!(game.zones().total_cards(), 12);
    }

    #[test]
    fn test_damage_and_heal_effects() {
        let mut game = game();
        let (p0, p1) = (PlayerId::new(0), PlayerId::new(1));

        game.process_action(Action::damage(p0, p1, 3)).unwrap();
        assert_eq!(game.player(p1).life, 1);

        game.process_action(Action::heal(p0, p1, 10)).unwrap();
        assert_eq!(game.player(p1).life, 4, "healing is capped at max life");
    }

    #[test]
    fn test_heal_at_full_life_is_cancelled_not_error() {
        let mut game = game();
        let p0 = PlayerId::new(0);

        let done = game.process_action(Action::heal(p0, p0, 1)).unwrap();

        assert!(done.cancelled);
        assert!(!done.succeeded);
        assert_eq!(game.player(p0).life, 4);
    }

    #[test]
    fn test_unknown_custom_action_crashes_game() {
        let mut game = game();

        let err = game
            .process_action(Action::custom(CustomActionId::new(99)))
            .unwrap_err();
        assert_eq!(err, GameError::UnknownAction(CustomActionId::new(99)));
        assert!(game.is_crashed());

        let err = game
            .process_action(Action::draw(PlayerId::new(0), 1))
            .unwrap_err();
        assert_eq!(err, GameError::Crashed);
    }

    #[test]
    fn test_depth_limit_is_structural() {
        let mut game = Game::builder(Arc::new(TestMode {
            seats: 2,
            deck_size: 4,
        }))
        .with_options(GameOptions::default().with_max_action_depth(1))
        .build()
        .unwrap();

        // A turn nests stages, which rejects at depth 1.
        let err = game.process_action(Action::turn(PlayerId::new(0))).unwrap_err();
        assert_eq!(err, GameError::DepthLimit(1));
        assert!(game.is_crashed());
    }

    #[test]
    fn test_run_reports_draw_when_nobody_alive() {
        let mut game = game();
        game.player_mut(PlayerId::new(0)).life = 0;
        game.player_mut(PlayerId::new(1)).life = 0;

        assert_eq!(game.run().unwrap(), GameResult::Draw);
        assert!(game.is_finished());
    }

    #[test]
    fn test_choose_cards_falls_back_to_random() {
        let mut game = game();
        let p0 = PlayerId::new(0);
        let hand = game.player(p0).zones().hand;
        game.process_action(Action::draw(p0, 4)).unwrap();

        // AutoDecline always declines, so the pick is random but valid.
        let picked = game.choose_cards_or_random(p0, hand, 2, "test pick");

        assert_eq!(picked.len(), 2);
        assert!(picked.iter().all(|&c| game.zones().is_in_zone(c, hand)));
        assert_ne!(picked[0], picked[1]);
        assert_eq!(game.input_log().len(), 1);
    }
}
