//! Applying actions.
//!
//! Input that cannot be applied (unknown move, disallowed move, finished
//! game, nothing to undo) returns the state untouched. Nothing here panics
//! or returns an error on player input.

use std::borrow::Cow;

use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::core::{
    Action, ConfigError, Context, GameEvent, LogEntry, LoggedAction, MoveAction, PhaseId, PlayerId,
    MAX_PLAYERS,
};
use crate::plugins::FnContext;

use super::state::State;
use super::Game;

impl<G: Clone + 'static> Game<G> {
    /// Create the state of a new game.
    ///
    /// The seed falls back to the configured seed, then to a random one.
    /// Setup runs first, then every plugin setup in registration order, then
    /// the starting phase and first turn begin.
    #[instrument(level = "debug", skip(self), fields(game = %self.name))]
    pub fn initial_state(
        &self,
        num_players: usize,
        seed: Option<u64>,
    ) -> Result<State<G>, ConfigError> {
        if num_players == 0 {
            return Err(ConfigError::NoPlayers);
        }
        if num_players > MAX_PLAYERS {
            return Err(ConfigError::TooManyPlayers {
                requested: num_players,
                max: MAX_PLAYERS,
            });
        }

        let seed = seed.or(self.seed).unwrap_or_else(rand::random);
        let mut ctx = Context::new(num_players, seed, self.flow.starting_phase().clone());

        let mut fctx = FnContext::new(&ctx);
        let g = (self.setup)(&mut fctx);
        let (random, events) = fctx.finish();
        if !events.is_empty() {
            trace!(count = events.len(), "ignoring events raised during setup");
        }
        ctx.random = random;

        let g = self.pipeline.setup(g, &ctx);
        let mut state = State::new(g, ctx);
        self.flow.start(&mut state);
        Ok(state)
    }

    /// Apply one action.
    pub fn apply(&self, mut state: State<G>, action: impl Into<Action>) -> State<G> {
        if state.ctx.is_over() {
            trace!(state_id = state.state_id, "game is over, ignoring action");
            return state;
        }

        match action.into() {
            Action::MakeMove(action) => self.apply_move(state, action),
            Action::GameEvent { event, player_id } => self.apply_event(state, event, player_id),
            Action::Undo => {
                if state.undo() {
                    state.state_id += 1;
                    debug!(turn = state.ctx.turn, "move undone");
                } else {
                    trace!("nothing to undo");
                }
                state
            }
            Action::Redo => {
                if state.redo() {
                    state.state_id += 1;
                    debug!(turn = state.ctx.turn, "move redone");
                } else {
                    trace!("nothing to redo");
                }
                state
            }
        }
    }

    fn apply_move(&self, mut state: State<G>, action: MoveAction) -> State<G> {
        if !self.flow.has_phase(&state.ctx.phase) {
            trace!(phase = %state.ctx.phase, "move in unknown phase");
            return state;
        }
        let phase = self.flow.phase(&state.ctx.phase);
        let Some(invocation) = self.dispatcher.invoke(phase, &state.g, &action, &state.ctx) else {
            return state;
        };

        let turn = state.ctx.turn;
        let phase_id = state.ctx.phase.clone();
        if let Some(g) = invocation.g {
            state.g = g;
        }
        state.ctx.random = invocation.random;

        let mut cascade = self.flow.cascade();
        self.flow.after_move(&mut state, &action, invocation.events, &mut cascade);

        debug!(
            name = %action.name,
            player = %action.player_id,
            transitions = cascade.transitions(),
            "move applied"
        );
        let entry = LogEntry {
            player_id: Some(action.player_id),
            action: LoggedAction::Move {
                name: action.name,
                args: action.args,
            },
            turn,
            phase: phase_id,
            redact: invocation.redact,
        };
        state.log.push_back(entry.clone());
        if state.ctx.turn == turn && !state.ctx.is_over() {
            state.push_history(invocation.undoable, Some(entry));
        }
        state.state_id += 1;
        state
    }

    fn apply_event(
        &self,
        mut state: State<G>,
        event: GameEvent,
        player_id: Option<PlayerId>,
    ) -> State<G> {
        let entry = LogEntry {
            player_id,
            action: LoggedAction::Event(event.clone()),
            turn: state.ctx.turn,
            phase: state.ctx.phase.clone(),
            redact: false,
        };

        let mut cascade = self.flow.cascade();
        self.flow.process_event(&mut state, event, &mut cascade);
        if cascade.transitions() == 0 && !state.ctx.is_over() {
            trace!(event = entry_name(&entry), "event had no effect");
            return state;
        }

        debug!(event = entry_name(&entry), transitions = cascade.transitions(), "event applied");
        state.log.push_back(entry);
        state.state_id += 1;
        state
    }

    /// Run a move against `g` without touching any flow state.
    ///
    /// Returns the borrowed input when the move does not resolve or leaves
    /// the state unchanged.
    #[must_use]
    pub fn process_move<'a>(&self, g: &'a G, action: &MoveAction, ctx: &Context) -> Cow<'a, G> {
        if ctx.is_over() {
            return Cow::Borrowed(g);
        }
        if !self.flow.has_phase(&ctx.phase) {
            trace!(phase = %ctx.phase, "move in unknown phase");
            return Cow::Borrowed(g);
        }
        let phase = self.flow.phase(&ctx.phase);
        match self.dispatcher.invoke(phase, g, action, ctx).and_then(|inv| inv.g) {
            Some(next) => Cow::Owned(next),
            None => Cow::Borrowed(g),
        }
    }

    /// The state as `player` may see it (`None` = spectator).
    #[must_use]
    pub fn player_view<'a>(&self, g: &'a G, ctx: &Context, player: Option<PlayerId>) -> Cow<'a, G> {
        match &self.player_view {
            Some(view) => Cow::Owned(view(g, ctx, player)),
            None => Cow::Borrowed(g),
        }
    }

    /// Shorthand for applying a [`MoveAction`].
    pub fn make_move(
        &self,
        state: State<G>,
        name: &str,
        player: PlayerId,
        args: &[Value],
    ) -> State<G> {
        self.apply(state, MoveAction::with_args(name, player, args))
    }

    /// Shorthand for an `EndTurn` event.
    pub fn end_turn(&self, state: State<G>, next: Option<PlayerId>) -> State<G> {
        self.apply(state, GameEvent::EndTurn { next })
    }

    /// Shorthand for an `EndPhase` event.
    pub fn end_phase(&self, state: State<G>, next: Option<PhaseId>) -> State<G> {
        self.apply(state, GameEvent::EndPhase { next })
    }

    /// Shorthand for an `EndGame` event.
    pub fn end_game(&self, state: State<G>, payload: Option<Value>) -> State<G> {
        self.apply(state, GameEvent::EndGame { payload })
    }

    /// Shorthand for `Action::Undo`.
    pub fn undo(&self, state: State<G>) -> State<G> {
        self.apply(state, Action::Undo)
    }

    /// Shorthand for `Action::Redo`.
    pub fn redo(&self, state: State<G>) -> State<G> {
        self.apply(state, Action::Redo)
    }
}

fn entry_name(entry: &LogEntry) -> &'static str {
    match &entry.action {
        LoggedAction::Event(event) => event.name(),
        LoggedAction::Move { .. } => "move",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;
    use serde_json::json;

    fn counter() -> Game<i64> {
        Game::new(
            GameConfig::<i64>::new("counter")
                .with_move("add", |g: &i64, _, args| {
                    Some(g + args.first().and_then(Value::as_i64).unwrap_or(1))
                })
                .with_move("noop", |_: &i64, _, _| None),
        )
        .unwrap()
    }

    #[test]
    fn test_initial_state_player_bounds() {
        let game = counter();

        assert_eq!(game.initial_state(0, None).unwrap_err(), ConfigError::NoPlayers);
        assert!(matches!(
            game.initial_state(256, None),
            Err(ConfigError::TooManyPlayers { requested: 256, .. })
        ));
        assert!(game.initial_state(255, Some(1)).is_ok());
    }

    #[test]
    fn test_move_logged_and_counted() {
        let game = counter();
        let state = game.initial_state(2, Some(1)).unwrap();
        let state = game.make_move(state, "add", PlayerId::new(0), &[json!(3)]);

        assert_eq!(state.g, 3);
        assert_eq!(state.ctx.num_moves, 1);
        assert_eq!(state.log.len(), 1);
        assert_eq!(state.state_id, 1);
    }

    #[test]
    fn test_none_result_still_counts_as_move() {
        let game = counter();
        let state = game.initial_state(2, Some(1)).unwrap();
        let state = game.make_move(state, "noop", PlayerId::new(0), &[]);

        assert_eq!(state.g, 0);
        assert_eq!(state.ctx.num_moves, 1);
    }

    #[test]
    fn test_unknown_move_is_ignored() {
        let game = counter();
        let before = game.initial_state(2, Some(1)).unwrap();
        let after = game.make_move(before.clone(), "missing", PlayerId::new(0), &[]);

        assert_eq!(after, before);
    }

    #[test]
    fn test_process_move_borrows_on_no_change() {
        let game = counter();
        let state = game.initial_state(2, Some(1)).unwrap();

        let run = |name: &str| {
            let action = MoveAction::new(name, PlayerId::new(0));
            game.process_move(&state.g, &action, &state.ctx)
        };

        let same = run("noop");
        assert!(matches!(same, Cow::Borrowed(_)));

        let unknown = run("missing");
        assert!(matches!(unknown, Cow::Borrowed(_)));

        let changed = run("add");
        assert_eq!(changed.into_owned(), 1);
    }

    #[test]
    fn test_events_from_caller() {
        let game = counter();
        let state = game.initial_state(3, Some(1)).unwrap();

        let state = game.end_turn(state, Some(PlayerId::new(2)));
        assert_eq!(state.ctx.current_player, PlayerId::new(2));
        assert_eq!(state.ctx.turn, 2);

        let state = game.end_game(state, None);
        assert_eq!(state.ctx.gameover, Some(json!(true)));
        assert_eq!(state.log.len(), 2);
    }
}
