//! Phase/turn state machine.
//!
//! ## Transitions
//!
//! ```text
//! start:       begin_phase(starting) -> begin_turn -> settle
//! after move:  on_move -> [requested events | automatic checks] -> settle
//! end_turn:    on_turn_end -> next player | end of phase
//! end_phase:   on_turn_end -> on_phase_end -> begin_phase(next) -> begin_turn
//! settle:      game over? -> end_phase_if? -> next pending event -> repeat
//! ```
//!
//! Events raised by hooks are appended to the cascade's pending queue and
//! applied before the reducer call returns. A phase ends automatically at
//! most once per call and the number of transitions per call is capped, so
//! misconfigured games cannot loop forever.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use serde_json::Value;
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::core::config::EndGameIfFn;
use crate::core::{GameEvent, MoveAction, PhaseId, PlayerId};
use crate::game::State;
use crate::plugins::{FnContext, GameFn};

use super::phase::Phase;

/// Bookkeeping for one reducer call.
#[derive(Debug)]
pub(crate) struct Cascade {
    pending: VecDeque<GameEvent>,
    ended: SmallVec<[PhaseId; 4]>,
    transitions: usize,
    max_transitions: usize,
}

impl Cascade {
    fn new(max_transitions: usize) -> Self {
        Self {
            pending: VecDeque::new(),
            ended: SmallVec::new(),
            transitions: 0,
            max_transitions,
        }
    }

    fn allow_transition(&mut self) -> bool {
        if self.transitions >= self.max_transitions {
            warn!(
                max = self.max_transitions,
                "transition cap reached, dropping remaining transitions"
            );
            self.pending.clear();
            return false;
        }
        self.transitions += 1;
        true
    }

    /// Number of turn/phase transitions performed so far.
    pub(crate) fn transitions(&self) -> usize {
        self.transitions
    }
}

/// The normalized flow of a built game.
pub(crate) struct Flow<G> {
    phases: FxHashMap<PhaseId, Phase<G>>,
    fallback: Phase<G>,
    starting_phase: PhaseId,
    end_if: Option<EndGameIfFn<G>>,
    on_end: Option<GameFn<G>>,
    max_transitions: usize,
}

impl<G> std::fmt::Debug for Flow<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut phases: Vec<_> = self.phases.keys().collect();
        phases.sort();
        f.debug_struct("Flow")
            .field("phases", &phases)
            .field("starting_phase", &self.starting_phase)
            .field("max_transitions", &self.max_transitions)
            .finish_non_exhaustive()
    }
}

impl<G: Clone + 'static> Flow<G> {
    /// `phases` must contain the implicit default phase.
    pub(crate) fn new(
        phases: FxHashMap<PhaseId, Phase<G>>,
        fallback: Phase<G>,
        starting_phase: PhaseId,
        end_if: Option<EndGameIfFn<G>>,
        on_end: Option<GameFn<G>>,
        max_transitions: usize,
    ) -> Self {
        Self {
            phases,
            fallback,
            starting_phase,
            end_if,
            on_end,
            max_transitions,
        }
    }

    pub(crate) fn starting_phase(&self) -> &PhaseId {
        &self.starting_phase
    }

    /// The phase with `id`, or the default phase for ids never declared.
    pub(crate) fn phase(&self, id: &PhaseId) -> &Phase<G> {
        self.phases.get(id).unwrap_or(&self.fallback)
    }

    pub(crate) fn has_phase(&self, id: &PhaseId) -> bool {
        self.phases.contains_key(id)
    }

    pub(crate) fn cascade(&self) -> Cascade {
        Cascade::new(self.max_transitions)
    }

    /// Enter the starting phase and the first turn.
    pub(crate) fn start(&self, state: &mut State<G>) {
        let mut cascade = self.cascade();
        debug!(phase = %self.starting_phase, players = state.ctx.num_players(), "game starting");
        state.ctx.phase = self.starting_phase.clone();
        self.begin_phase(state, &mut cascade);
        self.begin_turn(state, &mut cascade);
        self.settle(state, &mut cascade);
    }

    /// Account for a move that was just applied and run its consequences.
    pub(crate) fn after_move(
        &self,
        state: &mut State<G>,
        action: &MoveAction,
        events: Vec<GameEvent>,
        cascade: &mut Cascade,
    ) {
        let player = action.player_id;
        state.ctx.record_move(player);
        let phase = self.phase(&state.ctx.phase);
        if phase.turn_order.once_per_player() {
            state.ctx.action_players.retain(|&p| p != player);
        }

        cascade.pending.extend(events);
        self.run_hook(phase.on_move.as_ref(), state, Some(action), cascade);

        if cascade.pending.is_empty() {
            self.auto_end(state, player, cascade);
        }
        self.settle(state, cascade);
    }

    /// Apply an externally requested event.
    pub(crate) fn process_event(
        &self,
        state: &mut State<G>,
        event: GameEvent,
        cascade: &mut Cascade,
    ) {
        self.apply_event(state, event, cascade);
        self.settle(state, cascade);
    }

    fn auto_end(&self, state: &mut State<G>, player: PlayerId, cascade: &mut Cascade) {
        if self.check_game_over(state, cascade) {
            return;
        }
        let phase = self.phase(&state.ctx.phase);

        if let Some(end) = phase.end_phase_if.as_ref().and_then(|f| f(&state.g, &state.ctx)) {
            self.end_phase(state, end.next, cascade);
            return;
        }
        if let Some(end) = phase.end_turn_if.as_ref().and_then(|f| f(&state.g, &state.ctx)) {
            self.end_turn(state, end.next, cascade);
            return;
        }
        if phase
            .move_limit
            .is_some_and(|limit| state.ctx.turn_moves_by(player) >= limit)
        {
            self.end_turn(state, None, cascade);
            return;
        }
        if phase.turn_order.is_turn_complete(&state.ctx) {
            if phase.turn_order.ends_phase_when_done() {
                self.end_phase(state, None, cascade);
            } else {
                self.end_turn(state, None, cascade);
            }
        }
    }

    /// Drain pending events, re-checking termination between each.
    fn settle(&self, state: &mut State<G>, cascade: &mut Cascade) {
        loop {
            if self.check_game_over(state, cascade) {
                cascade.pending.clear();
                return;
            }

            let current = state.ctx.phase.clone();
            if !cascade.ended.contains(&current) {
                let phase = self.phase(&current);
                let end = phase.end_phase_if.as_ref().and_then(|f| f(&state.g, &state.ctx));
                if let Some(end) = end {
                    if self.end_phase(state, end.next, cascade) {
                        continue;
                    }
                }
            }

            match cascade.pending.pop_front() {
                Some(event) => self.apply_event(state, event, cascade),
                None => return,
            }
        }
    }

    fn apply_event(&self, state: &mut State<G>, event: GameEvent, cascade: &mut Cascade) {
        match event {
            GameEvent::EndTurn { next } => {
                self.end_turn(state, next, cascade);
            }
            GameEvent::EndPhase { next } => {
                self.end_phase(state, next, cascade);
            }
            GameEvent::EndGame { payload } => self.end_game(state, payload, cascade),
        }
    }

    /// End the current turn. Returns whether a transition happened.
    pub(crate) fn end_turn(
        &self,
        state: &mut State<G>,
        next: Option<PlayerId>,
        cascade: &mut Cascade,
    ) -> bool {
        if state.ctx.is_over() || !cascade.allow_transition() {
            return false;
        }
        let phase = self.phase(&state.ctx.phase);
        debug!(turn = state.ctx.turn, player = %state.ctx.current_player, "turn ending");

        self.run_hook(phase.on_turn_end.as_ref(), state, None, cascade);
        if self.check_game_over(state, cascade) {
            return true;
        }

        let explicit = next.and_then(|player| {
            let pos = state.ctx.position_of(player);
            if pos.is_none() {
                warn!(player = %player, "requested next player is not in the play order");
            }
            pos
        });
        match explicit.or_else(|| phase.turn_order.next(&state.g, &state.ctx)) {
            Some(pos) => {
                state.ctx.seat_at(pos);
                state.ctx.turn += 1;
                self.begin_turn(state, cascade);
            }
            None => {
                let target = phase.next.clone().unwrap_or_else(PhaseId::default_phase);
                self.leave_phase(state, target, true, cascade);
            }
        }
        true
    }

    /// End the current phase. Returns whether a transition happened.
    pub(crate) fn end_phase(
        &self,
        state: &mut State<G>,
        next: Option<PhaseId>,
        cascade: &mut Cascade,
    ) -> bool {
        if state.ctx.is_over() {
            return false;
        }
        let target = match next {
            Some(id) if self.has_phase(&id) => id,
            Some(id) => {
                warn!(phase = %id, "ignoring request to enter an unknown phase");
                return false;
            }
            None => self
                .phase(&state.ctx.phase)
                .next
                .clone()
                .unwrap_or_else(PhaseId::default_phase),
        };
        if !cascade.allow_transition() {
            return false;
        }
        self.leave_phase(state, target, false, cascade);
        true
    }

    fn leave_phase(
        &self,
        state: &mut State<G>,
        target: PhaseId,
        turn_ended: bool,
        cascade: &mut Cascade,
    ) {
        let current = state.ctx.phase.clone();
        let phase = self.phase(&current);
        if !cascade.ended.contains(&current) {
            cascade.ended.push(current.clone());
        }

        if !turn_ended {
            self.run_hook(phase.on_turn_end.as_ref(), state, None, cascade);
            if self.check_game_over(state, cascade) {
                return;
            }
        }
        self.run_hook(phase.on_phase_end.as_ref(), state, None, cascade);
        if self.check_game_over(state, cascade) {
            return;
        }

        debug!(from = %current, to = %target, turn = state.ctx.turn, "phase transition");
        state.ctx.prev_phase = Some(current);
        state.ctx.phase = target;
        self.begin_phase(state, cascade);
        state.ctx.turn += 1;
        self.begin_turn(state, cascade);
    }

    fn begin_phase(&self, state: &mut State<G>, cascade: &mut Cascade) {
        let phase = self.phase(&state.ctx.phase);
        self.run_hook(phase.on_phase_begin.as_ref(), state, None, cascade);

        if let Some(order) = phase.turn_order.play_order(&state.g, &state.ctx) {
            let num_players = state.ctx.num_players();
            if order.is_empty() || order.iter().any(|p| !p.is_seated(num_players)) {
                warn!(
                    phase = %phase.id,
                    "ignoring play order override with empty or unseated entries"
                );
            } else {
                state.ctx.play_order = order.into_iter().collect();
            }
        }

        state.ctx.reset_phase();
        let first = phase.turn_order.first(&state.g, &state.ctx);
        state.ctx.seat_at(first);
    }

    fn begin_turn(&self, state: &mut State<G>, cascade: &mut Cascade) {
        let phase = self.phase(&state.ctx.phase);
        state.ctx.reset_turn();
        state.ctx.action_players = phase.turn_order.action_players(&state.ctx);
        debug!(
            turn = state.ctx.turn,
            player = %state.ctx.current_player,
            phase = %state.ctx.phase,
            "turn beginning"
        );
        self.run_hook(phase.on_turn_begin.as_ref(), state, None, cascade);
        state.reset_history();
    }

    /// Evaluate the active game-over predicate. Returns whether the game is over.
    fn check_game_over(&self, state: &mut State<G>, cascade: &mut Cascade) -> bool {
        if state.ctx.is_over() {
            return true;
        }
        let phase = self.phase(&state.ctx.phase);
        let Some(end_if) = phase.end_game_if.as_ref().or(self.end_if.as_ref()) else {
            return false;
        };
        match end_if(&state.g, &state.ctx) {
            Some(payload) => {
                self.finish(state, payload, cascade);
                true
            }
            None => false,
        }
    }

    /// End the game immediately. A missing payload records `true`.
    pub(crate) fn end_game(
        &self,
        state: &mut State<G>,
        payload: Option<Value>,
        cascade: &mut Cascade,
    ) {
        if state.ctx.is_over() {
            return;
        }
        self.finish(state, payload.unwrap_or(Value::Bool(true)), cascade);
    }

    fn finish(&self, state: &mut State<G>, payload: Value, cascade: &mut Cascade) {
        debug!(turn = state.ctx.turn, phase = %state.ctx.phase, %payload, "game over");
        state.ctx.gameover = Some(payload);
        self.run_hook(self.on_end.as_ref(), state, None, cascade);
        cascade.pending.clear();
    }

    /// Run a hook, folding its result, RNG use and events back in.
    ///
    /// `action` is the move an `on_move` hook follows; the hook then sees
    /// the mover, the move name and its args.
    fn run_hook(
        &self,
        hook: Option<&GameFn<G>>,
        state: &mut State<G>,
        action: Option<&MoveAction>,
        cascade: &mut Cascade,
    ) {
        let Some(hook) = hook else {
            return;
        };
        let (next, random, events) = match action {
            Some(action) => {
                let view = state.ctx.for_player(action.player_id);
                let mut fctx = FnContext::for_move(&view, &action.name);
                let next = hook.call(&state.g, &mut fctx, &action.args);
                let (random, events) = fctx.finish();
                (next, random, events)
            }
            None => {
                let mut fctx = FnContext::new(&state.ctx);
                let next = hook.call(&state.g, &mut fctx, &[]);
                let (random, events) = fctx.finish();
                (next, random, events)
            }
        };

        if let Some(g) = next {
            state.g = g;
        }
        state.ctx.random = random;
        cascade.pending.extend(events);
    }
}
