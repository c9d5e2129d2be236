//! Engine-owned turn and phase metadata.
//!
//! ## Context
//!
//! Everything the engine tracks besides the game state `G`:
//! - Phase, turn, current player, eligible action players
//! - Play order and cursor
//! - Move statistics for the current turn and phase
//! - Game-over payload
//! - PRNG snapshot
//!
//! Uses `im` persistent vectors so every transition can produce a fresh
//! snapshot in O(1) while earlier snapshots stay valid for undo/redo and
//! replay by collaborators.

use im::Vector;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::config::PhaseId;
use super::player::{PlayerId, PlayerMap};
use super::rng::GameRngState;

/// Moves made per player within a turn or a phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveStats {
    /// Moves made by each seat.
    pub num_moves: PlayerMap<u32>,

    /// Has every player in the play order made at least one move?
    pub all_played: bool,
}

impl MoveStats {
    /// Empty statistics for `num_players` seats.
    #[must_use]
    pub fn new(num_players: usize) -> Self {
        Self {
            num_moves: PlayerMap::with_value(num_players, 0),
            all_played: false,
        }
    }

    /// Moves made by a player (0 for unknown seats).
    #[must_use]
    pub fn moves_by(&self, player: PlayerId) -> u32 {
        self.num_moves.get(player).copied().unwrap_or(0)
    }

    fn record(&mut self, player: PlayerId, play_order: &Vector<PlayerId>) {
        if let Some(count) = self.num_moves.get_mut(player) {
            *count += 1;
        }
        self.all_played = play_order.iter().all(|&p| self.moves_by(p) > 0);
    }
}

/// Turn and phase statistics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Reset at the start of every turn.
    pub turn: MoveStats,
    /// Reset at the start of every phase.
    pub phase: MoveStats,
}

/// Turn/phase metadata distinct from the game state.
///
/// Collaborators read it freely; only the engine produces new values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Context {
    num_players: usize,

    /// Turn number (starts at 1, never decreases).
    pub turn: u32,

    /// Player whose turn it is.
    pub current_player: PlayerId,

    /// Moves made this turn, by any player.
    pub num_moves: u32,

    /// Players eligible to act this turn.
    /// Most turn orders: only the current player. `Any*`/`Others*`: several.
    pub action_players: Vector<PlayerId>,

    /// Global seating order for turn rotation.
    pub play_order: Vector<PlayerId>,

    /// Cursor into `play_order` pointing at `current_player`.
    pub play_order_pos: usize,

    /// Per-turn and per-phase move statistics.
    pub stats: Stats,

    /// Active phase.
    pub phase: PhaseId,

    /// Phase that was active before the last phase transition.
    pub prev_phase: Option<PhaseId>,

    /// Payload recorded when the game ended. `None` while the game runs.
    pub gameover: Option<Value>,

    /// PRNG snapshot consumed by moves and hooks.
    pub random: GameRngState,

    /// Player performing the in-flight move.
    /// Only set in the view handed to a move; stored contexts leave it empty.
    pub player_id: Option<PlayerId>,
}

impl Context {
    /// Create the context for a fresh game.
    ///
    /// ## Defaults
    ///
    /// - `turn`: 1
    /// - `play_order`: all seats in order
    /// - `current_player` / `action_players`: Player 0
    ///
    /// The flow machine overwrites the turn-order fields when the starting
    /// phase begins.
    #[must_use]
    pub fn new(num_players: usize, seed: u64, phase: PhaseId) -> Self {
        let first = PlayerId::new(0);
        Self {
            num_players,
            turn: 1,
            current_player: first,
            num_moves: 0,
            action_players: Vector::unit(first),
            play_order: PlayerId::all(num_players).collect(),
            play_order_pos: 0,
            stats: Stats {
                turn: MoveStats::new(num_players),
                phase: MoveStats::new(num_players),
            },
            phase,
            prev_phase: None,
            gameover: None,
            random: GameRngState::from_seed(seed),
            player_id: None,
        }
    }

    /// Number of seats.
    #[must_use]
    pub fn num_players(&self) -> usize {
        self.num_players
    }

    /// Has the game ended?
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.gameover.is_some()
    }

    /// May `player` act this turn?
    #[must_use]
    pub fn is_action_player(&self, player: PlayerId) -> bool {
        self.action_players.contains(&player)
    }

    /// Position of `player` in the play order.
    #[must_use]
    pub fn position_of(&self, player: PlayerId) -> Option<usize> {
        self.play_order.iter().position(|&p| p == player)
    }

    /// Moves `player` made this turn.
    #[must_use]
    pub fn turn_moves_by(&self, player: PlayerId) -> u32 {
        self.stats.turn.moves_by(player)
    }

    /// Copy of this context with the acting player bound.
    #[must_use]
    pub fn for_player(&self, player: PlayerId) -> Context {
        Context {
            player_id: Some(player),
            ..self.clone()
        }
    }

    /// Point the cursor at `pos` and make that seat the current player.
    ///
    /// Out-of-range positions wrap to the start of the play order.
    pub(crate) fn seat_at(&mut self, pos: usize) {
        let pos = if pos < self.play_order.len() { pos } else { 0 };
        self.play_order_pos = pos;
        if let Some(&player) = self.play_order.get(pos) {
            self.current_player = player;
        }
    }

    pub(crate) fn record_move(&mut self, player: PlayerId) {
        self.num_moves += 1;
        self.stats.turn.record(player, &self.play_order);
        self.stats.phase.record(player, &self.play_order);
    }

    pub(crate) fn reset_turn(&mut self) {
        self.num_moves = 0;
        self.stats.turn = MoveStats::new(self.num_players);
    }

    pub(crate) fn reset_phase(&mut self) {
        self.stats.phase = MoveStats::new(self.num_players);
    }
}
