//! Tic-tac-toe on the engine.
//!
//! - Two (or more) players take turns claiming one cell each
//! - `clickCell` takes the cell index `0..9` as its only argument
//! - Claiming an occupied cell leaves the board alone but still uses the turn
//! - Three in a row wins; a full board without a line is a draw
//!
//! The game is used by the integration tests and the benchmark.

mod game;

pub use game::{config, game, Board, CLICK_CELL, LINES};
