//! Sample games built on the engine.

pub mod tictactoe;
