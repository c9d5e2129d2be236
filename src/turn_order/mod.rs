//! Turn-order strategies.
//!
//! A strategy decides who acts when a phase begins, who acts after each
//! turn, which players are eligible during a turn, and whether the turn is
//! complete on its own (independent of any game-specific `end_turn_if`).
//!
//! | constructor                   | eligible players   | ends when             |
//! |-------------------------------|--------------------|-----------------------|
//! | [`TurnOrder::round_robin`]    | current            | game says so          |
//! | [`TurnOrder::once`]           | current            | last seat played      |
//! | [`TurnOrder::any`]            | everyone           | game says so          |
//! | [`TurnOrder::any_once`]       | everyone, once     | everyone moved        |
//! | [`TurnOrder::others`]         | all but current    | game says so          |
//! | [`TurnOrder::others_once`]    | all but current, once | all others moved   |
//! | [`TurnOrder::custom`]         | current            | game says so          |

mod policy;

pub use policy::{ActionPlayers, NextPositionFn, PlayOrderFn, Policy, PositionFn, TurnOrder};
