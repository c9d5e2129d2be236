//! Tic-tac-toe rules.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::core::{ConfigError, Context, GameConfig, PlayerId};
use crate::game::Game;
use crate::plugins::FnContext;

/// Name of the only move.
pub const CLICK_CELL: &str = "clickCell";

/// Every winning line, as cell indices.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// A 3x3 board, row-major.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub cells: [Option<PlayerId>; 9],
}

impl Board {
    /// Board with `player` in cell `index`, if that cell exists and is free.
    #[must_use]
    pub fn claim(&self, index: usize, player: PlayerId) -> Option<Board> {
        match self.cells.get(index) {
            Some(None) => {
                let mut next = self.clone();
                next.cells[index] = Some(player);
                Some(next)
            }
            _ => None,
        }
    }

    /// Owner of a complete line, if any.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        LINES.iter().find_map(|&[a, b, c]| match (self.cells[a], self.cells[b], self.cells[c]) {
            (Some(x), Some(y), Some(z)) if x == y && y == z => Some(x),
            _ => None,
        })
    }

    /// Is every cell taken?
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Indices of the free cells.
    pub fn free_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| cell.is_none().then_some(i))
    }
}

fn click_cell(board: &Board, fctx: &mut FnContext<'_>, args: &[Value]) -> Option<Board> {
    let player = fctx.player_id()?;
    let index = args.first().and_then(Value::as_u64)?;
    board.claim(usize::try_from(index).ok()?, player)
}

fn outcome(board: &Board, _ctx: &Context) -> Option<Value> {
    if let Some(winner) = board.winner() {
        return Some(json!({ "winner": winner.0 }));
    }
    board.is_full().then(|| json!({ "draw": true }))
}

/// The game description: one claim per turn, round robin.
#[must_use]
pub fn config() -> GameConfig<Board> {
    GameConfig::new("tic-tac-toe")
        .with_move(CLICK_CELL, click_cell)
        .with_move_limit(1)
        .end_if(outcome)
}

/// The built game.
pub fn game() -> Result<Game<Board>, ConfigError> {
    Game::new(config())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(cells: &[(usize, u8)]) -> Board {
        let mut board = Board::default();
        for &(i, p) in cells {
            board.cells[i] = Some(PlayerId::new(p));
        }
        board
    }

    #[test]
    fn test_claim() {
        let empty = Board::default();
        let once = empty.claim(4, PlayerId::new(0)).unwrap();

        assert_eq!(once.cells[4], Some(PlayerId::new(0)));
        assert!(once.claim(4, PlayerId::new(1)).is_none());
        assert!(empty.claim(9, PlayerId::new(0)).is_none());
        assert_eq!(once.free_cells().count(), 8);
    }

    #[test]
    fn test_winner_lines() {
        assert_eq!(board(&[(0, 1), (4, 1), (8, 1)]).winner(), Some(PlayerId::new(1)));
        assert_eq!(board(&[(2, 0), (5, 0), (8, 0)]).winner(), Some(PlayerId::new(0)));
        assert_eq!(board(&[(0, 0), (1, 1), (2, 0)]).winner(), None);
    }

    #[test]
    fn test_outcome() {
        let ctx = Context::new(2, 0, crate::core::PhaseId::default_phase());
        let draw = board(&[
            (0, 0), (1, 1), (2, 0),
            (3, 0), (4, 1), (5, 1),
            (6, 1), (7, 0), (8, 0),
        ]);

        assert_eq!(outcome(&draw, &ctx), Some(json!({ "draw": true })));
        assert_eq!(outcome(&board(&[(3, 1), (4, 1), (5, 1)]), &ctx), Some(json!({ "winner": 1 })));
        assert_eq!(outcome(&Board::default(), &ctx), None);
    }

    #[test]
    fn test_game_builds() {
        let game = game().unwrap();
        assert_eq!(game.move_names(), [CLICK_CELL]);
    }
}
