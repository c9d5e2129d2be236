//! Full games of tic-tac-toe through the reducer.

use serde_json::json;
use turn_engine::core::PlayerId;
use turn_engine::game::{Game, State};
use turn_engine::games::tictactoe::{self, Board, CLICK_CELL};

fn play(game: &Game<Board>, mut state: State<Board>, cells: &[usize]) -> State<Board> {
    for &cell in cells {
        let player = state.ctx.current_player;
        state = game.make_move(state, CLICK_CELL, player, &[json!(cell)]);
    }
    state
}

fn new_game() -> (Game<Board>, State<Board>) {
    let game = tictactoe::game().unwrap();
    let state = game.initial_state(2, Some(7)).unwrap();
    (game, state)
}

/// Players alternate, one cell each.
#[test]
fn test_players_alternate() {
    let (game, state) = new_game();

    let state = play(&game, state, &[4]);
    assert_eq!(state.g.cells[4], Some(PlayerId::new(0)));
    assert_eq!(state.ctx.current_player, PlayerId::new(1));
    assert_eq!(state.ctx.turn, 2);

    let state = play(&game, state, &[0]);
    assert_eq!(state.g.cells[0], Some(PlayerId::new(1)));
    assert_eq!(state.ctx.current_player, PlayerId::new(0));
}

/// First player wins along the top row.
#[test]
fn test_win() {
    let (game, state) = new_game();

    // X: 0, 1, 2   O: 3, 4
    let state = play(&game, state, &[0, 3, 1, 4, 2]);
    assert_eq!(state.ctx.gameover, Some(json!({ "winner": 0 })));
    assert_eq!(state.g.winner(), Some(PlayerId::new(0)));

    let after = play(&game, state.clone(), &[8]);
    assert_eq!(after, state);
}

/// A full board without a line is a draw.
#[test]
fn test_draw() {
    let (game, state) = new_game();

    // X O X
    // X O O
    // O X X
    let state = play(&game, state, &[0, 1, 2, 4, 3, 5, 7, 6, 8]);
    assert_eq!(state.ctx.gameover, Some(json!({ "draw": true })));
    assert!(state.g.is_full());
}

/// Clicking a taken cell changes nothing on the board but uses the turn.
#[test]
fn test_taken_cell_uses_turn() {
    let (game, state) = new_game();

    let state = play(&game, state, &[4, 4]);
    assert_eq!(state.g.cells[4], Some(PlayerId::new(0)));
    assert_eq!(state.g.free_cells().count(), 8);
    assert_eq!(state.ctx.current_player, PlayerId::new(0));
    assert_eq!(state.ctx.turn, 3);
}

/// The log holds one entry per click.
#[test]
fn test_log_records_clicks() {
    let (game, state) = new_game();

    let state = play(&game, state, &[0, 3, 1]);
    assert_eq!(state.log.len(), 3);
    assert_eq!(state.log[2].turn, 3);
    assert_eq!(state.log[2].player_id, Some(PlayerId::new(0)));
}
