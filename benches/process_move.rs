//! Benchmarks for the reducer hot path.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::json;
use turn_engine::core::MoveAction;
use turn_engine::games::tictactoe::{self, CLICK_CELL};

fn bench_process_move(c: &mut Criterion) {
    let game = tictactoe::game().unwrap();
    let state = game.initial_state(2, Some(42)).unwrap();
    let click = MoveAction::new(CLICK_CELL, state.ctx.current_player).with_arg(json!(4));

    c.bench_function("process_move_click", |b| {
        b.iter(|| {
            let next =
                game.process_move(black_box(&state.g), black_box(&click), black_box(&state.ctx));
            black_box(next)
        });
    });
}

fn bench_full_game(c: &mut Criterion) {
    // Top-row win for the first player in five moves
    let game = tictactoe::game().unwrap();
    let cells = [0u64, 3, 1, 4, 2];

    c.bench_function("tictactoe_full_game", |b| {
        b.iter(|| {
            let mut state = game.initial_state(2, Some(black_box(42))).unwrap();
            for cell in cells {
                let player = state.ctx.current_player;
                state = game.make_move(state, CLICK_CELL, player, &[json!(cell)]);
            }
            black_box(state)
        });
    });
}

fn bench_end_turn(c: &mut Criterion) {
    let game = tictactoe::game().unwrap();
    let state = game.initial_state(4, Some(42)).unwrap();

    c.bench_function("end_turn_4p", |b| {
        b.iter(|| black_box(game.end_turn(state.clone(), None)));
    });
}

criterion_group!(benches, bench_process_move, bench_full_game, bench_end_turn);
criterion_main!(benches);
