//! Plugin pipeline tests through a built game.

use serde_json::Value;
use turn_engine::core::{GameConfig, PhaseConfig, PlayerId};
use turn_engine::game::Game;
use turn_engine::plugins::{self, FnContext, GameFn, Plugin};

type Trail = Vec<String>;

fn marker(name: &'static str) -> Plugin<Trail> {
    Plugin::new(name).with_fn_wrap(move |inner: GameFn<Trail>| {
        GameFn::new(move |g: &Trail, fctx, args| {
            let mut pre = g.clone();
            pre.push(format!("{name}-pre"));
            let mut post = inner.call(&pre, fctx, args).unwrap_or(pre);
            post.push(format!("{name}-post"));
            Some(post)
        })
    })
}

fn mark(g: &Trail, _: &mut FnContext<'_>, _: &[Value]) -> Option<Trail> {
    let mut g = g.clone();
    g.push("move".into());
    Some(g)
}

/// First registered plugin is outermost around moves.
#[test]
fn test_move_wrap_order() {
    let config = GameConfig::<Trail>::new("onion")
        .with_move("mark", mark)
        .with_plugin(marker("P1"))
        .with_plugin(marker("P2"));
    let game = Game::new(config).unwrap();
    let state = game.initial_state(2, Some(1)).unwrap();

    let state = game.make_move(state, "mark", PlayerId::new(0), &[]);
    assert_eq!(state.g, vec!["P1-pre", "P2-pre", "move", "P2-post", "P1-post"]);
}

/// Hooks go through the same pipeline as moves.
#[test]
fn test_hooks_are_wrapped() {
    let config = GameConfig::<Trail>::new("hooked")
        .with_flow(PhaseConfig::<Trail>::new().on_turn_begin(|g: &Trail, _| {
            let mut g = g.clone();
            g.push("turn".into());
            Some(g)
        }))
        .with_plugin(marker("P1"));
    let game = Game::new(config).unwrap();
    let state = game.initial_state(2, Some(1)).unwrap();

    assert_eq!(state.g, vec!["P1-pre", "turn", "P1-post"]);
}

/// Plugin setups run after the game setup, in registration order.
#[test]
fn test_plugin_setup_order() {
    let config = GameConfig::<Trail>::from_setup("seeded", |_| vec!["game".to_string()])
        .with_plugin(Plugin::new("first").with_setup(|mut g: Trail, _| {
            g.push("first".into());
            g
        }))
        .with_plugin(Plugin::new("second").with_setup(|mut g: Trail, ctx| {
            g.push(format!("second:{}", ctx.num_players()));
            g
        }));
    let game = Game::new(config).unwrap();
    let state = game.initial_state(3, Some(1)).unwrap();

    assert_eq!(state.g, vec!["game", "first", "second:3"]);
}

/// A plugin can veto a move by swallowing its result.
#[test]
fn test_plugin_can_discard_result() {
    let freeze = Plugin::new("freeze").with_fn_wrap(|inner: GameFn<Trail>| {
        GameFn::new(move |g: &Trail, fctx, args| {
            inner.call(g, fctx, args);
            None
        })
    });
    let config = GameConfig::<Trail>::new("frozen")
        .with_move("mark", mark)
        .with_plugin(freeze);
    let game = Game::new(config).unwrap();
    let state = game.initial_state(2, Some(1)).unwrap();

    let state = game.make_move(state, "mark", PlayerId::new(0), &[]);
    assert!(state.g.is_empty());
    assert_eq!(state.ctx.num_moves, 1);
}

/// The trace plugin does not change results.
#[test]
fn test_trace_plugin_is_transparent() {
    let game = Game::new(
        GameConfig::<Trail>::new("traced")
            .with_move("mark", mark)
            .with_plugin(plugins::trace()),
    )
    .unwrap();
    let state = game.initial_state(2, Some(1)).unwrap();

    let state = game.make_move(state, "mark", PlayerId::new(0), &[]);
    assert_eq!(state.g, vec!["move"]);
}
