//! Plugin pipeline: cross-cutting wrappers around moves and hooks.
//!
//! ## Key Components
//!
//! - [`GameFn`]: the shared signature of moves and hooks
//! - [`FnContext`]: what a running function sees (ctx, randomness, events)
//! - [`Plugin`]: optional `fn_wrap` and `setup` capabilities
//! - [`Pipeline`]: ordered plugin list, composed once per function
//!
//! ## Example Usage
//!
//! ```
//! use turn_engine::plugins::{GameFn, Pipeline, Plugin};
//!
//! // Clamp every result to at most 10
//! let clamp = Plugin::new("clamp").with_fn_wrap(|inner: GameFn<i64>| {
//!     GameFn::new(move |g, fctx, args| inner.call(g, fctx, args).map(|g| g.min(10)))
//! });
//!
//! let pipeline = Pipeline::new(vec![clamp]);
//! let add = pipeline.wrap(GameFn::new(|g: &i64, _, _| Some(g + 100)));
//! # let ctx = turn_engine::core::Context::new(1, 0, turn_engine::core::PhaseId::default_phase());
//! # let mut fctx = turn_engine::plugins::FnContext::new(&ctx);
//! assert_eq!(add.call(&0, &mut fctx, &[]), Some(10));
//! ```

mod function;
mod pipeline;
mod trace;

pub use function::{FnContext, GameFn};
pub use pipeline::{wrap, FnWrap, Pipeline, Plugin, PluginSetup};
pub use trace::trace;
