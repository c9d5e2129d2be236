//! Plugin registration and the function-wrapping pipeline.
//!
//! Plugins are composed like middleware: the first registered plugin is
//! outermost, so for plugins `[P1, P2]` a call runs
//! `P1-pre, P2-pre, fn, P2-post, P1-post`.
//!
//! Wrapping happens once when a `Game` is built; nothing is re-wrapped per
//! call and there is no global registry.

use std::sync::Arc;

use crate::core::Context;

use super::function::GameFn;

/// Transform applied to every move and hook.
pub type FnWrap<G> = Arc<dyn Fn(GameFn<G>) -> GameFn<G> + Send + Sync>;

/// Setup contribution, run once after the game's own setup.
pub type PluginSetup<G> = Arc<dyn Fn(G, &Context) -> G + Send + Sync>;

/// A cross-cutting extension.
///
/// Both capabilities are optional; a plugin without `fn_wrap` is skipped
/// during wrapping and one without `setup` leaves the initial state alone.
pub struct Plugin<G> {
    name: String,
    fn_wrap: Option<FnWrap<G>>,
    setup: Option<PluginSetup<G>>,
}

impl<G: 'static> Plugin<G> {
    /// Create a plugin with no capabilities.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fn_wrap: None,
            setup: None,
        }
    }

    /// Set the wrapping transform (builder pattern).
    #[must_use]
    pub fn with_fn_wrap<F>(mut self, wrap: F) -> Self
    where
        F: Fn(GameFn<G>) -> GameFn<G> + Send + Sync + 'static,
    {
        self.fn_wrap = Some(Arc::new(wrap));
        self
    }

    /// Set the setup contribution (builder pattern).
    #[must_use]
    pub fn with_setup<F>(mut self, setup: F) -> Self
    where
        F: Fn(G, &Context) -> G + Send + Sync + 'static,
    {
        self.setup = Some(Arc::new(setup));
        self
    }

    /// Plugin name (for debugging).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Does this plugin wrap functions?
    #[must_use]
    pub fn wraps(&self) -> bool {
        self.fn_wrap.is_some()
    }

    /// Apply this plugin's wrap to `f`, or return `f` unchanged.
    #[must_use]
    pub fn wrap(&self, f: GameFn<G>) -> GameFn<G> {
        match &self.fn_wrap {
            Some(wrap) => wrap(f),
            None => f,
        }
    }

    /// Apply this plugin's setup to `g`, or return `g` unchanged.
    #[must_use]
    pub fn setup(&self, g: G, ctx: &Context) -> G {
        match &self.setup {
            Some(setup) => setup(g, ctx),
            None => g,
        }
    }
}

impl<G> Clone for Plugin<G> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            fn_wrap: self.fn_wrap.clone(),
            setup: self.setup.clone(),
        }
    }
}

impl<G> std::fmt::Debug for Plugin<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name)
            .field("fn_wrap", &self.fn_wrap.is_some())
            .field("setup", &self.setup.is_some())
            .finish()
    }
}

/// Wrap `f` with `plugins`, first plugin outermost.
#[must_use]
pub fn wrap<G: 'static>(f: GameFn<G>, plugins: &[Plugin<G>]) -> GameFn<G> {
    plugins.iter().rev().fold(f, |inner, plugin| plugin.wrap(inner))
}

/// An ordered plugin list.
#[derive(Clone, Debug)]
pub struct Pipeline<G> {
    plugins: Vec<Plugin<G>>,
}

impl<G: 'static> Pipeline<G> {
    /// Create a pipeline from plugins in registration order.
    #[must_use]
    pub fn new(plugins: Vec<Plugin<G>>) -> Self {
        Self { plugins }
    }

    /// Registered plugins.
    #[must_use]
    pub fn plugins(&self) -> &[Plugin<G>] {
        &self.plugins
    }

    /// Wrap a move or hook.
    #[must_use]
    pub fn wrap(&self, f: GameFn<G>) -> GameFn<G> {
        wrap(f, &self.plugins)
    }

    /// Wrap an optional hook.
    #[must_use]
    pub fn wrap_opt(&self, f: Option<GameFn<G>>) -> Option<GameFn<G>> {
        f.map(|f| self.wrap(f))
    }

    /// Run every plugin setup in registration order.
    #[must_use]
    pub fn setup(&self, g: G, ctx: &Context) -> G {
        self.plugins.iter().fold(g, |g, plugin| plugin.setup(g, ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PhaseId;
    use crate::plugins::FnContext;

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

    fn run(f: &GameFn<Trail>) -> Trail {
        let ctx = Context::new(2, 0, PhaseId::default_phase());
        let mut fctx = FnContext::new(&ctx);
        f.call(&Vec::new(), &mut fctx, &[]).unwrap_or_default()
    }

    fn mark_move() -> GameFn<Trail> {
        GameFn::new(|g: &Trail, _, _| {
            let mut g = g.clone();
            g.push("move".into());
            Some(g)
        })
    }

    #[test]
    fn test_wrap_order_is_onion() {
        let pipeline = Pipeline::new(vec![marker("P1"), marker("P2")]);
        let wrapped = pipeline.wrap(mark_move());

        assert_eq!(run(&wrapped), vec!["P1-pre", "P2-pre", "move", "P2-post", "P1-post"]);
    }

    #[test]
    fn test_plugin_without_wrap_is_skipped() {
        let pipeline = Pipeline::new(vec![Plugin::new("noop"), marker("P1")]);
        let wrapped = pipeline.wrap(mark_move());

        assert_eq!(run(&wrapped), vec!["P1-pre", "move", "P1-post"]);
        assert!(!pipeline.plugins()[0].wraps());
    }

    #[test]
    fn test_setup_runs_in_order() {
        let pipeline = Pipeline::new(vec![
            Plugin::new("a").with_setup(|mut g: Trail, _| {
                g.push("a".into());
                g
            }),
            Plugin::new("b"),
            Plugin::new("c").with_setup(|mut g: Trail, ctx| {
                g.push(format!("c{}", ctx.num_players()));
                g
            }),
        ]);
        let ctx = Context::new(3, 0, PhaseId::default_phase());

        assert_eq!(pipeline.setup(Vec::new(), &ctx), vec!["a", "c3"]);
    }

    #[test]
    fn test_wrap_is_deterministic() {
        let plugins = vec![marker("P1"), marker("P2")];
        let first = wrap(mark_move(), &plugins);
        let second = wrap(mark_move(), &plugins);

        assert_eq!(run(&first), run(&second));
    }
}
