//! Turn-order policies.
//!
//! A policy answers three questions for the flow machine:
//! - who starts when a phase begins (`first`)
//! - who plays after the current turn (`next`, `None` ends the phase)
//! - who may act during a turn (`action_players`) and whether each of them
//!   may act only once

use std::sync::Arc;

use im::Vector;

use crate::core::{Context, PlayerId};

/// Position picker for custom orders.
pub type PositionFn<G> = Arc<dyn Fn(&G, &Context) -> usize + Send + Sync>;

/// Next-position picker for custom orders. `None` ends the phase.
pub type NextPositionFn<G> = Arc<dyn Fn(&G, &Context) -> Option<usize> + Send + Sync>;

/// Play-order override computed when a phase begins.
pub type PlayOrderFn<G> = Arc<dyn Fn(&G, &Context) -> Vec<PlayerId> + Send + Sync>;

/// Who may act during a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionPlayers {
    /// Only the current player.
    Current,
    /// Everyone in the play order.
    All,
    /// Everyone in the play order except the current player.
    Others,
}

/// Built-in and custom policies.
pub enum Policy<G> {
    /// Rotate through the play order, one active player per turn.
    RoundRobin,
    /// Each player gets one turn in play order, then the phase ends.
    Once,
    /// Everyone may act during the turn, which rotates like `RoundRobin`.
    Any,
    /// Everyone acts exactly once; the turn and the phase end once all have.
    AnyOnce,
    /// Everyone but the current player may act.
    Others,
    /// Everyone but the current player acts once; then the phase ends.
    OthersOnce,
    /// Game-supplied `first` and `next`.
    Custom {
        first: PositionFn<G>,
        next: NextPositionFn<G>,
    },
}

impl<G> Clone for Policy<G> {
    fn clone(&self) -> Self {
        match self {
            Policy::RoundRobin => Policy::RoundRobin,
            Policy::Once => Policy::Once,
            Policy::Any => Policy::Any,
            Policy::AnyOnce => Policy::AnyOnce,
            Policy::Others => Policy::Others,
            Policy::OthersOnce => Policy::OthersOnce,
            Policy::Custom { first, next } => Policy::Custom {
                first: Arc::clone(first),
                next: Arc::clone(next),
            },
        }
    }
}

impl<G> std::fmt::Debug for Policy<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Policy::RoundRobin => "RoundRobin",
            Policy::Once => "Once",
            Policy::Any => "Any",
            Policy::AnyOnce => "AnyOnce",
            Policy::Others => "Others",
            Policy::OthersOnce => "OthersOnce",
            Policy::Custom { .. } => "Custom",
        };
        f.write_str(name)
    }
}

/// A turn-order strategy: a policy plus an optional play-order override.
///
/// Strategies never touch `G`; they only read it and return positions.
///
/// ## Example
///
/// ```
/// use turn_engine::core::{Context, PhaseId, PlayerId};
/// use turn_engine::turn_order::TurnOrder;
///
/// let order: TurnOrder<()> = TurnOrder::round_robin();
/// let ctx = Context::new(3, 0, PhaseId::default_phase());
/// assert_eq!(order.next(&(), &ctx), Some(1));
/// ```
pub struct TurnOrder<G> {
    policy: Policy<G>,
    play_order: Option<PlayOrderFn<G>>,
}

impl<G> Clone for TurnOrder<G> {
    fn clone(&self) -> Self {
        Self {
            policy: self.policy.clone(),
            play_order: self.play_order.clone(),
        }
    }
}

impl<G> std::fmt::Debug for TurnOrder<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnOrder")
            .field("policy", &self.policy)
            .field("play_order", &self.play_order.is_some())
            .finish()
    }
}

impl<G> Default for TurnOrder<G> {
    fn default() -> Self {
        Self::round_robin()
    }
}

impl<G> TurnOrder<G> {
    fn from_policy(policy: Policy<G>) -> Self {
        Self {
            policy,
            play_order: None,
        }
    }

    /// One active player, rotating through the play order.
    #[must_use]
    pub fn round_robin() -> Self {
        Self::from_policy(Policy::RoundRobin)
    }

    /// One turn per player in play order, then the phase ends.
    #[must_use]
    pub fn once() -> Self {
        Self::from_policy(Policy::Once)
    }

    /// Everyone may act; turns rotate like round robin.
    #[must_use]
    pub fn any() -> Self {
        Self::from_policy(Policy::Any)
    }

    /// Everyone acts exactly once, then the phase ends.
    #[must_use]
    pub fn any_once() -> Self {
        Self::from_policy(Policy::AnyOnce)
    }

    /// Everyone but the current player may act.
    #[must_use]
    pub fn others() -> Self {
        Self::from_policy(Policy::Others)
    }

    /// Everyone but the current player acts once, then the phase ends.
    #[must_use]
    pub fn others_once() -> Self {
        Self::from_policy(Policy::OthersOnce)
    }

    /// Game-defined rotation.
    pub fn custom<F, N>(first: F, next: N) -> Self
    where
        F: Fn(&G, &Context) -> usize + Send + Sync + 'static,
        N: Fn(&G, &Context) -> Option<usize> + Send + Sync + 'static,
    {
        Self::from_policy(Policy::Custom {
            first: Arc::new(first),
            next: Arc::new(next),
        })
    }

    /// Recompute the play order whenever a phase using this order begins.
    #[must_use]
    pub fn with_play_order<F>(mut self, play_order: F) -> Self
    where
        F: Fn(&G, &Context) -> Vec<PlayerId> + Send + Sync + 'static,
    {
        self.play_order = Some(Arc::new(play_order));
        self
    }

    /// Play order for a phase that is beginning, if this order overrides it.
    #[must_use]
    pub fn play_order(&self, g: &G, ctx: &Context) -> Option<Vec<PlayerId>> {
        self.play_order.as_ref().map(|f| f(g, ctx))
    }

    /// Position of the first player when a phase begins.
    #[must_use]
    pub fn first(&self, g: &G, ctx: &Context) -> usize {
        match &self.policy {
            Policy::Once => 0,
            Policy::Custom { first, .. } => first(g, ctx),
            _ => ctx.play_order_pos,
        }
    }

    /// Position of the player after the current turn. `None` ends the phase.
    #[must_use]
    pub fn next(&self, g: &G, ctx: &Context) -> Option<usize> {
        let len = ctx.play_order.len().max(1);
        let pos = ctx.play_order_pos;
        match &self.policy {
            Policy::RoundRobin | Policy::Any | Policy::Others => Some((pos + 1) % len),
            Policy::Once => (pos + 1 < len).then_some(pos + 1),
            Policy::AnyOnce | Policy::OthersOnce => Some(pos),
            Policy::Custom { next, .. } => next(g, ctx),
        }
    }

    /// Which players may act during a turn.
    #[must_use]
    pub fn action_players_kind(&self) -> ActionPlayers {
        match &self.policy {
            Policy::Any | Policy::AnyOnce => ActionPlayers::All,
            Policy::Others | Policy::OthersOnce => ActionPlayers::Others,
            _ => ActionPlayers::Current,
        }
    }

    /// Players eligible to act in a turn that is beginning.
    #[must_use]
    pub fn action_players(&self, ctx: &Context) -> Vector<PlayerId> {
        match self.action_players_kind() {
            ActionPlayers::Current => Vector::unit(ctx.current_player),
            ActionPlayers::All => ctx.play_order.clone(),
            ActionPlayers::Others => ctx
                .play_order
                .iter()
                .copied()
                .filter(|&p| p != ctx.current_player)
                .collect(),
        }
    }

    /// Does each action player get exactly one move per turn?
    #[must_use]
    pub fn once_per_player(&self) -> bool {
        matches!(self.policy, Policy::AnyOnce | Policy::OthersOnce)
    }

    /// Does completing a turn also end the phase?
    #[must_use]
    pub fn ends_phase_when_done(&self) -> bool {
        self.once_per_player()
    }

    /// Has every eligible player used their single move?
    ///
    /// Always `false` for policies that do not limit players to one move.
    #[must_use]
    pub fn is_turn_complete(&self, ctx: &Context) -> bool {
        self.once_per_player() && ctx.action_players.is_empty()
    }
}
