//! The events handle available to moves and hooks.
//!
//! Calling a method records the request; the flow machine applies the
//! requests in order as soon as the function returns, within the same
//! reducer call. Nothing is deferred to a later action.

use serde_json::Value;
use smallvec::SmallVec;

use crate::core::{GameEvent, PhaseId, PlayerId};

/// Lifecycle requests raised by the running function.
///
/// ## Example
///
/// ```
/// use turn_engine::core::PlayerId;
/// use turn_engine::flow::Events;
///
/// let mut events = Events::default();
/// events.end_turn(Some(PlayerId::new(2)));
/// assert_eq!(events.len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Events {
    queued: SmallVec<[GameEvent; 2]>,
}

impl Events {
    /// End the current turn, optionally handing it to `next`.
    pub fn end_turn(&mut self, next: Option<PlayerId>) {
        self.queued.push(GameEvent::EndTurn { next });
    }

    /// End the current phase, optionally moving to `next`.
    pub fn end_phase(&mut self, next: Option<PhaseId>) {
        self.queued.push(GameEvent::EndPhase { next });
    }

    /// End the game. `None` records `true` as the payload.
    pub fn end_game(&mut self, payload: Option<Value>) {
        self.queued.push(GameEvent::EndGame { payload });
    }

    /// Number of recorded requests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queued.len()
    }

    /// Were no requests recorded?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    pub(crate) fn into_vec(self) -> Vec<GameEvent> {
        self.queued.into_vec()
    }
}
