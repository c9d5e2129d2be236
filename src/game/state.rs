//! The value threaded through the reducer.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::{Context, LogEntry, PlayerId};

/// One entry of the in-turn undo history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct Snapshot<G> {
    pub(crate) g: G,
    pub(crate) ctx: Context,
    pub(crate) undoable: bool,
    /// Log entry of the move that reached this position.
    pub(crate) entry: Option<LogEntry>,
}

/// Game state plus engine metadata.
///
/// Every reducer call consumes a `State` and returns the next one. The
/// persistent collections make the copies cheap, so keeping old states
/// around for replay costs little.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct State<G> {
    /// Game-defined state.
    pub g: G,

    /// Turn and phase metadata.
    pub ctx: Context,

    /// Every applied move and event, in order.
    pub log: Vector<LogEntry>,

    /// Incremented by every applied action.
    pub state_id: u64,

    pub(crate) undo: Vec<Snapshot<G>>,
    pub(crate) redo: Vec<Snapshot<G>>,
}

impl<G: Clone> State<G> {
    pub(crate) fn new(g: G, ctx: Context) -> Self {
        Self {
            g,
            ctx,
            log: Vector::new(),
            state_id: 0,
            undo: Vec::new(),
            redo: Vec::new(),
        }
    }

    /// Can the last move of this turn be taken back?
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.undo.len() > 1 && self.undo.last().is_some_and(|s| s.undoable)
    }

    /// Is there an undone move to replay?
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// The log as `viewer` may see it (`None` = spectator).
    #[must_use]
    pub fn log_for(&self, viewer: Option<PlayerId>) -> Vector<LogEntry> {
        self.log.iter().map(|entry| entry.view_for(viewer)).collect()
    }

    /// Start a fresh undo history at the current position.
    pub(crate) fn reset_history(&mut self) {
        self.undo = vec![self.snapshot(true, None)];
        self.redo.clear();
    }

    /// Record the position reached by a move already in the log.
    pub(crate) fn push_history(&mut self, undoable: bool, entry: Option<LogEntry>) {
        let snapshot = self.snapshot(undoable, entry);
        self.undo.push(snapshot);
        self.redo.clear();
    }

    /// Step back one move, dropping its log entry. Returns false when
    /// nothing can be undone.
    pub(crate) fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        if let Some(last) = self.undo.pop() {
            if last.entry.is_some() && self.log.last() == last.entry.as_ref() {
                self.log.pop_back();
            }
            self.redo.push(last);
        }
        match self.undo.last() {
            Some(prev) => {
                self.g = prev.g.clone();
                self.ctx = prev.ctx.clone();
                true
            }
            None => false,
        }
    }

    /// Replay one undone move. Returns false when nothing can be redone.
    pub(crate) fn redo(&mut self) -> bool {
        let Some(next) = self.redo.pop() else {
            return false;
        };
        self.g = next.g.clone();
        self.ctx = next.ctx.clone();
        if let Some(entry) = &next.entry {
            self.log.push_back(entry.clone());
        }
        self.undo.push(next);
        true
    }

    fn snapshot(&self, undoable: bool, entry: Option<LogEntry>) -> Snapshot<G> {
        Snapshot {
            g: self.g.clone(),
            ctx: self.ctx.clone(),
            undoable,
            entry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LoggedAction, PhaseId};

    fn state() -> State<u32> {
        let mut state = State::new(0, Context::new(2, 1, PhaseId::default_phase()));
        state.reset_history();
        state
    }

    #[test]
    fn test_undo_redo_walks_history() {
        let mut state = state();
        assert!(!state.can_undo());

        state.g = 5;
        state.push_history(true, None);
        assert!(state.can_undo());

        assert!(state.undo());
        assert_eq!(state.g, 0);
        assert!(!state.can_undo());
        assert!(state.can_redo());

        assert!(state.redo());
        assert_eq!(state.g, 5);
        assert!(!state.can_redo());
    }

    #[test]
    fn test_undo_takes_back_log_entry() {
        let mut state = state();
        let entry = LogEntry {
            player_id: Some(PlayerId::new(0)),
            action: LoggedAction::Move {
                name: "add".into(),
                args: Default::default(),
            },
            turn: 1,
            phase: PhaseId::default_phase(),
            redact: false,
        };
        state.g = 4;
        state.log.push_back(entry.clone());
        state.push_history(true, Some(entry.clone()));

        assert!(state.undo());
        assert!(state.log.is_empty());

        assert!(state.redo());
        assert_eq!(state.log.back(), Some(&entry));
    }

    #[test]
    fn test_not_undoable_blocks_undo() {
        let mut state = state();
        state.g = 3;
        state.push_history(false, None);

        assert!(!state.can_undo());
        assert!(!state.undo());
        assert_eq!(state.g, 3);
    }

    #[test]
    fn test_new_move_clears_redo() {
        let mut state = state();
        state.g = 1;
        state.push_history(true, None);
        state.undo();

        state.g = 2;
        state.push_history(true, None);

        assert!(!state.can_redo());
    }

    #[test]
    fn test_state_serde() {
        let mut state = state();
        state.g = 9;
        state.push_history(true, None);

        let json = serde_json::to_string(&state).unwrap();
        let restored: State<u32> = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, state);
        assert!(restored.can_undo());
    }
}
