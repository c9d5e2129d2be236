//! Reducer input: moves, lifecycle events, undo/redo.
//!
//! A move is named by a string and carries JSON arguments. Games define
//! their moves in `GameConfig`; the engine only resolves names and never
//! interprets arguments.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use smallvec::SmallVec;

use super::config::PhaseId;
use super::player::PlayerId;

/// Arguments of a move.
/// SmallVec keeps the common 0-3 argument case off the heap.
pub type MoveArgs = SmallVec<[Value; 3]>;

/// A move submitted by a player.
///
/// ## Example
///
/// ```
/// use turn_engine::core::{MoveAction, PlayerId};
/// use serde_json::json;
///
/// let click = MoveAction::new("clickCell", PlayerId::new(0)).with_arg(json!(4));
/// assert_eq!(click.args.len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveAction {
    /// Move name as registered in the config.
    pub name: String,

    /// Acting player (trusted; authorization happens upstream).
    pub player_id: PlayerId,

    /// Move arguments.
    pub args: MoveArgs,
}

impl MoveAction {
    /// Create a move with no arguments.
    pub fn new(name: impl Into<String>, player_id: PlayerId) -> Self {
        Self {
            name: name.into(),
            player_id,
            args: SmallVec::new(),
        }
    }

    /// Create a move with the given arguments.
    pub fn with_args(name: impl Into<String>, player_id: PlayerId, args: &[Value]) -> Self {
        Self {
            name: name.into(),
            player_id,
            args: SmallVec::from_vec(args.to_vec()),
        }
    }

    /// Append an argument.
    #[must_use]
    pub fn with_arg(mut self, arg: Value) -> Self {
        self.args.push(arg);
        self
    }
}

/// Lifecycle event. Raised by callers through [`Action::GameEvent`] or by
/// move/hook code through the context events handle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// End the current turn, optionally naming the next player.
    EndTurn { next: Option<PlayerId> },
    /// End the current phase, optionally naming the next phase.
    EndPhase { next: Option<PhaseId> },
    /// End the game with an optional payload (defaults to `true`).
    EndGame { payload: Option<Value> },
}

impl GameEvent {
    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::EndTurn { .. } => "endTurn",
            GameEvent::EndPhase { .. } => "endPhase",
            GameEvent::EndGame { .. } => "endGame",
        }
    }
}

/// Everything the reducer accepts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Run a move.
    MakeMove(MoveAction),
    /// Apply a lifecycle event on behalf of a player (or the system).
    GameEvent {
        event: GameEvent,
        player_id: Option<PlayerId>,
    },
    /// Revert the last undoable move of the current turn.
    Undo,
    /// Re-apply the last undone move.
    Redo,
}

impl From<MoveAction> for Action {
    fn from(action: MoveAction) -> Self {
        Action::MakeMove(action)
    }
}

impl From<GameEvent> for Action {
    fn from(event: GameEvent) -> Self {
        Action::GameEvent {
            event,
            player_id: None,
        }
    }
}

/// What a log entry recorded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum LoggedAction {
    /// A move that changed (or chose not to change) the state.
    Move { name: String, args: MoveArgs },
    /// A caller-issued lifecycle event.
    Event(GameEvent),
}

/// A recorded action with metadata for history and replay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// The player who acted, if any.
    pub player_id: Option<PlayerId>,

    /// What happened.
    pub action: LoggedAction,

    /// Turn number when the action was applied.
    pub turn: u32,

    /// Phase when the action was applied.
    pub phase: PhaseId,

    /// Hide move arguments from everyone but the actor.
    pub redact: bool,
}

impl LogEntry {
    /// The entry as `viewer` may see it.
    ///
    /// Redacted move arguments are stripped unless the viewer made the move.
    /// A `None` viewer (spectator) never sees redacted arguments.
    #[must_use]
    pub fn view_for(&self, viewer: Option<PlayerId>) -> LogEntry {
        let hidden = self.redact && (viewer.is_none() || viewer != self.player_id);
        match (&self.action, hidden) {
            (LoggedAction::Move { name, .. }, true) => LogEntry {
                action: LoggedAction::Move {
                    name: name.clone(),
                    args: SmallVec::new(),
                },
                ..self.clone()
            },
            _ => self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_move_action_args() {
        let action = MoveAction::with_args("play", PlayerId::new(1), &[json!(1), json!("a")]);

        assert_eq!(action.name, "play");
        assert_eq!(action.player_id, PlayerId::new(1));
        assert_eq!(action.args.len(), 2);
        assert_eq!(action.args[1], json!("a"));
    }

    #[test]
    fn test_action_from_move_and_event() {
        let action: Action = MoveAction::new("pass", PlayerId::new(0)).into();
        assert!(matches!(action, Action::MakeMove(_)));

        let action: Action = GameEvent::EndTurn { next: None }.into();
        assert!(matches!(action, Action::GameEvent { player_id: None, .. }));
    }

    #[test]
    fn test_event_name() {
        assert_eq!(GameEvent::EndPhase { next: None }.name(), "endPhase");
        assert_eq!(GameEvent::EndGame { payload: None }.name(), "endGame");
    }

    #[test]
    fn test_log_entry_redaction() {
        let entry = LogEntry {
            player_id: Some(PlayerId::new(0)),
            action: LoggedAction::Move {
                name: "secret".into(),
                args: SmallVec::from_vec(vec![json!(7)]),
            },
            turn: 1,
            phase: PhaseId::default_phase(),
            redact: true,
        };

        assert_eq!(entry.view_for(Some(PlayerId::new(0))), entry);

        let hidden = entry.view_for(Some(PlayerId::new(1)));
        assert!(matches!(hidden.action, LoggedAction::Move { ref args, .. } if args.is_empty()));
        let spectator = entry.view_for(None);
        assert!(matches!(spectator.action, LoggedAction::Move { ref args, .. } if args.is_empty()));
    }

    #[test]
    fn test_action_serialization() {
        let action = Action::MakeMove(MoveAction::new("pass", PlayerId::new(1)).with_arg(json!(3)));
        let json = serde_json::to_string(&action).unwrap();
        let deserialized: Action = serde_json::from_str(&json).unwrap();

        assert_eq!(action, deserialized);
    }
}
