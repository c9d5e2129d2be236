//! Construction-time errors.
//!
//! Only engineer-authored misconfiguration is an error. Player input that
//! cannot be applied is never an error; the reducer returns the state
//! unchanged instead.

use super::config::PhaseId;

/// A `GameConfig` that cannot be turned into a `Game`, or an
/// `initial_state` request that cannot be honored.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("phase `{from}` names unknown next phase `{next}`")]
    UnknownPhase { from: PhaseId, next: PhaseId },

    #[error("starting phase `{0}` is not declared")]
    UnknownStartingPhase(PhaseId),

    #[error("phase `{phase}` allows unknown move `{name}`")]
    UnknownAllowedMove { phase: PhaseId, name: String },

    #[error("phase `{0}` declares a move limit of 0")]
    ZeroMoveLimit(PhaseId),

    #[error("phase `{0}` is declared twice")]
    DuplicatePhase(PhaseId),

    #[error("a game needs at least one player")]
    NoPlayers,

    #[error("{requested} players requested, at most {max} supported")]
    TooManyPlayers { requested: usize, max: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ConfigError::UnknownPhase {
            from: PhaseId::new("draft"),
            next: PhaseId::new("battle"),
        };
        assert_eq!(err.to_string(), "phase `draft` names unknown next phase `battle`");

        let err = ConfigError::TooManyPlayers { requested: 300, max: 255 };
        assert_eq!(err.to_string(), "300 players requested, at most 255 supported");
    }
}
