//! Error types for the roster layer.

use quizhost_protocol::PlayerId;

/// Errors that can occur while managing the lobby roster.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    /// The player isn't in the last lobby update.
    /// They may have left, or already been kicked.
    #[error("player {0} is not in the lobby")]
    UnknownPlayer(PlayerId),
}
