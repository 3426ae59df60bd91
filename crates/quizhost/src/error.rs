//! Unified error type for the host controller.

use quizhost_protocol::ProtocolError;
use quizhost_quiz::QuizError;
use quizhost_room::RoomError;
use quizhost_roster::RosterError;
use quizhost_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// A transport-level error (connect, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A question failed validation or an edit was out of bounds.
    #[error(transparent)]
    Quiz(#[from] QuizError),

    /// The room is in the wrong phase, or its code/capacity is invalid.
    #[error(transparent)]
    Room(#[from] RoomError),

    /// The kick target isn't in the lobby.
    #[error(transparent)]
    Roster(#[from] RosterError),

    /// The controller task has stopped; the handle is dead.
    #[error("host controller is no longer running")]
    ControllerClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::SendFailed(std::io::Error::other("gone"));
        let host_err: HostError = err.into();
        assert!(matches!(host_err, HostError::Transport(_)));
        assert!(host_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_quiz_error_keeps_position() {
        let host_err: HostError = QuizError::EmptyPrompt { position: 2 }.into();
        assert!(matches!(host_err, HostError::Quiz(_)));
        assert!(host_err.to_string().contains("question 2"));
    }

    #[test]
    fn test_from_room_error() {
        let host_err: HostError = RoomError::EmptyRoomCode.into();
        assert!(matches!(host_err, HostError::Room(RoomError::EmptyRoomCode)));
    }

    #[test]
    fn test_from_roster_error() {
        let err = RosterError::UnknownPlayer(quizhost_protocol::PlayerId::new("p"));
        let host_err: HostError = err.into();
        assert!(matches!(host_err, HostError::Roster(_)));
    }
}
