//! Error types for the room layer.

use quizhost_protocol::RoomCode;

/// Errors that can occur during room operations.
///
/// All of these are raised locally, before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// The room code is empty after trimming.
    #[error("enter a room code")]
    EmptyRoomCode,

    /// Capacity must be at least one player.
    #[error("capacity must be at least 1, got {0}")]
    InvalidCapacity(u32),

    /// Capacity is fixed once the room has been created.
    #[error("capacity cannot change after the room is created")]
    CapacityLocked,

    /// A room has already been created in this session.
    #[error("room {0} has already been created")]
    AlreadyCreated(RoomCode),

    /// The operation needs a created room.
    #[error("create the room first")]
    NotCreated,

    /// The session is in a phase that doesn't allow this operation.
    #[error("cannot {operation} while the session is {phase}")]
    InvalidPhase {
        phase: &'static str,
        operation: &'static str,
    },
}
