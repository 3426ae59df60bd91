//! Room configuration and the session phase state machine.

use std::fmt;

use quizhost_protocol::RoomCode;

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Room defaults.
#[derive(Debug, Clone)]
pub struct RoomConfig {
    /// Capacity offered before the host edits it. Excludes the host.
    pub default_capacity: u32,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self { default_capacity: 10 }
    }
}

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// A room the host has asked the service to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub code: RoomCode,
    /// Maximum number of players, host excluded. Immutable once created.
    pub capacity: u32,
}

/// Whether the service is known to have accepted a created room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// Create request sent, nothing heard back yet. Assumed good.
    Pending,
    /// The service has sent traffic for the room.
    Confirmed,
}

// ---------------------------------------------------------------------------
// SessionPhase
// ---------------------------------------------------------------------------

/// The lifecycle of one hosting session.
///
/// ```text
///            create          start           session-ended
/// Unset ──────────→ Created ──────→ Running ──────────────→ Ended
///   ↑                  │               │                      │
///   └──────────────────┴───────────────┴──────────────────────┘
///                        room-error (revert)
/// ```
///
/// - **Unset**: no room yet. Code and capacity are drafts.
/// - **Created**: create request sent. `Pending` until the service
///   proves the room exists, then `Confirmed`.
/// - **Running**: questions submitted and round 1 started.
/// - **Ended**: the service said the session is over. Terminal, apart
///   from a `room-error` revert.
///
/// The room lives inside the variants that have one, so "running without
/// a room" cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    Unset,
    Created {
        room: Room,
        confirmation: Confirmation,
    },
    Running {
        room: Room,
    },
    Ended {
        room: Room,
    },
}

impl SessionPhase {
    /// The room, in every phase that has one.
    pub fn room(&self) -> Option<&Room> {
        match self {
            Self::Unset => None,
            Self::Created { room, .. } | Self::Running { room } | Self::Ended { room } => {
                Some(room)
            }
        }
    }

    /// Returns `true` once a create request has gone out.
    pub fn is_created(&self) -> bool {
        !matches!(self, Self::Unset)
    }

    /// Returns `true` while players may still be managed in the lobby.
    pub fn is_lobby(&self) -> bool {
        matches!(self, Self::Created { .. })
    }

    /// Returns `true` once questions have been submitted.
    pub fn has_started(&self) -> bool {
        matches!(self, Self::Running { .. } | Self::Ended { .. })
    }

    pub fn is_ended(&self) -> bool {
        matches!(self, Self::Ended { .. })
    }

    /// Short lowercase name, used in errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::Created {
                confirmation: Confirmation::Pending,
                ..
            } => "created (pending)",
            Self::Created { .. } => "created",
            Self::Running { .. } => "running",
            Self::Ended { .. } => "ended",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> Room {
        Room {
            code: RoomCode::new("R"),
            capacity: 4,
        }
    }

    #[test]
    fn test_room_only_exists_after_create() {
        assert_eq!(SessionPhase::Unset.room(), None);
        let created = SessionPhase::Created {
            room: room(),
            confirmation: Confirmation::Pending,
        };
        assert_eq!(created.room(), Some(&room()));
        assert_eq!(SessionPhase::Ended { room: room() }.room(), Some(&room()));
    }

    #[test]
    fn test_phase_predicates() {
        let created = SessionPhase::Created {
            room: room(),
            confirmation: Confirmation::Confirmed,
        };
        let running = SessionPhase::Running { room: room() };
        let ended = SessionPhase::Ended { room: room() };

        assert!(!SessionPhase::Unset.is_created());
        assert!(created.is_created() && created.is_lobby() && !created.has_started());
        assert!(running.has_started() && !running.is_lobby() && !running.is_ended());
        assert!(ended.has_started() && ended.is_ended());
    }

    #[test]
    fn test_phase_display() {
        let pending = SessionPhase::Created {
            room: room(),
            confirmation: Confirmation::Pending,
        };
        assert_eq!(SessionPhase::Unset.to_string(), "unset");
        assert_eq!(pending.to_string(), "created (pending)");
        assert_eq!(SessionPhase::Running { room: room() }.to_string(), "running");
    }

    #[test]
    fn test_room_config_default() {
        assert_eq!(RoomConfig::default().default_capacity, 10);
    }
}
