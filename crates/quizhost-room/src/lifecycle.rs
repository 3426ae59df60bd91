//! The room lifecycle: drafts, creation, confirmation, start and end.
//!
//! Pure state. Nothing here talks to the network; the controller asks the
//! lifecycle whether an operation is allowed, sends the frame, and the
//! lifecycle records the transition.

use quizhost_protocol::RoomCode;
use tracing::{debug, info, warn};

use crate::{Confirmation, Room, RoomConfig, RoomError, SessionPhase};

/// Owns the session phase and the not-yet-submitted room drafts.
#[derive(Debug, Clone)]
pub struct RoomLifecycle {
    draft_code: String,
    capacity: u32,
    phase: SessionPhase,
}

impl RoomLifecycle {
    pub fn new(config: RoomConfig) -> Self {
        let capacity = if config.default_capacity == 0 {
            warn!("default_capacity is 0, using 10");
            RoomConfig::default().default_capacity
        } else {
            config.default_capacity
        };
        Self {
            draft_code: String::new(),
            capacity,
            phase: SessionPhase::Unset,
        }
    }

    // -----------------------------------------------------------------------
    // Drafts
    // -----------------------------------------------------------------------

    /// Stores a candidate room code. No validation, no network traffic.
    pub fn set_room_code(&mut self, code: impl Into<String>) {
        self.draft_code = code.into();
    }

    /// Sets the player capacity. Only allowed before the room exists.
    pub fn set_capacity(&mut self, capacity: u32) -> Result<(), RoomError> {
        if self.phase.is_created() {
            return Err(RoomError::CapacityLocked);
        }
        if capacity == 0 {
            return Err(RoomError::InvalidCapacity(capacity));
        }
        self.capacity = capacity;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Moves `Unset → Created(Pending)` for `code` and `capacity`.
    ///
    /// On success the drafts are updated to what was submitted and the new
    /// room is returned so the caller can send `create-room`.
    ///
    /// # Errors
    /// - [`RoomError::AlreadyCreated`] if a room exists in this session
    /// - [`RoomError::EmptyRoomCode`] if `code` trims to nothing
    /// - [`RoomError::InvalidCapacity`] if `capacity` is 0
    pub fn create_room(&mut self, code: &str, capacity: u32) -> Result<Room, RoomError> {
        let room = self.check_create(code, capacity)?;
        self.draft_code = room.code.to_string();
        self.capacity = capacity;
        self.phase = SessionPhase::Created {
            room: room.clone(),
            confirmation: Confirmation::Pending,
        };
        info!(room = %room.code, capacity, "room created (pending)");
        Ok(room)
    }

    /// Creates the room from the stored drafts.
    pub fn create_from_draft(&mut self) -> Result<Room, RoomError> {
        let code = self.draft_code.clone();
        self.create_room(&code, self.capacity)
    }

    /// The room [`create_from_draft`](Self::create_from_draft) would
    /// create, without creating it. Same errors.
    pub fn draft_room(&self) -> Result<Room, RoomError> {
        self.check_create(&self.draft_code, self.capacity)
    }

    fn check_create(&self, code: &str, capacity: u32) -> Result<Room, RoomError> {
        if let Some(room) = self.phase.room() {
            return Err(RoomError::AlreadyCreated(room.code.clone()));
        }
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err(RoomError::EmptyRoomCode);
        }
        if capacity == 0 {
            return Err(RoomError::InvalidCapacity(capacity));
        }
        Ok(Room {
            code: RoomCode::new(trimmed),
            capacity,
        })
    }

    /// Marks a pending room as confirmed. Returns `true` if it changed.
    pub fn confirm(&mut self) -> bool {
        match &mut self.phase {
            SessionPhase::Created { confirmation, room }
                if *confirmation == Confirmation::Pending =>
            {
                *confirmation = Confirmation::Confirmed;
                debug!(room = %room.code, "room confirmed");
                true
            }
            _ => false,
        }
    }

    /// Reverts to `Unset` after the service rejected the room.
    ///
    /// Clears the draft code; capacity stays editable with its last value.
    /// Returns the room that was dropped, if any.
    pub fn revert(&mut self) -> Option<Room> {
        let previous = std::mem::replace(&mut self.phase, SessionPhase::Unset);
        self.draft_code.clear();
        previous.room().cloned()
    }

    /// Moves `Created → Running`.
    ///
    /// # Errors
    /// [`RoomError::NotCreated`] before creation,
    /// [`RoomError::InvalidPhase`] once started or ended.
    pub fn start(&mut self) -> Result<Room, RoomError> {
        let room = self.require_lobby("start the session")?.clone();
        self.phase = SessionPhase::Running { room: room.clone() };
        info!(room = %room.code, "session running");
        Ok(room)
    }

    /// Moves `Created | Running → Ended`. Returns `false` (and changes
    /// nothing) from any other phase.
    pub fn end(&mut self) -> bool {
        match &self.phase {
            SessionPhase::Created { room, .. } | SessionPhase::Running { room } => {
                let room = room.clone();
                info!(room = %room.code, "session ended");
                self.phase = SessionPhase::Ended { room };
                true
            }
            SessionPhase::Unset | SessionPhase::Ended { .. } => false,
        }
    }

    // -----------------------------------------------------------------------
    // Guards & accessors
    // -----------------------------------------------------------------------

    /// Returns the room if the session is still in the lobby.
    ///
    /// `operation` is used in the error message only.
    pub fn require_lobby(&self, operation: &'static str) -> Result<&Room, RoomError> {
        match &self.phase {
            SessionPhase::Created { room, .. } => Ok(room),
            SessionPhase::Unset => Err(RoomError::NotCreated),
            other => Err(RoomError::InvalidPhase {
                phase: other.name(),
                operation,
            }),
        }
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn room(&self) -> Option<&Room> {
        self.phase.room()
    }

    pub fn draft_code(&self) -> &str {
        &self.draft_code
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}

impl Default for RoomLifecycle {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}
