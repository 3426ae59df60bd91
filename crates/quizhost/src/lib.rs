//! # quizhost
//!
//! Host-side controller for live, multi-player quiz sessions.
//!
//! The host configures a room, watches players arrive in the lobby, pushes
//! a batch of questions, and follows the timed rounds until the service
//! reports final standings. The coordinating service owns players and
//! scoring; this crate owns the host's state machine and the message
//! contract with that service.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quizhost::prelude::*;
//!
//! // let (host, events) = HostHandle::builder()
//! //     .url("ws://127.0.0.1:3001")
//! //     .connect(AlwaysConfirm)
//! //     .await?;
//! // host.set_room_code("QUIZ42").await?;
//! // host.create_room().await?;
//! ```

mod builder;
mod controller;
mod error;
mod session;

pub use builder::HostControllerBuilder;
pub use controller::{HostEvents, HostHandle};
pub use error::HostError;
pub use session::{HostEvent, HostSession, HostSnapshot};

pub mod prelude {
    pub use crate::{
        HostControllerBuilder, HostError, HostEvent, HostEvents, HostHandle,
        HostSession, HostSnapshot,
    };
    pub use quizhost_countdown::CountdownConfig;
    pub use quizhost_leaderboard::RankedEntry;
    pub use quizhost_protocol::{LobbyPlayer, PlayerId, RoomCode};
    pub use quizhost_quiz::{FieldEdit, QuizConfig, QuizError};
    pub use quizhost_room::{Room, RoomConfig, RoomError, SessionPhase};
    pub use quizhost_roster::{AlwaysConfirm, KickConfirmer, NeverConfirm};
}
