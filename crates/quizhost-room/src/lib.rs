//! Room lifecycle for quizhost.
//!
//! The host creates exactly one room per session. This crate tracks where
//! that room is in its life and rejects operations that don't fit.
//!
//! # Key types
//!
//! - [`RoomLifecycle`] — drafts plus the phase machine
//! - [`SessionPhase`] — `Unset → Created → Running → Ended`
//! - [`Room`] — a created room's code and capacity
//! - [`RoomConfig`] — defaults

mod config;
mod error;
mod lifecycle;

pub use config::{Confirmation, Room, RoomConfig, SessionPhase};
pub use error::RoomError;
pub use lifecycle::RoomLifecycle;
