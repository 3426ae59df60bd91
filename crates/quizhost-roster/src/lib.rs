//! Lobby roster for quizhost.
//!
//! The coordinating service owns the player list. The host only mirrors
//! it ([`Roster`]) and can ask for a player to be removed, after an
//! explicit yes from a [`KickConfirmer`].
//!
//! # How it fits in the stack
//!
//! ```text
//! Controller (above)  ← forwards lobby-update, sends kick-player
//!     ↕
//! Roster Layer (this crate)  ← mirrors the lobby, gates kicks
//!     ↕
//! Protocol Layer (below)  ← provides PlayerId, LobbyPlayer
//! ```

mod confirm;
mod error;
mod roster;

pub use confirm::{AlwaysConfirm, KickConfirmer, NeverConfirm};
pub use error::RosterError;
pub use roster::Roster;
