//! Message contract between the quiz host and the coordinating service.
//!
//! - **Types** ([`OutboundMessage`], [`InboundMessage`], [`PlayerId`],
//!   [`RoomCode`], …) — the frames that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those frames are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! ```text
//! Transport (bytes) → Protocol (messages) → Host controller (state)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    InboundMessage, LobbyPlayer, OutboundMessage, PlayerId, QuestionPayload,
    RoomCode, ScoreEntry,
};
