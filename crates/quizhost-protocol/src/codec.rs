//! Codec trait and implementations for serializing/deserializing messages.
//!
//! The controller never calls `serde_json` directly; it goes through a
//! [`Codec`] so the wire format can change without touching the session
//! logic. [`JsonCodec`] matches what the coordinating service speaks today.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode messages to bytes and decode bytes back.
///
/// `Send + Sync + 'static` because the codec lives inside the controller
/// task for the whole session.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into one frame.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if the value can't be represented.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes one frame.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or don't
    /// match `T`.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// ```rust
/// use quizhost_protocol::{Codec, InboundMessage, JsonCodec};
///
/// let codec = JsonCodec;
/// let msg: InboundMessage = codec
///     .decode(br#"{"event":"room-error","data":{"message":"taken"}}"#)
///     .unwrap();
/// assert_eq!(msg, InboundMessage::RoomError { message: "taken".into() });
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{InboundMessage, OutboundMessage, RoomCode};

    #[test]
    fn test_encode_produces_compact_json_text() {
        let bytes = JsonCodec
            .encode(&OutboundMessage::StartSession {
                room_code: RoomCode::new("R1"),
            })
            .unwrap();
        assert_eq!(
            std::str::from_utf8(&bytes).unwrap(),
            r#"{"event":"start-session","data":{"roomCode":"R1"}}"#
        );
    }

    #[test]
    fn test_decode_garbage_is_a_decode_error() {
        let err = JsonCodec
            .decode::<InboundMessage>(b"not json at all")
            .unwrap_err();
        assert!(matches!(err, ProtocolError::Decode(_)));
        assert!(err.to_string().starts_with("decode failed"));
    }
}
