//! Wire types exchanged with the coordinating service.
//!
//! Every frame is an adjacently tagged JSON object:
//!
//! ```text
//! { "event": "create-room", "data": { "roomCode": "ABC", "maxPlayers": 10 } }
//! { "event": "session-ended" }
//! ```
//!
//! Event names are kebab-case, payload keys are camelCase. Unit events
//! carry no `data` key at all.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Opaque player identifier assigned by the coordinating service.
///
/// The host never mints these; it only echoes them back (e.g. in a kick).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Host-chosen room code. Uniqueness is the service's problem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Wraps an already-trimmed, non-empty code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Payload records
// ---------------------------------------------------------------------------

/// One question as transmitted in a batch.
///
/// `correct` is the literal text of the right option, not its index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPayload {
    pub text: String,
    pub options: [String; 4],
    pub correct: String,
    pub time_limit: u32,
}

/// A player as listed in a lobby update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyPlayer {
    pub id: PlayerId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

/// One row of a score snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub id: PlayerId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    pub score: f64,
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Host → service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum OutboundMessage {
    /// Reserve a room. Sent at most once per session.
    #[serde(rename_all = "camelCase")]
    CreateRoom {
        room_code: RoomCode,
        max_players: u32,
    },

    /// Register the host itself in its room, right before the batch.
    #[serde(rename_all = "camelCase")]
    Join { name: String, room_code: RoomCode },

    /// The full, validated question batch.
    #[serde(rename_all = "camelCase")]
    SendQuestionBatch {
        room_code: RoomCode,
        questions: Vec<QuestionPayload>,
    },

    /// Start round 1. Always follows `SendQuestionBatch`.
    #[serde(rename_all = "camelCase")]
    StartSession { room_code: RoomCode },

    /// Remove a player from the lobby. Only sent after operator confirmation.
    #[serde(rename_all = "camelCase")]
    KickPlayer {
        room_code: RoomCode,
        player_id: PlayerId,
    },
}

impl OutboundMessage {
    /// The wire event name, for logging.
    pub fn event(&self) -> &'static str {
        match self {
            Self::CreateRoom { .. } => "create-room",
            Self::Join { .. } => "join",
            Self::SendQuestionBatch { .. } => "send-question-batch",
            Self::StartSession { .. } => "start-session",
            Self::KickPlayer { .. } => "kick-player",
        }
    }
}

/// Service → host. Each one is an authoritative replacement, never a delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum InboundMessage {
    /// The complete current lobby.
    LobbyUpdate { players: Vec<LobbyPlayer> },

    /// The service refused to create or validate the room.
    RoomError { message: String },

    /// The complete current scores, unsorted.
    ScoreSnapshot(Vec<ScoreEntry>),

    /// The session is over. Terminal.
    SessionEnded,
}

impl InboundMessage {
    /// The wire event name, for logging.
    pub fn event(&self) -> &'static str {
        match self {
            Self::LobbyUpdate { .. } => "lobby-update",
            Self::RoomError { .. } => "room-error",
            Self::ScoreSnapshot(_) => "score-snapshot",
            Self::SessionEnded => "session-ended",
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The service is not ours, so these pin the exact JSON shapes.

    use super::*;
    use serde_json::json;

    fn room() -> RoomCode {
        RoomCode::new("QUIZ42")
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        assert_eq!(serde_json::to_value(PlayerId::new("s1")).unwrap(), json!("s1"));
        assert_eq!(serde_json::to_value(room()).unwrap(), json!("QUIZ42"));
        assert_eq!(PlayerId::new("abc").to_string(), "abc");
    }

    #[test]
    fn test_create_room_json_format() {
        let msg = OutboundMessage::CreateRoom {
            room_code: room(),
            max_players: 12,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            json,
            json!({
                "event": "create-room",
                "data": { "roomCode": "QUIZ42", "maxPlayers": 12 }
            })
        );
    }

    #[test]
    fn test_send_question_batch_json_format() {
        let msg = OutboundMessage::SendQuestionBatch {
            room_code: room(),
            questions: vec![QuestionPayload {
                text: "Capital of France?".into(),
                options: [
                    "Paris".into(),
                    "Rome".into(),
                    "Berlin".into(),
                    "Madrid".into(),
                ],
                correct: "Paris".into(),
                time_limit: 15,
            }],
        };
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["event"], "send-question-batch");
        assert_eq!(json["data"]["roomCode"], "QUIZ42");
        let q = &json["data"]["questions"][0];
        assert_eq!(q["text"], "Capital of France?");
        assert_eq!(q["options"], json!(["Paris", "Rome", "Berlin", "Madrid"]));
        assert_eq!(q["correct"], "Paris");
        assert_eq!(q["timeLimit"], 15);
    }

    #[test]
    fn test_join_start_and_kick_json_format() {
        let join = serde_json::to_value(OutboundMessage::Join {
            name: "Host".into(),
            room_code: room(),
        })
        .unwrap();
        assert_eq!(
            join,
            json!({ "event": "join", "data": { "name": "Host", "roomCode": "QUIZ42" } })
        );

        let start = serde_json::to_value(OutboundMessage::StartSession {
            room_code: room(),
        })
        .unwrap();
        assert_eq!(
            start,
            json!({ "event": "start-session", "data": { "roomCode": "QUIZ42" } })
        );

        let kick = serde_json::to_value(OutboundMessage::KickPlayer {
            room_code: room(),
            player_id: PlayerId::new("sock-9"),
        })
        .unwrap();
        assert_eq!(kick["event"], "kick-player");
        assert_eq!(kick["data"]["playerId"], "sock-9");
    }

    #[test]
    fn test_event_names_match_serialized_tags() {
        let msgs = [
            OutboundMessage::CreateRoom { room_code: room(), max_players: 1 },
            OutboundMessage::Join { name: "Host".into(), room_code: room() },
            OutboundMessage::SendQuestionBatch { room_code: room(), questions: vec![] },
            OutboundMessage::StartSession { room_code: room() },
            OutboundMessage::KickPlayer { room_code: room(), player_id: PlayerId::new("p") },
        ];
        for msg in msgs {
            let json = serde_json::to_value(&msg).unwrap();
            assert_eq!(json["event"], msg.event());
        }
    }

    #[test]
    fn test_lobby_update_decodes_with_optional_emoji() {
        let frame = json!({
            "event": "lobby-update",
            "data": { "players": [
                { "id": "a1", "name": "Ada", "emoji": "🦊" },
                { "id": "b2", "name": "Bob" }
            ]}
        });
        let msg: InboundMessage = serde_json::from_value(frame).unwrap();
        let InboundMessage::LobbyUpdate { players } = msg else {
            panic!("expected lobby-update");
        };
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].emoji.as_deref(), Some("🦊"));
        assert_eq!(players[1].emoji, None);
        assert_eq!(players[1].id, PlayerId::new("b2"));
    }

    #[test]
    fn test_room_error_decodes() {
        let frame = json!({ "event": "room-error", "data": { "message": "Room already exists" } });
        let msg: InboundMessage = serde_json::from_value(frame).unwrap();
        assert_eq!(
            msg,
            InboundMessage::RoomError { message: "Room already exists".into() }
        );
        assert_eq!(msg.event(), "room-error");
    }

    #[test]
    fn test_score_snapshot_payload_is_a_bare_array() {
        let frame = json!({
            "event": "score-snapshot",
            "data": [
                { "id": "a1", "name": "Ada", "score": 1200 },
                { "id": "h", "name": "Host", "score": 0, "emoji": "👑" }
            ]
        });
        let msg: InboundMessage = serde_json::from_value(frame).unwrap();
        let InboundMessage::ScoreSnapshot(entries) = msg else {
            panic!("expected score-snapshot");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].score, 1200.0);
        assert_eq!(entries[1].emoji.as_deref(), Some("👑"));
    }

    #[test]
    fn test_session_ended_needs_no_data() {
        let msg: InboundMessage =
            serde_json::from_str(r#"{"event":"session-ended"}"#).unwrap();
        assert_eq!(msg, InboundMessage::SessionEnded);
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        let result: Result<InboundMessage, _> =
            serde_json::from_str(r#"{"event":"fly-to-moon","data":{}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_lobby_update_with_wrong_shape_is_rejected() {
        // A bare array belongs to score-snapshot, not lobby-update.
        let result: Result<InboundMessage, _> =
            serde_json::from_str(r#"{"event":"lobby-update","data":[]}"#);
        assert!(result.is_err());
    }
}
