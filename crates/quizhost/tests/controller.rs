//! End-to-end tests for the host controller.
//!
//! Each test stands up a throwaway coordinating service with
//! `tokio_tungstenite::accept_async` and drives the host through its
//! handle, checking the JSON frames the service receives and the events
//! the operator sees.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use quizhost::prelude::*;
use quizhost_transport::{Connection, ConnectionId, TransportError};
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;

// =========================================================================
// Fake coordinating service
// =========================================================================

const FRANCE: &str = "Capital of France?\nParis\nRome\nBerlin\nMadrid\n0";
const WAIT: Duration = Duration::from_secs(5);

struct FakeService {
    ws: WebSocketStream<TcpStream>,
}

impl FakeService {
    /// Next JSON frame from the host.
    async fn recv(&mut self) -> Value {
        loop {
            let msg = timeout(WAIT, self.ws.next())
                .await
                .expect("timed out waiting for a frame")
                .expect("host closed the connection")
                .expect("websocket error");
            match msg {
                Message::Text(text) => {
                    return serde_json::from_str(text.as_str()).expect("frame should be JSON");
                }
                Message::Binary(data) => {
                    return serde_json::from_slice(&data).expect("frame should be JSON");
                }
                _ => continue,
            }
        }
    }

    async fn send(&mut self, frame: Value) {
        self.ws
            .send(Message::text(frame.to_string()))
            .await
            .expect("send should succeed");
    }

    async fn send_raw(&mut self, text: &str) {
        self.ws
            .send(Message::text(text.to_string()))
            .await
            .expect("send should succeed");
    }

    /// Asserts the host sends nothing for `window`.
    async fn expect_silence(&mut self, window: Duration) {
        if let Ok(Some(Ok(msg))) = timeout(window, self.ws.next()).await {
            panic!("expected no frame, got {msg:?}");
        }
    }
}

async fn start_with(
    builder: HostControllerBuilder,
    confirmer: impl KickConfirmer,
) -> (HostHandle, HostEvents, FakeService) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("should bind");
    let addr = listener.local_addr().expect("should have addr");
    let accept = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("should accept");
        tokio_tungstenite::accept_async(stream)
            .await
            .expect("handshake should succeed")
    });

    let (host, events) = builder
        .url(&format!("ws://{addr}"))
        .connect(confirmer)
        .await
        .expect("host should connect");
    let ws = accept.await.expect("accept task should complete");
    (host, events, FakeService { ws })
}

async fn start() -> (HostHandle, HostEvents, FakeService) {
    start_with(HostHandle::builder(), AlwaysConfirm).await
}

async fn next_event(events: &mut HostEvents) -> HostEvent {
    timeout(WAIT, events.recv())
        .await
        .expect("timed out waiting for an event")
        .expect("event stream closed")
}

/// Creates room "QUIZ42" for 4 players and consumes the frame and event.
async fn create_room(host: &HostHandle, events: &mut HostEvents, service: &mut FakeService) {
    host.set_room_code("QUIZ42").await.unwrap();
    host.set_capacity(4).await.unwrap();
    host.create_room().await.unwrap();
    service.recv().await;
    assert!(matches!(next_event(events).await, HostEvent::RoomCreated(_)));
}

fn lobby(ids: &[&str]) -> Value {
    let players: Vec<Value> = ids
        .iter()
        .map(|id| json!({ "id": id, "name": id.to_uppercase() }))
        .collect();
    json!({ "event": "lobby-update", "data": { "players": players } })
}

// =========================================================================
// Room lifecycle
// =========================================================================

#[tokio::test]
async fn test_create_room_sends_frame() {
    let (host, mut events, mut service) = start().await;

    host.set_room_code("  QUIZ42 ").await.unwrap();
    host.set_capacity(4).await.unwrap();
    let room = host.create_room().await.unwrap();
    assert_eq!(room.code.as_str(), "QUIZ42");

    assert_eq!(
        service.recv().await,
        json!({ "event": "create-room", "data": { "roomCode": "QUIZ42", "maxPlayers": 4 } })
    );
    assert_eq!(next_event(&mut events).await, HostEvent::RoomCreated(room));

    let snap = host.snapshot().await.unwrap();
    assert_eq!(snap.phase.name(), "created (pending)");
}

#[tokio::test]
async fn test_empty_code_sends_nothing() {
    let (host, _events, mut service) = start().await;

    let err = host.create_room().await.unwrap_err();
    assert!(matches!(err, HostError::Room(RoomError::EmptyRoomCode)));
    service.expect_silence(Duration::from_millis(100)).await;
}

#[tokio::test]
async fn test_second_create_and_capacity_change_rejected() {
    let (host, mut events, mut service) = start().await;
    create_room(&host, &mut events, &mut service).await;

    assert!(matches!(
        host.create_room().await,
        Err(HostError::Room(RoomError::AlreadyCreated(_)))
    ));
    assert!(matches!(
        host.set_capacity(8).await,
        Err(HostError::Room(RoomError::CapacityLocked))
    ));
    service.expect_silence(Duration::from_millis(100)).await;
}

#[tokio::test]
async fn test_room_error_reverts_and_allows_retry() {
    let (host, mut events, mut service) = start().await;
    create_room(&host, &mut events, &mut service).await;

    service
        .send(json!({ "event": "room-error", "data": { "message": "Room already exists" } }))
        .await;
    assert_eq!(
        next_event(&mut events).await,
        HostEvent::RoomError { message: "Room already exists".into() }
    );

    let snap = host.snapshot().await.unwrap();
    assert_eq!(snap.phase, SessionPhase::Unset);
    assert_eq!(snap.draft_code, "");

    host.set_room_code("OTHER").await.unwrap();
    host.create_room().await.unwrap();
    assert_eq!(service.recv().await["data"]["roomCode"], "OTHER");
}

#[tokio::test]
async fn test_lobby_update_confirms_room() {
    let (host, mut events, mut service) = start().await;
    create_room(&host, &mut events, &mut service).await;

    service.send(lobby(&["a", "b"])).await;
    let HostEvent::LobbyUpdated(players) = next_event(&mut events).await else {
        panic!("expected LobbyUpdated");
    };
    assert_eq!(players.len(), 2);

    let snap = host.snapshot().await.unwrap();
    assert_eq!(snap.phase.name(), "created");
    assert_eq!(snap.roster.len(), 2);
}

// =========================================================================
// Submission
// =========================================================================

#[tokio::test]
async fn test_submit_before_create_rejected() {
    let (host, _events, mut service) = start().await;
    host.set_question_count(1).await.unwrap();
    host.apply_bulk_paste(0, FRANCE).await.unwrap();

    assert!(matches!(
        host.submit().await,
        Err(HostError::Room(RoomError::NotCreated))
    ));
    service.expect_silence(Duration::from_millis(100)).await;
}

#[tokio::test]
async fn test_invalid_batch_sends_nothing() {
    let (host, mut events, mut service) = start().await;
    create_room(&host, &mut events, &mut service).await;

    host.set_question_count(1).await.unwrap();
    host.edit_field(0, FieldEdit::Text("Q1".into())).await.unwrap();
    for (i, o) in ["a", "b", "c", "d"].into_iter().enumerate() {
        host.edit_option(0, i, o).await.unwrap();
    }
    host.edit_field(0, FieldEdit::Correct("5".into())).await.unwrap();

    let err = host.submit().await.unwrap_err();
    assert!(matches!(
        err,
        HostError::Quiz(QuizError::CorrectOutOfRange { position: 1, index: 5 })
    ));
    service.expect_silence(Duration::from_millis(100)).await;

    let snap = host.snapshot().await.unwrap();
    assert!(snap.phase.is_lobby());
    assert_eq!(snap.countdown, None);
}

#[tokio::test]
async fn test_full_session_flow() {
    let (host, mut events, mut service) = start().await;
    create_room(&host, &mut events, &mut service).await;
    service.send(lobby(&["a"])).await;
    next_event(&mut events).await;

    host.set_question_count(2).await.unwrap();
    host.apply_bulk_paste(0, FRANCE).await.unwrap();
    host.apply_bulk_paste(1, "Largest ocean?\nAtlantic\nIndian\nArctic\nPacific\n3")
        .await
        .unwrap();
    host.edit_field(1, FieldEdit::TimeLimit(30)).await.unwrap();
    host.submit().await.unwrap();

    // --- join, batch, start, in that order ---
    assert_eq!(
        service.recv().await,
        json!({ "event": "join", "data": { "name": "Host", "roomCode": "QUIZ42" } })
    );
    assert_eq!(
        service.recv().await,
        json!({
            "event": "send-question-batch",
            "data": {
                "roomCode": "QUIZ42",
                "questions": [
                    {
                        "text": "Capital of France?",
                        "options": ["Paris", "Rome", "Berlin", "Madrid"],
                        "correct": "Paris",
                        "timeLimit": 15
                    },
                    {
                        "text": "Largest ocean?",
                        "options": ["Atlantic", "Indian", "Arctic", "Pacific"],
                        "correct": "Pacific",
                        "timeLimit": 30
                    }
                ]
            }
        })
    );
    assert_eq!(
        service.recv().await,
        json!({ "event": "start-session", "data": { "roomCode": "QUIZ42" } })
    );
    let HostEvent::SessionStarted { questions, .. } = next_event(&mut events).await else {
        panic!("expected SessionStarted");
    };
    assert_eq!(questions, 2);

    // --- scores ---
    service
        .send(json!({
            "event": "score-snapshot",
            "data": [
                { "id": "h", "name": "Host", "score": 0 },
                { "id": "a", "name": "A", "score": 5 },
                { "id": "b", "name": "B", "score": 5 },
                { "id": "c", "name": "C", "emoji": "🦊", "score": 12.5 }
            ]
        }))
        .await;
    let ranking = loop {
        match next_event(&mut events).await {
            HostEvent::LeaderboardUpdated(ranking) => break ranking,
            HostEvent::CountdownTick(_) => continue,
            other => panic!("unexpected event {other:?}"),
        }
    };
    let rows: Vec<_> = ranking.iter().map(|r| (r.rank, r.name.as_str())).collect();
    assert_eq!(rows, [(1, "C"), (2, "A"), (3, "B")]);
    assert_eq!(ranking[0].emoji.as_deref(), Some("🦊"));

    // --- end ---
    service.send(json!({ "event": "session-ended" })).await;
    let final_ranking = loop {
        match next_event(&mut events).await {
            HostEvent::SessionEnded { ranking } => break ranking,
            HostEvent::CountdownTick(_) => continue,
            other => panic!("unexpected event {other:?}"),
        }
    };
    assert_eq!(final_ranking, ranking);

    let snap = host.snapshot().await.unwrap();
    assert!(snap.phase.is_ended());
    assert!(snap.is_final);
    assert_eq!(snap.countdown, None);
}

#[tokio::test]
async fn test_host_name_is_configurable() {
    let (host, mut events, mut service) =
        start_with(HostHandle::builder().host_name("Quizmaster"), AlwaysConfirm).await;
    create_room(&host, &mut events, &mut service).await;
    host.set_question_count(1).await.unwrap();
    host.apply_bulk_paste(0, FRANCE).await.unwrap();
    host.submit().await.unwrap();

    assert_eq!(service.recv().await["data"]["name"], "Quizmaster");
}

// =========================================================================
// Countdown
// =========================================================================

#[tokio::test]
async fn test_countdown_ticks_down_and_parks_at_zero() {
    let builder = HostHandle::builder().countdown_config(CountdownConfig {
        tick_interval: Duration::from_millis(20),
        default_secs: 15,
    });
    let (host, mut events, mut service) = start_with(builder, AlwaysConfirm).await;
    create_room(&host, &mut events, &mut service).await;
    host.set_question_count(1).await.unwrap();
    host.apply_bulk_paste(0, FRANCE).await.unwrap();
    host.edit_field(0, FieldEdit::TimeLimit(3)).await.unwrap();
    host.submit().await.unwrap();
    assert!(matches!(
        next_event(&mut events).await,
        HostEvent::SessionStarted { .. }
    ));

    for expected in [2, 1, 0] {
        assert_eq!(next_event(&mut events).await, HostEvent::CountdownTick(expected));
    }
    let more = timeout(Duration::from_millis(200), events.recv()).await;
    assert!(more.is_err(), "no tick after reaching 0, got {more:?}");

    let snap = host.snapshot().await.unwrap();
    assert_eq!(snap.countdown, Some(0));
    assert!(matches!(snap.phase, SessionPhase::Running { .. }));
}

#[tokio::test]
async fn test_session_ended_stops_ticks() {
    let builder = HostHandle::builder().countdown_config(CountdownConfig {
        tick_interval: Duration::from_millis(20),
        default_secs: 15,
    });
    let (host, mut events, mut service) = start_with(builder, AlwaysConfirm).await;
    create_room(&host, &mut events, &mut service).await;
    host.set_question_count(1).await.unwrap();
    host.apply_bulk_paste(0, FRANCE).await.unwrap();
    host.submit().await.unwrap();
    next_event(&mut events).await;
    assert_eq!(next_event(&mut events).await, HostEvent::CountdownTick(14));

    service.send(json!({ "event": "session-ended" })).await;
    loop {
        match next_event(&mut events).await {
            HostEvent::SessionEnded { .. } => break,
            HostEvent::CountdownTick(_) => continue,
            other => panic!("unexpected event {other:?}"),
        }
    }
    let more = timeout(Duration::from_millis(200), events.recv()).await;
    assert!(more.is_err(), "no tick after session-ended, got {more:?}");
    assert_eq!(host.snapshot().await.unwrap().countdown, None);
}

// =========================================================================
// Kick
// =========================================================================

#[tokio::test]
async fn test_confirmed_kick_sends_frame_without_touching_roster() {
    let (host, mut events, mut service) = start().await;
    create_room(&host, &mut events, &mut service).await;
    service.send(lobby(&["a", "b"])).await;
    next_event(&mut events).await;

    assert!(host.kick(PlayerId::new("a")).await.unwrap());
    assert_eq!(
        service.recv().await,
        json!({ "event": "kick-player", "data": { "roomCode": "QUIZ42", "playerId": "a" } })
    );
    assert_eq!(host.snapshot().await.unwrap().roster.len(), 2);
}

#[tokio::test]
async fn test_declined_kick_sends_nothing() {
    let (host, mut events, mut service) = start_with(HostHandle::builder(), NeverConfirm).await;
    create_room(&host, &mut events, &mut service).await;
    service.send(lobby(&["a"])).await;
    next_event(&mut events).await;

    assert!(!host.kick(PlayerId::new("a")).await.unwrap());
    service.expect_silence(Duration::from_millis(100)).await;
}

#[tokio::test]
async fn test_kick_unknown_player_rejected() {
    let (host, mut events, mut service) = start().await;
    create_room(&host, &mut events, &mut service).await;

    assert!(matches!(
        host.kick(PlayerId::new("ghost")).await,
        Err(HostError::Roster(_))
    ));
}

// =========================================================================
// Robustness & shutdown
// =========================================================================

#[tokio::test]
async fn test_malformed_frames_are_skipped() {
    let (host, mut events, mut service) = start().await;
    create_room(&host, &mut events, &mut service).await;

    service.send_raw("not json").await;
    service.send(json!({ "event": "unknown-event", "data": {} })).await;
    service.send(lobby(&["a"])).await;

    assert!(matches!(
        next_event(&mut events).await,
        HostEvent::LobbyUpdated(_)
    ));
    assert!(host.snapshot().await.unwrap().phase.is_created());
}

#[tokio::test]
async fn test_service_close_emits_disconnected() {
    let (host, mut events, mut service) = start().await;
    service.ws.close(None).await.unwrap();

    assert_eq!(next_event(&mut events).await, HostEvent::Disconnected);
    assert!(matches!(
        host.snapshot().await,
        Err(HostError::ControllerClosed)
    ));
}

#[tokio::test]
async fn test_shutdown_closes_connection() {
    let (host, mut events, mut service) = start().await;
    host.shutdown().await.unwrap();

    assert_eq!(next_event(&mut events).await, HostEvent::Disconnected);
    let frame = timeout(WAIT, service.ws.next()).await.expect("should see close");
    assert!(matches!(frame, None | Some(Ok(Message::Close(_))) | Some(Err(_))));
    assert!(matches!(
        host.create_room().await,
        Err(HostError::ControllerClosed)
    ));
}

// =========================================================================
// Send failures
// =========================================================================

/// A connection whose sends fail while `down` is set. Never receives.
struct FlakyConnection {
    down: Arc<AtomicBool>,
}

impl Connection for FlakyConnection {
    type Error = TransportError;

    async fn send(&self, _data: &[u8]) -> Result<(), TransportError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(TransportError::SendFailed(std::io::Error::other("down")));
        }
        Ok(())
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, TransportError> {
        std::future::pending().await
    }

    async fn close(&self) -> Result<(), TransportError> {
        Ok(())
    }

    fn id(&self) -> ConnectionId {
        ConnectionId::new(7)
    }
}

fn start_flaky(down: bool) -> (HostHandle, HostEvents, Arc<AtomicBool>) {
    let flag = Arc::new(AtomicBool::new(down));
    let conn = FlakyConnection {
        down: Arc::clone(&flag),
    };
    let (host, events) = HostHandle::builder().build_with_connection(conn, AlwaysConfirm);
    (host, events, flag)
}

#[tokio::test]
async fn test_failed_create_send_changes_nothing() {
    let (host, mut events, down) = start_flaky(true);
    host.set_room_code("R1").await.unwrap();

    let err = host.create_room().await.unwrap_err();
    assert!(matches!(err, HostError::Transport(_)), "got {err:?}");
    let snap = host.snapshot().await.unwrap();
    assert_eq!(snap.phase, SessionPhase::Unset);
    assert_eq!(snap.draft_code, "R1");
    assert!(events.try_recv().is_err(), "no RoomCreated after a failed send");

    down.store(false, Ordering::SeqCst);
    let room = host.create_room().await.unwrap();
    assert_eq!(room.code, RoomCode::new("R1"));
    assert!(matches!(next_event(&mut events).await, HostEvent::RoomCreated(_)));
}

#[tokio::test]
async fn test_failed_submit_send_stays_in_lobby() {
    let (host, mut events, down) = start_flaky(false);
    host.set_room_code("R1").await.unwrap();
    host.create_room().await.unwrap();
    next_event(&mut events).await;
    host.set_question_count(1).await.unwrap();
    host.apply_bulk_paste(0, FRANCE).await.unwrap();

    down.store(true, Ordering::SeqCst);
    assert!(matches!(host.submit().await, Err(HostError::Transport(_))));
    let snap = host.snapshot().await.unwrap();
    assert!(snap.phase.is_lobby());
    assert_eq!(snap.countdown, None);

    down.store(false, Ordering::SeqCst);
    host.submit().await.unwrap();
    let snap = host.snapshot().await.unwrap();
    assert!(matches!(snap.phase, SessionPhase::Running { .. }));
    assert_eq!(snap.countdown, Some(15));
}
