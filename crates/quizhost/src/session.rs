//! The host session aggregate.
//!
//! [`HostSession`] is the whole controller state with no I/O: operator
//! actions return the frames to send, inbound messages return the events
//! to emit. The actor in [`controller`](crate::controller) owns one and
//! does the sending.

use quizhost_countdown::{Countdown, CountdownConfig};
use quizhost_leaderboard::{Leaderboard, RankedEntry};
use quizhost_protocol::{InboundMessage, LobbyPlayer, OutboundMessage, PlayerId};
use quizhost_quiz::{FieldEdit, Question, QuestionSet, QuizConfig};
use quizhost_room::{Room, RoomConfig, RoomLifecycle, SessionPhase};
use quizhost_roster::{KickConfirmer, Roster};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::HostError;

/// Something the operator's front end should render.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// `create-room` was sent. The room is pending until the lobby reports.
    RoomCreated(Room),
    /// The service rejected the room; everything was reverted.
    RoomError { message: String },
    /// The lobby changed.
    LobbyUpdated(Vec<LobbyPlayer>),
    /// New scores arrived, already ranked.
    LeaderboardUpdated(Vec<RankedEntry>),
    /// One second passed. Carries the new remaining value.
    CountdownTick(u32),
    /// The batch was sent and round 1 started.
    SessionStarted { room: Room, questions: usize },
    /// The service ended the session. Carries the final ranking.
    SessionEnded { ranking: Vec<RankedEntry> },
    /// The connection to the service is gone. Always the last event.
    Disconnected,
}

/// A read-only copy of everything the operator can see.
#[derive(Debug, Clone)]
pub struct HostSnapshot {
    pub phase: SessionPhase,
    pub draft_code: String,
    pub capacity: u32,
    pub roster: Vec<LobbyPlayer>,
    pub ranking: Vec<RankedEntry>,
    pub is_final: bool,
    pub countdown: Option<u32>,
    pub questions: Vec<Question>,
}

/// Room + question batch + roster + countdown + leaderboard.
#[derive(Debug)]
pub struct HostSession {
    host_name: String,
    room: RoomLifecycle,
    quiz: QuestionSet,
    roster: Roster,
    countdown: Countdown,
    leaderboard: Leaderboard,
}

impl HostSession {
    pub fn new(
        host_name: impl Into<String>,
        room: RoomConfig,
        quiz: QuizConfig,
        countdown: CountdownConfig,
    ) -> Self {
        Self {
            host_name: host_name.into(),
            room: RoomLifecycle::new(room),
            quiz: QuestionSet::new(quiz),
            roster: Roster::new(),
            countdown: Countdown::new(countdown),
            leaderboard: Leaderboard::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Room
    // -----------------------------------------------------------------------

    pub fn set_room_code(&mut self, code: impl Into<String>) {
        self.room.set_room_code(code);
    }

    pub fn set_capacity(&mut self, capacity: u32) -> Result<(), HostError> {
        Ok(self.room.set_capacity(capacity)?)
    }

    /// Creates the room from the drafts and returns the `create-room` frame.
    pub fn create_room(&mut self) -> Result<(Room, OutboundMessage), HostError> {
        let preview = self.preview_create_room()?;
        self.room.create_from_draft()?;
        Ok(preview)
    }

    /// What [`create_room`](Self::create_room) would return, with nothing
    /// changed. Same errors.
    pub fn preview_create_room(&self) -> Result<(Room, OutboundMessage), HostError> {
        let room = self.room.draft_room()?;
        let msg = OutboundMessage::CreateRoom {
            room_code: room.code.clone(),
            max_players: room.capacity,
        };
        Ok((room, msg))
    }

    // -----------------------------------------------------------------------
    // Question batch
    // -----------------------------------------------------------------------

    pub fn set_question_count(&mut self, count: usize) -> Result<(), HostError> {
        Ok(self.quiz.set_question_count(count)?)
    }

    pub fn edit_field(&mut self, index: usize, edit: FieldEdit) -> Result<(), HostError> {
        Ok(self.quiz.edit_field(index, edit)?)
    }

    pub fn edit_option(
        &mut self,
        index: usize,
        option: usize,
        value: impl Into<String>,
    ) -> Result<(), HostError> {
        Ok(self.quiz.edit_option(index, option, value)?)
    }

    pub fn apply_bulk_paste(&mut self, index: usize, raw: &str) -> Result<(), HostError> {
        Ok(self.quiz.apply_bulk_paste(index, raw)?)
    }

    /// Validates the batch and starts the session.
    ///
    /// Returns, in order, the host `join`, `send-question-batch` and
    /// `start-session` frames. On any error nothing changes: the room
    /// stays in the lobby and the countdown stays idle.
    ///
    /// # Errors
    /// - [`RoomError::NotCreated`](quizhost_room::RoomError::NotCreated)
    ///   before `create_room`
    /// - [`RoomError::InvalidPhase`](quizhost_room::RoomError::InvalidPhase)
    ///   if already submitted or ended
    /// - [`QuizError`](quizhost_quiz::QuizError) for the first invalid question
    pub fn submit(&mut self) -> Result<(Room, Vec<OutboundMessage>), HostError> {
        let (room, msgs) = self.preview_submit()?;
        self.room.start()?;

        let first_limit = self.quiz.questions().first().map(|q| q.time_limit);
        self.countdown.start(first_limit);
        info!(room = %room.code, questions = self.quiz.len(), "batch submitted");
        Ok((room, msgs))
    }

    /// What [`submit`](Self::submit) would return, with nothing changed.
    /// Same errors.
    pub fn preview_submit(&self) -> Result<(Room, Vec<OutboundMessage>), HostError> {
        let room = self.room.require_lobby("submit questions")?.clone();
        let questions = self.quiz.validate()?;

        let msgs = vec![
            OutboundMessage::Join {
                name: self.host_name.clone(),
                room_code: room.code.clone(),
            },
            OutboundMessage::SendQuestionBatch {
                room_code: room.code.clone(),
                questions,
            },
            OutboundMessage::StartSession {
                room_code: room.code.clone(),
            },
        ];
        Ok((room, msgs))
    }

    // -----------------------------------------------------------------------
    // Roster
    // -----------------------------------------------------------------------

    /// Asks `confirmer` and returns the `kick-player` frame on a yes.
    ///
    /// Only allowed while the room is in the lobby. The roster itself is
    /// not touched; the next `lobby-update` reflects the kick.
    pub async fn request_kick<K: KickConfirmer>(
        &self,
        player_id: &PlayerId,
        confirmer: &K,
    ) -> Result<Option<OutboundMessage>, HostError> {
        let room = self.room.require_lobby("kick a player")?;
        let kicked = self.roster.request_kick(player_id, confirmer).await?;
        Ok(kicked.map(|player| OutboundMessage::KickPlayer {
            room_code: room.code.clone(),
            player_id: player.id,
        }))
    }

    // -----------------------------------------------------------------------
    // Inbound
    // -----------------------------------------------------------------------

    /// Applies one message from the service.
    pub fn handle_inbound(&mut self, msg: InboundMessage) -> Vec<HostEvent> {
        match msg {
            InboundMessage::LobbyUpdate { players } => {
                if matches!(self.room.phase(), SessionPhase::Unset | SessionPhase::Ended { .. }) {
                    warn!(phase = %self.room.phase(), "lobby-update ignored");
                    return Vec::new();
                }
                self.room.confirm();
                self.roster.replace(players.clone());
                vec![HostEvent::LobbyUpdated(players)]
            }
            InboundMessage::RoomError { message } => {
                let dropped = self.room.revert();
                self.countdown.stop();
                self.roster.clear();
                self.leaderboard.reset();
                warn!(
                    room = ?dropped.map(|r| r.code),
                    %message,
                    "room rejected by service, reverted"
                );
                vec![HostEvent::RoomError { message }]
            }
            InboundMessage::ScoreSnapshot(entries) => {
                self.leaderboard.replace(entries);
                vec![HostEvent::LeaderboardUpdated(self.leaderboard.ranking())]
            }
            InboundMessage::SessionEnded => {
                if !self.room.end() {
                    warn!(phase = %self.room.phase(), "session-ended ignored");
                    return Vec::new();
                }
                self.countdown.stop();
                self.roster.clear();
                self.leaderboard.mark_final();
                vec![HostEvent::SessionEnded {
                    ranking: self.leaderboard.ranking(),
                }]
            }
        }
    }

    // -----------------------------------------------------------------------
    // Countdown
    // -----------------------------------------------------------------------

    /// When the pending countdown tick is due, if there is one.
    pub fn countdown_deadline(&self) -> Option<Instant> {
        self.countdown.deadline()
    }

    /// Fires the countdown. Reaching 0 changes nothing else.
    pub fn on_tick(&mut self) -> Option<HostEvent> {
        let remaining = self.countdown.fire()?;
        debug!(remaining, "tick");
        Some(HostEvent::CountdownTick(remaining))
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn phase(&self) -> &SessionPhase {
        self.room.phase()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn countdown(&self) -> Option<u32> {
        self.countdown.remaining()
    }

    pub fn questions(&self) -> &QuestionSet {
        &self.quiz
    }

    pub fn snapshot(&self) -> HostSnapshot {
        HostSnapshot {
            phase: self.room.phase().clone(),
            draft_code: self.room.draft_code().to_string(),
            capacity: self.room.capacity(),
            roster: self.roster.players().to_vec(),
            ranking: self.leaderboard.ranking(),
            is_final: self.leaderboard.is_final(),
            countdown: self.countdown.remaining(),
            questions: self.quiz.questions().to_vec(),
        }
    }
}

impl Default for HostSession {
    fn default() -> Self {
        Self::new(
            "Host",
            RoomConfig::default(),
            QuizConfig::default(),
            CountdownConfig::default(),
        )
    }
}
