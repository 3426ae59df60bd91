//! The host controller actor and its handle.
//!
//! One Tokio task owns the [`HostSession`] and the connection. It wakes on
//! three things, one at a time: an operator command from a
//! [`HostHandle`], an inbound frame, or the countdown deadline. No state
//! is shared; the handle only sends commands and waits for replies.

use quizhost_countdown::sleep_until_deadline;
use quizhost_protocol::{Codec, InboundMessage, OutboundMessage, PlayerId};
use quizhost_quiz::FieldEdit;
use quizhost_room::Room;
use quizhost_roster::KickConfirmer;
use quizhost_transport::{Connection, TransportError};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::{HostError, HostEvent, HostSession, HostSnapshot};

/// Receiving end of the operator event stream.
pub type HostEvents = mpsc::UnboundedReceiver<HostEvent>;

type Reply<T> = oneshot::Sender<Result<T, HostError>>;

/// Commands sent to the controller through its channel.
pub(crate) enum HostCommand {
    SetRoomCode { code: String, reply: Reply<()> },
    SetCapacity { capacity: u32, reply: Reply<()> },
    CreateRoom { reply: Reply<Room> },
    SetQuestionCount { count: usize, reply: Reply<()> },
    EditField { index: usize, edit: FieldEdit, reply: Reply<()> },
    EditOption { index: usize, option: usize, value: String, reply: Reply<()> },
    BulkPaste { index: usize, raw: String, reply: Reply<()> },
    Submit { reply: Reply<Room> },
    /// Replies `true` if the kick was confirmed and sent.
    Kick { player_id: PlayerId, reply: Reply<bool> },
    Snapshot { reply: oneshot::Sender<HostSnapshot> },
    Shutdown { reply: oneshot::Sender<()> },
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Handle to a running controller.
///
/// Cheap to clone. Every method waits for the controller to finish the
/// action and returns its result; once the controller has stopped they
/// all return [`HostError::ControllerClosed`].
#[derive(Clone)]
pub struct HostHandle {
    sender: mpsc::Sender<HostCommand>,
}

impl HostHandle {
    /// Creates a new builder.
    pub fn builder() -> crate::HostControllerBuilder {
        crate::HostControllerBuilder::new()
    }

    /// Stores a candidate room code. Nothing is sent.
    pub async fn set_room_code(&self, code: impl Into<String>) -> Result<(), HostError> {
        let code = code.into();
        self.request(|reply| HostCommand::SetRoomCode { code, reply }).await
    }

    /// Sets the player capacity. Fails once the room exists.
    pub async fn set_capacity(&self, capacity: u32) -> Result<(), HostError> {
        self.request(|reply| HostCommand::SetCapacity { capacity, reply })
            .await
    }

    /// Sends `create-room` for the drafted code and capacity.
    pub async fn create_room(&self) -> Result<Room, HostError> {
        self.request(|reply| HostCommand::CreateRoom { reply }).await
    }

    /// Throws the batch away and starts over with `count` blank questions.
    pub async fn set_question_count(&self, count: usize) -> Result<(), HostError> {
        self.request(|reply| HostCommand::SetQuestionCount { count, reply })
            .await
    }

    pub async fn edit_field(&self, index: usize, edit: FieldEdit) -> Result<(), HostError> {
        self.request(|reply| HostCommand::EditField { index, edit, reply })
            .await
    }

    pub async fn edit_option(
        &self,
        index: usize,
        option: usize,
        value: impl Into<String>,
    ) -> Result<(), HostError> {
        let value = value.into();
        self.request(|reply| HostCommand::EditOption {
            index,
            option,
            value,
            reply,
        })
        .await
    }

    pub async fn apply_bulk_paste(
        &self,
        index: usize,
        raw: impl Into<String>,
    ) -> Result<(), HostError> {
        let raw = raw.into();
        self.request(|reply| HostCommand::BulkPaste { index, raw, reply })
            .await
    }

    /// Validates the batch, sends it, and starts round 1.
    pub async fn submit(&self) -> Result<Room, HostError> {
        self.request(|reply| HostCommand::Submit { reply }).await
    }

    /// Asks the confirmer, then sends `kick-player` on a yes.
    ///
    /// Returns `false` when the operator declined.
    pub async fn kick(&self, player_id: PlayerId) -> Result<bool, HostError> {
        self.request(|reply| HostCommand::Kick { player_id, reply })
            .await
    }

    /// Returns a copy of the current state.
    pub async fn snapshot(&self) -> Result<HostSnapshot, HostError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(HostCommand::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| HostError::ControllerClosed)?;
        reply_rx.await.map_err(|_| HostError::ControllerClosed)
    }

    /// Closes the connection and stops the controller.
    pub async fn shutdown(&self) -> Result<(), HostError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(HostCommand::Shutdown { reply: reply_tx })
            .await
            .map_err(|_| HostError::ControllerClosed)?;
        reply_rx.await.map_err(|_| HostError::ControllerClosed)
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(Reply<T>) -> HostCommand,
    ) -> Result<T, HostError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(command(reply_tx))
            .await
            .map_err(|_| HostError::ControllerClosed)?;
        reply_rx.await.map_err(|_| HostError::ControllerClosed)?
    }
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// What woke the actor up.
enum Wake {
    Command(Option<HostCommand>),
    Inbound(Result<Option<Vec<u8>>, TransportError>),
    Tick,
}

/// The controller state. Runs inside a Tokio task.
struct HostActor<C, K, D> {
    session: HostSession,
    conn: C,
    confirmer: K,
    codec: D,
    commands: mpsc::Receiver<HostCommand>,
    events: mpsc::UnboundedSender<HostEvent>,
}

impl<C, K, D> HostActor<C, K, D>
where
    C: Connection<Error = TransportError>,
    K: KickConfirmer,
    D: Codec,
{
    async fn run(mut self) {
        let conn_id = self.conn.id();
        info!(%conn_id, "host controller started");

        loop {
            let deadline = self.session.countdown_deadline();
            let wake = tokio::select! {
                cmd = self.commands.recv() => Wake::Command(cmd),
                frame = self.conn.recv() => Wake::Inbound(frame),
                () = sleep_until_deadline(deadline) => Wake::Tick,
            };

            match wake {
                Wake::Command(Some(HostCommand::Shutdown { reply })) => {
                    if let Err(e) = self.conn.close().await {
                        debug!(%conn_id, error = %e, "close failed");
                    }
                    self.emit(HostEvent::Disconnected);
                    let _ = reply.send(());
                    break;
                }
                Wake::Command(Some(cmd)) => self.handle_command(cmd).await,
                Wake::Command(None) => {
                    debug!(%conn_id, "all handles dropped");
                    let _ = self.conn.close().await;
                    break;
                }
                Wake::Inbound(Ok(Some(data))) => self.handle_frame(&data),
                Wake::Inbound(Ok(None)) => {
                    info!(%conn_id, "connection closed by service");
                    self.emit(HostEvent::Disconnected);
                    break;
                }
                Wake::Inbound(Err(e)) => {
                    warn!(%conn_id, error = %e, "receive failed");
                    self.emit(HostEvent::Disconnected);
                    break;
                }
                Wake::Tick => {
                    if let Some(event) = self.session.on_tick() {
                        self.emit(event);
                    }
                }
            }
        }

        info!(%conn_id, "host controller stopped");
    }

    async fn handle_command(&mut self, cmd: HostCommand) {
        match cmd {
            HostCommand::SetRoomCode { code, reply } => {
                self.session.set_room_code(code);
                let _ = reply.send(Ok(()));
            }
            HostCommand::SetCapacity { capacity, reply } => {
                let _ = reply.send(self.session.set_capacity(capacity));
            }
            HostCommand::CreateRoom { reply } => {
                let _ = reply.send(self.create_room().await);
            }
            HostCommand::SetQuestionCount { count, reply } => {
                let _ = reply.send(self.session.set_question_count(count));
            }
            HostCommand::EditField { index, edit, reply } => {
                let _ = reply.send(self.session.edit_field(index, edit));
            }
            HostCommand::EditOption {
                index,
                option,
                value,
                reply,
            } => {
                let _ = reply.send(self.session.edit_option(index, option, value));
            }
            HostCommand::BulkPaste { index, raw, reply } => {
                let _ = reply.send(self.session.apply_bulk_paste(index, &raw));
            }
            HostCommand::Submit { reply } => {
                let _ = reply.send(self.submit().await);
            }
            HostCommand::Kick { player_id, reply } => {
                let _ = reply.send(self.kick(&player_id).await);
            }
            HostCommand::Snapshot { reply } => {
                let _ = reply.send(self.session.snapshot());
            }
            // Handled by the run loop.
            HostCommand::Shutdown { reply } => {
                let _ = reply.send(());
            }
        }
    }

    /// Sends first and commits after, so a failed send leaves the session
    /// as it was and the operator can retry.
    async fn create_room(&mut self) -> Result<Room, HostError> {
        let (_, msg) = self.session.preview_create_room()?;
        self.send(&msg).await?;
        let (room, _) = self.session.create_room()?;
        self.emit(HostEvent::RoomCreated(room.clone()));
        Ok(room)
    }

    /// Same send-then-commit order as `create_room`. If a later frame
    /// fails, the earlier ones have already gone out; a retry resends all
    /// three.
    async fn submit(&mut self) -> Result<Room, HostError> {
        let (_, msgs) = self.session.preview_submit()?;
        for msg in &msgs {
            self.send(msg).await?;
        }
        let (room, _) = self.session.submit()?;
        self.emit(HostEvent::SessionStarted {
            room: room.clone(),
            questions: self.session.questions().len(),
        });
        Ok(room)
    }

    async fn kick(&mut self, player_id: &PlayerId) -> Result<bool, HostError> {
        match self.session.request_kick(player_id, &self.confirmer).await? {
            Some(msg) => {
                self.send(&msg).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn handle_frame(&mut self, data: &[u8]) {
        let msg: InboundMessage = match self.codec.decode(data) {
            Ok(msg) => msg,
            Err(e) => {
                debug!(error = %e, "failed to decode frame, skipping");
                return;
            }
        };
        debug!(event = msg.event(), "inbound");
        for event in self.session.handle_inbound(msg) {
            self.emit(event);
        }
    }

    async fn send(&self, msg: &OutboundMessage) -> Result<(), HostError> {
        let bytes = self.codec.encode(msg)?;
        self.conn.send(&bytes).await?;
        debug!(event = msg.event(), "sent");
        Ok(())
    }

    /// Drops the event if nobody is listening.
    fn emit(&self, event: HostEvent) {
        let _ = self.events.send(event);
    }
}

/// Spawns the controller task and returns a handle plus the event stream.
pub(crate) fn spawn_controller<C, K, D>(
    session: HostSession,
    conn: C,
    confirmer: K,
    codec: D,
    channel_size: usize,
) -> (HostHandle, HostEvents)
where
    C: Connection<Error = TransportError>,
    K: KickConfirmer,
    D: Codec,
{
    let (cmd_tx, cmd_rx) = mpsc::channel(channel_size);
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let actor = HostActor {
        session,
        conn,
        confirmer,
        codec,
        commands: cmd_rx,
        events: event_tx,
    };
    tokio::spawn(actor.run());

    (HostHandle { sender: cmd_tx }, event_rx)
}
