//! `HostControllerBuilder`: configures and starts a host controller.

use quizhost_countdown::CountdownConfig;
use quizhost_protocol::JsonCodec;
use quizhost_quiz::QuizConfig;
use quizhost_room::RoomConfig;
use quizhost_roster::KickConfirmer;
use quizhost_transport::{Connection, TransportError, WebSocketConnection};

use crate::controller::{HostEvents, HostHandle, spawn_controller};
use crate::{HostError, HostSession};

/// Builder for configuring and starting a host controller.
///
/// # Example
///
/// ```rust,no_run
/// use quizhost::prelude::*;
///
/// # async fn run() -> Result<(), HostError> {
/// let (host, mut events) = HostHandle::builder()
///     .url("ws://127.0.0.1:3001")
///     .connect(AlwaysConfirm)
///     .await?;
/// host.set_room_code("QUIZ42").await?;
/// host.create_room().await?;
/// while let Some(event) = events.recv().await {
///     println!("{event:?}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HostControllerBuilder {
    url: String,
    host_name: String,
    countdown_config: CountdownConfig,
    room_config: RoomConfig,
    quiz_config: QuizConfig,
    command_buffer: usize,
}

impl HostControllerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: "ws://127.0.0.1:3001".to_string(),
            host_name: "Host".to_string(),
            countdown_config: CountdownConfig::default(),
            room_config: RoomConfig::default(),
            quiz_config: QuizConfig::default(),
            command_buffer: 32,
        }
    }

    /// Sets the coordinating service's WebSocket URL.
    pub fn url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    /// Sets the name the host joins its own room under.
    ///
    /// The leaderboard hides entries named "host", so changing this makes
    /// the host show up in the ranking.
    pub fn host_name(mut self, name: &str) -> Self {
        self.host_name = name.to_string();
        self
    }

    pub fn countdown_config(mut self, config: CountdownConfig) -> Self {
        self.countdown_config = config;
        self
    }

    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    pub fn quiz_config(mut self, config: QuizConfig) -> Self {
        self.quiz_config = config;
        self
    }

    /// Sets how many operator commands may queue before callers wait.
    pub fn command_buffer(mut self, size: usize) -> Self {
        self.command_buffer = size.max(1);
        self
    }

    /// Dials the service and starts the controller.
    ///
    /// Uses `JsonCodec` and `WebSocketConnection`.
    pub async fn connect(
        self,
        confirmer: impl KickConfirmer,
    ) -> Result<(HostHandle, HostEvents), HostError> {
        let conn = WebSocketConnection::connect(&self.url).await?;
        Ok(self.build_with_connection(conn, confirmer))
    }

    /// Starts the controller over an already-open connection.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn build_with_connection<C>(
        self,
        conn: C,
        confirmer: impl KickConfirmer,
    ) -> (HostHandle, HostEvents)
    where
        C: Connection<Error = TransportError>,
    {
        let session = HostSession::new(
            self.host_name,
            self.room_config,
            self.quiz_config,
            self.countdown_config,
        );
        spawn_controller(session, conn, confirmer, JsonCodec, self.command_buffer)
    }
}

impl Default for HostControllerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
