//! Confirmation hook for kicking a player.
//!
//! Removing someone from the lobby is destructive, so the roster never
//! sends a kick on its own. It asks a [`KickConfirmer`] first and only
//! proceeds on an explicit yes. The terminal panel implements this with a
//! y/N prompt; tests use [`AlwaysConfirm`] and [`NeverConfirm`].

use quizhost_protocol::LobbyPlayer;

/// Decides whether a kick should go ahead.
///
/// `Send + Sync + 'static` because the confirmer lives inside the
/// controller task for the whole session. The decision may block for as
/// long as the operator needs; no other operator action or inbound
/// message is handled while it is pending.
///
/// # Example
///
/// ```rust
/// use quizhost_protocol::LobbyPlayer;
/// use quizhost_roster::KickConfirmer;
///
/// /// Only lets the host kick players without an emoji.
/// struct NoEmojiOnly;
///
/// impl KickConfirmer for NoEmojiOnly {
///     async fn confirm(&self, player: &LobbyPlayer) -> bool {
///         player.emoji.is_none()
///     }
/// }
/// ```
pub trait KickConfirmer: Send + Sync + 'static {
    /// Returns `true` to send the kick, `false` to drop it.
    fn confirm(&self, player: &LobbyPlayer) -> impl std::future::Future<Output = bool> + Send;
}

/// Says yes to everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl KickConfirmer for AlwaysConfirm {
    async fn confirm(&self, _player: &LobbyPlayer) -> bool {
        true
    }
}

/// Says no to everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverConfirm;

impl KickConfirmer for NeverConfirm {
    async fn confirm(&self, _player: &LobbyPlayer) -> bool {
        false
    }
}
