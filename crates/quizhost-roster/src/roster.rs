//! The mirrored lobby.

use quizhost_protocol::{LobbyPlayer, PlayerId};
use tracing::{debug, info};

use crate::{KickConfirmer, RosterError};

/// The players currently in the lobby, as last reported by the service.
///
/// Every update replaces the whole list. There is no diffing and no local
/// removal: a kicked player disappears only when the next `lobby-update`
/// leaves them out.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: Vec<LobbyPlayer>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the roster with the service's authoritative list.
    pub fn replace(&mut self, players: Vec<LobbyPlayer>) {
        debug!(before = self.players.len(), after = players.len(), "roster replaced");
        self.players = players;
    }

    /// Drops every player. Used when the session ends.
    pub fn clear(&mut self) {
        self.players.clear();
    }

    pub fn players(&self) -> &[LobbyPlayer] {
        &self.players
    }

    pub fn get(&self, id: &PlayerId) -> Option<&LobbyPlayer> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Asks `confirmer` whether `id` should be kicked.
    ///
    /// Returns the player on a yes and `None` on a no. Either way the
    /// roster is unchanged; the caller is responsible for sending the
    /// request.
    ///
    /// # Errors
    /// [`RosterError::UnknownPlayer`] if `id` isn't in the lobby. The
    /// confirmer is not consulted.
    pub async fn request_kick<C: KickConfirmer>(
        &self,
        id: &PlayerId,
        confirmer: &C,
    ) -> Result<Option<LobbyPlayer>, RosterError> {
        let player = self
            .get(id)
            .ok_or_else(|| RosterError::UnknownPlayer(id.clone()))?;

        if confirmer.confirm(player).await {
            info!(player = %player.id, name = %player.name, "kick confirmed");
            Ok(Some(player.clone()))
        } else {
            debug!(player = %player.id, "kick declined");
            Ok(None)
        }
    }
}
