//! Leaderboard for quizhost.
//!
//! The service pushes full score snapshots; the host holds the latest one
//! and ranks it for display. The host's own entry, if the service includes
//! it, is never ranked.

use quizhost_protocol::ScoreEntry;
use tracing::{debug, info};

/// The display name the host joins under. Matched case-insensitively.
pub const HOST_NAME: &str = "host";

/// One ranked row.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    /// 1-based position. Ties get consecutive ranks in input order.
    pub rank: usize,
    pub name: String,
    pub emoji: Option<String>,
    pub score: f64,
}

/// The latest score snapshot plus the terminal flag.
#[derive(Debug, Clone, Default)]
pub struct Leaderboard {
    entries: Vec<ScoreEntry>,
    is_final: bool,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the held entries with a new snapshot.
    pub fn replace(&mut self, entries: Vec<ScoreEntry>) {
        debug!(entries = entries.len(), "score snapshot replaced");
        self.entries = entries;
    }

    /// Marks the standings as final. Returns `false` if they already were.
    pub fn mark_final(&mut self) -> bool {
        if self.is_final {
            return false;
        }
        self.is_final = true;
        info!(entries = self.entries.len(), "leaderboard final");
        true
    }

    /// Drops the snapshot and the final flag.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.is_final = false;
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// The raw snapshot, unfiltered and unsorted.
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    /// Ranks the current snapshot for display. Pure; see [`rank`].
    pub fn ranking(&self) -> Vec<RankedEntry> {
        rank(&self.entries)
    }
}

/// Drops host entries and orders the rest by descending score.
///
/// The sort is stable, so equal scores keep their snapshot order. Calling
/// it twice on the same input gives the same output.
pub fn rank(entries: &[ScoreEntry]) -> Vec<RankedEntry> {
    let mut players: Vec<&ScoreEntry> = entries
        .iter()
        .filter(|e| !e.name.eq_ignore_ascii_case(HOST_NAME))
        .collect();
    players.sort_by(|a, b| b.score.total_cmp(&a.score));

    players
        .into_iter()
        .enumerate()
        .map(|(i, e)| RankedEntry {
            rank: i + 1,
            name: e.name.clone(),
            emoji: e.emoji.clone(),
            score: e.score,
        })
        .collect()
}
