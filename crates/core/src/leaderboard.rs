//! In-memory leaderboard used by the terminal binary.

use crate::error::ServiceError;
use crate::service::{AllTimeStats, LeaderboardEntry, ScoreService, Standings};

/// Rows returned in [`Standings::leaderboard`].
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

/// Best score per player, kept sorted by score (descending).
///
/// A player's entry only changes when they beat their own best. Equal scores
/// keep the order in which they were reached.
#[derive(Debug, Clone)]
pub struct LocalLeaderboard {
    player: String,
    limit: usize,
    entries: Vec<LeaderboardEntry>,
}

impl LocalLeaderboard {
    pub fn new(player: impl Into<String>) -> Self {
        Self::with_limit(player, DEFAULT_LEADERBOARD_LIMIT)
    }

    pub fn with_limit(player: impl Into<String>, limit: usize) -> Self {
        Self {
            player: player.into(),
            limit,
            entries: Vec::new(),
        }
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    /// Record `score` for `name`. Returns whether the stored best changed.
    pub fn record(&mut self, name: &str, score: u32) -> bool {
        if let Some(i) = self.entries.iter().position(|e| e.name == name) {
            if self.entries[i].score >= score {
                return false;
            }
            self.entries.remove(i);
        }

        // After every equal-or-better score.
        let at = self.entries.partition_point(|e| e.score >= score);
        self.entries.insert(
            at,
            LeaderboardEntry {
                name: name.to_string(),
                score,
            },
        );
        true
    }

    pub fn stats_for(&self, name: &str) -> AllTimeStats {
        self.entries
            .iter()
            .position(|e| e.name == name)
            .map(|i| AllTimeStats {
                rank: i as u32 + 1,
                score: self.entries[i].score,
            })
            .unwrap_or_default()
    }

    pub fn top(&self) -> &[LeaderboardEntry] {
        &self.entries[..self.entries.len().min(self.limit)]
    }

    fn current(&self) -> Standings {
        Standings {
            leaderboard: self.top().to_vec(),
            all_time: self.stats_for(&self.player),
        }
    }
}

impl ScoreService for LocalLeaderboard {
    fn standings(&mut self) -> Result<Standings, ServiceError> {
        Ok(self.current())
    }

    fn submit_score(&mut self, score: u32) -> Result<Standings, ServiceError> {
        let player = self.player.clone();
        if self.record(&player, score) {
            log::info!("new personal best for {}: {}", player, score);
        }
        Ok(self.current())
    }
}
