//! Contracts for the collaborators the game talks to outside the frame loop:
//! where the configuration comes from and where final scores go.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::ServiceError;

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
}

/// The player's best result so far. `rank` is 1-based; 0 means unranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AllTimeStats {
    pub rank: u32,
    pub score: u32,
}

/// Leaderboard top plus the player's own stats.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standings {
    pub leaderboard: Vec<LeaderboardEntry>,
    pub all_time: AllTimeStats,
}

pub trait ConfigSource {
    fn fetch_config(&mut self) -> Result<GameConfig, ServiceError>;
}

/// Score submission. The game never retries on its own.
pub trait ScoreService {
    /// Current standings, fetched once while preparing.
    fn standings(&mut self) -> Result<Standings, ServiceError>;

    /// Record a finished run and return the updated standings.
    fn submit_score(&mut self, score: u32) -> Result<Standings, ServiceError>;
}

/// A fixed configuration.
impl ConfigSource for GameConfig {
    fn fetch_config(&mut self) -> Result<GameConfig, ServiceError> {
        Ok(self.clone())
    }
}

/// Configuration read from a JSON file on every fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonConfigFile(pub PathBuf);

impl ConfigSource for JsonConfigFile {
    fn fetch_config(&mut self) -> Result<GameConfig, ServiceError> {
        Ok(GameConfig::from_path(&self.0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_static_config_source_returns_copy() {
        let mut config = GameConfig::default();
        config.gameplay.distance = 7.0;
        let fetched = config.fetch_config().unwrap();
        assert_eq!(fetched, config);
    }

    #[test]
    fn test_json_file_source_reports_missing_file() {
        let mut source = JsonConfigFile(PathBuf::from("/nonexistent/stacker.json"));
        let err = source.fetch_config().unwrap_err();
        assert!(matches!(err, ServiceError::Config(ConfigError::Io { .. })));
    }

    #[test]
    fn test_standings_json_shape() {
        let standings = Standings {
            leaderboard: vec![LeaderboardEntry {
                name: "ada".to_string(),
                score: 12,
            }],
            all_time: AllTimeStats { rank: 1, score: 12 },
        };
        let json = serde_json::to_value(&standings).unwrap();
        assert_eq!(json["allTime"]["rank"], 1);
        assert_eq!(json["leaderboard"][0]["name"], "ada");
    }
}
