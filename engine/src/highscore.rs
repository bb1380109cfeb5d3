use serde::{Deserialize, Serialize};

use crate::config::{ConfigManager, FileConfigSource, Validate};
use crate::log;

/// Fixed identifier for the persisted best score.
pub const HIGH_SCORE_FILE: &str = "snake_venture_highscore.yaml";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub best_score: u32,
}

impl Validate for HighScoreRecord {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// File-backed store for the single best-score value. A missing or
/// unreadable file reads as zero; the record only ever moves upward
/// because the engine writes it solely on a new record at game-over.
pub struct HighScoreStore {
    manager: ConfigManager<FileConfigSource, HighScoreRecord>,
}

impl HighScoreStore {
    pub fn from_yaml_file(file_path: &str) -> Self {
        Self {
            manager: ConfigManager::from_yaml_file(file_path),
        }
    }

    pub fn default_file() -> Self {
        Self::from_yaml_file(HIGH_SCORE_FILE)
    }

    pub fn load(&self) -> u32 {
        match self.manager.load() {
            Ok(record) => record.best_score,
            Err(err) => {
                log!("Failed to load high score, starting from 0: {}", err);
                0
            }
        }
    }

    pub fn save(&self, best_score: u32) -> Result<(), String> {
        self.manager.store(&HighScoreRecord { best_score })
    }
}
