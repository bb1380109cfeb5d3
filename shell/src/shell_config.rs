use serde::{Deserialize, Serialize};

use engine::GameSettings;
use engine::config::{ConfigManager, FileConfigSource, Validate};
use engine::highscore::HIGH_SCORE_FILE;

pub const CONFIG_FILE: &str = "snake_venture_config.yaml";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShellConfig {
    pub game: GameSettings,
    pub muted: bool,
    pub high_score_file: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            game: GameSettings::default(),
            muted: false,
            high_score_file: HIGH_SCORE_FILE.to_string(),
        }
    }
}

impl Validate for ShellConfig {
    fn validate(&self) -> Result<(), String> {
        self.game.validate()?;
        if self.high_score_file.is_empty() {
            return Err("high_score_file must not be empty".to_string());
        }
        Ok(())
    }
}

pub fn config_manager(path: &str) -> ConfigManager<FileConfigSource, ShellConfig> {
    ConfigManager::from_yaml_file(path)
}
