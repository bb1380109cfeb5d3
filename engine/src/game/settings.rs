use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Validate;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    pub grid_size: usize,
    pub initial_snake_length: usize,
    pub tick_interval_ms: u64,
    /// Chance that a placed food is the 3-point special kind.
    pub special_food_probability: f32,
    /// Per-pickup chance of spawning a power-up once the score threshold
    /// is reached and no power-up exists.
    pub power_up_probability: f32,
    pub power_up_min_score: u32,
    pub max_obstacles: usize,
    /// An obstacle is added when the score is a positive multiple of this.
    pub obstacle_score_interval: u32,
    /// Number of food pickups a score multiplier doubles before expiring.
    pub multiplier_pickups: u32,
    pub speed_boost_factor: f32,
    pub speed_boost_duration_ms: u64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            grid_size: 20,
            initial_snake_length: 3,
            tick_interval_ms: 150,
            special_food_probability: 0.2,
            power_up_probability: 0.15,
            power_up_min_score: 5,
            max_obstacles: 5,
            obstacle_score_interval: 5,
            multiplier_pickups: 3,
            speed_boost_factor: 1.5,
            speed_boost_duration_ms: 5000,
        }
    }
}

impl GameSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn boosted_tick_interval(&self) -> Duration {
        Duration::from_millis((self.tick_interval_ms as f32 / self.speed_boost_factor) as u64)
    }

    pub fn speed_boost_duration(&self) -> Duration {
        Duration::from_millis(self.speed_boost_duration_ms)
    }
}

impl Validate for GameSettings {
    fn validate(&self) -> Result<(), String> {
        if self.grid_size < 10 || self.grid_size > 100 {
            return Err("Grid size must be between 10 and 100".to_string());
        }
        if self.initial_snake_length < 1 || self.initial_snake_length > self.grid_size / 2 {
            return Err("Initial snake length must be between 1 and half the grid size".to_string());
        }
        if self.tick_interval_ms < 50 || self.tick_interval_ms > 5000 {
            return Err("Tick interval must be between 50ms and 5000ms".to_string());
        }
        if !(0.0..=1.0).contains(&self.special_food_probability) {
            return Err("Special food probability must be between 0.0 and 1.0".to_string());
        }
        if !(0.0..=1.0).contains(&self.power_up_probability) {
            return Err("Power-up probability must be between 0.0 and 1.0".to_string());
        }
        if self.obstacle_score_interval == 0 {
            return Err("Obstacle score interval must be greater than 0".to_string());
        }
        if self.multiplier_pickups == 0 {
            return Err("Multiplier pickups must be greater than 0".to_string());
        }
        if self.speed_boost_factor < 1.0 {
            return Err("Speed boost factor must be at least 1.0".to_string());
        }
        if self.speed_boost_duration_ms == 0 {
            return Err("Speed boost duration must be greater than 0".to_string());
        }
        Ok(())
    }
}
