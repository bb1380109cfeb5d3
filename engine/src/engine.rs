use std::time::{Duration, Instant};

use crate::game::{
    Direction, Food, GameEvent, GameSettings, GameState, GameStatus, Point, PowerUp, SessionRng,
};
use crate::highscore::HighScoreStore;
use crate::log;

/// Read-only view of the simulation handed to renderers and shells.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub grid_size: usize,
    pub snake: Vec<Point>,
    pub direction: Direction,
    pub food: Option<Food>,
    pub power_up: Option<PowerUp>,
    pub obstacles: Vec<Point>,
    pub status: GameStatus,
    pub score: u32,
    pub high_score: u32,
    pub tick: u64,
    pub tick_interval: Duration,
}

/// Owns the simulation state, the session RNG, and the persisted best
/// score. Collaborators drive it through the lifecycle operations and
/// read it through [`snapshot`].
///
/// [`snapshot`]: GameEngine::snapshot
pub struct GameEngine {
    state: GameState,
    rng: SessionRng,
    store: Option<HighScoreStore>,
}

impl GameEngine {
    pub fn new(settings: GameSettings, rng: SessionRng) -> Self {
        Self {
            state: GameState::new(settings, 0),
            rng,
            store: None,
        }
    }

    /// Loads the stored best score at construction and writes it back
    /// whenever a run ends with a new record.
    pub fn with_store(settings: GameSettings, rng: SessionRng, store: HighScoreStore) -> Self {
        let high_score = store.load();
        Self {
            state: GameState::new(settings, high_score),
            rng,
            store: Some(store),
        }
    }

    pub fn start(&mut self) -> Vec<GameEvent> {
        self.state.start(&mut self.rng)
    }

    pub fn pause(&mut self) -> Vec<GameEvent> {
        self.state.pause()
    }

    pub fn resume(&mut self) -> Vec<GameEvent> {
        self.state.resume()
    }

    pub fn reset(&mut self) -> Vec<GameEvent> {
        self.state.reset()
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.state.set_direction(direction);
    }

    /// Advances one tick and persists the high score on a new record.
    pub fn advance(&mut self) -> Vec<GameEvent> {
        let events = self.state.advance(Instant::now(), &mut self.rng);
        for event in &events {
            if let GameEvent::GameOver {
                score,
                new_high_score: true,
            } = event
            {
                self.persist_high_score(*score);
            }
        }
        events
    }

    fn persist_high_score(&self, score: u32) {
        let Some(store) = &self.store else {
            return;
        };
        // Storage failures never reach the simulation.
        if let Err(err) = store.save(score) {
            log!("Failed to persist high score: {}", err);
        }
    }

    pub fn status(&self) -> GameStatus {
        self.state.status()
    }

    pub fn score(&self) -> u32 {
        self.state.score()
    }

    pub fn high_score(&self) -> u32 {
        self.state.high_score()
    }

    pub fn tick_interval(&self) -> Duration {
        self.state.tick_interval()
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = &self.state;
        Snapshot {
            grid_size: state.settings().grid_size,
            snake: state.snake().segments().copied().collect(),
            direction: state.direction(),
            food: state.food(),
            power_up: state.power_up(),
            obstacles: state.obstacles().to_vec(),
            status: state.status(),
            score: state.score(),
            high_score: state.high_score(),
            tick: state.tick(),
            tick_interval: state.tick_interval(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_started_run() {
        let mut engine = GameEngine::new(GameSettings::default(), SessionRng::new(1));
        assert_eq!(engine.status(), GameStatus::Idle);

        engine.start();
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.status, GameStatus::Playing);
        assert_eq!(snapshot.snake.len(), 3);
        assert_eq!(snapshot.direction, Direction::Right);
        assert!(snapshot.food.is_some());
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.tick, 0);
    }

    #[test]
    fn test_advance_produces_move_events() {
        let mut engine = GameEngine::new(GameSettings::default(), SessionRng::new(2));
        engine.start();
        let events = engine.advance();
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::Moved { tick: 1, .. }))
        );
        assert_eq!(engine.snapshot().tick, 1);
    }

    #[test]
    fn test_advance_outside_playing_is_noop() {
        let mut engine = GameEngine::new(GameSettings::default(), SessionRng::new(3));
        assert!(engine.advance().is_empty());
        engine.start();
        engine.pause();
        assert!(engine.advance().is_empty());
    }
}
