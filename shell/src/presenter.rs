use engine::session::GameObserver;
use engine::{GameEvent, PowerUpKind, Snapshot, log};

use crate::sound::{SoundPlayer, cue_for_event};

/// Turns engine output into user-facing log messages and sound cues.
pub struct ShellPresenter {
    sound: SoundPlayer,
}

impl ShellPresenter {
    pub fn new(muted: bool) -> Self {
        Self {
            sound: SoundPlayer::new(muted),
        }
    }
}

impl GameObserver for ShellPresenter {
    fn on_event(&mut self, event: &GameEvent) {
        if let Some(cue) = cue_for_event(event) {
            self.sound.play(cue);
        }

        match event {
            GameEvent::GameStarted => log!("Game started!"),
            GameEvent::GamePaused => log!("Game paused"),
            GameEvent::GameResumed => log!("Game resumed, snake is on the move again"),
            GameEvent::GameReset => log!("Game reset"),
            GameEvent::GameOver {
                score,
                new_high_score,
            } => {
                if *new_high_score {
                    log!("Game over! Score: {}. New high score!", score);
                } else {
                    log!("Game over! Score: {}", score);
                }
            }
            GameEvent::ObstacleAdded { .. } => {
                log!("New obstacle! The path gets more challenging");
            }
            GameEvent::PowerUpActivated { kind } => match kind {
                PowerUpKind::SpeedBoost => log!("Speed boost! Snake is moving faster temporarily"),
                PowerUpKind::ScoreMultiplier => {
                    log!("Score multiplier! The next foods give double points");
                }
                PowerUpKind::Shield => log!("Shield activated! Protected from one collision"),
            },
            GameEvent::ShieldSaved => log!("Shield used! It absorbed the collision"),
            _ => {}
        }
    }

    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        if snapshot.tick > 0 && snapshot.tick % 25 == 0 {
            log!(
                "Tick {}: length {}, score {} (best {})",
                snapshot.tick,
                snapshot.snake.len(),
                snapshot.score,
                snapshot.high_score
            );
        }
    }
}
