use engine::{GameEvent, log};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    Eat,
    GameOver,
    PowerUp,
    LevelUp,
    Collision,
    Move,
    ButtonClick,
    Teleport,
}

/// Maps an engine event to the cue the shell should play, if any.
/// The move cue fires every fifth tick to avoid sound overload; edge
/// wraps get the teleport cue instead.
pub fn cue_for_event(event: &GameEvent) -> Option<SoundCue> {
    match event {
        GameEvent::FoodEaten { .. } => Some(SoundCue::Eat),
        GameEvent::GameOver { .. } => Some(SoundCue::GameOver),
        GameEvent::PowerUpActivated { .. } => Some(SoundCue::PowerUp),
        GameEvent::LevelUp { .. } => Some(SoundCue::LevelUp),
        GameEvent::ShieldSaved | GameEvent::ObstacleAdded { .. } => Some(SoundCue::Collision),
        GameEvent::Moved { wrapped: true, .. } => Some(SoundCue::Teleport),
        GameEvent::Moved { tick, .. } if tick % 5 == 0 => Some(SoundCue::Move),
        GameEvent::GameStarted | GameEvent::GamePaused | GameEvent::GameResumed => {
            Some(SoundCue::ButtonClick)
        }
        _ => None,
    }
}

/// Playback stub: cues are logged instead of mixed (audio output is out
/// of scope for the shell). Failures here can never reach the engine.
pub struct SoundPlayer {
    muted: bool,
}

impl SoundPlayer {
    pub fn new(muted: bool) -> Self {
        Self { muted }
    }

    pub fn play(&self, cue: SoundCue) {
        if self.muted {
            return;
        }
        log!("Sound cue: {:?}", cue);
    }
}
