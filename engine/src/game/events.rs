use super::types::{Food, FoodKind, Point, PowerUpKind};

/// Discrete notifications emitted by the engine for observers to render
/// as messages and sound cues. The engine never plays sounds itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    GameStarted,
    GamePaused,
    GameResumed,
    GameReset,
    GameOver { score: u32, new_high_score: bool },
    /// One committed move. `wrapped` is true when the head crossed an edge.
    Moved { tick: u64, wrapped: bool },
    FoodEaten { kind: FoodKind, points: u32 },
    FoodSpawned { food: Food },
    ObstacleAdded { position: Point },
    PowerUpSpawned { kind: PowerUpKind, position: Point },
    PowerUpActivated { kind: PowerUpKind },
    PowerUpExpired { kind: PowerUpKind },
    /// A fatal collision was suppressed by consuming the shield.
    ShieldSaved,
    /// Score reached a positive multiple of ten.
    LevelUp { score: u32 },
}
