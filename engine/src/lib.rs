pub mod config;
pub mod engine;
pub mod game;
pub mod highscore;
pub mod logger;
pub mod session;

pub use engine::{GameEngine, Snapshot};
pub use game::{
    Direction, Food, FoodKind, GameEvent, GameSettings, GameStatus, Point, PowerUp, PowerUpKind,
    SessionRng,
};
