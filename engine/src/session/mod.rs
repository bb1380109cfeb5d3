mod game_session;
mod observer;

pub use game_session::{GameSession, GameSummary, run_game_loop};
pub use observer::{DirectionSource, GameObserver};
