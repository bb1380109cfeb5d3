use crate::engine::Snapshot;
use crate::game::{Direction, GameEvent};

/// Receives everything the engine publishes: one snapshot per tick plus
/// the discrete events. Implementations must not feed anything back into
/// the simulation.
pub trait GameObserver: Send {
    fn on_event(&mut self, event: &GameEvent);
    fn on_snapshot(&mut self, snapshot: &Snapshot);
}

/// Supplies a direction intent once per tick boundary. Returning `None`
/// keeps the current heading.
pub trait DirectionSource: Send {
    fn next_direction(&mut self, snapshot: &Snapshot) -> Option<Direction>;
}
