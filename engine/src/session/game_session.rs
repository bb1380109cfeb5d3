use std::sync::Arc;

use tokio::sync::{Mutex, Notify};

use crate::engine::{GameEngine, Snapshot};
use crate::game::{Direction, GameEvent, GameStatus};

use super::observer::{DirectionSource, GameObserver};

/// Shared handle to one running game. Lifecycle calls may arrive from
/// any task; their events are queued and delivered by the loop so the
/// observer sees everything in order.
#[derive(Clone)]
pub struct GameSession {
    pub engine: Arc<Mutex<GameEngine>>,
    pub tick: Arc<Mutex<u64>>,
    pending_events: Arc<Mutex<Vec<GameEvent>>>,
    resumed: Arc<Notify>,
}

#[derive(Clone, Debug)]
pub struct GameSummary {
    pub status: GameStatus,
    pub score: u32,
    pub high_score: u32,
    pub ticks: u64,
}

impl GameSession {
    pub fn new(engine: GameEngine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            tick: Arc::new(Mutex::new(0u64)),
            pending_events: Arc::new(Mutex::new(Vec::new())),
            resumed: Arc::new(Notify::new()),
        }
    }

    pub async fn set_direction(&self, direction: Direction) {
        self.engine.lock().await.set_direction(direction);
    }

    pub async fn pause(&self) {
        let events = self.engine.lock().await.pause();
        self.pending_events.lock().await.extend(events);
    }

    pub async fn resume(&self) {
        let events = self.engine.lock().await.resume();
        self.pending_events.lock().await.extend(events);
        self.resumed.notify_one();
    }

    pub async fn reset(&self) {
        let events = self.engine.lock().await.reset();
        self.pending_events.lock().await.extend(events);
        // Wake a parked loop so it can observe the idle state and stop.
        self.resumed.notify_one();
    }

    pub async fn current_tick(&self) -> u64 {
        *self.tick.lock().await
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.engine.lock().await.snapshot()
    }
}

/// Starts the run and drives it tick by tick until game over, reset, or
/// the optional tick bound. The timer period follows the engine's
/// current interval, so a speed boost takes effect on the next tick.
pub async fn run_game_loop<O, D>(
    session: &GameSession,
    mut observer: O,
    mut direction_source: D,
    max_ticks: Option<u64>,
) -> GameSummary
where
    O: GameObserver,
    D: DirectionSource,
{
    {
        let mut engine = session.engine.lock().await;
        let events = engine.start();
        let snapshot = engine.snapshot();
        drop(engine);
        for event in &events {
            observer.on_event(event);
        }
        observer.on_snapshot(&snapshot);
    }

    let mut ticks: u64 = 0;
    loop {
        let interval = { session.engine.lock().await.tick_interval() };
        tokio::time::sleep(interval).await;

        let queued: Vec<GameEvent> = std::mem::take(&mut *session.pending_events.lock().await);
        for event in &queued {
            observer.on_event(event);
        }

        let mut engine = session.engine.lock().await;
        match engine.status() {
            GameStatus::Paused => {
                drop(engine);
                session.resumed.notified().await;
                continue;
            }
            GameStatus::Idle | GameStatus::GameOver => break,
            GameStatus::Playing => {}
        }

        if let Some(direction) = direction_source.next_direction(&engine.snapshot()) {
            engine.set_direction(direction);
        }
        let events = engine.advance();
        let snapshot = engine.snapshot();
        drop(engine);

        ticks += 1;
        *session.tick.lock().await += 1;

        for event in &events {
            observer.on_event(event);
        }
        observer.on_snapshot(&snapshot);

        if snapshot.status == GameStatus::GameOver {
            break;
        }
        if let Some(limit) = max_ticks
            && ticks >= limit
        {
            break;
        }
    }

    let queued: Vec<GameEvent> = std::mem::take(&mut *session.pending_events.lock().await);
    for event in &queued {
        observer.on_event(event);
    }

    let engine = session.engine.lock().await;
    GameSummary {
        status: engine.status(),
        score: engine.score(),
        high_score: engine.high_score(),
        ticks,
    }
}
