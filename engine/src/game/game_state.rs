use std::time::{Duration, Instant};

use crate::log;

use super::events::GameEvent;
use super::session_rng::SessionRng;
use super::settings::GameSettings;
use super::snake::Snake;
use super::types::{Direction, Food, FoodKind, GameStatus, Point, PowerUp, PowerUpKind};

/// Full simulation state of one snake run, advanced one tick at a time.
///
/// All mutation goes through the lifecycle operations and [`advance`];
/// collaborators only ever see read-only copies of the fields.
///
/// [`advance`]: GameState::advance
#[derive(Clone, Debug)]
pub struct GameState {
    settings: GameSettings,
    snake: Snake,
    direction: Direction,
    pending_direction: Option<Direction>,
    food: Option<Food>,
    power_up: Option<PowerUp>,
    obstacles: Vec<Point>,
    score: u32,
    high_score: u32,
    status: GameStatus,
    tick: u64,
    tick_interval: Duration,
    multiplier_pickups_left: u32,
    /// Deadline for the speed boost, applied at tick boundaries rather
    /// than by an independent timer so pause/reset cannot race it.
    speed_boost_expires_at: Option<Instant>,
}

impl GameState {
    pub fn new(settings: GameSettings, high_score: u32) -> Self {
        let tick_interval = settings.tick_interval();
        let snake = Snake::spawn(settings.grid_size, settings.initial_snake_length);
        Self {
            settings,
            snake,
            direction: Direction::Right,
            pending_direction: None,
            food: None,
            power_up: None,
            obstacles: Vec::new(),
            score: 0,
            high_score,
            status: GameStatus::Idle,
            tick: 0,
            tick_interval,
            multiplier_pickups_left: 0,
            speed_boost_expires_at: None,
        }
    }

    pub fn wrapping_inc(value: usize, max: usize) -> usize {
        if value + 1 >= max { 0 } else { value + 1 }
    }

    pub fn wrapping_dec(value: usize, max: usize) -> usize {
        if value == 0 { max - 1 } else { value - 1 }
    }

    /// Begins a fresh run. Valid from `Idle` and `GameOver`; a no-op
    /// otherwise, matching idempotent UI button semantics.
    pub fn start(&mut self, rng: &mut SessionRng) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !matches!(self.status, GameStatus::Idle | GameStatus::GameOver) {
            return events;
        }

        self.snake = Snake::spawn(self.settings.grid_size, self.settings.initial_snake_length);
        self.direction = Direction::Right;
        self.pending_direction = None;
        self.food = None;
        self.power_up = None;
        self.obstacles.clear();
        self.score = 0;
        self.tick = 0;
        self.tick_interval = self.settings.tick_interval();
        self.multiplier_pickups_left = 0;
        self.speed_boost_expires_at = None;
        self.status = GameStatus::Playing;

        events.push(GameEvent::GameStarted);
        self.place_food(rng, &mut events);
        events
    }

    /// Valid only from `Playing`; retains all state.
    pub fn pause(&mut self) -> Vec<GameEvent> {
        if self.status != GameStatus::Playing {
            return Vec::new();
        }
        self.status = GameStatus::Paused;
        vec![GameEvent::GamePaused]
    }

    /// Valid only from `Paused`; keeps the speed in effect when paused.
    pub fn resume(&mut self) -> Vec<GameEvent> {
        if self.status != GameStatus::Paused {
            return Vec::new();
        }
        self.status = GameStatus::Playing;
        vec![GameEvent::GameResumed]
    }

    /// Returns any non-idle state to `Idle`, clearing the run.
    pub fn reset(&mut self) -> Vec<GameEvent> {
        if self.status == GameStatus::Idle {
            return Vec::new();
        }
        self.snake = Snake::spawn(self.settings.grid_size, self.settings.initial_snake_length);
        self.direction = Direction::Right;
        self.pending_direction = None;
        self.food = None;
        self.power_up = None;
        self.obstacles.clear();
        self.score = 0;
        self.tick = 0;
        self.tick_interval = self.settings.tick_interval();
        self.multiplier_pickups_left = 0;
        self.speed_boost_expires_at = None;
        self.status = GameStatus::Idle;
        vec![GameEvent::GameReset]
    }

    /// Records the heading for the next tick. Intents opposite to the
    /// current heading are rejected so the snake cannot reverse through
    /// its own body; the last intent within a tick window wins.
    pub fn set_direction(&mut self, direction: Direction) {
        if self.status != GameStatus::Playing {
            return;
        }
        if direction.is_opposite(&self.direction) {
            return;
        }
        self.pending_direction = Some(direction);
    }

    /// Advances the simulation by one tick. `now` drives the speed-boost
    /// deadline check; callers outside tests pass `Instant::now()`.
    pub fn advance(&mut self, now: Instant, rng: &mut SessionRng) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.status != GameStatus::Playing {
            return events;
        }

        self.tick += 1;
        self.expire_speed_boost_if_due(now, &mut events);

        // A board-full skip on a previous tick may have left no food.
        if self.food.is_none() {
            self.place_food(rng, &mut events);
        }

        if let Some(next) = self.pending_direction.take() {
            self.direction = next;
        }

        let (new_head, wrapped) = self.step_from(self.snake.head(), self.direction);

        let eats_food = self.food.is_some_and(|f| f.position == new_head);
        let eats_power_up = self.power_up.is_some_and(|p| p.position == new_head);
        let hits_obstacle = self.obstacles.contains(&new_head);
        // The tail cell is exempt from self-collision whenever food is
        // eaten this tick. Behavior parity with the source rules; food
        // never overlaps the snake, so the exemption cannot fire today.
        let tail_exempt = eats_food && new_head == self.snake.tail();
        let hits_self = self.snake.occupies(new_head) && !tail_exempt;

        if hits_obstacle || hits_self {
            if self.shield_active() {
                // Shield-save: the collision is suppressed, the move
                // commits without growth, and the shield is consumed.
                self.power_up = None;
                self.snake.advance_to(new_head);
                log!(
                    "Shield consumed at ({}, {}), run continues",
                    new_head.x,
                    new_head.y
                );
                events.push(GameEvent::ShieldSaved);
                events.push(GameEvent::Moved {
                    tick: self.tick,
                    wrapped,
                });
                return events;
            }

            // Fatal: the head position is not committed.
            self.status = GameStatus::GameOver;
            let new_high_score = self.score > self.high_score;
            if new_high_score {
                self.high_score = self.score;
            }
            log!("Game over at score {}", self.score);
            events.push(GameEvent::GameOver {
                score: self.score,
                new_high_score,
            });
            return events;
        }

        if eats_food {
            self.snake.grow_to(new_head);
        } else {
            self.snake.advance_to(new_head);
        }
        events.push(GameEvent::Moved {
            tick: self.tick,
            wrapped,
        });

        if eats_food {
            self.consume_food(new_head, rng, &mut events);
        }

        if eats_power_up {
            self.activate_power_up(now, &mut events);
        }

        events
    }

    fn consume_food(&mut self, head: Point, rng: &mut SessionRng, events: &mut Vec<GameEvent>) {
        let eaten = self.food.take().expect("consume_food requires food");

        let mut points = match eaten.kind {
            FoodKind::Special => 3,
            FoodKind::Normal => 1,
        };
        if self.multiplier_active() {
            points *= 2;
            self.multiplier_pickups_left -= 1;
            if self.multiplier_pickups_left == 0 {
                self.power_up = None;
                events.push(GameEvent::PowerUpExpired {
                    kind: PowerUpKind::ScoreMultiplier,
                });
            }
        }
        self.score += points;
        log!(
            "Ate {:?} food at ({}, {}). Score: {}",
            eaten.kind,
            head.x,
            head.y,
            self.score
        );
        events.push(GameEvent::FoodEaten {
            kind: eaten.kind,
            points,
        });
        if self.score % 10 == 0 {
            events.push(GameEvent::LevelUp { score: self.score });
        }

        self.place_food(rng, events);
        self.maybe_add_obstacle(rng, events);
        self.maybe_spawn_power_up(rng, events);
    }

    fn activate_power_up(&mut self, now: Instant, events: &mut Vec<GameEvent>) {
        let Some(power_up) = self.power_up.as_mut() else {
            return;
        };
        power_up.active = true;
        let kind = power_up.kind;

        match kind {
            PowerUpKind::SpeedBoost => {
                self.tick_interval = self.settings.boosted_tick_interval();
                self.speed_boost_expires_at = Some(now + self.settings.speed_boost_duration());
            }
            PowerUpKind::ScoreMultiplier => {
                self.multiplier_pickups_left = self.settings.multiplier_pickups;
            }
            PowerUpKind::Shield => {}
        }

        log!("Power-up activated: {:?}", kind);
        events.push(GameEvent::PowerUpActivated { kind });
    }

    fn expire_speed_boost_if_due(&mut self, now: Instant, events: &mut Vec<GameEvent>) {
        if let Some(deadline) = self.speed_boost_expires_at
            && now >= deadline
        {
            self.speed_boost_expires_at = None;
            self.tick_interval = self.settings.tick_interval();
            if let Some(power_up) = self.power_up
                && power_up.kind == PowerUpKind::SpeedBoost
            {
                self.power_up = None;
            }
            events.push(GameEvent::PowerUpExpired {
                kind: PowerUpKind::SpeedBoost,
            });
        }
    }

    fn step_from(&self, from: Point, direction: Direction) -> (Point, bool) {
        let grid = self.settings.grid_size;
        match direction {
            Direction::Up => (
                Point::new(from.x, Self::wrapping_dec(from.y, grid)),
                from.y == 0,
            ),
            Direction::Down => (
                Point::new(from.x, Self::wrapping_inc(from.y, grid)),
                from.y + 1 >= grid,
            ),
            Direction::Left => (
                Point::new(Self::wrapping_dec(from.x, grid), from.y),
                from.x == 0,
            ),
            Direction::Right => (
                Point::new(Self::wrapping_inc(from.x, grid), from.y),
                from.x + 1 >= grid,
            ),
        }
    }

    fn place_food(&mut self, rng: &mut SessionRng, events: &mut Vec<GameEvent>) {
        let Some(position) = self.random_free_cell(rng) else {
            log!("No free cell for food, skipping spawn");
            return;
        };
        let kind = if rng.random::<f32>() < self.settings.special_food_probability {
            FoodKind::Special
        } else {
            FoodKind::Normal
        };
        let food = Food { position, kind };
        self.food = Some(food);
        log!("Food spawned at ({}, {})", position.x, position.y);
        events.push(GameEvent::FoodSpawned { food });
    }

    fn maybe_add_obstacle(&mut self, rng: &mut SessionRng, events: &mut Vec<GameEvent>) {
        if self.score == 0 || self.score % self.settings.obstacle_score_interval != 0 {
            return;
        }
        if self.obstacles.len() >= self.settings.max_obstacles {
            return;
        }
        let Some(position) = self.random_free_cell(rng) else {
            log!("No free cell for obstacle, skipping spawn");
            return;
        };
        self.obstacles.push(position);
        log!("Obstacle added at ({}, {})", position.x, position.y);
        events.push(GameEvent::ObstacleAdded { position });
    }

    fn maybe_spawn_power_up(&mut self, rng: &mut SessionRng, events: &mut Vec<GameEvent>) {
        if self.power_up.is_some() {
            return;
        }
        if self.score < self.settings.power_up_min_score {
            return;
        }
        if rng.random::<f32>() >= self.settings.power_up_probability {
            return;
        }
        let Some(position) = self.random_free_cell(rng) else {
            log!("No free cell for power-up, skipping spawn");
            return;
        };
        let kind = match rng.random_range(0..3) {
            0 => PowerUpKind::SpeedBoost,
            1 => PowerUpKind::ScoreMultiplier,
            _ => PowerUpKind::Shield,
        };
        self.power_up = Some(PowerUp {
            position,
            kind,
            active: false,
        });
        log!(
            "Power-up {:?} spawned at ({}, {})",
            kind,
            position.x,
            position.y
        );
        events.push(GameEvent::PowerUpSpawned { kind, position });
    }

    /// Uniform rejection sampling over the grid, excluding every tracked
    /// entity. Returns `None` when the board has no free cell left so a
    /// spawn is skipped instead of looping forever.
    fn random_free_cell(&self, rng: &mut SessionRng) -> Option<Point> {
        let grid = self.settings.grid_size;
        let occupied = |p: Point| {
            self.snake.occupies(p)
                || self.obstacles.contains(&p)
                || self.food.is_some_and(|f| f.position == p)
                || self.power_up.is_some_and(|u| u.position == p)
        };

        let board_full =
            (0..grid).all(|y| (0..grid).all(|x| occupied(Point::new(x, y))));
        if board_full {
            return None;
        }

        loop {
            let candidate = Point::new(rng.random_range(0..grid), rng.random_range(0..grid));
            if !occupied(candidate) {
                return Some(candidate);
            }
        }
    }

    fn shield_active(&self) -> bool {
        self.power_up
            .is_some_and(|p| p.kind == PowerUpKind::Shield && p.active)
    }

    fn multiplier_active(&self) -> bool {
        self.power_up
            .is_some_and(|p| p.kind == PowerUpKind::ScoreMultiplier && p.active)
            && self.multiplier_pickups_left > 0
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn food(&self) -> Option<Food> {
        self.food
    }

    pub fn power_up(&self) -> Option<PowerUp> {
        self.power_up
    }

    pub fn obstacles(&self) -> &[Point] {
        &self.obstacles
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }
}

#[cfg(test)]
impl GameState {
    fn force_snake(&mut self, segments: &[Point], direction: Direction) {
        self.snake = Snake::from_segments(segments);
        self.direction = direction;
        self.pending_direction = None;
    }

    fn force_food(&mut self, position: Point, kind: FoodKind) {
        self.food = Some(Food { position, kind });
    }

    fn force_power_up(&mut self, power_up: Option<PowerUp>) {
        self.power_up = power_up;
    }

    fn force_score(&mut self, score: u32) {
        self.score = score;
    }

    fn force_obstacles(&mut self, obstacles: Vec<Point>) {
        self.obstacles = obstacles;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing_state(seed: u64) -> (GameState, SessionRng) {
        let mut rng = SessionRng::new(seed);
        let mut state = GameState::new(GameSettings::default(), 0);
        state.start(&mut rng);
        (state, rng)
    }

    fn now() -> Instant {
        Instant::now()
    }

    fn snake_segments(state: &GameState) -> Vec<Point> {
        state.snake().segments().copied().collect()
    }

    #[test]
    fn test_start_initializes_run() {
        let (state, _) = playing_state(1);
        assert_eq!(state.status(), GameStatus::Playing);
        assert_eq!(state.score(), 0);
        assert_eq!(state.direction(), Direction::Right);
        assert_eq!(
            snake_segments(&state),
            vec![Point::new(6, 10), Point::new(5, 10), Point::new(4, 10)]
        );
        assert!(state.obstacles().is_empty());
        assert!(state.power_up().is_none());

        let food = state.food().expect("start places food");
        assert!(!state.snake().occupies(food.position));
    }

    #[test]
    fn test_start_is_noop_while_playing() {
        let (mut state, mut rng) = playing_state(1);
        state.force_score(7);
        assert!(state.start(&mut rng).is_empty());
        assert_eq!(state.score(), 7);
    }

    #[test]
    fn test_tick_moves_without_growth() {
        let (mut state, mut rng) = playing_state(2);
        state.force_food(Point::new(0, 0), FoodKind::Normal);
        let events = state.advance(now(), &mut rng);
        assert_eq!(
            snake_segments(&state),
            vec![Point::new(7, 10), Point::new(6, 10), Point::new(5, 10)]
        );
        assert_eq!(state.score(), 0);
        assert!(events.contains(&GameEvent::Moved {
            tick: 1,
            wrapped: false
        }));
    }

    #[test]
    fn test_eating_food_grows_and_scores() {
        let (mut state, mut rng) = playing_state(3);
        state.force_food(Point::new(7, 10), FoodKind::Normal);
        let events = state.advance(now(), &mut rng);

        assert_eq!(
            snake_segments(&state),
            vec![
                Point::new(7, 10),
                Point::new(6, 10),
                Point::new(5, 10),
                Point::new(4, 10)
            ]
        );
        assert_eq!(state.score(), 1);
        assert!(events.contains(&GameEvent::FoodEaten {
            kind: FoodKind::Normal,
            points: 1
        }));

        let replacement = state.food().expect("food is replaced after eating");
        assert_ne!(replacement.position, Point::new(7, 10));
        assert!(!state.snake().occupies(replacement.position));
    }

    #[test]
    fn test_special_food_scores_three() {
        let (mut state, mut rng) = playing_state(4);
        state.force_food(Point::new(7, 10), FoodKind::Special);
        state.advance(now(), &mut rng);
        assert_eq!(state.score(), 3);
    }

    #[test]
    fn test_head_wraps_around_edge() {
        let (mut state, mut rng) = playing_state(5);
        state.force_snake(
            &[Point::new(19, 10), Point::new(18, 10), Point::new(17, 10)],
            Direction::Right,
        );
        state.force_food(Point::new(0, 0), FoodKind::Normal);
        let events = state.advance(now(), &mut rng);

        assert_eq!(state.status(), GameStatus::Playing);
        assert_eq!(state.snake().head(), Point::new(0, 10));
        assert!(events.contains(&GameEvent::Moved {
            tick: 1,
            wrapped: true
        }));
    }

    #[test]
    fn test_self_collision_ends_game_without_committing_head() {
        let (mut state, mut rng) = playing_state(6);
        // Hook shape: turning right from (5,10) runs into (6,10), which
        // is mid-body, not the tail.
        state.force_snake(
            &[
                Point::new(5, 10),
                Point::new(5, 9),
                Point::new(6, 9),
                Point::new(6, 10),
                Point::new(6, 11),
            ],
            Direction::Down,
        );
        state.force_food(Point::new(0, 0), FoodKind::Normal);
        state.set_direction(Direction::Right);
        let before = snake_segments(&state);
        let events = state.advance(now(), &mut rng);

        assert_eq!(state.status(), GameStatus::GameOver);
        assert_eq!(snake_segments(&state), before);
        assert!(events.contains(&GameEvent::GameOver {
            score: 0,
            new_high_score: false
        }));
    }

    #[test]
    fn test_obstacle_collision_ends_game() {
        let (mut state, mut rng) = playing_state(7);
        state.force_food(Point::new(0, 0), FoodKind::Normal);
        state.force_obstacles(vec![Point::new(7, 10)]);
        state.advance(now(), &mut rng);
        assert_eq!(state.status(), GameStatus::GameOver);
    }

    #[test]
    fn test_shield_save_suppresses_collision() {
        let (mut state, mut rng) = playing_state(8);
        state.force_food(Point::new(0, 0), FoodKind::Normal);
        state.force_obstacles(vec![Point::new(7, 10)]);
        state.force_power_up(Some(PowerUp {
            position: Point::new(15, 15),
            kind: PowerUpKind::Shield,
            active: true,
        }));
        let events = state.advance(now(), &mut rng);

        assert_eq!(state.status(), GameStatus::Playing);
        assert!(state.power_up().is_none());
        assert_eq!(state.snake().head(), Point::new(7, 10));
        assert_eq!(state.snake().len(), 3);
        assert!(events.contains(&GameEvent::ShieldSaved));
    }

    #[test]
    fn test_inactive_shield_on_board_does_not_save() {
        let (mut state, mut rng) = playing_state(9);
        state.force_food(Point::new(0, 0), FoodKind::Normal);
        state.force_obstacles(vec![Point::new(7, 10)]);
        state.force_power_up(Some(PowerUp {
            position: Point::new(15, 15),
            kind: PowerUpKind::Shield,
            active: false,
        }));
        state.advance(now(), &mut rng);
        assert_eq!(state.status(), GameStatus::GameOver);
    }

    #[test]
    fn test_pause_from_idle_is_noop() {
        let mut state = GameState::new(GameSettings::default(), 0);
        assert!(state.pause().is_empty());
        assert_eq!(state.status(), GameStatus::Idle);
    }

    #[test]
    fn test_pause_resume_round_trip() {
        let (mut state, mut rng) = playing_state(10);
        assert_eq!(state.pause(), vec![GameEvent::GamePaused]);
        assert_eq!(state.status(), GameStatus::Paused);
        // Ticks and resume-from-playing are no-ops while paused.
        assert!(state.advance(now(), &mut rng).is_empty());
        assert_eq!(state.resume(), vec![GameEvent::GameResumed]);
        assert_eq!(state.status(), GameStatus::Playing);
        assert!(state.resume().is_empty());
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let (mut state, mut rng) = playing_state(11);
        state.force_score(12);
        state.advance(now(), &mut rng);
        assert_eq!(state.reset(), vec![GameEvent::GameReset]);
        assert_eq!(state.status(), GameStatus::Idle);
        assert_eq!(state.score(), 0);
        assert!(state.reset().is_empty());
    }

    #[test]
    fn test_opposite_direction_intent_is_rejected() {
        let (mut state, mut rng) = playing_state(12);
        state.force_food(Point::new(0, 0), FoodKind::Normal);
        state.set_direction(Direction::Left);
        state.advance(now(), &mut rng);
        assert_eq!(state.snake().head(), Point::new(7, 10));

        state.set_direction(Direction::Up);
        state.advance(now(), &mut rng);
        assert_eq!(state.snake().head(), Point::new(7, 9));
        assert_eq!(state.direction(), Direction::Up);
    }

    #[test]
    fn test_last_intent_in_tick_window_wins() {
        let (mut state, mut rng) = playing_state(13);
        state.force_food(Point::new(0, 0), FoodKind::Normal);
        state.set_direction(Direction::Up);
        state.set_direction(Direction::Down);
        state.advance(now(), &mut rng);
        assert_eq!(state.snake().head(), Point::new(6, 11));
    }

    #[test]
    fn test_multiplier_doubles_then_expires() {
        // Suppress random power-up spawns so the expiry check is exact.
        let settings = GameSettings {
            power_up_probability: 0.0,
            ..GameSettings::default()
        };
        let mut rng = SessionRng::new(14);
        let mut state = GameState::new(settings, 0);
        state.start(&mut rng);
        state.force_power_up(Some(PowerUp {
            position: Point::new(7, 10),
            kind: PowerUpKind::ScoreMultiplier,
            active: false,
        }));
        state.force_food(Point::new(0, 0), FoodKind::Normal);
        let events = state.advance(now(), &mut rng);
        assert!(events.contains(&GameEvent::PowerUpActivated {
            kind: PowerUpKind::ScoreMultiplier
        }));

        // Three doubled pickups, then the multiplier is gone.
        for expected in [2u32, 4, 6] {
            let head = state.snake().head();
            let (next, _) = state.step_from(head, state.direction());
            state.force_food(next, FoodKind::Normal);
            state.advance(now(), &mut rng);
            assert_eq!(state.score(), expected);
        }
        assert!(state.power_up().is_none());

        let head = state.snake().head();
        let (next, _) = state.step_from(head, state.direction());
        state.force_food(next, FoodKind::Normal);
        state.advance(now(), &mut rng);
        assert_eq!(state.score(), 7);
    }

    #[test]
    fn test_speed_boost_applies_and_reverts() {
        let (mut state, mut rng) = playing_state(15);
        let base = state.settings().tick_interval();
        let boosted = state.settings().boosted_tick_interval();
        state.force_power_up(Some(PowerUp {
            position: Point::new(7, 10),
            kind: PowerUpKind::SpeedBoost,
            active: false,
        }));
        state.force_food(Point::new(0, 0), FoodKind::Normal);

        let picked_up_at = now();
        state.advance(picked_up_at, &mut rng);
        assert_eq!(state.tick_interval(), boosted);

        // Next tick boundary before the deadline keeps the boost.
        state.advance(picked_up_at + Duration::from_secs(1), &mut rng);
        assert_eq!(state.tick_interval(), boosted);

        // First tick boundary past the deadline reverts and clears it.
        let events = state.advance(picked_up_at + Duration::from_secs(6), &mut rng);
        assert_eq!(state.tick_interval(), base);
        assert!(state.power_up().is_none());
        assert!(events.contains(&GameEvent::PowerUpExpired {
            kind: PowerUpKind::SpeedBoost
        }));
    }

    #[test]
    fn test_obstacle_added_on_score_multiple_of_five() {
        let (mut state, mut rng) = playing_state(16);
        state.force_score(4);
        state.force_food(Point::new(7, 10), FoodKind::Normal);
        let events = state.advance(now(), &mut rng);

        assert_eq!(state.score(), 5);
        assert_eq!(state.obstacles().len(), 1);
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::ObstacleAdded { .. }))
        );
    }

    #[test]
    fn test_obstacle_count_is_capped() {
        let (mut state, mut rng) = playing_state(17);
        state.force_score(9);
        state.force_obstacles(vec![
            Point::new(0, 0),
            Point::new(0, 1),
            Point::new(0, 2),
            Point::new(0, 3),
            Point::new(0, 4),
        ]);
        state.force_food(Point::new(7, 10), FoodKind::Normal);
        state.advance(now(), &mut rng);
        assert_eq!(state.score(), 10);
        assert_eq!(state.obstacles().len(), 5);
    }

    #[test]
    fn test_level_up_at_multiple_of_ten() {
        let (mut state, mut rng) = playing_state(18);
        state.force_score(9);
        state.force_food(Point::new(7, 10), FoodKind::Normal);
        let events = state.advance(now(), &mut rng);
        assert!(events.contains(&GameEvent::LevelUp { score: 10 }));
    }

    #[test]
    fn test_power_up_pickup_marks_active() {
        let (mut state, mut rng) = playing_state(19);
        state.force_food(Point::new(0, 0), FoodKind::Normal);
        state.force_power_up(Some(PowerUp {
            position: Point::new(7, 10),
            kind: PowerUpKind::Shield,
            active: false,
        }));
        let events = state.advance(now(), &mut rng);

        let power_up = state.power_up().expect("shield stays after pickup");
        assert!(power_up.active);
        assert!(events.contains(&GameEvent::PowerUpActivated {
            kind: PowerUpKind::Shield
        }));
    }

    #[test]
    fn test_high_score_commits_only_on_improvement() {
        let (mut state, mut rng) = playing_state(20);
        state.force_score(3);
        state.force_food(Point::new(0, 0), FoodKind::Normal);
        state.force_obstacles(vec![Point::new(7, 10)]);
        let events = state.advance(now(), &mut rng);
        assert!(events.contains(&GameEvent::GameOver {
            score: 3,
            new_high_score: true
        }));
        assert_eq!(state.high_score(), 3);

        // A worse follow-up run leaves the record untouched.
        state.start(&mut rng);
        state.force_score(1);
        state.force_food(Point::new(0, 0), FoodKind::Normal);
        state.force_obstacles(vec![Point::new(7, 10)]);
        let events = state.advance(now(), &mut rng);
        assert!(events.contains(&GameEvent::GameOver {
            score: 1,
            new_high_score: false
        }));
        assert_eq!(state.high_score(), 3);
    }

    #[test]
    fn test_board_full_yields_no_cell() {
        let mut state = GameState::new(GameSettings::default(), 0);
        let mut rng = SessionRng::new(21);
        let grid = state.settings().grid_size;
        let everything: Vec<Point> = (0..grid)
            .flat_map(|y| (0..grid).map(move |x| Point::new(x, y)))
            .collect();
        state.force_obstacles(everything);
        assert!(state.random_free_cell(&mut rng).is_none());
    }

    #[test]
    fn test_food_respawns_after_skipped_spawn() {
        let (mut state, mut rng) = playing_state(22);
        state.food = None;
        state.advance(now(), &mut rng);
        assert!(state.food().is_some());
    }

    #[test]
    fn test_invariants_hold_over_long_run() {
        let mut rng = SessionRng::new(23);
        let mut state = GameState::new(GameSettings::default(), 0);
        state.start(&mut rng);
        let grid = state.settings().grid_size;

        let mut previous_score = 0;
        for _ in 0..500 {
            if state.status() == GameStatus::GameOver {
                state.start(&mut rng);
                previous_score = 0;
            }

            let length_before = state.snake().len();
            if rng.random::<f32>() < 0.3 {
                let direction = match rng.random_range(0..4) {
                    0 => Direction::Up,
                    1 => Direction::Down,
                    2 => Direction::Left,
                    _ => Direction::Right,
                };
                state.set_direction(direction);
            }
            state.advance(now(), &mut rng);

            let head = state.snake().head();
            assert!(head.x < grid && head.y < grid);
            assert!(!state.snake().is_empty());
            assert!(state.snake().len() <= length_before + 1);
            assert!(state.score() >= previous_score);
            previous_score = state.score();

            if let Some(food) = state.food() {
                assert!(!state.obstacles().contains(&food.position));
                if state.status() == GameStatus::Playing {
                    assert!(!state.snake().occupies(food.position));
                }
            }
            if let Some(power_up) = state.power_up()
                && !power_up.active
            {
                assert!(!state.obstacles().contains(&power_up.position));
                assert_ne!(Some(power_up.position), state.food().map(|f| f.position));
            }
        }
    }
}
