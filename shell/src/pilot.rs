use std::collections::HashSet;

use engine::session::DirectionSource;
use engine::{Direction, Point, Snapshot};

/// Greedy steering for demo runs: chase the food along the shortest
/// toroidal path while refusing cells occupied by the body or an
/// obstacle. It only talks to the engine through direction intents.
pub struct AutoPilot;

impl AutoPilot {
    pub fn new() -> Self {
        Self
    }

    fn step(from: Point, direction: Direction, grid: usize) -> Point {
        match direction {
            Direction::Up => Point::new(from.x, if from.y == 0 { grid - 1 } else { from.y - 1 }),
            Direction::Down => {
                Point::new(from.x, if from.y + 1 >= grid { 0 } else { from.y + 1 })
            }
            Direction::Left => Point::new(if from.x == 0 { grid - 1 } else { from.x - 1 }, from.y),
            Direction::Right => {
                Point::new(if from.x + 1 >= grid { 0 } else { from.x + 1 }, from.y)
            }
        }
    }

    fn torus_distance(a: Point, b: Point, grid: usize) -> usize {
        let dx = a.x.abs_diff(b.x);
        let dy = a.y.abs_diff(b.y);
        dx.min(grid - dx) + dy.min(grid - dy)
    }
}

impl Default for AutoPilot {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectionSource for AutoPilot {
    fn next_direction(&mut self, snapshot: &Snapshot) -> Option<Direction> {
        let target = snapshot.food?.position;
        let head = *snapshot.snake.first()?;
        let grid = snapshot.grid_size;
        let body: HashSet<Point> = snapshot.snake.iter().copied().collect();

        let mut best: Option<(Direction, usize)> = None;
        for direction in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            if direction.is_opposite(&snapshot.direction) {
                continue;
            }
            let next = Self::step(head, direction, grid);
            if body.contains(&next) || snapshot.obstacles.contains(&next) {
                continue;
            }
            let distance = Self::torus_distance(next, target, grid);
            if best.is_none_or(|(_, best_distance)| distance < best_distance) {
                best = Some((direction, distance));
            }
        }

        best.map(|(direction, _)| direction)
    }
}
