use std::collections::{HashSet, VecDeque};

use super::types::Point;

/// The snake body, head first, with a set-based occupancy index so
/// collision checks stay O(1) regardless of length.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Point>,
    body_set: HashSet<Point>,
}

impl Snake {
    /// Places the initial snake on the middle row: head at `grid_size / 3`,
    /// remaining segments extending to the left (wrapping if needed).
    pub fn spawn(grid_size: usize, length: usize) -> Self {
        let length = length.max(1);
        let head_x = grid_size / 3;
        let row = grid_size / 2;

        let mut body = VecDeque::with_capacity(length);
        let mut body_set = HashSet::with_capacity(length);
        for i in 0..length {
            let x = (head_x + grid_size - i % grid_size) % grid_size;
            let segment = Point::new(x, row);
            body.push_back(segment);
            body_set.insert(segment);
        }

        Self { body, body_set }
    }

    pub fn head(&self) -> Point {
        *self.body.front().expect("snake body is never empty")
    }

    pub fn tail(&self) -> Point {
        *self.body.back().expect("snake body is never empty")
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn occupies(&self, position: Point) -> bool {
        self.body_set.contains(&position)
    }

    pub fn segments(&self) -> impl Iterator<Item = &Point> {
        self.body.iter()
    }

    /// Moves without growing. The tail is released before the head is
    /// inserted so the occupancy index stays consistent when the new head
    /// lands on the vacated tail cell.
    pub fn advance_to(&mut self, new_head: Point) {
        let tail = self.body.pop_back().expect("snake body is never empty");
        self.body_set.remove(&tail);
        self.body.push_front(new_head);
        self.body_set.insert(new_head);
    }

    /// Moves and grows by one segment.
    pub fn grow_to(&mut self, new_head: Point) {
        self.body.push_front(new_head);
        self.body_set.insert(new_head);
    }
}

#[cfg(test)]
impl Snake {
    pub(crate) fn from_segments(segments: &[Point]) -> Self {
        assert!(!segments.is_empty(), "snake body is never empty");
        Self {
            body: segments.iter().copied().collect(),
            body_set: segments.iter().copied().collect(),
        }
    }
}
