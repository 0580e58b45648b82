//! Player snake
//!
//! Head-first body in a deque so moving is a push-front plus pop-back.

use std::collections::VecDeque;

use glam::IVec2;

use super::collision;
use super::state::{Coord, Direction};

#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Coord>,
    dir: Direction,
}

impl Snake {
    /// Straight snake of `len` cells with its head at `head`, trailing
    /// opposite to `dir`
    pub fn new(head: Coord, dir: Direction, len: usize) -> Self {
        let len = len.max(1);
        let back = dir.opposite().delta();
        let body = (0..len as i32).map(|i| head + back * i).collect();
        Self { body, dir }
    }

    pub fn from_cells(cells: impl IntoIterator<Item = Coord>, dir: Direction) -> Self {
        let body: VecDeque<Coord> = cells.into_iter().collect();
        debug_assert!(!body.is_empty(), "snake body must not be empty");
        Self { body, dir }
    }

    pub fn head(&self) -> Coord {
        debug_assert!(!self.body.is_empty(), "snake body must not be empty");
        self.body[0]
    }

    pub fn tail(&self) -> Coord {
        debug_assert!(!self.body.is_empty(), "snake body must not be empty");
        self.body[self.body.len() - 1]
    }

    pub fn direction(&self) -> Direction {
        self.dir
    }

    pub fn body(&self) -> &VecDeque<Coord> {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Direction the body actually travelled last step (head minus neck)
    fn implied_direction(&self) -> Option<Direction> {
        if self.body.len() < 2 {
            return None;
        }
        Direction::from_delta(self.body[0] - self.body[1])
    }

    /// Queue a new heading; reversing onto the neck is ignored
    pub fn change_dir(&mut self, dir: Direction) {
        if self.implied_direction() == Some(dir.opposite()) {
            return;
        }
        self.dir = dir;
    }

    /// Advance one cell; length is unchanged
    pub fn step(&mut self) {
        let head = self.head() + self.dir.delta();
        self.body.push_front(head);
        self.body.pop_back();
    }

    /// Append segments on the tail cell; they unfold as the snake moves
    pub fn grow(&mut self, segments: usize) {
        let tail = self.tail();
        for _ in 0..segments {
            self.body.push_back(tail);
        }
    }

    /// Drop up to `segments` from the tail, never going below `floor`
    pub fn shrink(&mut self, segments: usize, floor: usize) {
        let floor = floor.max(1);
        let target = self.body.len().saturating_sub(segments).max(floor);
        if target < self.body.len() {
            self.body.truncate(target);
        }
    }

    pub fn occupies(&self, cell: Coord) -> bool {
        collision::occupies(&self.body, cell)
    }

    pub fn self_collision(&self) -> bool {
        collision::self_collision(&self.body)
    }

    /// Cell the head will enter next step
    pub fn next_head(&self) -> Coord {
        self.head() + self.dir.delta()
    }
}

impl Default for Snake {
    fn default() -> Self {
        Self::new(IVec2::new(3, 3), Direction::Right, 3)
    }
}
