//! Entity records and grid geometry
//!
//! Plain data with no behavior beyond small accessors. All timestamps are
//! readings of the arena's injected clock.

use std::ops::RangeInclusive;
use std::time::Duration;

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Grid cell (x grows right, y grows down)
pub type Coord = IVec2;

/// One of the four axis directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Down,
        Direction::Up,
    ];

    /// Unit step for this direction
    pub fn delta(self) -> Coord {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Direction matching a unit axis vector, if it is one
    pub fn from_delta(delta: Coord) -> Option<Self> {
        match (delta.x, delta.y) {
            (0, -1) => Some(Direction::Up),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            _ => None,
        }
    }

    /// Axis-dominant step from `from` toward `to`
    ///
    /// Steps along whichever axis has the larger distance; ties go
    /// horizontal. `None` when the cells coincide.
    pub fn toward(from: Coord, to: Coord) -> Option<Self> {
        let d = to - from;
        if d == IVec2::ZERO {
            return None;
        }
        if d.x.abs() >= d.y.abs() {
            Some(if d.x > 0 { Direction::Right } else { Direction::Left })
        } else {
            Some(if d.y > 0 { Direction::Down } else { Direction::Up })
        }
    }
}

/// Arena rectangle; the outermost ring of cells is wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub origin: Coord,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            origin: IVec2::ZERO,
            width,
            height,
        }
    }

    pub fn with_origin(origin: Coord, width: i32, height: i32) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// True if `c` keeps at least `margin` cells from every edge cell
    ///
    /// With `margin = 1` this is "not touching or beyond the wall ring".
    pub fn within_margin(&self, c: Coord, margin: i32) -> bool {
        c.x >= self.origin.x + margin
            && c.x <= self.origin.x + self.width - 1 - margin
            && c.y >= self.origin.y + margin
            && c.y <= self.origin.y + self.height - 1 - margin
    }

    /// Inclusive x and y ranges of cells at least `margin` from every edge
    pub fn inset(&self, margin: i32) -> Option<(RangeInclusive<i32>, RangeInclusive<i32>)> {
        let (x0, x1) = (self.origin.x + margin, self.origin.x + self.width - 1 - margin);
        let (y0, y1) = (self.origin.y + margin, self.origin.y + self.height - 1 - margin);
        if x0 > x1 || y0 > y1 {
            return None;
        }
        Some((x0..=x1, y0..=y1))
    }

    pub fn center(&self) -> Coord {
        self.origin + IVec2::new(self.width / 2, self.height / 2)
    }
}

/// Food types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoodKind {
    Normal,
    Bonus,
    Penalty,
}

/// A consumable on the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub pos: Coord,
    pub points: i64,
    pub kind: FoodKind,
    pub spawned_at: Duration,
    pub lifetime: Duration,
}

impl Food {
    pub fn is_expired(&self, now: Duration) -> bool {
        now.saturating_sub(self.spawned_at) >= self.lifetime
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleKind {
    #[default]
    Wall,
    /// Reserved; nothing moves obstacles yet
    Moving,
}

/// A blocking cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Coord,
    pub kind: ObstacleKind,
    /// Permanent obstacles never expire
    pub temporary: bool,
    pub spawned_at: Duration,
    pub lifetime: Duration,
}

impl Obstacle {
    pub fn is_expired(&self, now: Duration) -> bool {
        self.temporary && now.saturating_sub(self.spawned_at) >= self.lifetime
    }
}

/// Timed bonus effects activated by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusKind {
    /// Snake moves two cells per tick
    Speed,
    /// Snake grows instantly
    Growth,
    /// Flat score bonus
    Points,
}

impl BonusKind {
    pub const ALL: [BonusKind; 3] = [BonusKind::Speed, BonusKind::Growth, BonusKind::Points];

    pub fn label(self) -> &'static str {
        match self {
            BonusKind::Speed => "SPEED",
            BonusKind::Growth => "GROWTH",
            BonusKind::Points => "POINTS",
        }
    }
}

/// Transient HUD text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMessage {
    pub text: String,
    pub created_at: Duration,
    pub duration: Duration,
}

impl GameMessage {
    pub fn is_expired(&self, now: Duration) -> bool {
        now.saturating_sub(self.created_at) >= self.duration
    }
}
