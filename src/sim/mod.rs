//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Time comes from an injected clock only
//! - Seeded RNG only
//! - Stable iteration order (insertion order of entity lists)
//! - No rendering, input or platform dependencies

pub mod arena;
pub mod boss;
pub mod clock;
pub mod collision;
pub mod combo;
pub mod snake;
pub mod spawn;
pub mod state;
pub mod tick;

pub use arena::{Arena, BossView, Snapshot};
pub use boss::Boss;
pub use clock::{Clock, ManualClock, SystemClock};
pub use collision::Contact;
pub use combo::ComboSystem;
pub use snake::Snake;
pub use spawn::{Occupancy, Spawner};
pub use state::{
    BonusKind, Bounds, Coord, Direction, Food, FoodKind, GameMessage, Obstacle, ObstacleKind,
};
pub use tick::{DeathCause, TickInput};
