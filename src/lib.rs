//! Snake Arena - a grid snake game with roaming bosses
//!
//! Core modules:
//! - `sim`: Deterministic simulation (snake, bosses, spawning, combos, tick)
//! - `tuning`: Data-driven game balance
//! - `session`: Driver-side state around an arena (bonus timer, frame pacing)
//! - `autopilot`: Simple steering used by the headless runner

pub mod autopilot;
pub mod session;
pub mod sim;
pub mod tuning;

pub use session::Session;
pub use sim::{Arena, Snapshot, TickInput};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Default arena size in cells
    pub const ARENA_WIDTH: i32 = 60;
    pub const ARENA_HEIGHT: i32 = 25;

    /// Default seed for the headless runner
    pub const DEFAULT_SEED: u64 = 42;
    /// Default number of steps for the headless runner
    pub const DEFAULT_TICKS: u64 = 2_000;
}
