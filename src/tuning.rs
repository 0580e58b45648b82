//! Data-driven game balance
//!
//! Every constant the simulation reads lives here so a run can be re-tuned
//! from a JSON file without recompiling. Missing fields take their defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::sim::state::FoodKind;

/// Per-kind food parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoodSpec {
    /// Base points awarded (negative for penalty food)
    pub points: i64,
    /// Lifetime before the food expires
    pub lifetime_ms: u64,
    /// Share of the type roll (weights are normalized)
    pub weight: f32,
}

impl FoodSpec {
    pub fn lifetime(&self) -> Duration {
        Duration::from_millis(self.lifetime_ms)
    }
}

/// Food spawning parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodTuning {
    pub normal: FoodSpec,
    pub bonus: FoodSpec,
    pub penalty: FoodSpec,
    /// Concurrent food cap before any difficulty escalation
    pub initial_max: usize,
    /// Cooldown used before the first successful placement
    pub initial_cooldown_ms: u64,
    /// Cooldown re-rolled after each placement, inclusive range
    pub cooldown_min_ms: u64,
    pub cooldown_max_ms: u64,
    /// Rejection-sampling budget per placement call
    pub attempts: u32,
}

impl Default for FoodTuning {
    fn default() -> Self {
        Self {
            normal: FoodSpec {
                points: 10,
                lifetime_ms: 8_000,
                weight: 0.5,
            },
            bonus: FoodSpec {
                points: 25,
                lifetime_ms: 6_000,
                weight: 0.3,
            },
            penalty: FoodSpec {
                points: -20,
                lifetime_ms: 10_000,
                weight: 0.2,
            },
            initial_max: 3,
            initial_cooldown_ms: 2_000,
            cooldown_min_ms: 2_000,
            cooldown_max_ms: 4_000,
            attempts: 50,
        }
    }
}

impl FoodTuning {
    pub fn spec(&self, kind: FoodKind) -> &FoodSpec {
        match kind {
            FoodKind::Normal => &self.normal,
            FoodKind::Bonus => &self.bonus,
            FoodKind::Penalty => &self.penalty,
        }
    }

    /// Map a uniform roll in [0, 1) onto a food kind by weight
    pub fn kind_for_roll(&self, roll: f32) -> FoodKind {
        let total = self.normal.weight + self.bonus.weight + self.penalty.weight;
        if total <= 0.0 {
            return FoodKind::Normal;
        }
        let roll = roll * total;
        if roll < self.normal.weight {
            FoodKind::Normal
        } else if roll < self.normal.weight + self.bonus.weight {
            FoodKind::Bonus
        } else {
            FoodKind::Penalty
        }
    }
}

/// Obstacle spawning parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleTuning {
    pub attempts: u32,
    /// Probability an accepted obstacle is temporary
    pub temporary_chance: f32,
    /// Temporary lifetime, inclusive range
    pub lifetime_min_ms: u64,
    pub lifetime_max_ms: u64,
    /// Obstacle cap is `cap_base + level / 2`
    pub cap_base: usize,
}

impl Default for ObstacleTuning {
    fn default() -> Self {
        Self {
            attempts: 30,
            temporary_chance: 0.3,
            lifetime_min_ms: 10_000,
            lifetime_max_ms: 29_000,
            cap_base: 5,
        }
    }
}

/// How bosses enter the arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum BossSpawnPolicy {
    /// Living-boss target and spawn chance both scale with level
    LevelScaled {
        /// No bosses below this level
        min_level: u32,
        /// At and above this level one boss is always expected and spawn is certain
        guaranteed_level: u32,
        /// One extra expected boss per this many levels
        levels_per_extra: u32,
        /// Spawn chance added per level above `min_level - 1`
        chance_per_level: f64,
        /// Minimum spacing between two spawns
        spacing_ms: u64,
    },
    /// At most one boss alive, spawned whenever the cooldown has elapsed
    FixedInterval { min_level: u32, interval_ms: u64 },
}

impl Default for BossSpawnPolicy {
    fn default() -> Self {
        BossSpawnPolicy::LevelScaled {
            min_level: 3,
            guaranteed_level: 6,
            levels_per_extra: 10,
            chance_per_level: 0.05,
            spacing_ms: 8_000,
        }
    }
}

/// Boss parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    pub health: u32,
    /// Spawned body length (shortened to fit small arenas)
    pub body_len: usize,
    pub move_interval_ms: u64,
    /// Reward credited to the player on defeat
    pub reward: i64,
    /// Reward added each time the boss eats
    pub reward_per_food: i64,
    /// Euclidean radius within which the boss chases food
    pub food_sense_radius: f32,
    /// Manhattan radius within which the boss chases the player
    pub aggro_radius: i32,
    /// Cells the boss keeps between itself and each wall
    pub wall_margin: i32,
    pub spawn_attempts: u32,
    /// Player grows by `max(body_len - kill_growth_offset, kill_growth_min)`
    pub kill_growth_offset: usize,
    pub kill_growth_min: usize,
    pub spawn_policy: BossSpawnPolicy,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            health: 1,
            body_len: 9,
            move_interval_ms: 160,
            reward: 250,
            reward_per_food: 20,
            food_sense_radius: 20.0,
            aggro_radius: 6,
            wall_margin: 3,
            spawn_attempts: 30,
            kill_growth_offset: 6,
            kill_growth_min: 3,
            spawn_policy: BossSpawnPolicy::default(),
        }
    }
}

impl BossTuning {
    pub fn move_interval(&self) -> Duration {
        Duration::from_millis(self.move_interval_ms)
    }
}

/// Complete balance sheet for one arena
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub food: FoodTuning,
    pub obstacle: ObstacleTuning,
    pub boss: BossTuning,
    /// Food and obstacles spawn at least this many cells from each edge
    pub spawn_margin: i32,
    pub combo_timeout_ms: u64,
    /// Multiplier grows by one every `combo_step` combo
    pub combo_step: u32,
    /// Difficulty escalates each time score crosses a multiple of this
    pub level_score_step: i64,
    /// Segments removed by penalty food
    pub penalty_shrink: usize,
    /// Penalty food never shrinks the snake below this
    pub min_snake_len: usize,
    /// Points lost when touching a boss body
    pub boss_contact_penalty: i64,
    /// Initial snake length
    pub snake_len: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            food: FoodTuning::default(),
            obstacle: ObstacleTuning::default(),
            boss: BossTuning::default(),
            spawn_margin: 2,
            combo_timeout_ms: 3_000,
            combo_step: 3,
            level_score_step: 50,
            penalty_shrink: 1,
            min_snake_len: 3,
            boss_contact_penalty: 50,
            snake_len: 3,
        }
    }
}

impl Tuning {
    pub fn combo_timeout(&self) -> Duration {
        Duration::from_millis(self.combo_timeout_ms)
    }

    /// Parse a tuning sheet; absent fields keep their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Load from a file, falling back to defaults on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Invalid tuning in {}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}
