//! Arena: owner of every entity and the scalar game state
//!
//! Collections are private and only mutated inside `tick` (see `tick.rs`)
//! or through the explicit driver hooks below. Renderers borrow them
//! through the read accessors or take an owned `Snapshot`.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::boss::Boss;
use super::clock::Clock;
use super::combo::ComboSystem;
use super::snake::Snake;
use super::spawn::{Occupancy, Spawner};
use super::state::{BonusKind, Bounds, Coord, Direction, Food, GameMessage, Obstacle};
use crate::tuning::Tuning;

/// Instant growth applied by a Growth bonus
pub const GROWTH_BONUS_SEGMENTS: usize = 3;
/// Flat score applied by a Points bonus
pub const POINTS_BONUS: i64 = 50;

pub struct Arena<C: Clock, R: Rng = Pcg32> {
    pub(crate) bounds: Bounds,
    pub(crate) tuning: Tuning,
    pub(crate) clock: C,
    pub(crate) rng: R,
    pub(crate) snake: Snake,
    pub(crate) foods: Vec<Food>,
    pub(crate) obstacles: Vec<Obstacle>,
    pub(crate) bosses: Vec<Boss>,
    pub(crate) combo: ComboSystem,
    pub(crate) messages: Vec<GameMessage>,
    pub(crate) spawner: Spawner,
    pub(crate) score: i64,
    pub(crate) level: u32,
    pub(crate) speed_multiplier: f32,
    /// Highest `score / level_score_step` reached so far
    pub(crate) score_milestone: i64,
    pub(crate) alive: bool,
    pub(crate) ticks: u64,
    pub(crate) bonus_request: Option<BonusKind>,
}

impl<C: Clock> Arena<C, Pcg32> {
    /// Arena driven by a PCG generator seeded from `seed`
    pub fn seeded(bounds: Bounds, tuning: Tuning, clock: C, seed: u64) -> Self {
        Self::new(bounds, tuning, clock, Pcg32::seed_from_u64(seed))
    }
}

impl<C: Clock, R: Rng> Arena<C, R> {
    /// Build an arena with a snake in the center heading right and one
    /// initial food placement
    pub fn new(bounds: Bounds, tuning: Tuning, clock: C, rng: R) -> Self {
        let start = bounds.center();
        let snake = Snake::new(start, Direction::Right, tuning.snake_len);
        let combo = ComboSystem::new(tuning.combo_timeout(), tuning.combo_step);
        let spawner = Spawner::new(&tuning);

        let mut arena = Self {
            bounds,
            tuning,
            clock,
            rng,
            snake,
            foods: Vec::new(),
            obstacles: Vec::new(),
            bosses: Vec::new(),
            combo,
            messages: Vec::new(),
            spawner,
            score: 0,
            level: 1,
            speed_multiplier: 1.0,
            score_milestone: 0,
            alive: true,
            ticks: 0,
            bonus_request: None,
        };
        arena.place_food();
        log::info!(
            "Arena {}x{} ready, snake at {}",
            bounds.width,
            bounds.height,
            start
        );
        arena
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn foods(&self) -> &[Food] {
        &self.foods
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn bosses(&self) -> &[Boss] {
        &self.bosses
    }

    pub fn messages(&self) -> &[GameMessage] {
        &self.messages
    }

    pub fn combo(&self) -> &ComboSystem {
        &self.combo
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    pub fn max_foods(&self) -> usize {
        self.spawner.max_foods()
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Bonus the driver should activate, cleared on read
    pub fn take_bonus_request(&mut self) -> Option<BonusKind> {
        self.bonus_request.take()
    }

    /// Apply the immediate effect of a bonus the driver just activated
    pub fn apply_bonus(&mut self, kind: BonusKind) {
        match kind {
            BonusKind::Speed => {}
            BonusKind::Growth => self.snake.grow(GROWTH_BONUS_SEGMENTS),
            BonusKind::Points => self.score += POINTS_BONUS,
        }
        self.add_message(format!("BONUS: {}!", kind.label()), Duration::from_secs(2));
    }

    /// Queue a HUD message stamped with the current time
    pub fn add_message(&mut self, text: impl Into<String>, duration: Duration) {
        let created_at = self.clock.now();
        self.messages.push(GameMessage {
            text: text.into(),
            created_at,
            duration,
        });
    }

    pub(crate) fn prune_messages(&mut self) {
        let now = self.clock.now();
        self.messages.retain(|m| !m.is_expired(now));
    }

    pub(crate) fn occupancy(&self) -> Occupancy<'_> {
        Occupancy {
            snake: &self.snake,
            foods: &self.foods,
            obstacles: &self.obstacles,
            bosses: &self.bosses,
        }
    }

    /// Cell is free of every entity
    pub fn is_position_free(&self, c: Coord) -> bool {
        self.occupancy().is_free(c)
    }

    /// Attempt one food placement (subject to cooldown and cap)
    pub(crate) fn place_food(&mut self) -> bool {
        let now = self.clock.now();
        let occupied = Occupancy {
            snake: &self.snake,
            foods: &self.foods,
            obstacles: &self.obstacles,
            bosses: &self.bosses,
        };
        match self
            .spawner
            .place_food(&mut self.rng, now, &self.bounds, &self.tuning, occupied)
        {
            Some(food) => {
                log::debug!("Food {:?} at {}", food.kind, food.pos);
                self.foods.push(food);
                true
            }
            None => false,
        }
    }

    /// Attempt one obstacle placement
    pub(crate) fn place_obstacle(&mut self) -> bool {
        let now = self.clock.now();
        let occupied = Occupancy {
            snake: &self.snake,
            foods: &self.foods,
            obstacles: &self.obstacles,
            bosses: &self.bosses,
        };
        match self
            .spawner
            .place_obstacle(&mut self.rng, now, &self.bounds, &self.tuning, occupied)
        {
            Some(obstacle) => {
                log::debug!("Obstacle at {} (temporary: {})", obstacle.pos, obstacle.temporary);
                self.obstacles.push(obstacle);
                true
            }
            None => false,
        }
    }

    /// Attempt a boss spawn under the configured policy
    pub(crate) fn try_spawn_boss(&mut self) {
        let now = self.clock.now();
        let occupied = Occupancy {
            snake: &self.snake,
            foods: &self.foods,
            obstacles: &self.obstacles,
            bosses: &self.bosses,
        };
        let Some(boss) = self.spawner.try_spawn_boss(
            &mut self.rng,
            now,
            self.level,
            &self.bounds,
            &self.tuning.boss,
            occupied,
        ) else {
            return;
        };
        self.bosses.push(boss);
        let count = self.bosses.len();
        let text = if count == 1 {
            "A boss has invaded the arena!".to_string()
        } else {
            format!("Another boss arrived! Now there are {}!", count)
        };
        self.add_message(text, Duration::from_secs(4));
    }

    /// Step the level up and rescale speed, food cap and obstacle density
    pub(crate) fn increase_difficulty(&mut self) {
        self.level += 1;
        self.speed_multiplier = 1.0 + self.level as f32 * 0.1;
        self.spawner.set_max_foods(3 + self.level as usize / 3);
        log::info!(
            "Level {} (speed x{:.1}, max food {})",
            self.level,
            self.speed_multiplier,
            self.spawner.max_foods()
        );

        let obstacle_cap = self.tuning.obstacle.cap_base + self.level as usize / 2;
        if self.level % 2 == 0 && self.obstacles.len() < obstacle_cap {
            self.place_obstacle();
        }
    }

    /// Owned copy of everything a renderer needs
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            bounds: self.bounds,
            alive: self.alive,
            score: self.score,
            level: self.level,
            combo: self.combo.current(),
            max_combo: self.combo.max(),
            speed_multiplier: self.speed_multiplier,
            snake: self.snake.body().iter().copied().collect(),
            foods: self.foods.clone(),
            obstacles: self.obstacles.clone(),
            bosses: self
                .bosses
                .iter()
                .map(|b| BossView {
                    body: b.body().iter().copied().collect(),
                    health: b.health(),
                    reward: b.reward(),
                })
                .collect(),
            messages: self.messages.iter().map(|m| m.text.clone()).collect(),
        }
    }
}

/// Render-facing boss summary
#[derive(Debug, Clone, Serialize)]
pub struct BossView {
    pub body: Vec<Coord>,
    pub health: u32,
    pub reward: i64,
}

/// Stable read-only copy of the arena between ticks
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub bounds: Bounds,
    pub alive: bool,
    pub score: i64,
    pub level: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub speed_multiplier: f32,
    pub snake: Vec<Coord>,
    pub foods: Vec<Food>,
    pub obstacles: Vec<Obstacle>,
    pub bosses: Vec<BossView>,
    pub messages: Vec<String>,
}
