//! Rejection-sampling placement for food, obstacles and bosses
//!
//! Candidates are drawn uniformly from the spawn interior and accepted only
//! if no entity already occupies them. Every loop has a fixed retry cap; a
//! placement that runs out of attempts is skipped and retried on a later
//! tick.

use std::time::Duration;

use glam::IVec2;
use rand::Rng;

use super::boss::Boss;
use super::snake::Snake;
use super::state::{Bounds, Coord, Direction, Food, Obstacle, ObstacleKind};
use crate::tuning::{BossSpawnPolicy, BossTuning, Tuning};

/// Read-only view of every occupied cell in the arena
#[derive(Clone, Copy)]
pub struct Occupancy<'a> {
    pub snake: &'a Snake,
    pub foods: &'a [Food],
    pub obstacles: &'a [Obstacle],
    pub bosses: &'a [Boss],
}

impl Occupancy<'_> {
    pub fn is_free(&self, c: Coord) -> bool {
        !self.snake.occupies(c)
            && !self.foods.iter().any(|f| f.pos == c)
            && !self.obstacles.iter().any(|o| o.pos == c)
            && !self.bosses.iter().any(|b| b.occupies(c))
    }
}

/// Spawn cooldowns and caps
#[derive(Debug, Clone)]
pub struct Spawner {
    last_food: Option<Duration>,
    food_cooldown: Duration,
    max_foods: usize,
    last_boss: Option<Duration>,
}

impl Spawner {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            last_food: None,
            food_cooldown: Duration::from_millis(tuning.food.initial_cooldown_ms),
            max_foods: tuning.food.initial_max,
            last_boss: None,
        }
    }

    pub fn max_foods(&self) -> usize {
        self.max_foods
    }

    pub fn set_max_foods(&mut self, max: usize) {
        self.max_foods = max;
    }

    pub fn food_cooldown(&self) -> Duration {
        self.food_cooldown
    }

    /// True while the cooldown since the last food placement is running
    pub fn food_on_cooldown(&self, now: Duration) -> bool {
        self.last_food
            .is_some_and(|last| now.saturating_sub(last) < self.food_cooldown)
    }

    /// Try to place one food
    ///
    /// No-op while on cooldown or at the food cap.
    pub fn place_food<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        now: Duration,
        bounds: &Bounds,
        tuning: &Tuning,
        occupied: Occupancy<'_>,
    ) -> Option<Food> {
        if self.food_on_cooldown(now) || occupied.foods.len() >= self.max_foods {
            return None;
        }

        let (margin, attempts) = (tuning.spawn_margin, tuning.food.attempts);
        let Some(pos) = sample_free_cell(rng, bounds, margin, attempts, &occupied) else {
            log::debug!("No free cell for food after {} attempts", attempts);
            return None;
        };

        let kind = tuning.food.kind_for_roll(rng.random::<f32>());
        let spec = tuning.food.spec(kind);

        self.last_food = Some(now);
        let (lo, hi) = ordered(tuning.food.cooldown_min_ms, tuning.food.cooldown_max_ms);
        self.food_cooldown = Duration::from_millis(rng.random_range(lo..=hi));

        Some(Food {
            pos,
            points: spec.points,
            kind,
            spawned_at: now,
            lifetime: spec.lifetime(),
        })
    }

    /// Try to place one obstacle (no cooldown)
    pub fn place_obstacle<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        now: Duration,
        bounds: &Bounds,
        tuning: &Tuning,
        occupied: Occupancy<'_>,
    ) -> Option<Obstacle> {
        let margin = tuning.spawn_margin;
        let pos = sample_free_cell(rng, bounds, margin, tuning.obstacle.attempts, &occupied)?;
        let temporary = rng.random::<f32>() < tuning.obstacle.temporary_chance;
        let (lo, hi) = ordered(tuning.obstacle.lifetime_min_ms, tuning.obstacle.lifetime_max_ms);
        let lifetime = Duration::from_millis(rng.random_range(lo..=hi));
        Some(Obstacle {
            pos,
            kind: ObstacleKind::Wall,
            temporary,
            spawned_at: now,
            lifetime,
        })
    }

    /// Apply the boss spawn policy and maybe produce one new boss
    pub fn try_spawn_boss<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        now: Duration,
        level: u32,
        bounds: &Bounds,
        tuning: &BossTuning,
        occupied: Occupancy<'_>,
    ) -> Option<Boss> {
        let living = occupied.bosses.iter().filter(|b| b.is_alive()).count();
        let since_last = self.last_boss.map(|last| now.saturating_sub(last));

        let wanted = match tuning.spawn_policy {
            BossSpawnPolicy::LevelScaled {
                min_level,
                guaranteed_level,
                levels_per_extra,
                chance_per_level,
                spacing_ms,
            } => {
                let mut expected = (level / levels_per_extra.max(1)) as usize;
                if level >= guaranteed_level {
                    expected += 1;
                }
                if level < min_level || living >= expected {
                    return None;
                }
                if since_last.is_some_and(|d| d <= Duration::from_millis(spacing_ms)) {
                    return None;
                }
                let chance = ((level + 1 - min_level) as f64 * chance_per_level).min(1.0);
                level >= guaranteed_level || rng.random::<f64>() < chance
            }
            BossSpawnPolicy::FixedInterval { min_level, interval_ms } => {
                level >= min_level
                    && living == 0
                    && !since_last.is_some_and(|d| d < Duration::from_millis(interval_ms))
            }
        };
        if !wanted {
            return None;
        }

        let boss = place_boss(rng, now, bounds, tuning, &occupied)?;
        self.last_boss = Some(now);
        Some(boss)
    }
}

fn ordered(a: u64, b: u64) -> (u64, u64) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Uniform interior cell that nothing occupies, within `attempts` draws
pub fn sample_free_cell<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: &Bounds,
    margin: i32,
    attempts: u32,
    occupied: &Occupancy<'_>,
) -> Option<Coord> {
    let (xs, ys) = bounds.inset(margin)?;
    (0..attempts)
        .map(|_| IVec2::new(rng.random_range(xs.clone()), rng.random_range(ys.clone())))
        .find(|&c| occupied.is_free(c))
}

/// Edge-biased boss placement
///
/// Picks a wall, lays the body from that wall's side of the boss zone
/// inward with the head leading, and retries along the same wall until
/// the whole body plus the cell ahead of the head is free.
fn place_boss<R: Rng + ?Sized>(
    rng: &mut R,
    now: Duration,
    bounds: &Bounds,
    tuning: &BossTuning,
    occupied: &Occupancy<'_>,
) -> Option<Boss> {
    let (xs, ys) = bounds.inset(tuning.wall_margin)?;
    let (x0, x1, y0, y1) = (*xs.start(), *xs.end(), *ys.start(), *ys.end());

    let dir = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
    let span = match dir {
        Direction::Left | Direction::Right => x1 - x0 + 1,
        Direction::Up | Direction::Down => y1 - y0 + 1,
    };
    let len = tuning.body_len.clamp(1, span as usize) as i32;

    for _ in 0..tuning.spawn_attempts.max(1) {
        // `dir` points inward, so the tail sits against the wall behind it
        let tail = match dir {
            Direction::Right => IVec2::new(x0, rng.random_range(y0..=y1)),
            Direction::Left => IVec2::new(x1, rng.random_range(y0..=y1)),
            Direction::Down => IVec2::new(rng.random_range(x0..=x1), y0),
            Direction::Up => IVec2::new(rng.random_range(x0..=x1), y1),
        };
        let head = tail + dir.delta() * (len - 1);
        let body: Vec<Coord> = (0..len).map(|i| head - dir.delta() * i).collect();
        let ahead = head + dir.delta();

        if body.iter().all(|&c| occupied.is_free(c)) && occupied.is_free(ahead) {
            log::info!("Boss spawned at {} heading {:?}", head, dir);
            return Some(Boss::new(body, dir, tuning, now));
        }
    }

    log::debug!("No free lane for boss after {} attempts", tuning.spawn_attempts);
    None
}
