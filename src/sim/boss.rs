//! Boss entity and its decision procedure
//!
//! A boss moves on its own clock, independent of the frame rate. Each move
//! picks a direction by priority:
//! 1. nearest food within the sense radius
//! 2. the player's head within the aggro radius
//! 3. a random non-reversing step that stays inside the wall margin

use std::collections::VecDeque;
use std::time::Duration;

use rand::Rng;
use rand::seq::SliceRandom;

use super::collision;
use super::state::{Bounds, Coord, Direction, Food};
use crate::tuning::BossTuning;

#[derive(Debug, Clone)]
pub struct Boss {
    body: VecDeque<Coord>,
    dir: Direction,
    move_interval: Duration,
    last_move: Duration,
    health: u32,
    alive: bool,
    reward: i64,
}

impl Boss {
    /// Boss with `body` head-first, heading `dir`, last moved at `now`
    pub fn new(
        body: impl IntoIterator<Item = Coord>,
        dir: Direction,
        tuning: &BossTuning,
        now: Duration,
    ) -> Self {
        let body: VecDeque<Coord> = body.into_iter().collect();
        debug_assert!(!body.is_empty(), "boss body must not be empty");
        Self {
            body,
            dir,
            move_interval: tuning.move_interval(),
            last_move: now,
            health: tuning.health.max(1),
            alive: true,
            reward: tuning.reward,
        }
    }

    pub fn head(&self) -> Coord {
        debug_assert!(!self.body.is_empty(), "boss body must not be empty");
        self.body[0]
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

    pub fn direction(&self) -> Direction {
        self.dir
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn reward(&self) -> i64 {
        self.reward
    }

    pub fn last_move(&self) -> Duration {
        self.last_move
    }

    pub fn move_interval(&self) -> Duration {
        self.move_interval
    }

    pub fn occupies(&self, cell: Coord) -> bool {
        collision::occupies(&self.body, cell)
    }

    /// Whether the movement clock allows a step at `now`
    pub fn ready(&self, now: Duration) -> bool {
        self.alive && now.saturating_sub(self.last_move) >= self.move_interval
    }

    /// Choose the next heading
    pub fn decide<R: Rng + ?Sized>(
        &self,
        player_head: Coord,
        foods: &[Food],
        bounds: &Bounds,
        tuning: &BossTuning,
        rng: &mut R,
    ) -> Direction {
        let head = self.head();

        let nearest_food = foods
            .iter()
            .map(|f| (f, (f.pos - head).as_vec2().length()))
            .filter(|&(_, dist)| dist < tuning.food_sense_radius)
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        if let Some((food, _)) = nearest_food {
            if let Some(dir) = Direction::toward(head, food.pos) {
                return dir;
            }
        }

        let to_player = player_head - head;
        if to_player.x.abs() + to_player.y.abs() < tuning.aggro_radius {
            if let Some(dir) = Direction::toward(head, player_head) {
                return dir;
            }
        }

        self.wander(bounds, tuning.wall_margin, rng)
    }

    /// Random non-reversing direction that stays inside the margin
    fn wander<R: Rng + ?Sized>(&self, bounds: &Bounds, margin: i32, rng: &mut R) -> Direction {
        let head = self.head();
        let mut dirs = Direction::ALL;
        dirs.shuffle(rng);
        dirs.into_iter()
            .filter(|&d| d != self.dir.opposite())
            .find(|&d| bounds.within_margin(head + d.delta(), margin))
            .unwrap_or(self.dir)
    }

    /// Move one cell if the movement clock has elapsed
    ///
    /// Returns true if the boss moved. A step that would breach the wall
    /// margin is re-decided once by wandering; if even that breaches, the
    /// boss holds position for this cycle.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        now: Duration,
        player_head: Coord,
        foods: &[Food],
        bounds: &Bounds,
        tuning: &BossTuning,
        rng: &mut R,
    ) -> bool {
        if !self.ready(now) {
            return false;
        }
        self.last_move = now;

        let margin = tuning.wall_margin;
        let mut dir = self.decide(player_head, foods, bounds, tuning, rng);
        if !bounds.within_margin(self.head() + dir.delta(), margin) {
            dir = self.wander(bounds, margin, rng);
        }
        let next = self.head() + dir.delta();
        if !bounds.within_margin(next, margin) {
            log::debug!("Boss at {} cornered, holding", self.head());
            return false;
        }

        self.dir = dir;
        self.body.push_front(next);
        self.body.pop_back();
        log::debug!("Boss moved {:?} to {}", dir, next);
        true
    }

    /// Duplicate the tail and raise the reward
    pub fn grow(&mut self, reward_step: i64) {
        debug_assert!(!self.body.is_empty(), "boss body must not be empty");
        let tail = self.body[self.body.len() - 1];
        self.body.push_back(tail);
        self.reward += reward_step;
    }

    /// Take one hit; returns true when this hit killed the boss
    pub fn take_damage(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.health = self.health.saturating_sub(1);
        if self.health == 0 {
            self.alive = false;
            return true;
        }
        false
    }

    #[cfg(test)]
    pub(crate) fn set_health(&mut self, health: u32) {
        self.health = health;
        self.alive = health > 0;
    }
}
