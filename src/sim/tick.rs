//! One discrete simulation step
//!
//! Order within a tick:
//! 1. steer and move the snake (twice under a Speed bonus)
//! 2. death checks on the post-move head
//! 3. boss spawn, boss movement, boss feeding and boss contact
//! 4. purge defeated bosses
//! 5. player feeding, combo, score and difficulty
//! 6. expiry, message pruning and food top-up

use std::time::Duration;

use rand::Rng;

use super::arena::Arena;
use super::clock::Clock;
use super::collision::{self, Contact};
use super::state::{BonusKind, Coord, Direction, Food, FoodKind};

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Latest direction command, if any
    pub direction: Option<Direction>,
    /// Currently active bonus, if any
    pub bonus: Option<BonusKind>,
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    Wall,
    SelfCollision,
    Obstacle,
}

impl<C: Clock, R: Rng> Arena<C, R> {
    /// Advance the arena by one step; returns false once the snake is dead
    pub fn tick(&mut self, input: &TickInput) -> bool {
        if !self.alive {
            return false;
        }
        self.ticks += 1;

        if let Some(dir) = input.direction {
            self.snake.change_dir(dir);
        }
        let steps = if input.bonus == Some(BonusKind::Speed) { 2 } else { 1 };
        for _ in 0..steps {
            self.snake.step();
        }

        let head = self.snake.head();
        if let Some(cause) = self.death_cause(head) {
            log::info!("Snake died at {} ({:?}), score {}", head, cause, self.score);
            self.alive = false;
            return false;
        }

        self.try_spawn_boss();
        self.update_bosses(head);
        self.purge_bosses();

        let eaten = self.resolve_food(head, input.bonus.is_some());

        self.expire_entities();
        self.prune_messages();

        if eaten > 0 || self.foods.len() < self.spawner.max_foods() / 2 {
            self.place_food();
        }

        true
    }

    /// Fatal condition for the post-move head, if any
    pub fn death_cause(&self, head: Coord) -> Option<DeathCause> {
        if !self.bounds.within_margin(head, 1) {
            Some(DeathCause::Wall)
        } else if self.snake.self_collision() {
            Some(DeathCause::SelfCollision)
        } else if self.obstacles.iter().any(|o| o.pos == head) {
            Some(DeathCause::Obstacle)
        } else {
            None
        }
    }

    fn update_bosses(&mut self, player_head: Coord) {
        let now = self.clock.now();

        for i in 0..self.bosses.len() {
            if !self.bosses[i].is_alive() {
                continue;
            }

            self.bosses[i].advance(
                now,
                player_head,
                &self.foods,
                &self.bounds,
                &self.tuning.boss,
                &mut self.rng,
            );

            let boss_head = self.bosses[i].head();
            if let Some(idx) = self.foods.iter().position(|f| f.pos == boss_head) {
                self.foods.remove(idx);
                self.bosses[i].grow(self.tuning.boss.reward_per_food);
                self.add_message("The boss stole your food!", Duration::from_secs(2));
                self.place_food();
            }

            match collision::contact(self.snake.body(), self.bosses[i].body()) {
                Contact::HeadToHead => {
                    if !self.bosses[i].take_damage() {
                        let health = self.bosses[i].health();
                        self.add_message(
                            format!("Boss hit! ({} left)", health),
                            Duration::from_secs(2),
                        );
                    }
                }
                Contact::Body => {
                    let penalty = self.tuning.boss_contact_penalty;
                    if self.score > 0 {
                        self.score = (self.score - penalty).max(0);
                    }
                    // Pushed back: a phantom segment on the tail
                    self.snake.grow(1);
                    self.add_message(
                        format!("-{} points! Watch out for the boss!", penalty),
                        Duration::from_secs(2),
                    );
                }
                Contact::None => {}
            }
        }
    }

    /// Remove defeated bosses and pay out their reward
    fn purge_bosses(&mut self) {
        let mut defeated = Vec::new();
        self.bosses.retain(|b| {
            if b.is_alive() {
                true
            } else {
                defeated.push((b.reward(), b.len()));
                false
            }
        });

        for (reward, len) in defeated {
            let growth = len
                .saturating_sub(self.tuning.boss.kill_growth_offset)
                .max(self.tuning.boss.kill_growth_min);
            self.score += reward;
            self.snake.grow(growth);
            log::info!("Boss defeated: +{} points, +{} length", reward, growth);
            self.add_message(
                format!("BOSS DEFEATED! +{} pts +{} length!", reward, growth),
                Duration::from_secs(5),
            );
        }
    }

    /// Eat every food under the head; returns how many were eaten
    fn resolve_food(&mut self, head: Coord, bonus_active: bool) -> usize {
        let now = self.clock.now();
        let mut eaten: Vec<Food> = Vec::new();
        self.foods.retain(|f| {
            if f.pos == head {
                eaten.push(f.clone());
                false
            } else {
                true
            }
        });

        for food in &eaten {
            let multiplier = self.combo.register_pickup(now);
            let points = food.points * multiplier;
            self.score += points;

            match food.kind {
                FoodKind::Normal => self.snake.grow(1),
                FoodKind::Bonus => {
                    if !bonus_active && self.bonus_request.is_none() {
                        let kind = BonusKind::ALL[self.rng.random_range(0..BonusKind::ALL.len())];
                        self.bonus_request = Some(kind);
                    }
                    self.snake.grow(1);
                }
                FoodKind::Penalty => {
                    self.snake
                        .shrink(self.tuning.penalty_shrink, self.tuning.min_snake_len);
                }
            }

            if multiplier > 1 {
                self.add_message(
                    format!("COMBO x{}! +{}", multiplier, points),
                    Duration::from_secs(1),
                );
            }

            let step = self.tuning.level_score_step.max(1);
            let milestone = self.score.div_euclid(step);
            if milestone > self.score_milestone {
                self.score_milestone = milestone;
                self.increase_difficulty();
            }
        }

        eaten.len()
    }

    fn expire_entities(&mut self) {
        let now = self.clock.now();
        self.foods.retain(|f| !f.is_expired(now));
        self.obstacles.retain(|o| !o.is_expired(now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::boss::Boss;
    use crate::sim::clock::ManualClock;
    use crate::sim::snake::Snake;
    use crate::sim::state::{Bounds, Obstacle, ObstacleKind};
    use crate::tuning::Tuning;
    use glam::IVec2;
    use proptest::prelude::*;

    type TestArena = Arena<ManualClock>;

    fn arena(width: i32, height: i32, seed: u64) -> (TestArena, ManualClock) {
        let clock = ManualClock::new();
        let bounds = Bounds::new(width, height);
        let arena = Arena::seeded(bounds, Tuning::default(), clock.clone(), seed);
        (arena, clock)
    }

    fn food(arena: &TestArena, x: i32, y: i32, kind: FoodKind) -> Food {
        let spec = arena.tuning.food.spec(kind);
        Food {
            pos: IVec2::new(x, y),
            points: spec.points,
            kind,
            spawned_at: arena.now(),
            lifetime: spec.lifetime(),
        }
    }

    fn obstacle(x: i32, y: i32, temporary: bool, lifetime_ms: u64) -> Obstacle {
        Obstacle {
            pos: IVec2::new(x, y),
            kind: ObstacleKind::Wall,
            temporary,
            spawned_at: Duration::ZERO,
            lifetime: Duration::from_millis(lifetime_ms),
        }
    }

    fn boss(arena: &TestArena, cells: &[(i32, i32)], dir: Direction) -> Boss {
        Boss::new(
            cells.iter().map(|&(x, y)| IVec2::new(x, y)),
            dir,
            &arena.tuning.boss,
            arena.now(),
        )
    }

    fn dir_strategy() -> impl Strategy<Value = Option<Direction>> {
        prop_oneof![
            Just(None),
            Just(Some(Direction::Up)),
            Just(Some(Direction::Down)),
            Just(Some(Direction::Left)),
            Just(Some(Direction::Right)),
        ]
    }

    #[test]
    fn test_eating_normal_food() {
        let (mut arena, _clock) = arena(10, 10, 1);
        assert_eq!(arena.snake().head(), IVec2::new(5, 5));
        // A recent pickup leaves the combo at 0 but inside its window
        arena.combo.register_pickup(arena.now());
        assert_eq!(arena.combo().current(), 0);
        arena.foods.clear();
        arena.foods.push(food(&arena, 6, 5, FoodKind::Normal));

        assert!(arena.tick(&TickInput::default()));
        assert_eq!(arena.score(), 10);
        assert_eq!(arena.snake().len(), 4);
        assert_eq!(arena.combo().current(), 1);
        assert!(arena.foods().iter().all(|f| f.pos != IVec2::new(6, 5)));
    }

    #[test]
    fn test_wall_kills() {
        let (mut arena, _clock) = arena(10, 10, 1);
        arena.snake = Snake::from_cells(
            [IVec2::new(1, 5), IVec2::new(2, 5), IVec2::new(3, 5)],
            Direction::Left,
        );
        assert!(!arena.tick(&TickInput::default()));
        assert!(!arena.is_alive());
        assert_eq!(arena.snake().head(), IVec2::new(0, 5));
        // Dead arenas stay dead and frozen
        assert!(!arena.tick(&TickInput::default()));
        assert_eq!(arena.ticks(), 1);
    }

    #[test]
    fn test_self_collision_kills() {
        let (mut arena, _clock) = arena(20, 20, 1);
        arena.snake = Snake::from_cells(
            [(5, 5), (5, 6), (6, 6), (6, 5), (6, 4), (6, 3)].map(|(x, y)| IVec2::new(x, y)),
            Direction::Up,
        );
        let input = TickInput {
            direction: Some(Direction::Right),
            bonus: None,
        };
        assert!(!arena.tick(&input));
        assert!(arena.snake().self_collision());
    }

    #[test]
    fn test_obstacle_kills() {
        let (mut arena, _clock) = arena(20, 20, 1);
        let next = arena.snake().next_head();
        arena.obstacles.push(obstacle(next.x, next.y, false, 0));
        assert!(!arena.tick(&TickInput::default()));
    }

    #[test]
    fn test_reverse_command_is_ignored() {
        let (mut arena, _clock) = arena(20, 20, 1);
        let head = arena.snake().head();
        let input = TickInput {
            direction: Some(Direction::Left),
            bonus: None,
        };
        assert!(arena.tick(&input));
        assert_eq!(arena.snake().head(), head + IVec2::new(1, 0));
    }

    #[test]
    fn test_speed_bonus_moves_twice() {
        let (mut arena, _clock) = arena(30, 30, 1);
        let head = arena.snake().head();
        let input = TickInput {
            direction: None,
            bonus: Some(BonusKind::Speed),
        };
        assert!(arena.tick(&input));
        assert_eq!(arena.snake().head(), head + IVec2::new(2, 0));
    }

    #[test]
    fn test_boss_head_hit_defeats_and_pays_out() {
        let (mut arena, _clock) = arena(10, 10, 1);
        arena.foods.clear();
        let b = boss(&arena, &[(6, 5), (7, 5)], Direction::Left);
        arena.bosses.push(b);
        arena.bosses[0].set_health(1);

        assert!(arena.tick(&TickInput::default()));
        assert!(arena.bosses().is_empty());
        assert_eq!(arena.score(), 250);
        // Body of 2 is below the growth offset, so the floor of 3 applies
        assert_eq!(arena.snake().len(), 6);
        assert!(arena.messages().iter().any(|m| m.text.starts_with("BOSS DEFEATED")));
    }

    #[test]
    fn test_boss_survives_hit_with_health_left() {
        let (mut arena, _clock) = arena(10, 10, 1);
        arena.foods.clear();
        let b = boss(&arena, &[(6, 5), (7, 5)], Direction::Left);
        arena.bosses.push(b);
        arena.bosses[0].set_health(2);

        assert!(arena.tick(&TickInput::default()));
        assert_eq!(arena.bosses().len(), 1);
        assert_eq!(arena.bosses()[0].health(), 1);
        assert!(arena.bosses()[0].is_alive());
        assert_eq!(arena.score(), 0);
    }

    #[test]
    fn test_boss_body_contact_costs_points() {
        let (mut arena, _clock) = arena(20, 20, 1);
        arena.foods.clear();
        arena.score = 80;
        // Snake head (10, 10) steps onto the middle of a vertical boss
        let b = boss(&arena, &[(11, 9), (11, 10), (11, 11)], Direction::Up);
        arena.bosses.push(b);

        assert!(arena.tick(&TickInput::default()));
        assert_eq!(arena.score(), 30);
        assert_eq!(arena.snake().len(), 4);
        assert_eq!(arena.bosses()[0].health(), 1);
        assert!(arena.is_alive());
    }

    #[test]
    fn test_boss_steals_food() {
        let (mut arena, clock) = arena(60, 25, 1);
        arena.foods.clear();
        arena.foods.push(food(&arena, 11, 5, FoodKind::Normal));
        let b = boss(&arena, &[(10, 5), (9, 5)], Direction::Right);
        arena.bosses.push(b);

        clock.advance_ms(200);
        assert!(arena.tick(&TickInput::default()));
        let boss = &arena.bosses()[0];
        assert_eq!(boss.head(), IVec2::new(11, 5));
        assert_eq!(boss.len(), 3);
        assert_eq!(boss.reward(), 270);
        assert!(arena.foods().iter().all(|f| f.pos != IVec2::new(11, 5)));
        assert!(arena.messages().iter().any(|m| m.text.contains("stole")));
    }

    #[test]
    fn test_boss_waits_for_its_clock() {
        let (mut arena, clock) = arena(60, 25, 1);
        arena.foods.clear();
        let b = boss(&arena, &[(10, 5), (9, 5)], Direction::Right);
        arena.bosses.push(b);

        for _ in 0..5 {
            clock.advance_ms(30);
            arena.tick(&TickInput::default());
        }
        // 150 ms elapsed, interval is 160 ms
        assert_eq!(arena.bosses()[0].head(), IVec2::new(10, 5));
        clock.advance_ms(30);
        arena.tick(&TickInput::default());
        assert_ne!(arena.bosses()[0].head(), IVec2::new(10, 5));
    }

    #[test]
    fn test_boss_spawns_at_guaranteed_level() {
        let (mut arena, _clock) = arena(60, 25, 3);
        arena.level = 6;
        assert!(arena.tick(&TickInput::default()));
        assert_eq!(arena.bosses().len(), 1);
        assert!(arena.messages().iter().any(|m| m.text.contains("invaded")));
    }

    #[test]
    fn test_penalty_food_shrinks_to_floor() {
        let (mut arena, _clock) = arena(20, 20, 1);
        arena.snake.grow(1);
        arena.foods.clear();
        let next = arena.snake().next_head();
        arena.foods.push(food(&arena, next.x, next.y, FoodKind::Penalty));
        assert!(arena.tick(&TickInput::default()));
        assert_eq!(arena.snake().len(), 3);
        assert_eq!(arena.score(), -20);

        let next = arena.snake().next_head();
        arena.foods.push(food(&arena, next.x, next.y, FoodKind::Penalty));
        assert!(arena.tick(&TickInput::default()));
        assert_eq!(arena.snake().len(), 3);
    }

    #[test]
    fn test_bonus_food_requests_bonus_only_when_idle() {
        let (mut arena, _clock) = arena(20, 20, 1);
        arena.foods.clear();
        let next = arena.snake().next_head();
        arena.foods.push(food(&arena, next.x, next.y, FoodKind::Bonus));
        assert!(arena.tick(&TickInput::default()));
        assert_eq!(arena.score(), 25);
        assert!(arena.take_bonus_request().is_some());
        assert!(arena.take_bonus_request().is_none());

        let next = arena.snake().next_head();
        arena.foods.push(food(&arena, next.x, next.y, FoodKind::Bonus));
        let input = TickInput {
            direction: None,
            bonus: Some(BonusKind::Points),
        };
        assert!(arena.tick(&input));
        assert!(arena.take_bonus_request().is_none());
    }

    #[test]
    fn test_crossing_fifty_escalates_once() {
        let (mut arena, _clock) = arena(30, 30, 1);
        arena.score = 45;
        arena.foods.clear();
        let next = arena.snake().next_head();
        arena.foods.push(food(&arena, next.x, next.y, FoodKind::Normal));
        assert!(arena.tick(&TickInput::default()));
        assert_eq!(arena.score(), 55);
        assert_eq!(arena.level(), 2);
        assert!((arena.speed_multiplier() - 1.2).abs() < 1e-6);
        arena.obstacles.clear();

        // Falling back under 50 and climbing again does not re-escalate
        arena.score = 45;
        let next = arena.snake().next_head();
        arena.foods.push(food(&arena, next.x, next.y, FoodKind::Normal));
        assert!(arena.tick(&TickInput::default()));
        assert_eq!(arena.level(), 2);
    }

    #[test]
    fn test_entities_expire() {
        let (mut arena, clock) = arena(20, 20, 1);
        arena.foods.clear();
        arena.foods.push(food(&arena, 3, 16, FoodKind::Normal));
        arena.obstacles.push(obstacle(3, 3, true, 5_000));
        arena.obstacles.push(obstacle(3, 15, false, 1));

        clock.advance_ms(5_000);
        assert!(arena.tick(&TickInput::default()));
        assert_eq!(arena.obstacles().len(), 1);
        assert!(!arena.obstacles()[0].temporary);
        assert!(arena.foods().iter().any(|f| f.spawned_at == Duration::ZERO));

        clock.advance_ms(3_000);
        assert!(arena.tick(&TickInput::default()));
        assert!(arena.foods().iter().all(|f| f.spawned_at != Duration::ZERO));
        assert_eq!(arena.obstacles().len(), 1);
    }

    #[test]
    fn test_only_temporary_obstacles_expire() {
        let (mut arena, clock) = arena(40, 30, 5);
        for _ in 0..40 {
            arena.place_obstacle();
        }
        let permanent = arena.obstacles().iter().filter(|o| !o.temporary).count();
        assert!(permanent > 0 && permanent < arena.obstacles().len());

        clock.advance_ms(arena.tuning.obstacle.lifetime_max_ms);
        arena.expire_entities();
        assert_eq!(arena.obstacles().len(), permanent);
        assert!(arena.obstacles().iter().all(|o| !o.temporary));

        // Permanent ones never age out
        clock.advance_ms(3_600_000);
        arena.expire_entities();
        assert_eq!(arena.obstacles().len(), permanent);
    }

    #[test]
    fn test_food_topped_up_when_low() {
        let (mut arena, clock) = arena(30, 30, 8);
        arena.foods.clear();
        // Still cooling down from the initial placement
        assert!(arena.tick(&TickInput::default()));
        assert!(arena.foods().is_empty());
        clock.advance_ms(4_000);
        assert!(arena.tick(&TickInput::default()));
        assert_eq!(arena.foods().len(), 1);
    }

    #[test]
    fn test_same_seed_same_run() {
        let (mut a, clock_a) = arena(30, 20, 99);
        let (mut b, clock_b) = arena(30, 20, 99);
        a.level = 8;
        b.level = 8;
        let turns = [
            Some(Direction::Up),
            None,
            Some(Direction::Left),
            None,
            Some(Direction::Down),
            None,
            Some(Direction::Right),
        ];
        for i in 0..60 {
            let input = TickInput {
                direction: turns[i % turns.len()],
                bonus: None,
            };
            clock_a.advance_ms(120);
            clock_b.advance_ms(120);
            let alive_a = a.tick(&input);
            let alive_b = b.tick(&input);
            assert_eq!(alive_a, alive_b);
            let snap_a = serde_json::to_string(&a.snapshot()).expect("serializable");
            let snap_b = serde_json::to_string(&b.snapshot()).expect("serializable");
            assert_eq!(snap_a, snap_b);
            if !alive_a {
                break;
            }
        }
    }

    proptest! {
        #[test]
        fn prop_head_advances_by_direction(
            seed in any::<u64>(),
            speed in any::<bool>(),
            commands in proptest::collection::vec(dir_strategy(), 1..80),
        ) {
            let (mut arena, clock) = arena(40, 40, seed);
            let bonus = speed.then_some(BonusKind::Speed);
            let steps = if speed { 2 } else { 1 };
            for direction in commands {
                let mut steered = arena.snake().clone();
                if let Some(dir) = direction {
                    steered.change_dir(dir);
                }
                let expected = arena.snake().head() + steered.direction().delta() * steps;

                clock.advance_ms(100);
                if !arena.tick(&TickInput { direction, bonus }) {
                    break;
                }
                prop_assert_eq!(arena.snake().head(), expected);
            }
        }

        #[test]
        fn prop_live_entities_stay_in_bounds(
            seed in any::<u64>(),
            width in 10i32..40,
            height in 10i32..40,
            commands in proptest::collection::vec(dir_strategy(), 1..120),
        ) {
            let (mut arena, clock) = arena(width, height, seed);
            arena.level = 12;
            for direction in commands {
                clock.advance_ms(120);
                if !arena.tick(&TickInput { direction, bonus: None }) {
                    break;
                }
                let bounds = *arena.bounds();
                for f in arena.foods() {
                    prop_assert!(bounds.within_margin(f.pos, arena.tuning().spawn_margin));
                }
                for b in arena.bosses() {
                    prop_assert!(bounds.within_margin(b.head(), arena.tuning().boss.wall_margin));
                }
                prop_assert!(arena.snake().len() >= 1);
            }
        }
    }
}
