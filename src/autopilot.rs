//! Demo steering for unattended runs
//!
//! Heads for the closest edible food and refuses any step that would be
//! fatal on the next tick. No lookahead beyond one cell.

use rand::Rng;

use crate::sim::{Arena, Clock, Coord, Direction, FoodKind};

/// Direction command for the next tick, or `None` to keep going straight
pub fn choose_direction<C: Clock, R: Rng>(arena: &Arena<C, R>) -> Option<Direction> {
    let snake = arena.snake();
    let head = snake.head();
    let current = snake.direction();

    let target = arena
        .foods()
        .iter()
        .filter(|f| f.kind != FoodKind::Penalty)
        .min_by_key(|f| {
            let d = f.pos - head;
            d.x.abs() + d.y.abs()
        })
        .map(|f| f.pos);

    if let Some(target) = target {
        // Prefer the dominant axis, then the other one
        let d = target - head;
        let mut wanted = Vec::with_capacity(2);
        if let Some(dir) = Direction::toward(head, target) {
            wanted.push(dir);
        }
        let other = if d.x.abs() >= d.y.abs() {
            Direction::from_delta(Coord::new(0, d.y.signum()))
        } else {
            Direction::from_delta(Coord::new(d.x.signum(), 0))
        };
        wanted.extend(other);

        if let Some(&dir) = wanted
            .iter()
            .find(|&&dir| dir != current.opposite() && is_safe(arena, head + dir.delta()))
        {
            return (dir != current).then_some(dir);
        }
    }

    if is_safe(arena, head + current.delta()) {
        return None;
    }

    Direction::ALL
        .into_iter()
        .filter(|&d| d != current && d != current.opposite())
        .find(|&d| is_safe(arena, head + d.delta()))
}

/// Whether moving the head onto `cell` survives the next tick
fn is_safe<C: Clock, R: Rng>(arena: &Arena<C, R>, cell: Coord) -> bool {
    if !arena.bounds().within_margin(cell, 1) {
        return false;
    }
    if arena.obstacles().iter().any(|o| o.pos == cell) {
        return false;
    }
    // The tail cell frees up as the snake moves
    let body = arena.snake().body();
    let keep = body.len().saturating_sub(1);
    if body.iter().take(keep).any(|&c| c == cell) {
        return false;
    }
    !arena.bosses().iter().any(|b| b.occupies(cell))
}
