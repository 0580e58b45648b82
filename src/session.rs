//! Driver-side session around an arena
//!
//! Owns the pieces the core deliberately leaves outside: the pending
//! direction command, timed bonus activation and the frame interval.

use std::time::Duration;

use rand::Rng;
use rand_pcg::Pcg32;

use crate::sim::{Arena, BonusKind, Clock, Direction, TickInput};

/// Frame interval at speed multiplier 1.0
pub const BASE_FRAME: Duration = Duration::from_millis(120);
/// How long an activated bonus stays on
pub const BONUS_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveBonus {
    pub kind: BonusKind,
    pub expires_at: Duration,
}

pub struct Session<C: Clock, R: Rng = Pcg32> {
    arena: Arena<C, R>,
    pending_direction: Option<Direction>,
    bonus: Option<ActiveBonus>,
}

impl<C: Clock, R: Rng> Session<C, R> {
    pub fn new(arena: Arena<C, R>) -> Self {
        Self {
            arena,
            pending_direction: None,
            bonus: None,
        }
    }

    pub fn arena(&self) -> &Arena<C, R> {
        &self.arena
    }

    pub fn active_bonus(&self) -> Option<ActiveBonus> {
        self.bonus
    }

    /// Remember the latest direction key; only the last one before a step counts
    pub fn queue_direction(&mut self, dir: Direction) {
        self.pending_direction = Some(dir);
    }

    /// Turn a bonus on unless one is already running
    pub fn activate_bonus(&mut self, kind: BonusKind) -> bool {
        if self.bonus.is_some() {
            return false;
        }
        let expires_at = self.arena.now() + BONUS_DURATION;
        self.bonus = Some(ActiveBonus { kind, expires_at });
        self.arena.apply_bonus(kind);
        log::info!("Bonus {} active until {:?}", kind.label(), expires_at);
        true
    }

    /// Run one arena tick with the queued input
    pub fn step(&mut self) -> bool {
        let now = self.arena.now();
        if self.bonus.is_some_and(|b| now >= b.expires_at) {
            log::debug!("Bonus expired");
            self.bonus = None;
        }

        let input = TickInput {
            direction: self.pending_direction.take(),
            bonus: self.bonus.map(|b| b.kind),
        };
        let alive = self.arena.tick(&input);

        if let Some(kind) = self.arena.take_bonus_request() {
            self.activate_bonus(kind);
        }
        alive
    }

    /// Time until the next step should run
    pub fn frame_interval(&self) -> Duration {
        let multiplier = f64::from(self.arena.speed_multiplier().max(0.1));
        let ms = (BASE_FRAME.as_millis() as f64 / multiplier).round() as u64;
        let base = Duration::from_millis(ms.max(1));
        match self.bonus {
            Some(ActiveBonus {
                kind: BonusKind::Speed,
                ..
            }) => base / 2,
            _ => base,
        }
    }
}
