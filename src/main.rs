//! Snake Arena headless runner
//!
//! Plays one round with the autopilot on a manual clock and prints the
//! final snapshot as JSON.
//!
//! Flags: `--seed N`, `--ticks N`, `--width N`, `--height N`, `--tuning PATH`

use std::str::FromStr;

use snake_arena::autopilot;
use snake_arena::consts::*;
use snake_arena::sim::{Arena, Bounds, ManualClock};
use snake_arena::{Session, Tuning};

struct Args {
    seed: u64,
    ticks: u64,
    width: i32,
    height: i32,
    tuning: Option<String>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            ticks: DEFAULT_TICKS,
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            tuning: None,
        }
    }
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Self {
        let mut parsed = Self::default();
        while let Some(flag) = args.next() {
            let value = args.next();
            match flag.as_str() {
                "--seed" => parse_into(&flag, value, &mut parsed.seed),
                "--ticks" => parse_into(&flag, value, &mut parsed.ticks),
                "--width" => parse_into(&flag, value, &mut parsed.width),
                "--height" => parse_into(&flag, value, &mut parsed.height),
                "--tuning" => parsed.tuning = value,
                other => log::warn!("Ignoring unknown argument {}", other),
            }
        }
        parsed
    }
}

fn parse_into<T: FromStr>(flag: &str, value: Option<String>, slot: &mut T) {
    match value.as_deref().map(str::parse::<T>) {
        Some(Ok(v)) => *slot = v,
        _ => log::warn!("Bad value for {}: {:?}, keeping default", flag, value),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Snake Arena (headless) starting...");

    let args = Args::parse(std::env::args().skip(1));
    let tuning = args.tuning.as_deref().map(Tuning::load).unwrap_or_default();

    let clock = ManualClock::new();
    let bounds = Bounds::new(args.width.max(8), args.height.max(8));
    let arena = Arena::seeded(bounds, tuning, clock.clone(), args.seed);
    let mut session = Session::new(arena);

    for _ in 0..args.ticks {
        if let Some(dir) = autopilot::choose_direction(session.arena()) {
            session.queue_direction(dir);
        }
        clock.advance(session.frame_interval());
        if !session.step() {
            break;
        }
    }

    let arena = session.arena();
    log::info!(
        "Finished after {} ticks: score {}, level {}, max combo {}",
        arena.ticks(),
        arena.score(),
        arena.level(),
        arena.combo().max()
    );

    match serde_json::to_string_pretty(&arena.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize snapshot: {}", e),
    }
}
