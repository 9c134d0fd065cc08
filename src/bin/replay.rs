//! Headless replay of a JSON swap log.
//!
//! Usage: `match3-replay <log.json | ->`
//!
//! Prints the final board (top row first), the score and the board hash.
//! Tracing output goes to stderr, filtered by `RUST_LOG` (default `warn`).

use std::io::Read;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tui_match3::core::BoardSnapshot;
use tui_match3::engine::{replay, ReplayLog};

fn read_input(arg: &str) -> Result<String> {
    if arg == "-" {
        let mut s = String::new();
        std::io::stdin().read_to_string(&mut s)?;
        return Ok(s);
    }
    std::fs::read_to_string(arg).with_context(|| format!("cannot read replay log {}", arg))
}

fn print_board(snap: &BoardSnapshot) {
    for y in (0..snap.height).rev() {
        let row: Vec<String> = (0..snap.width)
            .map(|x| match snap.cell(x, y) {
                Some(0) | None => ".".to_string(),
                Some(v) => (v - 1).to_string(),
            })
            .collect();
        println!("{}", row.join(" "));
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(arg) = std::env::args().nth(1) else {
        bail!("usage: match3-replay <log.json | ->");
    };

    let log = ReplayLog::from_json(&read_input(&arg)?)?;
    info!(swaps = log.swaps.len(), seed = log.config.seed, "replaying");
    let outcome = replay(&log)?;

    print_board(&outcome.snapshot);
    println!("swaps: {}", outcome.swaps_applied);
    println!("score: {}", outcome.score);
    println!("board_hash: {:016x}", outcome.snapshot.board_hash);
    Ok(())
}
