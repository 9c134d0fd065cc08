//! Timed game session: resolver pacing, score, clock and restart.
//!
//! The resolver completes one phase per `step`; the session spaces those steps
//! `phase_delay_ms` apart so a front end can show each stage of a cascade.
//! A delay of 0 settles every swap within the tick it was requested in.

use tracing::{debug, info};

use tui_match3_core::config::parse_var;
use tui_match3_types::{Phase, Pos, DEFAULT_SESSION_MS, PHASE_DELAY_MS};
use tui_match3_core::{
    BoardConfig, BoardSnapshot, CascadeEvent, CascadeResolver, ConfigError, EventLog,
    ScoreConfig, ScoreKeeper,
};

use crate::clock::SessionClock;
use crate::replay::{ReplayLog, SwapRecord};

pub const ENV_DURATION_SECS: &str = "MATCH3_DURATION_SECS";
pub const ENV_PHASE_DELAY_MS: &str = "MATCH3_PHASE_DELAY_MS";

type SessionSink = (ScoreKeeper, EventLog);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub board: BoardConfig,
    pub score: ScoreConfig,
    /// Session length; 0 disables the countdown.
    pub duration_ms: u32,
    /// Pause between resolver phases.
    pub phase_delay_ms: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            score: ScoreConfig::default(),
            duration_ms: DEFAULT_SESSION_MS,
            phase_delay_ms: PHASE_DELAY_MS,
        }
    }
}

impl SessionConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self {
            board: BoardConfig::from_lookup(&lookup)?,
            score: ScoreConfig::from_lookup(&lookup)?,
            ..Self::default()
        };
        if let Some(secs) = parse_var::<u32>(&lookup, ENV_DURATION_SECS)? {
            config.duration_ms = secs.saturating_mul(1000);
        }
        if let Some(ms) = parse_var::<u32>(&lookup, ENV_PHASE_DELAY_MS)? {
            config.phase_delay_ms = ms;
        }
        Ok(config)
    }
}

/// One player's game, restartable without losing the high score
#[derive(Debug, Clone)]
pub struct GameSession {
    config: SessionConfig,
    resolver: CascadeResolver<SessionSink>,
    clock: SessionClock,
    phase_timer_ms: u32,
    episode: u32,
    history: Vec<SwapRecord>,
}

impl GameSession {
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.score.validate()?;
        let sink = (ScoreKeeper::new(config.score), EventLog::new());
        let resolver = CascadeResolver::new(&config.board, sink)?;
        info!(seed = config.board.seed, "session started");
        Ok(Self {
            config,
            resolver,
            clock: SessionClock::new(config.duration_ms),
            phase_timer_ms: 0,
            episode: 0,
            history: Vec::new(),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn resolver(&self) -> &CascadeResolver<SessionSink> {
        &self.resolver
    }

    pub fn phase(&self) -> Phase {
        self.resolver.phase()
    }

    pub fn is_busy(&self) -> bool {
        self.resolver.phase().is_busy()
    }

    pub fn is_game_over(&self) -> bool {
        self.resolver.is_game_over()
    }

    pub fn combo(&self) -> u32 {
        self.resolver.combo()
    }

    pub fn score(&self) -> u32 {
        self.resolver.sink().0.current()
    }

    pub fn high_score(&self) -> u32 {
        self.resolver.sink().0.high()
    }

    pub fn score_keeper(&self) -> &ScoreKeeper {
        &self.resolver.sink().0
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    pub fn remaining_ms(&self) -> u32 {
        self.clock.remaining_ms()
    }

    /// Restart count since construction
    pub fn episode(&self) -> u32 {
        self.episode
    }

    pub fn seed(&self) -> u32 {
        self.config.board.seed
    }

    /// Take the notifications recorded since the last call
    pub fn take_events(&mut self) -> Vec<CascadeEvent> {
        self.resolver.sink_mut().1.drain()
    }

    /// Queue a swap; returns false when the resolver rejects it
    pub fn request_swap(&mut self, a: Pos, b: Pos) -> bool {
        if !self.resolver.request_swap(a, b) {
            return false;
        }
        self.history.push(SwapRecord::new(a, b));
        self.phase_timer_ms = 0;
        if self.config.phase_delay_ms == 0 {
            self.resolver.settle();
        } else {
            // The swap itself shows immediately; later phases wait the delay.
            self.resolver.step();
        }
        true
    }

    /// Advance the clock and any in-flight cascade; returns true if the
    /// visible state changed.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        let mut changed = false;

        if self.clock.tick(elapsed_ms) {
            debug!("session clock expired");
            self.resolver.notify_game_over();
            changed = true;
        }

        if !self.resolver.phase().is_busy() {
            self.phase_timer_ms = 0;
            // A deferred game over lands on the first idle step.
            return self.resolver.step() || changed;
        }

        if self.config.phase_delay_ms == 0 {
            return self.resolver.settle() > 0 || changed;
        }

        self.phase_timer_ms = self.phase_timer_ms.saturating_add(elapsed_ms);
        while self.phase_timer_ms >= self.config.phase_delay_ms && self.resolver.phase().is_busy() {
            self.phase_timer_ms -= self.config.phase_delay_ms;
            changed |= self.resolver.step();
        }
        changed
    }

    /// Run any in-flight cascade to completion immediately
    pub fn settle(&mut self) {
        self.resolver.settle();
        self.phase_timer_ms = 0;
    }

    /// End the session now (or as soon as the current cascade settles)
    pub fn end(&mut self) {
        self.resolver.notify_game_over();
    }

    /// Start a fresh board with the next seed, keeping the high score
    pub fn restart(&mut self) -> Result<(), ConfigError> {
        let mut keeper = self.resolver.sink().0.clone();
        keeper.commit_high_score();
        keeper.reset_current();

        let board = self.config.board.with_seed(self.config.board.seed.wrapping_add(1));
        self.resolver = CascadeResolver::new(&board, (keeper, EventLog::new()))?;
        self.config.board = board;
        self.clock.reset();
        self.phase_timer_ms = 0;
        self.episode = self.episode.wrapping_add(1);
        self.history.clear();
        info!(seed = board.seed, episode = self.episode, "session restarted");
        Ok(())
    }

    /// Accepted swaps of the current episode, replayable from its config
    pub fn replay_log(&self) -> ReplayLog {
        ReplayLog::new(&self.config.board, &self.config.score, self.history.clone())
    }

    pub fn snapshot_into(&self, out: &mut BoardSnapshot) {
        self.resolver.snapshot_into(out);
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.resolver.snapshot()
    }
}
