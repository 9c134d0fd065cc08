//! Session layer on top of the cascade resolver
//!
//! - [`session`]: timed game with phase pacing, score and restart
//! - [`clock`]: countdown that ends a session
//! - [`replay`]: JSON swap logs and deterministic playback

pub mod clock;
pub mod replay;
pub mod session;

pub use clock::SessionClock;
pub use replay::{replay, ReplayConfig, ReplayError, ReplayLog, ReplayOutcome, SwapRecord};
pub use session::{GameSession, SessionConfig};
