//! Magic Ball server: session management, configuration, HTTP API and simulation.
//!
//! The engine itself lives in the `magic_ball` crate; this crate keeps live
//! games in memory, exposes them over JSON/HTTP and runs batch simulations.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod api;
pub mod cli;
pub mod config;
pub mod session;
pub mod simulate;

pub use api::{CardView, GameStateView, MoveBody, SESSION_HEADER, router};
pub use config::{ConfigError, ServerConfig};
pub use session::{
    CardMoves, DEFAULT_SESSION, GameSession, HandsView, MoveOutcome, NewGameOptions, SessionError,
    SessionId, SessionManager,
};
pub use simulate::{SimulationOptions, SimulationSummary, run_simulation};
