//! Battalion game engine library.
//!
//! Exposes the hex board, command notation, unit strategies, combat and
//! phase resolution, the threaded game loop and scenario loading for the
//! binaries and integration tests.

pub mod board;
pub mod engine;
pub mod error;
pub mod movegen;
pub mod protocol;
pub mod render;
pub mod resolve;
pub mod scenario;
pub mod selfplay;

pub use engine::{run_game, GameSummary, GameView, LoopConfig, SharedGame};
pub use error::GameError;
pub use scenario::{load_scenario, Scenario, ScenarioError};
