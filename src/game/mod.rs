//! Core game logic module for Snake
//!
//! This module contains all the game logic without any terminal or rendering
//! dependencies. The session is driven by its own tick timer and exposes a
//! snapshot of the state for whatever draws it.

pub mod action;
pub mod board;
pub mod config;
pub mod engine;
pub mod food;
pub mod session;
pub mod state;
pub mod timer;

// Re-export commonly used types
pub use action::{Command, Direction};
pub use board::Board;
pub use config::{GRID_SIZE, GameConfig, TICK_INTERVAL};
pub use engine::{StepResult, step};
pub use food::FoodSpawner;
pub use session::{GameSession, TickOutcome};
pub use state::{CollisionType, GameSnapshot, Phase, Position, Snake};
pub use timer::TickTimer;
