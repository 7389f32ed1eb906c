//! Grid Snake - a terminal Snake game
//!
//! This library provides:
//! - Core game logic: board, food placement, step engine and the
//!   timer-driven game session (game module)
//! - Keyboard input mapping (input module)
//! - TUI rendering (render module)
//! - The interactive terminal mode (modes module)

pub mod game;
pub mod input;
pub mod modes;
pub mod render;
