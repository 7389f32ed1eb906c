use std::time::Duration;

use super::action::Direction;
use super::state::Position;

/// Side length of the square board
pub const GRID_SIZE: i32 = 20;

/// Time between two simulation steps
pub const TICK_INTERVAL: Duration = Duration::from_millis(200);

/// Fixed game constants
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: i32,
    /// Height of the game grid
    pub grid_height: i32,
    /// Time between two ticks while running
    pub tick_interval: Duration,
    /// Cell the single-segment snake starts on
    pub initial_head: Position,
    /// Direction of motion at the start of a game
    pub initial_direction: Direction,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: GRID_SIZE,
            grid_height: GRID_SIZE,
            tick_interval: TICK_INTERVAL,
            initial_head: Position::new(8, 8),
            initial_direction: Direction::Right,
        }
    }
}

impl GameConfig {
    /// Create a configuration with a custom grid size
    ///
    /// Only used to exercise edge cases such as a full board; the game
    /// itself always plays on the default 20x20 grid.
    pub fn with_grid(width: i32, height: i32, initial_head: Position) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            initial_head,
            ..Default::default()
        }
    }
}
