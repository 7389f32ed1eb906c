use super::config::GameConfig;
use super::state::Position;

/// Rectangular playing field, cells addressed from (0, 0) at the top left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    pub width: i32,
    pub height: i32,
}

impl Board {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.grid_width, config.grid_height)
    }

    /// Check if a position is within the grid bounds
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Number of cells on the board
    pub fn area(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }

    /// Every cell, row by row
    pub fn cells(&self) -> impl Iterator<Item = Position> {
        let (width, height) = (self.width, self.height);
        (0..height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_checking() {
        let board = Board::default();

        assert!(board.in_bounds(Position::new(0, 0)));
        assert!(board.in_bounds(Position::new(19, 19)));
        assert!(board.in_bounds(Position::new(8, 8)));
        assert!(!board.in_bounds(Position::new(-1, 0)));
        assert!(!board.in_bounds(Position::new(0, -1)));
        assert!(!board.in_bounds(Position::new(20, 0)));
        assert!(!board.in_bounds(Position::new(0, 20)));
    }

    #[test]
    fn test_cells_enumeration() {
        let board = Board::new(3, 2);
        let cells: Vec<Position> = board.cells().collect();

        assert_eq!(board.area(), 6);
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], Position::new(0, 0));
        assert_eq!(cells[2], Position::new(2, 0));
        assert_eq!(cells[3], Position::new(0, 1));
        assert!(cells.iter().all(|&c| board.in_bounds(c)));
    }
}
