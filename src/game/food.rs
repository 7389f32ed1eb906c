use anyhow::{Result, bail};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::board::Board;
use super::state::{Position, Snake};

/// Random draws per board cell before giving up on rejection sampling
const ATTEMPTS_PER_CELL: usize = 4;

/// Picks food cells that are not covered by the snake
pub struct FoodSpawner {
    rng: StdRng,
}

impl FoodSpawner {
    /// Spawner seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Spawner with a reproducible sequence of placements
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Spawn food at a random empty position
    ///
    /// Samples uniformly over the board until a free cell comes up. After a
    /// bounded number of misses it switches to scanning the free cells, so a
    /// nearly full board cannot stall the game. Fails only when the snake
    /// covers every cell.
    pub fn place_food(&mut self, board: &Board, snake: &Snake) -> Result<Position> {
        let area = board.area();
        if snake.len() >= area && board.cells().all(|cell| snake.occupies(cell)) {
            bail!(
                "board is full: snake covers all {} cells, nowhere to place food",
                area
            );
        }

        for _ in 0..area * ATTEMPTS_PER_CELL {
            let x = self.rng.gen_range(0..board.width);
            let y = self.rng.gen_range(0..board.height);
            let pos = Position::new(x, y);

            if !snake.occupies(pos) {
                return Ok(pos);
            }
        }

        tracing::debug!(
            snake_len = snake.len(),
            "random food placement kept missing, scanning free cells"
        );

        let free: Vec<Position> = board.cells().filter(|&cell| !snake.occupies(cell)).collect();
        if free.is_empty() {
            bail!("board is full: no free cell left for food");
        }

        Ok(free[self.rng.gen_range(0..free.len())])
    }
}

impl Default for FoodSpawner {
    fn default() -> Self {
        Self::new()
    }
}
