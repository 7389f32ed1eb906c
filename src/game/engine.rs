use super::{
    action::Direction,
    board::Board,
    state::{CollisionType, Position, Snake},
};

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub enum StepResult {
    /// The new head left the board or landed on the snake; the game ends
    Collision(CollisionType),
    /// The snake moved one cell
    Advance {
        snake: Snake,
        /// Whether the head landed on the food; the snake grew by one if so
        ate_food: bool,
    },
}

/// Execute one step of the game
///
/// Pure function of its inputs. Replacing eaten food is left to the caller.
pub fn step(board: &Board, snake: &Snake, direction: Direction, food: Position) -> StepResult {
    let new_head = snake.head().moved_in_direction(direction);

    if let Some(collision_type) = check_collision(board, snake, new_head) {
        return StepResult::Collision(collision_type);
    }

    let ate_food = new_head == food;

    StepResult::Advance {
        snake: snake.advanced(direction, ate_food),
        ate_food,
    }
}

/// Check if the new head position causes a collision
///
/// Tested against the snake before it moves, so the tail cell that would
/// be vacated this step still counts as occupied.
fn check_collision(board: &Board, snake: &Snake, pos: Position) -> Option<CollisionType> {
    if !board.in_bounds(pos) {
        return Some(CollisionType::Wall);
    }

    if snake.occupies(pos) {
        return Some(CollisionType::SelfCollision);
    }

    None
}
