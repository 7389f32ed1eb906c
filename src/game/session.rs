use anyhow::{Context, Result};

use super::{
    action::{Command, Direction},
    board::Board,
    config::GameConfig,
    engine::{self, StepResult},
    food::FoodSpawner,
    state::{CollisionType, GameSnapshot, Phase, Position, Snake},
    timer::TickTimer,
};

/// What a call to [`GameSession::tick`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The session was not running; nothing changed
    Idle,
    /// The snake moved without eating
    Moved,
    /// The snake ate the food and grew
    Ate,
    /// The snake hit something and the game is over
    Collided(CollisionType),
}

/// One game of snake, from start screen to game over
///
/// Owns the snake, food, score, lifecycle phase and the tick timer. All
/// mutation goes through the lifecycle commands, `turn` and `tick`.
pub struct GameSession {
    config: GameConfig,
    board: Board,
    food_spawner: FoodSpawner,
    snake: Snake,
    food: Position,
    score: u32,
    phase: Phase,
    /// Direction change to apply on the next tick
    pending_direction: Option<Direction>,
    timer: TickTimer,
}

impl GameSession {
    /// Create a session on the start screen
    pub fn new(config: GameConfig, mut food_spawner: FoodSpawner) -> Result<Self> {
        let board = Board::from_config(&config);
        let snake = Snake::new(config.initial_head, config.initial_direction, 1);
        let food = food_spawner
            .place_food(&board, &snake)
            .context("Failed to place initial food")?;

        Ok(Self {
            config,
            board,
            food_spawner,
            snake,
            food,
            score: 0,
            phase: Phase::NotStarted,
            pending_direction: None,
            timer: TickTimer::new(),
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Position {
        self.food
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    pub fn is_timer_active(&self) -> bool {
        self.timer.is_active()
    }

    /// Copy of the state the presentation layer draws
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            snake: self.snake.body().to_vec(),
            food: self.food,
            score: self.score,
            phase: self.phase,
        }
    }

    /// Dispatch a command from the presentation layer
    pub fn handle(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Turn(direction) => {
                self.turn(direction);
            }
            Command::Start => self.start()?,
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::Reset => self.reset()?,
        }
        Ok(())
    }

    /// Begin a fresh game and start ticking
    ///
    /// Allowed from every phase; a running game is thrown away.
    pub fn start(&mut self) -> Result<()> {
        self.reinitialize().context("Failed to start a new game")?;
        self.phase = Phase::Running;
        self.timer.schedule(self.config.tick_interval);
        tracing::info!("game started");
        Ok(())
    }

    /// Freeze a running game; no-op in any other phase
    pub fn pause(&mut self) {
        if self.phase != Phase::Running {
            tracing::debug!(phase = ?self.phase, "ignoring pause");
            return;
        }
        self.timer.cancel();
        self.phase = Phase::Paused;
        tracing::info!(score = self.score, "game paused");
    }

    /// Continue a paused game; the next tick is a full interval away
    pub fn resume(&mut self) {
        if self.phase != Phase::Paused {
            tracing::debug!(phase = ?self.phase, "ignoring resume");
            return;
        }
        self.phase = Phase::Running;
        self.timer.schedule(self.config.tick_interval);
        tracing::info!(score = self.score, "game resumed");
    }

    /// Go back to the start screen with fresh state
    pub fn reset(&mut self) -> Result<()> {
        self.timer.cancel();
        self.reinitialize().context("Failed to reset the game")?;
        self.phase = Phase::NotStarted;
        tracing::info!("game reset");
        Ok(())
    }

    /// Request a direction change for the next tick
    ///
    /// Rejected while not running, and when `direction` moves along the same
    /// axis the snake is currently moving on. An accepted request replaces
    /// any earlier pending one. Returns whether the request was accepted.
    pub fn turn(&mut self, direction: Direction) -> bool {
        if self.phase != Phase::Running {
            tracing::debug!(?direction, phase = ?self.phase, "ignoring turn");
            return false;
        }

        if direction.shares_axis(self.snake.direction) {
            tracing::debug!(?direction, current = ?self.snake.direction, "rejected turn");
            return false;
        }

        self.pending_direction = Some(direction);
        true
    }

    /// Wait until the session's timer fires
    ///
    /// Never resolves while the game is not running.
    pub async fn next_tick(&mut self) {
        self.timer.tick().await;
    }

    /// Advance the game by one step
    ///
    /// Does nothing unless running. Fails only if the snake has filled the
    /// board and no cell is left for new food; the game is over in that case.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        if self.phase != Phase::Running {
            return Ok(TickOutcome::Idle);
        }

        let direction = self
            .pending_direction
            .take()
            .unwrap_or(self.snake.direction);

        match engine::step(&self.board, &self.snake, direction, self.food) {
            StepResult::Collision(collision_type) => {
                self.finish();
                tracing::info!(score = self.score, ?collision_type, "game over");
                Ok(TickOutcome::Collided(collision_type))
            }
            StepResult::Advance { snake, ate_food } => {
                self.snake = snake;
                tracing::debug!(head = ?self.snake.head(), len = self.snake.len(), "tick");

                if !ate_food {
                    return Ok(TickOutcome::Moved);
                }

                self.score += 1;
                match self.food_spawner.place_food(&self.board, &self.snake) {
                    Ok(food) => {
                        self.food = food;
                        Ok(TickOutcome::Ate)
                    }
                    Err(err) => {
                        self.finish();
                        Err(err.context(format!("Game ended with score {}", self.score)))
                    }
                }
            }
        }
    }

    fn finish(&mut self) {
        self.phase = Phase::Over;
        self.timer.cancel();
        self.pending_direction = None;
    }

    /// Fresh snake, food and score; leaves phase and timer alone
    ///
    /// Nothing is modified if new food cannot be placed.
    fn reinitialize(&mut self) -> Result<()> {
        let snake = Snake::new(self.config.initial_head, self.config.initial_direction, 1);
        let food = self.food_spawner.place_food(&self.board, &snake)?;

        self.snake = snake;
        self.food = food;
        self.score = 0;
        self.pending_direction = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::{Instant, sleep, timeout};

    fn session() -> GameSession {
        GameSession::new(GameConfig::default(), FoodSpawner::with_seed(11)).unwrap()
    }

    /// Drive the session for `window`, counting state advances
    async fn count_ticks(session: &mut GameSession, window: Duration) -> usize {
        let deadline = sleep(window);
        tokio::pin!(deadline);
        let mut ticks = 0;

        loop {
            tokio::select! {
                _ = &mut deadline => break,
                _ = session.next_tick() => {
                    if session.tick().unwrap() != TickOutcome::Idle {
                        ticks += 1;
                    }
                }
            }
        }

        ticks
    }

    #[test]
    fn test_new_session_is_on_start_screen() {
        let session = session();
        let snapshot = session.snapshot();

        assert_eq!(snapshot.phase, Phase::NotStarted);
        assert_eq!(snapshot.snake, vec![Position::new(8, 8)]);
        assert_eq!(snapshot.score, 0);
        assert_ne!(snapshot.food, Position::new(8, 8));
        assert!(!session.is_timer_active());
    }

    #[test]
    fn test_commands_in_wrong_phase_are_noops() {
        let mut session = session();
        let before = session.snapshot();

        session.pause();
        session.resume();
        assert!(!session.turn(Direction::Up));
        assert_eq!(session.tick().unwrap(), TickOutcome::Idle);

        assert_eq!(session.snapshot(), before);
        assert!(!session.is_timer_active());
    }

    #[test]
    fn test_commands_work_without_runtime() {
        let mut session = session();

        session.start().unwrap();
        assert_eq!(session.phase(), Phase::Running);
        assert!(session.is_timer_active());

        session.pause();
        assert_eq!(session.phase(), Phase::Paused);
        assert!(!session.is_timer_active());

        session.resume();
        assert_eq!(session.phase(), Phase::Running);
        assert!(session.is_timer_active());

        session.food = Position::new(0, 0);
        assert_eq!(session.tick().unwrap(), TickOutcome::Moved);

        session.start().unwrap();
        session.reset().unwrap();
        assert_eq!(session.phase(), Phase::NotStarted);
        assert!(!session.is_timer_active());
    }

    #[test]
    fn test_tick_while_paused_changes_nothing() {
        let mut session = session();
        session.start().unwrap();
        session.food = Position::new(9, 8);
        assert_eq!(session.tick().unwrap(), TickOutcome::Ate);
        assert!(session.turn(Direction::Down));

        session.pause();
        let paused = session.snapshot();

        assert_eq!(session.tick().unwrap(), TickOutcome::Idle);
        assert_eq!(session.tick().unwrap(), TickOutcome::Idle);
        assert_eq!(session.snapshot(), paused);
        assert_eq!(session.score(), 1);
        assert_eq!(session.pending_direction(), Some(Direction::Down));
    }

    #[tokio::test]
    async fn test_start_runs_and_arms_timer() {
        let mut session = session();
        session.start().unwrap();

        assert_eq!(session.phase(), Phase::Running);
        assert!(session.is_timer_active());
    }

    #[tokio::test]
    async fn test_single_step_moves_right() {
        let mut session = session();
        session.start().unwrap();
        session.food = Position::new(0, 0);

        assert_eq!(session.tick().unwrap(), TickOutcome::Moved);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.snake, vec![Position::new(9, 8)]);
        assert_eq!(snapshot.phase, Phase::Running);
        assert_eq!(snapshot.score, 0);
    }

    #[tokio::test]
    async fn test_eating_scores_and_replaces_food() {
        let mut session = session();
        session.start().unwrap();
        session.food = Position::new(9, 8);

        assert_eq!(session.tick().unwrap(), TickOutcome::Ate);

        assert_eq!(session.score(), 1);
        assert_eq!(session.snake().len(), 2);
        assert!(!session.snake().occupies(session.food()));
    }

    #[tokio::test]
    async fn test_wall_collision_ends_game() {
        let mut session = session();
        session.start().unwrap();
        session.snake = Snake::new(Position::new(19, 8), Direction::Right, 1);
        session.food = Position::new(0, 0);

        assert_eq!(
            session.tick().unwrap(),
            TickOutcome::Collided(CollisionType::Wall)
        );
        assert_eq!(session.phase(), Phase::Over);
        assert!(!session.is_timer_active());

        // Further ticks and turns do nothing
        assert_eq!(session.tick().unwrap(), TickOutcome::Idle);
        assert!(!session.turn(Direction::Up));
        session.pause();
        assert_eq!(session.phase(), Phase::Over);
    }

    #[tokio::test]
    async fn test_reversal_rejected_and_perpendicular_buffered() {
        let mut session = session();
        session.start().unwrap();
        session.food = Position::new(0, 0);

        assert!(!session.turn(Direction::Left));
        assert!(!session.turn(Direction::Right));
        assert!(session.turn(Direction::Up));

        // Not applied until the next tick
        assert_eq!(session.snake().direction, Direction::Right);
        assert_eq!(session.pending_direction(), Some(Direction::Up));

        session.tick().unwrap();
        assert_eq!(session.snake().head(), Position::new(8, 7));
        assert_eq!(session.snake().direction, Direction::Up);
        assert_eq!(session.pending_direction(), None);
    }

    #[tokio::test]
    async fn test_latest_valid_turn_wins() {
        let mut session = session();
        session.start().unwrap();
        session.food = Position::new(0, 0);

        assert!(session.turn(Direction::Up));
        assert!(session.turn(Direction::Down));
        // Still moving right, so Left is a reversal even after an Up request
        assert!(!session.turn(Direction::Left));

        session.tick().unwrap();
        assert_eq!(session.snake().head(), Position::new(8, 9));
    }

    #[tokio::test]
    async fn test_reset_returns_to_start_screen() {
        let mut session = session();
        session.start().unwrap();
        session.food = Position::new(9, 8);
        session.tick().unwrap();
        assert_eq!(session.score(), 1);

        session.reset().unwrap();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, Phase::NotStarted);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.snake, vec![Position::new(8, 8)]);
        assert!(!session.is_timer_active());
    }

    #[tokio::test]
    async fn test_handle_dispatches_commands() {
        let mut session = session();

        session.handle(Command::Start).unwrap();
        assert_eq!(session.phase(), Phase::Running);

        session.handle(Command::Turn(Direction::Down)).unwrap();
        assert_eq!(session.pending_direction(), Some(Direction::Down));

        session.handle(Command::Pause).unwrap();
        assert_eq!(session.phase(), Phase::Paused);

        session.handle(Command::Resume).unwrap();
        assert_eq!(session.phase(), Phase::Running);

        session.handle(Command::Reset).unwrap();
        assert_eq!(session.phase(), Phase::NotStarted);
    }

    #[tokio::test]
    async fn test_full_board_ends_game_with_error() {
        // 2x1 board: eating the only food fills it
        let config = GameConfig::with_grid(2, 1, Position::new(0, 0));
        let mut session = GameSession::new(config, FoodSpawner::with_seed(5)).unwrap();
        assert_eq!(session.food(), Position::new(1, 0));

        session.start().unwrap();
        let err = session.tick().unwrap_err();

        assert!(format!("{:#}", err).contains("board is full"));
        assert_eq!(session.score(), 1);
        assert_eq!(session.phase(), Phase::Over);
        assert!(!session.is_timer_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_stops_ticks() {
        let mut session = session();
        session.start().unwrap();
        session.food = Position::new(0, 0);

        assert_eq!(count_ticks(&mut session, Duration::from_millis(500)).await, 2);

        session.pause();
        let paused = session.snapshot();
        assert_eq!(count_ticks(&mut session, Duration::from_millis(2000)).await, 0);
        assert_eq!(session.snapshot(), paused);

        session.resume();
        let resumed_at = Instant::now();
        timeout(Duration::from_millis(1000), session.next_tick())
            .await
            .unwrap();
        let waited = resumed_at.elapsed();
        assert!(waited >= Duration::from_millis(200) && waited < Duration::from_millis(205));
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_start_keeps_one_timer() {
        let mut session = session();
        session.start().unwrap();
        session.start().unwrap();
        session.food = Position::new(0, 0);

        // Ticks land at 200, 400, 600, 800 and 1000 ms
        assert_eq!(count_ticks(&mut session, Duration::from_millis(1100)).await, 5);
        assert_eq!(session.snake().head(), Position::new(13, 8));
    }
}
