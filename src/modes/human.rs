use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;

use crate::game::{Command, FoodSpawner, GameConfig, GameSession, Phase, TickOutcome};
use crate::input::{InputHandler, KeyAction};
use crate::render::Renderer;

pub struct HumanMode {
    session: GameSession,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig, food_spawner: FoodSpawner) -> Result<Self> {
        let session =
            GameSession::new(config, food_spawner).context("Failed to create game session")?;

        Ok(Self {
            session,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                    }
                }

                // Game logic tick, only armed while the session is running
                _ = self.session.next_tick() => {
                    self.update_game();
                }

                // Render frame
                _ = render_timer.tick() => {
                    let snapshot = self.session.snapshot();
                    let board = *self.session.board();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &board);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            let action = self.input_handler.handle_key_event(key);
            if action == KeyAction::Quit {
                self.should_quit = true;
                return Ok(());
            }

            if let Some(command) = self.command_for(&action) {
                self.session.handle(command)?;
            }
        }

        Ok(())
    }

    /// Translate a key action into a session command for the current phase
    fn command_for(&self, action: &KeyAction) -> Option<Command> {
        match action {
            KeyAction::Move(direction) => Some((*direction).into()),
            KeyAction::Start => match self.session.phase() {
                Phase::NotStarted | Phase::Over => Some(Command::Start),
                Phase::Running | Phase::Paused => None,
            },
            KeyAction::TogglePause => Some(match self.session.phase() {
                Phase::Running => Command::Pause,
                Phase::Paused => Command::Resume,
                Phase::NotStarted | Phase::Over => Command::Start,
            }),
            KeyAction::Restart => Some(Command::Reset),
            KeyAction::Quit | KeyAction::None => None,
        }
    }

    fn update_game(&mut self) {
        match self.session.tick() {
            Ok(TickOutcome::Collided(_)) => {
                tracing::info!(score = self.session.score(), "snake crashed");
            }
            Ok(_) => {}
            // The session is already over; keep the game-over screen up
            Err(err) => tracing::error!("{:#}", err),
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
