use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};

use crate::game::{Game, GameConfig, JoinError, PlayerHandle};
use crate::input::{InputSampler, Keyboard};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Render at roughly 15 FPS
const FRAME_INTERVAL: Duration = Duration::from_millis(68);

/// Local multiplayer on one terminal: every player shares the keyboard
pub struct HumanMode {
    game: Game,
    players: Vec<PlayerHandle>,
    metrics: GameMetrics,
    renderer: Renderer,
}

impl HumanMode {
    /// Join every name in order. A rejected name falls back to "Player N".
    pub async fn new(config: GameConfig, names: &[String]) -> Result<Self> {
        let game = Game::new(config);
        let mut players = Vec::new();

        for (index, name) in names.iter().enumerate() {
            let handle = match game.add_player(name).await {
                Ok(handle) => handle,
                Err(err @ (JoinError::EmptyName | JoinError::DuplicateName(_))) => {
                    let fallback = format!("Player {}", index + 1);
                    tracing::warn!(%err, %fallback, "name rejected, using fallback");
                    game.add_player(&fallback)
                        .await
                        .with_context(|| format!("Failed to add {fallback}"))?
                }
                Err(err) => return Err(anyhow::Error::new(err).context("Failed to add player")),
            };
            players.push(handle);
        }

        Ok(Self {
            game,
            players,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
        })
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn players(&self) -> &[PlayerHandle] {
        &self.players
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
        let keyboard = Keyboard::new();
        let mut sampler = InputSampler::new(self.game.clone());
        for (slot, player) in self.players.iter().enumerate() {
            if let Some(pad) = keyboard.pad(slot) {
                sampler.bind(player.clone(), pad);
            }
        }

        let simulation = {
            let game = self.game.clone();
            tokio::spawn(async move { game.start().await })
        };
        let sampling = tokio::spawn(sampler.run());
        let mut reading = tokio::spawn(keyboard.run(self.game.clone()));

        let mut render_timer = interval(FRAME_INTERVAL);
        render_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let result = loop {
            tokio::select! {
                _ = render_timer.tick() => {}

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.game.quit(true);
                }
            }

            if simulation.is_finished() || self.game.is_quit() {
                break Ok(());
            }

            if reading.is_finished() {
                // the keyboard stream is gone, so nobody can quit any more
                self.game.quit(true);
                break match (&mut reading).await {
                    Ok(Err(err)) => Err(err),
                    _ => Ok(()),
                };
            }

            let snapshot = self.game.snapshot().await;
            self.metrics.observe(&snapshot);
            if let Err(err) = terminal
                .draw(|frame| self.renderer.render(frame, &snapshot, &self.metrics))
                .context("Failed to draw frame")
            {
                self.game.quit(true);
                break Err(err);
            }
        };

        simulation.await.context("Simulation task failed")?;
        sampling.await.context("Input sampler task failed")?;
        // the reader may be parked on the next key press
        reading.abort();

        result
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
