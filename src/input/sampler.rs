use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};

use crate::game::{Direction, Game, PlayerHandle};

/// One player's controller as seen by the sampler
pub trait InputSource: Send {
    /// Heading requested since the last poll, if any
    fn poll_direction(&mut self) -> Option<Direction>;
    fn poll_reset_requested(&mut self) -> bool;
    fn poll_quit_requested(&mut self) -> bool;
}

/// Polls every bound controller and forwards what it reads to the game
pub struct InputSampler {
    game: Game,
    bindings: Vec<(PlayerHandle, Box<dyn InputSource>)>,
    period: Duration,
}

impl InputSampler {
    pub const DEFAULT_PERIOD: Duration = Duration::from_millis(2);

    pub fn new(game: Game) -> Self {
        Self {
            game,
            bindings: Vec::new(),
            period: Self::DEFAULT_PERIOD,
        }
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn bind(&mut self, player: PlayerHandle, source: impl InputSource + 'static) {
        self.bindings.push((player, Box::new(source)));
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Read each controller once
    pub async fn sample_once(&mut self) {
        for (player, source) in &mut self.bindings {
            player.set_direction(source.poll_direction());
            if self.game.reset(source.poll_reset_requested()).await {
                tracing::debug!(player = player.name(), "reset accepted from input");
            }
            self.game.quit(source.poll_quit_requested());
        }
    }

    /// Sample until the game quits
    pub async fn run(mut self) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        while !self.game.is_quit() {
            self.sample_once().await;
            ticker.tick().await;
        }
    }
}
