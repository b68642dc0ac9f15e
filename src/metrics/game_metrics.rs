use std::time::{Duration, Instant};

use crate::game::WorldSnapshot;

/// Session statistics shown in the header: round clock, rounds, best score
pub struct GameMetrics {
    pub round_start: Instant,
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub rounds_played: u32,
    round: u64,
    round_over: bool,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            round_start: Instant::now(),
            elapsed_time: Duration::ZERO,
            high_score: 0,
            rounds_played: 0,
            round: 0,
            round_over: false,
        }
    }

    /// Fold one rendered frame into the statistics
    pub fn observe(&mut self, snapshot: &WorldSnapshot) {
        if snapshot.round != self.round {
            self.round = snapshot.round;
            self.on_round_start();
        }

        if let Some(best) = snapshot.players.iter().map(|player| player.score).max() {
            self.high_score = self.high_score.max(best);
        }

        if snapshot.game_over && !self.round_over {
            self.round_over = true;
            self.rounds_played += 1;
        }

        // the clock stops while the round-over screen is up
        if !self.round_over {
            self.elapsed_time = self.round_start.elapsed();
        }
    }

    pub fn on_round_start(&mut self) {
        self.round_start = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.round_over = false;
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
