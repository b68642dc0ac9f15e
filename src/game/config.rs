use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Colors handed out in join order; its length is the roster cap
pub const PALETTE: [PlayerColor; 4] = [
    PlayerColor::Yellow,
    PlayerColor::Magenta,
    PlayerColor::Cyan,
    PlayerColor::White,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerColor {
    Yellow,
    Magenta,
    Cyan,
    White,
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Screen rows, border included
    pub rows: usize,
    /// Screen columns, border included
    pub cols: usize,
    /// Grow on every move, no food
    pub tron: bool,
    /// Fixed RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,

    /// Cells kept clear between a spawn point and the wall
    pub spawn_margin: i32,
    /// Period of the survival score trickle
    pub passive_score_ms: u64,
    /// Period between food spawns
    pub food_interval_ms: u64,
    /// Minimum time between two accepted resets
    pub reset_debounce_ms: u64,
    /// Pause after a reset before the round starts moving
    pub reset_grace_ms: u64,

    // Pacing: interval = max(min_interval_ms, base_interval_ms - len + 1)
    pub base_interval_ms: u64,
    pub min_interval_ms: u64,
    /// Multiplier applied while heading up or down
    pub vertical_pacing: f64,
    /// Bystanders receive dying score / this
    pub survivor_bonus_divisor: u32,

    /// Sleep between simulation loop iterations
    pub loop_poll_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            cols: 80,
            tron: false,
            seed: None,
            spawn_margin: 3,
            passive_score_ms: 1000,
            food_interval_ms: 2000,
            reset_debounce_ms: 1000,
            reset_grace_ms: 2500,
            base_interval_ms: 150,
            min_interval_ms: 100,
            vertical_pacing: 1.25,
            survivor_bonus_divisor: 2,
            loop_poll_ms: 5,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom screen size
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            ..Default::default()
        }
    }

    /// Create a small board for testing
    pub fn small() -> Self {
        Self::new(12, 12)
    }

    pub fn with_tron(mut self, tron: bool) -> Self {
        self.tron = tron;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load a configuration from a JSON file; missing fields keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config from {:?}", path))?;
        Ok(config)
    }

    pub fn max_players(&self) -> usize {
        PALETTE.len()
    }

    pub fn passive_score_interval(&self) -> Duration {
        Duration::from_millis(self.passive_score_ms)
    }

    pub fn food_interval(&self) -> Duration {
        Duration::from_millis(self.food_interval_ms)
    }

    pub fn reset_debounce(&self) -> Duration {
        Duration::from_millis(self.reset_debounce_ms)
    }

    pub fn reset_grace(&self) -> Duration {
        Duration::from_millis(self.reset_grace_ms)
    }

    pub fn loop_poll(&self) -> Duration {
        Duration::from_millis(self.loop_poll_ms)
    }

    /// Time a snake of `len` segments waits between moves
    pub fn move_interval(&self, len: usize, vertical: bool) -> Duration {
        let shrunk = (self.base_interval_ms + 1).saturating_sub(len as u64);
        let base = shrunk.max(self.min_interval_ms);
        let millis = if vertical {
            (base as f64 * self.vertical_pacing) as u64
        } else {
            base
        };
        Duration::from_millis(millis)
    }

    /// Validate configuration parameters
    ///
    /// The board must leave room for a spawn area once the border and the
    /// spawn margin are taken off every side.
    pub fn validate(&self) -> Result<(), String> {
        if i32::try_from(self.rows).is_err() || i32::try_from(self.cols).is_err() {
            return Err(format!(
                "board {}x{} does not fit i32 coordinates",
                self.rows, self.cols
            ));
        }

        let min_side = 2 * (self.spawn_margin.max(0) as usize + 1) + 1;
        if self.rows < min_side || self.cols < min_side {
            return Err(format!(
                "board must be at least {min_side}x{min_side}, got {}x{}",
                self.rows, self.cols
            ));
        }

        if self.spawn_margin < 0 {
            return Err(format!(
                "spawn_margin must be non-negative, got {}",
                self.spawn_margin
            ));
        }

        if self.min_interval_ms == 0 {
            return Err("min_interval_ms must be at least 1".to_string());
        }

        if !(self.vertical_pacing.is_finite() && self.vertical_pacing > 0.0) {
            return Err(format!(
                "vertical_pacing must be positive, got {}",
                self.vertical_pacing
            ));
        }

        if self.survivor_bonus_divisor == 0 {
            return Err("survivor_bonus_divisor must be at least 1".to_string());
        }

        if self.loop_poll_ms == 0 {
            return Err("loop_poll_ms must be at least 1".to_string());
        }

        Ok(())
    }
}
