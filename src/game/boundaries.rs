use serde::{Deserialize, Serialize};

use super::vector::Vector2;

/// Half-open rectangle: min inclusive, max exclusive on both axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boundaries {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl Boundaries {
    pub fn new(min_x: i32, max_x: i32, min_y: i32, max_y: i32) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Playable interior of a `rows x cols` screen with a one-cell border.
    /// Sides past `i32::MAX` saturate.
    pub fn for_screen(rows: usize, cols: usize) -> Self {
        let side = |len: usize| i32::try_from(len).unwrap_or(i32::MAX) - 1;
        Self::new(1, side(cols), 1, side(rows))
    }

    pub fn contains(&self, pos: Vector2) -> bool {
        self.min_x <= pos.x && pos.x < self.max_x && self.min_y <= pos.y && pos.y < self.max_y
    }

    /// Shrink by `margin` cells on every side
    pub fn inset(&self, margin: i32) -> Self {
        Self::new(
            self.min_x + margin,
            self.max_x - margin,
            self.min_y + margin,
            self.max_y - margin,
        )
    }

    pub fn width(&self) -> i32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }
}
