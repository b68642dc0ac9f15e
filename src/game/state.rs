use std::collections::{HashMap, HashSet};

use super::boundaries::Boundaries;
use super::vector::Vector2;

/// Index of a player in the roster; join order never changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub usize);

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    body: Vec<Vector2>,
    /// Moves left that keep their tail instead of dropping it
    pending_growth: usize,
}

impl Snake {
    /// A fresh one-segment snake
    pub fn new(head: Vector2) -> Self {
        Self {
            body: vec![head],
            pending_growth: 0,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Vector2 {
        self.body[0]
    }

    pub fn segments(&self) -> &[Vector2] {
        &self.body
    }

    /// Shift every segment one slot toward the head and place the new head
    /// at `head + direction`. The old tail survives only while growth is pending.
    pub fn advance(&mut self, direction: Vector2) {
        let tail = self.body[self.body.len() - 1];
        let head = self.head();

        for i in (1..self.body.len()).rev() {
            self.body[i] = self.body[i - 1];
        }
        self.body[0] = head.add(direction);

        if self.pending_growth > 0 {
            self.body.push(tail);
            self.pending_growth -= 1;
        }
    }

    /// Defer one segment of growth to the next move; calls stack
    pub fn grow_on_next_move(&mut self) {
        self.pending_growth += 1;
    }

    pub fn pending_growth(&self) -> usize {
        self.pending_growth
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// A snake always has a head, so this only exists to pair with `len`
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// What a dying snake ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// Snake hit another player's body
    Player(PlayerId),
}

/// State shared by every player on the field: the collision map and the food
#[derive(Debug, Clone)]
pub struct Board {
    pub boundaries: Boundaries,
    /// Every occupied cell mapped to the player whose snake covers it
    pub occupancy: HashMap<Vector2, PlayerId>,
    pub food: HashSet<Vector2>,
}

impl Board {
    pub fn new(boundaries: Boundaries) -> Self {
        Self {
            boundaries,
            occupancy: HashMap::new(),
            food: HashSet::new(),
        }
    }

    pub fn occupant(&self, pos: Vector2) -> Option<PlayerId> {
        self.occupancy.get(&pos).copied()
    }

    pub fn is_occupied(&self, pos: Vector2) -> bool {
        self.occupancy.contains_key(&pos)
    }

    pub fn claim(&mut self, segments: &[Vector2], owner: PlayerId) {
        for segment in segments {
            self.occupancy.insert(*segment, owner);
        }
    }

    /// Drop the given cells, but only where `owner` still holds them
    pub fn release(&mut self, segments: &[Vector2], owner: PlayerId) {
        for segment in segments {
            if self.occupancy.get(segment) == Some(&owner) {
                self.occupancy.remove(segment);
            }
        }
    }

    pub fn clear(&mut self) {
        self.occupancy.clear();
        self.food.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Vector2::new(5, 5));
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), Vector2::new(5, 5));
        assert_eq!(snake.pending_growth(), 0);
    }

    #[test]
    fn test_snake_movement() {
        let mut snake = Snake::new(Vector2::new(5, 5));

        snake.advance(Vector2::new(1, 0));
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), Vector2::new(6, 5));

        snake.grow_on_next_move();
        snake.advance(Vector2::new(1, 0));
        assert_eq!(snake.len(), 2);
        assert_eq!(snake.head(), Vector2::new(7, 5));
        // tail kept from the position before the growing move
        assert_eq!(snake.segments()[1], Vector2::new(6, 5));
    }

    #[test]
    fn test_growth_stacks_one_per_move() {
        let mut snake = Snake::new(Vector2::new(0, 0));
        for _ in 0..3 {
            snake.grow_on_next_move();
        }

        for expected in 2..=4 {
            snake.advance(Vector2::new(1, 0));
            assert_eq!(snake.len(), expected);
        }

        // growth exhausted
        snake.advance(Vector2::new(1, 0));
        snake.advance(Vector2::new(0, 1));
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.pending_growth(), 0);
    }

    #[test]
    fn test_segments_follow_the_head() {
        let mut snake = Snake::new(Vector2::new(5, 5));
        snake.grow_on_next_move();
        snake.grow_on_next_move();
        snake.advance(Vector2::new(1, 0));
        snake.advance(Vector2::new(1, 0));
        snake.advance(Vector2::new(0, 1));

        assert_eq!(
            snake.segments(),
            &[Vector2::new(7, 6), Vector2::new(7, 5), Vector2::new(6, 5)]
        );
    }

    #[test]
    fn test_board_release_only_own_cells() {
        let mut board = Board::new(Boundaries::new(0, 10, 0, 10));
        let cells = [Vector2::new(1, 1), Vector2::new(2, 1)];
        board.claim(&cells, PlayerId(0));
        board.claim(&[Vector2::new(2, 1)], PlayerId(1));

        board.release(&cells, PlayerId(0));

        assert!(!board.is_occupied(Vector2::new(1, 1)));
        assert_eq!(board.occupant(Vector2::new(2, 1)), Some(PlayerId(1)));
    }
}
