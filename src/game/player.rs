//! A single participant: one snake, its steering, its score and its pacing.
//!
//! The roster owns every [`Player`] and only touches it under the world write
//! lock. Steering is the exception. Input samplers write it through a
//! [`PlayerHandle`] at any time, so it sits behind its own mutex that the
//! simulation also takes while it reads and commits a direction.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::time::Instant;

use super::action::Direction;
use super::config::{GameConfig, PlayerColor};
use super::state::{Board, CollisionType, PlayerId, Snake};
use super::vector::Vector2;

/// The direction pair raced between input and simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Steering {
    /// Direction the next move will take
    committed: Direction,
    /// Direction of the last completed move
    previous: Direction,
    /// Snake length as of the last commit
    snake_len: usize,
}

impl Steering {
    fn new(direction: Direction) -> Self {
        Self {
            committed: direction,
            previous: direction,
            snake_len: 1,
        }
    }

    fn request(&mut self, direction: Option<Direction>) -> bool {
        let Some(direction) = direction else {
            return false;
        };

        // snakes of length one can move in any direction
        if self.snake_len > 1 && self.previous.is_opposite(direction) {
            return false;
        }

        self.committed = direction;
        true
    }
}

fn lock(steering: &Mutex<Steering>) -> MutexGuard<'_, Steering> {
    steering.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Outcome of one call to [`Player::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Already dead, nothing happened
    Dead,
    /// Own move interval has not elapsed yet
    Waiting,
    /// Moved one cell and ate `eaten` food cells
    Moved { eaten: usize },
    /// Died this step holding `score`
    Died { cause: CollisionType, score: u32 },
}

/// Cloneable steering handle given to whoever samples this player's input
#[derive(Debug, Clone)]
pub struct PlayerHandle {
    id: PlayerId,
    name: String,
    color: PlayerColor,
    steering: Arc<Mutex<Steering>>,
}

impl PlayerHandle {
    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> PlayerColor {
        self.color
    }

    /// Request a new heading; see [`Player::set_direction`]
    pub fn set_direction(&self, direction: Option<Direction>) -> bool {
        lock(&self.steering).request(direction)
    }
}

#[derive(Debug)]
pub struct Player {
    id: PlayerId,
    name: String,
    color: PlayerColor,
    snake: Snake,
    alive: bool,
    score: u32,
    steering: Arc<Mutex<Steering>>,
    last_advance: Option<Instant>,
    last_passive_score: Option<Instant>,
}

impl Player {
    /// Create a living one-segment player and register its head on the board
    pub fn new(
        id: PlayerId,
        name: impl Into<String>,
        color: PlayerColor,
        head: Vector2,
        direction: Direction,
        board: &mut Board,
    ) -> Self {
        let mut player = Self {
            id,
            name: name.into(),
            color,
            snake: Snake::new(head),
            alive: true,
            score: 0,
            steering: Arc::new(Mutex::new(Steering::new(direction))),
            last_advance: None,
            last_passive_score: None,
        };
        player.respawn(head, direction, board);
        player
    }

    /// Put the player back to its starting state at `head`
    pub fn respawn(&mut self, head: Vector2, direction: Direction, board: &mut Board) {
        self.snake = Snake::new(head);
        *lock(&self.steering) = Steering::new(direction);
        self.score = 0;
        self.alive = true;
        self.last_advance = None;
        self.last_passive_score = None;
        board.claim(self.snake.segments(), self.id);
    }

    pub fn handle(&self) -> PlayerHandle {
        PlayerHandle {
            id: self.id,
            name: self.name.clone(),
            color: self.color,
            steering: Arc::clone(&self.steering),
        }
    }

    /// Request a new heading. Ignored when `direction` is `None`, and when a
    /// snake longer than one segment would reverse onto its last move.
    /// Returns whether the heading was taken.
    pub fn set_direction(&self, direction: Option<Direction>) -> bool {
        lock(&self.steering).request(direction)
    }

    pub fn direction(&self) -> Direction {
        lock(&self.steering).committed
    }

    /// Run one simulation step for this player
    pub fn advance(&mut self, board: &mut Board, config: &GameConfig, now: Instant) -> Advance {
        if !self.alive {
            return Advance::Dead;
        }

        self.passive_score(config, now);

        let mut steering = lock(&self.steering);

        let interval = config.move_interval(self.snake.len(), steering.committed.is_vertical());
        if let Some(last) = self.last_advance {
            if now.saturating_duration_since(last) < interval {
                return Advance::Waiting;
            }
        }
        self.last_advance = Some(now);

        let next_head = self.snake.head().add(steering.committed.delta());

        if !board.boundaries.contains(next_head) {
            drop(steering);
            return self.die(board, CollisionType::Wall);
        }

        if let Some(occupant) = board.occupant(next_head) {
            drop(steering);
            let cause = if occupant == self.id {
                CollisionType::SelfCollision
            } else {
                CollisionType::Player(occupant)
            };
            return self.die(board, cause);
        }

        board.release(self.snake.segments(), self.id);
        self.snake.advance(steering.committed.delta());
        steering.previous = steering.committed;
        steering.snake_len = self.snake.len();
        board.claim(self.snake.segments(), self.id);
        drop(steering);

        if config.tron {
            self.snake.grow_on_next_move();
            return Advance::Moved { eaten: 0 };
        }

        let mut eaten = 0;
        let len = self.snake.len() as u32;
        for segment in self.snake.segments() {
            if board.food.remove(segment) {
                self.score = self.score.saturating_add(len * 2);
                eaten += 1;
            }
        }
        for _ in 0..eaten {
            self.snake.grow_on_next_move();
        }

        Advance::Moved { eaten }
    }

    fn passive_score(&mut self, config: &GameConfig, now: Instant) {
        if let Some(last) = self.last_passive_score {
            if now.saturating_duration_since(last) < config.passive_score_interval() {
                return;
            }
        }
        self.last_passive_score = Some(now);
        let trickle = (self.snake.len() / 8).max(1) as u32;
        self.score = self.score.saturating_add(trickle);
    }

    fn die(&mut self, board: &mut Board, cause: CollisionType) -> Advance {
        self.alive = false;
        board.release(self.snake.segments(), self.id);
        tracing::debug!(player = %self.name, ?cause, score = self.score, "player died");
        Advance::Died {
            cause,
            score: self.score,
        }
    }

    /// Credit points from a score transfer or a survivor bonus
    pub fn award(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> PlayerColor {
        self.color
    }

    pub fn alive(&self) -> bool {
        self.alive
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn head(&self) -> Vector2 {
        self.snake.head()
    }

    pub fn segments(&self) -> &[Vector2] {
        self.snake.segments()
    }

    pub fn len(&self) -> usize {
        self.snake.len()
    }

    /// Scoreboard line: name padded to 10, score right-aligned in 10
    pub fn score_description(&self) -> String {
        format!("{:<10} {:>10}", self.name, self.score)
    }

    #[cfg(test)]
    pub(crate) fn snake_mut(&mut self) -> &mut Snake {
        &mut self.snake
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::boundaries::Boundaries;
    use std::time::Duration;

    fn board() -> Board {
        Board::new(Boundaries::new(1, 11, 1, 11))
    }

    fn player_at(board: &mut Board, head: Vector2, direction: Direction) -> Player {
        Player::new(
            PlayerId(0),
            "Alice",
            PlayerColor::Yellow,
            head,
            direction,
            board,
        )
    }

    #[test]
    fn test_new_player_claims_head() {
        let mut board = board();
        let player = player_at(&mut board, Vector2::new(5, 5), Direction::Right);

        assert!(player.alive());
        assert_eq!(player.score(), 0);
        assert_eq!(board.occupant(Vector2::new(5, 5)), Some(PlayerId(0)));
    }

    #[test]
    fn test_single_segment_may_reverse() {
        let mut board = board();
        let player = player_at(&mut board, Vector2::new(5, 5), Direction::Right);

        assert!(player.set_direction(Some(Direction::Left)));
        assert_eq!(player.direction(), Direction::Left);
        assert!(!player.set_direction(None));
        assert_eq!(player.direction(), Direction::Left);
    }

    #[test]
    fn test_longer_snake_cannot_reverse_last_move() {
        let config = GameConfig::default();
        let mut board = board();
        let mut player = player_at(&mut board, Vector2::new(5, 5), Direction::Right);
        player.snake_mut().grow_on_next_move();

        let now = Instant::now();
        assert_eq!(
            player.advance(&mut board, &config, now),
            Advance::Moved { eaten: 0 }
        );
        assert_eq!(player.len(), 2);

        let handle = player.handle();
        assert!(!handle.set_direction(Some(Direction::Left)));
        assert_eq!(player.direction(), Direction::Right);

        // a perpendicular turn is fine, but reversing it again is judged
        // against the last completed move, which is still Right
        assert!(handle.set_direction(Some(Direction::Up)));
        assert!(!handle.set_direction(Some(Direction::Left)));
        assert!(handle.set_direction(Some(Direction::Down)));
        assert_eq!(player.direction(), Direction::Down);
    }

    #[test]
    fn test_advance_is_paced() {
        let config = GameConfig::default();
        let mut board = board();
        let mut player = player_at(&mut board, Vector2::new(5, 5), Direction::Right);
        let start = Instant::now();

        assert!(matches!(
            player.advance(&mut board, &config, start),
            Advance::Moved { .. }
        ));
        assert_eq!(
            player.advance(&mut board, &config, start + Duration::from_millis(149)),
            Advance::Waiting
        );
        assert!(matches!(
            player.advance(&mut board, &config, start + Duration::from_millis(150)),
            Advance::Moved { .. }
        ));
        assert_eq!(player.head(), Vector2::new(7, 5));
    }

    #[test]
    fn test_vertical_moves_are_slower() {
        let config = GameConfig::default();
        let mut board = board();
        let mut player = player_at(&mut board, Vector2::new(5, 8), Direction::Up);
        let start = Instant::now();

        player.advance(&mut board, &config, start);
        assert_eq!(
            player.advance(&mut board, &config, start + Duration::from_millis(186)),
            Advance::Waiting
        );
        assert!(matches!(
            player.advance(&mut board, &config, start + Duration::from_millis(187)),
            Advance::Moved { .. }
        ));
        assert_eq!(player.head(), Vector2::new(5, 6));
    }

    #[test]
    fn test_passive_score_trickle() {
        let config = GameConfig::default();
        let mut board = board();
        let mut player = player_at(&mut board, Vector2::new(5, 5), Direction::Right);
        let start = Instant::now();

        player.advance(&mut board, &config, start);
        assert_eq!(player.score(), 1);

        player.advance(&mut board, &config, start + Duration::from_millis(500));
        assert_eq!(player.score(), 1);

        player.advance(&mut board, &config, start + Duration::from_millis(1000));
        assert_eq!(player.score(), 2);
    }

    #[test]
    fn test_passive_score_scales_with_length() {
        let config = GameConfig::default();
        let mut board = Board::new(Boundaries::new(0, 40, 0, 5));
        let mut player = player_at(&mut board, Vector2::new(1, 1), Direction::Right);
        for _ in 0..16 {
            player.snake_mut().grow_on_next_move();
        }

        let mut now = Instant::now();
        for _ in 0..16 {
            player.advance(&mut board, &config, now);
            now += Duration::from_millis(150);
        }
        assert_eq!(player.len(), 17);

        let before = player.score();
        player.advance(&mut board, &config, now + Duration::from_millis(1000));
        assert_eq!(player.score() - before, 2);
    }

    #[test]
    fn test_wall_collision() {
        let config = GameConfig::default();
        let mut board = board();
        let mut player = player_at(&mut board, Vector2::new(1, 5), Direction::Left);

        let result = player.advance(&mut board, &config, Instant::now());

        assert_eq!(
            result,
            Advance::Died {
                cause: CollisionType::Wall,
                score: 1
            }
        );
        assert!(!player.alive());
        assert!(board.occupancy.is_empty());
        assert_eq!(
            player.advance(&mut board, &config, Instant::now()),
            Advance::Dead
        );
    }

    #[test]
    fn test_self_collision() {
        let config = GameConfig::default();
        let mut board = board();
        let mut player = player_at(&mut board, Vector2::new(5, 5), Direction::Right);
        for _ in 0..4 {
            player.snake_mut().grow_on_next_move();
        }

        let mut now = Instant::now();
        let mut step = |player: &mut Player, board: &mut Board, dir: Direction| {
            assert!(player.set_direction(Some(dir)));
            let result = player.advance(board, &config, now);
            now += Duration::from_millis(200);
            result
        };

        step(&mut player, &mut board, Direction::Right);
        step(&mut player, &mut board, Direction::Right);
        step(&mut player, &mut board, Direction::Down);
        step(&mut player, &mut board, Direction::Left);
        let result = step(&mut player, &mut board, Direction::Up);

        assert!(matches!(
            result,
            Advance::Died {
                cause: CollisionType::SelfCollision,
                ..
            }
        ));
    }

    #[test]
    fn test_hitting_another_snake_names_it() {
        let config = GameConfig::default();
        let mut board = board();
        let mut alice = player_at(&mut board, Vector2::new(5, 5), Direction::Right);
        let _bob = Player::new(
            PlayerId(1),
            "Bob",
            PlayerColor::Magenta,
            Vector2::new(6, 5),
            Direction::Down,
            &mut board,
        );

        let result = alice.advance(&mut board, &config, Instant::now());

        assert_eq!(
            result,
            Advance::Died {
                cause: CollisionType::Player(PlayerId(1)),
                score: 1
            }
        );
        assert_eq!(board.occupant(Vector2::new(6, 5)), Some(PlayerId(1)));
        assert!(!board.is_occupied(Vector2::new(5, 5)));
    }

    #[test]
    fn test_eating_food_scores_and_grows() {
        let config = GameConfig::default();
        let mut board = board();
        let mut player = player_at(&mut board, Vector2::new(5, 5), Direction::Right);
        board.food.insert(Vector2::new(6, 5));
        let start = Instant::now();

        let result = player.advance(&mut board, &config, start);

        assert_eq!(result, Advance::Moved { eaten: 1 });
        // one passive point plus len * 2
        assert_eq!(player.score(), 3);
        assert!(board.food.is_empty());
        assert_eq!(player.len(), 1);

        player.advance(&mut board, &config, start + Duration::from_millis(150));
        assert_eq!(player.len(), 2);
    }

    #[test]
    fn test_tron_grows_every_move_and_ignores_food() {
        let config = GameConfig::default().with_tron(true);
        let mut board = board();
        let mut player = player_at(&mut board, Vector2::new(2, 2), Direction::Right);
        board.food.insert(Vector2::new(3, 2));

        let mut now = Instant::now();
        for _ in 0..4 {
            player.advance(&mut board, &config, now);
            now += Duration::from_millis(200);
        }

        assert_eq!(player.len(), 4);
        assert!(board.food.contains(&Vector2::new(3, 2)));
    }

    #[test]
    fn test_occupancy_tracks_segments() {
        let config = GameConfig::default();
        let mut board = board();
        let mut player = player_at(&mut board, Vector2::new(2, 2), Direction::Right);
        player.snake_mut().grow_on_next_move();
        player.snake_mut().grow_on_next_move();

        let mut now = Instant::now();
        for _ in 0..5 {
            player.advance(&mut board, &config, now);
            now += Duration::from_millis(200);
        }

        let mut cells: Vec<_> = board.occupancy.keys().copied().collect();
        cells.sort_by_key(|cell| (cell.x, cell.y));
        let mut segments = player.segments().to_vec();
        segments.sort_by_key(|cell| (cell.x, cell.y));
        assert_eq!(cells, segments);
    }

    #[test]
    fn test_respawn_restores_start_state() {
        let config = GameConfig::default();
        let mut board = board();
        let mut player = player_at(&mut board, Vector2::new(1, 5), Direction::Left);
        player.advance(&mut board, &config, Instant::now());
        assert!(!player.alive());

        player.respawn(Vector2::new(4, 4), Direction::Down, &mut board);

        assert!(player.alive());
        assert_eq!(player.score(), 0);
        assert_eq!(player.segments(), &[Vector2::new(4, 4)]);
        assert_eq!(player.direction(), Direction::Down);
        assert_eq!(board.occupant(Vector2::new(4, 4)), Some(PlayerId(0)));
    }

    #[test]
    fn test_score_description() {
        let mut board = board();
        let mut player = player_at(&mut board, Vector2::new(5, 5), Direction::Right);
        player.award(42);
        assert_eq!(player.score_description(), "Alice              42");
    }
}
