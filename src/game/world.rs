//! The world aggregate: roster, board and lifecycle bookkeeping.
//!
//! `World` holds no locks of its own. [`crate::game::Game`] keeps it behind
//! the world lock and decides which mode each call runs under.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::time::Instant;

use super::action::Direction;
use super::boundaries::Boundaries;
use super::config::{GameConfig, PALETTE, PlayerColor};
use super::error::JoinError;
use super::player::{Advance, Player, PlayerHandle};
use super::spawn::{random_cell, random_free_cell};
use super::state::{Board, CollisionType, PlayerId};
use super::vector::Vector2;

/// Read-only copy of one player for drawing
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub color: PlayerColor,
    pub alive: bool,
    pub score: u32,
    /// Head first
    pub segments: Vec<Vector2>,
}

impl PlayerView {
    fn of(player: &Player) -> Self {
        Self {
            id: player.id(),
            name: player.name().to_string(),
            color: player.color(),
            alive: player.alive(),
            score: player.score(),
            segments: player.segments().to_vec(),
        }
    }
}

/// Everything the renderer needs from one read of the world
#[derive(Debug, Clone, PartialEq)]
pub struct WorldSnapshot {
    pub boundaries: Boundaries,
    /// Join order
    pub players: Vec<PlayerView>,
    pub food: Vec<Vector2>,
    pub game_over: bool,
    pub round: u64,
}

impl WorldSnapshot {
    /// Players by score descending, ties kept in join order
    pub fn standings(&self) -> Vec<PlayerView> {
        let mut standings = self.players.clone();
        standings.sort_by(|a, b| b.score.cmp(&a.score).then(a.id.cmp(&b.id)));
        standings
    }
}

/// A death resolved during one simulation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Death {
    pub player: PlayerId,
    pub cause: CollisionType,
    /// Score held at the moment of death
    pub score: u32,
}

/// What happened during one simulation step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepSummary {
    pub food_spawned: Option<Vector2>,
    pub moved: usize,
    pub deaths: Vec<Death>,
}

pub struct World {
    config: GameConfig,
    board: Board,
    players: Vec<Player>,
    rng: StdRng,
    just_reset: bool,
    last_reset: Option<Instant>,
    last_food_spawn: Option<Instant>,
    round: u64,
}

impl World {
    pub fn new(config: GameConfig) -> Self {
        let boundaries = Boundaries::for_screen(config.rows, config.cols);
        let rng = config
            .seed
            .map(StdRng::seed_from_u64)
            .unwrap_or_else(StdRng::from_entropy);

        Self {
            config,
            board: Board::new(boundaries),
            players: Vec::new(),
            rng,
            just_reset: false,
            last_reset: None,
            last_food_spawn: None,
            round: 0,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn boundaries(&self) -> Boundaries {
        self.board.boundaries
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.0)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn alive_count(&self) -> usize {
        self.players.iter().filter(|player| player.alive()).count()
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    /// Join a new player; the name is trimmed and compared case-insensitively
    pub fn add_player(&mut self, name: &str) -> Result<PlayerHandle, JoinError> {
        let max = self.config.max_players();
        if self.players.len() >= max {
            return Err(JoinError::RosterFull(max));
        }

        let name = name.trim();
        if name.is_empty() {
            return Err(JoinError::EmptyName);
        }

        if self.spawn_area().is_empty() {
            return Err(JoinError::NoSpawnRoom);
        }

        let lowered = name.to_lowercase();
        if self
            .players
            .iter()
            .any(|player| player.name().to_lowercase() == lowered)
        {
            return Err(JoinError::DuplicateName(name.to_string()));
        }

        let id = PlayerId(self.players.len());
        let color = PALETTE[id.0];
        let (head, direction) = self.spawn_point();
        let player = Player::new(id, name, color, head, direction, &mut self.board);
        let handle = player.handle();
        self.players.push(player);

        tracing::info!(player = %name, ?color, ?head, ?direction, "player joined");
        Ok(handle)
    }

    fn spawn_area(&self) -> Boundaries {
        self.board.boundaries.inset(self.config.spawn_margin)
    }

    fn spawn_point(&mut self) -> (Vector2, Direction) {
        let area = self.spawn_area();
        let head = random_free_cell(&mut self.rng, &area, &self.board);
        (head, Direction::random(&mut self.rng))
    }

    /// Single-player rounds continue while the player lives; multiplayer
    /// rounds end once at most one player is left. An empty roster never ends.
    pub fn is_game_over(&self) -> bool {
        let total = self.players.len();
        let alive = self.alive_count();
        match (alive, total) {
            (_, 0) => false,
            (1, 1) => false,
            (0, _) | (1, _) => true,
            _ => false,
        }
    }

    /// Drop one food cell anywhere on the board every food interval
    pub fn food_update(&mut self, now: Instant) -> Option<Vector2> {
        if self.config.tron || self.board.boundaries.is_empty() {
            return None;
        }
        if let Some(last) = self.last_food_spawn {
            if now.saturating_duration_since(last) < self.config.food_interval() {
                return None;
            }
        }
        self.last_food_spawn = Some(now);

        let cell = random_cell(&mut self.rng, &self.board.boundaries);
        self.board.food.insert(cell);
        tracing::debug!(?cell, food = self.board.food.len(), "food spawned");
        Some(cell)
    }

    /// Spawn food and advance every player, resolving deaths as they happen
    pub fn step(&mut self, now: Instant) -> StepSummary {
        let mut summary = StepSummary {
            food_spawned: self.food_update(now),
            ..Default::default()
        };

        for index in 0..self.players.len() {
            let outcome = self.players[index].advance(&mut self.board, &self.config, now);
            match outcome {
                Advance::Moved { .. } => summary.moved += 1,
                Advance::Died { cause, score } => {
                    let death = Death {
                        player: PlayerId(index),
                        cause,
                        score,
                    };
                    self.resolve_death(death);
                    summary.deaths.push(death);
                }
                Advance::Dead | Advance::Waiting => {}
            }
        }

        summary
    }

    /// Hand the dying score to whoever was hit, then pay the survivor bonus
    /// to every living bystander
    fn resolve_death(&mut self, death: Death) {
        let hit = match death.cause {
            CollisionType::Player(other) if other != death.player => Some(other),
            _ => None,
        };

        if let Some(other) = hit {
            if let Some(player) = self.players.get_mut(other.0) {
                if player.alive() {
                    player.award(death.score);
                    tracing::debug!(
                        from = death.player.0,
                        to = other.0,
                        points = death.score,
                        "score transferred"
                    );
                }
            }
        }

        let bonus = death.score / self.config.survivor_bonus_divisor;
        for player in &mut self.players {
            if player.id() == death.player || Some(player.id()) == hit || !player.alive() {
                continue;
            }
            player.award(bonus);
        }
    }

    /// Start a new round if `requested`. Rejected while the previous reset
    /// has not been picked up by the loop, or inside the debounce window.
    pub fn reset(&mut self, requested: bool, now: Instant) -> bool {
        if !requested {
            return false;
        }
        if self.just_reset {
            tracing::debug!("reset rejected: previous reset still pending");
            return false;
        }
        if let Some(last) = self.last_reset {
            if now.saturating_duration_since(last) < self.config.reset_debounce() {
                tracing::debug!("reset rejected: debounce");
                return false;
            }
        }

        self.last_reset = Some(now);
        self.just_reset = true;
        self.round += 1;
        self.board.clear();

        for index in 0..self.players.len() {
            let (head, direction) = self.spawn_point();
            self.players[index].respawn(head, direction, &mut self.board);
        }

        tracing::info!(round = self.round, players = self.players.len(), "round reset");
        true
    }

    /// Consume the pending reset marker; true if there was one
    pub fn take_reset(&mut self) -> bool {
        std::mem::take(&mut self.just_reset)
    }

    pub fn reset_pending(&self) -> bool {
        self.just_reset
    }

    pub fn for_each_player<F: FnMut(&Player)>(&self, f: F) {
        self.players.iter().for_each(f);
    }

    pub fn for_each_food<F: FnMut(Vector2)>(&self, f: F) {
        self.board.food.iter().copied().for_each(f);
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            boundaries: self.board.boundaries,
            players: self.players.iter().map(PlayerView::of).collect(),
            food: self.board.food.iter().copied().collect(),
            game_over: self.is_game_over(),
            round: self.round,
        }
    }

    #[cfg(test)]
    pub(crate) fn parts_mut(&mut self) -> (&mut Vec<Player>, &mut Board) {
        (&mut self.players, &mut self.board)
    }
}
