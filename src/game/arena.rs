//! Shared game handle and the simulation loop.
//!
//! Every world access goes through one `RwLock`. Render and the loop's checks
//! read. The per-iteration batch (food plus every player's advance) runs under
//! a single write guard, so all players in one iteration see the same board.
//! Quit is a latched flag with a `Notify` to cut the post-reset grace short.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Notify, RwLock};
use tokio::time::{Instant, MissedTickBehavior, interval, sleep};

use super::boundaries::Boundaries;
use super::config::GameConfig;
use super::error::JoinError;
use super::player::{Player, PlayerHandle};
use super::vector::Vector2;
use super::world::{PlayerView, World, WorldSnapshot};

struct Shared {
    world: RwLock<World>,
    quit: AtomicBool,
    wake: Notify,
    boundaries: Boundaries,
    config: GameConfig,
}

/// Cheaply cloneable handle to one running game
#[derive(Clone)]
pub struct Game {
    shared: Arc<Shared>,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let world = World::new(config.clone());
        let boundaries = world.boundaries();
        Self {
            shared: Arc::new(Shared {
                world: RwLock::new(world),
                quit: AtomicBool::new(false),
                wake: Notify::new(),
                boundaries,
                config,
            }),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.shared.config
    }

    /// Fixed for the lifetime of the game
    pub fn boundaries(&self) -> Boundaries {
        self.shared.boundaries
    }

    pub async fn add_player(&self, name: &str) -> Result<PlayerHandle, JoinError> {
        self.shared.world.write().await.add_player(name)
    }

    pub async fn player_count(&self) -> usize {
        self.shared.world.read().await.player_count()
    }

    pub async fn is_game_over(&self) -> bool {
        self.shared.world.read().await.is_game_over()
    }

    /// Request a new round. Only takes the write lock when `requested`.
    pub async fn reset(&self, requested: bool) -> bool {
        if !requested {
            return false;
        }
        self.shared.world.write().await.reset(true, Instant::now())
    }

    /// Latch the quit flag and wake the simulation loop. A `false` request
    /// never clears an earlier quit.
    pub fn quit(&self, requested: bool) {
        if !requested {
            return;
        }
        if !self.shared.quit.swap(true, Ordering::SeqCst) {
            tracing::info!("quit requested");
        }
        self.shared.wake.notify_one();
    }

    pub fn is_quit(&self) -> bool {
        self.shared.quit.load(Ordering::SeqCst)
    }

    pub async fn for_each_player<F: FnMut(&Player)>(&self, f: F) {
        self.shared.world.read().await.for_each_player(f);
    }

    pub async fn for_each_food<F: FnMut(Vector2)>(&self, f: F) {
        self.shared.world.read().await.for_each_food(f);
    }

    pub async fn snapshot(&self) -> WorldSnapshot {
        self.shared.world.read().await.snapshot()
    }

    pub async fn standings(&self) -> Vec<PlayerView> {
        self.snapshot().await.standings()
    }

    /// Run the simulation until quit. Game over does not end the loop; it
    /// idles until a reset starts the next round.
    pub async fn start(&self) {
        let config = &self.shared.config;
        let mut poll = interval(config.loop_poll());
        poll.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut was_over = false;

        tracing::info!(boundaries = ?self.shared.boundaries, tron = config.tron, "simulation started");

        while !self.is_quit() {
            let just_reset = self.shared.world.write().await.take_reset();
            if just_reset {
                was_over = false;
                tokio::select! {
                    _ = sleep(config.reset_grace()) => {}
                    _ = self.shared.wake.notified() => {}
                }
                // a reset accepted during the grace gets its own grace
                continue;
            }

            let game_over = self.shared.world.read().await.is_game_over();
            if game_over {
                if !was_over {
                    was_over = true;
                    let standings = self.standings().await;
                    let winner = standings.iter().find(|view| view.alive);
                    tracing::info!(
                        winner = winner.map(|view| view.name.as_str()),
                        top_score = standings.first().map(|view| view.score),
                        "game over"
                    );
                }
            } else {
                let mut world = self.shared.world.write().await;
                // a reset landed since the top of the loop; its grace comes first
                if !world.reset_pending() {
                    world.step(Instant::now());
                }
            }

            tokio::select! {
                _ = poll.tick() => {}
                _ = self.shared.wake.notified() => {}
            }
        }

        tracing::info!("simulation stopped");
    }
}
