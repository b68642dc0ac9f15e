//! Core game logic module for Snake
//!
//! Everything here is free of terminal I/O. [`Game`] is the shared handle the
//! simulation, render and input tasks all hold; [`World`] is the plain data
//! behind its lock and carries the rules.

pub mod action;
pub mod arena;
pub mod boundaries;
pub mod config;
pub mod error;
pub mod player;
pub mod spawn;
pub mod state;
pub mod vector;
pub mod world;

// Re-export commonly used types
pub use action::Direction;
pub use arena::Game;
pub use boundaries::Boundaries;
pub use config::{GameConfig, PALETTE, PlayerColor};
pub use error::JoinError;
pub use player::{Advance, Player, PlayerHandle};
pub use state::{Board, CollisionType, PlayerId, Snake};
pub use vector::Vector2;
pub use world::{Death, PlayerView, StepSummary, World, WorldSnapshot};
