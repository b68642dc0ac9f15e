//! Snake Arena - local multiplayer Snake for the terminal
//!
//! This library provides:
//! - Core game logic and the concurrent simulation loop (game module)
//! - Keyboard input sampling (input module)
//! - TUI rendering (render module)
//! - Session statistics for the header (metrics module)
//! - The interactive terminal session (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
