use thiserror::Error;

/// Why a player could not join the roster
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    #[error("the roster is full ({0} players)")]
    RosterFull(usize),
    #[error("player name must not be empty")]
    EmptyName,
    #[error("a player named {0:?} has already joined")]
    DuplicateName(String),
    #[error("the board has no room to spawn a snake")]
    NoSpawnRoom,
}
