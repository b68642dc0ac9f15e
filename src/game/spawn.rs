use rand::Rng;

use super::boundaries::Boundaries;
use super::state::Board;
use super::vector::Vector2;

pub const MAX_SPAWN_ATTEMPTS: usize = 32;

/// Uniformly random cell inside `bounds`
pub fn random_cell<R: Rng + ?Sized>(rng: &mut R, bounds: &Boundaries) -> Vector2 {
    Vector2::new(
        rng.gen_range(bounds.min_x..bounds.max_x),
        rng.gen_range(bounds.min_y..bounds.max_y),
    )
}

/// Random cell inside `bounds` that no snake covers. Gives up after a fixed
/// number of draws and returns the last one, so a crowded board still spawns.
pub fn random_free_cell<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: &Boundaries,
    board: &Board,
) -> Vector2 {
    let mut cell = random_cell(rng, bounds);
    for _ in 1..MAX_SPAWN_ATTEMPTS {
        if !board.is_occupied(cell) {
            return cell;
        }
        cell = random_cell(rng, bounds);
    }
    if board.is_occupied(cell) {
        tracing::warn!(?cell, "no free spawn cell found, spawning on an occupied cell");
    }
    cell
}
