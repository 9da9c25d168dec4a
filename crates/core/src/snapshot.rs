//! Snapshot module - a copyable view of one session for rendering and the adapter

use crate::types::{Score, Tile, BOARD_SIZE};

/// Plain copy of everything a renderer or the adapter needs from a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot<const N: usize = BOARD_SIZE> {
    pub board: [[Tile; N]; N],
    pub score: Score,
    pub last_score_gained: Score,
    pub max_tile: Tile,
    /// Indexed like `Direction::ALL`.
    pub legal: [bool; 4],
    pub game_over: bool,
    pub episode_id: u32,
    pub move_count: u32,
}

impl<const N: usize> Default for GameSnapshot<N> {
    fn default() -> Self {
        Self {
            board: [[0; N]; N],
            score: 0,
            last_score_gained: 0,
            max_tile: 0,
            legal: [false; 4],
            game_over: false,
            episode_id: 0,
            move_count: 0,
        }
    }
}
