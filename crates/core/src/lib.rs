//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains the 2048 rules and the game session. It has **zero
//! dependencies** on UI, networking, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games
//! - **Testable**: Every rule is a pure function over a [`Board`]
//! - **Portable**: Runs in a terminal, behind the TCP adapter, or headless
//! - **Fast**: Zero-allocation moves, spawns, and terminal checks
//!
//! # Module Structure
//!
//! - [`line`]: the single-line slide/merge reducer
//! - [`board`]: N x N tile grid (4x4 by default)
//! - [`engine`]: directional moves, tile spawning, and the can-move predicate
//! - [`game_state`]: one session (board, score, phase, RNG)
//! - [`rng`]: the injectable random source and a seedable LCG
//! - [`snapshot`]: plain copies of session state for renderers
//!
//! # Game Rules
//!
//! - A move slides every tile as far as possible in one direction
//! - Two equal tiles that meet merge into their sum, which is added to the score
//! - A merged tile does not merge again in the same move
//! - After a move that changed the board a new tile appears: 2 (90%) or 4 (10%)
//! - The game is over when the board is full and no two neighbours are equal
//!
//! # Example
//!
//! ```
//! use tui_2048_core::{move_board, Board, GameState};
//! use tui_2048_types::{Direction, GameAction};
//!
//! let board = Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
//! let result = move_board(&board, Direction::Left);
//! assert!(result.moved);
//! assert_eq!(result.score_gained, 4);
//! assert_eq!(result.board.row(0), [4, 0, 0, 0]);
//!
//! let mut game = GameState::new(12345);
//! game.apply_action(GameAction::Move(Direction::Left));
//! assert!(game.board().tile_count() >= 2);
//! ```

pub mod board;
pub mod engine;
pub mod game_state;
pub mod line;
pub mod rng;
pub mod snapshot;

pub use tui_2048_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use engine::{
    can_move, can_move_in, legal_directions, move_board, new_game, spawn_random_tile, MoveResult,
};
pub use game_state::{GamePhase, GameState, MoveOutcome};
pub use line::reduce_line;
pub use rng::{SimpleRng, TileRng};
pub use snapshot::GameSnapshot;
