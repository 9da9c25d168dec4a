//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, terminal rendering, the JSON adapter).
//!
//! # Board
//!
//! The default playfield is a 4x4 grid of [`Tile`] values:
//!
//! - `0` is an empty cell
//! - any other value is a power of two (2, 4, 8, ...)
//!
//! The engine is parametric in the grid size; [`BOARD_SIZE`] is only the default.
//!
//! # Spawning
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `START_TILES` | 2 | Tiles spawned by a new game |
//! | `SPAWN_FOUR_PERCENT` | 10 | Chance (in percent) that a spawned tile is a 4 |
//!
//! # Examples
//!
//! ```
//! use tui_2048_types::{Direction, GameAction, BOARD_SIZE};
//!
//! assert_eq!(Direction::from_str("LEFT"), Some(Direction::Left));
//! assert!(Direction::Down.is_reversed());
//!
//! let action = GameAction::from_str("up").unwrap();
//! assert_eq!(action, GameAction::Move(Direction::Up));
//!
//! assert_eq!(BOARD_SIZE, 4);
//! ```

/// A single cell value. `0` means empty.
pub type Tile = u32;

/// Accumulated or per-move score. Wider than [`Tile`] so summing merges never overflows.
pub type Score = u64;

/// Largest representable tile. A pair of these does not merge.
pub const MAX_TILE: Tile = 1 << (Tile::BITS - 1);

/// Default board side length (4x4)
pub const BOARD_SIZE: usize = 4;

/// Number of tiles placed on an empty board when a game starts
pub const START_TILES: usize = 2;

/// Value of a regular spawned tile
pub const SPAWN_LOW: Tile = 2;

/// Value of a rare spawned tile
pub const SPAWN_HIGH: Tile = 4;

/// Chance in percent that a spawned tile is [`SPAWN_HIGH`] instead of [`SPAWN_LOW`]
pub const SPAWN_FOUR_PERCENT: u32 = 10;

/// Input poll interval of the terminal loop in milliseconds
pub const POLL_MS: u32 = 50;

/// Returns true when `value` is a legal non-empty tile (a power of two >= 2).
#[inline]
pub fn is_valid_tile(value: Tile) -> bool {
    value >= 2 && value.is_power_of_two()
}

/// Returns true when tiles `a` and `b` would merge if slid together.
#[inline]
pub fn can_merge(a: Tile, b: Tile) -> bool {
    a != 0 && a == b && a < MAX_TILE
}

/// Slide direction.
///
/// `Left` and `Up` move tiles toward index 0 of each line; `Right` and `Down`
/// move them toward the far end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// All four directions, in the order used by `legal_directions`.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Parse a direction (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_2048_types::Direction;
    ///
    /// assert_eq!(Direction::from_str("right"), Some(Direction::Right));
    /// assert_eq!(Direction::from_str("Down"), Some(Direction::Down));
    /// assert_eq!(Direction::from_str("sideways"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    /// Columns are slid for `Up`/`Down`, rows for `Left`/`Right`.
    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// Lines are reduced back-to-front for `Right`/`Down`.
    pub fn is_reversed(&self) -> bool {
        matches!(self, Direction::Right | Direction::Down)
    }

    /// Position in [`Direction::ALL`]
    pub fn index(&self) -> usize {
        match self {
            Direction::Left => 0,
            Direction::Right => 1,
            Direction::Up => 2,
            Direction::Down => 3,
        }
    }
}

/// Game actions that can be applied to a session
///
/// These actions are used by both keyboard input and the TCP adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Slide every tile in the given direction
    Move(Direction),
    /// Throw away the current game and start a new one
    Restart,
}

impl GameAction {
    /// Parse action from string (for the adapter protocol)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_2048_types::{Direction, GameAction};
    ///
    /// assert_eq!(GameAction::from_str("left"), Some(GameAction::Move(Direction::Left)));
    /// assert_eq!(GameAction::from_str("Restart"), Some(GameAction::Restart));
    /// assert_eq!(GameAction::from_str("hardDrop"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("restart") {
            return Some(GameAction::Restart);
        }
        Direction::from_str(s).map(GameAction::Move)
    }

    /// Convert to lowercase string for the adapter protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::Move(direction) => direction.as_str(),
            GameAction::Restart => "restart",
        }
    }
}

impl From<Direction> for GameAction {
    fn from(direction: Direction) -> Self {
        GameAction::Move(direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_defaults() {
        assert_eq!(START_TILES, 2);
        assert_eq!(SPAWN_LOW, 2);
        assert_eq!(SPAWN_HIGH, 4);
        assert_eq!(SPAWN_FOUR_PERCENT, 10);
    }

    #[test]
    fn test_valid_tiles_are_powers_of_two_from_two() {
        assert!(is_valid_tile(2));
        assert!(is_valid_tile(4));
        assert!(is_valid_tile(2048));
        assert!(!is_valid_tile(0));
        assert!(!is_valid_tile(1));
        assert!(!is_valid_tile(6));
        assert!(is_valid_tile(MAX_TILE));
    }

    #[test]
    fn test_top_tile_does_not_merge() {
        assert!(can_merge(2, 2));
        assert!(can_merge(MAX_TILE / 2, MAX_TILE / 2));
        assert!(!can_merge(MAX_TILE, MAX_TILE));
        assert!(!can_merge(0, 0));
        assert!(!can_merge(2, 4));
    }

    #[test]
    fn test_direction_round_trips_through_str() {
        for d in Direction::ALL {
            assert_eq!(Direction::from_str(d.as_str()), Some(d));
        }
    }

    #[test]
    fn test_direction_index_matches_all_order() {
        for (i, d) in Direction::ALL.iter().enumerate() {
            assert_eq!(d.index(), i);
        }
    }

    #[test]
    fn test_orientation_flags() {
        assert!(!Direction::Left.is_vertical());
        assert!(!Direction::Left.is_reversed());
        assert!(Direction::Down.is_vertical());
        assert!(Direction::Down.is_reversed());
        assert!(Direction::Up.is_vertical());
        assert!(!Direction::Up.is_reversed());
        assert!(Direction::Right.is_reversed());
    }
}
