//! Board engine - directional moves, spawning, and the terminal-state check
//!
//! Every function here is pure over [`Board`]: the input board is never
//! modified and the engine holds no state. Session bookkeeping (score, phase)
//! lives in [`crate::GameState`].

use crate::board::Board;
use crate::line::reduce_line;
use crate::rng::TileRng;
use crate::types::{
    can_merge, Direction, Score, Tile, BOARD_SIZE, SPAWN_FOUR_PERCENT, SPAWN_HIGH, SPAWN_LOW,
    START_TILES,
};

/// Result of sliding a board in one direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveResult<const N: usize = BOARD_SIZE> {
    /// Board after the slide (no tile spawned yet)
    pub board: Board<N>,
    /// Sum of every tile created by a merge
    pub score_gained: Score,
    /// Whether any cell changed
    pub moved: bool,
}

/// Reduce one line in the orientation `direction` asks for.
///
/// `Right`/`Down` reverse before and after reduction so a single reducer
/// serves all four directions.
fn slide_line<const N: usize>(line: [Tile; N], direction: Direction) -> ([Tile; N], Score) {
    if direction.is_reversed() {
        let mut reversed = line;
        reversed.reverse();
        let (mut out, score) = reduce_line(&reversed);
        out.reverse();
        (out, score)
    } else {
        reduce_line(&line)
    }
}

/// Slide every row (Left/Right) or column (Up/Down) of `board`.
pub fn move_board<const N: usize>(board: &Board<N>, direction: Direction) -> MoveResult<N> {
    let mut next = *board;
    let mut score_gained: Score = 0;
    let mut moved = false;

    for i in 0..N {
        let line = if direction.is_vertical() {
            board.column(i)
        } else {
            board.row(i)
        };

        let (reduced, score) = slide_line(line, direction);
        score_gained += score;
        if reduced != line {
            moved = true;
            if direction.is_vertical() {
                next.set_column(i, reduced);
            } else {
                next.set_row(i, reduced);
            }
        }
    }

    MoveResult {
        board: next,
        score_gained,
        moved,
    }
}

/// Whether sliding in `direction` would change the board
pub fn can_move_in<const N: usize>(board: &Board<N>, direction: Direction) -> bool {
    (0..N).any(|i| {
        let line = if direction.is_vertical() {
            board.column(i)
        } else {
            board.row(i)
        };
        slide_line(line, direction).0 != line
    })
}

/// Per-direction move legality, indexed like [`Direction::ALL`]
pub fn legal_directions<const N: usize>(board: &Board<N>) -> [bool; 4] {
    Direction::ALL.map(|d| can_move_in(board, d))
}

/// Whether any move can still change the board.
///
/// True if a cell is empty or some cell can merge with its right or bottom
/// neighbour. `false` is the game-over condition.
pub fn can_move<const N: usize>(board: &Board<N>) -> bool {
    let cells = board.rows();
    for r in 0..N {
        for c in 0..N {
            let v = cells[r][c];
            if v == 0 {
                return true;
            }
            if c + 1 < N && can_merge(v, cells[r][c + 1]) {
                return true;
            }
            if r + 1 < N && can_merge(v, cells[r + 1][c]) {
                return true;
            }
        }
    }
    false
}

/// Place a 2 (90%) or 4 (10%) on a uniformly chosen empty cell.
///
/// A full board is returned unchanged.
pub fn spawn_random_tile<const N: usize, R: TileRng + ?Sized>(
    board: &Board<N>,
    rng: &mut R,
) -> Board<N> {
    let empty = board.empty_count();
    if empty == 0 {
        return *board;
    }

    let pick = rng.next_range(empty as u32) as usize;
    let value = if rng.chance_percent(SPAWN_FOUR_PERCENT) {
        SPAWN_HIGH
    } else {
        SPAWN_LOW
    };

    let mut next = *board;
    if let Some((r, c)) = board.empty_cells().nth(pick) {
        next.set(r, c, value);
    }
    next
}

/// Fresh board with the starting tiles, and a zero score
pub fn new_game<const N: usize, R: TileRng + ?Sized>(rng: &mut R) -> (Board<N>, Score) {
    let mut board = Board::new();
    for _ in 0..START_TILES {
        board = spawn_random_tile(&board, rng);
    }
    (board, 0)
}
