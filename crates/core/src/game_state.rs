//! Game state module - one game session
//!
//! A session owns the current board, score, phase, and its random source. It
//! is an explicit value, so several games can run side by side and tests need
//! no shared fixtures. All board logic is delegated to [`crate::engine`].

use crate::engine::{can_move, legal_directions, move_board, new_game, spawn_random_tile};
use crate::rng::{SimpleRng, TileRng};
use crate::snapshot::GameSnapshot;
use crate::types::{Direction, GameAction, Score, BOARD_SIZE};
use crate::Board;

/// Session phase. `GameOver` is terminal until a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamePhase {
    Playing,
    GameOver,
}

/// What a single move did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveOutcome {
    pub moved: bool,
    pub score_gained: Score,
    /// The move ended the game.
    pub game_over: bool,
}

/// Complete game session
#[derive(Debug, Clone)]
pub struct GameState<R: TileRng = SimpleRng, const N: usize = BOARD_SIZE> {
    board: Board<N>,
    score: Score,
    phase: GamePhase,
    rng: R,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    /// Moves that changed the board in this episode.
    move_count: u32,
    last_outcome: MoveOutcome,
}

impl GameState {
    /// Create a new 4x4 game with the given RNG seed
    pub fn new(seed: u32) -> Self {
        Self::with_rng(SimpleRng::new(seed))
    }
}

impl<R: TileRng, const N: usize> GameState<R, N> {
    /// Start a game drawing tiles from `rng`
    pub fn with_rng(mut rng: R) -> Self {
        let (board, score) = new_game(&mut rng);
        Self {
            board,
            score,
            phase: phase_of(&board),
            rng,
            episode_id: 0,
            move_count: 0,
            last_outcome: MoveOutcome::default(),
        }
    }

    pub fn board(&self) -> &Board<N> {
        &self.board
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn last_outcome(&self) -> MoveOutcome {
        self.last_outcome
    }

    /// Slide the board, then spawn a tile and re-check the phase if anything moved.
    ///
    /// Ignored once the game is over.
    pub fn apply_move(&mut self, direction: Direction) -> MoveOutcome {
        if self.game_over() {
            self.last_outcome = MoveOutcome {
                game_over: true,
                ..MoveOutcome::default()
            };
            return self.last_outcome;
        }

        let result = move_board(&self.board, direction);
        if !result.moved {
            self.last_outcome = MoveOutcome::default();
            return self.last_outcome;
        }

        self.board = spawn_random_tile(&result.board, &mut self.rng);
        self.score = self.score.saturating_add(result.score_gained);
        self.move_count = self.move_count.wrapping_add(1);
        self.phase = phase_of(&self.board);

        self.last_outcome = MoveOutcome {
            moved: true,
            score_gained: result.score_gained,
            game_over: self.game_over(),
        };
        self.last_outcome
    }

    /// Throw the current game away and deal a new board from the same RNG stream
    pub fn restart(&mut self) {
        let (board, score) = new_game(&mut self.rng);
        self.board = board;
        self.score = score;
        self.phase = phase_of(&board);
        self.episode_id = self.episode_id.wrapping_add(1);
        self.move_count = 0;
        self.last_outcome = MoveOutcome::default();
    }

    /// Apply a game action. Returns true if the session changed.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Move(direction) => self.apply_move(direction).moved,
            GameAction::Restart => {
                self.restart();
                true
            }
        }
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot<N>) {
        self.board.write_grid(&mut out.board);
        out.score = self.score;
        out.last_score_gained = self.last_outcome.score_gained;
        out.max_tile = self.board.max_tile();
        out.legal = legal_directions(&self.board);
        out.game_over = self.game_over();
        out.episode_id = self.episode_id;
        out.move_count = self.move_count;
    }

    pub fn snapshot(&self) -> GameSnapshot<N> {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    #[cfg(test)]
    pub(crate) fn set_board(&mut self, board: Board<N>) {
        self.board = board;
        self.phase = phase_of(&board);
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}

fn phase_of<const N: usize>(board: &Board<N>) -> GamePhase {
    if can_move(board) {
        GamePhase::Playing
    } else {
        GamePhase::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Always answers 0: spawns land on the first empty cell and are 4s.
    struct ZeroRng;

    impl TileRng for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::new(12345);

        assert_eq!(state.score(), 0);
        assert_eq!(state.phase(), GamePhase::Playing);
        assert_eq!(state.episode_id(), 0);
        assert_eq!(state.move_count(), 0);
        assert_eq!(state.board().tile_count(), 2);
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = GameState::new(77);
        let mut b = GameState::new(77);
        for d in [Direction::Left, Direction::Up, Direction::Right, Direction::Down] {
            assert_eq!(a.apply_move(d), b.apply_move(d));
            assert_eq!(a.board(), b.board());
        }
    }

    #[test]
    fn test_with_rng_is_deterministic() {
        let state: GameState<ZeroRng> = GameState::with_rng(ZeroRng);
        // Two 4s, first on (0,0), then on (0,1).
        assert_eq!(state.board().row(0), [4, 4, 0, 0]);
    }

    #[test]
    fn test_move_adds_score_and_spawns() {
        let mut state: GameState<ZeroRng> = GameState::with_rng(ZeroRng);
        state.set_board(Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]));

        let outcome = state.apply_move(Direction::Left);
        assert!(outcome.moved);
        assert_eq!(outcome.score_gained, 4);
        assert!(!outcome.game_over);
        assert_eq!(state.score(), 4);
        assert_eq!(state.move_count(), 1);
        // Merged 4 at (0,0); the spawned 4 lands on the first empty cell (0,1).
        assert_eq!(state.board().row(0), [4, 4, 0, 0]);
        assert_eq!(state.board().tile_count(), 2);
    }

    #[test]
    fn test_noop_move_does_not_spawn() {
        let mut state: GameState<ZeroRng> = GameState::with_rng(ZeroRng);
        let board = Board::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        state.set_board(board);

        let outcome = state.apply_move(Direction::Left);
        assert_eq!(outcome, MoveOutcome::default());
        assert_eq!(*state.board(), board);
        assert_eq!(state.move_count(), 0);
    }

    #[test]
    fn test_move_that_fills_last_cell_ends_game() {
        let mut state: GameState<ZeroRng, 2> = GameState::with_rng(ZeroRng);
        // Sliding up leaves (1,0) free; the spawned 4 fills it with no pairs left.
        state.set_board(Board::from_rows([[0, 4], [2, 2]]));
        let outcome = state.apply_move(Direction::Up);

        assert!(outcome.moved);
        assert!(outcome.game_over);
        assert_eq!(*state.board(), Board::from_rows([[2, 4], [4, 2]]));
        assert_eq!(state.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_game_over_ignores_moves() {
        let mut state: GameState<ZeroRng, 2> = GameState::with_rng(ZeroRng);
        let board = Board::from_rows([[2, 4], [4, 2]]);
        state.set_board(board);
        assert!(state.game_over());

        for d in Direction::ALL {
            let outcome = state.apply_move(d);
            assert!(!outcome.moved);
            assert!(outcome.game_over);
        }
        assert_eq!(*state.board(), board);
        assert!(!state.apply_action(GameAction::Move(Direction::Left)));
    }

    #[test]
    fn test_restart_resets_session() {
        let mut state = GameState::new(9);
        for d in Direction::ALL {
            state.apply_move(d);
        }
        assert!(state.apply_action(GameAction::Restart));
        assert_eq!(state.episode_id(), 1);
        assert_eq!(state.score(), 0);
        assert_eq!(state.move_count(), 0);
        assert_eq!(state.phase(), GamePhase::Playing);
        assert_eq!(state.board().tile_count(), 2);
    }

    #[test]
    fn test_restart_leaves_game_over() {
        let mut state: GameState<ZeroRng, 2> = GameState::with_rng(ZeroRng);
        state.set_board(Board::from_rows([[2, 4], [4, 2]]));
        state.restart();
        assert_eq!(state.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_score_never_decreases() {
        let mut state = GameState::new(2024);
        let mut last = 0;
        for i in 0..500 {
            state.apply_move(Direction::ALL[i % 4]);
            assert!(state.score() >= last);
            last = state.score();
        }
    }

    #[test]
    fn test_snapshot_mirrors_state() {
        let mut state: GameState<ZeroRng> = GameState::with_rng(ZeroRng);
        state.set_board(Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]));
        state.apply_move(Direction::Left);

        let snap = state.snapshot();
        assert_eq!(snap.board, *state.board().rows());
        assert_eq!(snap.score, 4);
        assert_eq!(snap.last_score_gained, 4);
        assert_eq!(snap.max_tile, 4);
        assert_eq!(snap.move_count, 1);
        assert!(!snap.game_over);
        // [4,4,0,0] on top row: everything but up is legal.
        assert_eq!(snap.legal, [true, true, false, true]);
    }
}
