//! App glue: one game session plus its high score.
//!
//! Keyboard input and adapter commands both go through [`App::handle`], so the
//! high score sees every score change no matter where the move came from.

use anyhow::Result;

use crate::core::{GameSnapshot, GameState};
use crate::store::{HighScoreStore, HighScoreTracker};
use crate::types::{GameAction, Score};

/// What an action did, from the UI's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// Nothing changed (blocked move, or the game is already over).
    Ignored,
    Moved { score_gained: Score },
    /// The move changed the board and left no legal move.
    GameOver { score_gained: Score },
    Restarted,
}

impl AppEvent {
    pub fn changed(&self) -> bool {
        !matches!(self, AppEvent::Ignored)
    }

    pub fn score_gained(&self) -> Score {
        match *self {
            AppEvent::Moved { score_gained } | AppEvent::GameOver { score_gained } => score_gained,
            AppEvent::Ignored | AppEvent::Restarted => 0,
        }
    }
}

/// Summary of a list of actions applied in one go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchOutcome {
    pub moved: bool,
    pub score_gained: Score,
    pub game_over: bool,
}

pub struct App<S: HighScoreStore> {
    game: GameState,
    scores: HighScoreTracker<S>,
}

impl<S: HighScoreStore> App<S> {
    /// Start a game and read the stored best score.
    pub fn new(seed: u32, store: S) -> Result<Self> {
        Ok(Self {
            game: GameState::new(seed),
            scores: HighScoreTracker::load(store)?,
        })
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn best(&self) -> Score {
        self.scores.best()
    }

    pub fn store(&self) -> &S {
        self.scores.store()
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.game.snapshot_into(out);
    }

    pub fn handle(&mut self, action: GameAction) -> AppEvent {
        match action {
            GameAction::Restart => {
                log::info!(
                    "restart after episode {} with score {}",
                    self.game.episode_id(),
                    self.game.score()
                );
                self.game.restart();
                AppEvent::Restarted
            }
            GameAction::Move(direction) => {
                let outcome = self.game.apply_move(direction);
                if !outcome.moved {
                    return AppEvent::Ignored;
                }

                self.record_score();
                if outcome.game_over {
                    log::info!(
                        "game over: score {} after {} moves",
                        self.game.score(),
                        self.game.move_count()
                    );
                    AppEvent::GameOver {
                        score_gained: outcome.score_gained,
                    }
                } else {
                    AppEvent::Moved {
                        score_gained: outcome.score_gained,
                    }
                }
            }
        }
    }

    /// Apply `actions` in order. Moves after a game over are ignored like any other.
    pub fn handle_batch(&mut self, actions: &[GameAction]) -> BatchOutcome {
        let mut out = BatchOutcome::default();
        for &action in actions {
            let event = self.handle(action);
            out.moved |= event.changed();
            out.score_gained = out.score_gained.saturating_add(event.score_gained());
        }
        out.game_over = self.game.game_over();
        out
    }

    fn record_score(&mut self) {
        match self.scores.record(self.game.score()) {
            Ok(true) => log::debug!("new best score {}", self.scores.best()),
            Ok(false) => {}
            // The game goes on; the next new best retries the write.
            Err(e) => log::warn!("failed to save high score: {:#}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::Direction;

    fn play_until_moved<S: HighScoreStore>(app: &mut App<S>) -> AppEvent {
        for d in Direction::ALL {
            let event = app.handle(GameAction::Move(d));
            if event.changed() {
                return event;
            }
        }
        panic!("fresh board has no legal move");
    }

    #[test]
    fn test_new_app_reads_best() {
        let app = App::new(1, MemoryStore::new(512)).unwrap();
        assert_eq!(app.best(), 512);
        assert_eq!(app.game().score(), 0);
    }

    #[test]
    fn test_move_event() {
        let mut app = App::new(7, MemoryStore::new(0)).unwrap();
        let event = play_until_moved(&mut app);
        assert!(matches!(event, AppEvent::Moved { .. }));
        assert_eq!(app.game().move_count(), 1);
    }

    #[test]
    fn test_restart_event() {
        let mut app = App::new(7, MemoryStore::new(0)).unwrap();
        play_until_moved(&mut app);
        assert_eq!(app.handle(GameAction::Restart), AppEvent::Restarted);
        assert_eq!(app.game().episode_id(), 1);
        assert_eq!(app.game().move_count(), 0);
    }

    #[test]
    fn test_best_follows_score() {
        let mut app = App::new(99, MemoryStore::new(0)).unwrap();
        for i in 0..200 {
            app.handle(GameAction::Move(Direction::ALL[i % 4]));
            assert!(app.best() >= app.game().score());
        }
        assert!(app.game().score() > 0);
        assert_eq!(app.best(), app.game().score());
    }

    #[test]
    fn test_best_is_kept_across_restart() {
        let mut app = App::new(99, MemoryStore::new(0)).unwrap();
        for i in 0..100 {
            app.handle(GameAction::Move(Direction::ALL[i % 4]));
        }
        let best = app.best();
        app.handle(GameAction::Restart);
        assert_eq!(app.game().score(), 0);
        assert_eq!(app.best(), best);
    }

    #[test]
    fn test_batch_sums_points() {
        let mut a = App::new(5, MemoryStore::new(0)).unwrap();
        let mut b = App::new(5, MemoryStore::new(0)).unwrap();
        let actions: Vec<GameAction> = (0..12).map(|i| GameAction::Move(Direction::ALL[i % 4])).collect();

        let mut expected = 0;
        for &action in &actions {
            expected += a.handle(action).score_gained();
        }
        let outcome = b.handle_batch(&actions);
        assert_eq!(outcome.score_gained, expected);
        assert_eq!(b.game().score(), a.game().score());
        assert_eq!(outcome.game_over, b.game().game_over());
    }

    #[test]
    fn test_empty_batch() {
        let mut app = App::new(5, MemoryStore::new(0)).unwrap();
        assert_eq!(app.handle_batch(&[]), BatchOutcome::default());
    }
}
