//! High score persistence.
//!
//! The game core never touches persisted state. After every move the app
//! reports the current score to a [`HighScoreTracker`], which compares it with
//! the best score seen so far and saves through a [`HighScoreStore`] when it is
//! beaten.
//!
//! # Example
//!
//! ```
//! use tui_2048_store::{HighScoreTracker, MemoryStore};
//!
//! let mut tracker = HighScoreTracker::load(MemoryStore::new(100)).unwrap();
//! assert!(!tracker.record(64).unwrap());
//! assert!(tracker.record(128).unwrap());
//! assert_eq!(tracker.best(), 128);
//! ```

pub mod file;
pub mod tracker;

use anyhow::Result;

pub use file::JsonFileStore;
pub use tracker::HighScoreTracker;

/// Backend that keeps the best score across sessions.
pub trait HighScoreStore {
    /// Read the stored best score (0 when nothing was stored yet).
    fn load(&mut self) -> Result<u64>;

    /// Replace the stored best score.
    fn save(&mut self, best: u64) -> Result<()>;
}

impl<S: HighScoreStore + ?Sized> HighScoreStore for Box<S> {
    fn load(&mut self) -> Result<u64> {
        (**self).load()
    }

    fn save(&mut self, best: u64) -> Result<()> {
        (**self).save(best)
    }
}

/// In-process store, used by tests and `--no-persist`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    best: u64,
    saves: u32,
}

impl MemoryStore {
    pub fn new(best: u64) -> Self {
        Self { best, saves: 0 }
    }

    /// Number of `save` calls so far
    pub fn saves(&self) -> u32 {
        self.saves
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&mut self) -> Result<u64> {
        Ok(self.best)
    }

    fn save(&mut self, best: u64) -> Result<()> {
        self.best = best;
        self.saves += 1;
        Ok(())
    }
}
