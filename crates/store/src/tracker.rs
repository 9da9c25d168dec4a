use anyhow::Result;

use crate::HighScoreStore;

/// Best-score bookkeeping on top of a [`HighScoreStore`].
#[derive(Debug)]
pub struct HighScoreTracker<S> {
    store: S,
    best: u64,
}

impl<S: HighScoreStore> HighScoreTracker<S> {
    /// Read the stored best score once, up front.
    pub fn load(mut store: S) -> Result<Self> {
        let best = store.load()?;
        Ok(Self { store, best })
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Report the current score. Saves and returns true only when it beats the best.
    ///
    /// On a failed save the in-memory best is still raised, so the display stays
    /// right and the next new best retries the write.
    pub fn record(&mut self, score: u64) -> Result<bool> {
        if score <= self.best {
            return Ok(false);
        }
        self.best = score;
        self.store.save(score)?;
        Ok(true)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
