//! JSON file store: `{"high_score": N}`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::HighScoreStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u64,
}

/// Stores the best score in a small JSON document.
///
/// A missing file reads as 0. A file that does not parse also reads as 0
/// (with a warning) so a damaged save never blocks starting a game; the next
/// save overwrites it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&mut self) -> Result<u64> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("no high score file at {}", self.path.display());
                return Ok(0);
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("reading high score from {}", self.path.display()))
            }
        };

        match serde_json::from_str::<HighScoreRecord>(&text) {
            Ok(record) => Ok(record.high_score),
            Err(e) => {
                log::warn!(
                    "ignoring unreadable high score file {}: {}",
                    self.path.display(),
                    e
                );
                Ok(0)
            }
        }
    }

    fn save(&mut self, best: u64) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating directory {}", dir.display()))?;
        }

        let body = serde_json::to_vec(&HighScoreRecord { high_score: best })?;
        let tmp = self.tmp_path();
        fs::write(&tmp, body).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;

        log::info!("saved high score {} to {}", best, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

    fn scratch_dir() -> PathBuf {
        let n = NEXT_DIR.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!(
            "tui-2048-store-test-{}-{}",
            std::process::id(),
            n
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_missing_file_loads_zero() {
        let dir = scratch_dir();
        let mut store = JsonFileStore::new(dir.join("best.json"));
        assert_eq!(store.load().unwrap(), 0);
    }

    #[test]
    fn test_save_then_load() {
        let dir = scratch_dir();
        let path = dir.join("nested").join("best.json");
        let mut store = JsonFileStore::new(&path);
        store.save(4096).unwrap();

        let mut reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.load().unwrap(), 4096);
        assert!(!store.tmp_path().exists());

        let text = fs::read_to_string(&path).unwrap();
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["high_score"], 4096);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_corrupt_file_loads_zero() {
        let dir = scratch_dir();
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("best.json");
        fs::write(&path, "not json").unwrap();

        let mut store = JsonFileStore::new(&path);
        assert_eq!(store.load().unwrap(), 0);

        // And the next save repairs it.
        store.save(8).unwrap();
        assert_eq!(store.load().unwrap(), 8);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_tmp_path_sits_next_to_target() {
        let store = JsonFileStore::new("/var/lib/game/best.json");
        assert_eq!(store.tmp_path(), PathBuf::from("/var/lib/game/best.json.tmp"));
    }
}
