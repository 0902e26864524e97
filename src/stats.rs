//! Past-session history and the high score derived from it.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::SnakeError;

/// Storage key for the session history.
pub const STATS_KEY: &str = "snake.stats";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsRecord {
    pub points: u32,
    pub seconds: u64,
}

pub trait StatsStore {
    /// Every recorded session, oldest first. Unreadable history is empty.
    fn load(&self) -> Vec<StatsRecord>;

    fn append(&mut self, record: StatsRecord) -> Result<(), SnakeError>;

    fn high_score(&self) -> u32 {
        high_score(&self.load())
    }
}

pub fn high_score(records: &[StatsRecord]) -> u32 {
    records.iter().map(|r| r.points).max().unwrap_or(0)
}

/// JSON array of records in `<dir>/snake.stats.json`.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        JsonFileStore {
            path: dir.as_ref().join(format!("{STATS_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatsStore for JsonFileStore {
    fn load(&self) -> Vec<StatsRecord> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!("Error reading stats from {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&text) {
            Ok(records) => records,
            Err(e) => {
                warn!("Ignoring malformed stats in {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    fn append(&mut self, record: StatsRecord) -> Result<(), SnakeError> {
        let mut records = self.load();
        records.push(record);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string(&records)?)?;
        info!(
            "Saved session stats ({} points, {}s) to {}",
            record.points,
            record.seconds,
            self.path.display()
        );
        Ok(())
    }
}

/// Keeps history for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<StatsRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatsStore for MemoryStore {
    fn load(&self) -> Vec<StatsRecord> {
        self.records.clone()
    }

    fn append(&mut self, record: StatsRecord) -> Result<(), SnakeError> {
        self.records.push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "snek-session-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_high_score() {
        assert_eq!(high_score(&[]), 0);
        let records = [
            StatsRecord { points: 3, seconds: 20 },
            StatsRecord { points: 9, seconds: 41 },
            StatsRecord { points: 4, seconds: 90 },
        ];
        assert_eq!(high_score(&records), 9);
    }

    #[test]
    fn test_missing_file_is_empty_history() {
        let store = JsonFileStore::new(scratch_dir("missing"));
        assert!(store.load().is_empty());
        assert_eq!(store.high_score(), 0);
    }

    #[test]
    fn test_append_and_reload() {
        let dir = scratch_dir("append");
        let mut store = JsonFileStore::new(&dir);
        assert_eq!(store.path(), dir.join("snake.stats.json"));

        store.append(StatsRecord { points: 2, seconds: 10 }).unwrap();
        store.append(StatsRecord { points: 5, seconds: 33 }).unwrap();

        let reopened = JsonFileStore::new(&dir);
        assert_eq!(
            reopened.load(),
            vec![
                StatsRecord { points: 2, seconds: 10 },
                StatsRecord { points: 5, seconds: 33 },
            ]
        );
        assert_eq!(reopened.high_score(), 5);

        let text = fs::read_to_string(reopened.path()).unwrap();
        assert_eq!(text, r#"[{"points":2,"seconds":10},{"points":5,"seconds":33}]"#);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_malformed_history_is_empty() {
        let dir = scratch_dir("malformed");
        fs::create_dir_all(&dir).unwrap();
        let mut store = JsonFileStore::new(&dir);
        fs::write(store.path(), "{not json").unwrap();

        assert!(store.load().is_empty());

        // A corrupted history does not block recording the next session.
        store.append(StatsRecord { points: 1, seconds: 4 }).unwrap();
        assert_eq!(store.load(), vec![StatsRecord { points: 1, seconds: 4 }]);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.high_score(), 0);
        store.append(StatsRecord { points: 7, seconds: 12 }).unwrap();
        store.append(StatsRecord { points: 3, seconds: 2 }).unwrap();
        assert_eq!(store.load().len(), 2);
        assert_eq!(store.high_score(), 7);
    }
}
