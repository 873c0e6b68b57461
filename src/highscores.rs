//! High score leaderboard
//!
//! Tracks the top 10 runs. A run ends on a crash or a restart.

use serde::{Deserialize, Serialize};

use crate::platform::storage::{StorageError, Store};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Pipes passed
    pub score: u32,
    /// Ticks the run lasted
    pub frames: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard, sorted by descending score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "gravity_flap_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a finished run (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, score: u32, frames: u64, timestamp: f64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            frames,
            timestamp,
        };

        // Equal scores keep the earlier run first
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores, starting fresh on any failure
    pub fn load(store: &Store) -> Self {
        match store.load::<HighScores>(Self::STORAGE_KEY) {
            Ok(Some(mut scores)) => {
                // Stored data may have been edited by hand
                scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
                scores.entries.truncate(MAX_HIGH_SCORES);
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Failed to load high scores: {}", e);
                Self::new()
            }
        }
    }

    pub fn save(&self, store: &Store) -> Result<(), StorageError> {
        store.save(Self::STORAGE_KEY, self)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}
