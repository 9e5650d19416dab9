//! Run-scoped score accumulator.
//!
//! The [`ScoreTable`] is the join structure between the save hook and the
//! post-processor: the hook writes one entry per saved image keyed by seed,
//! and the ranking pipeline reads the entries back when the batch is
//! complete. A table lives for exactly one run; [`RankSession::begin_run`]
//! clears it before generation starts.
//!
//! [`RankSession::begin_run`]: crate::session::RankSession::begin_run

use std::collections::HashMap;

/// Seed-keyed score mapping for a single run.
///
/// Single writer (the save hook), single reader (the post-processor); the
/// host serializes invocations, so no locking is involved.
#[derive(Debug, Clone, Default)]
pub struct ScoreTable {
    entries: HashMap<i64, f64>,
}

impl ScoreTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the score for a seed, replacing any previous entry.
    pub fn insert(&mut self, seed: i64, score: f64) {
        self.entries.insert(seed, score);
    }

    /// Look up the score recorded for a seed.
    #[must_use]
    pub fn get(&self, seed: i64) -> Option<f64> {
        self.entries.get(&seed).copied()
    }

    /// Number of recorded scores.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no scores have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries. Called at the start of each run and after the
    /// post-processor has consumed the table.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
