//! Error types for reward-rank operations.

use thiserror::Error;

/// Result type alias for reward-rank operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while scoring and ranking a generation batch.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The lower-score-limit text could not be parsed as a number.
    #[error("Invalid score limit {input:?}: {reason}")]
    InvalidScoreLimit {
        /// The text as entered.
        input: String,
        /// Reason for the parse failure.
        reason: String,
    },

    /// An unscored image reached the low-score filter.
    #[error("No score recorded for seed {seed} while filtering low scores")]
    MissingScore {
        /// Seed of the image that has no score table entry.
        seed: i64,
    },

    /// The persisted caption text carries no recognizable seed.
    #[error("No seed found in caption text: {text:?}")]
    SeedNotFound {
        /// The caption text that was searched.
        text: String,
    },

    /// The preference model failed to load.
    #[error("Preference model load failed ({model}): {reason}")]
    ModelLoad {
        /// Model identifier.
        model: String,
        /// Error message from the loader.
        reason: String,
    },

    /// The scoring callback failed on an image.
    #[error("Scoring failed for seed {seed}: {reason}")]
    Scoring {
        /// Seed of the image being scored.
        seed: i64,
        /// Error message from the scorer.
        reason: String,
    },

    /// I/O error wrapper.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
