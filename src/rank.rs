//! Score attachment, low-score filtering, and ranking.
//!
//! This is the post-processing pipeline run once per generation batch:
//!
//! 1. **Attach** — join the run's [`ScoreTable`] onto the batch by seed,
//!    writing each score into the image's metadata and appending the
//!    formatted suffix to its caption.
//! 2. **Filter** — optionally drop images at or below the configured lower
//!    score limit.
//! 3. **Rank** — stable sort by descending score; unscored images sort
//!    after every scored one.
//!
//! Grid/preview images before the batch's first-real-image index are never
//! scored and keep their captions unchanged.

use crate::batch::{GeneratedImage, GenerationBatch, RankedBatch};
use crate::error::{Error, Result};
use crate::scores::ScoreTable;

/// Literal prefix of the caption suffix appended to scored images.
pub const SCORE_SUFFIX_PREFIX: &str = ", ImageReward Score: ";

/// Format the caption suffix for a score, to 4 decimal places.
#[must_use]
pub fn format_score_suffix(score: f64) -> String {
    format!("{SCORE_SUFFIX_PREFIX}{score:.4}")
}

/// What the low-score filter does with an image that has no attached score.
///
/// The reference implementation raised on this case; `Reject` keeps that
/// behavior observable instead of silently picking a side. `Drop` and
/// `Retain` are the two silent alternatives for callers that want one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnscoredPolicy {
    /// Fail the run with [`Error::MissingScore`].
    #[default]
    Reject,

    /// Remove the image, as if it had scored below the limit.
    Drop,

    /// Keep the image; it still ranks after all scored images.
    Retain,
}

/// Configuration for one ranking run.
#[derive(Debug, Clone, Default)]
pub struct RankConfig {
    /// Whether to drop images at or below the lower score limit.
    pub filter_low_scores: bool,

    /// Lower score limit. `None` means the limit field was left empty;
    /// filtering then uses 0.0, matching the UI default.
    pub lower_score_limit: Option<f64>,

    /// Policy for unscored images reaching the filter.
    pub unscored_policy: UnscoredPolicy,
}

impl RankConfig {
    /// Build a config from the two UI inputs: the filter checkbox and the
    /// raw limit text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidScoreLimit`] if the limit text is non-empty
    /// and not a number.
    pub fn from_ui(filter_low_scores: bool, limit_text: &str) -> Result<Self> {
        Ok(Self {
            filter_low_scores,
            lower_score_limit: parse_score_limit(limit_text)?,
            unscored_policy: UnscoredPolicy::default(),
        })
    }

    /// Replace the unscored-image policy.
    #[must_use]
    pub fn with_unscored_policy(mut self, policy: UnscoredPolicy) -> Self {
        self.unscored_policy = policy;
        self
    }

    fn effective_limit(&self) -> f64 {
        self.lower_score_limit.unwrap_or(0.0)
    }
}

/// Parse the lower-score-limit text field.
///
/// Empty (or all-whitespace) text disables the limit; anything else must
/// parse as a float.
///
/// # Errors
///
/// Returns [`Error::InvalidScoreLimit`] for non-empty, non-numeric text.
pub fn parse_score_limit(text: &str) -> Result<Option<f64>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|e| Error::InvalidScoreLimit {
            input: text.to_string(),
            reason: e.to_string(),
        })
}

/// Attach recorded scores to the batch's output images.
///
/// For each image at or after the first-real-image index, the seed is
/// derived from the base seed and offset, looked up in `table`, and — when
/// present — written into the image's metadata with the formatted suffix
/// appended to its caption. Preview images and images with no table entry
/// are left untouched.
pub fn attach_scores(batch: &mut GenerationBatch, table: &ScoreTable) {
    for index in 0..batch.images.len() {
        let Some(seed) = batch.seed_at(index) else {
            continue;
        };
        if let Some(score) = table.get(seed) {
            let info = &mut batch.images[index].info;
            info.score = Some(score);
            info.parameters.push_str(&format_score_suffix(score));
        }
    }
}

/// Run the full attach / filter / rank pipeline on a batch.
///
/// Consumes the batch and returns the surviving images in final order with
/// the parallel infotext list. Filtering retains images whose score is
/// strictly above the limit; relative order among survivors is preserved
/// going into the sort, and the sort itself is stable, so equal scores keep
/// their generation order.
///
/// # Errors
///
/// Returns [`Error::MissingScore`] if filtering is enabled, an image has no
/// attached score, and the config's policy is [`UnscoredPolicy::Reject`].
pub fn rank_batch(
    mut batch: GenerationBatch,
    table: &ScoreTable,
    config: &RankConfig,
) -> Result<RankedBatch> {
    attach_scores(&mut batch, table);

    let base_seed = batch.base_seed;
    let index_of_first_image = batch.index_of_first_image;

    let images = if config.filter_low_scores {
        let limit = config.effective_limit();
        let mut kept = Vec::with_capacity(batch.images.len());
        for (index, image) in batch.images.into_iter().enumerate() {
            match image.info.score {
                Some(score) => {
                    if score > limit {
                        kept.push(image);
                    }
                }
                None => match config.unscored_policy {
                    UnscoredPolicy::Reject => {
                        // Preview images have no seed of their own; report
                        // the run's base seed for those.
                        let seed = if index >= index_of_first_image {
                            base_seed + (index - index_of_first_image) as i64
                        } else {
                            base_seed
                        };
                        return Err(Error::MissingScore { seed });
                    }
                    UnscoredPolicy::Drop => {}
                    UnscoredPolicy::Retain => kept.push(image),
                },
            }
        }
        kept
    } else {
        batch.images
    };

    let mut pairs: Vec<(GeneratedImage, String)> = images
        .into_iter()
        .map(|img| {
            let infotext = img.info.parameters.clone();
            (img, infotext)
        })
        .collect();

    // Stable descending sort; None ranks below every Some.
    pairs.sort_by(|a, b| match (a.0.info.score, b.0.info.score) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Equal),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    let (images, infotexts): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();

    Ok(RankedBatch {
        images,
        infotexts,
        base_seed,
        index_of_first_image,
    })
}
