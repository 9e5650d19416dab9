//! Save-time scoring hook.
//!
//! The host invokes [`record_score`] once per image immediately after
//! generation, before the batch post-processor runs. The hook scores the
//! image against its prompt, records the score in the run's [`ScoreTable`]
//! keyed by seed, and appends the score suffix to the caption text that the
//! host persists with the saved file.

use crate::error::{Error, Result};
use crate::image::ImageData;
use crate::model::PreferenceModel;
use crate::rank::format_score_suffix;
use crate::scores::ScoreTable;

/// Parameters for one image save, as handed over by the host.
#[derive(Debug, Clone)]
pub struct SaveParams {
    /// Generation prompt the image was produced from.
    pub prompt: String,

    /// Seed of this image.
    pub seed: i64,

    /// The image being saved.
    pub image: ImageData,

    /// Caption text persisted with the file; mutated in place by the hook.
    pub parameters: String,
}

impl SaveParams {
    /// Create save parameters with an explicit seed.
    #[must_use]
    pub fn new(
        prompt: impl Into<String>,
        seed: i64,
        image: ImageData,
        parameters: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            seed,
            image,
            parameters: parameters.into(),
        }
    }

    /// Create save parameters from hosts that only expose the persisted
    /// caption text, extracting the seed from its `Seed: <n>` field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SeedNotFound`] if the text has no parseable
    /// `Seed:` field.
    pub fn from_pnginfo(
        prompt: impl Into<String>,
        image: ImageData,
        parameters: impl Into<String>,
    ) -> Result<Self> {
        let parameters = parameters.into();
        let seed = parse_seed(&parameters)?;
        Ok(Self {
            prompt: prompt.into(),
            seed,
            image,
            parameters,
        })
    }
}

/// Extract the seed from a `Seed: <n>` field in caption text.
pub(crate) fn parse_seed(parameters: &str) -> Result<i64> {
    let not_found = || Error::SeedNotFound {
        text: parameters.to_string(),
    };
    let after = parameters.split("Seed: ").nth(1).ok_or_else(not_found)?;
    let digits = after.split(',').next().ok_or_else(not_found)?;
    digits.trim().parse::<i64>().map_err(|_| not_found())
}

/// Score one saved image and record the result for the batch post-processor.
///
/// Appends the formatted score suffix to `params.parameters` so the
/// persisted file carries the score even before ranking runs.
///
/// # Errors
///
/// Propagates model load and scoring failures; either aborts the run.
pub fn record_score(
    params: &mut SaveParams,
    model: &mut PreferenceModel,
    table: &mut ScoreTable,
) -> Result<()> {
    let score = model.score(&params.prompt, &params.image, params.seed)?;
    table.insert(params.seed, score);
    params.parameters.push_str(&format_score_suffix(score));
    Ok(())
}
