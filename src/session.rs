//! Run-scoped orchestration of the scoring pipeline.
//!
//! [`RankSession`] is the explicit context object that replaces process
//! globals: it owns the lazily loaded [`PreferenceModel`], the run's
//! [`ScoreTable`], and the [`RankConfig`]. One run looks like:
//!
//! ```rust,ignore
//! use reward_rank::{RankSession, RankConfig, PreferenceModel, SaveParams};
//!
//! let model = PreferenceModel::new("ImageReward-v1.0", loader);
//! let mut session = RankSession::new(model, RankConfig::from_ui(true, "0.2")?);
//!
//! session.begin_run();
//! for mut save in generate_images() {
//!     session.save_hook(&mut save)?;   // once per image, at save time
//! }
//! let ranked = session.finish_run(batch)?;
//! ```
//!
//! The session is reusable across runs; the score table is cleared at the
//! start of each run and again once the post-processor has consumed it.
//! Invocations are serialized by the host, so the session is plain `&mut`
//! state with no locking.

use crate::batch::{GenerationBatch, RankedBatch};
use crate::error::Result;
use crate::hook::{record_score, SaveParams};
use crate::model::PreferenceModel;
use crate::rank::{rank_batch, RankConfig};
use crate::scores::ScoreTable;

/// Invocation-scope context for scoring and ranking one batch at a time.
#[derive(Debug)]
pub struct RankSession {
    model: PreferenceModel,
    scores: ScoreTable,
    config: RankConfig,
}

impl RankSession {
    /// Create a session around a model handle and ranking configuration.
    #[must_use]
    pub fn new(model: PreferenceModel, config: RankConfig) -> Self {
        Self {
            model,
            scores: ScoreTable::new(),
            config,
        }
    }

    /// Current ranking configuration.
    #[must_use]
    pub fn config(&self) -> &RankConfig {
        &self.config
    }

    /// Replace the ranking configuration for subsequent runs.
    pub fn set_config(&mut self, config: RankConfig) {
        self.config = config;
    }

    /// Number of scores recorded so far in the current run.
    #[must_use]
    pub fn recorded_scores(&self) -> usize {
        self.scores.len()
    }

    /// Whether the preference model is currently resident.
    #[must_use]
    pub fn model_loaded(&self) -> bool {
        self.model.is_loaded()
    }

    /// Start a run: drop any scores left over from a previous one.
    pub fn begin_run(&mut self) {
        self.scores.clear();
    }

    /// Save-time hook, to be invoked once per image right after generation.
    ///
    /// Scores the image, records the score by seed, and appends the score
    /// suffix to the persisted caption text.
    ///
    /// # Errors
    ///
    /// Propagates model load and scoring failures; either aborts the run.
    pub fn save_hook(&mut self, params: &mut SaveParams) -> Result<()> {
        record_score(params, &mut self.model, &mut self.scores)
    }

    /// Finish a run: post-process the completed batch and consume the
    /// score table.
    ///
    /// The table is cleared whether ranking succeeds or fails; scores never
    /// persist beyond a single run.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::Error::MissingScore`] from the low-score filter.
    pub fn finish_run(&mut self, batch: GenerationBatch) -> Result<RankedBatch> {
        let result = rank_batch(batch, &self.scores, &self.config);
        self.scores.clear();
        result
    }

    /// Release the loaded model; it reloads on the next scored image.
    pub fn unload_model(&mut self) {
        self.model.unload();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::GeneratedImage;
    use crate::image::ImageData;
    use crate::model::ScoreFn;

    fn test_image() -> ImageData {
        ImageData::from_rgb_bytes(vec![0; 4 * 4 * 3], 4, 4)
    }

    /// Model whose score is the image's first byte scaled to 0..1.
    fn byte_model() -> PreferenceModel {
        PreferenceModel::new(
            "test-model",
            Box::new(|| {
                Ok(Box::new(|_: &str, img: &ImageData| {
                    Ok(f64::from(img.rgb8()[0]) / 255.0)
                }) as ScoreFn)
            }),
        )
    }

    fn image_with_level(level: u8, caption: &str) -> (ImageData, GeneratedImage) {
        let data = ImageData::from_rgb_bytes(vec![level; 4 * 4 * 3], 4, 4);
        (data.clone(), GeneratedImage::new(data, caption))
    }

    #[test]
    fn test_full_run() {
        let mut session = RankSession::new(byte_model(), RankConfig::default());
        session.begin_run();
        assert!(!session.model_loaded());

        // three output images, seeds 100..=102, brightness 51, 204, 102
        let levels = [51u8, 204, 102];
        let mut generated = Vec::new();
        for (offset, &level) in levels.iter().enumerate() {
            let seed = 100 + offset as i64;
            let caption = format!("a cat, Seed: {seed}");
            let (data, img) = image_with_level(level, &caption);
            let mut save = SaveParams::new("a cat", seed, data, caption.clone());
            session.save_hook(&mut save).unwrap();
            // the persisted pnginfo text carries the suffix already; the
            // in-memory batch caption gets its own copy in finish_run
            assert!(save.parameters.starts_with(&caption));
            generated.push(img);
        }

        assert!(session.model_loaded());
        assert_eq!(session.recorded_scores(), 3);

        let batch = GenerationBatch::new(generated, 100, 0);
        let ranked = session.finish_run(batch).unwrap();

        // 204 (0.8) first, then 102 (0.4), then 51 (0.2)
        let order: Vec<Option<f64>> = ranked.images.iter().map(|i| i.info.score).collect();
        assert_eq!(order, vec![Some(0.8), Some(0.4), Some(0.2)]);
        assert!(ranked.infotexts[0].contains("Seed: 101"));

        // table consumed at run end
        assert_eq!(session.recorded_scores(), 0);
    }

    #[test]
    fn test_save_hook_caption_carries_score() {
        let mut session = RankSession::new(byte_model(), RankConfig::default());
        session.begin_run();
        let (data, _) = image_with_level(255, "x");
        let mut save = SaveParams::new("p", 5, data, "p, Seed: 5");
        session.save_hook(&mut save).unwrap();
        assert!(save.parameters.ends_with(", ImageReward Score: 1.0000"));
    }

    #[test]
    fn test_begin_run_clears_previous_scores() {
        let mut session = RankSession::new(byte_model(), RankConfig::default());
        session.begin_run();
        let (data, _) = image_with_level(10, "x");
        let mut save = SaveParams::new("p", 1, data, "p, Seed: 1");
        session.save_hook(&mut save).unwrap();
        assert_eq!(session.recorded_scores(), 1);

        session.begin_run();
        assert_eq!(session.recorded_scores(), 0);
    }

    #[test]
    fn test_unload_model() {
        let mut session = RankSession::new(byte_model(), RankConfig::default());
        session.begin_run();
        let (data, _) = image_with_level(10, "x");
        let mut save = SaveParams::new("p", 1, data, "p, Seed: 1");
        session.save_hook(&mut save).unwrap();
        assert!(session.model_loaded());

        session.unload_model();
        assert!(!session.model_loaded());
    }

    #[test]
    fn test_filter_failure_still_clears_table() {
        let config = RankConfig::from_ui(true, "0").unwrap();
        let mut session = RankSession::new(byte_model(), config);
        session.begin_run();

        // one image saved, but the batch claims two output images
        let (data, img) = image_with_level(128, "a, Seed: 50");
        let mut save = SaveParams::new("a", 50, data, "a, Seed: 50");
        session.save_hook(&mut save).unwrap();
        let (_, unsaved) = image_with_level(128, "a, Seed: 51");
        let batch = GenerationBatch::new(vec![img, unsaved], 50, 0);

        assert!(session.finish_run(batch).is_err());
        assert_eq!(session.recorded_scores(), 0);
    }
}
