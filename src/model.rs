//! Preference-model lifecycle management.
//!
//! The scoring model itself is external; callers hand this module a loader
//! callback and get back a [`PreferenceModel`] that loads lazily on first
//! use, stays cached for the rest of the process, and can be unloaded on
//! demand. The loaded model is expensive (the reference ImageReward-v1.0
//! weights take roughly 1.6 GB of memory), which is why load is deferred
//! until a score is actually requested.

use crate::error::{Error, Result};
use crate::image::ImageData;

/// Scoring callback type.
///
/// Takes the generation prompt and the image, returns the scalar preference
/// score (higher is better; the reference model's range is roughly -2..2).
pub type ScoreFn = Box<dyn Fn(&str, &ImageData) -> std::result::Result<f64, String> + Send + Sync>;

/// Loader callback type.
///
/// Performs the expensive model load and returns the scoring callback, or a
/// message describing why the load failed.
pub type LoadFn = Box<dyn Fn() -> std::result::Result<ScoreFn, String> + Send + Sync>;

/// Lazily loaded, explicitly unloadable scoring model.
///
/// The loaded/unloaded distinction is a plain `Option` rather than a
/// presence probe on shared state: [`Self::is_loaded`] answers it directly
/// and [`Self::unload`] releases the resource.
pub struct PreferenceModel {
    id: String,
    loader: LoadFn,
    scorer: Option<ScoreFn>,
}

impl PreferenceModel {
    /// Create an unloaded model handle.
    ///
    /// `id` names the model in error messages (e.g. `"ImageReward-v1.0"`).
    #[must_use]
    pub fn new(id: impl Into<String>, loader: LoadFn) -> Self {
        Self {
            id: id.into(),
            loader,
            scorer: None,
        }
    }

    /// Model identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the model is currently resident.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.scorer.is_some()
    }

    /// Load the model now if it is not already resident.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelLoad`] if the loader fails; the handle stays
    /// unloaded and a later call will try again from scratch.
    pub fn ensure_loaded(&mut self) -> Result<()> {
        if self.scorer.is_none() {
            let scorer = (self.loader)().map_err(|reason| Error::ModelLoad {
                model: self.id.clone(),
                reason,
            })?;
            self.scorer = Some(scorer);
        }
        Ok(())
    }

    /// Score an image against its prompt, loading the model first if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelLoad`] if the lazy load fails, or
    /// [`Error::Scoring`] if the scoring callback reports a failure.
    pub fn score(&mut self, prompt: &str, image: &ImageData, seed: i64) -> Result<f64> {
        self.ensure_loaded()?;
        let scorer = self.scorer.as_ref().ok_or_else(|| Error::ModelLoad {
            model: self.id.clone(),
            reason: "loader returned without a scorer".to_string(),
        })?;
        scorer(prompt, image).map_err(|reason| Error::Scoring { seed, reason })
    }

    /// Release the loaded model. A later [`Self::score`] call reloads it.
    pub fn unload(&mut self) {
        self.scorer = None;
    }
}

impl std::fmt::Debug for PreferenceModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceModel")
            .field("id", &self.id)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn test_image() -> ImageData {
        ImageData::from_rgb_bytes(vec![0; 8 * 8 * 3], 8, 8)
    }

    #[test]
    fn test_lazy_load_happens_once() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&loads);
        let mut model = PreferenceModel::new(
            "test-model",
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(|_: &str, _: &ImageData| Ok(0.5)) as ScoreFn)
            }),
        );

        assert!(!model.is_loaded());
        let img = test_image();
        assert_eq!(model.score("a cat", &img, 1).unwrap(), 0.5);
        assert_eq!(model.score("a cat", &img, 2).unwrap(), 0.5);
        assert!(model.is_loaded());
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unload_then_reload() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&loads);
        let mut model = PreferenceModel::new(
            "test-model",
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(|_: &str, _: &ImageData| Ok(1.0)) as ScoreFn)
            }),
        );

        let img = test_image();
        model.score("p", &img, 1).unwrap();
        model.unload();
        assert!(!model.is_loaded());
        model.score("p", &img, 2).unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_load_failure_propagates() {
        let mut model = PreferenceModel::new(
            "broken",
            Box::new(|| Err("checkpoint not found".to_string())),
        );
        let img = test_image();
        let err = model.score("p", &img, 9).unwrap_err();
        assert!(matches!(err, Error::ModelLoad { .. }));
        assert!(!model.is_loaded());
    }

    #[test]
    fn test_scoring_failure_carries_seed() {
        let mut model = PreferenceModel::new(
            "test-model",
            Box::new(|| {
                Ok(Box::new(|_: &str, _: &ImageData| Err("OOM".to_string())) as ScoreFn)
            }),
        );
        let img = test_image();
        match model.score("p", &img, 42).unwrap_err() {
            Error::Scoring { seed, .. } => assert_eq!(seed, 42),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
