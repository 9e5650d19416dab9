//! # reward-rank
//!
//! Human-preference score attachment, filtering, and ranking for generated
//! image batches.
//!
//! This library provides an **API-first design** where the caller supplies
//! the preference-scoring model as a callback (the reference model is
//! ImageReward-v1.0), and this library handles the model lifecycle, the
//! per-run score bookkeeping, and the post-processing of the finished
//! batch: scores are joined onto images by seed, written into image
//! metadata and captions, low scorers optionally filtered out, and the
//! batch stably re-ranked best-first.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use reward_rank::{PreferenceModel, RankConfig, RankSession, SaveParams};
//!
//! let model = PreferenceModel::new("ImageReward-v1.0", Box::new(|| {
//!     // Load the model (roughly 1.6 GB resident once loaded)
//!     Ok(Box::new(|prompt, image| {
//!         // Your scoring logic here
//!         Ok(score)
//!     }))
//! }));
//!
//! let mut session = RankSession::new(model, RankConfig::from_ui(true, "0.2")?);
//!
//! session.begin_run();
//! for mut save in generated_images {
//!     session.save_hook(&mut save)?;
//! }
//! let ranked = session.finish_run(batch)?;
//! ```
//!
//! ## Modules
//!
//! - [`error`]: Error types for the library
//! - [`image`]: Pixel payloads handed to scoring callbacks
//! - [`batch`]: Generation-batch data model
//! - [`scores`]: Run-scoped seed → score accumulator
//! - [`model`]: Preference-model lazy-load / unload lifecycle
//! - [`hook`]: Save-time scoring hook
//! - [`rank`]: Attach / filter / rank pipeline
//! - [`session`]: Run-scoped orchestration context
//! - [`report`]: Serializable run reports (JSON, CSV)

pub mod batch;
pub mod error;
pub mod hook;
pub mod image;
pub mod model;
pub mod rank;
pub mod report;
pub mod scores;
pub mod session;

// Re-export commonly used types
pub use batch::{GeneratedImage, GenerationBatch, ImageInfo, RankedBatch};
pub use error::{Error, Result};
pub use hook::SaveParams;
pub use image::ImageData;
pub use model::{LoadFn, PreferenceModel, ScoreFn};
pub use rank::{
    attach_scores, format_score_suffix, parse_score_limit, rank_batch, RankConfig,
    UnscoredPolicy, SCORE_SUFFIX_PREFIX,
};
pub use report::{RankEntry, RankReport};
pub use scores::ScoreTable;
pub use session::RankSession;
