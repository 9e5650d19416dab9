//! Serializable run reports.
//!
//! A [`RankReport`] captures the outcome of one ranking run — final order,
//! scores, captions — for offline inspection. Reports serialize to JSON and
//! to a flat CSV summary.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::batch::RankedBatch;
use crate::error::Result;
use crate::hook::parse_seed;

/// One image's entry in a run report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankEntry {
    /// Final position, 0 = best score.
    pub rank: usize,

    /// Image seed, when the caption text carries one.
    pub seed: Option<i64>,

    /// Attached preference score, if any.
    pub score: Option<f64>,

    /// Caption text, score suffix included.
    pub infotext: String,
}

/// Report for one ranking run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankReport {
    /// Run name or identifier.
    pub name: String,

    /// Base seed of the run.
    pub base_seed: i64,

    /// Entries in final order.
    pub entries: Vec<RankEntry>,

    /// When this report was generated.
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl RankReport {
    /// Build a report from a ranked batch.
    ///
    /// Seeds are recovered from the caption text's `Seed:` field where
    /// present; grid/preview captions without one get `None`.
    #[must_use]
    pub fn from_ranked(name: impl Into<String>, ranked: &RankedBatch) -> Self {
        let entries = ranked
            .images
            .iter()
            .zip(&ranked.infotexts)
            .enumerate()
            .map(|(rank, (image, infotext))| RankEntry {
                rank,
                seed: parse_seed(infotext).ok(),
                score: image.info.score,
                infotext: infotext.clone(),
            })
            .collect();
        Self {
            name: name.into(),
            base_seed: ranked.base_seed,
            entries,
            timestamp: chrono::Utc::now(),
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the report has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best (first-ranked) score, if any image was scored.
    #[must_use]
    pub fn best_score(&self) -> Option<f64> {
        self.entries.iter().find_map(|e| e.score)
    }

    /// Mean score over the scored entries.
    #[must_use]
    pub fn mean_score(&self) -> Option<f64> {
        let scored: Vec<f64> = self.entries.iter().filter_map(|e| e.score).collect();
        if scored.is_empty() {
            None
        } else {
            Some(scored.iter().sum::<f64>() / scored.len() as f64)
        }
    }

    /// Write the report as pretty-printed JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Read a report back from JSON.
    pub fn read_json(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Write a flat CSV summary of the entries.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record(["rank", "seed", "score", "infotext"])?;
        for entry in &self.entries {
            wtr.write_record([
                &entry.rank.to_string(),
                &entry.seed.map_or(String::new(), |s| s.to_string()),
                &entry.score.map_or(String::new(), |s| format!("{s:.4}")),
                &entry.infotext,
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
}
