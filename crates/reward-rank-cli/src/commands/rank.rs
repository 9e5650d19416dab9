//! Rank command: filter and re-order a batch manifest by score.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use reward_rank::{
    rank_batch, GeneratedImage, GenerationBatch, ImageData, RankConfig, RankReport, ScoreTable,
    UnscoredPolicy,
};

/// One image entry in a batch manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestImage {
    /// Caption / generation-parameters text.
    pub caption: String,

    /// Recorded preference score, if the image was scored.
    pub score: Option<f64>,
}

/// A batch manifest: a generation run's captions and recorded scores,
/// dumped by the host for offline ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchManifest {
    /// Run name.
    #[serde(default)]
    pub name: Option<String>,

    /// Base seed of the run.
    pub base_seed: i64,

    /// Offset of the first individually seeded output image.
    #[serde(default)]
    pub index_of_first_image: usize,

    /// Images in generation order.
    pub images: Vec<ManifestImage>,
}

impl BatchManifest {
    /// Read a manifest from JSON.
    pub fn read(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse manifest {}", path.display()))
    }
}

/// Placeholder pixels for manifest entries; offline ranking never touches
/// the pixel payload.
fn placeholder_pixels() -> ImageData {
    ImageData::from_rgb_bytes(vec![0; 3], 1, 1)
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    input: PathBuf,
    output: Option<PathBuf>,
    csv: Option<PathBuf>,
    filter: bool,
    limit: &str,
    unscored: UnscoredPolicy,
    name: Option<String>,
    verbose: bool,
) -> Result<()> {
    if verbose {
        eprintln!("Ranking manifest: {}", input.display());
    }

    let manifest = BatchManifest::read(&input)?;
    let run_name = name
        .or_else(|| manifest.name.clone())
        .unwrap_or_else(|| "batch".to_string());

    // Rebuild the score table from the manifest's per-position scores.
    let mut table = ScoreTable::new();
    let images: Vec<GeneratedImage> = manifest
        .images
        .iter()
        .map(|entry| GeneratedImage::new(placeholder_pixels(), entry.caption.clone()))
        .collect();
    let batch = GenerationBatch::new(images, manifest.base_seed, manifest.index_of_first_image);
    for (index, entry) in manifest.images.iter().enumerate() {
        if let (Some(seed), Some(score)) = (batch.seed_at(index), entry.score) {
            table.insert(seed, score);
        }
    }

    let config = RankConfig::from_ui(filter, limit)
        .context("Invalid --limit value")?
        .with_unscored_policy(unscored);

    let ranked = rank_batch(batch, &table, &config).context("Ranking failed")?;
    let report = RankReport::from_ranked(run_name, &ranked);

    println!("Ranked {} of {} images", report.len(), manifest.images.len());
    if let Some(best) = report.best_score() {
        println!("Best score:  {best:.4}");
    }
    if let Some(mean) = report.mean_score() {
        println!("Mean score:  {mean:.4}");
    }
    if verbose {
        for entry in &report.entries {
            let score = entry
                .score
                .map_or_else(|| "unscored".to_string(), |s| format!("{s:.4}"));
            println!("  #{} [{}] {}", entry.rank, score, entry.infotext);
        }
    }

    if let Some(path) = output {
        report
            .write_json(&path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        println!("Saved report: {}", path.display());
    }
    if let Some(path) = csv {
        report
            .write_csv(&path)
            .with_context(|| format!("Failed to write CSV to {}", path.display()))?;
        println!("Saved CSV: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_parse() {
        let json = r#"{
            "base_seed": 10,
            "index_of_first_image": 1,
            "images": [
                {"caption": "grid", "score": null},
                {"caption": "a, Seed: 10", "score": 0.8},
                {"caption": "b, Seed: 11", "score": 0.2}
            ]
        }"#;
        let manifest: BatchManifest = serde_json::from_str(json).unwrap();
        assert_eq!(manifest.base_seed, 10);
        assert_eq!(manifest.index_of_first_image, 1);
        assert_eq!(manifest.images.len(), 3);
        assert_eq!(manifest.images[1].score, Some(0.8));
    }

    #[test]
    fn test_rank_command_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let manifest_path = dir.path().join("batch.json");
        let report_path = dir.path().join("report.json");

        let manifest = BatchManifest {
            name: Some("demo".to_string()),
            base_seed: 10,
            index_of_first_image: 0,
            images: vec![
                ManifestImage { caption: "a, Seed: 10".into(), score: Some(0.2) },
                ManifestImage { caption: "b, Seed: 11".into(), score: Some(0.9) },
            ],
        };
        std::fs::write(&manifest_path, serde_json::to_string(&manifest).unwrap()).unwrap();

        run(
            manifest_path,
            Some(report_path.clone()),
            None,
            false,
            "",
            UnscoredPolicy::Reject,
            None,
            false,
        )
        .unwrap();

        let report = RankReport::read_json(&report_path).unwrap();
        assert_eq!(report.name, "demo");
        assert_eq!(report.entries[0].seed, Some(11));
        assert_eq!(report.entries[0].score, Some(0.9));
    }
}
