//! Inspect command: summarize a previously written rank report.

use std::path::PathBuf;

use anyhow::{Context, Result};
use reward_rank::RankReport;

pub fn run(input: PathBuf, verbose: bool) -> Result<()> {
    let report = RankReport::read_json(&input)
        .with_context(|| format!("Failed to read report {}", input.display()))?;

    println!("Run:        {}", report.name);
    println!("Generated:  {}", report.timestamp.to_rfc3339());
    println!("Base seed:  {}", report.base_seed);
    println!("Images:     {}", report.len());

    let scored = report.entries.iter().filter(|e| e.score.is_some()).count();
    if scored < report.len() {
        println!("Unscored:   {}", report.len() - scored);
    }
    if let Some(best) = report.best_score() {
        println!("Best score: {best:.4}");
    }
    if let Some(mean) = report.mean_score() {
        println!("Mean score: {mean:.4}");
    }

    if verbose {
        println!("Entries:");
        for entry in &report.entries {
            let score = entry
                .score
                .map_or_else(|| "unscored".to_string(), |s| format!("{s:.4}"));
            let seed = entry
                .seed
                .map_or_else(|| "-".to_string(), |s| s.to_string());
            println!("  #{:<3} seed {:<12} score {}", entry.rank, seed, score);
        }
    }

    Ok(())
}
