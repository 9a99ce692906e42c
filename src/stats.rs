//! Destination statistics.
//!
//! A quick summary per destination: how many places are on record, how many
//! are flagged for review, and the best score seen. Used by `habi stats` to
//! confirm that ingest runs are accumulating rather than overwriting.

use anyhow::Result;

use crate::config::Config;
use crate::store::Destination;

/// Run the stats command: query every configured destination and print a
/// summary table.
pub async fn run_stats(config: &Config) -> Result<()> {
    println!(
        "{:<16} {:>8} {:>10} {:>10}   {}",
        "DESTINATION", "PLACES", "REVIEW", "MAX SCORE", "PATH"
    );

    for (name, dest_config) in &config.destinations {
        if !dest_config.path.exists() {
            println!(
                "{:<16} {:>8} {:>10} {:>10}   {} (not initialized)",
                name,
                "-",
                "-",
                "-",
                dest_config.path.display()
            );
            continue;
        }

        let dest = Destination::open(name, &dest_config.path).await?;
        let total = dest.count().await?;
        let review = dest.review_count().await?;
        let max_score = dest.max_score().await?;
        dest.close().await;

        println!(
            "{:<16} {:>8} {:>10} {:>10}   {}",
            name,
            total,
            review,
            max_score.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string()),
            dest_config.path.display()
        );
    }

    Ok(())
}
