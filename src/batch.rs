// WHY: Matching is CPU-bound and the index is immutable, so a batch splits into chunks
// matched on blocking worker tasks against one shared Matcher

use anyhow::Result;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::matcher::{MatchResult, MatchScope, Matcher};

/// Configuration for batch matching
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Number of blocking tasks the input is split across
    pub workers: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get().max(1),
        }
    }
}

/// Run statistics for one batch
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BatchStats {
    pub total: u64,
    pub matched_country: u64,
    pub matched_global: u64,
    pub unmatched: u64,
    pub elapsed_ms: u64,
    pub lines_per_sec: f64,
}

impl BatchStats {
    pub fn from_results(results: &[MatchResult], elapsed_ms: u64) -> Self {
        let mut stats = Self {
            total: results.len() as u64,
            elapsed_ms,
            ..Default::default()
        };

        for result in results {
            match result.scope {
                Some(MatchScope::Country) => stats.matched_country += 1,
                Some(MatchScope::Global) => stats.matched_global += 1,
                None => stats.unmatched += 1,
            }
        }

        stats.lines_per_sec = if elapsed_ms > 0 {
            stats.total as f64 / (elapsed_ms as f64 / 1000.0)
        } else {
            0.0
        };

        stats
    }

    pub fn matched(&self) -> u64 {
        self.matched_country + self.matched_global
    }
}

/// Match every line, preserving input order
pub async fn match_batch_parallel(
    matcher: Arc<Matcher>,
    lines: Vec<String>,
    config: &BatchConfig,
) -> Result<(Vec<MatchResult>, BatchStats)> {
    let start_time = Instant::now();

    if lines.is_empty() {
        return Ok((Vec::new(), BatchStats::default()));
    }

    let workers = config.workers.max(1);
    let chunk_size = lines.len().div_ceil(workers);

    info!("Matching {} lines across {} workers", lines.len(), workers);

    let tasks = lines
        .chunks(chunk_size)
        .map(|chunk| {
            let matcher = Arc::clone(&matcher);
            let chunk = chunk.to_vec();
            tokio::task::spawn_blocking(move || {
                chunk
                    .iter()
                    .map(|line| matcher.match_affiliation(line))
                    .collect::<Vec<_>>()
            })
        })
        .collect::<Vec<_>>();

    let chunk_results = try_join_all(tasks).await?;
    let results: Vec<MatchResult> = chunk_results.into_iter().flatten().collect();

    let stats = BatchStats::from_results(&results, start_time.elapsed().as_millis() as u64);
    info!(
        "Batch complete: {} matched ({} country, {} global), {} unmatched in {}ms",
        stats.matched(),
        stats.matched_country,
        stats.matched_global,
        stats.unmatched,
        stats.elapsed_ms
    );

    Ok((results, stats))
}
