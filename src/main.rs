use anyhow::Result;
use clap::Parser;
use gridmatch::{match_batch_parallel, BatchConfig, BatchStats, MatchResult, Matcher, MatcherConfig, Registry};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::AsyncReadExt;
use tracing::info;

/// Lines handed to the worker pool per progress tick
const PROGRESS_BLOCK: usize = 10_000;

#[derive(Parser, Debug)]
#[command(name = "gridmatch")]
#[command(about = "Match free-text research affiliations to GRID institute identifiers")]
#[command(version)]
struct Args {
    /// GRID registry snapshot (JSON)
    registry: PathBuf,

    /// Affiliation strings, one per line (defaults to stdin)
    #[arg(long)]
    input: Option<PathBuf>,

    /// JSON-lines output file (defaults to stdout)
    #[arg(long)]
    output: Option<PathBuf>,

    /// TOML file overriding the built-in matching tables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Worker count (defaults to the number of CPUs)
    #[arg(long)]
    workers: Option<usize>,

    /// Suppress console progress bar
    #[arg(long)]
    no_progress: bool,

    /// Stats output file path
    #[arg(long)]
    stats_out: Option<PathBuf>,
}

#[derive(Serialize)]
struct OutputLine<'a> {
    input: &'a str,
    #[serde(flatten)]
    result: &'a MatchResult,
}

#[tokio::main]
async fn main() -> Result<()> {
    // WHY: structured JSON logging on stderr keeps stdout free for results
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let args = Args::parse();

    info!("Starting gridmatch");
    info!(?args, "Parsed CLI arguments");

    let config = match &args.config {
        Some(path) => MatcherConfig::load(path).await?,
        None => MatcherConfig::default(),
    };

    let registry = Registry::load(&args.registry).await?;

    // WHY: index build is CPU-bound and runs once, keep it off the async executor
    let matcher = tokio::task::spawn_blocking(move || Matcher::from_records(&registry.institutes, &config))
        .await??;
    let matcher = Arc::new(matcher);

    let lines = read_input_lines(&args).await?;
    info!("Read {} affiliation lines", lines.len());

    let batch_config = match args.workers {
        Some(workers) => BatchConfig { workers },
        None => BatchConfig::default(),
    };

    let progress = if args.no_progress {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(lines.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} affiliations ({per_sec})")?
                .progress_chars("=> "),
        );
        bar
    };

    let start_time = Instant::now();
    let mut results = Vec::with_capacity(lines.len());
    for block in lines.chunks(PROGRESS_BLOCK) {
        let (block_results, _) =
            match_batch_parallel(Arc::clone(&matcher), block.to_vec(), &batch_config).await?;
        progress.inc(block_results.len() as u64);
        results.extend(block_results);
    }
    progress.finish_and_clear();

    let stats = BatchStats::from_results(&results, start_time.elapsed().as_millis() as u64);

    write_results(&args, &lines, &results)?;

    info!(
        "Matched {}/{} affiliations ({} country, {} global) in {}ms",
        stats.matched(),
        stats.total,
        stats.matched_country,
        stats.matched_global,
        stats.elapsed_ms
    );

    if let Some(stats_path) = &args.stats_out {
        let json = serde_json::to_string_pretty(&stats)?;
        tokio::fs::write(stats_path, json).await?;
        info!("Stats written to {}", stats_path.display());
    }

    Ok(())
}

async fn read_input_lines(args: &Args) -> Result<Vec<String>> {
    let content = match &args.input {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Input file does not exist: {}", path.display());
            }
            tokio::fs::read_to_string(path).await?
        }
        None => {
            let mut content = String::new();
            tokio::io::stdin().read_to_string(&mut content).await?;
            content
        }
    };

    Ok(content
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect())
}

fn write_results(args: &Args, lines: &[String], results: &[MatchResult]) -> Result<()> {
    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(std::io::stdout().lock()),
    };
    let mut writer = BufWriter::new(sink);

    for (input, result) in lines.iter().zip(results) {
        serde_json::to_writer(&mut writer, &OutputLine { input, result })?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    Ok(())
}
