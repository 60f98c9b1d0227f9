use clap::{Parser, ValueEnum};
use imgsearch::io::{load_rgba, raster_view};
use imgsearch::{Aggregation, Algorithm, DistanceConfig, MatchPoint, SearchConfig, Searcher};
use serde::Serialize;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Find every occurrence of a small image inside a larger one"
)]
struct Cli {
    /// Image to search in.
    large: PathBuf,
    /// Image to search for.
    small: PathBuf,
    /// Number of worker threads.
    workers: NonZeroUsize,
    /// Matching algorithm: `exact` or `euclidean` (case-insensitive).
    algorithm: Algorithm,
    /// How per-pixel color distances combine (euclidean only).
    #[arg(long, value_enum, default_value_t = AggregationArg::Mean)]
    aggregation: AggregationArg,
    /// Largest accepted aggregate color distance (euclidean only).
    #[arg(long, default_value_t = 0.0)]
    tolerance: f64,
    /// Print matches as JSON instead of `x,y` lines.
    #[arg(long)]
    json: bool,
    /// Enable tracing output for the search and its workers.
    #[arg(long)]
    trace: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AggregationArg {
    Sum,
    Mean,
    Max,
}

impl From<AggregationArg> for Aggregation {
    fn from(value: AggregationArg) -> Self {
        match value {
            AggregationArg::Sum => Aggregation::Sum,
            AggregationArg::Mean => Aggregation::Mean,
            AggregationArg::Max => Aggregation::Max,
        }
    }
}

#[derive(Debug, Serialize)]
struct MatchRecord {
    x: usize,
    y: usize,
}

impl From<MatchPoint> for MatchRecord {
    fn from(value: MatchPoint) -> Self {
        Self {
            x: value.x,
            y: value.y,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    count: usize,
    matches: Vec<MatchRecord>,
}

impl Cli {
    fn search_config(&self) -> SearchConfig {
        SearchConfig {
            workers: self.workers.get(),
            algorithm: self.algorithm,
            distance: DistanceConfig {
                aggregation: self.aggregation.into(),
                tolerance: self.tolerance,
            },
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("imgsearch=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    let large = load_rgba(&cli.large)?;
    let small = load_rgba(&cli.small)?;

    let searcher = Searcher::new().with_config(cli.search_config());
    let matches = searcher.find_all(raster_view(&large)?, raster_view(&small)?)?;
    tracing::info!(
        count = matches.len(),
        algorithm = searcher.config().algorithm.as_str(),
        "search finished"
    );

    if cli.json {
        let output = Output {
            count: matches.len(),
            matches: matches.into_iter().map(MatchRecord::from).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for point in &matches {
            println!("{point}");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
