//! Look up a runner's standing from the command line
//!
//! Usage:
//!   cargo run --bin race_lookup -- --data all_runners.csv --distance "10 км" --query ivanov
//!   cargo run --bin race_lookup -- --query ivanov --bib 104
//!   cargo run --bin race_lookup -- --overview

use anyhow::{Context, Result};
use clap::Parser;
use race_results_rust::config::DEFAULT_RESULTS_PATH;
use race_results_rust::distances::{self, cohort_choices};
use race_results_rust::report::{render_choices, render_view};
use race_results_rust::{CohortScorer, PercentileKind, RaceData, Selection, Session};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Runner standing within a race distance
#[derive(Parser, Debug)]
#[command(name = "race_lookup")]
#[command(about = "Look up a runner's rank and percentile within a race distance", long_about = None)]
struct Args {
    /// Results export (CSV or Parquet)
    #[arg(short, long, env = "RESULTS_PATH", default_value = DEFAULT_RESULTS_PATH)]
    data: String,

    /// Distance label ("16 км") or meters
    #[arg(long, env = "DEFAULT_DISTANCE", default_value = "16000")]
    distance: String,

    /// Bib number or part of a name
    #[arg(short, long, default_value = "")]
    query: String,

    /// Pick among several matches by bib
    #[arg(long)]
    bib: Option<String>,

    /// Pick among several matches by row id
    #[arg(long, conflicts_with = "bib")]
    row: Option<usize>,

    /// Percentile convention: weak, strict, mean or rank
    #[arg(long, env = "PERCENTILE_KIND", default_value = "weak")]
    percentile_kind: PercentileKind,

    /// Print every distance with its finisher count and median
    #[arg(long)]
    overview: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "race_results_rust=warn,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let data = RaceData::load(&args.data)?;

    if args.overview {
        print!("{}", render_choices(&cohort_choices(&data.table)));
        return Ok(());
    }

    let distance = distances::parse_label(&args.distance)
        .with_context(|| format!("Unknown distance '{}'", args.distance))?;

    let mut session = Session::new(f64::from(distance));
    session.set_query(args.query);
    if let Some(row) = args.row {
        session.select(Selection::Row(row));
    } else if let Some(bib) = args.bib {
        session.select(Selection::Bib(bib));
    }

    let scorer = CohortScorer::new(args.percentile_kind);
    let view = session.evaluate(&data.table, &scorer);
    print!("{}", render_view(&view));

    Ok(())
}
