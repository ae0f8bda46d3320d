use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use cacheplan_core::io::submission;
use cacheplan_core::optimize::solvers::exhaustive::ExhaustiveSolver;
use cacheplan_core::{plan, Configuration, Instance};

#[derive(Parser)]
#[command(
    name = "cacheplan",
    about = "Cache placement and request routing optimizer",
    version
)]
struct Cli {
    /// Path to the instance file
    instance: PathBuf,
    /// Where the submission is written
    #[arg(short, long, default_value = "videos.out")]
    output: PathBuf,
    /// Write a JSON solve report to this path
    #[arg(long)]
    report: Option<PathBuf>,
    /// Wall-clock limit in seconds
    #[arg(long)]
    time_limit: Option<f64>,
    /// Relative optimality gap tolerance
    #[arg(long)]
    gap: Option<f64>,
    /// Seconds the gap may stay flat before the search is stopped
    #[arg(long)]
    stability_window: Option<f64>,
    /// Variable limit for the built-in enumeration backend
    #[arg(long, default_value_t = 24)]
    max_enum_vars: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cacheplan=info".parse()?)
                .add_directive("cacheplan_core=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Configuration::default();
    if let Some(time_limit) = cli.time_limit {
        config.time_limit = time_limit;
    }
    if let Some(gap) = cli.gap {
        config.gap_tolerance = gap;
    }
    if let Some(window) = cli.stability_window {
        config.stability_window = window;
    }

    let instance = Instance::read(&cli.instance)
        .with_context(|| format!("failed to load instance {}", cli.instance.display()))?;
    info!(
        videos = instance.video_count(),
        endpoints = instance.endpoint_count(),
        requests = instance.request_count(),
        caches = instance.cache_count,
        capacity = instance.cache_capacity,
        "instance loaded"
    );

    let mut solver = ExhaustiveSolver::with_max_variables(cli.max_enum_vars);
    let (solution, report) = plan(&instance, &mut solver, &config)?;

    submission::write_submission_file(&solution, &cli.output)
        .with_context(|| format!("failed to write submission {}", cli.output.display()))?;
    if let Some(path) = &cli.report {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report {}", path.display()))?;
    }

    info!(
        status = ?report.status,
        objective = report.objective_value,
        caches_used = solution.cache_count(),
        output = %cli.output.display(),
        "submission written"
    );
    Ok(())
}
