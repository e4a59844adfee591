// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: Extract closed wall and slab outlines from an SVG drawing
//!
//! Prints a JSON report with boundary polygons, holes, the raw segments and
//! drawing metadata. Failures print a JSON error report and exit with status 1.
//!
//! Usage:
//!   svg-to-polygons <input.svg> [options]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use formwork_extract::{extract_report, ExtractionConfig, ExtractionReport};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "svg-to-polygons", version)]
#[command(about = "Extract closed wall and slab outlines from an SVG drawing")]
struct Args {
    /// SVG drawing to process
    input: PathBuf,

    /// JSON configuration file (missing keys keep their defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Endpoint merge distance in drawing units
    #[arg(long)]
    tolerance: Option<f64>,

    /// Minimum polygon area in square drawing units
    #[arg(long)]
    min_area: Option<f64>,

    /// Keep dimension, axis and annotation layers
    #[arg(long)]
    no_filter: bool,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,

    /// Write the report to a file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    // Logs go to stderr, stdout carries only the report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            tracing::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether extraction succeeded
fn run(args: &Args) -> Result<bool> {
    let config = load_config(args)?;

    let report = match std::fs::read_to_string(&args.input) {
        Ok(svg) => extract_report(&svg, &config),
        Err(err) => {
            let err = formwork_extract::Error::from(err);
            ExtractionReport::Failure(formwork_extract::ExtractionFailure::from_error(&err))
        }
    };

    match &report {
        ExtractionReport::Success(extraction) => tracing::info!(
            input = %args.input.display(),
            segments = extraction.metadata.segment_count,
            polygons = extraction.metadata.polygon_count,
            holes = extraction.metadata.hole_count,
            net_area = extraction.metadata.net_area,
            "extracted outlines"
        ),
        ExtractionReport::Failure(failure) => tracing::warn!(
            input = %args.input.display(),
            error = %failure.error,
            "extraction failed"
        ),
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };

    match &args.output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("writing report to {}", path.display()))?,
        None => println!("{}", json),
    }

    Ok(report.is_success())
}

/// Defaults, then the config file, then environment, then command-line flags
fn load_config(args: &Args) -> Result<ExtractionConfig> {
    let base = match &args.config {
        Some(path) => ExtractionConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ExtractionConfig::default(),
    };

    let mut config = base.with_env_overrides();
    if let Some(tolerance) = args.tolerance {
        config.reconstruct.tolerance = tolerance;
    }
    if let Some(min_area) = args.min_area {
        config.reconstruct.min_area = min_area;
    }
    if args.no_filter {
        config.apply_filter = false;
    }
    Ok(config)
}
