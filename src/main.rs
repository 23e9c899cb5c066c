use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use seatmap_parser::{Dialect, ExtractionConfig, FlightRecord, MissingValuePolicy, SeatMapExtractor};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Convert an OTA or EDIST seat map document into normalized JSON
#[derive(Debug, Parser)]
struct Args {
    /// Seat map XML file
    input: PathBuf,

    /// Where to write the JSON, defaults to <input>_parsed.json
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip content detection and read the document as this dialect (ota, edist)
    #[arg(long)]
    dialect: Option<Dialect>,

    /// How absent optional attributes are written (null, omit, na)
    #[arg(long, default_value = "null")]
    missing_values: MissingValuePolicy,

    /// Fail when a seat id appears twice
    #[arg(long)]
    validate_ids: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(output) => {
            info!("Wrote {}", output.display());
            println!("Seatmap file parsed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error: {e:?}");
            println!("Seatmap file could not be parsed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<PathBuf> {
    let raw = fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let extractor = SeatMapExtractor::with_config(ExtractionConfig {
        missing_values: args.missing_values,
        validate_unique_seat_ids: args.validate_ids,
    });
    let flight = match args.dialect {
        Some(dialect) => extractor.extract_as(&raw, dialect),
        None => extractor.extract(&raw),
    }
    .with_context(|| format!("failed to extract {}", args.input.display()))?;

    let output = args
        .output
        .unwrap_or_else(|| default_output_path(&args.input));
    fs::write(&output, to_json(&flight)?)
        .with_context(|| format!("failed to write {}", output.display()))?;
    Ok(output)
}

// seatmap1.xml -> seatmap1_parsed.json
fn default_output_path(input: &Path) -> PathBuf {
    let text = input.to_string_lossy();
    match text.strip_suffix(".xml") {
        Some(stem) => PathBuf::from(format!("{stem}_parsed.json")),
        None => PathBuf::from(format!("{text}_parsed.json")),
    }
}

fn to_json(flight: &FlightRecord) -> anyhow::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    flight.serialize(&mut serializer)?;
    Ok(buffer)
}
