//! itempress CLI - compile assessment items, render widgets, bucket
//! question pools, and round-trip compiled documents against the remote
//! validator.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use itempress_core::{AssessmentItemInput, AssessmentTestInput, PoolQuestion, StimulusInput, WidgetSpec};
use itempress_qti::{compile_item, compile_stimulus, compile_test, CompiledDocument};
use itempress_validator::{RoundTripValidator, ValidatorConfig};
use itempress_widgets::render_widget;

#[derive(Parser)]
#[command(name = "itempress", version, about = "Deterministic assessment-item compiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile an input JSON file to a QTI document
    Compile {
        /// Path to the input JSON
        input: PathBuf,

        /// Document kind: item, test, or stimulus
        #[arg(long, default_value = "item")]
        kind: String,

        /// Output path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render a single widget spec JSON to its markup fragment
    Render {
        /// Path to the widget spec JSON
        input: PathBuf,

        /// Output path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Partition a question pool into diversity-balanced buckets
    Bucket {
        /// Path to a JSON array of {id, problemType} entries
        pool: PathBuf,

        /// Reproducibility seed
        #[arg(long)]
        seed: String,

        /// Number of buckets requested
        #[arg(short = 'k', long, default_value = "4")]
        buckets: usize,
    },

    /// Compile items and round-trip them against the remote validator
    Validate {
        /// Paths to item input JSON files
        inputs: Vec<PathBuf>,

        /// Base URL of the validator API
        #[arg(long, env = "ITEMPRESS_VALIDATOR_URL")]
        endpoint: String,

        /// Documents validated concurrently per batch
        #[arg(long, default_value = "10")]
        batch_size: usize,

        /// Delay between batches, in milliseconds
        #[arg(long, default_value = "500")]
        delay_ms: u64,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Mint an identifier for authored files that omit one.
///
/// Only top-level `identifier` is touched; a present value always wins.
fn ensure_identifier(raw: &str, prefix: &str) -> Result<String> {
    let mut value: serde_json::Value = serde_json::from_str(raw).context("input is not JSON")?;
    if !value.is_object() {
        // Not an object: let the schema layer produce the real diagnostic.
        return Ok(raw.to_string());
    }
    let needs_id = value
        .get("identifier")
        .and_then(serde_json::Value::as_str)
        .map_or(true, str::is_empty);
    if needs_id {
        let minted = format!("{prefix}-{}", uuid::Uuid::new_v4());
        tracing::info!("input has no identifier; minted {minted}");
        value["identifier"] = serde_json::Value::String(minted);
    }
    Ok(value.to_string())
}

fn compile_input(kind: &str, raw: &str) -> Result<CompiledDocument> {
    let document = match kind {
        "item" => {
            let raw = ensure_identifier(raw, "item")?;
            let item = AssessmentItemInput::from_json(&raw)?;
            for finding in itempress_qti::multi_entry_string_mappings(&item) {
                tracing::warn!(
                    response = %finding.response_identifier,
                    entries = finding.entry_count,
                    "string response mapping carries more than one entry"
                );
            }
            compile_item(&item)?
        }
        "test" => {
            let raw = ensure_identifier(raw, "test")?;
            let test: AssessmentTestInput = serde_json::from_str(&raw)?;
            compile_test(&test)?
        }
        "stimulus" => {
            let raw = ensure_identifier(raw, "stimulus")?;
            let stimulus: StimulusInput = serde_json::from_str(&raw)?;
            compile_stimulus(&stimulus)?
        }
        other => anyhow::bail!("unknown document kind {other}; expected item, test, or stimulus"),
    };
    Ok(document)
}

fn emit(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!("wrote {}", path.display());
        }
        None => println!("{content}"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Compile { input, kind, output } => {
            let raw = fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let document = compile_input(&kind, &raw)?;
            emit(output.as_ref(), document.xml())?;
        }

        Commands::Render { input, output } => {
            let raw = fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let spec: WidgetSpec = serde_json::from_str(&raw).context("invalid widget spec")?;
            let fragment = render_widget(&spec)?;
            emit(output.as_ref(), &fragment)?;
        }

        Commands::Bucket { pool, seed, buckets } => {
            let raw = fs::read_to_string(&pool)
                .with_context(|| format!("reading {}", pool.display()))?;
            let questions: Vec<PoolQuestion> =
                serde_json::from_str(&raw).context("invalid question pool")?;
            let assignment = itempress_core::bucketize(&seed, &questions, buckets)?;
            println!("{}", serde_json::to_string_pretty(&assignment)?);
        }

        Commands::Validate { inputs, endpoint, batch_size, delay_ms } => {
            anyhow::ensure!(!inputs.is_empty(), "no input files given");

            let mut documents = Vec::with_capacity(inputs.len());
            for input in &inputs {
                let raw = fs::read_to_string(input)
                    .with_context(|| format!("reading {}", input.display()))?;
                documents.push(compile_input("item", &raw)?);
            }

            let config = ValidatorConfig::new(&endpoint)?
                .with_batch_size(batch_size)
                .with_batch_delay(Duration::from_millis(delay_ms));
            let validator = RoundTripValidator::new(reqwest::Client::new(), config);

            let reports = validator.validate_batch(&documents).await;
            let mut failed = 0usize;
            for report in &reports {
                match &report.outcome {
                    Ok(true) => println!("{}: accepted", report.identifier),
                    Ok(false) => {
                        failed += 1;
                        println!("{}: REJECTED by remote schema", report.identifier);
                    }
                    Err(e) => {
                        failed += 1;
                        println!("{}: error: {e}", report.identifier);
                    }
                }
            }
            anyhow::ensure!(failed == 0, "{failed} of {} documents failed", reports.len());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_identifier_mints_when_missing() {
        let raw = r#"{"title": "t"}"#;
        let patched = ensure_identifier(raw, "item").expect("patch");
        let value: serde_json::Value = serde_json::from_str(&patched).expect("json");
        let id = value["identifier"].as_str().expect("identifier");
        assert!(id.starts_with("item-"));
    }

    #[test]
    fn test_ensure_identifier_keeps_existing() {
        let raw = r#"{"identifier": "item-keep", "title": "t"}"#;
        let patched = ensure_identifier(raw, "item").expect("patch");
        assert!(patched.contains("item-keep"));
    }

    #[test]
    fn test_compile_input_rejects_unknown_kind() {
        assert!(compile_input("worksheet", "{}").is_err());
    }
}
