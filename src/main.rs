use analytics::{AnalyticsEngine, RunSummary};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::{ConfigOverrides, Settings};
use std::path::PathBuf;
use std::process::ExitCode;

mod telemetry;

use telemetry::Telemetry;

/// The main entry point for the supply-chain KPI pipeline.
fn main() -> ExitCode {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    match cli.command {
        Commands::Run(args) => handle_run(args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Computes the weekly supply-chain KPIs from the demand, inventory, product
/// master and sales extracts.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the inputs, compute every KPI and write the result files.
    Run(RunArgs),
}

#[derive(Parser)]
struct RunArgs {
    /// TOML configuration file (defaults to an optional `supply-kpi.toml`).
    #[arg(long, short)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: ConfigOverrides,
}

// ==============================================================================
// Run Command Logic
// ==============================================================================

/// Handles the orchestration of one pipeline run and decides the exit status.
fn handle_run(args: RunArgs) -> ExitCode {
    let settings = match configuration::load_config(args.config.as_deref(), &args.overrides) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let telemetry = match Telemetry::init(&settings.log_dir) {
        Ok(telemetry) => telemetry,
        Err(e) => {
            eprintln!("Error initializing logging: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    telemetry.scope(|| {
        tracing::debug!("Data analytics process has started");
        match run_pipeline(&settings) {
            Ok(summary) => {
                tracing::debug!(
                    "Data analytics process has completed: {} files, {} rows",
                    summary.files.len(),
                    summary.total_rows()
                );
                print_summary(&summary);
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("Data analytics process has an error: {:#}", e);
                ExitCode::FAILURE
            }
        }
    })
}

fn run_pipeline(settings: &Settings) -> Result<RunSummary> {
    let engine = AnalyticsEngine::load(&settings.inputs).context("Failed to load input tables")?;

    let summary = engine
        .save_results(&settings.output_dir)
        .with_context(|| format!("Failed to save results to {}", settings.output_dir.display()))?;

    Ok(summary)
}

fn print_summary(summary: &RunSummary) {
    let mut table = Table::new();
    table.set_header(vec!["Result", "Rows", "Path"]);
    for file in &summary.files {
        table.add_row(vec![
            file.file_name.to_string(),
            file.rows.to_string(),
            file.path.display().to_string(),
        ]);
    }
    println!("{table}");
}
