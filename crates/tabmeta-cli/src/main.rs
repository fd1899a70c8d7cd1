//! tabmeta CLI - bulk metadata application from tabular files.

mod wizard;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tabmeta::error::EXIT_PARTIAL_FAILURE;
use tabmeta::{BatchRunner, Config, Dataset, RunReport, SnapshotStore, TabmetaError};
use tracing::{info, Level};
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser)]
#[command(name = "tabmeta")]
#[command(about = "Apply metadata from tabular files to a hierarchical object store")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Output JSON report to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply metadata from a tabular file to the objects in a store snapshot
    Run {
        /// Tabular source file (.xlsx, .csv or .tsv)
        #[arg(long)]
        data: PathBuf,

        /// Object store snapshot (JSON)
        #[arg(long)]
        store: PathBuf,

        /// Dry run: resolve and check every row without writing metadata
        #[arg(long)]
        dry_run: bool,
    },

    /// Create a configuration file interactively
    Setup {
        /// Output path for the configuration file [default: config.yaml]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Tabular source file used to offer sheet and column choices
        #[arg(long)]
        data: Option<PathBuf>,

        /// Force overwrite existing file without confirmation
        #[arg(long, short)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, TabmetaError> {
    let cli = Cli::parse();

    // Handle setup separately: no logging so the terminal stays clean for
    // the interactive prompts, and no existing config is needed.
    if let Commands::Setup { output, data, force } = cli.command {
        let output_path = output.unwrap_or_else(|| PathBuf::from("config.yaml"));
        wizard::run_wizard(&output_path, data.as_deref(), force)
            .map_err(|e| TabmetaError::Config(e.to_string()))?;
        return Ok(ExitCode::SUCCESS);
    }

    setup_logging(&cli.verbosity, &cli.log_format);

    let config = Config::load(&cli.config)?;
    info!("Loaded configuration from {:?}", cli.config);

    match cli.command {
        Commands::Setup { .. } => unreachable!(), // Handled above
        Commands::Run {
            data,
            store,
            dry_run,
        } => {
            let dataset = Dataset::load(&data, &config.separator)?;
            info!(
                "Loaded {} sheet(s) from {:?}",
                dataset.sheets.len(),
                data
            );

            let snapshot = SnapshotStore::load(&store)?;
            let report = BatchRunner::new(&config, &snapshot)
                .run(&dataset, dry_run)
                .await?;

            if !dry_run {
                snapshot.save().await?;
            }

            if cli.output_json {
                println!("{}", report.to_json()?);
            } else {
                print_summary(&report);
            }

            if report.has_errors() {
                return Ok(ExitCode::from(EXIT_PARTIAL_FAILURE));
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_summary(report: &RunReport) {
    let status_msg = if report.dry_run {
        "Dry run completed!"
    } else {
        "Run completed!"
    };
    println!("\n{}", status_msg);
    println!("  Duration: {:.2}s", report.duration_seconds);
    for sheet in &report.sheets {
        println!(
            "  {}: {} applied, {} errors (attributes: {})",
            sheet.sheet,
            sheet.applied,
            sheet.errors,
            sheet.attribute_keys.join(", ")
        );
        for failure in &sheet.failures {
            println!("    failed {}: {}", failure.path, failure.reason);
        }
    }
    println!(
        "  Total: {} applied, {} errors",
        report.total_applied(),
        report.total_errors()
    );
}

fn setup_logging(verbosity: &str, format: &str) {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
