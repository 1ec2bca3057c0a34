use analytics::{AggregationEngine, MetricValue, ReportMetrics};
use api_client::{MarketDataSource, SnapshotFileSource};
use clap::{Parser, Subcommand};
use comfy_table::{Table, presets::UTF8_FULL};
use configuration::Config;
use engine::{CycleOutcome, FireSchedule, ReportPipeline, Scheduler, engine_settings};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::watch;

/// The main entry point for the crypto market reporter.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // The API key usually lives in .env; the file is optional.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => configuration::load_config_from(path)?,
        None => configuration::load_config()?,
    };
    let _log_guard = configuration::init_tracing(&config.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Run => handle_run(&config).await,
        Commands::Once => handle_once(&config).await,
        Commands::Report(args) => handle_report(args, &config).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Periodic cryptocurrency market reports from CoinMarketCap listings.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path of the configuration file (defaults to ./config.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Produce a report at every scheduled time until interrupted.
    Run,
    /// Fetch, aggregate and persist a single report now.
    Once,
    /// Aggregate a saved snapshot and print the report as JSON.
    Report(ReportArgs),
}

#[derive(Parser)]
struct ReportArgs {
    /// A saved listings response, or just its `data` array.
    #[arg(long)]
    input: PathBuf,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Runs the scheduler until Ctrl-C.
async fn handle_run(config: &Config) -> anyhow::Result<()> {
    let pipeline = ReportPipeline::from_config(config)?;
    let schedule = FireSchedule::from_config(&config.schedule)?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Interrupt received, finishing the current cycle."),
            Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl-C."),
        }
        let _ = shutdown_tx.send(true);
    });

    Scheduler::new(pipeline, schedule).run(shutdown_rx).await;
    Ok(())
}

/// Runs one cycle immediately and prints a summary of the written report.
async fn handle_once(config: &Config) -> anyhow::Result<()> {
    let pipeline = ReportPipeline::from_config(config)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message("Fetching market snapshot...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let outcome = pipeline.run_cycle().await;
    spinner.finish_and_clear();

    match outcome? {
        CycleOutcome::Written(report) => {
            println!("{}", summary_table(&report));
            println!(
                "Report appended under {}",
                config.report.output_dir.display()
            );
            Ok(())
        }
        CycleOutcome::Skipped { reason } => {
            anyhow::bail!("No market snapshot available ({reason}); nothing was written.")
        }
    }
}

/// Builds a report from a file on disk without touching the report directory.
async fn handle_report(args: ReportArgs, config: &Config) -> anyhow::Result<()> {
    let assets = SnapshotFileSource::new(args.input).fetch_snapshot().await?;
    let engine = AggregationEngine::new(engine_settings(config));
    let report = engine.build_report(&assets);

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Renders one row per metric; long lists are shortened to their head.
fn summary_table(report: &ReportMetrics) -> Table {
    const SHOWN: usize = 3;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Metric", "Value"]);

    for (key, value) in report.iter() {
        let rendered = match value {
            MetricValue::Number(n) => format!("{:.4}", n),
            MetricValue::Text(s) => s.clone(),
            MetricValue::List(items) if items.len() > SHOWN => format!(
                "{}\n(+{} more)",
                items[..SHOWN].join("\n"),
                items.len() - SHOWN
            ),
            MetricValue::List(items) => items.join("\n"),
            MetricValue::Unavailable => "unavailable".to_string(),
        };
        table.add_row(vec![key.to_string(), rendered]);
    }

    table
}
