use std::path::Path;

use chrono::Utc;
use clap::Parser;
use tracing::info;

use upset_scanner::cli::Args;
use upset_scanner::config::Config;
use upset_scanner::error::AppError;
use upset_scanner::harvester::{ApiClient, run_scan};
use upset_scanner::logging::setup_logging;
use upset_scanner::sink::CsvSink;

/// Start of the current UTC day, in unix seconds.
fn default_since() -> i64 {
    Utc::now()
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_else(|| Utc::now().timestamp())
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Configuration operations exit before any scanning starts
    if args.list_config {
        Config::display().await?;
        return Ok(());
    }

    if let Some(new_token) = &args.new_api_token {
        let mut config = Config::load().await.unwrap_or_default();
        config.api_token = new_token.clone();
        config.validate()?;
        config.save().await?;
        println!("Config updated successfully!");
        return Ok(());
    }

    let (log_file_path, _guard) = setup_logging(&args).await?;
    info!("Logs are being written to: {log_file_path}");

    // Fail early on a missing or invalid config
    let config = Config::load().await?;

    let since = args.since.unwrap_or_else(default_since);
    info!("Scanning tournaments completed since {since}");

    let client = ApiClient::new(&config)?;
    let mut sink = CsvSink::create(Path::new(&args.output_dir)).await?;

    let summary = run_scan(&client, &mut sink, since).await?;
    sink.flush().await?;

    info!(
        "Scan finished: {} tournaments, {} events, {} upsets recorded, {} events skipped",
        summary.tournaments, summary.events, summary.records, summary.skipped_events
    );
    println!(
        "{} upsets recorded to {}",
        summary.records,
        sink.path().display()
    );

    Ok(())
}
