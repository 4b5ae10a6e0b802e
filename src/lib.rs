//! Tournament Upset Scanner Library
//!
//! This library walks a tournament listing API, reconciles player pronoun
//! data from bracket seeds and the participant roster, and detects upsets:
//! sets where a lower seed beat a higher seed across at least one seeding
//! tier. Qualifying results are written as CSV records.
//!
//! # Examples
//!
//! ```rust,no_run
//! use upset_scanner::config::Config;
//! use upset_scanner::error::AppError;
//! use upset_scanner::harvester::{ApiClient, run_scan};
//! use upset_scanner::sink::CsvSink;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = Config::load().await?;
//!     let client = ApiClient::new(&config)?;
//!     let mut sink = CsvSink::create(Path::new("csv")).await?;
//!
//!     let summary = run_scan(&client, &mut sink, 1_700_000_000).await?;
//!     sink.flush().await?;
//!     println!("{} upsets found", summary.records);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod harvester;
pub mod logging;
pub mod sink;
pub mod tiers;
pub mod upsets;

// Re-export commonly used types for convenience
pub use config::Config;
pub use error::AppError;
pub use harvester::{ApiClient, RateLimiter, RetryPolicy, ScanSummary, run_scan};
pub use sink::CsvSink;
pub use tiers::{SEED_FLOORS, tier_of};
pub use upsets::{UpsetRecord, detect_upset};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
