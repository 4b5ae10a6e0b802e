//! Tournament harvesting: rate-limited API access, pagination, player
//! reconciliation and the top-level scan loop.

pub mod client;
pub mod models;
pub mod orchestrator;
pub mod pagination;
pub mod queries;
pub mod rate_limiter;
pub mod reconcile;

pub use client::{ApiClient, RetryPolicy};
pub use orchestrator::{ScanSummary, run_scan};
pub use pagination::{Page, WatermarkPager, collect_pages};
pub use rate_limiter::RateLimiter;
pub use reconcile::{Entrant, PlayerDirectory};
