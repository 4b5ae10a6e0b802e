//! Application-wide constants and configuration values
//!
//! This module centralizes endpoint locations, page sizes, retry tuning and
//! other magic numbers so they live in one place.

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Maximum number of connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 100;

/// GraphQL endpoint for the rate-limited query API
pub const DEFAULT_GRAPHQL_URL: &str = "https://api.start.gg/gql/alpha";

/// Base URL of the legacy entities endpoint serving bracket group detail
pub const DEFAULT_ENTITIES_URL: &str = "https://api.smash.gg";

/// Default request budget against the GraphQL endpoint.
/// The published limit is 80 requests per 60 seconds; 75 leaves headroom.
pub const DEFAULT_REQUESTS_PER_MINUTE: u64 = 75;

/// Score value the entities endpoint uses for a game that was never played.
/// A disqualification loss is recorded the same way.
pub const NOT_PLAYED_SCORE: i64 = -1;

/// Retry behavior for transient request failures
pub mod retry {
    /// Delay before the first retry, in milliseconds. Doubles per attempt.
    pub const BASE_DELAY_MS: u64 = 1000;

    /// Maximum number of attempts for one logical call before giving up.
    /// The ceiling keeps a persistently failing call from stalling the
    /// whole traversal.
    pub const MAX_ATTEMPTS: u32 = 10;

    /// HTTP statuses treated as transient server faults
    pub const TRANSIENT_STATUSES: [u16; 4] = [501, 502, 503, 504];
}

/// Page sizes and traversal windows
pub mod paging {
    /// Tournaments fetched per listing page
    pub const TOURNAMENTS_PER_PAGE: u32 = 500;

    /// Participants fetched per page of the pronoun lookup query
    pub const PARTICIPANTS_PER_PAGE: u32 = 332;

    /// Listing pages traversed per watermark pass. The tournament listing
    /// grows live and is too large to walk exhaustively in one pass.
    pub const LISTING_WINDOW_PAGES: u32 = 20;
}

/// Query filter constants for the tournament listing
pub mod listing {
    /// Videogame id the scan is restricted to
    pub const VIDEOGAME_ID: i64 = 1;

    /// Event type id for singles brackets
    pub const EVENT_TYPE_SINGLES: i64 = 1;
}
