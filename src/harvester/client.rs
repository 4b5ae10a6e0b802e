//! Rate-limited API client with bounded retry and outcome classification
//!
//! Two remote surfaces are served: the GraphQL endpoint (bearer-token POST,
//! throttled through the shared `RateLimiter`) and the legacy entities
//! endpoint (plain GET, not throttled). Every failed attempt produces a
//! typed `AppError`; `AppError::is_retryable` decides whether it is retried
//! with a doubling backoff up to a fixed attempt ceiling or propagated
//! immediately.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::Config;
use crate::constants::{HTTP_POOL_MAX_IDLE_PER_HOST, paging, retry};
use crate::error::AppError;
use crate::harvester::models::{
    EventGroupsData, EventParticipantsData, GraphQlEnvelope, GroupEntities, GroupEntitiesResponse,
    ParticipantNode, PhaseGroupNode, TournamentNode, TournamentsData,
};
use crate::harvester::pagination::Page;
use crate::harvester::queries;
use crate::harvester::rate_limiter::RateLimiter;

/// Creates the HTTP client with timeout handling and connection pooling.
pub fn create_http_client(timeout_seconds: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .pool_max_idle_per_host(HTTP_POOL_MAX_IDLE_PER_HOST)
        .build()
}

/// Backoff tuning for transient failures, injectable so tests run fast.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub base_delay: Duration,
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(retry::BASE_DELAY_MS),
            max_attempts: retry::MAX_ATTEMPTS,
        }
    }
}

enum CallKind<'a> {
    GraphQl(&'a serde_json::Value),
    Entities,
}

pub struct ApiClient {
    http: Client,
    auth_token: String,
    graphql_url: String,
    entities_url: String,
    limiter: RateLimiter,
    retry: RetryPolicy,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        Ok(Self {
            http: create_http_client(config.http_timeout_seconds)?,
            auth_token: config.api_token.clone(),
            graphql_url: config.graphql_url.clone(),
            entities_url: config.entities_url.trim_end_matches('/').to_string(),
            limiter: RateLimiter::from_budget(config.requests_per_minute),
            retry: RetryPolicy::default(),
        })
    }

    /// Replaces the retry policy. Intended for tests.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replaces the rate limiter. Intended for tests.
    pub fn with_limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    // --- high-level query wrappers ---

    /// One page of the past-tournament listing, lower-bounded by `since`.
    pub async fn tournaments_page(
        &self,
        page: u32,
        since: i64,
    ) -> Result<Page<TournamentNode>, AppError> {
        debug!("tournaments page {page} (since {since})");
        let variables = json!({
            "page": page,
            "perPage": paging::TOURNAMENTS_PER_PAGE,
            "since": since,
            "videogameId": crate::constants::listing::VIDEOGAME_ID,
            "eventType": crate::constants::listing::EVENT_TYPE_SINGLES,
        });
        let data: TournamentsData = self.post_graphql(queries::TOURNAMENTS_QUERY, variables).await?;
        let connection = data.tournaments.ok_or_else(|| {
            AppError::api_no_data("listing reply carried no tournaments", &self.graphql_url)
        })?;
        Ok(Page {
            nodes: connection.nodes,
            total_pages: connection.page_info.total_pages,
        })
    }

    /// Bracket groups of one event.
    pub async fn event_groups(&self, event_id: i64) -> Result<Vec<PhaseGroupNode>, AppError> {
        let variables = json!({ "id": event_id });
        let data: EventGroupsData = self
            .post_graphql(queries::EVENT_GROUPS_QUERY, variables)
            .await?;
        let event = data.event.ok_or_else(|| {
            AppError::api_no_data(format!("event {event_id} not found"), &self.graphql_url)
        })?;
        Ok(event.phase_groups)
    }

    /// One page of the participants lookup for an event.
    pub async fn participants_page(
        &self,
        event_id: i64,
        page: u32,
    ) -> Result<Page<ParticipantNode>, AppError> {
        debug!("event id: {event_id}, participants page {page}");
        let variables = json!({
            "id": event_id,
            "page": page,
            "perPage": paging::PARTICIPANTS_PER_PAGE,
        });
        let data: EventParticipantsData = self
            .post_graphql(queries::EVENT_PARTICIPANTS_QUERY, variables)
            .await?;
        let connection = data
            .event
            .and_then(|event| event.participants)
            .ok_or_else(|| {
                AppError::api_no_data(
                    format!("event {event_id} carried no participants"),
                    &self.graphql_url,
                )
            })?;
        Ok(Page {
            nodes: connection.nodes,
            total_pages: connection.page_info.total_pages,
        })
    }

    /// Seeds and sets of one bracket group, from the entities endpoint.
    pub async fn group_entities(&self, group_id: i64) -> Result<GroupEntities, AppError> {
        let url = format!(
            "{}/phase_group/{group_id}?expand[]=seeds&expand[]=sets",
            self.entities_url
        );
        let response: GroupEntitiesResponse = self.call(CallKind::Entities, &url).await?;
        Ok(response.entities)
    }

    // --- transport ---

    /// Executes a GraphQL call with retry, returning the `data` payload
    /// deserialized into `T`.
    pub async fn post_graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, AppError> {
        let body = json!({ "query": query, "variables": variables });
        let url = self.graphql_url.clone();
        self.call(CallKind::GraphQl(&body), &url).await
    }

    /// Bounded retry loop shared by both endpoints. GraphQL calls pass
    /// through the rate limiter before every attempt; entities calls do not.
    /// Retry eligibility is decided by `AppError::is_retryable`.
    async fn call<T: DeserializeOwned>(&self, kind: CallKind<'_>, url: &str) -> Result<T, AppError> {
        let mut delay = self.retry.base_delay;
        for attempt in 1..=self.retry.max_attempts {
            if matches!(kind, CallKind::GraphQl(_)) {
                self.limiter.acquire().await;
            }
            match self.send_once::<T>(&kind, url).await {
                Ok(value) => return Ok(value),
                Err(error) if error.is_retryable() => {
                    if attempt == self.retry.max_attempts {
                        break;
                    }
                    warn!(
                        "Transient failure for {url}: {error}. Retrying in {delay:?} (attempt {attempt}/{})",
                        self.retry.max_attempts
                    );
                    tokio::time::sleep(delay).await;
                    delay = delay.saturating_mul(2);
                }
                Err(error) => return Err(error),
            }
        }
        Err(AppError::retries_exhausted(self.retry.max_attempts, url))
    }

    async fn send_once<T: DeserializeOwned>(
        &self,
        kind: &CallKind<'_>,
        url: &str,
    ) -> Result<T, AppError> {
        let request = match kind {
            CallKind::GraphQl(body) => self
                .http
                .post(url)
                .bearer_auth(&self.auth_token)
                .json(body),
            CallKind::Entities => self.http.get(url),
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => return Err(AppError::network_timeout(url)),
            Err(e) if e.is_connect() => {
                return Err(AppError::network_connection(url, e.to_string()));
            }
            Err(e) => return Err(AppError::ApiFetch(e)),
        };

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let reason = status.canonical_reason().unwrap_or("Unknown error");
            return Err(match status_code {
                404 => AppError::api_not_found(url),
                400..=499 => AppError::api_client_error(status_code, reason, url),
                _ => AppError::api_server_error(status_code, reason, url),
            });
        }

        let body = response.text().await.map_err(|e| {
            AppError::api_unexpected_structure(format!("unreadable response body: {e}"), url)
        })?;
        debug!("Response length: {} bytes", body.len());

        match kind {
            CallKind::GraphQl(_) => self.decode_graphql(&body, url),
            // A 2xx body without the entities envelope is a transient
            // server-side hiccup, same as a missing GraphQL data field
            CallKind::Entities => serde_json::from_str::<T>(&body).map_err(|e| {
                AppError::api_unexpected_structure(
                    format!("response lacked the entities envelope: {e}"),
                    url,
                )
            }),
        }
    }

    fn decode_graphql<T: DeserializeOwned>(&self, body: &str, url: &str) -> Result<T, AppError> {
        let envelope: GraphQlEnvelope = serde_json::from_str(body).map_err(|e| {
            AppError::api_unexpected_structure(format!("malformed envelope: {e}"), url)
        })?;
        if let Some(errors) = &envelope.errors {
            if !errors.is_empty() {
                let message = errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(AppError::graphql_errors(message, url));
            }
        }
        let Some(data) = envelope.data else {
            return Err(AppError::api_no_data(
                "response carried neither data nor errors",
                url,
            ));
        };
        serde_json::from_value::<T>(data).map_err(|e| {
            AppError::api_unexpected_structure(format!("unexpected data shape: {e}"), url)
        })
    }
}
