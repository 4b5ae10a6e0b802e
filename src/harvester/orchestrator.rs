//! Top-level scan loop: watermark passes over the tournament listing, then
//! per event the bracket-group fan-out, reconciliation and upset detection.
//!
//! Everything is strictly sequential except the group detail fetches of a
//! single event, which are issued all at once and awaited together. That
//! keeps the listing order intact for the watermark and leaves the shared
//! player directory free of concurrent writers: reconciliation runs after
//! the fan-out has completed.

use futures::future::try_join_all;
use tracing::{debug, error, info};

use crate::error::AppError;
use crate::harvester::client::ApiClient;
use crate::harvester::models::{EventNode, TournamentNode};
use crate::harvester::pagination::WatermarkPager;
use crate::harvester::reconcile::{PlayerDirectory, resolve_entrants};
use crate::sink::CsvSink;
use crate::upsets::{UpsetRecord, detect_upset};

/// Counters reported when a scan finishes.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ScanSummary {
    pub tournaments: usize,
    pub events: usize,
    pub records: usize,
    pub skipped_events: usize,
}

/// Runs a full scan from `since` (unix seconds) until the listing is
/// exhausted, writing every qualifying upset to the sink.
///
/// A fatal error while processing one event is logged and the event
/// skipped; errors from the listing itself, or from the sink, abort the
/// run.
pub async fn run_scan(
    client: &ApiClient,
    sink: &mut CsvSink,
    since: i64,
) -> Result<ScanSummary, AppError> {
    let mut directory = PlayerDirectory::new();
    let mut pager = WatermarkPager::new(since);
    let mut summary = ScanSummary::default();

    loop {
        let (tournaments, exhausted) = pager
            .run_pass(|page, since| client.tournaments_page(page, since))
            .await?;
        info!(
            "Listing pass returned {} tournaments (watermark {})",
            tournaments.len(),
            pager.since()
        );

        for tournament in tournaments {
            summary.tournaments += 1;
            debug!("Scanning {} ({})", tournament.name, tournament.slug);
            for event in &tournament.events {
                summary.events += 1;
                match scan_event(client, &mut directory, &tournament, event).await {
                    Ok(records) => {
                        for record in &records {
                            info!(
                                "{} ({}), {} seed upset {} ({}), {} seed (factor: {}) at {} - {}",
                                record.winner_name,
                                record.winner_pronouns,
                                record.winner_seed,
                                record.opponent_name,
                                record.opponent_pronouns,
                                record.opponent_seed,
                                record.factor,
                                record.tournament_name,
                                record.event_name,
                            );
                            sink.write_record(record).await?;
                        }
                        summary.records += records.len();
                    }
                    Err(e) => {
                        error!(
                            "Skipping event {} of {}: {e}",
                            event.name, tournament.name
                        );
                        summary.skipped_events += 1;
                    }
                }
            }
        }

        if exhausted {
            break;
        }
    }

    Ok(summary)
}

/// Scans one event: bracket groups via GraphQL, group detail concurrently
/// from the entities endpoint, then reconciliation and set scanning.
async fn scan_event(
    client: &ApiClient,
    directory: &mut PlayerDirectory,
    tournament: &TournamentNode,
    event: &EventNode,
) -> Result<Vec<UpsetRecord>, AppError> {
    debug!("event id: {}, fetching bracket groups", event.id);
    let groups = client.event_groups(event.id).await?;
    if groups.is_empty() {
        return Ok(Vec::new());
    }

    // The only fan-out point: all group details at once, no concurrency cap
    let details = try_join_all(groups.iter().map(|group| client.group_entities(group.id))).await?;

    let mut seeds = Vec::new();
    let mut sets = Vec::new();
    for detail in details {
        seeds.extend(detail.seeds);
        sets.extend(detail.sets);
    }
    debug!(
        "event id: {}, {} seeds and {} sets across {} groups",
        event.id,
        seeds.len(),
        sets.len(),
        groups.len()
    );

    let entrants = resolve_entrants(client, directory, event.id, &seeds).await?;

    let mut records = Vec::new();
    for set in &sets {
        if let Some(record) = detect_upset(
            set,
            &entrants,
            &tournament.name,
            &event.name,
            tournament.start_at,
        ) {
            records.push(record);
        }
    }
    Ok(records)
}
