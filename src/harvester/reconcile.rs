//! Two-source reconciliation of entrant pronoun data
//!
//! The cheap source is the denormalized player snapshot embedded in each
//! bracket group's seed entities; it often already carries the user link
//! with pronouns. Entrants whose snapshot lacked that link fall back to the
//! authoritative paginated participants query, one batch per event, with the
//! process-wide `PlayerDirectory` consulted first so a player resolved in an
//! earlier event is never fetched again.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::error::AppError;
use crate::harvester::client::ApiClient;
use crate::harvester::models::SeedEntity;
use crate::harvester::pagination::collect_pages;

/// What is known about a player across the whole run. Presence in the
/// directory means the player has been resolved; `pronouns: None` means the
/// player was looked up and truly has none on file.
#[derive(Debug, Clone, Default)]
pub struct PlayerRecord {
    pub pronouns: Option<String>,
    pub profile_slug: Option<String>,
}

/// Process-wide player cache keyed by playerId. Never evicted; entries are
/// only added or upgraded, a resolved pronoun is never replaced with an
/// absent one. Passed explicitly through the call chain so tests can inject
/// a fresh or pre-seeded directory.
#[derive(Debug, Default)]
pub struct PlayerDirectory {
    players: HashMap<i64, PlayerRecord>,
}

impl PlayerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, player_id: i64) -> Option<&PlayerRecord> {
        self.players.get(&player_id)
    }

    pub fn contains(&self, player_id: i64) -> bool {
        self.players.contains_key(&player_id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Adds or upgrades a player record. Upgrades are monotonic: a `Some`
    /// pronoun or slug fills in a missing one, but never the reverse.
    pub fn upsert(&mut self, player_id: i64, pronouns: Option<String>, profile_slug: Option<String>) {
        let record = self.players.entry(player_id).or_default();
        if record.pronouns.is_none() {
            record.pronouns = pronouns;
        }
        if record.profile_slug.is_none() {
            record.profile_slug = profile_slug;
        }
    }
}

/// A player's participation in one event, with reconciled pronoun data.
/// Short-lived: discarded once the event's sets have been scanned.
#[derive(Debug, Clone)]
pub struct Entrant {
    pub entrant_id: i64,
    pub display_name: String,
    /// Raw seed number; `seedNum` falling back to `groupSeedNum`
    pub seed: Option<u32>,
    /// Resolved pronoun text, empty when the player has none
    pub pronouns: String,
    pub profile_slug: Option<String>,
    pub player_id: Option<i64>,
}

/// Builds the entrant map for one event from seed snapshots and the
/// directory, returning the player ids that still need the authoritative
/// lookup. Within an event the first seed entry for an entrant wins.
pub fn build_entrants(
    seeds: &[SeedEntity],
    directory: &PlayerDirectory,
) -> (HashMap<i64, Entrant>, Vec<i64>) {
    let mut entrants = HashMap::new();
    let mut pending = Vec::new();

    for seed in seeds {
        let Some(entrant_id) = seed.entrant_id else {
            continue;
        };
        if entrants.contains_key(&entrant_id) {
            continue;
        }

        let player = seed.players.first();
        let display_name = seed
            .entrant_name
            .clone()
            .or_else(|| player.and_then(|p| p.gamer_tag.clone()))
            .unwrap_or_default();

        let mut pronouns = String::new();
        let mut profile_slug = None;
        if let Some(player) = player {
            if let Some(user) = &player.user {
                // Snapshot carried the user link: fully resolved here
                pronouns = user.gender_pronoun.clone().unwrap_or_default();
                profile_slug = user.slug.clone();
            } else if let Some(record) = directory.get(player.id) {
                pronouns = record.pronouns.clone().unwrap_or_default();
                profile_slug = record.profile_slug.clone();
            } else {
                pending.push(player.id);
            }
        }

        entrants.insert(
            entrant_id,
            Entrant {
                entrant_id,
                display_name,
                seed: seed.seed_num.or(seed.group_seed_num),
                pronouns,
                profile_slug,
                player_id: player.map(|p| p.id),
            },
        );
    }

    (entrants, pending)
}

/// Patches entrants whose lookup was queued with whatever the directory now
/// holds, defaulting to an empty pronoun for players that truly have none.
pub fn patch_pending(
    entrants: &mut HashMap<i64, Entrant>,
    pending: &[i64],
    directory: &PlayerDirectory,
) {
    for entrant in entrants.values_mut() {
        let Some(player_id) = entrant.player_id else {
            continue;
        };
        if !pending.contains(&player_id) {
            continue;
        }
        if let Some(record) = directory.get(player_id) {
            entrant.pronouns = record.pronouns.clone().unwrap_or_default();
            if entrant.profile_slug.is_none() {
                entrant.profile_slug = record.profile_slug.clone();
            }
        }
    }
}

/// Resolves all entrants of one event: snapshot first, then directory, then
/// one paginated participants query for whatever is left. Snapshot-resolved
/// players are folded into the directory so later events skip the lookup.
pub async fn resolve_entrants(
    client: &ApiClient,
    directory: &mut PlayerDirectory,
    event_id: i64,
    seeds: &[SeedEntity],
) -> Result<HashMap<i64, Entrant>, AppError> {
    let (mut entrants, pending) = build_entrants(seeds, directory);

    // Fold snapshot resolutions into the directory
    for seed in seeds {
        if let Some(player) = seed.players.first() {
            if let Some(user) = &player.user {
                directory.upsert(player.id, user.gender_pronoun.clone(), user.slug.clone());
            }
        }
    }

    if pending.is_empty() {
        debug!("event id: {event_id}, all entrants resolved without lookup");
        return Ok(entrants);
    }

    info!(
        "event id: {event_id}, querying participants for {} unresolved players",
        pending.len()
    );
    let participants = collect_pages(|page| client.participants_page(event_id, page)).await?;
    for participant in participants {
        let Some(player) = participant.player else {
            continue;
        };
        match player.user {
            Some(user) => directory.upsert(player.id, user.gender_pronoun, user.slug),
            // Mark the player as known-empty so later events skip the lookup
            None => directory.upsert(player.id, None, None),
        }
    }

    patch_pending(&mut entrants, &pending, directory);
    Ok(entrants)
}
