//! Upset detection over completed sets
//!
//! A set qualifies when the lower-seeded entrant (the numerically larger
//! seed) beat an opponent at least one seed tier above them, and the
//! winner's self-declared pronouns pass the she/her filter. Incomplete sets
//! and sets without tier separation are skipped silently.

use std::collections::HashMap;

use crate::constants::NOT_PLAYED_SCORE;
use crate::harvester::models::SetEntity;
use crate::harvester::reconcile::Entrant;
use crate::tiers::tier_of;

/// One qualifying upset, in output field order.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsetRecord {
    pub winner_name: String,
    pub winner_pronouns: String,
    pub winner_seed: u32,
    pub opponent_name: String,
    pub opponent_pronouns: String,
    pub opponent_seed: u32,
    /// Absolute tier distance between the two entrants
    pub factor: u32,
    pub tournament_name: String,
    pub event_name: String,
    /// Tournament start time in milliseconds since the epoch
    pub start_at_ms: i64,
}

/// Inclusive she/her pronoun filter.
///
/// Matches on whole tokens rather than raw substrings, so the "he" inside
/// "they" cannot defeat the inclusive fallback. she/her/hers always
/// qualifies; with no he/him/his token present, an inclusive marker
/// (any/all) or they/them qualifies too.
pub fn matches_pronoun_filter(pronouns: &str) -> bool {
    let lower = pronouns.to_lowercase();
    let tokens: Vec<&str> = lower
        .split(|c: char| !c.is_alphabetic())
        .filter(|t| !t.is_empty())
        .collect();
    let has = |word: &str| tokens.iter().any(|t| *t == word);

    if has("she") || has("her") || has("hers") {
        return true;
    }
    if has("he") || has("him") || has("his") {
        return false;
    }
    has("any") || has("all") || has("they") || has("them")
}

/// Decides whether a set qualifies as an upset and builds the output record.
///
/// Returns `None` for sets that are incomplete (missing entrant, winner or
/// score), never played or decided by disqualification (the -1 score
/// sentinel), outside the tier ladder, or without tier separation, and for
/// upsets whose winner does not pass the pronoun filter.
pub fn detect_upset(
    set: &SetEntity,
    entrants: &HashMap<i64, Entrant>,
    tournament_name: &str,
    event_name: &str,
    start_at: i64,
) -> Option<UpsetRecord> {
    let entrant_a = entrants.get(&set.entrant_1_id?)?;
    let entrant_b = entrants.get(&set.entrant_2_id?)?;
    let winner_id = set.winner_id?;

    let score_a = set.entrant_1_score?;
    let score_b = set.entrant_2_score?;
    if score_a == NOT_PLAYED_SCORE || score_b == NOT_PLAYED_SCORE {
        return None;
    }

    let seed_a = entrant_a.seed?;
    let seed_b = entrant_b.seed?;
    let tier_a = tier_of(seed_a)?;
    let tier_b = tier_of(seed_b)?;
    if tier_a == tier_b {
        return None;
    }

    // Larger seed number means worse ranking
    let (underdog, underdog_tier, favorite, favorite_tier) = if seed_a > seed_b {
        (entrant_a, tier_a, entrant_b, tier_b)
    } else {
        (entrant_b, tier_b, entrant_a, tier_a)
    };

    if winner_id != underdog.entrant_id {
        return None;
    }
    if !matches_pronoun_filter(&underdog.pronouns) {
        return None;
    }

    Some(UpsetRecord {
        winner_name: underdog.display_name.clone(),
        winner_pronouns: underdog.pronouns.clone(),
        winner_seed: underdog.seed?,
        opponent_name: favorite.display_name.clone(),
        opponent_pronouns: favorite.pronouns.clone(),
        opponent_seed: favorite.seed?,
        factor: underdog_tier.abs_diff(favorite_tier) as u32,
        tournament_name: tournament_name.to_string(),
        event_name: event_name.to_string(),
        start_at_ms: start_at * 1000,
    })
}
