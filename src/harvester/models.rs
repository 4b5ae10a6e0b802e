//! Serde models for the GraphQL and entities API payloads
//!
//! The query API wraps everything in the usual GraphQL envelope; the legacy
//! group-detail endpoint returns a denormalized `entities` envelope instead.
//! Field shapes here mirror the remote schemas, which this crate depends on
//! but does not own.

use serde::Deserialize;

use crate::harvester::pagination::Watermarked;

/// Top-level GraphQL response envelope
#[derive(Debug, Deserialize)]
pub struct GraphQlEnvelope {
    pub data: Option<serde_json::Value>,
    pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total_pages: u32,
}

/// Paginated connection as returned by every list-shaped query
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub page_info: PageInfo,
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
}

// --- tournament listing ---

#[derive(Debug, Deserialize)]
pub struct TournamentsData {
    pub tournaments: Option<Connection<TournamentNode>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentNode {
    /// Stable unique key, used for cross-pass duplicate suppression
    pub slug: String,
    pub name: String,
    /// Start time in unix seconds; the listing's ordering key
    pub start_at: i64,
    #[serde(default)]
    pub events: Vec<EventNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventNode {
    pub id: i64,
    pub name: String,
}

impl Watermarked for TournamentNode {
    fn ordering_key(&self) -> i64 {
        self.start_at
    }

    fn identity(&self) -> &str {
        &self.slug
    }
}

// --- event bracket groups ---

#[derive(Debug, Deserialize)]
pub struct EventGroupsData {
    pub event: Option<EventGroups>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventGroups {
    #[serde(default)]
    pub phase_groups: Vec<PhaseGroupNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhaseGroupNode {
    pub id: i64,
}

// --- participants (pronoun lookup) ---

#[derive(Debug, Deserialize)]
pub struct EventParticipantsData {
    pub event: Option<EventParticipants>,
}

#[derive(Debug, Deserialize)]
pub struct EventParticipants {
    pub participants: Option<Connection<ParticipantNode>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParticipantNode {
    pub player: Option<PlayerNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerNode {
    pub id: i64,
    pub gamer_tag: Option<String>,
    pub user: Option<UserNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserNode {
    pub gender_pronoun: Option<String>,
    pub slug: Option<String>,
}

// --- group detail entities envelope ---

#[derive(Debug, Deserialize)]
pub struct GroupEntitiesResponse {
    pub entities: GroupEntities,
}

#[derive(Debug, Default, Deserialize)]
pub struct GroupEntities {
    #[serde(default)]
    pub seeds: Vec<SeedEntity>,
    #[serde(default)]
    pub sets: Vec<SetEntity>,
}

/// One entrant's seeding row, with the denormalized player snapshot attached
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedEntity {
    pub entrant_id: Option<i64>,
    pub entrant_name: Option<String>,
    pub seed_num: Option<u32>,
    /// Fallback seed field populated when `seedNum` is absent
    pub group_seed_num: Option<u32>,
    #[serde(default)]
    pub players: Vec<PlayerSnapshot>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub id: i64,
    pub gamer_tag: Option<String>,
    /// Absent when the snapshot carried no user link for this player
    pub user: Option<UserNode>,
}

/// A completed or abandoned match between two entrants
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetEntity {
    pub id: Option<i64>,
    pub entrant_1_id: Option<i64>,
    pub entrant_2_id: Option<i64>,
    pub entrant_1_score: Option<i64>,
    pub entrant_2_score: Option<i64>,
    pub winner_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tournament_node_deserializes_listing_shape() {
        let json = r#"{
            "slug": "tournament/genesis-9",
            "name": "Genesis 9",
            "startAt": 1700000000,
            "events": [{"id": 42, "name": "Melee Singles"}]
        }"#;
        let node: TournamentNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.slug, "tournament/genesis-9");
        assert_eq!(node.start_at, 1700000000);
        assert_eq!(node.events.len(), 1);
        assert_eq!(node.events[0].id, 42);
    }

    #[test]
    fn test_tournament_node_events_default_to_empty() {
        let json = r#"{"slug": "tournament/x", "name": "X", "startAt": 1}"#;
        let node: TournamentNode = serde_json::from_str(json).unwrap();
        assert!(node.events.is_empty());
    }

    #[test]
    fn test_seed_entity_optional_fields() {
        let json = r#"{
            "entrantId": 7,
            "entrantName": "Mang0",
            "groupSeedNum": 3,
            "players": [{"id": 1000, "gamerTag": "Mang0"}]
        }"#;
        let seed: SeedEntity = serde_json::from_str(json).unwrap();
        assert_eq!(seed.entrant_id, Some(7));
        assert_eq!(seed.seed_num, None);
        assert_eq!(seed.group_seed_num, Some(3));
        assert!(seed.players[0].user.is_none());
    }

    #[test]
    fn test_set_entity_field_names() {
        let json = r#"{
            "id": 9,
            "entrant1Id": 1,
            "entrant2Id": 2,
            "entrant1Score": 3,
            "entrant2Score": -1,
            "winnerId": 1
        }"#;
        let set: SetEntity = serde_json::from_str(json).unwrap();
        assert_eq!(set.entrant_1_id, Some(1));
        assert_eq!(set.entrant_2_score, Some(-1));
        assert_eq!(set.winner_id, Some(1));
    }

    #[test]
    fn test_entities_envelope_defaults() {
        let json = r#"{"entities": {}}"#;
        let response: GroupEntitiesResponse = serde_json::from_str(json).unwrap();
        assert!(response.entities.seeds.is_empty());
        assert!(response.entities.sets.is_empty());
    }

    #[test]
    fn test_graphql_envelope_with_errors() {
        let json = r#"{"errors": [{"message": "boom"}]}"#;
        let envelope: GraphQlEnvelope = serde_json::from_str(json).unwrap();
        assert!(envelope.data.is_none());
        assert_eq!(envelope.errors.unwrap()[0].message, "boom");
    }
}
