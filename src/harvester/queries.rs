//! GraphQL documents sent to the query API
//!
//! Variables are supplied as `serde_json` values by the client wrappers in
//! `client.rs`; page sizes and listing filters live in `constants.rs`.

/// Past-tournament listing, ascending by start time, filtered to one
/// videogame. `$since` is the watermark lower bound in unix seconds.
pub const TOURNAMENTS_QUERY: &str = r#"
  query TournamentsQuery($page: Int, $perPage: Int, $since: Timestamp, $videogameId: ID, $eventType: Int) {
    tournaments(
      query: {page: $page, perPage: $perPage, filter: {past: true, afterDate: $since, videogameIds: [$videogameId]}}
    ) {
      pageInfo {
        totalPages
      }
      nodes {
        slug
        name
        startAt
        events(filter: {type: [$eventType], videogameId: [$videogameId]}) {
          id
          name
        }
      }
    }
  }
"#;

/// Bracket groups of one event; their detail is fetched from the entities
/// endpoint instead of GraphQL.
pub const EVENT_GROUPS_QUERY: &str = r#"
  query EventGroupsQuery($id: ID) {
    event(id: $id) {
      phaseGroups {
        id
      }
    }
  }
"#;

/// Authoritative pronoun lookup for an event's participants. Only issued for
/// players the seed snapshot and the directory could not resolve.
pub const EVENT_PARTICIPANTS_QUERY: &str = r#"
  query EventParticipantsQuery($id: ID, $page: Int, $perPage: Int) {
    event(id: $id) {
      participants(query: {page: $page, perPage: $perPage}) {
        pageInfo {
          totalPages
        }
        nodes {
          player {
            id
            gamerTag
            user {
              genderPronoun
              slug
            }
          }
        }
      }
    }
  }
"#;
