//! Team directory client and finder search pipeline.
//!
//! Teams come from the app's public API during the fetch stage and are
//! bundled into the snapshot, so the generate stage is deterministic and
//! offline-capable. The finder sections sort the bundled set: by computed
//! distance when a geocode succeeded, alphabetically otherwise.

use serde::Deserialize;
use ureq::Agent;

use crate::geo::{self, Coords, SortKey};
use crate::types::Team;

/// Directory responses wrap the records in a `data` array.
#[derive(Debug, Deserialize)]
struct TeamsResponse {
    #[serde(default)]
    data: Vec<Team>,
}

/// Fetch the team directory.
///
/// Any failure yields the empty list — the finder section then renders its
/// configured no-results message instead of an error.
pub fn fetch_teams(agent: &Agent, api_base_url: &str, limit: u32) -> Vec<Team> {
    let url = format!("{}/api/v1/teams", api_base_url.trim_end_matches('/'));
    let response = match agent.get(&url).query("limit", &limit.to_string()).call() {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(error = %e, "team directory fetch failed");
            return Vec::new();
        }
    };

    if response.status().as_u16() >= 400 {
        tracing::warn!(status = response.status().as_u16(), "team directory rejected");
        return Vec::new();
    }

    match response.into_body().read_json::<TeamsResponse>() {
        Ok(body) => body.data,
        Err(e) => {
            tracing::warn!(error = %e, "team directory body unreadable");
            Vec::new()
        }
    }
}

/// A team prepared for display, with its computed distance if any.
#[derive(Debug, Clone)]
pub struct RankedTeam {
    pub team: Team,
    pub distance_km: Option<f64>,
}

/// Filter to teams with coordinates, compute distances from an optional
/// search origin, and sort.
///
/// Distance-bearing entries come first, ascending; the rest follow
/// alphabetically by name. With no origin every entry is name-keyed.
pub fn rank_teams(teams: &[Team], origin: Option<Coords>) -> Vec<RankedTeam> {
    let mut ranked: Vec<(SortKey, RankedTeam)> = teams
        .iter()
        .filter(|t| t.location_latitude.is_some() && t.location_longitude.is_some())
        .map(|t| {
            let distance = match (origin, t.location_latitude, t.location_longitude) {
                (Some(o), Some(lat), Some(lng)) => {
                    Some(geo::distance_km(o.lat, o.lng, lat, lng))
                }
                _ => None,
            };
            let key = match distance {
                Some(d) => SortKey::Distance(d),
                None => SortKey::Name(t.name.clone()),
            };
            (
                key,
                RankedTeam {
                    team: t.clone(),
                    distance_km: distance,
                },
            )
        })
        .collect();

    ranked.sort_by(|(a, _), (b, _)| a.compare(b));
    ranked.into_iter().map(|(_, t)| t).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(name: &str, coords: Option<(f64, f64)>) -> Team {
        Team {
            name: name.to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
            logo_url: None,
            location_name: None,
            country: None,
            location_latitude: coords.map(|c| c.0),
            location_longitude: coords.map(|c| c.1),
            leagues: vec![],
            social_links: None,
            primary_color: None,
        }
    }

    #[test]
    fn rank_drops_teams_without_coordinates() {
        let teams = vec![team("Located", Some((51.5, -0.1))), team("Nowhere", None)];
        let ranked = rank_teams(&teams, None);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].team.name, "Located");
    }

    #[test]
    fn rank_alphabetical_without_origin() {
        let teams = vec![
            team("Zoomies", Some((51.0, 0.0))),
            team("airborne", Some((52.0, 0.0))),
            team("Mudlarks", Some((53.0, 0.0))),
        ];
        let ranked = rank_teams(&teams, None);
        let names: Vec<_> = ranked.iter().map(|t| t.team.name.as_str()).collect();
        assert_eq!(names, vec!["airborne", "Mudlarks", "Zoomies"]);
        assert!(ranked.iter().all(|t| t.distance_km.is_none()));
    }

    #[test]
    fn rank_by_distance_with_origin() {
        let origin = Coords { lat: 51.5, lng: -0.1 };
        let teams = vec![
            team("Far", Some((55.9, -3.2))),
            team("Near", Some((51.6, -0.2))),
        ];
        let ranked = rank_teams(&teams, Some(origin));
        assert_eq!(ranked[0].team.name, "Near");
        assert_eq!(ranked[1].team.name, "Far");
        assert!(ranked[0].distance_km.unwrap() < ranked[1].distance_km.unwrap());
    }

    #[test]
    fn rank_distance_entries_precede_name_entries() {
        // An origin is present but one team's coordinates are filtered out
        // earlier; simulate a mixed set by ranking two lists and merging.
        let origin = Coords { lat: 51.5, lng: -0.1 };
        let with_origin = rank_teams(&[team("B Team", Some((51.6, -0.2)))], Some(origin));
        let without = rank_teams(&[team("A Team", Some((51.7, -0.3)))], None);

        let mut merged: Vec<(SortKey, String)> = Vec::new();
        for t in with_origin.iter().chain(without.iter()) {
            let key = match t.distance_km {
                Some(d) => SortKey::Distance(d),
                None => SortKey::Name(t.team.name.clone()),
            };
            merged.push((key, t.team.name.clone()));
        }
        merged.sort_by(|(a, _), (b, _)| a.compare(b));
        // Distance-bearing "B Team" sorts before alphabetical "A Team".
        assert_eq!(merged[0].1, "B Team");
    }
}
