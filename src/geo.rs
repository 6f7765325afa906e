//! Geocoding and great-circle distance for the team finder.
//!
//! The geocoder is a Nominatim-compatible search endpoint. Every failure
//! mode — malformed query, no match, transport error, unparseable body —
//! collapses into a single negative outcome (`None`); the finder then falls
//! back to alphabetical ordering with an explanatory notice. No retries:
//! a build can simply be re-run.

use serde::Deserialize;
use std::cmp::Ordering;
use std::time::Duration;
use ureq::Agent;

/// Earth's mean radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// User agent sent to the geocoding provider, which requires one.
const USER_AGENT: &str = concat!("hubsite/", env!("CARGO_PKG_VERSION"), " (flyballhub.com)");

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

/// Nominatim returns lat/lon as strings.
#[derive(Debug, Deserialize)]
struct GeocodeHit {
    lat: String,
    lon: String,
}

/// Build an agent suitable for the short, single-shot calls this module makes.
pub fn default_agent() -> Agent {
    Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(10)))
        .http_status_as_error(false)
        .build()
        .into()
}

/// Geocode a free-text location query to coordinates.
///
/// Returns `None` on any failure — the caller cannot distinguish "no such
/// place" from "network down", and does not need to.
pub fn geocode(agent: &Agent, geocoder_url: &str, query: &str) -> Option<Coords> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }

    let url = format!("{}/search", geocoder_url.trim_end_matches('/'));
    let response = agent
        .get(&url)
        .query("q", query)
        .query("format", "json")
        .query("limit", "1")
        .header("User-Agent", USER_AGENT)
        .call()
        .map_err(|e| tracing::debug!(error = %e, "geocode request failed"))
        .ok()?;

    if response.status().as_u16() >= 400 {
        tracing::debug!(status = response.status().as_u16(), "geocode rejected");
        return None;
    }

    let hits: Vec<GeocodeHit> = response.into_body().read_json().ok()?;
    let hit = hits.first()?;
    Some(Coords {
        lat: hit.lat.parse().ok()?,
        lng: hit.lon.parse().ok()?,
    })
}

/// Great-circle distance between two points via the haversine formula.
pub fn distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Format a distance for display: `850m`, `7.5km`, `42km`.
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{}m", (km * 1000.0).round() as i64)
    } else if km < 10.0 {
        format!("{km:.1}km")
    } else {
        format!("{}km", km.round() as i64)
    }
}

/// Convert a 2-letter country code to its emoji flag, or empty string.
pub fn country_flag(country_code: Option<&str>) -> String {
    let code = match country_code {
        Some(c) if c.len() == 2 && c.chars().all(|ch| ch.is_ascii_alphabetic()) => c,
        _ => return String::new(),
    };

    // Regional indicator symbols: 'A' maps to U+1F1E6.
    code.to_ascii_uppercase()
        .chars()
        .filter_map(|ch| char::from_u32(0x1F1E6 + (ch as u32 - 'A' as u32)))
        .collect()
}

/// Sort key for search results: entries with a computed distance order
/// ascending and always come before name-keyed entries; names compare
/// case-insensitively among themselves.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Distance(f64),
    Name(String),
}

impl SortKey {
    pub fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Distance(a), SortKey::Distance(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (SortKey::Name(a), SortKey::Name(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            (SortKey::Distance(_), SortKey::Name(_)) => Ordering::Less,
            (SortKey::Name(_), SortKey::Distance(_)) => Ordering::Greater,
        }
    }
}
