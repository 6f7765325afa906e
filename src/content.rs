//! Content fetching and snapshot management.
//!
//! The fetch stage assembles the [`Snapshot`] the rest of the pipeline
//! consumes, from one of two sources:
//!
//! - the content export endpoint of the app API (settings, pages, posts,
//!   redirects in one document), plus the team directory, or
//! - a local export directory, for offline builds and fixtures:
//!
//! ```text
//! export/
//! ├── settings.json        # SiteSettings
//! ├── redirects.json       # [Redirect]
//! ├── teams.json           # [Team] (optional)
//! ├── pages/
//! │   ├── home.json        # PageDoc each
//! │   └── about.json
//! └── posts/
//!     └── first-race.json  # BlogPost each
//! ```
//!
//! Every string is cleaned of zero-width characters at this boundary —
//! they leak in from rich text editors and break rendering downstream.
//!
//! Snapshot writes are content-addressed: the file is only rewritten when
//! the serialized bytes actually changed, so downstream tooling watching
//! mtimes doesn't rebuild for a byte-identical fetch.

use serde::Deserialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use thiserror::Error;
use ureq::Agent;
use walkdir::WalkDir;

use crate::config::ContentConfig;
use crate::teams;
use crate::types::{BlogPost, PageDoc, Redirect, SiteSettings, Snapshot, Team};

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("content API error: {0}")]
    Http(String),
}

/// Characters stripped from all fetched strings. These arrive via
/// copy-paste into the rich text editor and render as visible entities.
const ZERO_WIDTH: &[char] = &[
    '\u{200B}', '\u{200C}', '\u{200D}', '\u{FEFF}', '\u{2060}', '\u{180E}',
];

/// Recursively strip zero-width characters from every string in a JSON
/// value.
pub fn deep_clean(value: Value) -> Value {
    match value {
        Value::String(s) => {
            if s.contains(ZERO_WIDTH) {
                Value::String(s.replace(ZERO_WIDTH, ""))
            } else {
                Value::String(s)
            }
        }
        Value::Array(items) => Value::Array(items.into_iter().map(deep_clean).collect()),
        Value::Object(map) => {
            Value::Object(map.into_iter().map(|(k, v)| (k, deep_clean(v))).collect())
        }
        other => other,
    }
}

/// The content half of a snapshot, as the export endpoint returns it.
#[derive(Debug, Default, Deserialize)]
struct ContentExport {
    #[serde(default)]
    settings: SiteSettings,
    #[serde(default)]
    pages: Vec<PageDoc>,
    #[serde(default)]
    posts: Vec<BlogPost>,
    #[serde(default)]
    redirects: Vec<Redirect>,
}

/// Fetch a complete snapshot from the content API and team directory.
///
/// Content failures are errors — a site without pages isn't worth
/// building. The team directory degrades to empty (the finder has a
/// defined no-results rendering).
pub fn fetch_snapshot(agent: &Agent, config: &ContentConfig) -> Result<Snapshot, FetchError> {
    let url = format!(
        "{}/api/v1/content/export",
        config.api_base_url.trim_end_matches('/')
    );
    let response = agent
        .get(&url)
        .query("dataset", &config.dataset)
        .call()
        .map_err(|e| FetchError::Http(e.to_string()))?;

    let status = response.status().as_u16();
    if status >= 400 {
        return Err(FetchError::Http(format!("export returned HTTP {status}")));
    }

    let raw: Value = response
        .into_body()
        .read_json()
        .map_err(|e| FetchError::Http(e.to_string()))?;
    let export: ContentExport = serde_json::from_value(deep_clean(raw))?;

    let mut snapshot = Snapshot {
        settings: export.settings,
        pages: export.pages,
        posts: export.posts,
        redirects: export.redirects,
        teams: teams::fetch_teams(agent, &config.api_base_url, config.team_limit),
    };
    sort_posts(&mut snapshot);
    Ok(snapshot)
}

/// Load a snapshot from a local export directory.
pub fn load_export_dir(dir: &Path) -> Result<Snapshot, FetchError> {
    let mut snapshot = Snapshot::default();

    let settings_path = dir.join("settings.json");
    if settings_path.exists() {
        snapshot.settings = read_json_file(&settings_path)?;
    }
    let redirects_path = dir.join("redirects.json");
    if redirects_path.exists() {
        snapshot.redirects = read_json_file(&redirects_path)?;
    }
    let teams_path = dir.join("teams.json");
    if teams_path.exists() {
        snapshot.teams = read_json_file::<Vec<Team>>(&teams_path)?;
    }

    for entry in WalkDir::new(dir.join("pages"))
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
    {
        snapshot.pages.push(read_json_file(entry.path())?);
    }
    for entry in WalkDir::new(dir.join("posts"))
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
    {
        snapshot.posts.push(read_json_file(entry.path())?);
    }

    // Directory walk order is filesystem-dependent; normalize.
    snapshot.pages.sort_by(|a, b| a.slug.cmp(&b.slug));
    sort_posts(&mut snapshot);
    Ok(snapshot)
}

fn read_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, FetchError> {
    let content = fs::read_to_string(path)?;
    let raw: Value = serde_json::from_str(&content)?;
    Ok(serde_json::from_value(deep_clean(raw))?)
}

/// Posts render newest-first everywhere; ISO-8601 strings sort
/// lexicographically, undated posts sink to the end.
fn sort_posts(snapshot: &mut Snapshot) {
    snapshot
        .posts
        .sort_by(|a, b| b.published_at.cmp(&a.published_at));
}

/// Result of a snapshot write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotWrite {
    Written,
    Unchanged,
}

/// Serialize and write a snapshot, skipping the write when the content
/// hash matches what's already on disk.
pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<SnapshotWrite, FetchError> {
    let json = serde_json::to_string_pretty(snapshot)?;

    if let Ok(existing) = fs::read(path) {
        if content_hash(&existing) == content_hash(json.as_bytes()) {
            return Ok(SnapshotWrite::Unchanged);
        }
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)?;
    Ok(SnapshotWrite::Written)
}

/// Load a previously written snapshot.
pub fn load_snapshot(path: &Path) -> Result<Snapshot, FetchError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn deep_clean_strips_zero_width_everywhere() {
        let dirty = json!({
            "title": "Fly\u{200B}ball",
            "nested": {"text": "zoo\u{FEFF}mies"},
            "list": ["ok", "bad\u{2060}"]
        });
        let clean = deep_clean(dirty);
        assert_eq!(clean["title"], "Flyball");
        assert_eq!(clean["nested"]["text"], "zoomies");
        assert_eq!(clean["list"][1], "bad");
    }

    #[test]
    fn deep_clean_leaves_clean_values_alone() {
        let value = json!({"n": 42, "b": true, "s": "plain"});
        assert_eq!(deep_clean(value.clone()), value);
    }

    #[test]
    fn write_snapshot_detects_unchanged_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("snapshot.json");
        let snapshot = Snapshot::default();

        assert_eq!(
            write_snapshot(&path, &snapshot).unwrap(),
            SnapshotWrite::Written
        );
        assert_eq!(
            write_snapshot(&path, &snapshot).unwrap(),
            SnapshotWrite::Unchanged
        );

        let mut changed = Snapshot::default();
        changed.settings.title = "Flyball Hub".to_string();
        assert_eq!(
            write_snapshot(&path, &changed).unwrap(),
            SnapshotWrite::Written
        );
    }

    #[test]
    fn snapshot_roundtrips() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("snapshot.json");
        let mut snapshot = Snapshot::default();
        snapshot.pages.push(PageDoc {
            id: "home".to_string(),
            doc_type: "homePage".to_string(),
            blocks: vec![json!({"_type": "hero", "_key": "a"})],
            ..Default::default()
        });

        write_snapshot(&path, &snapshot).unwrap();
        let loaded = load_snapshot(&path).unwrap();
        assert_eq!(loaded.pages.len(), 1);
        assert_eq!(loaded.pages[0].id, "home");
        assert_eq!(loaded.pages[0].blocks[0]["_type"], "hero");
    }

    #[test]
    fn load_export_dir_collects_documents() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("pages")).unwrap();
        fs::create_dir_all(tmp.path().join("posts")).unwrap();

        fs::write(
            tmp.path().join("settings.json"),
            r#"{"title": "Flyball Hub"}"#,
        )
        .unwrap();
        fs::write(
            tmp.path().join("redirects.json"),
            r#"[{"source": "/old", "destination": "/new", "permanent": true}]"#,
        )
        .unwrap();
        fs::write(
            tmp.path().join("pages/home.json"),
            r#"{"id": "home", "doc_type": "homePage", "blocks": []}"#,
        )
        .unwrap();
        fs::write(
            tmp.path().join("posts/a.json"),
            r#"{"id": "p1", "slug": "first-race", "published_at": "2026-01-01"}"#,
        )
        .unwrap();
        fs::write(
            tmp.path().join("posts/b.json"),
            r#"{"id": "p2", "slug": "second-race", "published_at": "2026-02-01"}"#,
        )
        .unwrap();

        let snapshot = load_export_dir(tmp.path()).unwrap();
        assert_eq!(snapshot.settings.title, "Flyball Hub");
        assert_eq!(snapshot.redirects.len(), 1);
        assert_eq!(snapshot.pages.len(), 1);
        assert_eq!(snapshot.posts.len(), 2);
        // Newest first
        assert_eq!(snapshot.posts[0].id, "p2");
    }

    #[test]
    fn load_export_dir_cleans_strings() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("pages")).unwrap();
        fs::write(
            tmp.path().join("pages/home.json"),
            "{\"id\": \"home\", \"doc_type\": \"homePage\", \"title\": \"Fly\u{200B}ball\", \"blocks\": []}",
        )
        .unwrap();
        let snapshot = load_export_dir(tmp.path()).unwrap();
        assert_eq!(snapshot.pages[0].title.as_deref(), Some("Flyball"));
    }

    #[test]
    fn load_export_dir_tolerates_missing_optional_files() {
        let tmp = TempDir::new().unwrap();
        let snapshot = load_export_dir(tmp.path()).unwrap();
        assert!(snapshot.pages.is_empty());
        assert!(snapshot.teams.is_empty());
    }
}
