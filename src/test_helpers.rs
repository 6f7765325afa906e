//! Shared helpers for unit tests.

use crate::builder::RenderCtx;
use crate::config::SiteConfig;
use crate::types::{BlogPost, Team};

/// Default config for render tests.
pub(crate) fn test_config() -> SiteConfig {
    SiteConfig::default()
}

/// A render context with no posts or teams.
pub(crate) fn test_ctx(config: &SiteConfig) -> RenderCtx<'_> {
    RenderCtx::new(config, &[], &[], false)
}

/// A blog post with the given slug, dated so newest-first ordering is
/// deterministic (slug order == recency order in fixtures).
pub(crate) fn test_post(slug: &str) -> BlogPost {
    BlogPost {
        id: format!("post-{slug}"),
        slug: slug.to_string(),
        title: Some(format!("Post {slug}")),
        description: Some("A race report.".to_string()),
        image: None,
        published_at: Some("2026-03-14T09:00:00Z".to_string()),
        author: None,
        body: vec![],
    }
}

/// A team with optional coordinates.
pub(crate) fn test_team(name: &str, coords: Option<(f64, f64)>) -> Team {
    Team {
        name: name.to_string(),
        slug: name.to_lowercase().replace(' ', "-"),
        logo_url: None,
        location_name: Some("Testville".to_string()),
        country: Some("GB".to_string()),
        location_latitude: coords.map(|c| c.0),
        location_longitude: coords.map(|c| c.1),
        leagues: vec!["BFA".to_string()],
        social_links: None,
        primary_color: None,
    }
}
