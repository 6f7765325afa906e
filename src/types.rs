//! Shared types serialized between pipeline stages.
//!
//! These types make up the content snapshot written by the fetch stage and
//! consumed by check and generate. Blocks inside a [`PageDoc`] stay as raw
//! JSON values here: they are decoded one at a time at dispatch so a single
//! malformed block cannot fail the whole document.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A page document from the content source.
///
/// `doc_type` is `homePage` for the front page and `page` for slug pages.
/// `blocks` is the ordered page-builder array; every element carries
/// `_type` and `_key` plus shape-specific fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageDoc {
    pub id: String,
    pub doc_type: String,
    /// URL slug without leading slash. Empty for the home page.
    #[serde(default)]
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    #[serde(default)]
    pub blocks: Vec<Value>,
}

impl Default for PageDoc {
    fn default() -> Self {
        Self {
            id: String::new(),
            doc_type: "page".to_string(),
            slug: String::new(),
            title: None,
            description: None,
            seo_title: None,
            blocks: Vec::new(),
        }
    }
}

/// Site-wide settings document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteSettings {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_links: Option<SocialLinks>,
}

/// Optional outbound links shown in the footer and on team cards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
}

/// A CMS image reference.
///
/// `id` encodes origin dimensions and format (`image-<hash>-<w>x<h>-<fmt>`);
/// the CDN module recovers them when explicit dimensions are absent. All
/// fields are optional — a reference without a usable id renders nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// Low-quality inline preview (data URL) shown while the real image loads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotspot: Option<Hotspot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<Crop>,
}

impl ImageRef {
    /// Whether the reference carries an asset id at all.
    pub fn is_usable(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

/// Focal point as fractions of width/height.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Hotspot {
    pub x: f64,
    pub y: f64,
}

/// Crop expressed as fractional insets from each edge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Crop {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

/// A resolved link button.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Button {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// `default` or `outline` — anything else renders as `default`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, rename = "openInNewTab")]
    pub open_in_new_tab: bool,
}

/// A team record from the app's public directory API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    /// Two-letter country code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_longitude: Option<f64>,
    #[serde(default)]
    pub leagues: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_links: Option<SocialLinks>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
}

/// A blog post document. Index cards use the same record with `body` empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
    /// ISO-8601 date string as delivered by the content source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(default)]
    pub body: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
}

/// A redirect rule maintained in the CMS, emitted as a `_redirects` line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Redirect {
    pub source: String,
    pub destination: String,
    #[serde(default)]
    pub permanent: bool,
}

/// The complete content snapshot written by the fetch stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub settings: SiteSettings,
    #[serde(default)]
    pub pages: Vec<PageDoc>,
    #[serde(default)]
    pub posts: Vec<BlogPost>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub redirects: Vec<Redirect>,
}
