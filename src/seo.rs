//! SEO surfaces: head metadata, sitemap.xml, robots.txt, redirects.
//!
//! ## Metadata resolution
//!
//! Each head field is resolved independently from multiple sources; the
//! first non-empty value wins:
//!
//! - **Title**: seo title → page title → site title
//! - **Description**: page description → site description → None
//!
//! ## Redirects
//!
//! The CMS-maintained redirect table is emitted as a `_redirects` file
//! (one `source destination status` line per rule, 301 for permanent
//! rules, 302 otherwise) for the host to apply.

use maud::{Markup, html};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};
use thiserror::Error;

use crate::types::{PageDoc, Redirect, SiteSettings, Snapshot};

#[derive(Error, Debug)]
pub enum SeoError {
    #[error("sitemap XML error: {0}")]
    Xml(String),
}

/// Resolve a metadata field from multiple sources.
///
/// Takes optional values in priority order and returns the first
/// non-empty one. The same merge drives both title and description.
pub fn resolve<'a>(sources: &[Option<&'a str>]) -> Option<&'a str> {
    sources
        .iter()
        .filter_map(|opt| *opt)
        .map(str::trim)
        .find(|s| !s.is_empty())
}

/// Resolved head metadata for one route.
#[derive(Debug, Clone, PartialEq)]
pub struct PageMeta {
    pub title: String,
    pub description: Option<String>,
    pub canonical: String,
}

impl PageMeta {
    pub fn for_page(page: &PageDoc, settings: &SiteSettings, base_url: &str) -> Self {
        let title = resolve(&[
            page.seo_title.as_deref(),
            page.title.as_deref(),
            Some(&settings.title),
        ])
        .unwrap_or("")
        .to_string();
        let description = resolve(&[
            page.description.as_deref(),
            settings.description.as_deref(),
        ])
        .map(str::to_string);
        let canonical = if page.slug.is_empty() {
            format!("{base_url}/")
        } else {
            format!("{base_url}/{}/", page.slug)
        };
        Self {
            title,
            description,
            canonical,
        }
    }
}

/// Head fragment with the standard tag set: title, description, canonical,
/// Open Graph, and Twitter card.
pub fn meta_tags(meta: &PageMeta) -> Markup {
    html! {
        title { (meta.title) }
        @if let Some(description) = &meta.description {
            meta name="description" content=(description);
        }
        link rel="canonical" href=(meta.canonical);
        meta property="og:title" content=(meta.title);
        @if let Some(description) = &meta.description {
            meta property="og:description" content=(description);
        }
        meta property="og:url" content=(meta.canonical);
        meta property="og:type" content="website";
        meta name="twitter:card" content="summary_large_image";
    }
}

/// One sitemap record.
#[derive(Debug, Clone)]
pub struct SitemapEntry {
    pub loc: String,
    pub changefreq: &'static str,
    pub priority: &'static str,
}

/// Plan the sitemap for a snapshot: home first at full priority, then slug
/// pages, the blog index, and posts.
pub fn sitemap_entries(snapshot: &Snapshot, base_url: &str) -> Vec<SitemapEntry> {
    let mut entries = vec![SitemapEntry {
        loc: format!("{base_url}/"),
        changefreq: "weekly",
        priority: "1.0",
    }];

    for page in snapshot.pages.iter().filter(|p| !p.slug.is_empty()) {
        entries.push(SitemapEntry {
            loc: format!("{base_url}/{}/", page.slug),
            changefreq: "weekly",
            priority: "0.8",
        });
    }

    if !snapshot.posts.is_empty() {
        entries.push(SitemapEntry {
            loc: format!("{base_url}/blog/"),
            changefreq: "weekly",
            priority: "0.9",
        });
        for post in &snapshot.posts {
            entries.push(SitemapEntry {
                loc: format!("{base_url}/blog/{}/", post.slug),
                changefreq: "weekly",
                priority: "0.8",
            });
        }
    }

    entries
}

/// Render sitemap entries as sitemap.xml.
pub fn render_sitemap(entries: &[SitemapEntry]) -> Result<String, SeoError> {
    let xml_err = |e: &dyn std::fmt::Display| SeoError::Xml(e.to_string());
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| xml_err(&e))?;

    writer
        .create_element("urlset")
        .with_attribute(("xmlns", "http://www.sitemaps.org/schemas/sitemap/0.9"))
        .write_inner_content(|writer| {
            for entry in entries {
                writer.create_element("url").write_inner_content(|writer| {
                    writer
                        .create_element("loc")
                        .write_text_content(BytesText::new(&entry.loc))?;
                    writer
                        .create_element("changefreq")
                        .write_text_content(BytesText::new(entry.changefreq))?;
                    writer
                        .create_element("priority")
                        .write_text_content(BytesText::new(entry.priority))?;
                    Ok(())
                })?;
            }
            Ok(())
        })
        .map_err(|e| xml_err(&e))?;

    String::from_utf8(writer.into_inner()).map_err(|e| xml_err(&e))
}

/// robots.txt pointing crawlers at the sitemap.
pub fn robots_txt(base_url: &str) -> String {
    format!("User-agent: *\nAllow: /\n\nSitemap: {base_url}/sitemap.xml\n")
}

/// Render the redirect table as a `_redirects` file.
pub fn render_redirects(redirects: &[Redirect]) -> String {
    let mut out = String::new();
    for redirect in redirects {
        let status = if redirect.permanent { 301 } else { 302 };
        out.push_str(&format!(
            "{} {} {}\n",
            redirect.source, redirect.destination, status
        ));
    }
    out
}
