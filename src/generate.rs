//! HTML site generation.
//!
//! Final stage of the build pipeline. Takes the content snapshot and
//! renders the static site:
//!
//! - **Home page** (`/index.html`): the `homePage` document's block stack
//! - **Slug pages** (`/{slug}/index.html`): every `page` document
//! - **Blog** (`/blog/index.html`, `/blog/{slug}/index.html`)
//! - **SEO surfaces**: `sitemap.xml`, `robots.txt`, `_redirects`
//!
//! Routes render independently and fan out across a rayon pool sized by
//! `[processing] max_processes`. Each route gets its own render context —
//! including its private reveal observer pool — so parallel renders never
//! share mutable state.
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: base styles (colors injected from config)
//! - `static/reveal.js`: executes the per-page serialized observer plan
//!
//! HTML is generated with [maud](https://maud.lambda.xyz/): type-safe
//! compile-time templates with automatic escaping.

use maud::{DOCTYPE, Markup, PreEscaped, html};
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::builder::{self, PageStore, RenderCtx};
use crate::config::{self, SiteConfig};
use crate::content::{self, FetchError};
use crate::geo;
use crate::richtext;
use crate::sections::posts::post_card;
use crate::seo::{self, PageMeta, SeoError};
use crate::teams::{RankedTeam, rank_teams};
use crate::types::{BlogPost, PageDoc, SiteSettings, Snapshot};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] FetchError),
    #[error("{0}")]
    Seo(#[from] SeoError),
    #[error("snapshot has no homePage document")]
    MissingHomePage,
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const REVEAL_JS: &str = include_str!("../static/reveal.js");

/// Options for one generate run.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Skip every network call; the finder renders alphabetically.
    pub offline: bool,
    /// Preview a finder search: geocode this query and rank teams by
    /// distance from it.
    pub finder_query: Option<String>,
}

/// One rendered route, for the build report.
#[derive(Debug, Clone)]
pub struct RenderedRoute {
    pub title: String,
    pub output: String,
}

/// Result summary of a generate run.
#[derive(Debug, Clone, Default)]
pub struct GenerateSummary {
    pub routes: Vec<RenderedRoute>,
    pub sitemap_entries: usize,
    pub redirects: usize,
}

pub fn generate(
    snapshot_path: &Path,
    output_dir: &Path,
    config: &SiteConfig,
    options: &GenerateOptions,
) -> Result<GenerateSummary, GenerateError> {
    let snapshot = content::load_snapshot(snapshot_path)?;
    generate_from_snapshot(&snapshot, output_dir, config, options)
}

pub fn generate_from_snapshot(
    snapshot: &Snapshot,
    output_dir: &Path,
    config: &SiteConfig,
    options: &GenerateOptions,
) -> Result<GenerateSummary, GenerateError> {
    let store = PageStore::new(snapshot.pages.iter().cloned());
    store
        .documents()
        .find(|d| d.doc_type == "homePage")
        .ok_or(GenerateError::MissingHomePage)?;

    // Finder data: geocode the preview query unless offline; every failure
    // is the alphabetical fallback plus a notice.
    let (origin, geocode_failed) = match options.finder_query.as_deref().filter(|q| !q.is_empty()) {
        Some(query) if !options.offline => {
            let agent = geo::default_agent();
            match geo::geocode(&agent, &config.content.geocoder_url, query) {
                Some(coords) => (Some(coords), false),
                None => (None, true),
            }
        }
        Some(_) => (None, true),
        None => (None, false),
    };
    let ranked = rank_teams(&snapshot.teams, origin);

    let css = format!(
        "{}\n\n{}",
        config::generate_color_css(&config.colors),
        CSS_STATIC
    );

    // Route plan: home + slug pages + blog.
    enum Route<'a> {
        Page(&'a PageDoc),
        BlogIndex,
        BlogPost(&'a BlogPost),
    }

    let mut routes: Vec<Route> = Vec::new();
    for doc in store.documents() {
        if doc.doc_type != "homePage" && doc.slug.is_empty() {
            tracing::warn!(id = %doc.id, "page document without a slug, skipping");
            continue;
        }
        routes.push(Route::Page(doc));
    }
    if !snapshot.posts.is_empty() {
        routes.push(Route::BlogIndex);
        routes.extend(snapshot.posts.iter().map(Route::BlogPost));
    }

    let shared = SharedRender {
        config,
        settings: &snapshot.settings,
        pages: &snapshot.pages,
        posts: &snapshot.posts,
        teams: &ranked,
        geocode_failed,
        css: &css,
    };

    let rendered: Vec<(String, RenderedRoute, String)> = routes
        .par_iter()
        .map(|route| match *route {
            Route::Page(doc) => render_page_route(doc, &shared),
            Route::BlogIndex => render_blog_index(&shared),
            Route::BlogPost(post) => render_blog_post(post, &shared),
        })
        .collect();

    fs::create_dir_all(output_dir)?;
    let mut summary = GenerateSummary::default();
    for (rel_path, route, html) in rendered {
        let path = output_dir.join(&rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, html)?;
        summary.routes.push(route);
    }

    // SEO surfaces
    let entries = seo::sitemap_entries(snapshot, &config.site.base_url);
    fs::write(output_dir.join("sitemap.xml"), seo::render_sitemap(&entries)?)?;
    fs::write(
        output_dir.join("robots.txt"),
        seo::robots_txt(&config.site.base_url),
    )?;
    fs::write(
        output_dir.join("_redirects"),
        seo::render_redirects(&snapshot.redirects),
    )?;
    summary.sitemap_entries = entries.len();
    summary.redirects = snapshot.redirects.len();

    Ok(summary)
}

/// Read-only state shared by every route render.
struct SharedRender<'a> {
    config: &'a SiteConfig,
    settings: &'a SiteSettings,
    pages: &'a [PageDoc],
    posts: &'a [BlogPost],
    teams: &'a [RankedTeam],
    geocode_failed: bool,
    css: &'a str,
}

impl<'a> SharedRender<'a> {
    fn ctx(&self) -> RenderCtx<'a> {
        RenderCtx::new(self.config, self.posts, self.teams, self.geocode_failed)
    }
}

fn render_page_route(doc: &PageDoc, shared: &SharedRender) -> (String, RenderedRoute, String) {
    let ctx = shared.ctx();
    let meta = PageMeta::for_page(doc, shared.settings, &shared.config.site.base_url);
    let content = builder::render_blocks(&doc.blocks, &doc.id, &ctx);
    let html = base_document(&meta, shared, &ctx, content);

    let rel_path = if doc.slug.is_empty() {
        "index.html".to_string()
    } else {
        format!("{}/index.html", doc.slug)
    };
    let route = RenderedRoute {
        title: meta.title,
        output: rel_path.clone(),
    };
    (rel_path, route, html.into_string())
}

fn render_blog_index(shared: &SharedRender) -> (String, RenderedRoute, String) {
    let ctx = shared.ctx();
    let meta = PageMeta {
        title: format!("Blog — {}", shared.settings.title),
        description: shared.settings.description.clone(),
        canonical: format!("{}/blog/", shared.config.site.base_url),
    };
    let delays = ctx.staggered(shared.posts.len());
    let reveal = ctx.observe("blog-index", true);

    let content = html! {
        section class={ "blog-index " (reveal.class()) } data-reveal=[reveal.config_key.clone()] {
            header.section-header {
                h1 { "From the blog" }
            }
            div.card-grid {
                @for (post, delay) in shared.posts.iter().zip(&delays) {
                    (post_card(post, &ctx, builder::Loading::Lazy, *delay))
                }
            }
        }
    };

    let html = base_document(&meta, shared, &ctx, content);
    (
        "blog/index.html".to_string(),
        RenderedRoute {
            title: meta.title,
            output: "blog/index.html".to_string(),
        },
        html.into_string(),
    )
}

fn render_blog_post(post: &BlogPost, shared: &SharedRender) -> (String, RenderedRoute, String) {
    let ctx = shared.ctx();
    let title = post.title.as_deref().unwrap_or("Untitled");
    let meta = PageMeta {
        title: title.to_string(),
        description: post.description.clone(),
        canonical: format!("{}/blog/{}/", shared.config.site.base_url, post.slug),
    };
    let reveal = ctx.observe("post-body", true);

    let content = html! {
        article class={ "blog-post prose " (reveal.class()) } data-reveal=[reveal.config_key.clone()] {
            header.post-header {
                h1 { (title) }
                p.post-meta {
                    @if let Some(author) = &post.author {
                        span.post-author { (author.name) }
                        @if let Some(position) = &author.position {
                            span.author-role { (position) }
                        }
                    }
                    @if let Some(date) = &post.published_at {
                        time datetime=(date) { (date.split('T').next().unwrap_or(date)) }
                    }
                }
            }
            @if let Some(image) = &post.image {
                (crate::sections::image_el(&ctx, image, 1600, builder::Loading::Eager, "post-image"))
            }
            (richtext::render(&post.body, &shared.config.content, &shared.config.cdn))
        }
    };

    let rel_path = format!("blog/{}/index.html", post.slug);
    let html = base_document(&meta, shared, &ctx, content);
    (
        rel_path.clone(),
        RenderedRoute {
            title: title.to_string(),
            output: rel_path,
        },
        html.into_string(),
    )
}

// ============================================================================
// Document chrome
// ============================================================================

/// Base HTML document: head metadata, embedded styles, site chrome, and
/// the reveal plan island when this route has observers.
fn base_document(
    meta: &PageMeta,
    shared: &SharedRender,
    ctx: &RenderCtx,
    content: Markup,
) -> Markup {
    let plan = ctx.reveal_plan();
    let has_observers = plan != "[]";

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                (seo::meta_tags(meta))
                style { (PreEscaped(shared.css)) }
            }
            body {
                (site_header(shared))
                main { (content) }
                (site_footer(shared.settings))
                @if has_observers {
                    script #reveal-plan type="application/json" { (PreEscaped(plan)) }
                    script { (PreEscaped(REVEAL_JS)) }
                }
            }
        }
    }
}

/// Site chrome: logo link home, slug pages in the nav, blog when present.
fn site_header(shared: &SharedRender) -> Markup {
    html! {
        header.site-header {
            a.site-logo href="/" { (shared.settings.title) }
            nav.site-nav {
                ul {
                    @for doc in shared.pages.iter().filter(|p| !p.slug.is_empty()) {
                        li { a href={ "/" (doc.slug) "/" } { (doc.title.as_deref().unwrap_or(&doc.slug)) } }
                    }
                    @if !shared.posts.is_empty() {
                        li { a href="/blog/" { "Blog" } }
                    }
                }
            }
        }
    }
}

fn site_footer(settings: &SiteSettings) -> Markup {
    html! {
        footer.site-footer {
            p { (settings.title) }
            @if let Some(links) = &settings.social_links {
                nav.footer-links {
                    @if let Some(url) = &links.website { a href=(url) rel="noopener" { "Website" } }
                    @if let Some(url) = &links.facebook { a href=(url) rel="noopener" { "Facebook" } }
                    @if let Some(url) = &links.instagram { a href=(url) rel="noopener" { "Instagram" } }
                    @if let Some(url) = &links.youtube { a href=(url) rel="noopener" { "YouTube" } }
                }
            }
            @if let Some(email) = &settings.contact_email {
                a.footer-contact href={ "mailto:" (email) } { (email) }
            }
        }
    }
}
