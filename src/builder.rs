//! Page-builder dispatch.
//!
//! Takes a document's ordered raw block list and composes the rendered
//! page: decode each block ([`Block::from_value`], never fails), pick the
//! layout wrapper (full bleed vs. boxed) from a static full-width set,
//! dispatch to the shape's renderer, and tag every section with an
//! editor-addressable path so a live-editing overlay can target the exact
//! block.
//!
//! Failure is isolated per block: an unknown or malformed block renders a
//! labeled placeholder and its siblings are untouched.
//!
//! ## Loading plan
//!
//! The first hero on a page is the above-the-fold block: its images load
//! eagerly with high fetch priority and its reveal is pre-triggered so the
//! first paint is never blank. Everything below renders with lazy image
//! loading.
//!
//! ## Live patching
//!
//! [`PageStore`] holds the latest known version of each document. A
//! [`PatchEvent`] for a held document swaps in the replacement block list
//! wholesale — last writer wins, no merging — which is all a single-editor
//! live preview needs.

use std::cell::RefCell;
use std::collections::BTreeMap;

use maud::{Markup, html};
use serde_json::Value;

use crate::blocks::Block;
use crate::config::SiteConfig;
use crate::reveal::{Reveal, RevealOptions, RevealRegistry};
use crate::sections;
use crate::teams::RankedTeam;
use crate::types::{BlogPost, PageDoc};

/// Block shapes that span the full viewport width. Everything else gets a
/// centered max-width container.
pub const FULL_WIDTH_BLOCKS: &[&str] = &[
    "hero",
    "statsSection",
    "macbookScroll",
    "cta",
    "videoSection",
    "teamFinderTeaser",
];

/// Image loading strategy for a block's renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loading {
    /// Above the fold: load immediately, high priority.
    Eager,
    /// Deferred until scrolled near.
    Lazy,
}

impl Loading {
    pub fn img_loading(self) -> &'static str {
        match self {
            Loading::Eager => "eager",
            Loading::Lazy => "lazy",
        }
    }

    pub fn fetch_priority(self) -> Option<&'static str> {
        matches!(self, Loading::Eager).then_some("high")
    }
}

/// Everything a section renderer may consult. One per rendered route; the
/// reveal registry inside is this route's private observer pool.
pub struct RenderCtx<'a> {
    pub config: &'a SiteConfig,
    /// Newest-first blog posts for `latestPosts` sections.
    pub posts: &'a [BlogPost],
    /// Ranked team list for the finder sections.
    pub teams: &'a [RankedTeam],
    /// Notice shown by the finder when a search location didn't geocode.
    pub geocode_failed: bool,
    reveal: RefCell<RevealRegistry>,
}

impl<'a> RenderCtx<'a> {
    pub fn new(
        config: &'a SiteConfig,
        posts: &'a [BlogPost],
        teams: &'a [RankedTeam],
        geocode_failed: bool,
    ) -> Self {
        Self {
            config,
            posts,
            teams,
            geocode_failed,
            reveal: RefCell::new(RevealRegistry::new(&config.animations)),
        }
    }

    /// Register a section for scroll reveal with the site defaults.
    pub fn observe(&self, element_id: &str, above_fold: bool) -> Reveal {
        let mut options = RevealOptions::from_config(&self.config.animations);
        options.above_fold = above_fold;
        self.reveal.borrow_mut().observe(element_id, &options)
    }

    /// Register with explicit options (sections with custom margins).
    pub fn observe_with(&self, element_id: &str, options: &RevealOptions) -> Reveal {
        self.reveal.borrow_mut().observe(element_id, options)
    }

    /// Stagger delays for `n` child items.
    pub fn staggered(&self, n: usize) -> Vec<u64> {
        self.reveal.borrow().staggered(n)
    }

    /// Serialized observer plan for this route's reveal script.
    pub fn reveal_plan(&self) -> String {
        self.reveal.borrow().plan_json()
    }

    pub fn observer_count(&self) -> usize {
        self.reveal.borrow().observer_count()
    }
}

/// Editor-addressable path for one block within its document.
pub fn edit_path(block_key: &str) -> String {
    format!("pageBuilder[_key==\"{block_key}\"]")
}

/// Render a document's block list into the ordered section sequence.
pub fn render_blocks(blocks: &[Value], doc_id: &str, ctx: &RenderCtx) -> Markup {
    let decoded = Block::decode_all(blocks);
    if decoded.is_empty() {
        return html! {};
    }

    let mut seen_hero = false;
    let rendered: Vec<Markup> = decoded
        .iter()
        .map(|block| {
            let loading = if !seen_hero && matches!(block, Block::Hero(_)) {
                seen_hero = true;
                Loading::Eager
            } else {
                Loading::Lazy
            };
            render_one(block, ctx, loading)
        })
        .collect();

    html! {
        section.page-blocks aria-label="Page content" data-doc=(doc_id) {
            @for section in &rendered { (section) }
        }
    }
}

fn render_one(block: &Block, ctx: &RenderCtx, loading: Loading) -> Markup {
    let wrapper = if FULL_WIDTH_BLOCKS.contains(&block.type_tag()) {
        "block block-full"
    } else {
        "block block-boxed"
    };

    let body = match block {
        Block::Hero(b) => sections::hero::render(b, ctx, loading),
        Block::Cta(b) => sections::engage::render_cta(b, ctx),
        Block::FaqAccordion(b) => sections::engage::render_faq(b, ctx),
        Block::FeatureCardsIcon(b) => sections::features::render_icon_cards(b, ctx),
        Block::FeatureCardsScreenshot(b) => sections::features::render_screenshot_cards(b, ctx, loading),
        Block::SubscribeNewsletter(b) => sections::engage::render_newsletter(b, ctx),
        Block::ImageLinkCards(b) => sections::features::render_image_link_cards(b, ctx, loading),
        Block::TextBlock(b) => sections::text::render_text(b, ctx),
        Block::Testimonials(b) => sections::social::render_testimonials(b, ctx),
        Block::LogoCloud(b) => sections::social::render_logo_cloud(b, ctx),
        Block::StatsSection(b) => sections::social::render_stats(b, ctx),
        Block::MacbookScroll(b) => sections::media::render_macbook(b, ctx, loading),
        Block::VideoSection(b) => sections::media::render_video(b, ctx, loading),
        Block::LatestPosts(b) => sections::posts::render_latest(b, ctx, loading),
        Block::TeamFinder(b) => sections::finder::render_finder(b, ctx),
        Block::TeamFinderTeaser(b) => sections::finder::render_teaser(b, ctx),
        Block::ContactForm(b) => sections::engage::render_contact(b, ctx),
        Block::Unknown { type_tag, key } => unknown_placeholder(type_tag, key),
    };

    html! {
        div class=(wrapper) data-edit-path=(edit_path(block.key())) {
            (body)
        }
    }
}

/// Visible placeholder for a block with no registered renderer.
///
/// Editor-facing, deliberately unpolished: the tag name is the payload.
fn unknown_placeholder(type_tag: &str, key: &str) -> Markup {
    html! {
        div.unknown-block role="alert" aria-label={ "Unknown block type: " (type_tag) } data-key=(key) {
            p { "Component not found for block type:" }
            code { (type_tag) }
        }
    }
}

/// A live-preview patch: a replacement block list for one document.
#[derive(Debug, Clone)]
pub struct PatchEvent {
    pub document_id: String,
    pub blocks: Vec<Value>,
}

/// Latest-known-document store backing live preview re-renders.
#[derive(Debug, Default)]
pub struct PageStore {
    docs: BTreeMap<String, PageDoc>,
}

impl PageStore {
    pub fn new(pages: impl IntoIterator<Item = PageDoc>) -> Self {
        Self {
            docs: pages.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&PageDoc> {
        self.docs.get(id)
    }

    pub fn documents(&self) -> impl Iterator<Item = &PageDoc> {
        self.docs.values()
    }

    /// Apply a patch: last writer wins, no merging. Returns whether a held
    /// document changed (the caller re-renders just that route); a patch
    /// for an unknown document is a no-op.
    pub fn apply_patch(&mut self, patch: PatchEvent) -> bool {
        match self.docs.get_mut(&patch.document_id) {
            Some(doc) => {
                doc.blocks = patch.blocks;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::test_config;
    use serde_json::json;

    fn ctx(config: &SiteConfig) -> RenderCtx<'_> {
        RenderCtx::new(config, &[], &[], false)
    }

    #[test]
    fn renders_one_section_per_registered_block_in_order() {
        let config = test_config();
        let blocks = vec![
            json!({"_type": "hero", "_key": "a", "title": "Welcome"}),
            json!({"_type": "textBlock", "_key": "b", "richText": [
                {"_type": "block", "style": "normal",
                 "children": [{"_type": "span", "text": "Body copy"}], "markDefs": []}
            ]}),
            json!({"_type": "cta", "_key": "c", "title": "Join up"}),
        ];
        let html = render_blocks(&blocks, "home", &ctx(&config)).into_string();

        let hero_at = html.find("Welcome").unwrap();
        let text_at = html.find("Body copy").unwrap();
        let cta_at = html.find("Join up").unwrap();
        assert!(hero_at < text_at && text_at < cta_at);
        assert_eq!(html.matches("data-edit-path").count(), 3);
    }

    #[test]
    fn unknown_block_renders_placeholder_and_siblings_survive() {
        let config = test_config();
        let blocks = vec![
            json!({"_type": "hero", "_key": "a", "title": "Still here"}),
            json!({"_type": "appPromo", "_key": "b", "title": "No renderer yet"}),
            json!({"_type": "cta", "_key": "c", "title": "Also here"}),
        ];
        let html = render_blocks(&blocks, "home", &ctx(&config)).into_string();

        assert!(html.contains("unknown-block"));
        assert!(html.contains("appPromo"));
        assert!(html.contains("Still here"));
        assert!(html.contains("Also here"));
    }

    #[test]
    fn malformed_block_isolated() {
        let config = test_config();
        let blocks = vec![
            json!({"_type": "hero", "_key": "a", "stats": "not-an-array"}),
            json!({"_type": "cta", "_key": "b", "title": "Fine"}),
        ];
        let html = render_blocks(&blocks, "home", &ctx(&config)).into_string();
        assert!(html.contains("unknown-block"));
        assert!(html.contains("Fine"));
    }

    #[test]
    fn full_width_membership_decides_wrapper() {
        let config = test_config();
        let blocks = vec![
            json!({"_type": "hero", "_key": "a", "title": "Wide"}),
            json!({"_type": "textBlock", "_key": "b", "richText": []}),
        ];
        let html = render_blocks(&blocks, "home", &ctx(&config)).into_string();
        assert!(html.contains("block-full"));
        assert!(html.contains("block-boxed"));
    }

    #[test]
    fn first_hero_is_eager_second_is_lazy() {
        let config = test_config();
        let image = json!({"id": "image-abc-1600x900-jpg", "alt": "dogs"});
        let blocks = vec![
            json!({"_type": "hero", "_key": "a", "title": "One", "image": image}),
            json!({"_type": "hero", "_key": "b", "title": "Two", "image": image}),
        ];
        let html = render_blocks(&blocks, "home", &ctx(&config)).into_string();
        assert_eq!(html.matches("loading=\"eager\"").count(), 1);
        assert!(html.contains("fetchpriority=\"high\""));
        assert!(html.contains("loading=\"lazy\""));
    }

    #[test]
    fn edit_path_shape() {
        assert_eq!(edit_path("abc123"), "pageBuilder[_key==\"abc123\"]");
    }

    #[test]
    fn empty_block_list_renders_nothing() {
        let config = test_config();
        let html = render_blocks(&[], "home", &ctx(&config)).into_string();
        assert_eq!(html, "");
    }

    // =========================================================================
    // PageStore tests
    // =========================================================================

    fn store_with_home() -> PageStore {
        PageStore::new([PageDoc {
            id: "home".to_string(),
            doc_type: "homePage".to_string(),
            blocks: vec![json!({"_type": "hero", "_key": "a"})],
            ..Default::default()
        }])
    }

    #[test]
    fn patch_swaps_block_list() {
        let mut store = store_with_home();
        let changed = store.apply_patch(PatchEvent {
            document_id: "home".to_string(),
            blocks: vec![json!({"_type": "cta", "_key": "b"})],
        });
        assert!(changed);
        let doc = store.get("home").unwrap();
        assert_eq!(doc.blocks.len(), 1);
        assert_eq!(doc.blocks[0]["_type"], "cta");
    }

    #[test]
    fn patch_for_unknown_document_is_noop() {
        let mut store = store_with_home();
        let changed = store.apply_patch(PatchEvent {
            document_id: "elsewhere".to_string(),
            blocks: vec![],
        });
        assert!(!changed);
        assert_eq!(store.get("home").unwrap().blocks.len(), 1);
    }

    #[test]
    fn last_patch_wins() {
        let mut store = store_with_home();
        for tag in ["first", "second", "third"] {
            store.apply_patch(PatchEvent {
                document_id: "home".to_string(),
                blocks: vec![json!({"_type": tag, "_key": "k"})],
            });
        }
        assert_eq!(store.get("home").unwrap().blocks[0]["_type"], "third");
    }
}
