//! Page-builder block types.
//!
//! [`Block`] is the closed set of section shapes this build can render,
//! discriminated by the content source's `_type` tag. Dispatch is an
//! exhaustive `match`, so adding a variant without a renderer is a compile
//! error. Genuinely unknown tags — content authors introduce new shapes
//! before a renderer ships — decode to [`Block::Unknown`] and render as a
//! labeled placeholder instead of failing the page.
//!
//! Decoding is per-block and tolerant: [`Block::from_value`] never fails,
//! and a malformed block degrades to `Unknown` without touching its
//! siblings. Within a shape, every field is optional; renderers are pure
//! functions over whatever survived.

use serde::Deserialize;
use serde_json::Value;

use crate::types::{Button, ImageRef};

/// A decoded page-builder block.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "_type")]
pub enum Block {
    #[serde(rename = "hero")]
    Hero(HeroBlock),
    #[serde(rename = "cta")]
    Cta(CtaBlock),
    #[serde(rename = "faqAccordion")]
    FaqAccordion(FaqAccordionBlock),
    #[serde(rename = "featureCardsIcon")]
    FeatureCardsIcon(FeatureCardsIconBlock),
    #[serde(rename = "featureCardsScreenshot")]
    FeatureCardsScreenshot(FeatureCardsScreenshotBlock),
    #[serde(rename = "subscribeNewsletter")]
    SubscribeNewsletter(SubscribeNewsletterBlock),
    #[serde(rename = "imageLinkCards")]
    ImageLinkCards(ImageLinkCardsBlock),
    #[serde(rename = "textBlock")]
    TextBlock(TextBlockBlock),
    #[serde(rename = "testimonials")]
    Testimonials(TestimonialsBlock),
    #[serde(rename = "logoCloud")]
    LogoCloud(LogoCloudBlock),
    #[serde(rename = "statsSection")]
    StatsSection(StatsSectionBlock),
    #[serde(rename = "macbookScroll")]
    MacbookScroll(MacbookScrollBlock),
    #[serde(rename = "videoSection")]
    VideoSection(VideoSectionBlock),
    #[serde(rename = "latestPosts")]
    LatestPosts(LatestPostsBlock),
    #[serde(rename = "teamFinder")]
    TeamFinder(TeamFinderBlock),
    #[serde(rename = "teamFinderTeaser")]
    TeamFinderTeaser(TeamFinderTeaserBlock),
    #[serde(rename = "contactForm")]
    ContactForm(ContactFormBlock),
    #[serde(skip)]
    Unknown { type_tag: String, key: String },
}

impl Block {
    /// Decode a raw block value. Never fails: unknown tags and malformed
    /// shapes become [`Block::Unknown`], logged but not propagated.
    pub fn from_value(value: &Value) -> Block {
        let type_tag = value
            .get("_type")
            .and_then(Value::as_str)
            .unwrap_or("(untyped)")
            .to_string();
        let key = value
            .get("_key")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();

        match serde_json::from_value::<Block>(value.clone()) {
            Ok(block) => block,
            Err(e) => {
                tracing::warn!(block_type = %type_tag, block_key = %key, error = %e,
                    "block did not decode, rendering placeholder");
                Block::Unknown { type_tag, key }
            }
        }
    }

    /// Decode an ordered block list, preserving input order.
    pub fn decode_all(values: &[Value]) -> Vec<Block> {
        values.iter().map(Block::from_value).collect()
    }

    /// The content source's type tag for this block.
    pub fn type_tag(&self) -> &str {
        match self {
            Block::Hero(_) => "hero",
            Block::Cta(_) => "cta",
            Block::FaqAccordion(_) => "faqAccordion",
            Block::FeatureCardsIcon(_) => "featureCardsIcon",
            Block::FeatureCardsScreenshot(_) => "featureCardsScreenshot",
            Block::SubscribeNewsletter(_) => "subscribeNewsletter",
            Block::ImageLinkCards(_) => "imageLinkCards",
            Block::TextBlock(_) => "textBlock",
            Block::Testimonials(_) => "testimonials",
            Block::LogoCloud(_) => "logoCloud",
            Block::StatsSection(_) => "statsSection",
            Block::MacbookScroll(_) => "macbookScroll",
            Block::VideoSection(_) => "videoSection",
            Block::LatestPosts(_) => "latestPosts",
            Block::TeamFinder(_) => "teamFinder",
            Block::TeamFinderTeaser(_) => "teamFinderTeaser",
            Block::ContactForm(_) => "contactForm",
            Block::Unknown { type_tag, .. } => type_tag,
        }
    }

    /// The block's stable key, unique within its page.
    pub fn key(&self) -> &str {
        match self {
            Block::Hero(b) => &b.key,
            Block::Cta(b) => &b.key,
            Block::FaqAccordion(b) => &b.key,
            Block::FeatureCardsIcon(b) => &b.key,
            Block::FeatureCardsScreenshot(b) => &b.key,
            Block::SubscribeNewsletter(b) => &b.key,
            Block::ImageLinkCards(b) => &b.key,
            Block::TextBlock(b) => &b.key,
            Block::Testimonials(b) => &b.key,
            Block::LogoCloud(b) => &b.key,
            Block::StatsSection(b) => &b.key,
            Block::MacbookScroll(b) => &b.key,
            Block::VideoSection(b) => &b.key,
            Block::LatestPosts(b) => &b.key,
            Block::TeamFinder(b) => &b.key,
            Block::TeamFinderTeaser(b) => &b.key,
            Block::ContactForm(b) => &b.key,
            Block::Unknown { key, .. } => key,
        }
    }
}

/// A key metric line ("150+ Teams").
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Stat {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroBlock {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub rich_text: Vec<Value>,
    #[serde(default)]
    pub image: Option<ImageRef>,
    #[serde(default)]
    pub buttons: Vec<Button>,
    #[serde(default)]
    pub stats: Vec<Stat>,
    /// `classic`, `dynamic`, or `globe`; anything else renders classic.
    #[serde(default)]
    pub variant: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtaBlock {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default)]
    pub eyebrow: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub rich_text: Vec<Value>,
    #[serde(default)]
    pub buttons: Vec<Button>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub rich_text: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqLink {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub open_in_new_tab: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqAccordionBlock {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default)]
    pub eyebrow: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub faqs: Vec<Faq>,
    #[serde(default)]
    pub link: Option<FaqLink>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconCard {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Inline SVG stored by the authoring tool's icon picker.
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub rich_text: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureCardsIconBlock {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default)]
    pub eyebrow: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub rich_text: Vec<Value>,
    #[serde(default)]
    pub cards: Vec<IconCard>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotCard {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub screenshot: Option<ImageRef>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub open_in_new_tab: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureCardsScreenshotBlock {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default)]
    pub eyebrow: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub rich_text: Vec<Value>,
    #[serde(default)]
    pub cards: Vec<ScreenshotCard>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeNewsletterBlock {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub sub_title: Vec<Value>,
    #[serde(default)]
    pub helper_text: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinkCard {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<ImageRef>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub open_in_new_tab: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinkCardsBlock {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default)]
    pub eyebrow: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub rich_text: Vec<Value>,
    #[serde(default)]
    pub buttons: Vec<Button>,
    #[serde(default)]
    pub cards: Vec<ImageLinkCard>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlockBlock {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default)]
    pub rich_text: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default)]
    pub quote: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub author_role: Option<String>,
    /// Star rating 1-5; out-of-range values are clamped at render.
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub author_image: Option<ImageRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialsBlock {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default)]
    pub eyebrow: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub rich_text: Vec<Value>,
    #[serde(default)]
    pub testimonials: Vec<Testimonial>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Logo {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub logo: Option<ImageRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoCloudBlock {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub rich_text: Vec<Value>,
    #[serde(default)]
    pub logos: Vec<Logo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSectionBlock {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default)]
    pub eyebrow: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub rich_text: Vec<Value>,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub stats: Vec<Stat>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacbookScrollBlock {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default)]
    pub eyebrow: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub screen_image: Option<ImageRef>,
    #[serde(default)]
    pub show_gradient: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSectionBlock {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default)]
    pub eyebrow: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub poster_image: Option<ImageRef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestPostsBlock {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default)]
    pub eyebrow: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_posts_count")]
    pub posts_count: usize,
    #[serde(default)]
    pub show_view_all: bool,
}

fn default_posts_count() -> usize {
    3
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamFinderBlock {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default)]
    pub eyebrow: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub search_placeholder: Option<String>,
    #[serde(default)]
    pub no_results_message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamFinderTeaserBlock {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default)]
    pub eyebrow: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub search_placeholder: Option<String>,
    #[serde(default)]
    pub show_stats: bool,
    #[serde(default)]
    pub cta_text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFormBlock {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default)]
    pub eyebrow: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hero_decodes() {
        let value = json!({
            "_type": "hero",
            "_key": "h1",
            "badge": "New",
            "title": "The fastest sport on four legs",
            "buttons": [{"_key": "b1", "text": "Find a team", "href": "/teams"}],
            "stats": [{"_key": "s1", "value": "150+", "label": "Teams"}],
            "variant": "classic"
        });
        match Block::from_value(&value) {
            Block::Hero(hero) => {
                assert_eq!(hero.key, "h1");
                assert_eq!(hero.title.as_deref(), Some("The fastest sport on four legs"));
                assert_eq!(hero.buttons.len(), 1);
                assert_eq!(hero.stats[0].value.as_deref(), Some("150+"));
            }
            other => panic!("expected hero, got {}", other.type_tag()),
        }
    }

    #[test]
    fn unknown_tag_degrades() {
        let value = json!({"_type": "appPromo", "_key": "ap1", "title": "Get the app"});
        match Block::from_value(&value) {
            Block::Unknown { type_tag, key } => {
                assert_eq!(type_tag, "appPromo");
                assert_eq!(key, "ap1");
            }
            other => panic!("expected unknown, got {}", other.type_tag()),
        }
    }

    #[test]
    fn untyped_value_degrades() {
        let value = json!({"_key": "x", "title": "no type tag"});
        match Block::from_value(&value) {
            Block::Unknown { type_tag, .. } => assert_eq!(type_tag, "(untyped)"),
            other => panic!("expected unknown, got {}", other.type_tag()),
        }
    }

    #[test]
    fn malformed_known_shape_degrades() {
        // `stats` must be an array; a string makes the hero undecodable.
        let value = json!({"_type": "hero", "_key": "h2", "stats": "oops"});
        match Block::from_value(&value) {
            Block::Unknown { type_tag, key } => {
                assert_eq!(type_tag, "hero");
                assert_eq!(key, "h2");
            }
            other => panic!("expected unknown, got {}", other.type_tag()),
        }
    }

    #[test]
    fn missing_fields_default() {
        let value = json!({"_type": "cta", "_key": "c1"});
        match Block::from_value(&value) {
            Block::Cta(cta) => {
                assert!(cta.title.is_none());
                assert!(cta.buttons.is_empty());
            }
            other => panic!("expected cta, got {}", other.type_tag()),
        }
    }

    #[test]
    fn decode_all_preserves_order_and_isolates_failures() {
        let values = vec![
            json!({"_type": "hero", "_key": "a"}),
            json!({"_type": "mysteryBlock", "_key": "b"}),
            json!({"_type": "textBlock", "_key": "c"}),
        ];
        let blocks = Block::decode_all(&values);
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].type_tag(), "hero");
        assert_eq!(blocks[1].type_tag(), "mysteryBlock");
        assert_eq!(blocks[2].type_tag(), "textBlock");
        assert_eq!(blocks[1].key(), "b");
    }

    #[test]
    fn latest_posts_count_defaults() {
        let value = json!({"_type": "latestPosts", "_key": "lp"});
        match Block::from_value(&value) {
            Block::LatestPosts(block) => assert_eq!(block.posts_count, 3),
            other => panic!("expected latestPosts, got {}", other.type_tag()),
        }
    }
}
