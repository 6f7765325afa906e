//! Hero section.
//!
//! Three visual variants share one structure: `classic` (text beside
//! image), `dynamic` (bold full-bleed), and `globe` (decorative world-map
//! backdrop for the community angle). The variant only changes the section
//! class and backdrop; content handling is identical, so a typo'd variant
//! degrades to classic.
//!
//! The first hero on a page arrives with [`Loading::Eager`]: its reveal is
//! pre-triggered (above the fold must not animate in) and its image loads
//! at high priority for first paint.

use maud::{Markup, html};

use crate::blocks::HeroBlock;
use crate::builder::{Loading, RenderCtx};
use crate::richtext;

use super::{buttons_row, image_el};

pub fn render(block: &HeroBlock, ctx: &RenderCtx, loading: Loading) -> Markup {
    let variant = match block.variant.as_deref() {
        Some("dynamic") => "dynamic",
        Some("globe") => "globe",
        _ => "classic",
    };
    let reveal = ctx.observe(&format!("blk-{}", block.key), loading == Loading::Eager);

    html! {
        section class={ "hero hero-" (variant) " " (reveal.class()) }
            data-reveal=[reveal.config_key.clone()] {
            @if variant == "globe" {
                div.hero-globe-backdrop aria-hidden="true" {}
            }
            div.hero-content {
                @if let Some(badge) = block.badge.as_deref().filter(|b| !b.is_empty()) {
                    span.badge { (badge) }
                }
                @if let Some(title) = block.title.as_deref().filter(|t| !t.is_empty()) {
                    h1 { (title) }
                }
                @if !block.rich_text.is_empty() {
                    div.hero-lead {
                        (richtext::render(&block.rich_text, &ctx.config.content, &ctx.config.cdn))
                    }
                }
                (buttons_row(&block.buttons))
                (stats_row(block))
            }
            @if let Some(image) = &block.image {
                div.hero-media {
                    (image_el(ctx, image, 1600, loading, "hero-image"))
                }
            }
        }
    }
}

/// Social-proof stats under the hero copy. Entries missing either half are
/// dropped rather than rendering lopsided.
fn stats_row(block: &HeroBlock) -> Markup {
    let usable: Vec<_> = block
        .stats
        .iter()
        .filter(|s| s.value.is_some() && s.label.is_some())
        .collect();
    if usable.is_empty() {
        return html! {};
    }
    html! {
        dl.hero-stats {
            @for stat in &usable {
                div.stat {
                    dt { (stat.value.as_deref().unwrap_or("")) }
                    dd { (stat.label.as_deref().unwrap_or("")) }
                }
            }
        }
    }
}
