//! Block section renderers.
//!
//! One renderer per registered block shape, grouped by affinity. All of
//! them are pure functions from block data plus [`RenderCtx`] to markup,
//! and all consume only optional fields — missing content shrinks a
//! section, it never fails it.

pub mod engage;
pub mod features;
pub mod finder;
pub mod hero;
pub mod media;
pub mod posts;
pub mod social;
pub mod text;

use maud::{Markup, html};
use serde_json::Value;

use crate::builder::{Loading, RenderCtx};
use crate::cdn;
use crate::richtext;
use crate::types::{Button, ImageRef};

/// Standard section header: eyebrow, title, optional rich text lead.
pub(crate) fn section_header(
    ctx: &RenderCtx,
    eyebrow: Option<&str>,
    title: Option<&str>,
    lead: &[Value],
) -> Markup {
    html! {
        header.section-header {
            @if let Some(eyebrow) = eyebrow.filter(|e| !e.is_empty()) {
                span.eyebrow { (eyebrow) }
            }
            @if let Some(title) = title.filter(|t| !t.is_empty()) {
                h2 { (title) }
            }
            @if !lead.is_empty() {
                div.section-lead {
                    (richtext::render(lead, &ctx.config.content, &ctx.config.cdn))
                }
            }
        }
    }
}

/// An image element with srcset, focal-point position, and the block's
/// loading strategy. Renders nothing for an unusable reference.
pub(crate) fn image_el(
    ctx: &RenderCtx,
    image: &ImageRef,
    width: u32,
    loading: Loading,
    class: &str,
) -> Markup {
    let content = &ctx.config.content;
    let cdn_cfg = &ctx.config.cdn;
    let Some(url) = cdn::image_url(content, cdn_cfg, image, Some(width)) else {
        return html! {};
    };
    let srcset = cdn::srcset(content, cdn_cfg, image);
    let alt = image.alt.as_deref().unwrap_or("");
    let position = cdn::object_position(image.hotspot).map(|p| format!("object-position: {p}"));

    html! {
        img src=(url)
            srcset=[srcset]
            alt=(alt)
            class=(class)
            loading=(loading.img_loading())
            fetchpriority=[loading.fetch_priority()]
            style=[position];
    }
}

/// A row of link buttons. Buttons without both text and target are dropped.
pub(crate) fn buttons_row(buttons: &[Button]) -> Markup {
    let usable: Vec<&Button> = buttons
        .iter()
        .filter(|b| b.text.is_some() && b.href.is_some())
        .collect();
    if usable.is_empty() {
        return html! {};
    }
    html! {
        div.buttons {
            @for button in &usable {
                @let class = match button.variant.as_deref() {
                    Some("outline") => "btn btn-outline",
                    _ => "btn btn-default",
                };
                @let target = button.open_in_new_tab.then_some("_blank");
                @let rel = button.open_in_new_tab.then_some("noopener");
                a class=(class)
                    href=(button.href.as_deref().unwrap_or("#"))
                    target=[target]
                    rel=[rel] {
                    (button.text.as_deref().unwrap_or(""))
                }
            }
        }
    }
}

/// Inline `transition-delay` style for a staggered child, omitted at zero.
pub(crate) fn stagger_style(delay_ms: u64) -> Option<String> {
    (delay_ms > 0).then(|| format!("transition-delay: {delay_ms}ms"))
}
