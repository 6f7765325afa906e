//! Feature card grids: icon cards, screenshot cards, and image link cards.
//!
//! All three are staggered grids — card `i` reveals `i * stagger_delay`
//! after the grid crosses the visibility threshold.

use maud::{Markup, PreEscaped, html};

use crate::blocks::{FeatureCardsIconBlock, FeatureCardsScreenshotBlock, ImageLinkCardsBlock};
use crate::builder::{Loading, RenderCtx};
use crate::richtext;

use super::{buttons_row, image_el, section_header, stagger_style};

pub fn render_icon_cards(block: &FeatureCardsIconBlock, ctx: &RenderCtx) -> Markup {
    let reveal = ctx.observe(&format!("blk-{}", block.key), false);
    let delays = ctx.staggered(block.cards.len());

    html! {
        section class={ "feature-cards feature-cards-icon " (reveal.class()) }
            data-reveal=[reveal.config_key.clone()] {
            (section_header(ctx, block.eyebrow.as_deref(), block.title.as_deref(), &block.rich_text))
            div.card-grid {
                @for (card, delay) in block.cards.iter().zip(&delays) {
                    article.card style=[stagger_style(*delay)] {
                        @if let Some(icon) = card.icon.as_deref().filter(|i| !i.is_empty()) {
                            // Icon SVGs are authored in the studio's icon
                            // picker, not user-supplied.
                            span.card-icon aria-hidden="true" { (PreEscaped(icon.to_string())) }
                        }
                        @if let Some(title) = &card.title { h3 { (title) } }
                        @if !card.rich_text.is_empty() {
                            div.card-body {
                                (richtext::render(&card.rich_text, &ctx.config.content, &ctx.config.cdn))
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn render_screenshot_cards(
    block: &FeatureCardsScreenshotBlock,
    ctx: &RenderCtx,
    loading: Loading,
) -> Markup {
    let reveal = ctx.observe(&format!("blk-{}", block.key), false);
    let delays = ctx.staggered(block.cards.len());

    html! {
        section class={ "feature-cards feature-cards-screenshot " (reveal.class()) }
            data-reveal=[reveal.config_key.clone()] {
            (section_header(ctx, block.eyebrow.as_deref(), block.title.as_deref(), &block.rich_text))
            div.card-grid {
                @for (card, delay) in block.cards.iter().zip(&delays) {
                    article.card.card-screenshot style=[stagger_style(*delay)] {
                        @if let Some(screenshot) = &card.screenshot {
                            (image_el(ctx, screenshot, 960, loading, "card-image"))
                        }
                        @if let Some(title) = &card.title { h3 { (title) } }
                        @if let Some(description) = &card.description { p { (description) } }
                        @if let Some(href) = card.href.as_deref().filter(|h| !h.is_empty()) {
                            @let target = card.open_in_new_tab.then_some("_blank");
                            a.card-link href=(href) target=[target] { "Learn more" }
                        }
                    }
                }
            }
        }
    }
}

pub fn render_image_link_cards(
    block: &ImageLinkCardsBlock,
    ctx: &RenderCtx,
    loading: Loading,
) -> Markup {
    let reveal = ctx.observe(&format!("blk-{}", block.key), false);
    let delays = ctx.staggered(block.cards.len());

    html! {
        section class={ "image-link-cards " (reveal.class()) }
            data-reveal=[reveal.config_key.clone()] {
            (section_header(ctx, block.eyebrow.as_deref(), block.title.as_deref(), &block.rich_text))
            div.card-grid {
                @for (card, delay) in block.cards.iter().zip(&delays) {
                    @let href = card.href.as_deref().filter(|h| !h.is_empty());
                    @let target = card.open_in_new_tab.then_some("_blank");
                    @if let Some(href) = href {
                        a.card.card-image-link href=(href) target=[target] style=[stagger_style(*delay)] {
                            (image_link_card_body(card, ctx, loading))
                        }
                    } @else {
                        div.card.card-image-link style=[stagger_style(*delay)] {
                            (image_link_card_body(card, ctx, loading))
                        }
                    }
                }
            }
            (buttons_row(&block.buttons))
        }
    }
}

fn image_link_card_body(
    card: &crate::blocks::ImageLinkCard,
    ctx: &RenderCtx,
    loading: Loading,
) -> Markup {
    html! {
        @if let Some(image) = &card.image {
            (image_el(ctx, image, 960, loading, "card-image"))
        }
        @if let Some(title) = &card.title { h3 { (title) } }
        @if let Some(description) = &card.description { p { (description) } }
    }
}
