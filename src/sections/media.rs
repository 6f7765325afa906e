//! Showcase sections: laptop scroll frame and video embed.

use maud::{Markup, html};

use crate::blocks::{MacbookScrollBlock, VideoSectionBlock};
use crate::builder::{Loading, RenderCtx};
use crate::reveal::RevealOptions;

use super::image_el;

/// Laptop showcase: a screenshot in a device frame that animates open as
/// the visitor scrolls. Uses a wider root margin than the default so the
/// animation starts before the frame is fully on screen.
pub fn render_macbook(block: &MacbookScrollBlock, ctx: &RenderCtx, loading: Loading) -> Markup {
    let mut options = RevealOptions::from_config(&ctx.config.animations);
    options.root_margin = "200px".to_string();
    let reveal = ctx.observe_with(&format!("blk-{}", block.key), &options);

    html! {
        section class={ "macbook-scroll " (reveal.class()) }
            data-reveal=[reveal.config_key.clone()] {
            div.showcase-copy {
                @if let Some(eyebrow) = &block.eyebrow { span.eyebrow { (eyebrow) } }
                @if let Some(title) = &block.title { h2 { (title) } }
                @if let Some(description) = &block.description { p { (description) } }
            }
            div.device-frame.with-gradient[block.show_gradient] {
                @if let Some(image) = &block.screen_image {
                    (image_el(ctx, image, 1600, loading, "device-screen"))
                }
            }
        }
    }
}

/// Video section: a poster image that swaps to an embedded player on click.
/// Without a video URL only the copy renders — no dead player chrome.
pub fn render_video(block: &VideoSectionBlock, ctx: &RenderCtx, loading: Loading) -> Markup {
    let reveal = ctx.observe(&format!("blk-{}", block.key), false);
    let video_url = block.video_url.as_deref().filter(|u| !u.is_empty());

    html! {
        section class={ "video-section " (reveal.class()) }
            data-reveal=[reveal.config_key.clone()] {
            div.showcase-copy {
                @if let Some(eyebrow) = &block.eyebrow { span.eyebrow { (eyebrow) } }
                @if let Some(title) = &block.title { h2 { (title) } }
                @if let Some(description) = &block.description { p { (description) } }
            }
            @if let Some(url) = video_url {
                figure.video-frame data-video-url=(url) {
                    @if let Some(poster) = &block.poster_image {
                        (image_el(ctx, poster, 1600, loading, "video-poster"))
                    }
                    button.video-play type="button" aria-label="Play video" { "▶" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{test_config, test_ctx};
    use serde_json::json;

    #[test]
    fn macbook_uses_wider_margin_observer() {
        let config = test_config();
        let ctx = test_ctx(&config);
        let block = MacbookScrollBlock {
            key: "m".to_string(),
            title: Some("Scores in your pocket".to_string()),
            ..Default::default()
        };
        let html = render_macbook(&block, &ctx, Loading::Lazy).into_string();
        assert!(html.contains("data-reveal=\"t100@200px\""));
    }

    #[test]
    fn macbook_gradient_flag_adds_class() {
        let config = test_config();
        let ctx = test_ctx(&config);
        let mut block = MacbookScrollBlock {
            key: "m".to_string(),
            show_gradient: true,
            ..Default::default()
        };
        block.screen_image = serde_json::from_value(json!({
            "id": "image-scr-1600x1000-png"
        }))
        .ok();
        let html = render_macbook(&block, &ctx, Loading::Lazy).into_string();
        assert!(html.contains("with-gradient"));
        assert!(html.contains("device-screen"));
    }

    #[test]
    fn video_without_url_renders_copy_only() {
        let config = test_config();
        let ctx = test_ctx(&config);
        let block = VideoSectionBlock {
            key: "v".to_string(),
            title: Some("Watch a race".to_string()),
            ..Default::default()
        };
        let html = render_video(&block, &ctx, Loading::Lazy).into_string();
        assert!(html.contains("Watch a race"));
        assert!(!html.contains("video-play"));
    }

    #[test]
    fn video_with_url_gets_player_chrome() {
        let config = test_config();
        let ctx = test_ctx(&config);
        let block = VideoSectionBlock {
            key: "v".to_string(),
            video_url: Some("https://www.youtube.com/watch?v=abc".to_string()),
            ..Default::default()
        };
        let html = render_video(&block, &ctx, Loading::Lazy).into_string();
        assert!(html.contains("data-video-url"));
        assert!(html.contains("video-play"));
    }
}
