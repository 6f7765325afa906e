//! Latest posts grid, fed from the snapshot's blog posts.

use maud::{Markup, html};

use crate::blocks::LatestPostsBlock;
use crate::builder::{Loading, RenderCtx};
use crate::types::BlogPost;

use super::{image_el, stagger_style};

pub fn render_latest(block: &LatestPostsBlock, ctx: &RenderCtx, loading: Loading) -> Markup {
    let reveal = ctx.observe(&format!("blk-{}", block.key), false);
    // Posts arrive newest-first from the fetch stage.
    let count = block.posts_count.clamp(1, 6);
    let posts: Vec<&BlogPost> = ctx.posts.iter().take(count).collect();
    let delays = ctx.staggered(posts.len());

    html! {
        section class={ "latest-posts " (reveal.class()) }
            data-reveal=[reveal.config_key.clone()] {
            header.section-header {
                @if let Some(eyebrow) = &block.eyebrow { span.eyebrow { (eyebrow) } }
                @if let Some(title) = &block.title { h2 { (title) } }
                @if let Some(description) = &block.description { p { (description) } }
            }
            @if posts.is_empty() {
                p.no-posts { "No posts yet — check back soon." }
            } @else {
                div.card-grid {
                    @for (post, delay) in posts.iter().zip(&delays) {
                        (post_card(post, ctx, loading, *delay))
                    }
                }
            }
            @if block.show_view_all {
                a.btn.btn-outline href="/blog/" { "View all posts" }
            }
        }
    }
}

pub fn post_card(post: &BlogPost, ctx: &RenderCtx, loading: Loading, delay: u64) -> Markup {
    html! {
        article.card.post-card style=[stagger_style(delay)] {
            a href={ "/blog/" (post.slug) "/" } {
                @if let Some(image) = &post.image {
                    (image_el(ctx, image, 960, loading, "card-image"))
                }
                h3 { (post.title.as_deref().unwrap_or("Untitled")) }
            }
            @if let Some(description) = &post.description { p { (description) } }
            footer.post-meta {
                @if let Some(author) = &post.author {
                    span.post-author { (author.name) }
                }
                @if let Some(date) = post.published_at.as_deref().and_then(display_date) {
                    time datetime=(post.published_at.as_deref().unwrap_or("")) { (date) }
                }
            }
        }
    }
}

/// `2026-03-14T09:00:00Z` → `2026-03-14`. Anything shorter passes through.
fn display_date(iso: &str) -> Option<String> {
    if iso.is_empty() {
        return None;
    }
    Some(iso.split('T').next().unwrap_or(iso).to_string())
}
