//! Social-proof sections: testimonials, logo cloud, stats.

use maud::{Markup, html};

use crate::blocks::{LogoCloudBlock, StatsSectionBlock, TestimonialsBlock};
use crate::builder::{Loading, RenderCtx};

use super::{image_el, section_header, stagger_style};

pub fn render_testimonials(block: &TestimonialsBlock, ctx: &RenderCtx) -> Markup {
    let reveal = ctx.observe(&format!("blk-{}", block.key), false);
    let delays = ctx.staggered(block.testimonials.len());

    html! {
        section class={ "testimonials " (reveal.class()) }
            data-reveal=[reveal.config_key.clone()] {
            (section_header(ctx, block.eyebrow.as_deref(), block.title.as_deref(), &block.rich_text))
            div.card-grid {
                @for (t, delay) in block.testimonials.iter().zip(&delays) {
                    figure.testimonial style=[stagger_style(*delay)] {
                        @if let Some(rating) = t.rating {
                            (stars(rating))
                        }
                        blockquote { (t.quote.as_deref().unwrap_or("")) }
                        figcaption {
                            @if let Some(image) = &t.author_image {
                                (image_el(ctx, image, 96, Loading::Lazy, "avatar"))
                            }
                            span.author-name { (t.author_name.as_deref().unwrap_or("")) }
                            @if let Some(role) = &t.author_role {
                                span.author-role { (role) }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Star rating clamped to 1-5.
fn stars(rating: u8) -> Markup {
    let filled = rating.clamp(1, 5) as usize;
    html! {
        span.stars aria-label={ (filled) " out of 5 stars" } {
            (("★".repeat(filled)))
            (("☆".repeat(5 - filled)))
        }
    }
}

pub fn render_logo_cloud(block: &LogoCloudBlock, ctx: &RenderCtx) -> Markup {
    let reveal = ctx.observe(&format!("blk-{}", block.key), false);
    html! {
        section class={ "logo-cloud " (reveal.class()) }
            data-reveal=[reveal.config_key.clone()] {
            @if let Some(title) = block.title.as_deref().filter(|t| !t.is_empty()) {
                p.logo-cloud-title { (title) }
            }
            ul.logo-row {
                @for logo in &block.logos {
                    @let name = logo.name.as_deref().unwrap_or("");
                    li {
                        @if let Some(url) = logo.url.as_deref().filter(|u| !u.is_empty()) {
                            a href=(url) target="_blank" rel="noopener" aria-label=(name) {
                                (logo_image(logo, ctx))
                            }
                        } @else {
                            (logo_image(logo, ctx))
                        }
                    }
                }
            }
        }
    }
}

fn logo_image(logo: &crate::blocks::Logo, ctx: &RenderCtx) -> Markup {
    match &logo.logo {
        Some(image) => image_el(ctx, image, 320, Loading::Lazy, "logo-image"),
        // A logo without an image still earns its name in text.
        None => html! { span.logo-name { (logo.name.as_deref().unwrap_or("")) } },
    }
}

pub fn render_stats(block: &StatsSectionBlock, ctx: &RenderCtx) -> Markup {
    let reveal = ctx.observe(&format!("blk-{}", block.key), false);
    let delays = ctx.staggered(block.stats.len());
    let variant = match block.variant.as_deref() {
        Some("accent") => "stats-accent",
        _ => "stats-plain",
    };

    html! {
        section class={ "stats-section " (variant) " " (reveal.class()) }
            data-reveal=[reveal.config_key.clone()] {
            (section_header(ctx, block.eyebrow.as_deref(), block.title.as_deref(), &block.rich_text))
            dl.stats-grid {
                @for (stat, delay) in block.stats.iter().zip(&delays) {
                    div.stat style=[stagger_style(*delay)] {
                        dt { (stat.value.as_deref().unwrap_or("")) }
                        dd {
                            (stat.label.as_deref().unwrap_or(""))
                            @if let Some(description) = &stat.description {
                                span.stat-description { (description) }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{Logo, Stat, Testimonial};
    use crate::test_helpers::{test_config, test_ctx};

    #[test]
    fn testimonial_renders_quote_author_and_stars() {
        let config = test_config();
        let ctx = test_ctx(&config);
        let block = TestimonialsBlock {
            key: "t".to_string(),
            testimonials: vec![Testimonial {
                key: "t0".to_string(),
                quote: Some("Our dogs love race night.".to_string()),
                author_name: Some("Sam P.".to_string()),
                author_role: Some("Team captain".to_string()),
                rating: Some(5),
                author_image: None,
            }],
            ..Default::default()
        };
        let html = render_testimonials(&block, &ctx).into_string();
        assert!(html.contains("Our dogs love race night."));
        assert!(html.contains("Sam P."));
        assert!(html.contains("★★★★★"));
    }

    #[test]
    fn rating_clamps_out_of_range() {
        let html = stars(9).into_string();
        assert!(html.contains("★★★★★"));
        assert!(!html.contains("☆"));
        let html = stars(0).into_string();
        assert!(html.contains("★☆☆☆☆"));
    }

    #[test]
    fn logo_without_image_shows_name() {
        let config = test_config();
        let ctx = test_ctx(&config);
        let block = LogoCloudBlock {
            key: "l".to_string(),
            title: Some("Leagues we run in".to_string()),
            logos: vec![Logo {
                key: "l0".to_string(),
                name: Some("BFA".to_string()),
                url: Some("https://flyball.org.uk".to_string()),
                logo: None,
            }],
            ..Default::default()
        };
        let html = render_logo_cloud(&block, &ctx).into_string();
        assert!(html.contains("logo-name"));
        assert!(html.contains("BFA"));
        assert!(html.contains("rel=\"noopener\""));
    }

    #[test]
    fn stats_variant_class() {
        let config = test_config();
        let ctx = test_ctx(&config);
        let block = StatsSectionBlock {
            key: "s".to_string(),
            variant: Some("accent".to_string()),
            stats: vec![Stat {
                key: "s0".to_string(),
                value: Some("320".to_string()),
                label: Some("Dogs registered".to_string()),
                description: Some("across all divisions".to_string()),
            }],
            ..Default::default()
        };
        let html = render_stats(&block, &ctx).into_string();
        assert!(html.contains("stats-accent"));
        assert!(html.contains("Dogs registered"));
        assert!(html.contains("across all divisions"));
    }
}
