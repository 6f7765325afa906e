//! Conversion sections: CTA banner, FAQ accordion, newsletter signup, and
//! the contact form.

use maud::{Markup, html};

use crate::blocks::{ContactFormBlock, CtaBlock, FaqAccordionBlock, SubscribeNewsletterBlock};
use crate::builder::RenderCtx;
use crate::richtext;

use super::{buttons_row, section_header};

pub fn render_cta(block: &CtaBlock, ctx: &RenderCtx) -> Markup {
    let reveal = ctx.observe(&format!("blk-{}", block.key), false);
    html! {
        section class={ "cta " (reveal.class()) } data-reveal=[reveal.config_key.clone()] {
            (section_header(ctx, block.eyebrow.as_deref(), block.title.as_deref(), &block.rich_text))
            (buttons_row(&block.buttons))
        }
    }
}

pub fn render_faq(block: &FaqAccordionBlock, ctx: &RenderCtx) -> Markup {
    let reveal = ctx.observe(&format!("blk-{}", block.key), false);
    html! {
        section class={ "faq-accordion " (reveal.class()) } data-reveal=[reveal.config_key.clone()] {
            header.section-header {
                @if let Some(eyebrow) = &block.eyebrow { span.eyebrow { (eyebrow) } }
                @if let Some(title) = &block.title { h2 { (title) } }
                @if let Some(subtitle) = &block.subtitle { p { (subtitle) } }
            }
            div.faq-list {
                @for faq in &block.faqs {
                    details.faq-item {
                        summary { (faq.title.as_deref().unwrap_or("")) }
                        div.faq-answer {
                            (richtext::render(&faq.rich_text, &ctx.config.content, &ctx.config.cdn))
                        }
                    }
                }
            }
            @if let Some(link) = &block.link {
                @if let Some(href) = link.href.as_deref().filter(|h| !h.is_empty()) {
                    @let target = link.open_in_new_tab.then_some("_blank");
                    a.faq-more href=(href) target=[target] {
                        (link.title.as_deref().unwrap_or("More questions answered"))
                    }
                }
            }
        }
    }
}

pub fn render_newsletter(block: &SubscribeNewsletterBlock, ctx: &RenderCtx) -> Markup {
    let reveal = ctx.observe(&format!("blk-{}", block.key), false);
    html! {
        section class={ "subscribe-newsletter " (reveal.class()) }
            data-reveal=[reveal.config_key.clone()] {
            @if let Some(title) = &block.title { h2 { (title) } }
            @if !block.sub_title.is_empty() {
                div.newsletter-subtitle {
                    (richtext::render(&block.sub_title, &ctx.config.content, &ctx.config.cdn))
                }
            }
            form.newsletter-form method="post" action="/api/subscribe" {
                input type="email" name="email" required placeholder="you@example.com"
                    aria-label="Email address";
                button.btn.btn-default type="submit" data-single-submit { "Subscribe" }
            }
            @if !block.helper_text.is_empty() {
                div.newsletter-helper {
                    (richtext::render(&block.helper_text, &ctx.config.content, &ctx.config.cdn))
                }
            }
        }
    }
}

/// The contact form. Server-side rules (see `contact`) are mirrored in the
/// markup's constraint attributes so most violations never leave the
/// browser; the submit button disables itself while a submission is
/// outstanding.
pub fn render_contact(block: &ContactFormBlock, ctx: &RenderCtx) -> Markup {
    let reveal = ctx.observe(&format!("blk-{}", block.key), false);
    html! {
        section class={ "contact-form " (reveal.class()) } data-reveal=[reveal.config_key.clone()] {
            header.section-header {
                @if let Some(eyebrow) = &block.eyebrow { span.eyebrow { (eyebrow) } }
                @if let Some(title) = &block.title { h2 { (title) } }
                @if let Some(description) = &block.description { p { (description) } }
            }
            form method="post" action="/api/contact" {
                label { "Name"
                    input type="text" name="name" required minlength="2" maxlength="100";
                }
                label { "Email"
                    input type="email" name="email" required;
                }
                label { "Subject"
                    input type="text" name="subject" maxlength="200";
                }
                label { "Message"
                    textarea name="message" required minlength="10" maxlength="5000" rows="6" {}
                }
                button.btn.btn-default type="submit" data-single-submit { "Send message" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{Faq, FaqLink};
    use crate::test_helpers::{test_config, test_ctx};
    use serde_json::json;

    #[test]
    fn cta_renders_header_and_buttons() {
        let config = test_config();
        let ctx = test_ctx(&config);
        let block = CtaBlock {
            key: "c".to_string(),
            title: Some("Ready to race?".to_string()),
            buttons: vec![crate::types::Button {
                text: Some("Find a team".to_string()),
                href: Some("/teams/".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let html = render_cta(&block, &ctx).into_string();
        assert!(html.contains("Ready to race?"));
        assert!(html.contains("/teams/"));
    }

    #[test]
    fn faq_items_render_as_details() {
        let config = test_config();
        let ctx = test_ctx(&config);
        let block = FaqAccordionBlock {
            key: "f".to_string(),
            title: Some("FAQ".to_string()),
            faqs: vec![Faq {
                id: "q1".to_string(),
                title: Some("How fast is flyball?".to_string()),
                rich_text: vec![json!({
                    "_type": "block", "style": "normal",
                    "children": [{"_type": "span", "text": "Under 4 seconds for a good run."}],
                    "markDefs": []
                })],
            }],
            ..Default::default()
        };
        let html = render_faq(&block, &ctx).into_string();
        assert!(html.contains("<details"));
        assert!(html.contains("How fast is flyball?"));
        assert!(html.contains("Under 4 seconds"));
    }

    #[test]
    fn faq_link_omitted_without_href() {
        let config = test_config();
        let ctx = test_ctx(&config);
        let block = FaqAccordionBlock {
            key: "f".to_string(),
            link: Some(FaqLink {
                title: Some("More".to_string()),
                href: None,
                open_in_new_tab: false,
            }),
            ..Default::default()
        };
        let html = render_faq(&block, &ctx).into_string();
        assert!(!html.contains("faq-more"));
    }

    #[test]
    fn contact_form_mirrors_validation_constraints() {
        let config = test_config();
        let ctx = test_ctx(&config);
        let block = ContactFormBlock {
            key: "cf".to_string(),
            title: Some("Get in touch".to_string()),
            ..Default::default()
        };
        let html = render_contact(&block, &ctx).into_string();
        assert!(html.contains(r#"minlength="2""#));
        assert!(html.contains(r#"maxlength="100""#));
        assert!(html.contains(r#"maxlength="200""#));
        assert!(html.contains(r#"minlength="10""#));
        assert!(html.contains(r#"maxlength="5000""#));
        assert!(html.contains("data-single-submit"));
    }

    #[test]
    fn newsletter_renders_form_and_helper() {
        let config = test_config();
        let ctx = test_ctx(&config);
        let block = SubscribeNewsletterBlock {
            key: "n".to_string(),
            title: Some("Stay in the loop".to_string()),
            helper_text: vec![json!({
                "_type": "block", "style": "normal",
                "children": [{"_type": "span", "text": "No spam, ever."}],
                "markDefs": []
            })],
            ..Default::default()
        };
        let html = render_newsletter(&block, &ctx).into_string();
        assert!(html.contains("Stay in the loop"));
        assert!(html.contains(r#"type="email""#));
        assert!(html.contains("No spam, ever."));
    }
}
