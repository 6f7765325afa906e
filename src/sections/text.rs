//! Plain prose section: a rich text column, nothing else.

use maud::{Markup, html};

use crate::blocks::TextBlockBlock;
use crate::builder::RenderCtx;
use crate::richtext;

pub fn render_text(block: &TextBlockBlock, ctx: &RenderCtx) -> Markup {
    let reveal = ctx.observe(&format!("blk-{}", block.key), false);
    html! {
        section class={ "text-block prose " (reveal.class()) }
            data-reveal=[reveal.config_key.clone()] {
            (richtext::render(&block.rich_text, &ctx.config.content, &ctx.config.cdn))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{test_config, test_ctx};
    use serde_json::json;

    #[test]
    fn renders_rich_text_content() {
        let config = test_config();
        let ctx = test_ctx(&config);
        let block = TextBlockBlock {
            key: "t1".to_string(),
            rich_text: vec![json!({
                "_type": "block",
                "style": "h2",
                "children": [{"_type": "span", "text": "Tournament rules"}],
                "markDefs": []
            })],
        };
        let html = render_text(&block, &ctx).into_string();
        assert!(html.contains("Tournament rules"));
        assert!(html.contains(r#"id="tournament-rules""#));
        assert!(html.contains("prose"));
    }

    #[test]
    fn empty_rich_text_still_renders_shell() {
        let config = test_config();
        let ctx = test_ctx(&config);
        let block = TextBlockBlock {
            key: "t1".to_string(),
            rich_text: vec![],
        };
        let html = render_text(&block, &ctx).into_string();
        assert!(html.contains("text-block"));
    }
}
