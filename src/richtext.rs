//! Rich text rendering.
//!
//! Content-source rich text is a flat array of typed nodes: text blocks
//! (style + styled spans + link definitions), inline images, block quotes,
//! code blocks, tables, and horizontal breaks. Each node renders
//! independently; a node whose type this build doesn't know is skipped with
//! a warning, never an error — the content schema evolves independently of
//! this binary.
//!
//! Consecutive list-item blocks of the same kind are grouped into one
//! `<ul>`/`<ol>`. Headings get slug ids derived from their text so in-page
//! links survive re-rendering.

use maud::{Markup, html};
use serde::Deserialize;
use serde_json::Value;

use crate::cdn;
use crate::config::{CdnConfig, ContentConfig};
use crate::types::ImageRef;

/// A decoded rich text node. Unknown `_type` tags fail decoding and are
/// skipped by [`render`].
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "_type")]
pub enum RichTextNode {
    #[serde(rename = "block")]
    Block(TextBlock),
    #[serde(rename = "image")]
    Image(InlineImage),
    #[serde(rename = "blockquote")]
    Blockquote(Blockquote),
    #[serde(rename = "codeBlock")]
    CodeBlock(CodeBlock),
    #[serde(rename = "table")]
    Table(Table),
    #[serde(rename = "break")]
    Break(BreakNode),
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextBlock {
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default)]
    pub children: Vec<Span>,
    #[serde(default, rename = "markDefs")]
    pub mark_defs: Vec<MarkDef>,
    #[serde(default, rename = "listItem")]
    pub list_item: Option<String>,
}

fn default_style() -> String {
    "normal".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Span {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub marks: Vec<String>,
}

/// A link definition referenced from span marks by `_key`.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkDef {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default, rename = "openInNewTab")]
    pub open_in_new_tab: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InlineImage {
    #[serde(flatten)]
    pub image: ImageRef,
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Blockquote {
    #[serde(default)]
    pub quote: Option<String>,
    #[serde(default)]
    pub attribution: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodeBlock {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Table {
    #[serde(default)]
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableRow {
    #[serde(default)]
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BreakNode {}

/// Render a rich text array.
///
/// Every node renders independently; nodes that fail to decode are skipped
/// with a warning so one unknown type cannot take down the document.
pub fn render(nodes: &[Value], content: &ContentConfig, cdn_cfg: &CdnConfig) -> Markup {
    let mut out: Vec<Markup> = Vec::new();
    // Pending list items: (ordered?, rendered items)
    let mut list: Option<(bool, Vec<Markup>)> = None;

    for node in nodes {
        let decoded: RichTextNode = match serde_json::from_value(node.clone()) {
            Ok(n) => n,
            Err(e) => {
                let tag = node.get("_type").and_then(Value::as_str).unwrap_or("?");
                tracing::warn!(node_type = tag, error = %e, "skipping rich text node");
                continue;
            }
        };

        // List grouping: consecutive same-kind list items share one list.
        if let RichTextNode::Block(block) = &decoded {
            if let Some(kind) = &block.list_item {
                let ordered = kind == "number";
                let item = html! { li { (render_spans(&block.children, &block.mark_defs)) } };
                match &mut list {
                    Some((o, items)) if *o == ordered => items.push(item),
                    _ => {
                        flush_list(&mut out, &mut list);
                        list = Some((ordered, vec![item]));
                    }
                }
                continue;
            }
        }
        flush_list(&mut out, &mut list);

        out.push(match decoded {
            RichTextNode::Block(block) => render_text_block(&block),
            RichTextNode::Image(image) => render_inline_image(&image, content, cdn_cfg),
            RichTextNode::Blockquote(quote) => render_blockquote(&quote),
            RichTextNode::CodeBlock(code) => render_code_block(&code),
            RichTextNode::Table(table) => render_table(&table),
            RichTextNode::Break(_) => html! { hr; },
        });
    }
    flush_list(&mut out, &mut list);

    html! {
        @for piece in &out { (piece) }
    }
}

fn flush_list(out: &mut Vec<Markup>, list: &mut Option<(bool, Vec<Markup>)>) {
    if let Some((ordered, items)) = list.take() {
        out.push(html! {
            @if ordered {
                ol { @for item in &items { (item) } }
            } @else {
                ul { @for item in &items { (item) } }
            }
        });
    }
}

fn render_text_block(block: &TextBlock) -> Markup {
    let spans = render_spans(&block.children, &block.mark_defs);
    match block.style.as_str() {
        "h2" => heading(2, block, spans),
        "h3" => heading(3, block, spans),
        "h4" => heading(4, block, spans),
        "h5" => heading(5, block, spans),
        "h6" => heading(6, block, spans),
        "blockquote" => html! { blockquote { (spans) } },
        _ => html! { p { (spans) } },
    }
}

fn heading(level: u8, block: &TextBlock, spans: Markup) -> Markup {
    let id = children_slug(&block.children);
    match level {
        2 => html! { h2 id=(id) { (spans) } },
        3 => html! { h3 id=(id) { (spans) } },
        4 => html! { h4 id=(id) { (spans) } },
        5 => html! { h5 id=(id) { (spans) } },
        _ => html! { h6 id=(id) { (spans) } },
    }
}

/// Slug for a heading from its concatenated span text: lowercased, only
/// alphanumerics kept, spaces collapsed to single dashes.
pub fn children_slug(children: &[Span]) -> String {
    let text: String = children.iter().map(|s| s.text.as_str()).collect();
    let mut slug = String::with_capacity(text.len());
    let mut last_dash = true;
    for ch in text.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch == ' ' || ch == '-') && !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

fn render_spans(children: &[Span], mark_defs: &[MarkDef]) -> Markup {
    html! {
        @for span in children {
            (render_span(span, mark_defs))
        }
    }
}

/// Wrap a span's text in its marks, innermost first. Decoration marks nest
/// inside the link when both are present.
fn render_span(span: &Span, mark_defs: &[MarkDef]) -> Markup {
    let mut inner = html! { (span.text) };
    let mut link: Option<&MarkDef> = None;

    for mark in &span.marks {
        match mark.as_str() {
            "strong" => inner = html! { strong { (inner) } },
            "em" => inner = html! { em { (inner) } },
            "code" => inner = html! { code { (inner) } },
            "underline" => inner = html! { u { (inner) } },
            "strike-through" => inner = html! { s { (inner) } },
            key => {
                if let Some(def) = mark_defs.iter().find(|d| d.key == key) {
                    link = Some(def);
                } else {
                    tracing::debug!(mark = key, "unknown span mark");
                }
            }
        }
    }

    if let Some(def) = link {
        match def.href.as_deref().filter(|h| !h.is_empty() && *h != "#") {
            Some(href) => {
                let target = def.open_in_new_tab.then_some("_blank");
                let rel = def.open_in_new_tab.then_some("noopener");
                inner = html! { a href=(href) target=[target] rel=[rel] { (inner) } };
            }
            // Authors sometimes publish before filling a link in.
            None => inner = html! { span.broken-link { (inner) } },
        }
    }
    inner
}

fn render_inline_image(node: &InlineImage, content: &ContentConfig, cdn_cfg: &CdnConfig) -> Markup {
    let Some(url) = cdn::image_url(content, cdn_cfg, &node.image, Some(1600)) else {
        return html! {};
    };
    let alt = node.image.alt.as_deref().unwrap_or("");
    html! {
        figure {
            img src=(url) alt=(alt) loading="lazy";
            @if let Some(caption) = node.caption.as_deref().filter(|c| !c.is_empty()) {
                figcaption { (caption) }
            }
        }
    }
}

fn render_blockquote(node: &Blockquote) -> Markup {
    html! {
        blockquote.attributed {
            p { (node.quote.as_deref().unwrap_or("")) }
            @if node.attribution.is_some() || node.source.is_some() {
                footer {
                    @if let Some(attribution) = &node.attribution { cite { (attribution) } }
                    @if let Some(source) = &node.source { " — " (source) }
                }
            }
        }
    }
}

fn render_code_block(node: &CodeBlock) -> Markup {
    let lang_class = node
        .language
        .as_deref()
        .map(|l| format!("language-{l}"))
        .unwrap_or_default();
    html! {
        @if let Some(filename) = node.filename.as_deref().filter(|f| !f.is_empty()) {
            div.code-filename { (filename) }
        }
        pre { code class=(lang_class) { (node.code.as_deref().unwrap_or("")) } }
    }
}

fn render_table(node: &Table) -> Markup {
    html! {
        table {
            tbody {
                @for row in &node.rows {
                    tr {
                        @for cell in &row.cells { td { (cell) } }
                    }
                }
            }
        }
    }
}

/// Concatenated plain text of a rich text array, for previews and meta
/// descriptions. Non-text nodes contribute nothing.
pub fn plain_text(nodes: &[Value]) -> String {
    let mut out = String::new();
    for node in nodes {
        if node.get("_type").and_then(Value::as_str) != Some("block") {
            continue;
        }
        if let Ok(block) = serde_json::from_value::<TextBlock>(node.clone()) {
            for span in &block.children {
                out.push_str(&span.text);
            }
            out.push(' ');
        }
    }
    out.trim_end().to_string()
}
