//! Content schema registry and snapshot validation.
//!
//! Declares, for each block shape the authoring tool offers, its field list
//! with constraints and a preview projection (what the editor sees in the
//! page-builder list). This is pure data with one consumer: the `check`
//! command walks a snapshot against the registry and reports problems
//! before they reach editors or a deploy.
//!
//! Registry problems are authoring-time concerns. The rendering path never
//! consults this module — at render time an unknown or malformed block
//! degrades to a placeholder instead (see `blocks`).
//!
//! Note the registry intentionally declares one more shape than the
//! renderer set: `appPromo` exists in the authoring tool but has no shipped
//! section yet, and pages using it get the placeholder.

use serde_json::Value;
use std::fmt;

/// What a field holds, as far as validation cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    RichText,
    Image,
    Array,
    Number,
    Boolean,
    Url,
}

/// One field declaration within a block shape.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// For arrays: inclusive bounds on item count.
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    /// For strings: lengths beyond this warn (copy probably won't fit the
    /// design), but don't fail.
    pub warn_length: Option<usize>,
    /// For numbers: inclusive range.
    pub range: Option<(f64, f64)>,
}

impl FieldDef {
    const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            min_items: None,
            max_items: None,
            warn_length: None,
            range: None,
        }
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    const fn items(mut self, min: usize, max: usize) -> Self {
        self.min_items = Some(min);
        self.max_items = Some(max);
        self
    }

    const fn warn_len(mut self, len: usize) -> Self {
        self.warn_length = Some(len);
        self
    }

    const fn range(mut self, min: f64, max: f64) -> Self {
        self.range = Some((min, max));
        self
    }
}

/// Editor-facing preview projection for the page-builder list.
#[derive(Debug, Clone)]
pub struct Preview {
    /// Field whose value becomes the preview title.
    pub title_field: &'static str,
    /// Fixed subtitle naming the shape.
    pub subtitle: &'static str,
    /// Field supplying preview media, if any.
    pub media_field: Option<&'static str>,
}

/// A declared block shape.
#[derive(Debug, Clone)]
pub struct BlockSchema {
    pub name: &'static str,
    pub title: &'static str,
    pub fields: Vec<FieldDef>,
    pub preview: Preview,
}

/// The full shape registry, in the order the authoring tool lists them.
pub fn registry() -> Vec<BlockSchema> {
    use FieldKind::*;
    let preview = |title_field, subtitle, media_field| Preview {
        title_field,
        subtitle,
        media_field,
    };

    vec![
        BlockSchema {
            name: "hero",
            title: "Hero",
            fields: vec![
                FieldDef::new("badge", String).warn_len(40),
                FieldDef::new("title", String).required().warn_len(120),
                FieldDef::new("richText", RichText),
                FieldDef::new("image", Image),
                FieldDef::new("buttons", Array).items(0, 2),
                FieldDef::new("stats", Array).items(0, 4),
                FieldDef::new("variant", String),
            ],
            preview: preview("title", "Hero Block", Some("image")),
        },
        BlockSchema {
            name: "cta",
            title: "Call to Action",
            fields: vec![
                FieldDef::new("eyebrow", String).warn_len(40),
                FieldDef::new("title", String).required().warn_len(120),
                FieldDef::new("richText", RichText),
                FieldDef::new("buttons", Array).items(1, 2),
            ],
            preview: preview("title", "CTA Block", None),
        },
        BlockSchema {
            name: "faqAccordion",
            title: "FAQ Accordion",
            fields: vec![
                FieldDef::new("eyebrow", String),
                FieldDef::new("title", String).required().warn_len(120),
                FieldDef::new("subtitle", String).warn_len(200),
                FieldDef::new("faqs", Array).required().items(1, 20),
            ],
            preview: preview("title", "FAQ Block", None),
        },
        BlockSchema {
            name: "featureCardsIcon",
            title: "Feature Cards (Icon)",
            fields: vec![
                FieldDef::new("eyebrow", String),
                FieldDef::new("title", String).required().warn_len(120),
                FieldDef::new("richText", RichText),
                FieldDef::new("cards", Array).required().items(1, 6),
            ],
            preview: preview("title", "Feature Cards", None),
        },
        BlockSchema {
            name: "featureCardsScreenshot",
            title: "Feature Cards (Screenshot)",
            fields: vec![
                FieldDef::new("eyebrow", String),
                FieldDef::new("title", String).required().warn_len(120),
                FieldDef::new("richText", RichText),
                FieldDef::new("cards", Array).required().items(1, 6),
            ],
            preview: preview("title", "Feature Cards", None),
        },
        BlockSchema {
            name: "subscribeNewsletter",
            title: "Newsletter Signup",
            fields: vec![
                FieldDef::new("title", String).required().warn_len(120),
                FieldDef::new("subTitle", RichText),
                FieldDef::new("helperText", RichText),
            ],
            preview: preview("title", "Newsletter Block", None),
        },
        BlockSchema {
            name: "imageLinkCards",
            title: "Image Link Cards",
            fields: vec![
                FieldDef::new("eyebrow", String),
                FieldDef::new("title", String).required().warn_len(120),
                FieldDef::new("richText", RichText),
                FieldDef::new("buttons", Array).items(0, 2),
                FieldDef::new("cards", Array).required().items(1, 8),
            ],
            preview: preview("title", "Image Link Cards", None),
        },
        BlockSchema {
            name: "textBlock",
            title: "Text Block",
            fields: vec![FieldDef::new("richText", RichText).required()],
            preview: preview("richText", "Text Block", None),
        },
        BlockSchema {
            name: "testimonials",
            title: "Testimonials",
            fields: vec![
                FieldDef::new("eyebrow", String),
                FieldDef::new("title", String).warn_len(120),
                FieldDef::new("richText", RichText),
                FieldDef::new("testimonials", Array).required().items(1, 12),
            ],
            preview: preview("title", "Testimonials Block", None),
        },
        BlockSchema {
            name: "logoCloud",
            title: "Logo Cloud",
            fields: vec![
                FieldDef::new("title", String).warn_len(120),
                FieldDef::new("logos", Array).required().items(1, 12),
            ],
            preview: preview("title", "Logo Cloud", None),
        },
        BlockSchema {
            name: "statsSection",
            title: "Stats Section",
            fields: vec![
                FieldDef::new("eyebrow", String),
                FieldDef::new("title", String).warn_len(120),
                FieldDef::new("richText", RichText),
                FieldDef::new("variant", String),
                FieldDef::new("stats", Array).required().items(1, 6),
            ],
            preview: preview("title", "Stats Block", None),
        },
        BlockSchema {
            name: "macbookScroll",
            title: "Laptop Scroll Showcase",
            fields: vec![
                FieldDef::new("eyebrow", String),
                FieldDef::new("title", String).warn_len(120),
                FieldDef::new("description", String).warn_len(300),
                FieldDef::new("screenImage", Image).required(),
                FieldDef::new("showGradient", Boolean),
            ],
            preview: preview("title", "Laptop Showcase", Some("screenImage")),
        },
        BlockSchema {
            name: "videoSection",
            title: "Video Section",
            fields: vec![
                FieldDef::new("eyebrow", String),
                FieldDef::new("title", String).warn_len(120),
                FieldDef::new("description", String).warn_len(300),
                FieldDef::new("videoUrl", Url).required(),
                FieldDef::new("posterImage", Image),
            ],
            preview: preview("title", "Video Block", Some("posterImage")),
        },
        BlockSchema {
            name: "latestPosts",
            title: "Latest Posts",
            fields: vec![
                FieldDef::new("eyebrow", String),
                FieldDef::new("title", String).warn_len(120),
                FieldDef::new("description", String).warn_len(300),
                FieldDef::new("postsCount", Number).range(1.0, 6.0),
                FieldDef::new("showViewAll", Boolean),
            ],
            preview: preview("title", "Latest Posts", None),
        },
        BlockSchema {
            name: "teamFinder",
            title: "Team Finder",
            fields: vec![
                FieldDef::new("eyebrow", String),
                FieldDef::new("title", String).required().warn_len(120),
                FieldDef::new("description", String).warn_len(300),
                FieldDef::new("searchPlaceholder", String).warn_len(80),
                FieldDef::new("noResultsMessage", String).warn_len(160),
            ],
            preview: preview("title", "Team Finder", None),
        },
        BlockSchema {
            name: "teamFinderTeaser",
            title: "Team Finder Teaser",
            fields: vec![
                FieldDef::new("eyebrow", String),
                FieldDef::new("title", String).required().warn_len(120),
                FieldDef::new("description", String).warn_len(300),
                FieldDef::new("searchPlaceholder", String).warn_len(80),
                FieldDef::new("showStats", Boolean),
                FieldDef::new("ctaText", String).warn_len(40),
            ],
            preview: preview("title", "Team Finder Teaser", None),
        },
        BlockSchema {
            name: "contactForm",
            title: "Contact Form",
            fields: vec![
                FieldDef::new("eyebrow", String),
                FieldDef::new("title", String).required().warn_len(120),
                FieldDef::new("description", String).warn_len(300),
            ],
            preview: preview("title", "Contact Form", None),
        },
        BlockSchema {
            name: "appPromo",
            title: "App Promo",
            fields: vec![
                FieldDef::new("title", String).required().warn_len(120),
                FieldDef::new("description", String).warn_len(300),
                FieldDef::new("screenshots", Array).items(1, 4),
            ],
            preview: preview("title", "App Promo", None),
        },
    ]
}

/// Severity of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The block will render as a placeholder or drop content.
    Error,
    /// The block renders, but probably not as the author intends.
    Warning,
}

/// One validation finding, addressable to a document and block.
#[derive(Debug, Clone)]
pub struct Finding {
    pub severity: Severity,
    pub document_id: String,
    pub block_key: String,
    pub block_type: String,
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(
            f,
            "{tag}: {}#{} ({}): {}",
            self.document_id, self.block_key, self.block_type, self.message
        )
    }
}

/// Validate one document's raw block list against the registry.
pub fn validate_document(doc_id: &str, blocks: &[Value]) -> Vec<Finding> {
    let registry = registry();
    let mut findings = Vec::new();

    for block in blocks {
        let block_type = block
            .get("_type")
            .and_then(Value::as_str)
            .unwrap_or("(untyped)")
            .to_string();
        let block_key = block
            .get("_key")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();

        let mut push = |severity, message: String| {
            findings.push(Finding {
                severity,
                document_id: doc_id.to_string(),
                block_key: block_key.clone(),
                block_type: block_type.clone(),
                message,
            });
        };

        if block_key.is_empty() {
            push(Severity::Error, "block is missing its _key".to_string());
        }

        let Some(schema) = registry.iter().find(|s| s.name == block_type) else {
            push(
                Severity::Error,
                format!("unknown block shape `{block_type}`; it will render as a placeholder"),
            );
            continue;
        };

        for field in &schema.fields {
            let value = block.get(field.name);
            let present = value.is_some_and(|v| !v.is_null());

            if field.required && !present {
                push(
                    Severity::Error,
                    format!("required field `{}` is missing", field.name),
                );
                continue;
            }
            let Some(value) = value.filter(|v| !v.is_null()) else {
                continue;
            };

            match field.kind {
                FieldKind::Array => {
                    let len = value.as_array().map(Vec::len);
                    match len {
                        None => push(
                            Severity::Error,
                            format!("field `{}` should be an array", field.name),
                        ),
                        Some(len) => {
                            if let Some(min) = field.min_items {
                                if len < min {
                                    push(
                                        Severity::Error,
                                        format!(
                                            "field `{}` has {len} items, needs at least {min}",
                                            field.name
                                        ),
                                    );
                                }
                            }
                            if let Some(max) = field.max_items {
                                if len > max {
                                    push(
                                        Severity::Warning,
                                        format!(
                                            "field `{}` has {len} items, design fits at most {max}",
                                            field.name
                                        ),
                                    );
                                }
                            }
                        }
                    }
                }
                FieldKind::String | FieldKind::Url => match value.as_str() {
                    None => push(
                        Severity::Error,
                        format!("field `{}` should be a string", field.name),
                    ),
                    Some(s) => {
                        if let Some(warn_at) = field.warn_length {
                            if s.len() > warn_at {
                                push(
                                    Severity::Warning,
                                    format!(
                                        "field `{}` is {} chars, over the suggested {warn_at}",
                                        field.name,
                                        s.len()
                                    ),
                                );
                            }
                        }
                    }
                },
                FieldKind::Number => match value.as_f64() {
                    None => push(
                        Severity::Error,
                        format!("field `{}` should be a number", field.name),
                    ),
                    Some(n) => {
                        if let Some((min, max)) = field.range {
                            if n < min || n > max {
                                push(
                                    Severity::Error,
                                    format!("field `{}` must be between {min} and {max}", field.name),
                                );
                            }
                        }
                    }
                },
                FieldKind::Boolean => {
                    if !value.is_boolean() {
                        push(
                            Severity::Error,
                            format!("field `{}` should be a boolean", field.name),
                        );
                    }
                }
                FieldKind::RichText => {
                    if !value.is_array() {
                        push(
                            Severity::Error,
                            format!("field `{}` should be a rich text array", field.name),
                        );
                    }
                }
                FieldKind::Image => {
                    let has_id = value.get("id").and_then(Value::as_str).is_some_and(|s| !s.is_empty());
                    if !has_id {
                        push(
                            Severity::Warning,
                            format!("field `{}` has no asset id and will not render", field.name),
                        );
                    }
                }
            }
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn registry_declares_eighteen_shapes() {
        assert_eq!(registry().len(), 18);
    }

    #[test]
    fn registry_names_are_unique() {
        let reg = registry();
        for (i, a) in reg.iter().enumerate() {
            for b in &reg[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn every_shape_has_a_preview_title() {
        for schema in registry() {
            assert!(!schema.preview.title_field.is_empty(), "{}", schema.name);
            assert!(!schema.preview.subtitle.is_empty(), "{}", schema.name);
        }
    }

    #[test]
    fn valid_block_produces_no_findings() {
        let block = json!({
            "_type": "cta",
            "_key": "c1",
            "title": "Join a team near you",
            "buttons": [{"_key": "b1", "text": "Search", "href": "/teams"}]
        });
        assert!(validate_document("home", &[block]).is_empty());
    }

    #[test]
    fn missing_required_field_is_error() {
        let block = json!({"_type": "cta", "_key": "c1", "buttons": [{}]});
        let findings = validate_document("home", &[block]);
        assert!(
            findings
                .iter()
                .any(|f| f.severity == Severity::Error && f.message.contains("`title`"))
        );
    }

    #[test]
    fn unknown_shape_is_error() {
        let block = json!({"_type": "hologram", "_key": "x"});
        let findings = validate_document("home", &[block]);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("hologram"));
        assert_eq!(findings[0].severity, Severity::Error);
    }

    #[test]
    fn missing_key_is_error() {
        let block = json!({"_type": "textBlock", "richText": []});
        let findings = validate_document("home", &[block]);
        assert!(findings.iter().any(|f| f.message.contains("_key")));
    }

    #[test]
    fn array_bounds_checked() {
        let block = json!({
            "_type": "faqAccordion",
            "_key": "f1",
            "title": "FAQ",
            "faqs": []
        });
        let findings = validate_document("home", &[block]);
        assert!(findings.iter().any(|f| f.message.contains("at least 1")));
    }

    #[test]
    fn over_length_string_warns() {
        let block = json!({
            "_type": "cta",
            "_key": "c1",
            "title": "x".repeat(200),
            "buttons": [{}]
        });
        let findings = validate_document("home", &[block]);
        assert!(
            findings
                .iter()
                .any(|f| f.severity == Severity::Warning && f.message.contains("chars"))
        );
    }

    #[test]
    fn number_range_checked() {
        let block = json!({
            "_type": "latestPosts",
            "_key": "lp",
            "postsCount": 25
        });
        let findings = validate_document("home", &[block]);
        assert!(findings.iter().any(|f| f.message.contains("between 1 and 6")));
    }

    #[test]
    fn imageless_image_field_warns() {
        let block = json!({
            "_type": "macbookScroll",
            "_key": "m1",
            "screenImage": {"alt": "screen"}
        });
        let findings = validate_document("home", &[block]);
        assert!(
            findings
                .iter()
                .any(|f| f.severity == Severity::Warning && f.message.contains("asset id"))
        );
    }

    #[test]
    fn findings_isolated_per_block() {
        let blocks = vec![
            json!({"_type": "hologram", "_key": "bad"}),
            json!({"_type": "textBlock", "_key": "ok", "richText": []}),
        ];
        let findings = validate_document("home", &blocks);
        assert!(findings.iter().all(|f| f.block_key == "bad"));
    }
}
