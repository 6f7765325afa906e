//! Image CDN URL construction.
//!
//! Content-source asset ids encode origin dimensions and format in a fixed
//! pattern: `image-<hash>-<width>x<height>-<format>`. This module parses
//! that pattern to recover native dimensions, then builds CDN URLs carrying
//! the transform parameters (target width, crop rectangle, focal point,
//! quality, format negotiation).
//!
//! Parsing never fails: an id that does not match the pattern falls back to
//! defaulted dimensions (800×600, jpg). A broken reference renders as a
//! best-effort guess or is omitted by the caller, never a broken request.

use crate::config::{CdnConfig, ContentConfig};
use crate::types::{Crop, Hotspot, ImageRef};

/// Fallback dimensions for ids that don't match the expected pattern.
pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;
const DEFAULT_FORMAT: &str = "jpg";

/// Result of parsing an asset id like `image-a1b2c3-1600x900-webp`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAssetId {
    /// Hash part without the `image-` prefix or dimension suffix.
    pub base_id: String,
    pub width: u32,
    pub height: u32,
    pub format: String,
}

/// Parse an asset id following the `image-<hash>-<w>x<h>-<format>` pattern.
///
/// Handles these inputs:
/// - `"image-a1b2c3-1600x900-webp"` → base `a1b2c3`, 1600×900, webp
/// - `"image-a1b2c3"` → base `a1b2c3`, defaulted 800×600 jpg
/// - `"garbage"` → base `garbage`, defaulted 800×600 jpg
pub fn parse_asset_id(id: &str) -> ParsedAssetId {
    let stripped = id.strip_prefix("image-").unwrap_or(id);

    // Expect "<hash>-<w>x<h>-<format>": split from the right so hashes
    // containing dashes still parse.
    if let Some((rest, format)) = stripped.rsplit_once('-') {
        if let Some((base, dims)) = rest.rsplit_once('-') {
            if let Some((w, h)) = parse_dimensions(dims) {
                if !base.is_empty() && format.chars().all(|c| c.is_ascii_alphanumeric()) {
                    return ParsedAssetId {
                        base_id: base.to_string(),
                        width: w,
                        height: h,
                        format: format.to_string(),
                    };
                }
            }
        }
    }

    ParsedAssetId {
        base_id: stripped.to_string(),
        width: DEFAULT_WIDTH,
        height: DEFAULT_HEIGHT,
        format: DEFAULT_FORMAT.to_string(),
    }
}

/// Parse a `<w>x<h>` dimension pair. Zero dimensions are rejected.
fn parse_dimensions(dims: &str) -> Option<(u32, u32)> {
    let (w, h) = dims.split_once('x')?;
    let w: u32 = w.parse().ok()?;
    let h: u32 = h.parse().ok()?;
    (w > 0 && h > 0).then_some((w, h))
}

/// Build a CDN URL for an image reference at a target display width.
///
/// Returns `None` when the reference carries no asset id — the caller omits
/// the element entirely rather than emitting a request that cannot succeed.
pub fn image_url(
    content: &ContentConfig,
    cdn: &CdnConfig,
    image: &ImageRef,
    target_width: Option<u32>,
) -> Option<String> {
    let id = image.id.as_deref().filter(|id| !id.is_empty())?;
    let parsed = parse_asset_id(id);
    let width = target_width.unwrap_or(parsed.width);

    let mut params = vec![
        format!("w={width}"),
        "auto=format".to_string(),
        "fit=max".to_string(),
        format!("q={}", cdn.quality),
    ];
    if let Some(rect) = crop_rect(image.crop.as_ref()) {
        params.push(format!("rect={rect}"));
    }
    if let Some(h) = image.hotspot {
        params.push(format!("fp-x={}", trim_float(h.x)));
        params.push(format!("fp-y={}", trim_float(h.y)));
    }

    Some(format!(
        "https://{host}/images/{project}/{dataset}/{base}-{w}x{h}.{fmt}?{query}",
        host = cdn.host,
        project = content.project_id,
        dataset = content.dataset,
        base = parsed.base_id,
        w = parsed.width,
        h = parsed.height,
        fmt = parsed.format,
        query = params.join("&"),
    ))
}

/// Build a `srcset` attribute across the configured breakpoint widths.
///
/// Widths larger than the asset's native width are skipped; if all are, the
/// native width is used as the only candidate.
pub fn srcset(content: &ContentConfig, cdn: &CdnConfig, image: &ImageRef) -> Option<String> {
    let id = image.id.as_deref().filter(|id| !id.is_empty())?;
    let native = parse_asset_id(id).width;

    let mut widths: Vec<u32> = cdn.widths.iter().copied().filter(|w| *w <= native).collect();
    if widths.is_empty() {
        widths.push(native);
    }

    let entries: Vec<String> = widths
        .iter()
        .filter_map(|w| image_url(content, cdn, image, Some(*w)).map(|url| format!("{url} {w}w")))
        .collect();
    Some(entries.join(", "))
}

/// Fractional `rect=<left>,<top>,<width>,<height>` from edge insets.
///
/// A crop whose insets consume the whole image is nonsense; treat it as
/// absent rather than emitting a zero-area rect.
fn crop_rect(crop: Option<&Crop>) -> Option<String> {
    let c = crop?;
    let w = 1.0 - c.left - c.right;
    let h = 1.0 - c.top - c.bottom;
    if w <= 0.0 || h <= 0.0 {
        return None;
    }
    Some(format!(
        "{},{},{},{}",
        trim_float(c.left),
        trim_float(c.top),
        trim_float(w),
        trim_float(h)
    ))
}

/// CSS `object-position` value from a hotspot, for focal-point framing.
pub fn object_position(hotspot: Option<Hotspot>) -> Option<String> {
    let h = hotspot?;
    Some(format!(
        "{}% {}%",
        trim_float(h.x * 100.0),
        trim_float(h.y * 100.0)
    ))
}

/// Format a float without a trailing `.0` so URLs stay tidy.
fn trim_float(v: f64) -> String {
    if (v - v.round()).abs() < f64::EPSILON {
        format!("{}", v.round() as i64)
    } else {
        let s = format!("{v:.4}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
