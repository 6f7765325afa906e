//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Configuration is
//! sparse: user files only specify the values they want to override on top
//! of the stock defaults, and unknown keys are rejected to catch typos early.
//!
//! ## Configuration Options
//!
//! ```toml
//! [content]
//! project_id = "fhb12xyz"       # Content source project
//! dataset = "production"        # Content source dataset
//! api_base_url = "https://app.flyballhub.com"
//!
//! [cdn]
//! host = "cdn.sanity.io"        # Image CDN host
//! quality = 75                  # Output quality (0-100)
//! widths = [640, 960, 1600]     # srcset breakpoint widths
//!
//! [site]
//! base_url = "https://www.flyballhub.com"
//! title = "Flyball Hub"
//!
//! [animations]
//! enabled = true                # false = everything visible, no observers
//! threshold = 0.1               # Default visibility threshold (0-1)
//! root_margin = "0px"           # Default observer root margin
//! stagger_delay_ms = 100        # Delay between staggered items
//!
//! [contact]
//! endpoint = "https://api.resend.com/emails"
//! from = "Flyball Hub <onboarding@resend.dev>"
//! to = "flyballhub@gmail.com"
//!
//! [colors.light]
//! background = "#ffffff"
//! # ... (see gen-config for the full list)
//!
//! [processing]
//! max_processes = 4             # Max parallel page renders (omit for auto)
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Content source connection settings.
    pub content: ContentConfig,
    /// Image CDN settings.
    pub cdn: CdnConfig,
    /// Site identity and canonical URL.
    pub site: SiteIdentity,
    /// Scroll-reveal animation settings.
    pub animations: AnimationsConfig,
    /// Contact form email dispatch settings.
    pub contact: ContactConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
    /// Parallel rendering settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cdn.quality > 100 {
            return Err(ConfigError::Validation("cdn.quality must be 0-100".into()));
        }
        if self.cdn.widths.is_empty() {
            return Err(ConfigError::Validation(
                "cdn.widths must not be empty".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.animations.threshold) {
            return Err(ConfigError::Validation(
                "animations.threshold must be 0.0-1.0".into(),
            ));
        }
        if self.site.base_url.ends_with('/') {
            return Err(ConfigError::Validation(
                "site.base_url must not end with '/'".into(),
            ));
        }
        Ok(())
    }
}

/// Content source connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    /// Content source project identifier (part of CDN image paths).
    pub project_id: String,
    /// Content source dataset name.
    pub dataset: String,
    /// Base URL of the app API (team directory).
    pub api_base_url: String,
    /// Geocoding provider base URL.
    pub geocoder_url: String,
    /// Max teams fetched from the directory per build.
    pub team_limit: u32,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            project_id: "fhb12xyz".to_string(),
            dataset: "production".to_string(),
            api_base_url: "https://app.flyballhub.com".to_string(),
            geocoder_url: "https://nominatim.openstreetmap.org".to_string(),
            team_limit: 100,
        }
    }
}

/// Image CDN settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CdnConfig {
    /// CDN host serving transformed images.
    pub host: String,
    /// Output quality passed as the `q` parameter (0-100).
    pub quality: u32,
    /// Breakpoint widths used when building `srcset` attributes.
    pub widths: Vec<u32>,
}

impl Default for CdnConfig {
    fn default() -> Self {
        Self {
            host: "cdn.sanity.io".to_string(),
            quality: 75,
            widths: vec![640, 960, 1600],
        }
    }
}

/// Site identity and canonical URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteIdentity {
    /// Canonical base URL, no trailing slash.
    pub base_url: String,
    /// Site title, used as the SEO fallback and in the footer.
    pub title: String,
}

impl Default for SiteIdentity {
    fn default() -> Self {
        Self {
            base_url: "https://www.flyballhub.com".to_string(),
            title: "Flyball Hub".to_string(),
        }
    }
}

/// Scroll-reveal animation settings.
///
/// `enabled = false` is the reduced-motion path: every section renders
/// visible immediately and no observer configurations are emitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationsConfig {
    pub enabled: bool,
    /// Default visibility threshold (fraction of the element, 0-1).
    pub threshold: f64,
    /// Default observer root margin (CSS margin string).
    pub root_margin: String,
    /// Delay between staggered items in milliseconds.
    pub stagger_delay_ms: u64,
}

impl Default for AnimationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 0.1,
            root_margin: "0px".to_string(),
            stagger_delay_ms: 100,
        }
    }
}

/// Contact form email dispatch settings.
///
/// The API key is read from the `EMAIL_API_KEY` environment variable, never
/// from config files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactConfig {
    /// Transactional email provider endpoint.
    pub endpoint: String,
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.resend.com/emails".to_string(),
            from: "Flyball Hub <onboarding@resend.dev>".to_string(),
            to: "flyballhub@gmail.com".to_string(),
        }
    }
}

/// Parallel rendering settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel page-render workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    pub light: ColorScheme,
    /// Dark mode color scheme.
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    /// Page background color.
    pub background: String,
    /// Primary text color.
    pub text: String,
    /// Muted/secondary text color (eyebrows, captions, footer).
    pub text_muted: String,
    /// Border color.
    pub border: String,
    /// Brand accent (buttons, links, badges).
    pub accent: String,
    /// Accent hover state.
    pub accent_hover: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#18181b".to_string(),
            text_muted: "#71717a".to_string(),
            border: "#e4e4e7".to_string(),
            accent: "#16a34a".to_string(),
            accent_hover: "#15803d".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#09090b".to_string(),
            text: "#fafafa".to_string(),
            text_muted: "#a1a1aa".to_string(),
            border: "#27272a".to_string(),
            accent: "#22c55e".to_string(),
            accent_hover: "#4ade80".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Hubsite Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Content source
# ---------------------------------------------------------------------------
[content]
# Content source project identifier (part of CDN image paths).
project_id = "fhb12xyz"

# Content source dataset name.
dataset = "production"

# Base URL of the app API serving the team directory.
api_base_url = "https://app.flyballhub.com"

# Geocoding provider base URL (Nominatim-compatible).
geocoder_url = "https://nominatim.openstreetmap.org"

# Max teams fetched from the directory per build.
team_limit = 100

# ---------------------------------------------------------------------------
# Image CDN
# ---------------------------------------------------------------------------
[cdn]
# CDN host serving transformed images.
host = "cdn.sanity.io"

# Output quality passed as the q parameter (0 = worst, 100 = best).
quality = 75

# Breakpoint widths used when building srcset attributes.
widths = [640, 960, 1600]

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
# Canonical base URL, no trailing slash. Used in SEO tags and the sitemap.
base_url = "https://www.flyballhub.com"

# Site title, used as the SEO fallback and in the footer.
title = "Flyball Hub"

# ---------------------------------------------------------------------------
# Scroll-reveal animations
# ---------------------------------------------------------------------------
[animations]
# false = reduced motion: everything renders visible, no observers at all.
enabled = true

# Default visibility threshold (fraction of the element, 0.0-1.0).
threshold = 0.1

# Default observer root margin (CSS margin string).
root_margin = "0px"

# Delay between staggered items in milliseconds.
stagger_delay_ms = 100

# ---------------------------------------------------------------------------
# Contact form email dispatch
# ---------------------------------------------------------------------------
# The provider API key comes from the EMAIL_API_KEY environment variable.
[contact]
endpoint = "https://api.resend.com/emails"
from = "Flyball Hub <onboarding@resend.dev>"
to = "flyballhub@gmail.com"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#18181b"
text_muted = "#71717a"    # Eyebrows, captions, footer
border = "#e4e4e7"
accent = "#16a34a"
accent_hover = "#15803d"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#09090b"
text = "#fafafa"
text_muted = "#a1a1aa"
border = "#27272a"
accent = "#22c55e"
accent_hover = "#4ade80"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel page-render workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-text: {light_text};
    --color-text-muted: {light_text_muted};
    --color-border: {light_border};
    --color-accent: {light_accent};
    --color-accent-hover: {light_accent_hover};
}}

@media (prefers-color-scheme: dark) {{
    :root {{
        --color-bg: {dark_bg};
        --color-text: {dark_text};
        --color-text-muted: {dark_text_muted};
        --color-border: {dark_border};
        --color-accent: {dark_accent};
        --color-accent-hover: {dark_accent_hover};
    }}
}}"#,
        light_bg = colors.light.background,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_border = colors.light.border,
        light_accent = colors.light.accent,
        light_accent_hover = colors.light.accent_hover,
        dark_bg = colors.dark.background,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_border = colors.dark.border,
        dark_accent = colors.dark.accent,
        dark_accent_hover = colors.dark.accent_hover,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_colors() {
        let config = SiteConfig::default();
        assert_eq!(config.colors.light.background, "#ffffff");
        assert_eq!(config.colors.dark.background, "#09090b");
    }

    #[test]
    fn default_config_has_content_settings() {
        let config = SiteConfig::default();
        assert_eq!(config.content.dataset, "production");
        assert_eq!(config.cdn.widths, vec![640, 960, 1600]);
        assert_eq!(config.cdn.quality, 75);
        assert_eq!(config.animations.stagger_delay_ms, 100);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[cdn]
quality = 60
"##;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.cdn.quality, 60);
        // Default values preserved
        assert_eq!(config.cdn.host, "cdn.sanity.io");
        assert_eq!(config.site.title, "Flyball Hub");
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.base_url, "https://www.flyballhub.com");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r##"
[site]
base_url = "https://staging.flyballhub.com"

[colors.light]
background = "#fafafa"
"##,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.base_url, "https://staging.flyballhub.com");
        assert_eq!(config.colors.light.background, "#fafafa");
        // Unspecified values should be defaults
        assert_eq!(config.colors.dark.background, "#09090b");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str(r#"quality = 75"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"quality = 60"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("quality").unwrap().as_integer(), Some(60));
    }

    #[test]
    fn merge_toml_table_merge_preserves_base_keys() {
        let base: toml::Value = toml::from_str(
            r#"
[cdn]
widths = [640, 960]
quality = 75
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[cdn]
quality = 60
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let cdn = merged.get("cdn").unwrap();
        assert_eq!(cdn.get("quality").unwrap().as_integer(), Some(60));
        assert_eq!(cdn.get("widths").unwrap().as_array().unwrap().len(), 2);
    }

    #[test]
    fn merge_toml_deep_nested() {
        let base: toml::Value = toml::from_str(
            r##"
[colors.light]
background = "#fff"
text = "#000"
"##,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r##"
[colors.light]
background = "#fafafa"
"##,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let light = merged.get("colors").unwrap().get("light").unwrap();
        assert_eq!(light.get("background").unwrap().as_str(), Some("#fafafa"));
        assert_eq!(light.get("text").unwrap().as_str(), Some("#000"));
    }

    // =========================================================================
    // Unknown key rejection and validation
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[cdn]
qualty = 75
"#;
        let result: Result<SiteConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let toml_str = r#"
[cdnn]
quality = 75
"#;
        let result: Result<SiteConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn validate_quality_boundary() {
        let mut config = SiteConfig::default();
        config.cdn.quality = 100;
        assert!(config.validate().is_ok());
        config.cdn.quality = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_threshold_range() {
        let mut config = SiteConfig::default();
        config.animations.threshold = 1.0;
        assert!(config.validate().is_ok());
        config.animations.threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_widths_empty() {
        let mut config = SiteConfig::default();
        config.cdn.widths = vec![];
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_trailing_slash_rejected() {
        let mut config = SiteConfig::default();
        config.site.base_url = "https://www.flyballhub.com/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[cdn]
quality = 200
"#,
        )
        .unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_is_valid_toml() {
        let _: toml::Value =
            toml::from_str(stock_config_toml()).expect("stock config must be valid TOML");
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config.cdn.quality, 75);
        assert_eq!(config.content.team_limit, 100);
        assert_eq!(config.animations.threshold, 0.1);
        assert_eq!(config.colors.dark.accent, "#22c55e");
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        assert!(content.contains("[content]"));
        assert!(content.contains("[cdn]"));
        assert!(content.contains("[site]"));
        assert!(content.contains("[animations]"));
        assert!(content.contains("[contact]"));
        assert!(content.contains("[colors.light]"));
        assert!(content.contains("[colors.dark]"));
        assert!(content.contains("[processing]"));
    }

    #[test]
    fn generate_css_uses_config_colors() {
        let mut colors = ColorConfig::default();
        colors.light.background = "#f0f0f0".to_string();
        let css = generate_color_css(&colors);
        assert!(css.contains("--color-bg: #f0f0f0"));
        assert!(css.contains("@media (prefers-color-scheme: dark)"));
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }
}
