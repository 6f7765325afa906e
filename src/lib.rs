//! # Hubsite
//!
//! Static site renderer for the Flyball Hub community marketing site.
//! The CMS is the data source: editors compose pages from typed content
//! blocks, and this binary turns a content snapshot into the deployed
//! HTML site.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Fetch     CMS/API  →  snapshot.json   (content source → typed documents)
//! 2. Generate  snapshot →  dist/           (HTML site + sitemap + redirects)
//! ```
//!
//! The stages are independent: each reads and writes JSON on disk, so a
//! fetched snapshot can be checked, diffed, committed as a fixture, or
//! re-rendered offline without touching the network.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`content`] | Fetch stage — content API client, local exports, snapshot I/O |
//! | [`types`] | Snapshot types shared between stages |
//! | [`schema`] | Block shape registry and the `check` validation pass |
//! | [`blocks`] | Closed block enum with tolerant per-block decoding |
//! | [`builder`] | Block dispatch: layout, loading plan, editor paths, live patching |
//! | [`sections`] | One maud renderer per block shape |
//! | [`richtext`] | Rich text node rendering |
//! | [`reveal`] | Pooled scroll-reveal observer registry |
//! | [`cdn`] | Image CDN URL construction from asset ids |
//! | [`geo`] | Geocoding and great-circle distance for the team finder |
//! | [`teams`] | Team directory client and finder ranking |
//! | [`contact`] | Contact form validation and email dispatch |
//! | [`seo`] | Head metadata, sitemap.xml, robots.txt, `_redirects` |
//! | [`generate`] | Generate stage — route planning and HTML emission |
//! | [`config`] | `config.toml` loading, merging, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Closed block enum, open content
//!
//! The content source evolves independently of this binary: authors can
//! publish a block shape before its renderer ships. Dispatch is an
//! exhaustive `match` over a closed enum — the compiler flags unhandled
//! shapes — with a runtime `Unknown` fallback that renders a labeled
//! placeholder. One broken block never takes down its siblings.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a
//! compile-time HTML macro system: malformed markup is a build error,
//! template variables are Rust expressions, and all interpolation is
//! auto-escaped. There is no template directory to ship or drift.
//!
//! ## Reveal planning at build time
//!
//! Scroll-reveal animation is planned in Rust: a per-page registry pools
//! observer configurations (one per distinct threshold/margin pair),
//! computes stagger delays, and serializes the plan into the page for a
//! ~40-line script to execute. Reduced motion disables the whole
//! mechanism at the source — the page renders visible with no observers.
//!
//! ## Degrade, never throw
//!
//! Content problems (unknown shapes, malformed image ids, half-filled
//! fields) degrade to placeholders or omitted elements with a `tracing`
//! warning. Errors are reserved for real failures: I/O, bad snapshots,
//! and a missing home page.

pub mod blocks;
pub mod builder;
pub mod cdn;
pub mod config;
pub mod contact;
pub mod content;
pub mod generate;
pub mod geo;
pub mod output;
pub mod reveal;
pub mod richtext;
pub mod schema;
pub mod sections;
pub mod seo;
pub mod teams;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
