//! CLI output formatting for all pipeline stages.
//!
//! Output is information-centric: the primary display for every entity is
//! its semantic identity (document id, route, block type), with counts as
//! context. Each stage has a `format_*` function returning lines for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.
//!
//! ```text
//! Pages
//! 001 home (homePage, 7 blocks)
//! 002 about (page, 3 blocks)
//!
//! Posts: 4    Teams: 12    Redirects: 2
//! ```

use crate::generate::GenerateSummary;
use crate::schema::{Finding, Severity};
use crate::types::Snapshot;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{pos:0>3}")
}

/// Summarize a fetched or loaded snapshot.
pub fn format_snapshot(snapshot: &Snapshot) -> Vec<String> {
    let mut lines = vec!["Pages".to_string()];
    for (i, page) in snapshot.pages.iter().enumerate() {
        let name = if page.slug.is_empty() { &page.id } else { &page.slug };
        lines.push(format!(
            "{} {} ({}, {} blocks)",
            format_index(i + 1),
            name,
            page.doc_type,
            page.blocks.len()
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "Posts: {}    Teams: {}    Redirects: {}",
        snapshot.posts.len(),
        snapshot.teams.len(),
        snapshot.redirects.len()
    ));
    lines
}

pub fn print_snapshot(snapshot: &Snapshot) {
    for line in format_snapshot(snapshot) {
        println!("{line}");
    }
}

/// Format schema-check findings, errors before warnings.
pub fn format_findings(findings: &[Finding]) -> Vec<String> {
    if findings.is_empty() {
        return vec!["Content is valid".to_string()];
    }
    let errors = findings
        .iter()
        .filter(|f| f.severity == Severity::Error)
        .count();
    let mut lines: Vec<String> = findings
        .iter()
        .filter(|f| f.severity == Severity::Error)
        .chain(findings.iter().filter(|f| f.severity == Severity::Warning))
        .map(ToString::to_string)
        .collect();
    lines.push(String::new());
    lines.push(format!(
        "{errors} errors, {} warnings",
        findings.len() - errors
    ));
    lines
}

pub fn print_findings(findings: &[Finding]) {
    for line in format_findings(findings) {
        println!("{line}");
    }
}

/// Format the generate-stage route inventory.
pub fn format_generate(summary: &GenerateSummary) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, route) in summary.routes.iter().enumerate() {
        lines.push(format!(
            "{} {} → {}",
            format_index(i + 1),
            route.title,
            route.output
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "Generated {} routes, {} sitemap entries, {} redirects",
        summary.routes.len(),
        summary.sitemap_entries,
        summary.redirects
    ));
    lines
}

pub fn print_generate(summary: &GenerateSummary) {
    for line in format_generate(summary) {
        println!("{line}");
    }
}
