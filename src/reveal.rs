//! Scroll-reveal planning with a pooled observer registry.
//!
//! Nearly every section animates into view. One visibility observer per
//! section would be wasteful at page scale, so sections sharing the same
//! `(threshold, root margin)` configuration are multiplexed onto a single
//! observer, keyed by that configuration pair. The registry is an explicit
//! per-page context object — never a module global — so rendering two pages
//! in parallel (or two test cases) cannot share state.
//!
//! The registry's lifecycle rules:
//!
//! - First [`RevealRegistry::observe`] for a configuration creates its
//!   entry; later observes with the same configuration join it.
//! - [`RevealRegistry::unobserve`] removes one element; when the last
//!   element for a configuration is removed the entry is torn down, so the
//!   pool never grows across page builds.
//! - Reduced motion (animations disabled in config) short-circuits:
//!   every element reports visible immediately and nothing is registered.
//! - Above-the-fold elements report visible at mount so initial-viewport
//!   content never flashes invisible, but stay registered for the plan.
//!
//! The generated page receives the pooled plan as a JSON island
//! ([`RevealRegistry::plan_json`]); the shipped `reveal.js` creates exactly
//! one IntersectionObserver per plan entry.
//!
//! Staggered reveals are a linear fan-out: item `i` gets an
//! `i * stagger_delay` transition delay, computed once (trigger-once).

use std::collections::BTreeMap;

use serde_json::json;

use crate::config::AnimationsConfig;

/// Observation options for one element.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealOptions {
    /// Fraction of the element that must be visible (0-1).
    pub threshold: f64,
    /// Observer root margin (CSS margin string).
    pub root_margin: String,
    /// Reveal once and stop observing, or toggle with visibility.
    pub trigger_once: bool,
    /// Element is in the initial viewport; report visible at mount.
    pub above_fold: bool,
}

impl RevealOptions {
    /// Defaults from site config.
    pub fn from_config(animations: &AnimationsConfig) -> Self {
        Self {
            threshold: animations.threshold,
            root_margin: animations.root_margin.clone(),
            trigger_once: true,
            above_fold: false,
        }
    }

    /// Registry key for this configuration pair.
    ///
    /// Thresholds are keyed in per-mille so float identity never decides
    /// pooling: 0.1 and 0.1000001 share an observer.
    fn config_key(&self) -> String {
        let per_mille = (self.threshold.clamp(0.0, 1.0) * 1000.0).round() as u32;
        format!("t{per_mille}@{}", self.root_margin)
    }
}

/// What a renderer needs to know about one observed element.
#[derive(Debug, Clone, PartialEq)]
pub struct Reveal {
    /// Visible on first paint (reduced motion or above the fold).
    pub visible_at_mount: bool,
    /// Registry key to reference from `data-reveal`, when observing at all.
    pub config_key: Option<String>,
}

impl Reveal {
    /// CSS class list for the element.
    pub fn class(&self) -> &'static str {
        if self.visible_at_mount {
            "reveal is-visible"
        } else {
            "reveal"
        }
    }
}

#[derive(Debug)]
struct ObserverEntry {
    threshold: f64,
    root_margin: String,
    /// Element id → trigger-once flag. Size is the reference count.
    elements: BTreeMap<String, bool>,
}

/// Per-page pool of observer configurations.
#[derive(Debug)]
pub struct RevealRegistry {
    reduced_motion: bool,
    stagger_delay_ms: u64,
    entries: BTreeMap<String, ObserverEntry>,
}

impl RevealRegistry {
    pub fn new(animations: &AnimationsConfig) -> Self {
        Self {
            reduced_motion: !animations.enabled,
            stagger_delay_ms: animations.stagger_delay_ms,
            entries: BTreeMap::new(),
        }
    }

    /// Register an element for reveal observation.
    ///
    /// With reduced motion active this reports immediate visibility and
    /// registers nothing — an accessibility requirement, not an
    /// optimization.
    pub fn observe(&mut self, element_id: &str, options: &RevealOptions) -> Reveal {
        if self.reduced_motion {
            return Reveal {
                visible_at_mount: true,
                config_key: None,
            };
        }

        let key = options.config_key();
        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| ObserverEntry {
                threshold: options.threshold,
                root_margin: options.root_margin.clone(),
                elements: BTreeMap::new(),
            });
        entry
            .elements
            .insert(element_id.to_string(), options.trigger_once);

        Reveal {
            visible_at_mount: options.above_fold,
            config_key: Some(key),
        }
    }

    /// Remove an element; tears the configuration entry down when its last
    /// element is gone.
    pub fn unobserve(&mut self, element_id: &str, options: &RevealOptions) {
        let key = options.config_key();
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.elements.remove(element_id);
            if entry.elements.is_empty() {
                self.entries.remove(&key);
            }
        }
    }

    /// Number of pooled observer configurations.
    pub fn observer_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of elements registered under a configuration.
    pub fn element_count(&self, options: &RevealOptions) -> usize {
        self.entries
            .get(&options.config_key())
            .map_or(0, |e| e.elements.len())
    }

    /// Transition delays for a staggered container of `n` items.
    ///
    /// Item `i` becomes visible `i * stagger_delay` ms after the container
    /// crosses its threshold: monotonically non-decreasing, spaced by the
    /// configured delay. Reduced motion collapses every delay to zero.
    pub fn staggered(&self, n: usize) -> Vec<u64> {
        if self.reduced_motion {
            return vec![0; n];
        }
        (0..n as u64).map(|i| i * self.stagger_delay_ms).collect()
    }

    /// Serialize the pooled configurations for the page's reveal script.
    ///
    /// Empty (and omitted from the page) under reduced motion.
    pub fn plan_json(&self) -> String {
        let plan: Vec<_> = self
            .entries
            .iter()
            .map(|(key, entry)| {
                json!({
                    "key": key,
                    "threshold": entry.threshold,
                    "rootMargin": entry.root_margin,
                    "triggerOnce": entry.elements.values().all(|once| *once),
                })
            })
            .collect();
        serde_json::to_string(&plan).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn is_reduced_motion(&self) -> bool {
        self.reduced_motion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animations(enabled: bool) -> AnimationsConfig {
        AnimationsConfig {
            enabled,
            ..AnimationsConfig::default()
        }
    }

    fn opts() -> RevealOptions {
        RevealOptions::from_config(&animations(true))
    }

    #[test]
    fn identical_configs_share_one_observer() {
        let mut registry = RevealRegistry::new(&animations(true));
        for i in 0..5 {
            registry.observe(&format!("section-{i}"), &opts());
        }
        assert_eq!(registry.observer_count(), 1);
        assert_eq!(registry.element_count(&opts()), 5);
    }

    #[test]
    fn distinct_configs_get_distinct_observers() {
        let mut registry = RevealRegistry::new(&animations(true));
        registry.observe("a", &opts());
        let mut wide = opts();
        wide.root_margin = "200px".to_string();
        registry.observe("b", &wide);
        let mut strict = opts();
        strict.threshold = 0.5;
        registry.observe("c", &strict);
        assert_eq!(registry.observer_count(), 3);
    }

    #[test]
    fn near_identical_thresholds_pool_together() {
        let mut registry = RevealRegistry::new(&animations(true));
        let mut a = opts();
        a.threshold = 0.1;
        let mut b = opts();
        b.threshold = 0.1000001;
        registry.observe("a", &a);
        registry.observe("b", &b);
        assert_eq!(registry.observer_count(), 1);
    }

    #[test]
    fn unobserving_last_element_tears_down_entry() {
        let mut registry = RevealRegistry::new(&animations(true));
        for i in 0..5 {
            registry.observe(&format!("section-{i}"), &opts());
        }
        for i in 0..5 {
            registry.unobserve(&format!("section-{i}"), &opts());
        }
        assert_eq!(registry.observer_count(), 0);
    }

    #[test]
    fn partial_unobserve_keeps_entry() {
        let mut registry = RevealRegistry::new(&animations(true));
        registry.observe("a", &opts());
        registry.observe("b", &opts());
        registry.unobserve("a", &opts());
        assert_eq!(registry.observer_count(), 1);
        assert_eq!(registry.element_count(&opts()), 1);
    }

    #[test]
    fn unobserve_unknown_element_is_noop() {
        let mut registry = RevealRegistry::new(&animations(true));
        registry.observe("a", &opts());
        registry.unobserve("ghost", &opts());
        assert_eq!(registry.observer_count(), 1);
    }

    #[test]
    fn reduced_motion_reports_visible_with_zero_observers() {
        let mut registry = RevealRegistry::new(&animations(false));
        let reveal = registry.observe("a", &opts());
        assert!(reveal.visible_at_mount);
        assert!(reveal.config_key.is_none());
        assert_eq!(registry.observer_count(), 0);
        assert_eq!(reveal.class(), "reveal is-visible");
    }

    #[test]
    fn above_fold_visible_at_mount_but_registered() {
        let mut registry = RevealRegistry::new(&animations(true));
        let mut options = opts();
        options.above_fold = true;
        let reveal = registry.observe("hero", &options);
        assert!(reveal.visible_at_mount);
        assert!(reveal.config_key.is_some());
        assert_eq!(registry.observer_count(), 1);
    }

    #[test]
    fn below_fold_starts_hidden() {
        let mut registry = RevealRegistry::new(&animations(true));
        let reveal = registry.observe("a", &opts());
        assert!(!reveal.visible_at_mount);
        assert_eq!(reveal.class(), "reveal");
    }

    #[test]
    fn stagger_delays_monotone_and_spaced() {
        let registry = RevealRegistry::new(&animations(true));
        let delays = registry.staggered(3);
        assert_eq!(delays, vec![0, 100, 200]);
        for pair in delays.windows(2) {
            assert!(pair[1] >= pair[0] + 100);
        }
    }

    #[test]
    fn stagger_collapses_under_reduced_motion() {
        let registry = RevealRegistry::new(&animations(false));
        assert_eq!(registry.staggered(3), vec![0, 0, 0]);
    }

    #[test]
    fn plan_serializes_pooled_configs() {
        let mut registry = RevealRegistry::new(&animations(true));
        registry.observe("a", &opts());
        registry.observe("b", &opts());
        let plan: Vec<serde_json::Value> = serde_json::from_str(&registry.plan_json()).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0]["key"], "t100@0px");
        assert_eq!(plan[0]["threshold"], 0.1);
        assert_eq!(plan[0]["rootMargin"], "0px");
        assert_eq!(plan[0]["triggerOnce"], true);
    }

    #[test]
    fn plan_empty_under_reduced_motion() {
        let mut registry = RevealRegistry::new(&animations(false));
        registry.observe("a", &opts());
        assert_eq!(registry.plan_json(), "[]");
    }
}
