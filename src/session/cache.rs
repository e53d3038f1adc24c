//! Resolved element cache

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::config::Config;
use crate::query::{keys, Predicates, QuerySpec};

use super::element::Element;

/// Cacheability rules, computed once per session from configuration
///
/// Exclusion always wins. A non-empty include set is an allowlist; an empty
/// one admits everything not excluded.
#[derive(Debug, Clone, Default)]
pub struct CachePolicy {
    enabled: bool,
    include_tags: HashSet<String>,
    exclude_tags: HashSet<String>,
    include_attributes: HashSet<String>,
    exclude_attributes: HashSet<String>,
}

impl From<&Config> for CachePolicy {
    fn from(config: &Config) -> Self {
        Self {
            enabled: config.cache_enabled,
            include_tags: config.cache_include_tags.iter().cloned().collect(),
            exclude_tags: config.cache_exclude_tags.iter().cloned().collect(),
            include_attributes: config.cache_include_attributes.iter().cloned().collect(),
            exclude_attributes: config.cache_exclude_attributes.iter().cloned().collect(),
        }
    }
}

impl CachePolicy {
    /// Whether caching is on at all
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Whether a tag name admits caching
    pub fn tag_admitted(&self, tag: &str) -> bool {
        if self.exclude_tags.contains(tag) {
            return false;
        }
        self.include_tags.is_empty() || self.include_tags.contains(tag)
    }

    /// Whether an attribute name admits caching
    pub fn attribute_admitted(&self, attribute: &str) -> bool {
        if self.exclude_attributes.contains(attribute) {
            return false;
        }
        self.include_attributes.is_empty() || self.include_attributes.contains(attribute)
    }

    /// Whether the spec itself is marked cacheable
    ///
    /// A flat spec is judged by its own predicates, a chain by its final
    /// segment (the segment the resolved element came from). Reserved
    /// selector keys carry no attribute name to judge and are skipped.
    pub fn spec_admitted(&self, spec: &QuerySpec) -> bool {
        match spec {
            QuerySpec::Flat(predicates) => self.predicates_admitted(predicates),
            QuerySpec::Chain(segments) => match segments.last() {
                Some(last) => self.predicates_admitted(last),
                None => true,
            },
        }
    }

    fn predicates_admitted(&self, predicates: &Predicates) -> bool {
        for (name, value) in predicates.iter() {
            match name {
                keys::TAG => {
                    let admitted = value
                        .as_exact()
                        .map_or(false, |tag| self.tag_admitted(tag));
                    if !admitted {
                        return false;
                    }
                }
                keys::XPATH | keys::CSS | keys::INDEX => {}
                _ => {
                    if !self.attribute_admitted(name) {
                        return false;
                    }
                }
            }
        }
        true
    }
}

/// Fingerprinted memo of resolved elements
///
/// Owned by exactly one session. Fingerprints compare by structural
/// equality of the spec, so separately constructed but textually identical
/// specs collide. Navigation wholesale-replaces the map via `seed`; no
/// entry ever expires on its own.
#[derive(Debug, Default)]
pub struct ElementCache {
    entries: HashMap<QuerySpec, Element>,
    hits: u64,
    misses: u64,
}

impl ElementCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached element for a fingerprint
    pub fn lookup(&mut self, spec: &QuerySpec) -> Option<Element> {
        match self.entries.get(spec) {
            Some(element) => {
                self.hits += 1;
                debug!("Cache hit ({} entries)", self.entries.len());
                Some(element.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store one resolution; re-insertion overwrites
    pub fn store(&mut self, spec: QuerySpec, element: Element) {
        self.entries.insert(spec, element);
    }

    /// Replace the whole map; the sole invalidation mechanism
    pub fn seed(&mut self, entries: HashMap<QuerySpec, Element>) {
        debug!(
            "Seeding cache: {} -> {} entries",
            self.entries.len(),
            entries.len()
        );
        self.entries = entries;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered from the map
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that fell through to resolution
    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(config: Config) -> CachePolicy {
        CachePolicy::from(&config)
    }

    #[test]
    fn test_open_policy_admits_everything() {
        let policy = policy(Config::default());
        assert!(policy.enabled());
        assert!(policy.tag_admitted("div"));
        assert!(policy.attribute_admitted("name"));
        assert!(policy.spec_admitted(&QuerySpec::from(
            Predicates::new().tag("div").with("class", "foo")
        )));
    }

    #[test]
    fn test_exclusion_wins_over_inclusion() {
        let config = Config {
            cache_include_tags: vec!["div".into(), "span".into()],
            cache_exclude_tags: vec!["div".into()],
            ..Config::default()
        };
        let policy = policy(config);
        assert!(!policy.tag_admitted("div"));
        assert!(policy.tag_admitted("span"));
        // A non-empty include set is an allowlist.
        assert!(!policy.tag_admitted("table"));
    }

    #[test]
    fn test_spec_admission_judges_every_attribute() {
        let config = Config {
            cache_exclude_attributes: vec!["value".into()],
            ..Config::default()
        };
        let policy = policy(config);
        assert!(policy.spec_admitted(&QuerySpec::from(
            Predicates::new().tag("input").with("name", "user")
        )));
        assert!(!policy.spec_admitted(&QuerySpec::from(
            Predicates::new().tag("input").with("value", "Send")
        )));
        // Reserved selector keys carry no attribute name to judge.
        assert!(policy.spec_admitted(&QuerySpec::from(
            Predicates::new().with("css", "#submit")
        )));
    }

    #[test]
    fn test_chain_admission_judges_final_segment() {
        let config = Config {
            cache_exclude_attributes: vec!["value".into()],
            ..Config::default()
        };
        let policy = policy(config);
        let admitted = QuerySpec::from(vec![
            Predicates::new().tag("div").with("value", "x"),
            Predicates::new().tag("span").with("class", "y"),
        ]);
        let rejected = QuerySpec::from(vec![
            Predicates::new().tag("div").with("class", "x"),
            Predicates::new().tag("span").with("value", "y"),
        ]);
        assert!(policy.spec_admitted(&admitted));
        assert!(!policy.spec_admitted(&rejected));
    }
}
