//! Query specifications
//!
//! Caller-facing declarative descriptions of target elements: flat
//! attribute/value maps or ancestor chains of them, with values that are
//! either exact literals or compiled patterns. Specs are plain values with
//! structural equality, which is what makes them usable as cache
//! fingerprints.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use regex::Regex;

use crate::Result;

/// Reserved key names that steer resolution instead of matching attributes
pub mod keys {
    /// Element tag name (exact values only)
    pub const TAG: &str = "tag";
    /// Verbatim XPath expression
    pub const XPATH: &str = "xpath";
    /// Verbatim CSS selector
    pub const CSS: &str = "css";
    /// 0-based ordinal over document order
    pub const INDEX: &str = "index";
    /// Rendered text content, not an attribute
    pub const TEXT: &str = "text";
    /// Input type; also the alias rewrite target
    pub const TYPE: &str = "type";
    /// Label text for checkable inputs
    pub const LABEL: &str = "label";
}

/// A compiled pattern predicate
///
/// Identity (equality and hashing) is defined over the source string only,
/// so two separately constructed specs with the same pattern text collide
/// in the cache.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile a pattern from its source text
    pub fn new<S: Into<String>>(source: S) -> Result<Self> {
        let source = source.into();
        let regex = Regex::new(&source)?;
        Ok(Self { source, regex })
    }

    /// The original pattern text
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Test a candidate value against the pattern
    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Pattern {}

impl Hash for Pattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
    }
}

/// One predicate value: an exact literal or a pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PredicateValue {
    /// Literal compared verbatim by the backend
    Exact(String),
    /// Pattern applied by the post-filter after fetch
    Pattern(Pattern),
}

impl PredicateValue {
    /// Create an exact value
    pub fn exact<S: Into<String>>(value: S) -> Self {
        PredicateValue::Exact(value.into())
    }

    /// Compile a pattern value
    pub fn pattern<S: Into<String>>(source: S) -> Result<Self> {
        Ok(PredicateValue::Pattern(Pattern::new(source)?))
    }

    /// Whether this value is a pattern
    pub fn is_pattern(&self) -> bool {
        matches!(self, PredicateValue::Pattern(_))
    }

    /// The literal, when exact
    pub fn as_exact(&self) -> Option<&str> {
        match self {
            PredicateValue::Exact(value) => Some(value),
            PredicateValue::Pattern(_) => None,
        }
    }
}

impl From<&str> for PredicateValue {
    fn from(value: &str) -> Self {
        PredicateValue::Exact(value.to_string())
    }
}

impl From<String> for PredicateValue {
    fn from(value: String) -> Self {
        PredicateValue::Exact(value)
    }
}

/// An ordered flat map from attribute name to predicate value
///
/// Ordered so iteration (and therefore every synthesized locator) is
/// deterministic for a given spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Predicates {
    entries: BTreeMap<String, PredicateValue>,
}

impl Predicates {
    /// Create an empty predicate set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an exact predicate
    pub fn with<K, V>(mut self, name: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.entries
            .insert(name.into(), PredicateValue::exact(value));
        self
    }

    /// Add a pattern predicate, compiling its source
    pub fn matching<K, S>(mut self, name: K, source: S) -> Result<Self>
    where
        K: Into<String>,
        S: Into<String>,
    {
        self.entries
            .insert(name.into(), PredicateValue::pattern(source)?);
        Ok(self)
    }

    /// Add a tag predicate
    pub fn tag<S: Into<String>>(self, tag: S) -> Self {
        self.with(keys::TAG, tag)
    }

    /// Add a 0-based ordinal predicate
    pub fn index(self, index: usize) -> Self {
        self.with(keys::INDEX, index.to_string())
    }

    /// Insert a prebuilt predicate value
    pub fn insert<K: Into<String>>(&mut self, name: K, value: PredicateValue) {
        self.entries.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&PredicateValue> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PredicateValue)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether any value is a pattern
    pub fn has_patterns(&self) -> bool {
        self.entries.values().any(PredicateValue::is_pattern)
    }

    /// Split into (exact, pattern) predicate sets
    pub fn split_patterns(&self) -> (Predicates, Predicates) {
        let mut exact = Predicates::new();
        let mut patterns = Predicates::new();
        for (name, value) in &self.entries {
            match value {
                PredicateValue::Exact(_) => exact.insert(name.clone(), value.clone()),
                PredicateValue::Pattern(_) => patterns.insert(name.clone(), value.clone()),
            }
        }
        (exact, patterns)
    }

    /// Copy of this set without one key
    pub fn without(&self, name: &str) -> Predicates {
        let mut entries = self.entries.clone();
        entries.remove(name);
        Predicates { entries }
    }
}

impl FromIterator<(String, PredicateValue)> for Predicates {
    fn from_iter<I: IntoIterator<Item = (String, PredicateValue)>>(iter: I) -> Self {
        Predicates {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A complete query: one flat predicate set or an ancestor chain
///
/// Chains are ordered outermost ancestor first; matches hold along the
/// descendant axis. Only the final chain segment may carry patterns,
/// enforced at resolution time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QuerySpec {
    Flat(Predicates),
    Chain(Vec<Predicates>),
}

impl QuerySpec {
    /// Whether the spec denotes nothing at all
    pub fn is_empty(&self) -> bool {
        match self {
            QuerySpec::Flat(predicates) => predicates.is_empty(),
            QuerySpec::Chain(segments) => segments.is_empty(),
        }
    }
}

impl From<Predicates> for QuerySpec {
    fn from(predicates: Predicates) -> Self {
        QuerySpec::Flat(predicates)
    }
}

impl From<Vec<Predicates>> for QuerySpec {
    fn from(segments: Vec<Predicates>) -> Self {
        QuerySpec::Chain(segments)
    }
}
