//! Query normalization and dispatch
//!
//! The ordered rule table that classifies an incoming query spec and
//! produces an executable plan. Rules are evaluated top to bottom and the
//! first match wins; the ordering is semantically load-bearing: `index`
//! wins over alias rewriting, and verbatim selectors beat everything they
//! are mixed with. The `button*` pseudo-tag expands to the five-way button
//! union even standing alone; a plain `button` is an ordinary tag.

use tracing::debug;

use crate::error::{Error, Result};
use crate::query::builder;
use crate::query::hierarchy;
use crate::query::locator::Locator;
use crate::query::spec::{keys, PredicateValue, Predicates, QuerySpec};

/// An executable resolution plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Resolve to the empty set without touching the backend
    Empty,
    /// Fetch by locator, nothing to post-filter
    Direct(Locator),
    /// Fetch all candidates of `fetch`, keep those matching every pattern
    /// in `keep`
    Filtered { fetch: Locator, keep: Predicates },
}

/// Classify a query spec into a plan
pub fn plan(spec: &QuerySpec) -> Result<Plan> {
    // Rule 1: empty specs denote the empty set, not an error.
    if spec.is_empty() {
        debug!("Empty spec, planning empty result");
        return Ok(Plan::Empty);
    }
    match spec {
        // Rule 2: ancestor chains go to the hierarchical resolver.
        QuerySpec::Chain(segments) => hierarchy::plan_chain(segments),
        QuerySpec::Flat(predicates) => plan_flat(predicates),
    }
}

fn plan_flat(predicates: &Predicates) -> Result<Plan> {
    // Rule 3: a lone tag is a plain tag lookup. The button pseudo-tag is
    // not a real tag and falls through to its union rule.
    if predicates.len() == 1
        && predicates.contains(keys::TAG)
        && !tag_is(predicates, builder::BUTTON)
    {
        let tag = builder::exact_tag(predicates)?;
        debug!("Planning tag-only lookup: {}", tag);
        return Ok(Plan::Direct(Locator::tag(tag)));
    }

    // Rule 4: nothing to anchor on, re-dispatch with the wildcard tag.
    if !predicates.contains(keys::TAG)
        && !predicates.contains(keys::XPATH)
        && !predicates.contains(keys::CSS)
    {
        return plan_flat(&predicates.clone().tag(builder::WILDCARD));
    }

    // Rules 5 and 6: verbatim selectors beat whatever they are mixed with,
    // xpath before css.
    if predicates.len() > 1 && predicates.contains(keys::XPATH) {
        return plan_only(predicates, keys::XPATH);
    }
    if predicates.len() > 1 && predicates.contains(keys::CSS) {
        return plan_only(predicates, keys::CSS);
    }

    // Rule 7: ordinal addressing. Aliases still rewrite the tag before the
    // builder runs; a pattern alongside an ordinal cannot be sectioned out
    // without changing which element the ordinal denotes.
    if let Some(index) = builder::parse_index(predicates)? {
        if predicates.has_patterns() {
            return Err(Error::invalid_argument(
                "pattern predicates cannot be combined with index",
            ));
        }
        let expanded = match rewrite_alias(predicates)? {
            Some(rewritten) => rewritten,
            None => predicates.clone(),
        };
        let path = if tag_is(&expanded, builder::BUTTON) {
            let rest = expanded.without(keys::INDEX);
            format!("({})[{}]", builder::button_path(&rest)?, index + 1)
        } else {
            builder::ordinal_path(&expanded, index)?
        };
        debug!("Planning ordinal lookup: index={}, path={}", index, path);
        return Ok(Plan::Direct(Locator::path(path)));
    }

    // Rule 8: semantic alias tags rewrite to input types and re-dispatch.
    if let Some(rewritten) = rewrite_alias(predicates)? {
        return plan_flat(&rewritten);
    }

    // Rule 9: checkable-by-text.
    if is_checkable_by_text(predicates) {
        if predicates.has_patterns() {
            return Err(Error::unsupported(
                "pattern predicates cannot be combined with text or label lookup on a checkable",
            ));
        }
        let needle = checkable_needle(predicates)?;
        let rest = predicates.without(keys::TEXT).without(keys::LABEL);
        let path = builder::checkable_path(&rest, needle)?;
        debug!("Planning checkable-by-text lookup: {}", path);
        return Ok(Plan::Direct(Locator::path(path)));
    }

    // Rule 10: the semantic-button pseudo-tag, the five-way disjunction.
    if tag_is(predicates, builder::BUTTON) {
        let (exact, patterns) = predicates.split_patterns();
        let fetch = Locator::path(builder::button_path(&exact)?);
        debug!(
            "Planning semantic button lookup: {} ({} pattern predicates)",
            fetch,
            patterns.len()
        );
        if patterns.is_empty() {
            return Ok(Plan::Direct(fetch));
        }
        return Ok(Plan::Filtered {
            fetch,
            keep: patterns,
        });
    }

    // Rule 11: exactly one non-tag attribute dispatches on its key.
    let rest = predicates.without(keys::TAG);
    if rest.len() == 1 {
        if let Some((name, value)) = rest.iter().next() {
            match (name, value) {
                (keys::XPATH, value) => {
                    let path = value.as_exact().ok_or_else(|| {
                        Error::invalid_argument("xpath predicates must be exact values")
                    })?;
                    return Ok(Plan::Direct(Locator::path(path)));
                }
                (keys::CSS, value) => {
                    let selector = value.as_exact().ok_or_else(|| {
                        Error::invalid_argument("css predicates must be exact values")
                    })?;
                    return Ok(Plan::Direct(Locator::selector(selector)));
                }
                (_, PredicateValue::Pattern(_)) => {
                    let tag = builder::exact_tag(predicates)?;
                    let mut keep = Predicates::new();
                    keep.insert(name, value.clone());
                    debug!(
                        "Planning tag fetch with single-pattern filter: tag={}, attr={}",
                        tag, name
                    );
                    return Ok(Plan::Filtered {
                        fetch: Locator::tag(tag),
                        keep,
                    });
                }
                _ => {
                    return Ok(Plan::Direct(builder::locator_for(predicates)?));
                }
            }
        }
    }

    // Rule 12: split exact fetch material from pattern filtering.
    if predicates.has_patterns() {
        let (exact, patterns) = predicates.split_patterns();
        let fetch = builder::locator_for(&exact)?;
        debug!(
            "Planning split fetch and filter: {} ({} pattern predicates)",
            fetch,
            patterns.len()
        );
        return Ok(Plan::Filtered {
            fetch,
            keep: patterns,
        });
    }

    // Rule 13: the general builder.
    let fetch = builder::locator_for(predicates)?;
    debug!("Planning generic lookup: {}", fetch);
    Ok(Plan::Direct(fetch))
}

/// Re-dispatch keeping only one verbatim selector key
fn plan_only(predicates: &Predicates, key: &str) -> Result<Plan> {
    let mut only = Predicates::new();
    if let Some(value) = predicates.get(key) {
        only.insert(key, value.clone());
    }
    debug!("Re-dispatching on verbatim selector only: {}", key);
    plan_flat(&only)
}

/// Alias rewrite: `{tag: radio, ...}` becomes `{tag: input, type: radio, ...}`
fn rewrite_alias(predicates: &Predicates) -> Result<Option<Predicates>> {
    let input_type = match predicates.get(keys::TAG) {
        Some(value) => {
            let tag = value
                .as_exact()
                .ok_or_else(|| Error::invalid_argument("tag predicates must be exact values"))?;
            match builder::input_alias(tag) {
                Some(input_type) => input_type,
                None => return Ok(None),
            }
        }
        None => return Ok(None),
    };
    let mut rewritten = predicates.clone();
    rewritten.insert(keys::TAG, PredicateValue::exact("input"));
    rewritten.insert(keys::TYPE, PredicateValue::exact(input_type));
    Ok(Some(rewritten))
}

fn tag_is(predicates: &Predicates, expected: &str) -> bool {
    predicates
        .get(keys::TAG)
        .and_then(PredicateValue::as_exact)
        == Some(expected)
}

fn is_checkable_by_text(predicates: &Predicates) -> bool {
    let checkable_type = matches!(
        predicates.get(keys::TYPE).and_then(PredicateValue::as_exact),
        Some("radio") | Some("checkbox")
    );
    tag_is(predicates, "input")
        && checkable_type
        && (predicates.contains(keys::TEXT) || predicates.contains(keys::LABEL))
}

/// The containment literal for a checkable: `text` wins over `label`
fn checkable_needle(predicates: &Predicates) -> Result<&str> {
    let value = predicates
        .get(keys::TEXT)
        .or_else(|| predicates.get(keys::LABEL));
    match value {
        Some(value) => value.as_exact().ok_or_else(|| {
            Error::unsupported("pattern predicates cannot drive checkable text lookup")
        }),
        None => Err(Error::invalid_argument(
            "checkable lookup requires a text or label predicate",
        )),
    }
}
