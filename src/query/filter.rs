//! Regex post-filtering
//!
//! Applies pattern predicates the backend selector languages cannot
//! express, against values fetched fresh from the backend: rendered text
//! for the `text` key, an attribute lookup for every other key. An absent
//! attribute participates as the empty string, so elements lacking it are
//! excluded, never faulted.

use tracing::debug;

use crate::backend::traits::{Backend, ElementHandle};
use crate::error::Result;
use crate::query::spec::{keys, PredicateValue, Predicates};

/// Keep the candidates matching every predicate, preserving order
pub async fn keep_matching(
    backend: &dyn Backend,
    candidates: Vec<ElementHandle>,
    keep: &Predicates,
) -> Result<Vec<ElementHandle>> {
    if keep.is_empty() {
        return Ok(candidates);
    }
    let total = candidates.len();
    let mut kept = Vec::with_capacity(total);
    for candidate in candidates {
        if matches_all(backend, &candidate, keep).await? {
            kept.push(candidate);
        }
    }
    debug!("Post-filter kept {} of {} candidates", kept.len(), total);
    Ok(kept)
}

/// Conjunction over the predicate set for one candidate
async fn matches_all(
    backend: &dyn Backend,
    candidate: &ElementHandle,
    keep: &Predicates,
) -> Result<bool> {
    for (name, value) in keep.iter() {
        let observed = if name == keys::TEXT {
            backend.text(candidate).await?
        } else {
            backend.attribute(candidate, name).await?.unwrap_or_default()
        };
        let matched = match value {
            PredicateValue::Pattern(pattern) => pattern.is_match(&observed),
            // the dispatcher never sends exact values here; compare
            // verbatim if one arrives anyway
            PredicateValue::Exact(exact) => exact == &observed,
        };
        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}
