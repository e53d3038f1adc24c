//! Hierarchical resolution
//!
//! Composes an ancestor chain of predicate sets into one descendant-axis
//! path expression, enforcing where pattern predicates may appear. Chains
//! run outermost ancestor first; every join is the descendant axis.

use tracing::debug;

use crate::error::{Error, Result};
use crate::query::builder;
use crate::query::dispatch::Plan;
use crate::query::locator::Locator;
use crate::query::spec::{keys, Predicates};

/// Plan an ancestor chain
///
/// When the final segment carries patterns, the composed path is built from
/// its exact material only, widened relative to the fully-pinned form,
/// and the patterns become the post-filter, so the fetch never
/// under-selects.
pub fn plan_chain(segments: &[Predicates]) -> Result<Plan> {
    if segments.is_empty() {
        return Ok(Plan::Empty);
    }
    let last = segments.len() - 1;
    for (position, segment) in segments.iter().enumerate() {
        validate_segment(segment, position, position == last)?;
    }

    let mut path = String::new();
    for segment in &segments[..last] {
        path.push_str(&builder::segment_path(segment)?);
    }

    let (exact, patterns) = segments[last].split_patterns();
    path.push_str(&builder::segment_path(&exact)?);

    if patterns.is_empty() {
        debug!("Planning chain lookup: {}", path);
        return Ok(Plan::Direct(Locator::path(path)));
    }
    debug!(
        "Planning widened chain lookup: {} ({} pattern predicates)",
        path,
        patterns.len()
    );
    Ok(Plan::Filtered {
        fetch: Locator::path(path),
        keep: patterns,
    })
}

fn validate_segment(segment: &Predicates, position: usize, is_last: bool) -> Result<()> {
    for reserved in [keys::CSS, keys::XPATH, keys::INDEX] {
        if segment.contains(reserved) {
            return Err(Error::invalid_argument(format!(
                "reserved key {} has no meaning inside a chain (segment {})",
                reserved, position
            )));
        }
    }
    if let Some(value) = segment.get(keys::TAG) {
        if value.is_pattern() {
            return Err(Error::invalid_argument(
                "tag predicates must be exact values",
            ));
        }
    }
    if !is_last && segment.has_patterns() {
        return Err(Error::invalid_argument(format!(
            "pattern predicates are only permitted in the last chain segment (found in segment {})",
            position
        )));
    }
    Ok(())
}
