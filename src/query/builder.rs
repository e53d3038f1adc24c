//! Locator construction
//!
//! Pure assembly of backend-executable selectors from exact predicate
//! material. Pattern values never belong here; one that arrives anyway is
//! reported as an invalid argument at the point it is found.

use phf::{phf_map, phf_set};

use crate::error::{Error, Result};
use crate::query::locator::Locator;
use crate::query::spec::{keys, PredicateValue, Predicates};

/// Wildcard tag
pub const WILDCARD: &str = "*";

/// Pseudo-tag selecting the five button renderings; a plain `button` is an
/// ordinary tag
pub const BUTTON: &str = "button*";

/// Semantic alias tags and the input type each rewrites to
static INPUT_ALIASES: phf::Map<&'static str, &'static str> = phf_map! {
    "radio" => "radio",
    "checkbox" => "checkbox",
    "textfield" => "text",
    "password" => "password",
    "filefield" => "file",
};

/// Attribute names the backend exposes as first-class equality lookups
static NATIVE_LOOKUP: phf::Set<&'static str> = phf_set! {
    "id",
    "name",
    "class",
};

/// Input types covered by the five-way button disjunction
const BUTTON_INPUT_TYPES: [&str; 4] = ["submit", "reset", "image", "button"];

/// Input type for a semantic alias tag, if the tag is one
pub fn input_alias(tag: &str) -> Option<&'static str> {
    INPUT_ALIASES.get(tag).copied()
}

/// Whether the backend supports native equality lookup on this attribute
pub fn native_lookup(attr: &str) -> bool {
    NATIVE_LOOKUP.contains(attr)
}

/// The spec's tag as an exact value; wildcard when absent
pub fn exact_tag(predicates: &Predicates) -> Result<&str> {
    match predicates.get(keys::TAG) {
        None => Ok(WILDCARD),
        Some(value) => value
            .as_exact()
            .ok_or_else(|| Error::invalid_argument("tag predicates must be exact values")),
    }
}

/// The 0-based ordinal carried by `index`, if present
pub fn parse_index(predicates: &Predicates) -> Result<Option<usize>> {
    match predicates.get(keys::INDEX) {
        None => Ok(None),
        Some(value) => {
            let raw = value
                .as_exact()
                .ok_or_else(|| Error::invalid_argument("index predicates must be exact values"))?;
            let index = raw.parse::<usize>().map_err(|_| {
                Error::invalid_argument(format!("index must be a non-negative integer, got {raw}"))
            })?;
            Ok(Some(index))
        }
    }
}

/// Quote a value for embedding in an XPath expression
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('"') {
        format!("\"{}\"", value)
    } else if !value.contains('\'') {
        format!("'{}'", value)
    } else {
        let parts: Vec<String> = value
            .split('"')
            .map(|part| format!("\"{}\"", part))
            .collect();
        format!("concat({})", parts.join(", '\"', "))
    }
}

/// The `[...]` predicate suffix for every non-tag key, in key order
fn predicate_steps(predicates: &Predicates) -> Result<String> {
    let mut steps = String::new();
    for (name, value) in predicates.iter() {
        if name == keys::TAG {
            continue;
        }
        if matches!(name, keys::CSS | keys::XPATH | keys::INDEX) {
            return Err(Error::invalid_argument(format!(
                "reserved key {} cannot appear in a path step",
                name
            )));
        }
        let literal = match value {
            PredicateValue::Exact(v) => xpath_literal(v),
            PredicateValue::Pattern(_) => {
                return Err(Error::invalid_argument(format!(
                    "pattern predicate on {} cannot be rendered into a path",
                    name
                )));
            }
        };
        if name == keys::TEXT {
            steps.push_str(&format!("[text()={}]", literal));
        } else {
            steps.push_str(&format!("[@{}={}]", name, literal));
        }
    }
    Ok(steps)
}

/// Render one path step `//tag[...]` from tag + exact predicates
///
/// `text` renders as a `text()` equality test. `css`, `xpath` and `index`
/// have no meaning inside a step and are rejected.
pub fn segment_path(predicates: &Predicates) -> Result<String> {
    Ok(format!(
        "//{}{}",
        exact_tag(predicates)?,
        predicate_steps(predicates)?
    ))
}

/// Parenthesized global ordinal over tag + attributes
///
/// The caller's 0-based document-order index becomes a 1-based XPath
/// position. The unparenthesized form would renumber per parent context.
pub fn ordinal_path(predicates: &Predicates, index: usize) -> Result<String> {
    let step = segment_path(&predicates.without(keys::INDEX))?;
    Ok(format!("({})[{}]", step, index + 1))
}

/// Five-way disjunction for semantic buttons
///
/// `input[type=submit|reset|image|button]` and `button`, each branch
/// independently constrained by the same exact predicates, folded into one
/// union expression.
pub fn button_path(predicates: &Predicates) -> Result<String> {
    let rest = predicates.without(keys::TAG);
    let suffix = predicate_steps(&rest)?;
    let mut branches = Vec::with_capacity(BUTTON_INPUT_TYPES.len() + 1);
    for input_type in BUTTON_INPUT_TYPES {
        branches.push(format!(
            "//input[@type={}]{}",
            xpath_literal(input_type),
            suffix
        ));
    }
    branches.push(format!("//button{}", suffix));
    Ok(branches.join("|"))
}

/// Path for a checkable input, refined by a containment test against the
/// literal text of its enclosing context
pub fn checkable_path(predicates: &Predicates, needle: &str) -> Result<String> {
    Ok(format!(
        "{}[contains(..,{})]",
        segment_path(predicates)?,
        xpath_literal(needle)
    ))
}

/// The general builder: tag + exact predicates, one locator out
///
/// Degenerate cases first and first-match-wins: a verbatim `xpath` or `css`
/// key short-circuits everything else; a lone `tag` is a tag lookup;
/// `index` produces the ordinal path; a single native-lookup attribute
/// becomes an attribute-equality locator; everything else renders as a
/// path expression.
pub fn locator_for(predicates: &Predicates) -> Result<Locator> {
    if let Some(value) = predicates.get(keys::XPATH) {
        let path = value
            .as_exact()
            .ok_or_else(|| Error::invalid_argument("xpath predicates must be exact values"))?;
        return Ok(Locator::path(path));
    }
    if let Some(value) = predicates.get(keys::CSS) {
        let selector = value
            .as_exact()
            .ok_or_else(|| Error::invalid_argument("css predicates must be exact values"))?;
        return Ok(Locator::selector(selector));
    }

    let tag = exact_tag(predicates)?;
    if predicates.len() == 1 && predicates.contains(keys::TAG) {
        return Ok(Locator::tag(tag));
    }
    if let Some(index) = parse_index(predicates)? {
        return Ok(Locator::path(ordinal_path(predicates, index)?));
    }

    let rest = predicates.without(keys::TAG);
    if rest.len() == 1 {
        if let Some((name, value)) = rest.iter().next() {
            if name != keys::TEXT && native_lookup(name) {
                if let Some(exact) = value.as_exact() {
                    return Ok(Locator::attribute_eq(tag, name, exact));
                }
            }
        }
    }

    Ok(Locator::path(segment_path(predicates)?))
}

/// Cell flavor for table addressing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Header,
    Data,
}

impl CellKind {
    fn step(self) -> &'static str {
        match self {
            CellKind::Header => "th",
            CellKind::Data => "td",
        }
    }
}

/// Anchor path for a table spec; the tag defaults to `table`
pub fn table_anchor(table_spec: &Predicates) -> Result<String> {
    let mut anchored = table_spec.clone();
    if !anchored.contains(keys::TAG) {
        anchored.insert(keys::TAG, PredicateValue::exact("table"));
    }
    segment_path(&anchored)
}

/// Probe path: header cells in the table's first row
pub fn header_probe_path(anchor: &str) -> String {
    format!("{}//tr[1]/th", anchor)
}

/// One cell by 0-based (row, col), 1-based positional child selection
pub fn table_cell_path(anchor: &str, row: usize, col: usize, kind: CellKind) -> String {
    format!("{}//tr[{}]/{}[{}]", anchor, row + 1, kind.step(), col + 1)
}

/// Every cell of a 0-based row
pub fn table_row_path(anchor: &str, row: usize, kind: CellKind) -> String {
    format!("{}//tr[{}]/{}", anchor, row + 1, kind.step())
}
