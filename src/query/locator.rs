//! Backend-executable locators
//!
//! The output language of query resolution. Exactly one locator is produced
//! per resolution; button-like disjunctions are folded into a single path
//! expression with `|`.

use std::fmt;

/// A selector the backend can execute directly
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// Verbatim CSS selector
    Selector(String),
    /// Verbatim XPath expression (possibly a union)
    Path(String),
    /// Plain tag-name lookup; `*` is the wildcard
    Tag(String),
    /// Native equality lookup on one attribute, scoped by tag
    AttributeEq {
        tag: String,
        attr: String,
        value: String,
    },
}

impl Locator {
    /// Create a CSS selector locator
    pub fn selector<S: Into<String>>(selector: S) -> Self {
        Locator::Selector(selector.into())
    }

    /// Create an XPath locator
    pub fn path<S: Into<String>>(path: S) -> Self {
        Locator::Path(path.into())
    }

    /// Create a tag-name locator
    pub fn tag<S: Into<String>>(tag: S) -> Self {
        Locator::Tag(tag.into())
    }

    /// Create a native attribute-equality locator
    pub fn attribute_eq<T, A, V>(tag: T, attr: A, value: V) -> Self
    where
        T: Into<String>,
        A: Into<String>,
        V: Into<String>,
    {
        Locator::AttributeEq {
            tag: tag.into(),
            attr: attr.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Selector(selector) => write!(f, "css:{}", selector),
            Locator::Path(path) => write!(f, "xpath:{}", path),
            Locator::Tag(tag) => write!(f, "tag:{}", tag),
            Locator::AttributeEq { tag, attr, value } => {
                write!(f, "attr:{}[{}={}]", tag, attr, value)
            }
        }
    }
}
