//! Window snapshots

use crate::backend::WindowId;
use crate::query::{keys, PredicateValue, Predicates};

use super::session::SessionId;

/// A snapshot of one open window
///
/// Constructed fresh on every enumeration and never cached: title and URL
/// are what the window showed at enumeration time, not live values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    id: WindowId,
    title: String,
    url: String,
    session: SessionId,
}

impl Window {
    pub(crate) fn new(id: WindowId, title: String, url: String, session: SessionId) -> Self {
        Self {
            id,
            title,
            url,
            session,
        }
    }

    /// The backend window id
    pub fn id(&self) -> &WindowId {
        &self.id
    }

    /// Document title at enumeration time
    pub fn title(&self) -> &str {
        &self.title
    }

    /// URL at enumeration time
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Identity of the owning session
    pub fn session(&self) -> &SessionId {
        &self.session
    }

    /// Whether this snapshot satisfies every criterion
    ///
    /// `title` and `url` compare against the snapshot fields, exact or
    /// pattern. `index` is positional and belongs to the enumerator, so it
    /// is skipped here. Any other key admits nothing.
    pub(crate) fn matches(&self, criteria: &Predicates) -> bool {
        for (name, value) in criteria.iter() {
            if name == keys::INDEX {
                continue;
            }
            let observed = match name {
                "title" => self.title.as_str(),
                "url" => self.url.as_str(),
                _ => return false,
            };
            let satisfied = match value {
                PredicateValue::Exact(expected) => observed == expected,
                PredicateValue::Pattern(pattern) => pattern.is_match(observed),
            };
            if !satisfied {
                return false;
            }
        }
        true
    }
}
