//! Element references

use std::sync::Arc;

use crate::backend::{Backend, BoundingBox, ElementHandle};
use crate::Result;

use super::session::SessionId;

/// A resolved element paired with the session that produced it
///
/// The session field is an identifier, not an ownership edge: dropping
/// elements never affects the session, and a session can be torn down
/// without chasing the elements it handed out. The handle stays valid
/// only as long as the backend keeps the underlying document alive.
#[derive(Debug, Clone)]
pub struct Element {
    handle: ElementHandle,
    session: SessionId,
    backend: Arc<dyn Backend>,
}

impl Element {
    pub(crate) fn new(handle: ElementHandle, session: SessionId, backend: Arc<dyn Backend>) -> Self {
        Self {
            handle,
            session,
            backend,
        }
    }

    /// The backend handle
    pub fn handle(&self) -> &ElementHandle {
        &self.handle
    }

    /// Identity of the owning session
    pub fn session(&self) -> &SessionId {
        &self.session
    }

    /// Attribute value; `None` when the element has no such attribute
    pub async fn attribute(&self, name: &str) -> Result<Option<String>> {
        self.backend.attribute(&self.handle, name).await
    }

    /// Rendered text content
    pub async fn text(&self) -> Result<String> {
        self.backend.text(&self.handle).await
    }

    /// Tag name as the backend reports it
    pub async fn tag_name(&self) -> Result<String> {
        self.backend.tag_name(&self.handle).await
    }

    /// Layout geometry
    pub async fn bounding_box(&self) -> Result<BoundingBox> {
        self.backend.bounding_box(&self.handle).await
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle && self.session == other.session
    }
}

impl Eq for Element {}
