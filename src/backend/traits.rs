//! Backend traits
//!
//! The remote browser-control boundary this engine drives. Everything here
//! is a thin pass-through with no algorithmic content: the engine hands
//! over locators and consumes opaque handles and page state.

use async_trait::async_trait;

use crate::query::locator::Locator;

/// Opaque element handle issued by the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle(String);

impl ElementHandle {
    pub fn new<S: Into<String>>(id: S) -> Self {
        ElementHandle(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Backend window identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowId(String);

impl WindowId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        WindowId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Frame switch target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameTarget {
    /// 0-based frame index within the current document
    Index(u16),
    /// Frame name or id attribute
    Name(String),
    /// The parent frame
    Parent,
    /// The top-level document
    Top,
}

/// Element bounding box
#[derive(Debug, Clone)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Browser-control backend
///
/// Executes locators against the current search context and reports page
/// state. The engine awaits every call to completion before issuing the
/// next, so one session never has overlapping in-flight backend calls.
#[async_trait]
pub trait Backend: Send + Sync + std::fmt::Debug {
    /// First element matching the locator, in document order
    async fn find_first(&self, locator: &Locator) -> Result<Option<ElementHandle>, crate::Error>;

    /// Every element matching the locator, in document order
    async fn find_all(&self, locator: &Locator) -> Result<Vec<ElementHandle>, crate::Error>;

    /// Attribute value, or None when the element lacks it
    async fn attribute(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, crate::Error>;

    /// Rendered text content
    async fn text(&self, element: &ElementHandle) -> Result<String, crate::Error>;

    /// Tag name
    async fn tag_name(&self, element: &ElementHandle) -> Result<String, crate::Error>;

    /// Bounding box
    async fn bounding_box(&self, element: &ElementHandle) -> Result<BoundingBox, crate::Error>;

    /// Current document URL
    async fn current_url(&self) -> Result<String, crate::Error>;

    /// Current document title
    async fn title(&self) -> Result<String, crate::Error>;

    /// Every open window
    async fn window_ids(&self) -> Result<Vec<WindowId>, crate::Error>;

    /// The focused window
    async fn current_window(&self) -> Result<WindowId, crate::Error>;

    /// Focus a window
    async fn switch_to_window(&self, window: &WindowId) -> Result<(), crate::Error>;

    /// Switch the search context to a frame
    async fn switch_to_frame(&self, target: FrameTarget) -> Result<(), crate::Error>;

    /// Load a URL
    async fn navigate_to(&self, url: &str) -> Result<(), crate::Error>;

    /// History back
    async fn back(&self) -> Result<(), crate::Error>;

    /// History forward
    async fn forward(&self) -> Result<(), crate::Error>;

    /// Reload the current document
    async fn refresh(&self) -> Result<(), crate::Error>;

    /// Close the focused window
    async fn close_window(&self) -> Result<(), crate::Error>;

    /// End the backend session
    async fn quit(&self) -> Result<(), crate::Error>;
}
