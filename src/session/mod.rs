//! # Session layer
//!
//! The automation-facing surface: sessions, the elements and window
//! snapshots they hand out, and the per-session result cache.
//!
//! ## Main capabilities
//! - **Element lookup**: declarative specs resolved through the query layer
//! - **Cached lookup**: `find_it` memoizes resolutions per fingerprint
//! - **Window management**: enumeration, criteria matching, focus switching
//! - **Table addressing**: coordinate lookups with header-cell detection
//! - **Navigation**: page movement, with the cache invalidated wholesale
//!
//! ## Core concepts
//! - **Session**: owns one backend connection and one cache, exclusively
//! - **Element**: an opaque backend handle plus the owning session's id
//! - **Window**: a title/url snapshot taken at enumeration time
//!
//! ## Module structure
//! - `session`: the `Session` type and its operations
//! - `element`: resolved element references
//! - `window`: window snapshots and criteria matching
//! - `cache`: the element cache and its admission policy
//!
//! ## Usage example
//! ```rust,no_run
//! use std::sync::Arc;
//! use spotter_oxide::backend::Backend;
//! use spotter_oxide::query::{Predicates, QuerySpec};
//! use spotter_oxide::session::Session;
//!
//! # async fn example(backend: Arc<dyn Backend>) -> spotter_oxide::Result<()> {
//! let mut session = Session::new(backend);
//! let spec = QuerySpec::from(Predicates::new().tag("button").with("name", "go"));
//! if let Some(element) = session.find_it(&spec).await? {
//!     println!("Resolved: {}", element.text().await?);
//! }
//! session.quit().await?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod element;
pub mod session;
pub mod window;

#[cfg(test)]
mod tests;

pub use cache::{CachePolicy, ElementCache};
pub use element::Element;
pub use session::{Session, SessionId};
pub use window::Window;
