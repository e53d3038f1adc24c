//! # Backend layer
//!
//! Abstracts the browser the resolver runs against. Everything above this
//! layer speaks in locators and opaque handles; everything below it is one
//! driver's wire protocol.
//!
//! ## Module structure
//! - `traits`: the `Backend` trait plus the handle and geometry types
//! - `mock`: in-memory backend used by the test suites

pub mod traits;
pub mod mock;

pub use traits::{Backend, BoundingBox, ElementHandle, FrameTarget, WindowId};

// Re-export the mock for integration tests and downstream harnesses
pub use mock::{MockBackend, MockPage};
