//! Spotter-Oxide: declarative element resolution for browser automation
//!
//! This library turns partially-specified queries (attribute maps, ancestor
//! chains, regex predicates, semantic aliases) into backend-executable
//! locators, and memoizes resolved elements per session with
//! navigation-driven cache invalidation.

pub mod error;
pub mod config;

pub mod backend;
pub mod query;
pub mod session;

// Re-exports
pub use error::{Error, Result};

/// Spotter-Oxide library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
