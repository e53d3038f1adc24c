//! # Query layer
//!
//! Turns caller-facing query specs into executable fetch plans. Planning is
//! pure: nothing in this layer touches a backend, so every resolution rule
//! is unit-testable without I/O.
//!
//! ## Main steps
//! - **Specs**: `QuerySpec` and `Predicates` describe the target declaratively
//! - **Dispatch**: `plan` picks the single applicable strategy for a spec
//! - **Synthesis**: `builder` renders locators from predicate sets
//! - **Chains**: `hierarchy` composes ancestor chains along the descendant axis
//! - **Patterns**: `filter` keeps fetched candidates whose values match
//!
//! ## Module structure
//! - `spec`: query specifications and predicate values
//! - `locator`: the four locator strategies handed to backends
//! - `builder`: XPath and CSS synthesis helpers
//! - `dispatch`: the ordered resolution rules
//! - `hierarchy`: ancestor chain planning
//! - `filter`: pattern post-filtering over fetched candidates
//!
//! ## Usage example
//! ```rust
//! use spotter_oxide::query::{plan, Plan, Predicates, QuerySpec};
//!
//! # fn demo() -> spotter_oxide::Result<()> {
//! let spec = QuerySpec::from(
//!     Predicates::new()
//!         .tag("input")
//!         .with("type", "text")
//!         .with("name", "user"),
//! );
//! let resolved = plan(&spec)?;
//! assert!(matches!(resolved, Plan::Direct(_)));
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

pub mod builder;
pub mod dispatch;
pub mod filter;
pub mod hierarchy;
pub mod locator;
pub mod spec;


pub use dispatch::{plan, Plan};
pub use locator::Locator;
pub use spec::{keys, Pattern, PredicateValue, Predicates, QuerySpec};
