//! Common test utilities
//!
//! Shared page fixtures and session setup for the integration tests.

use std::sync::Arc;

use spotter_oxide::backend::{MockBackend, MockPage};
use spotter_oxide::config::Config;
use spotter_oxide::session::Session;
use tracing_subscriber::EnvFilter;

/// Install a subscriber honoring `RUST_LOG`; repeat calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A login form page with the element shapes resolution cares about:
/// typed inputs, a labeled checkbox, two button flavors sharing a name,
/// nested spans under annotated divs, and a pair of `class="foo"` divs.
pub fn form_page() -> MockPage {
    let mut page = MockPage::new("https://app.test/login").titled("Login");
    let form = page.push_root("form", &[("id", "login")], "");
    page.push("input", &[("type", "text"), ("name", "user")], "", Some(form));
    page.push(
        "input",
        &[("type", "password"), ("name", "pass")],
        "",
        Some(form),
    );
    let label = page.push("label", &[], "Remember me", Some(form));
    page.push(
        "input",
        &[("type", "checkbox"), ("name", "remember")],
        "",
        Some(label),
    );
    page.push(
        "input",
        &[
            ("type", "submit"),
            ("name", "go"),
            ("id", "submit"),
            ("value", "Sign in"),
        ],
        "",
        Some(form),
    );
    page.push("button", &[("name", "go")], "Retry", Some(form));
    let outer = page.push_root("div", &[("id", "a")], "");
    page.push("span", &[], "Hi there", Some(outer));
    page.push("span", &[], "High five", Some(outer));
    page.push("span", &[], "Bye", Some(outer));
    let other = page.push_root("div", &[("id", "b")], "");
    page.push("span", &[], "Hi too", Some(other));
    page.push_root("div", &[("class", "foo"), ("data-state", "open")], "first");
    page.push_root("div", &[("class", "foo")], "second");
    page
}

/// An inventory table with one header row and two data rows
pub fn table_page() -> MockPage {
    let mut page = MockPage::new("https://app.test/table").titled("Inventory");
    let table = page.push_root("table", &[("id", "t")], "");
    let head = page.push("tr", &[], "", Some(table));
    page.push("th", &[], "Name", Some(head));
    page.push("th", &[], "Qty", Some(head));
    let first = page.push("tr", &[], "", Some(table));
    page.push("td", &[], "Bolt", Some(first));
    page.push("td", &[], "40", Some(first));
    let second = page.push("tr", &[], "", Some(table));
    page.push("td", &[], "Nut", Some(second));
    page.push("td", &[], "12", Some(second));
    page
}

/// Session over a fresh single-page backend, plus a handle to the backend
/// for call counting
pub fn session_over(page: MockPage) -> (Session, MockBackend) {
    init_tracing();
    let backend = MockBackend::new(page);
    let session = Session::new(Arc::new(backend.clone()));
    (session, backend)
}

/// Same as [`session_over`] with explicit configuration
pub fn session_with_config(page: MockPage, config: &Config) -> (Session, MockBackend) {
    init_tracing();
    let backend = MockBackend::new(page);
    let session = Session::with_config(Arc::new(backend.clone()), config);
    (session, backend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixture_sessions_start_live() {
        let (session, backend) = session_over(form_page());
        assert!(session.is_live());
        assert_eq!(backend.find_calls().await, 0);
    }
}
