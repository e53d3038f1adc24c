//! Integration tests for sessions
//!
//! Session lifecycle, window enumeration and matching, table addressing
//! and cache seeding, all driven over the mock backend.

use std::sync::Arc;

use crate::backend::{Backend, MockBackend, MockPage};
use crate::query::{Predicates, QuerySpec};
use crate::session::Session;
use crate::Error;

/// A page with two annotated divs and a form field
fn doc_page() -> MockPage {
    let mut page = MockPage::new("https://app.test/").titled("Document one");
    let first = page.push_root("div", &[("class", "foo")], "");
    page.push("span", &[], "first", Some(first));
    page.push_root("div", &[("class", "bar")], "other");
    let second = page.push_root("div", &[("class", "foo")], "");
    page.push("span", &[], "second", Some(second));
    page.push_root("input", &[("type", "text"), ("name", "user")], "");
    page
}

/// A table whose first row is all header cells
fn table_page() -> MockPage {
    let mut page = MockPage::new("https://app.test/table").titled("Table");
    let table = page.push_root("table", &[("id", "t")], "");
    let head = page.push("tr", &[], "", Some(table));
    page.push("th", &[], "Name", Some(head));
    page.push("th", &[], "Age", Some(head));
    let row = page.push("tr", &[], "", Some(table));
    page.push("td", &[], "Alice", Some(row));
    page.push("td", &[], "34", Some(row));
    page
}

/// A table with no header cells at all
fn headerless_table_page() -> MockPage {
    let mut page = MockPage::new("https://app.test/plain").titled("Plain");
    let table = page.push_root("table", &[("id", "p")], "");
    let row = page.push("tr", &[], "", Some(table));
    page.push("td", &[], "only", Some(row));
    page
}

fn two_window_backend() -> MockBackend {
    MockBackend::with_windows(vec![
        doc_page(),
        MockPage::new("https://app.test/settings").titled("Settings"),
    ])
}

#[tokio::test]
async fn test_session_creation() {
    let backend = MockBackend::new(doc_page());
    let session = Session::new(Arc::new(backend));
    assert!(session.is_live());
    assert!(session.cache().is_empty());

    let other = Session::new(Arc::new(MockBackend::new(doc_page())));
    assert_ne!(session.id(), other.id());
}

#[tokio::test]
async fn test_absent_element_is_none_not_error() {
    let backend = MockBackend::new(doc_page());
    let session = Session::new(Arc::new(backend));
    let spec = QuerySpec::from(Predicates::new().tag("video"));
    assert!(session
        .find_element(&spec)
        .await
        .expect("Failed to resolve spec")
        .is_none());
    assert!(!session.exists(&spec).await.expect("Failed to check existence"));
}

#[tokio::test]
async fn test_find_elements_in_document_order() {
    let backend = MockBackend::new(doc_page());
    let session = Session::new(Arc::new(backend));
    let spec = QuerySpec::from(Predicates::new().tag("div").with("class", "foo"));

    let found = session
        .find_elements(&spec)
        .await
        .expect("Failed to resolve spec");
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].text().await.expect("Failed to read text"), "first");
    assert_eq!(found[1].text().await.expect("Failed to read text"), "second");

    let first = session
        .find_element(&spec)
        .await
        .expect("Failed to resolve spec")
        .expect("Expected a match");
    assert_eq!(first, found[0]);
}

#[tokio::test]
async fn test_quit_turns_operations_into_usage_errors() {
    let backend = MockBackend::new(doc_page());
    let mut session = Session::new(Arc::new(backend));
    session.quit().await.expect("Failed to quit");
    assert!(!session.is_live());

    let spec = QuerySpec::from(Predicates::new().tag("div"));
    assert!(matches!(
        session.find_element(&spec).await,
        Err(Error::Usage(_))
    ));
    assert!(matches!(session.title().await, Err(Error::Usage(_))));
    assert!(matches!(session.quit().await, Err(Error::Usage(_))));
}

#[tokio::test]
async fn test_windows_snapshot_and_restore_focus() {
    let backend = two_window_backend();
    let session = Session::new(Arc::new(backend.clone()));

    let windows = session.windows().await.expect("Failed to enumerate windows");
    assert_eq!(windows.len(), 2);
    assert_eq!(windows[0].title(), "Document one");
    assert_eq!(windows[1].title(), "Settings");
    assert_eq!(windows[1].url(), "https://app.test/settings");

    // Enumeration must leave the original window focused.
    assert_eq!(
        session.title().await.expect("Failed to read title"),
        "Document one"
    );
}

#[tokio::test]
async fn test_windows_restore_focus_after_snapshot_failure() {
    let backend = two_window_backend();
    let session = Session::new(Arc::new(backend.clone()));
    let ids = backend.window_ids().await.expect("Failed to list windows");
    backend.break_title_for(&ids[1]).await;

    assert!(matches!(session.windows().await, Err(Error::Backend(_))));
    // A mid-enumeration failure must not leave focus on the broken window.
    assert_eq!(
        session.title().await.expect("Failed to read title"),
        "Document one"
    );
}

#[tokio::test]
async fn test_find_window_by_title_pattern() {
    let backend = two_window_backend();
    let session = Session::new(Arc::new(backend));

    let criteria = Predicates::new()
        .matching("title", "^Set")
        .expect("Failed to compile pattern");
    let window = session
        .find_window(&criteria)
        .await
        .expect("Failed to find window")
        .expect("Expected a window");
    assert_eq!(window.title(), "Settings");

    let exact = Predicates::new().with("url", "https://app.test/");
    let window = session
        .find_window(&exact)
        .await
        .expect("Failed to find window")
        .expect("Expected a window");
    assert_eq!(window.title(), "Document one");
}

#[tokio::test]
async fn test_find_windows_by_index() {
    let backend = two_window_backend();
    let session = Session::new(Arc::new(backend));

    let by_index = session
        .find_windows(&Predicates::new().index(1))
        .await
        .expect("Failed to find windows");
    assert_eq!(by_index.len(), 1);
    assert_eq!(by_index[0].title(), "Settings");

    // The remaining criteria still apply to the indexed window.
    let contradictory = session
        .find_windows(&Predicates::new().index(1).with("title", "Document one"))
        .await
        .expect("Failed to find windows");
    assert!(contradictory.is_empty());

    let out_of_range = session
        .find_windows(&Predicates::new().index(9))
        .await
        .expect("Failed to find windows");
    assert!(out_of_range.is_empty());
}

#[tokio::test]
async fn test_unknown_window_criteria_admit_nothing() {
    let backend = two_window_backend();
    let session = Session::new(Arc::new(backend));
    let criteria = Predicates::new().with("name", "main");
    let found = session
        .find_windows(&criteria)
        .await
        .expect("Failed to find windows");
    assert!(found.is_empty());
}

#[tokio::test]
async fn test_table_header_detection() {
    let backend = MockBackend::new(table_page());
    let session = Session::new(Arc::new(backend));
    let table = Predicates::new().with("id", "t");

    let corner = session
        .find_table_cell(&table, (0, 0))
        .await
        .expect("Failed to resolve cell")
        .expect("Expected a cell");
    assert_eq!(corner.tag_name().await.expect("Failed to read tag"), "th");
    assert_eq!(corner.text().await.expect("Failed to read text"), "Name");

    let data = session
        .find_table_cell(&table, (1, 1))
        .await
        .expect("Failed to resolve cell")
        .expect("Expected a cell");
    assert_eq!(data.tag_name().await.expect("Failed to read tag"), "td");
    assert_eq!(data.text().await.expect("Failed to read text"), "34");
}

#[tokio::test]
async fn test_headerless_table_serves_data_cells() {
    let backend = MockBackend::new(headerless_table_page());
    let session = Session::new(Arc::new(backend));
    let table = Predicates::new().with("id", "p");

    let corner = session
        .find_table_cell(&table, (0, 0))
        .await
        .expect("Failed to resolve cell")
        .expect("Expected a cell");
    assert_eq!(corner.tag_name().await.expect("Failed to read tag"), "td");
    assert_eq!(corner.text().await.expect("Failed to read text"), "only");
}

#[tokio::test]
async fn test_table_spec_rejects_patterns() {
    let backend = MockBackend::new(table_page());
    let session = Session::new(Arc::new(backend));
    let table = Predicates::new()
        .matching("id", "^t")
        .expect("Failed to compile pattern");
    assert!(matches!(
        session.find_table_cell(&table, (0, 0)).await,
        Err(Error::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn test_window_switch_seeds_cache() {
    let backend = two_window_backend();
    let mut session = Session::new(Arc::new(backend));
    let spec = QuerySpec::from(Predicates::new().tag("div").with("class", "foo"));

    session
        .find_it(&spec)
        .await
        .expect("Failed to resolve spec")
        .expect("Expected a match");
    assert_eq!(session.cache().len(), 1);

    let windows = session.windows().await.expect("Failed to enumerate windows");
    let other = windows[1].id().clone();
    session
        .switch_to_window(&other)
        .await
        .expect("Failed to switch window");
    assert!(session.cache().is_empty());
    assert_eq!(
        session.title().await.expect("Failed to read title"),
        "Settings"
    );
}
