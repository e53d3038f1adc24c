//! Mock backend for testing
//!
//! An in-memory page model that executes the locator grammar this crate
//! emits: tag and native attribute lookups, a small CSS subset, and the
//! XPath subset the builder produces (descendant/child steps, attribute and
//! text() equality, positional predicates, parenthesized ordinals over
//! steps or unions, parent-containment tests, top-level unions). Selector
//! syntax outside
//! that subset is reported as a backend error, so drifting callers fail
//! loudly instead of silently matching nothing.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::traits::{Backend, BoundingBox, ElementHandle, FrameTarget, WindowId};
use crate::query::locator::Locator;
use crate::Error;

/// One element in a mock page
#[derive(Debug, Clone)]
struct MockNode {
    handle: ElementHandle,
    tag: String,
    attrs: BTreeMap<String, String>,
    text: String,
    parent: Option<usize>,
}

/// An in-memory page: a flat node store in document order
///
/// Nodes are appended parent-first, so a descendant always has a larger
/// index than its ancestors.
#[derive(Debug, Clone)]
pub struct MockPage {
    url: String,
    title: String,
    nodes: Vec<MockNode>,
}

impl MockPage {
    /// Create an empty page
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
            nodes: Vec::new(),
        }
    }

    /// Set the document title
    pub fn titled<S: Into<String>>(mut self, title: S) -> Self {
        self.title = title.into();
        self
    }

    /// Append a root-level element; returns its index for nesting
    pub fn push_root(&mut self, tag: &str, attrs: &[(&str, &str)], text: &str) -> usize {
        self.push(tag, attrs, text, None)
    }

    /// Append an element under a parent; returns its index
    pub fn push(
        &mut self,
        tag: &str,
        attrs: &[(&str, &str)],
        text: &str,
        parent: Option<usize>,
    ) -> usize {
        self.nodes.push(MockNode {
            handle: ElementHandle::new(Uuid::new_v4().to_string()),
            tag: tag.to_string(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            text: text.to_string(),
            parent,
        });
        self.nodes.len() - 1
    }

    fn children(&self, parent: Option<usize>) -> Vec<usize> {
        (0..self.nodes.len())
            .filter(|&i| self.nodes[i].parent == parent)
            .collect()
    }

    fn has_ancestor(&self, mut node: usize, ancestor: usize) -> bool {
        while let Some(parent) = self.nodes[node].parent {
            if parent == ancestor {
                return true;
            }
            node = parent;
        }
        false
    }

    /// The context itself plus every node below it, in document order
    fn descendant_or_self(&self, context: Option<usize>) -> Vec<Option<usize>> {
        match context {
            None => {
                let mut all: Vec<Option<usize>> = vec![None];
                all.extend((0..self.nodes.len()).map(Some));
                all
            }
            Some(idx) => {
                let mut out = vec![Some(idx)];
                for i in idx + 1..self.nodes.len() {
                    if self.has_ancestor(i, idx) {
                        out.push(Some(i));
                    }
                }
                out
            }
        }
    }

    /// Rendered text: own text plus descendants', space-joined
    fn subtree_text(&self, idx: usize) -> String {
        let mut text = self.nodes[idx].text.clone();
        for i in idx + 1..self.nodes.len() {
            if self.has_ancestor(i, idx) && !self.nodes[i].text.is_empty() {
                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(&self.nodes[i].text);
            }
        }
        text
    }

    fn index_of(&self, handle: &ElementHandle) -> Option<usize> {
        self.nodes.iter().position(|n| &n.handle == handle)
    }

    fn execute(&self, locator: &Locator) -> Result<Vec<usize>, Error> {
        match locator {
            Locator::Tag(tag) => Ok((0..self.nodes.len())
                .filter(|&i| tag == "*" || self.nodes[i].tag == *tag)
                .collect()),
            Locator::AttributeEq { tag, attr, value } => Ok((0..self.nodes.len())
                .filter(|&i| {
                    let node = &self.nodes[i];
                    (tag == "*" || node.tag == *tag) && attr_matches(node, attr, value)
                })
                .collect()),
            Locator::Selector(selector) => self.execute_css(selector),
            Locator::Path(path) => self.execute_path(path),
        }
    }

    fn execute_css(&self, selector: &str) -> Result<Vec<usize>, Error> {
        let sel = parse_css(selector)?;
        Ok((0..self.nodes.len())
            .filter(|&i| {
                let node = &self.nodes[i];
                sel.tag
                    .as_deref()
                    .map_or(true, |t| t == "*" || node.tag == t)
                    && sel
                        .id
                        .as_deref()
                        .map_or(true, |id| node.attrs.get("id").map(String::as_str) == Some(id))
                    && sel
                        .class
                        .as_deref()
                        .map_or(true, |class| attr_matches(node, "class", class))
                    && sel
                        .attr
                        .as_ref()
                        .map_or(true, |(name, value)| attr_matches(node, name, value))
            })
            .collect())
    }

    fn execute_path(&self, path: &str) -> Result<Vec<usize>, Error> {
        self.eval_expr(&parse_path(path)?)
    }

    fn eval_expr(&self, expr: &PathExpr) -> Result<Vec<usize>, Error> {
        match expr {
            PathExpr::Union(branches) => {
                let mut out = Vec::new();
                for branch in branches {
                    for idx in self.eval_expr(branch)? {
                        if !out.contains(&idx) {
                            out.push(idx);
                        }
                    }
                }
                out.sort_unstable();
                Ok(out)
            }
            PathExpr::Ordinal(inner, position) => {
                let matched = self.eval_expr(inner)?;
                Ok(match position.checked_sub(1) {
                    Some(p) => matched.into_iter().nth(p).into_iter().collect(),
                    None => Vec::new(),
                })
            }
            PathExpr::Steps(steps) => Ok(self.eval_steps(steps)),
        }
    }

    fn eval_steps(&self, steps: &[Step]) -> Vec<usize> {
        let mut contexts: Vec<Option<usize>> = vec![None];
        for step in steps {
            let mut next: Vec<usize> = Vec::new();
            for &context in &contexts {
                let matched = match step.axis {
                    Axis::Child => self.step_from(context, step),
                    Axis::Descendant => {
                        let mut collected = Vec::new();
                        for base in self.descendant_or_self(context) {
                            collected.extend(self.step_from(base, step));
                        }
                        collected
                    }
                };
                for idx in matched {
                    if !next.contains(&idx) {
                        next.push(idx);
                    }
                }
            }
            next.sort_unstable();
            contexts = next.into_iter().map(Some).collect();
        }
        contexts.into_iter().flatten().collect()
    }

    /// One child-axis application of a step, predicates left to right
    ///
    /// Positional predicates apply per context node, which is what makes
    /// `//tr[2]` mean "second row within its table" rather than a global
    /// ordinal.
    fn step_from(&self, context: Option<usize>, step: &Step) -> Vec<usize> {
        let mut candidates: Vec<usize> = self
            .children(context)
            .into_iter()
            .filter(|&i| step.name == "*" || self.nodes[i].tag == step.name)
            .collect();
        for pred in &step.preds {
            candidates = match pred {
                Pred::AttrEq(name, value) => candidates
                    .into_iter()
                    .filter(|&i| attr_matches(&self.nodes[i], name, value))
                    .collect(),
                Pred::TextEq(text) => candidates
                    .into_iter()
                    .filter(|&i| self.nodes[i].text == *text)
                    .collect(),
                Pred::ParentContains(needle) => candidates
                    .into_iter()
                    .filter(|&i| match self.nodes[i].parent {
                        Some(parent) => self.subtree_text(parent).contains(needle.as_str()),
                        None => false,
                    })
                    .collect(),
                Pred::Position(position) => match position.checked_sub(1) {
                    Some(p) => candidates.into_iter().nth(p).into_iter().collect(),
                    None => Vec::new(),
                },
            };
        }
        candidates
    }
}

/// `class` matches per whitespace token, everything else verbatim
fn attr_matches(node: &MockNode, attr: &str, value: &str) -> bool {
    match node.attrs.get(attr) {
        Some(observed) if attr == "class" => observed.split_whitespace().any(|t| t == value),
        Some(observed) => observed == value,
        None => false,
    }
}

fn unsupported_selector(selector: &str) -> Error {
    Error::backend(format!("mock backend cannot parse selector: {}", selector))
}

fn stale_element() -> Error {
    Error::backend("stale element handle")
}

#[derive(Debug, Default)]
struct CssSelector {
    tag: Option<String>,
    id: Option<String>,
    class: Option<String>,
    attr: Option<(String, String)>,
}

fn parse_css(selector: &str) -> Result<CssSelector, Error> {
    let mut sel = CssSelector::default();
    let mut rest = selector.trim();
    let tag_end = rest
        .find(|c| c == '#' || c == '.' || c == '[')
        .unwrap_or(rest.len());
    if tag_end > 0 {
        sel.tag = Some(rest[..tag_end].to_string());
        rest = &rest[tag_end..];
    }
    while !rest.is_empty() {
        if let Some(stripped) = rest.strip_prefix('#') {
            let end = stripped.find(|c| c == '.' || c == '[').unwrap_or(stripped.len());
            sel.id = Some(stripped[..end].to_string());
            rest = &stripped[end..];
        } else if let Some(stripped) = rest.strip_prefix('.') {
            let end = stripped.find(|c| c == '#' || c == '[').unwrap_or(stripped.len());
            sel.class = Some(stripped[..end].to_string());
            rest = &stripped[end..];
        } else if let Some(stripped) = rest.strip_prefix('[') {
            let end = stripped
                .find(']')
                .ok_or_else(|| unsupported_selector(selector))?;
            let inner = &stripped[..end];
            let (name, value) = inner
                .split_once('=')
                .ok_or_else(|| unsupported_selector(selector))?;
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            sel.attr = Some((name.trim().to_string(), value.to_string()));
            rest = &stripped[end + 1..];
        } else {
            return Err(unsupported_selector(selector));
        }
    }
    Ok(sel)
}

#[derive(Debug)]
enum PathExpr {
    Union(Vec<PathExpr>),
    Ordinal(Box<PathExpr>, usize),
    Steps(Vec<Step>),
}

#[derive(Debug)]
struct Step {
    axis: Axis,
    name: String,
    preds: Vec<Pred>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Axis {
    Descendant,
    Child,
}

#[derive(Debug)]
enum Pred {
    AttrEq(String, String),
    TextEq(String),
    ParentContains(String),
    Position(usize),
}

fn parse_path(expr: &str) -> Result<PathExpr, Error> {
    let branches = split_union(expr);
    if branches.len() > 1 {
        let parsed = branches
            .iter()
            .map(|branch| parse_branch(branch, expr))
            .collect::<Result<Vec<_>, Error>>()?;
        return Ok(PathExpr::Union(parsed));
    }
    parse_branch(expr, expr)
}

fn parse_branch(branch: &str, whole: &str) -> Result<PathExpr, Error> {
    let branch = branch.trim();
    if let Some(stripped) = branch.strip_prefix('(') {
        let close = find_matching_paren(stripped).ok_or_else(|| unsupported_selector(whole))?;
        let inner = &stripped[..close];
        let ordinal = stripped[close + 1..]
            .strip_prefix('[')
            .and_then(|after| after.strip_suffix(']'))
            .and_then(|digits| digits.parse::<usize>().ok())
            .ok_or_else(|| unsupported_selector(whole))?;
        return Ok(PathExpr::Ordinal(Box::new(parse_path(inner)?), ordinal));
    }
    Ok(PathExpr::Steps(parse_steps(branch, whole)?))
}

fn parse_steps(s: &str, whole: &str) -> Result<Vec<Step>, Error> {
    let mut steps = Vec::new();
    let mut rest = s.trim();
    while !rest.is_empty() {
        let axis = if let Some(r) = rest.strip_prefix("//") {
            rest = r;
            Axis::Descendant
        } else if let Some(r) = rest.strip_prefix('/') {
            rest = r;
            Axis::Child
        } else {
            return Err(unsupported_selector(whole));
        };
        let name_end = rest.find(|c| c == '/' || c == '[').unwrap_or(rest.len());
        let name = rest[..name_end].to_string();
        if name.is_empty() {
            return Err(unsupported_selector(whole));
        }
        rest = &rest[name_end..];
        let mut preds = Vec::new();
        while rest.starts_with('[') {
            let close =
                find_matching_bracket(&rest[1..]).ok_or_else(|| unsupported_selector(whole))?;
            preds.push(parse_pred(&rest[1..close + 1], whole)?);
            rest = &rest[close + 2..];
        }
        steps.push(Step { axis, name, preds });
    }
    Ok(steps)
}

fn parse_pred(inner: &str, whole: &str) -> Result<Pred, Error> {
    let inner = inner.trim();
    if let Some(rest) = inner.strip_prefix('@') {
        let (name, value) = rest
            .split_once('=')
            .ok_or_else(|| unsupported_selector(whole))?;
        return Ok(Pred::AttrEq(
            name.trim().to_string(),
            parse_literal(value, whole)?,
        ));
    }
    if let Some(rest) = inner.strip_prefix("text()=") {
        return Ok(Pred::TextEq(parse_literal(rest, whole)?));
    }
    if let Some(rest) = inner.strip_prefix("contains(..,") {
        let rest = rest
            .strip_suffix(')')
            .ok_or_else(|| unsupported_selector(whole))?;
        return Ok(Pred::ParentContains(parse_literal(rest, whole)?));
    }
    if let Ok(position) = inner.parse::<usize>() {
        return Ok(Pred::Position(position));
    }
    Err(unsupported_selector(whole))
}

fn parse_literal(raw: &str, whole: &str) -> Result<String, Error> {
    let raw = raw.trim();
    let bytes = raw.as_bytes();
    if raw.len() >= 2
        && ((bytes[0] == b'"' && bytes[raw.len() - 1] == b'"')
            || (bytes[0] == b'\'' && bytes[raw.len() - 1] == b'\''))
    {
        return Ok(raw[1..raw.len() - 1].to_string());
    }
    Err(unsupported_selector(whole))
}

/// Split on `|` outside parens, brackets and quotes
fn split_union(expr: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in expr.char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '(') | (None, '[') => depth += 1,
            (None, ')') | (None, ']') => depth -= 1,
            (None, '|') if depth == 0 => {
                parts.push(&expr[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&expr[start..]);
    parts
}

fn find_matching_paren(s: &str) -> Option<usize> {
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => {
                if depth == 0 {
                    return Some(i);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    None
}

fn find_matching_bracket(s: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, ']') => return Some(i),
            _ => {}
        }
    }
    None
}

#[derive(Debug)]
struct MockWindow {
    id: WindowId,
    history: Vec<MockPage>,
    position: usize,
}

impl MockWindow {
    fn new(page: MockPage) -> Self {
        Self {
            id: WindowId::new(Uuid::new_v4().to_string()),
            history: vec![page],
            position: 0,
        }
    }

    fn page(&self) -> &MockPage {
        &self.history[self.position]
    }
}

#[derive(Debug)]
struct MockState {
    windows: Vec<MockWindow>,
    current: usize,
    routes: HashMap<String, MockPage>,
    broken_titles: Vec<WindowId>,
    quit: bool,
    find_first_calls: usize,
    find_all_calls: usize,
}

impl MockState {
    fn ensure_live(&self) -> Result<(), Error> {
        if self.quit {
            return Err(Error::backend("session has quit"));
        }
        if self.windows.is_empty() {
            return Err(Error::backend("no windows remain"));
        }
        Ok(())
    }

    fn current_page(&self) -> Result<&MockPage, Error> {
        self.ensure_live()?;
        Ok(self.windows[self.current].page())
    }

    fn window_mut(&mut self) -> &mut MockWindow {
        let current = self.current;
        &mut self.windows[current]
    }
}

/// Mock backend over in-memory pages
#[derive(Debug, Clone)]
pub struct MockBackend {
    state: Arc<RwLock<MockState>>,
}

impl MockBackend {
    /// Create a backend with a single window showing one page
    pub fn new(page: MockPage) -> Self {
        Self::with_windows(vec![page])
    }

    /// Create a backend with one window per page, the first focused
    pub fn with_windows(pages: Vec<MockPage>) -> Self {
        Self {
            state: Arc::new(RwLock::new(MockState {
                windows: pages.into_iter().map(MockWindow::new).collect(),
                current: 0,
                routes: HashMap::new(),
                broken_titles: Vec::new(),
                quit: false,
                find_first_calls: 0,
                find_all_calls: 0,
            })),
        }
    }

    /// Register the page served when navigation hits this URL
    pub async fn route<S: Into<String>>(&self, url: S, page: MockPage) {
        self.state.write().await.routes.insert(url.into(), page);
    }

    /// Make title reads fail while this window is focused
    pub async fn break_title_for(&self, window: &WindowId) {
        self.state.write().await.broken_titles.push(window.clone());
    }

    /// Number of find_first calls served
    pub async fn find_first_calls(&self) -> usize {
        self.state.read().await.find_first_calls
    }

    /// Number of find_all calls served
    pub async fn find_all_calls(&self) -> usize {
        self.state.read().await.find_all_calls
    }

    /// Total find calls served
    pub async fn find_calls(&self) -> usize {
        let state = self.state.read().await;
        state.find_first_calls + state.find_all_calls
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn find_first(&self, locator: &Locator) -> Result<Option<ElementHandle>, crate::Error> {
        let mut state = self.state.write().await;
        state.find_first_calls += 1;
        let page = state.current_page()?;
        let matched = page.execute(locator)?;
        Ok(matched.first().map(|&i| page.nodes[i].handle.clone()))
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<ElementHandle>, crate::Error> {
        let mut state = self.state.write().await;
        state.find_all_calls += 1;
        let page = state.current_page()?;
        let matched = page.execute(locator)?;
        Ok(matched
            .into_iter()
            .map(|i| page.nodes[i].handle.clone())
            .collect())
    }

    async fn attribute(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, crate::Error> {
        let state = self.state.read().await;
        let page = state.current_page()?;
        let idx = page.index_of(element).ok_or_else(stale_element)?;
        Ok(page.nodes[idx].attrs.get(name).cloned())
    }

    async fn text(&self, element: &ElementHandle) -> Result<String, crate::Error> {
        let state = self.state.read().await;
        let page = state.current_page()?;
        let idx = page.index_of(element).ok_or_else(stale_element)?;
        Ok(page.subtree_text(idx))
    }

    async fn tag_name(&self, element: &ElementHandle) -> Result<String, crate::Error> {
        let state = self.state.read().await;
        let page = state.current_page()?;
        let idx = page.index_of(element).ok_or_else(stale_element)?;
        Ok(page.nodes[idx].tag.clone())
    }

    async fn bounding_box(&self, element: &ElementHandle) -> Result<BoundingBox, crate::Error> {
        let state = self.state.read().await;
        let page = state.current_page()?;
        let idx = page.index_of(element).ok_or_else(stale_element)?;
        // deterministic geometry derived from document position
        Ok(BoundingBox {
            x: 8.0,
            y: 8.0 + (idx as f64) * 24.0,
            width: 120.0,
            height: 20.0,
        })
    }

    async fn current_url(&self) -> Result<String, crate::Error> {
        Ok(self.state.read().await.current_page()?.url.clone())
    }

    async fn title(&self) -> Result<String, crate::Error> {
        let state = self.state.read().await;
        state.ensure_live()?;
        let focused = &state.windows[state.current];
        if state.broken_titles.contains(&focused.id) {
            return Err(Error::backend("title read failed"));
        }
        Ok(focused.page().title.clone())
    }

    async fn window_ids(&self) -> Result<Vec<WindowId>, crate::Error> {
        let state = self.state.read().await;
        state.ensure_live()?;
        Ok(state.windows.iter().map(|w| w.id.clone()).collect())
    }

    async fn current_window(&self) -> Result<WindowId, crate::Error> {
        let state = self.state.read().await;
        state.ensure_live()?;
        Ok(state.windows[state.current].id.clone())
    }

    async fn switch_to_window(&self, window: &WindowId) -> Result<(), crate::Error> {
        let mut state = self.state.write().await;
        state.ensure_live()?;
        match state.windows.iter().position(|w| &w.id == window) {
            Some(position) => {
                state.current = position;
                Ok(())
            }
            None => Err(Error::backend(format!(
                "no such window: {}",
                window.as_str()
            ))),
        }
    }

    async fn switch_to_frame(&self, _target: FrameTarget) -> Result<(), crate::Error> {
        // frames are not modeled; the switch itself succeeds
        self.state.read().await.ensure_live()
    }

    async fn navigate_to(&self, url: &str) -> Result<(), crate::Error> {
        let mut state = self.state.write().await;
        state.ensure_live()?;
        let page = state
            .routes
            .get(url)
            .cloned()
            .unwrap_or_else(|| MockPage::new(url));
        let window = state.window_mut();
        window.history.truncate(window.position + 1);
        window.history.push(page);
        window.position += 1;
        Ok(())
    }

    async fn back(&self) -> Result<(), crate::Error> {
        let mut state = self.state.write().await;
        state.ensure_live()?;
        let window = state.window_mut();
        window.position = window.position.saturating_sub(1);
        Ok(())
    }

    async fn forward(&self) -> Result<(), crate::Error> {
        let mut state = self.state.write().await;
        state.ensure_live()?;
        let window = state.window_mut();
        if window.position + 1 < window.history.len() {
            window.position += 1;
        }
        Ok(())
    }

    async fn refresh(&self) -> Result<(), crate::Error> {
        // content is static; reloading lands on the same page
        self.state.read().await.ensure_live()
    }

    async fn close_window(&self) -> Result<(), crate::Error> {
        let mut state = self.state.write().await;
        state.ensure_live()?;
        let current = state.current;
        state.windows.remove(current);
        state.current = 0;
        if state.windows.is_empty() {
            state.quit = true;
        }
        Ok(())
    }

    async fn quit(&self) -> Result<(), crate::Error> {
        self.state.write().await.quit = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_page() -> MockPage {
        let mut page = MockPage::new("https://app.test/").titled("Sample");
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
        page.push_root("div", &[("class", "note")], "first");
        page.push_root("div", &[("class", "note")], "second");
        page
    }

    #[tokio::test]
    async fn test_tag_lookup() {
        let backend = MockBackend::new(sample_page());
        let found = backend.find_all(&Locator::tag("div")).await.unwrap();
        assert_eq!(found.len(), 2);
        let first = backend.text(&found[0]).await.unwrap();
        assert_eq!(first, "first");
    }

    #[tokio::test]
    async fn test_css_id_lookup() {
        let backend = MockBackend::new(sample_page());
        let found = backend
            .find_first(&Locator::selector("#login"))
            .await
            .unwrap();
        assert!(found.is_some());
        let tag = backend.tag_name(&found.unwrap()).await.unwrap();
        assert_eq!(tag, "form");
    }

    #[tokio::test]
    async fn test_path_queries() {
        let backend = MockBackend::new(sample_page());
        let typed = backend
            .find_all(&Locator::path("//input[@type=\"text\"]"))
            .await
            .unwrap();
        assert_eq!(typed.len(), 1);

        let second = backend
            .find_all(&Locator::path("(//div)[2]"))
            .await
            .unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(backend.text(&second[0]).await.unwrap(), "second");
    }

    #[tokio::test]
    async fn test_union_paths() {
        let backend = MockBackend::new(sample_page());
        let found = backend
            .find_all(&Locator::path("//form|//div[@class=\"note\"]"))
            .await
            .unwrap();
        assert_eq!(found.len(), 3);
    }

    #[tokio::test]
    async fn test_ordinal_over_union() {
        let backend = MockBackend::new(sample_page());
        let found = backend
            .find_all(&Locator::path(
                "(//input[@type=\"text\"]|//input[@type=\"password\"])[2]",
            ))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(
            backend.attribute(&found[0], "name").await.unwrap().as_deref(),
            Some("pass")
        );
    }

    #[tokio::test]
    async fn test_parent_containment() {
        let backend = MockBackend::new(sample_page());
        let found = backend
            .find_all(&Locator::path(
                "//input[@type=\"checkbox\"][contains(..,\"Remember me\")]",
            ))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_unsupported_syntax() {
        let backend = MockBackend::new(sample_page());
        let result = backend
            .find_all(&Locator::path("//div[last()]"))
            .await;
        assert!(matches!(result, Err(Error::Backend(_))));
    }

    #[tokio::test]
    async fn test_navigation_history() {
        let backend = MockBackend::new(sample_page());
        let mut second = MockPage::new("https://app.test/two").titled("Two");
        second.push_root("p", &[], "after");
        backend.route("https://app.test/two", second).await;

        backend.navigate_to("https://app.test/two").await.unwrap();
        assert_eq!(
            backend.current_url().await.unwrap(),
            "https://app.test/two"
        );
        backend.back().await.unwrap();
        assert_eq!(backend.current_url().await.unwrap(), "https://app.test/");
        backend.forward().await.unwrap();
        assert_eq!(backend.title().await.unwrap(), "Two");
    }

    #[tokio::test]
    async fn test_stale_handles() {
        let backend = MockBackend::new(sample_page());
        let form = backend
            .find_first(&Locator::selector("#login"))
            .await
            .unwrap()
            .unwrap();
        backend.navigate_to("https://app.test/elsewhere").await.unwrap();
        assert!(backend.text(&form).await.is_err());
    }
}
