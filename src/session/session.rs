//! Session implementation
//!
//! One backend connection, its element cache, and the query API over both.
//! Every operation that reaches the backend is gated on session liveness,
//! so caller mistakes after `quit` fail fast as usage errors instead of
//! surfacing as backend transport noise.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::backend::{Backend, ElementHandle, FrameTarget, WindowId};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::query::builder::{self, CellKind};
use crate::query::filter;
use crate::query::{keys, plan, Locator, Plan, Predicates, QuerySpec};

use super::cache::{CachePolicy, ElementCache};
use super::element::Element;
use super::window::Window;

/// Opaque session identity carried by elements and windows
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    fn generate() -> Self {
        SessionId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A browser-automation session
///
/// Owns the backend connection and the result cache exclusively. Read-only
/// queries take `&self`; anything that can mutate the cache or the page
/// state takes `&mut self`, which is also what makes a session single-
/// caller by construction. Independent sessions over separate backends can
/// run concurrently without coordination.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    backend: Arc<dyn Backend>,
    cache: ElementCache,
    policy: CachePolicy,
    live: bool,
}

impl Session {
    /// Create a session over a backend with default configuration
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self::with_config(backend, &Config::default())
    }

    /// Create a session with explicit configuration
    pub fn with_config(backend: Arc<dyn Backend>, config: &Config) -> Self {
        let id = SessionId::generate();
        info!(
            "Creating session {} (cache enabled: {})",
            id.as_str(),
            config.cache_enabled
        );
        Self {
            id,
            backend,
            cache: ElementCache::new(),
            policy: CachePolicy::from(config),
            live: true,
        }
    }

    /// This session's identity
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Whether the session is still usable
    pub fn is_live(&self) -> bool {
        self.live
    }

    /// The cache, for inspection
    pub fn cache(&self) -> &ElementCache {
        &self.cache
    }

    /// Liveness gate ahead of every operation
    fn ensure_live(&self) -> Result<()> {
        if self.live {
            Ok(())
        } else {
            Err(Error::usage(
                "session is no longer live; create a new session",
            ))
        }
    }

    fn element(&self, handle: ElementHandle) -> Element {
        Element::new(handle, self.id.clone(), Arc::clone(&self.backend))
    }

    /// First element matching the spec
    ///
    /// Absence is `Ok(None)`, never an error, so existence checks compose
    /// without error handling at every call site.
    #[instrument(skip(self, spec))]
    pub async fn find_element(&self, spec: &QuerySpec) -> Result<Option<Element>> {
        self.ensure_live()?;
        self.resolve_first(spec).await
    }

    /// All elements matching the spec, in document order
    #[instrument(skip(self, spec))]
    pub async fn find_elements(&self, spec: &QuerySpec) -> Result<Vec<Element>> {
        self.ensure_live()?;
        match plan(spec)? {
            Plan::Empty => Ok(Vec::new()),
            Plan::Direct(locator) => {
                let handles = self.backend.find_all(&locator).await?;
                Ok(handles.into_iter().map(|h| self.element(h)).collect())
            }
            Plan::Filtered { fetch, keep } => {
                let candidates = self.backend.find_all(&fetch).await?;
                let kept =
                    filter::keep_matching(self.backend.as_ref(), candidates, &keep).await?;
                Ok(kept.into_iter().map(|h| self.element(h)).collect())
            }
        }
    }

    /// Whether any element matches the spec
    pub async fn exists(&self, spec: &QuerySpec) -> Result<bool> {
        Ok(self.find_element(spec).await?.is_some())
    }

    /// Cache-aware first match
    ///
    /// A previously resolved fingerprint is answered from the cache without
    /// touching the backend. On a miss the spec is resolved normally and,
    /// when the policy admits either the spec or the resolved element's
    /// tag, stored under its fingerprint.
    #[instrument(skip(self, spec))]
    pub async fn find_it(&mut self, spec: &QuerySpec) -> Result<Option<Element>> {
        self.ensure_live()?;
        if self.policy.enabled() {
            if let Some(element) = self.cache.lookup(spec) {
                return Ok(Some(element));
            }
        }
        let resolved = self.resolve_first(spec).await?;
        if let Some(element) = &resolved {
            if self.should_store(spec, element).await? {
                self.cache.store(spec.clone(), element.clone());
            }
        }
        Ok(resolved)
    }

    async fn resolve_first(&self, spec: &QuerySpec) -> Result<Option<Element>> {
        match plan(spec)? {
            Plan::Empty => Ok(None),
            Plan::Direct(locator) => {
                let handle = self.backend.find_first(&locator).await?;
                Ok(handle.map(|h| self.element(h)))
            }
            Plan::Filtered { fetch, keep } => {
                let candidates = self.backend.find_all(&fetch).await?;
                let kept =
                    filter::keep_matching(self.backend.as_ref(), candidates, &keep).await?;
                Ok(kept.into_iter().next().map(|h| self.element(h)))
            }
        }
    }

    async fn should_store(&self, spec: &QuerySpec, element: &Element) -> Result<bool> {
        if !self.policy.enabled() {
            return Ok(false);
        }
        if self.policy.spec_admitted(spec) {
            return Ok(true);
        }
        // The spec alone was not admitted; the element's own tag gets the
        // final say.
        let tag = element.tag_name().await?;
        Ok(self.policy.tag_admitted(&tag))
    }

    /// One table cell by 0-based (row, col) coordinates
    ///
    /// Row 0 addresses header cells when the table's first row has at
    /// least one; every other row, and row 0 of a headerless table,
    /// addresses data cells.
    #[instrument(skip(self, table_spec))]
    pub async fn find_table_cell(
        &self,
        table_spec: &Predicates,
        coordinate: (usize, usize),
    ) -> Result<Option<Element>> {
        self.ensure_live()?;
        let (row, col) = coordinate;
        let anchor = builder::table_anchor(table_spec)?;
        let kind = self.cell_kind(&anchor, row).await?;
        let path = builder::table_cell_path(&anchor, row, col, kind);
        debug!("Resolving table cell ({}, {}): {}", row, col, path);
        let handle = self.backend.find_first(&Locator::path(path)).await?;
        Ok(handle.map(|h| self.element(h)))
    }

    /// Every cell of a 0-based row, with the same header/data distinction
    /// applied uniformly to the whole row
    #[instrument(skip(self, table_spec))]
    pub async fn find_table_row(
        &self,
        table_spec: &Predicates,
        row: usize,
    ) -> Result<Vec<Element>> {
        self.ensure_live()?;
        let anchor = builder::table_anchor(table_spec)?;
        let kind = self.cell_kind(&anchor, row).await?;
        let path = builder::table_row_path(&anchor, row, kind);
        debug!("Resolving table row {}: {}", row, path);
        let handles = self.backend.find_all(&Locator::path(path)).await?;
        Ok(handles.into_iter().map(|h| self.element(h)).collect())
    }

    async fn cell_kind(&self, anchor: &str, row: usize) -> Result<CellKind> {
        if row != 0 {
            return Ok(CellKind::Data);
        }
        let probe = builder::header_probe_path(anchor);
        let headers = self.backend.find_all(&Locator::path(probe)).await?;
        if headers.is_empty() {
            Ok(CellKind::Data)
        } else {
            Ok(CellKind::Header)
        }
    }

    /// Snapshot every open window
    ///
    /// Enumeration switches through each window to capture its title and
    /// URL, then restores the original focus, including when a snapshot
    /// read fails partway. Snapshots are never cached.
    #[instrument(skip(self))]
    pub async fn windows(&self) -> Result<Vec<Window>> {
        self.ensure_live()?;
        let original = self.backend.current_window().await?;
        let outcome = self.snapshot_windows().await;
        let restored = self.backend.switch_to_window(&original).await;
        let snapshots = outcome?;
        restored?;
        Ok(snapshots)
    }

    async fn snapshot_windows(&self) -> Result<Vec<Window>> {
        let ids = self.backend.window_ids().await?;
        let mut snapshots = Vec::with_capacity(ids.len());
        for id in ids {
            self.backend.switch_to_window(&id).await?;
            let title = self.backend.title().await?;
            let url = self.backend.current_url().await?;
            snapshots.push(Window::new(id, title, url, self.id.clone()));
        }
        Ok(snapshots)
    }

    /// First window matching the criteria
    pub async fn find_window(&self, criteria: &Predicates) -> Result<Option<Window>> {
        Ok(self.find_windows(criteria).await?.into_iter().next())
    }

    /// Windows matching the criteria, in enumeration order
    ///
    /// `index` is a 0-based shortcut into the enumeration; the remaining
    /// criteria still apply to the selected window.
    #[instrument(skip(self, criteria))]
    pub async fn find_windows(&self, criteria: &Predicates) -> Result<Vec<Window>> {
        let snapshots = self.windows().await?;
        if let Some(index) = builder::parse_index(criteria)? {
            let rest = criteria.without(keys::INDEX);
            return Ok(snapshots
                .into_iter()
                .nth(index)
                .filter(|window| window.matches(&rest))
                .into_iter()
                .collect());
        }
        Ok(snapshots
            .into_iter()
            .filter(|window| window.matches(criteria))
            .collect())
    }

    /// Focus a window and reset the cache to the fresh window state
    #[instrument(skip(self))]
    pub async fn switch_to_window(&mut self, window: &WindowId) -> Result<()> {
        self.ensure_live()?;
        self.backend.switch_to_window(window).await?;
        self.cache.seed(HashMap::new());
        Ok(())
    }

    /// Switch the frame context within the current page
    ///
    /// Not a navigation: cached elements of the page stay valid.
    pub async fn switch_to_frame(&mut self, target: FrameTarget) -> Result<()> {
        self.ensure_live()?;
        self.backend.switch_to_frame(target).await
    }

    /// Current document title
    pub async fn title(&self) -> Result<String> {
        self.ensure_live()?;
        self.backend.title().await
    }

    /// Current document URL
    pub async fn current_url(&self) -> Result<String> {
        self.ensure_live()?;
        self.backend.current_url().await
    }

    /// Navigate to a URL, invalidating the cache
    #[instrument(skip(self))]
    pub async fn navigate_to(&mut self, url: &str) -> Result<()> {
        self.ensure_live()?;
        info!("Navigating to {}", url);
        self.backend.navigate_to(url).await?;
        self.cache.seed(HashMap::new());
        Ok(())
    }

    /// History back, invalidating the cache
    #[instrument(skip(self))]
    pub async fn back(&mut self) -> Result<()> {
        self.ensure_live()?;
        self.backend.back().await?;
        self.cache.seed(HashMap::new());
        Ok(())
    }

    /// History forward, invalidating the cache
    #[instrument(skip(self))]
    pub async fn forward(&mut self) -> Result<()> {
        self.ensure_live()?;
        self.backend.forward().await?;
        self.cache.seed(HashMap::new());
        Ok(())
    }

    /// Reload the page, invalidating the cache
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> Result<()> {
        self.ensure_live()?;
        self.backend.refresh().await?;
        self.cache.seed(HashMap::new());
        Ok(())
    }

    /// Close the focused window, invalidating the cache
    #[instrument(skip(self))]
    pub async fn close_window(&mut self) -> Result<()> {
        self.ensure_live()?;
        self.backend.close_window().await?;
        self.cache.seed(HashMap::new());
        Ok(())
    }

    /// End the backend session
    ///
    /// The session is dead to callers whether or not the backend
    /// acknowledged; every later operation is a usage error.
    #[instrument(skip(self))]
    pub async fn quit(&mut self) -> Result<()> {
        self.ensure_live()?;
        info!("Quitting session {}", self.id.as_str());
        let outcome = self.backend.quit().await;
        self.cache.seed(HashMap::new());
        self.live = false;
        outcome
    }
}
