use tracing::{debug, info, warn};

use crate::search::{Filters, SearchMode};
use crate::service::{SearchBackend, SearchOutcome, SearchRequest, ServiceError};
use crate::view::format::RenderContext;
use crate::view::{ExpandedSet, Panel};

pub const MAX_RESULTS: u32 = 25;
pub const RETMAX: u32 = 200;

/// Identifies one submitted search. Only the most recently issued ticket can
/// complete the controller's state; older ones are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

/// Owns the query, mode, filters, result list and the transient UI state
/// around a search.
#[derive(Debug)]
pub struct SearchController {
    mode: SearchMode,
    use_mesh: bool,
    filters: Filters,
    outcome: SearchOutcome,
    loading: bool,
    last_query: Option<String>,
    expanded: ExpandedSet,
    generation: u64,
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new(SearchMode::default(), true)
    }
}

impl SearchController {
    pub fn new(mode: SearchMode, use_mesh: bool) -> Self {
        Self {
            mode,
            use_mesh,
            filters: Filters::default(),
            outcome: SearchOutcome::default(),
            loading: false,
            last_query: None,
            expanded: ExpandedSet::default(),
            generation: 0,
        }
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: SearchMode) {
        self.mode = mode;
    }

    pub fn use_mesh(&self) -> bool {
        self.use_mesh
    }

    pub fn set_use_mesh(&mut self, use_mesh: bool) {
        self.use_mesh = use_mesh;
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut Filters {
        &mut self.filters
    }

    pub fn outcome(&self) -> &SearchOutcome {
        &self.outcome
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    pub fn expanded(&self) -> &ExpandedSet {
        &self.expanded
    }

    /// Flip the expanded state of a result card. Returns whether it is now expanded.
    pub fn toggle_expanded(&mut self, id: usize) -> bool {
        self.expanded.toggle(id)
    }

    pub fn panel(&self) -> Panel<'_> {
        Panel::from_state(
            self.loading,
            self.last_query.as_deref(),
            &self.outcome.results,
        )
    }

    pub fn render_context(&self) -> RenderContext<'_> {
        RenderContext {
            panel: self.panel(),
            meta: &self.outcome.meta,
            filters: &self.filters,
            expanded: &self.expanded,
        }
    }

    /// Start a search. Blank queries are ignored and leave state untouched.
    pub fn begin(&mut self, query: &str) -> Option<(Ticket, SearchRequest)> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        self.generation += 1;
        self.loading = true;
        self.last_query = Some(query.to_string());
        self.expanded.clear();

        info!(query, mode = self.mode.as_str(), use_mesh = self.use_mesh, "search submitted");

        let request = SearchRequest {
            query: query.to_string(),
            mode: self.mode,
            use_mesh: self.use_mesh,
            max_results: MAX_RESULTS,
            retmax: RETMAX,
        };
        Some((
            Ticket {
                generation: self.generation,
            },
            request,
        ))
    }

    /// Apply the result of a search started by `begin`. Failures degrade to an
    /// empty result set. Returns `false` if the ticket was stale and ignored.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        result: Result<SearchOutcome, ServiceError>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(
                stale = ticket.generation,
                current = self.generation,
                "discarding stale search response"
            );
            return false;
        }

        self.loading = false;
        self.outcome = match result {
            Ok(outcome) => {
                info!(results = outcome.results.len(), "search complete");
                outcome
            }
            Err(e) => {
                warn!(error = %e, query = ?self.last_query, "search failed, showing no results");
                SearchOutcome::default()
            }
        };
        true
    }

    /// Submit a query and wait for the backend. Returns `None` for a blank query.
    pub async fn submit(
        &mut self,
        backend: &impl SearchBackend,
        query: &str,
    ) -> Option<&SearchOutcome> {
        let (ticket, request) = self.begin(query)?;
        let result = backend.search(&request).await;
        self.complete(ticket, result);
        Some(&self.outcome)
    }
}
