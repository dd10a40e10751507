//! Result presentation: which panel is visible, card expansion, outbound links.

pub mod format;
mod markdown;

use std::collections::BTreeSet;

use crate::service::SearchResult;

/// What the results area shows for the current controller state.
#[derive(Debug)]
pub enum Panel<'a> {
    /// Nothing submitted yet. Renders nothing.
    Idle,
    Loading { query: &'a str },
    NoResults { query: &'a str },
    Results(&'a [SearchResult]),
}

impl<'a> Panel<'a> {
    pub fn from_state(
        loading: bool,
        last_query: Option<&'a str>,
        results: &'a [SearchResult],
    ) -> Self {
        match (loading, last_query) {
            (true, query) => Panel::Loading {
                query: query.unwrap_or_default(),
            },
            _ if !results.is_empty() => Panel::Results(results),
            (false, Some(query)) if !query.is_empty() => Panel::NoResults { query },
            _ => Panel::Idle,
        }
    }
}

/// Ids of result cards showing their full abstract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedSet(BTreeSet<usize>);

impl ExpandedSet {
    /// Returns whether `id` is expanded after the toggle.
    pub fn toggle(&mut self, id: usize) -> bool {
        if self.0.remove(&id) {
            false
        } else {
            self.0.insert(id);
            true
        }
    }

    pub fn contains(&self, id: usize) -> bool {
        self.0.contains(&id)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum LinkAction<'a> {
    Open(&'a str),
    Disabled,
}

/// The outbound PubMed link for a card. Disabled when the record has no PubMed URL.
pub fn pubmed_link(result: &SearchResult) -> LinkAction<'_> {
    match result.url_pubmed.as_deref() {
        Some(url) => LinkAction::Open(url),
        None => LinkAction::Disabled,
    }
}
