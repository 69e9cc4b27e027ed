//! Interactive ticker search
//!
//! Ranking: the exact symbol match (if any) comes first, then shorter symbols,
//! then alphabetical order. At most [`MAX_RESULTS`] candidates are returned.

use crate::catalog::{Catalog, TickerEntry};
use crate::error::{Result, StockError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Maximum number of candidates returned by a search
pub const MAX_RESULTS: usize = 5;

/// Queries longer than this are rejected by [`try_search`] and yield no results
/// from [`search`], even if some display name would contain them. Every name in
/// the built-in catalog is shorter, so this only affects custom catalogs.
pub const MAX_QUERY_LEN: usize = 64;

/// Where a search result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    /// The reference catalog
    Predefined,
}

/// A ranked search candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub symbol: String,
    #[serde(rename = "name")]
    pub display_name: String,
    pub source: ResultSource,
}

impl From<&TickerEntry> for SearchResult {
    fn from(entry: &TickerEntry) -> Self {
        Self {
            symbol: entry.symbol.clone(),
            display_name: entry.display_name.clone(),
            source: ResultSource::Predefined,
        }
    }
}

/// Search the catalog, never failing.
///
/// Internal errors are logged and degrade to an empty result.
pub fn search(catalog: &Catalog, query: &str) -> Vec<SearchResult> {
    match try_search(catalog, query) {
        Ok(results) => results,
        Err(e) => {
            tracing::error!(error = %e, "Search error");
            Vec::new()
        }
    }
}

/// Search the catalog, surfacing internal errors
pub fn try_search(catalog: &Catalog, query: &str) -> Result<Vec<SearchResult>> {
    let query = query.trim().to_uppercase();
    if query.is_empty() {
        return Ok(Vec::new());
    }

    if query.chars().count() > MAX_QUERY_LEN {
        return Err(StockError::SearchError(format!(
            "query exceeds {MAX_QUERY_LEN} characters"
        )));
    }

    tracing::info!(%query, "Searching for ticker");

    let mut results = Vec::with_capacity(MAX_RESULTS);

    if let Some(entry) = catalog.get(&query) {
        results.push(SearchResult::from(entry));
        tracing::info!(%query, "Found exact match");
    }

    let partial_matches: Vec<&TickerEntry> = catalog
        .iter()
        .filter(|entry| entry.symbol != query && matches_partially(entry, &query))
        .collect();
    tracing::info!(count = partial_matches.len(), "Found partial matches");

    let room = MAX_RESULTS - results.len();
    results.extend(partial_matches.into_iter().take(room).map(SearchResult::from));

    results.sort_by(|a, b| rank(a, b, &query));
    results.truncate(MAX_RESULTS);

    Ok(results)
}

fn matches_partially(entry: &TickerEntry, query: &str) -> bool {
    entry.symbol.to_uppercase().contains(query) || entry.display_name.to_uppercase().contains(query)
}

/// Exact match first, then shorter symbols, then alphabetical
fn rank(a: &SearchResult, b: &SearchResult, query: &str) -> Ordering {
    (a.symbol != query)
        .cmp(&(b.symbol != query))
        .then_with(|| a.symbol.len().cmp(&b.symbol.len()))
        .then_with(|| a.symbol.cmp(&b.symbol))
}
