//! Best-effort resolution of free text to a catalog symbol

use crate::catalog::Catalog;

/// Resolve user input to a single symbol.
///
/// An exact catalog symbol wins; otherwise the first catalog symbol (in catalog
/// order) that starts with the input is used. Unknown input is returned
/// uppercased but otherwise unchanged, leaving rejection to the data provider.
pub fn resolve(catalog: &Catalog, raw_input: &str) -> String {
    let candidate = raw_input.trim().to_uppercase();
    if candidate.is_empty() {
        return candidate;
    }

    if catalog.contains(&candidate) {
        tracing::info!(ticker = %candidate, "Using predefined ticker");
        return candidate;
    }

    match catalog.iter().find(|entry| entry.symbol.starts_with(&candidate)) {
        Some(entry) => {
            tracing::info!(input = %candidate, ticker = %entry.symbol, "Using matched ticker");
            entry.symbol.clone()
        }
        None => {
            tracing::info!(ticker = %candidate, "No catalog match, using input as-is");
            candidate
        }
    }
}
