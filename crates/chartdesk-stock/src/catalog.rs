//! Reference catalog of known ticker symbols
//!
//! The catalog is an ordered list of `{symbol, name}` entries with an O(1)
//! exact-symbol index on top. It is built once at start-up and never mutated,
//! so it can be shared across request handlers behind an `Arc` without locking.

use crate::config::StockConfig;
use crate::error::{Result, StockError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::Path;

const BUILTIN_TICKERS: &str = include_str!("../data/tickers.json");

/// A known symbol and its display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerEntry {
    /// Canonical uppercase symbol
    pub symbol: String,
    /// Human-readable instrument name
    #[serde(rename = "name")]
    pub display_name: String,
}

impl TickerEntry {
    pub fn new(symbol: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            display_name: display_name.into(),
        }
    }
}

/// Immutable ticker catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<TickerEntry>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from entries, preserving their order.
    ///
    /// Symbols are trimmed and uppercased; an empty or repeated symbol is an error.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = TickerEntry>,
    {
        let mut catalog = Self::default();

        for entry in entries {
            let symbol = entry.symbol.trim().to_uppercase();
            if symbol.is_empty() {
                return Err(StockError::CatalogError(format!(
                    "entry '{}' has an empty symbol",
                    entry.display_name
                )));
            }

            match catalog.index.entry(symbol.clone()) {
                Entry::Occupied(_) => return Err(StockError::DuplicateSymbol(symbol)),
                Entry::Vacant(slot) => {
                    slot.insert(catalog.entries.len());
                }
            }

            catalog.entries.push(TickerEntry {
                symbol,
                display_name: entry.display_name.trim().to_string(),
            });
        }

        Ok(catalog)
    }

    /// Parse a JSON array of `{"symbol": .., "name": ..}` objects
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<TickerEntry> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    /// Load a catalog from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            StockError::CatalogError(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    /// The catalog compiled into the binary
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_TICKERS)
    }

    /// Load the configured catalog, falling back to the built-in list
    pub fn load(config: &StockConfig) -> Result<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => Self::from_path(path)?,
            None => Self::builtin()?,
        };

        let source = config
            .catalog_path
            .as_ref()
            .map_or_else(|| "builtin".to_string(), |p| p.display().to_string());
        tracing::info!(tickers = catalog.len(), %source, "Loaded ticker catalog");

        Ok(catalog)
    }

    /// Exact lookup by canonical symbol
    pub fn get(&self, symbol: &str) -> Option<&TickerEntry> {
        self.index.get(symbol).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.index.contains_key(symbol)
    }

    pub fn display_name(&self, symbol: &str) -> Option<&str> {
        self.get(symbol).map(|entry| entry.display_name.as_str())
    }

    /// Entries in catalog order
    pub fn iter(&self) -> std::slice::Iter<'_, TickerEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a TickerEntry;
    type IntoIter = std::slice::Iter<'a, TickerEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert!(!catalog.is_empty());
        assert_eq!(catalog.display_name("AAPL"), Some("Apple Inc."));
        assert!(catalog.contains("7203.T"));
    }

    #[test]
    fn test_builtin_symbols_are_canonical() {
        let catalog = Catalog::builtin().unwrap();
        for entry in &catalog {
            assert_eq!(entry.symbol, entry.symbol.to_uppercase());
            assert_eq!(entry.symbol, entry.symbol.trim());
        }
    }

    #[test]
    fn test_symbols_are_normalized() {
        let catalog = Catalog::from_entries([TickerEntry::new(" msft ", "Microsoft Corporation ")])
            .unwrap();

        let entry = catalog.get("MSFT").unwrap();
        assert_eq!(entry.symbol, "MSFT");
        assert_eq!(entry.display_name, "Microsoft Corporation");
        assert!(catalog.get("msft").is_none());
    }

    #[test]
    fn test_order_is_preserved() {
        let catalog = Catalog::from_entries([
            TickerEntry::new("ZM", "Zoom Video Communications"),
            TickerEntry::new("A", "Agilent Technologies"),
            TickerEntry::new("MMM", "3M Company"),
        ])
        .unwrap();

        let symbols: Vec<&str> = catalog.iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(symbols, ["ZM", "A", "MMM"]);
    }

    #[test]
    fn test_duplicate_symbols_rejected() {
        let result = Catalog::from_entries([
            TickerEntry::new("AAPL", "Apple Inc."),
            TickerEntry::new("aapl", "Apple again"),
        ]);
        assert!(matches!(result, Err(StockError::DuplicateSymbol(s)) if s == "AAPL"));
    }

    #[test]
    fn test_empty_symbol_rejected() {
        let result = Catalog::from_entries([TickerEntry::new("  ", "Nothing")]);
        assert!(matches!(result, Err(StockError::CatalogError(_))));
    }

    #[test]
    fn test_from_json() {
        let catalog =
            Catalog::from_json(r#"[{"symbol": "spy", "name": "SPDR S&P 500 ETF Trust"}]"#).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.display_name("SPY"), Some("SPDR S&P 500 ETF Trust"));

        assert!(matches!(
            Catalog::from_json(r#"{"symbol": "SPY"}"#),
            Err(StockError::JsonError(_))
        ));
    }

    #[test]
    fn test_from_missing_path() {
        let result = Catalog::from_path("/nonexistent/chartdesk/tickers.json");
        assert!(matches!(result, Err(StockError::CatalogError(_))));
    }
}
