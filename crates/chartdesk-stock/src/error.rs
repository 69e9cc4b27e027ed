//! Error types for stock analysis operations

use thiserror::Error;

/// Stock analysis specific errors
#[derive(Debug, Error)]
pub enum StockError {
    /// Data not available for the requested symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// Technical indicator calculation error
    #[error("Technical indicator error: {0}")]
    IndicatorError(String),

    /// Chart document could not be produced
    #[error("Chart rendering error: {0}")]
    RenderError(String),

    /// Reference catalog could not be loaded
    #[error("Catalog error: {0}")]
    CatalogError(String),

    /// The same symbol appears twice in a catalog source
    #[error("Duplicate symbol in catalog: {0}")]
    DuplicateSymbol(String),

    /// Ticker search failed internally
    #[error("Search error: {0}")]
    SearchError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl StockError {
    /// Short message suitable for end users.
    ///
    /// Provider and I/O details are reduced to a generic phrase; the full
    /// error is expected to be logged by the caller.
    pub fn user_message(&self) -> String {
        match self {
            Self::DataUnavailable { reason, .. } => format!("no market data available ({reason})"),
            Self::YahooFinanceError(_) => "the market data provider request failed".to_string(),
            Self::IndicatorError(_) => "technical indicators could not be calculated".to_string(),
            Self::RenderError(_) => "the chart could not be rendered".to_string(),
            _ => "an internal error occurred".to_string(),
        }
    }
}

/// Result type alias for stock operations
pub type Result<T> = std::result::Result<T, StockError>;
