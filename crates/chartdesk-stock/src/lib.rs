//! Stock lookup and technical-analysis core for chartdesk
//!
//! This crate holds everything behind the web surface:
//!
//! - A predefined ticker [`Catalog`] loaded from JSON
//! - Ranked ticker [`search`] for autocomplete
//! - Best-effort symbol [`resolver`] for free-form input
//! - Request [`validation`] of the analysis form
//! - An [`AnalysisEngine`] that fetches daily bars from Yahoo Finance and
//!   renders a self-contained HTML chart with moving averages, Bollinger
//!   bands, RSI and crossover markers
//!
//! # Example
//!
//! ```rust,ignore
//! use chartdesk_stock::{AnalysisEngine, Catalog, StockConfig, TechnicalAnalysisEngine};
//! use chartdesk_stock::validation::{AnalysisForm, validate};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Arc::new(StockConfig::default());
//!     let catalog = Arc::new(Catalog::load(&config)?);
//!     let engine = TechnicalAnalysisEngine::yahoo(config, Arc::clone(&catalog));
//!
//!     let request = validate(&AnalysisForm::with_ticker("apple"))?.resolve_symbol(&catalog);
//!     let analysis = engine.create_combined_analysis(&request).await?;
//!     std::fs::write("chart.html", analysis.chart.to_html()?)?;
//!
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod resolver;
pub mod search;
pub mod validation;

pub use analysis::{
    AnalysisEngine, AnalysisSummary, ChartArtifact, CombinedAnalysis, TechnicalAnalysisEngine,
    Trend,
};
pub use catalog::{Catalog, TickerEntry};
pub use config::StockConfig;
pub use error::{Result, StockError};
pub use search::{SearchResult, search};
pub use validation::{AnalysisForm, AnalysisRequest, ValidationError};
