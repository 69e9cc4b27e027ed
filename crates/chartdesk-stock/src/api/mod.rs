//! Market data sources

pub mod yahoo;

pub use yahoo::{Quote, YahooFinanceClient};

use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Source of daily price bars
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Daily bars for `symbol` from `start` through `end`, both inclusive,
    /// oldest first
    async fn daily_history(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
    -> Result<Vec<Quote>>;
}
