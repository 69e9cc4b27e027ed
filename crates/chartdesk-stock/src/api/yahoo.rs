//! Yahoo Finance API client

use crate::api::QuoteSource;
use crate::config::StockConfig;
use crate::error::{Result, StockError};
use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

/// Yahoo Finance API client
#[derive(Debug, Clone)]
pub struct YahooFinanceClient {
    config: StockConfig,
}

/// Daily price bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub adjclose: f64,
}

impl Quote {
    /// Trading day of this bar (UTC)
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new(config: &StockConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Get historical quotes for a symbol, retrying transient failures
    pub async fn get_historical_quotes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Quote>> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(symbol, start, end).await {
                Ok(quotes) => return Ok(quotes),
                Err(StockError::YahooFinanceError(reason)) if attempt + 1 < self.config.max_retries => {
                    let backoff = self.config.retry_backoff(attempt);
                    tracing::warn!(
                        %symbol,
                        attempt = attempt + 1,
                        backoff_ms = backoff.as_millis() as u64,
                        %reason,
                        "Yahoo Finance request failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Quote>> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| StockError::YahooFinanceError(e.to_string()))?;

        // Convert chrono DateTime to time OffsetDateTime
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| StockError::YahooFinanceError(format!("Invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| StockError::YahooFinanceError(format!("Invalid end timestamp: {e}")))?;

        let response = provider
            .get_quote_history(symbol, start_odt, end_odt)
            .await
            .map_err(|e| classify_error(symbol, &e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| classify_error(symbol, &e.to_string()))?;

        Ok(quotes
            .iter()
            .filter_map(|q| {
                DateTime::from_timestamp(q.timestamp as i64, 0).map(|timestamp| Quote {
                    timestamp,
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                    volume: q.volume,
                    adjclose: q.adjclose,
                })
            })
            .collect())
    }
}

/// Map provider failures that retrying cannot fix to `DataUnavailable`
fn classify_error(symbol: &str, message: &str) -> StockError {
    let lower = message.to_lowercase();
    if lower.contains("no data") || lower.contains("not found") || lower.contains("no quotes") {
        StockError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: "no quotes returned by Yahoo Finance".to_string(),
        }
    } else {
        StockError::YahooFinanceError(message.to_string())
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

#[async_trait]
impl QuoteSource for YahooFinanceClient {
    async fn daily_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Quote>> {
        // Yahoo treats the end timestamp as exclusive
        let end_exclusive = end.checked_add_days(Days::new(1)).unwrap_or(end);
        let mut quotes = self
            .get_historical_quotes(symbol, start_of_day(start), start_of_day(end_exclusive))
            .await?;

        quotes.retain(|q| q.close.is_finite() && q.close > 0.0);
        quotes.sort_by_key(|q| q.timestamp);
        Ok(quotes)
    }
}

impl Default for YahooFinanceClient {
    fn default() -> Self {
        Self::new(&StockConfig::default())
    }
}
