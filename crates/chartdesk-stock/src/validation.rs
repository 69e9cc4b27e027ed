//! Validation of raw analysis form input
//!
//! [`validate`] runs four stages in order (symbol, end date, lookback window,
//! crossover window) and stops at the first failure. The only way to obtain an
//! [`AnalysisRequest`] is through this module, so every request in the system
//! carries in-range windows and a real calendar date.

use crate::catalog::Catalog;
use crate::resolver;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use thiserror::Error;

/// Accepted end-date format
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const DEFAULT_LOOKBACK_DAYS: u32 = 365;
pub const LOOKBACK_RANGE: RangeInclusive<u32> = 30..=1825;

pub const DEFAULT_CROSSOVER_DAYS: u32 = 180;
pub const CROSSOVER_RANGE: RangeInclusive<u32> = 30..=365;

/// Raw analysis form fields, exactly as submitted
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisForm {
    pub ticker: Option<String>,
    pub end_date: Option<String>,
    pub lookback_days: Option<String>,
    pub crossover_days: Option<String>,
}

impl AnalysisForm {
    /// Form with only a ticker set
    pub fn with_ticker(ticker: impl Into<String>) -> Self {
        Self {
            ticker: Some(ticker.into()),
            ..Default::default()
        }
    }
}

/// Builds a form from decoded `key=value` pairs; the first value of a repeated
/// key wins and unknown keys are ignored.
impl FromIterator<(String, String)> for AnalysisForm {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut form = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "ticker" => &mut form.ticker,
                "end_date" => &mut form.end_date,
                "lookback_days" => &mut form.lookback_days,
                "crossover_days" => &mut form.crossover_days,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        form
    }
}

/// Why a form was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Ticker symbol is required")]
    MissingSymbol,

    #[error("Invalid date format '{0}'. Please use YYYY-MM-DD format")]
    InvalidDateFormat(String),

    #[error("Invalid lookback days value '{0}'. Lookback days must be between 30 and 1825")]
    InvalidLookback(String),

    #[error("Invalid crossover days value '{0}'. Crossover days must be between 30 and 365")]
    InvalidCrossover(String),
}

/// A validated analysis request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisRequest {
    symbol: String,
    end_date: Option<NaiveDate>,
    lookback_days: u32,
    crossover_days: u32,
}

impl AnalysisRequest {
    /// Build a request from already-typed values, enforcing the window bounds
    pub fn new(
        symbol: &str,
        end_date: Option<NaiveDate>,
        lookback_days: u32,
        crossover_days: u32,
    ) -> Result<Self, ValidationError> {
        let symbol = parse_symbol(Some(symbol))?;
        if !LOOKBACK_RANGE.contains(&lookback_days) {
            return Err(ValidationError::InvalidLookback(lookback_days.to_string()));
        }
        if !CROSSOVER_RANGE.contains(&crossover_days) {
            return Err(ValidationError::InvalidCrossover(crossover_days.to_string()));
        }

        Ok(Self {
            symbol,
            end_date,
            lookback_days,
            crossover_days,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Requested end date; `None` means today
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn lookback_days(&self) -> u32 {
        self.lookback_days
    }

    pub fn crossover_days(&self) -> u32 {
        self.crossover_days
    }

    /// Last day of the analysis window
    pub fn window_end(&self, today: NaiveDate) -> NaiveDate {
        self.end_date.unwrap_or(today)
    }

    /// Replace the symbol with its best catalog match
    pub fn resolve_symbol(mut self, catalog: &Catalog) -> Self {
        self.symbol = resolver::resolve(catalog, &self.symbol);
        self
    }
}

/// Validate raw form input
pub fn validate(form: &AnalysisForm) -> Result<AnalysisRequest, ValidationError> {
    let symbol = parse_symbol(form.ticker.as_deref())?;
    tracing::info!(ticker = %symbol, "Analyzing ticker");

    let end_date = parse_end_date(form.end_date.as_deref())?;
    match end_date {
        Some(date) => tracing::info!(%date, "Using end date"),
        None => tracing::info!("Using current date"),
    }

    let lookback_days = parse_window(
        form.lookback_days.as_deref(),
        DEFAULT_LOOKBACK_DAYS,
        &LOOKBACK_RANGE,
    )
    .map_err(ValidationError::InvalidLookback)?;
    tracing::info!(lookback_days, "Using lookback days");

    let crossover_days = parse_window(
        form.crossover_days.as_deref(),
        DEFAULT_CROSSOVER_DAYS,
        &CROSSOVER_RANGE,
    )
    .map_err(ValidationError::InvalidCrossover)?;
    tracing::info!(crossover_days, "Using crossover days");

    Ok(AnalysisRequest {
        symbol,
        end_date,
        lookback_days,
        crossover_days,
    })
}

/// First whitespace-delimited token, uppercased
fn parse_symbol(raw: Option<&str>) -> Result<String, ValidationError> {
    raw.and_then(|s| s.split_whitespace().next())
        .map(str::to_uppercase)
        .ok_or(ValidationError::MissingSymbol)
}

fn parse_end_date(raw: Option<&str>) -> Result<Option<NaiveDate>, ValidationError> {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map(Some)
        .map_err(|_| ValidationError::InvalidDateFormat(raw.to_string()))
}

/// Parse an optional day count, returning the offending text on failure
fn parse_window(
    raw: Option<&str>,
    default: u32,
    range: &RangeInclusive<u32>,
) -> Result<u32, String> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|days| range.contains(days))
        .ok_or_else(|| raw.to_string())
}
