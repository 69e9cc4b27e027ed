//! Combined technical analysis
//!
//! An [`AnalysisEngine`] turns a validated [`AnalysisRequest`] into a
//! [`CombinedAnalysis`]: the chart document plus the numbers behind it.

pub mod chart;
pub mod engine;
pub mod indicators;

pub use chart::{ChartArtifact, ChartPoint};
pub use engine::TechnicalAnalysisEngine;
pub use indicators::{CrossoverKind, CrossoverSignal, RsiZone};

use crate::error::Result;
use crate::validation::AnalysisRequest;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

/// Direction of the fast average relative to the slow one at the end of the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bullish,
    Bearish,
    /// The slow average is not defined yet
    Undetermined,
}

/// Headline figures for the analysis window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    pub symbol: String,
    pub display_name: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub first_close: f64,
    pub last_close: f64,
    pub change_pct: f64,
    pub period_high: f64,
    pub period_low: f64,
    pub latest_rsi: Option<f64>,
    pub rsi_zone: Option<RsiZone>,
    pub trend: Trend,
    pub fast_period: usize,
    pub slow_period: usize,
}

/// Everything produced for one analysis request
#[derive(Debug, Clone)]
pub struct CombinedAnalysis {
    pub summary: AnalysisSummary,
    pub signals: Vec<CrossoverSignal>,
    pub chart: ChartArtifact,
}

/// Produces charts for validated requests
#[async_trait]
pub trait AnalysisEngine: Send + Sync {
    /// Run the analysis; fails on unknown symbols or data-fetch errors
    async fn create_combined_analysis(&self, request: &AnalysisRequest)
    -> Result<CombinedAnalysis>;
}
