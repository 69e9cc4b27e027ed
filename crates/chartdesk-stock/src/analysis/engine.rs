//! Price-history backed analysis engine

use async_trait::async_trait;
use chrono::{Days, NaiveDate, Utc};
use std::sync::Arc;

use super::chart::{ChartArtifact, ChartPoint};
use super::indicators::{self, CrossoverSignal, RsiZone};
use super::{AnalysisEngine, AnalysisSummary, CombinedAnalysis, Trend};
use crate::api::{Quote, QuoteSource, YahooFinanceClient};
use crate::cache::{CacheKey, StockCache};
use crate::catalog::Catalog;
use crate::config::StockConfig;
use crate::error::{Result, StockError};
use crate::validation::AnalysisRequest;

/// Analysis engine computing indicators over daily bars from a [`QuoteSource`]
pub struct TechnicalAnalysisEngine<S> {
    source: S,
    catalog: Arc<Catalog>,
    cache: StockCache<Arc<Vec<Quote>>>,
    config: Arc<StockConfig>,
}

impl TechnicalAnalysisEngine<YahooFinanceClient> {
    /// Engine backed by Yahoo Finance
    pub fn yahoo(config: Arc<StockConfig>, catalog: Arc<Catalog>) -> Self {
        Self::new(YahooFinanceClient::new(&config), catalog, config)
    }
}

impl<S: QuoteSource> TechnicalAnalysisEngine<S> {
    pub fn new(source: S, catalog: Arc<Catalog>, config: Arc<StockConfig>) -> Self {
        Self {
            source,
            catalog,
            cache: StockCache::new(config.cache_ttl_history),
            config,
        }
    }

    async fn history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Arc<Vec<Quote>>> {
        self.cache
            .get_or_fetch(CacheKey::new(symbol, start, end), || async {
                let quotes = self.source.daily_history(symbol, start, end).await?;
                Ok::<_, StockError>(Arc::new(quotes))
            })
            .await
    }

    /// Run the analysis with an explicit "today", used when no end date was requested
    #[tracing::instrument(skip(self, request), fields(symbol = %request.symbol()))]
    pub async fn analyze_as_of(
        &self,
        request: &AnalysisRequest,
        today: NaiveDate,
    ) -> Result<CombinedAnalysis> {
        let symbol = request.symbol();
        let slow_period = request.crossover_days() as usize;

        let end = request.window_end(today);
        let window_start = days_before(end, request.lookback_days())?;
        // Moving-average periods count trading days; pad the calendar warm-up accordingly
        let warmup = self.config.warmup_for(request.crossover_days()) * 3 / 2;
        let fetch_start = days_before(window_start, warmup)?;

        tracing::info!(%fetch_start, %window_start, %end, "Starting technical analysis");
        let bars = self.history(symbol, fetch_start, end).await?;

        if bars.is_empty() {
            return Err(StockError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "no quotes returned for the requested window".to_string(),
            });
        }

        let dates: Vec<NaiveDate> = bars.iter().map(Quote::date).collect();
        let closes: Vec<f64> = bars.iter().map(|q| q.close).collect();

        let fast = indicators::sma(&closes, indicators::FAST_MA_PERIOD)?;
        let slow = indicators::sma(&closes, slow_period)?;
        let bands = indicators::bollinger(
            &closes,
            indicators::BOLLINGER_PERIOD,
            indicators::BOLLINGER_STD_DEV,
        )?;
        let rsi = indicators::rsi(&closes, indicators::RSI_PERIOD)?;

        let first = dates.partition_point(|d| *d < window_start);
        if closes.len() - first < 2 {
            return Err(StockError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: format!("fewer than two trading days between {window_start} and {end}"),
            });
        }

        let signals: Vec<CrossoverSignal> =
            indicators::detect_crossovers(&dates, &closes, &fast, &slow)
                .into_iter()
                .filter(|s| s.date >= window_start)
                .collect();

        let points: Vec<ChartPoint> = (first..closes.len())
            .map(|i| ChartPoint {
                date: dates[i],
                close: closes[i],
                fast_ma: fast[i],
                slow_ma: slow[i],
                band: bands[i],
                rsi: rsi[i],
            })
            .collect();

        let summary = summarize(
            symbol,
            self.catalog.display_name(symbol),
            &points,
            slow_period,
        );
        tracing::info!(
            bars = points.len(),
            signals = signals.len(),
            change_pct = summary.change_pct,
            "Analysis completed successfully"
        );

        let chart = ChartArtifact::new(summary.clone(), points, signals.clone());

        Ok(CombinedAnalysis {
            summary,
            signals,
            chart,
        })
    }
}

#[async_trait]
impl<S: QuoteSource> AnalysisEngine for TechnicalAnalysisEngine<S> {
    async fn create_combined_analysis(
        &self,
        request: &AnalysisRequest,
    ) -> Result<CombinedAnalysis> {
        self.analyze_as_of(request, Utc::now().date_naive()).await
    }
}

fn days_before(date: NaiveDate, days: u32) -> Result<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(days)))
        .ok_or_else(|| StockError::Other(format!("date out of range: {date} minus {days} days")))
}

/// Headline figures over the in-window points; `points` must hold at least two entries
fn summarize(
    symbol: &str,
    display_name: Option<&str>,
    points: &[ChartPoint],
    slow_period: usize,
) -> AnalysisSummary {
    let first = &points[0];
    let last = &points[points.len() - 1];

    let period_high = points.iter().map(|p| p.close).fold(f64::NEG_INFINITY, f64::max);
    let period_low = points.iter().map(|p| p.close).fold(f64::INFINITY, f64::min);

    let trend = match (last.fast_ma, last.slow_ma) {
        (Some(fast), Some(slow)) if fast > slow => Trend::Bullish,
        (Some(_), Some(_)) => Trend::Bearish,
        _ => Trend::Undetermined,
    };

    AnalysisSummary {
        symbol: symbol.to_string(),
        display_name: display_name.map(str::to_string),
        start_date: first.date,
        end_date: last.date,
        first_close: first.close,
        last_close: last.close,
        change_pct: (last.close - first.close) / first.close * 100.0,
        period_high,
        period_low,
        latest_rsi: last.rsi,
        rsi_zone: last.rsi.map(RsiZone::classify),
        trend,
        fast_period: indicators::FAST_MA_PERIOD,
        slow_period,
    }
}
