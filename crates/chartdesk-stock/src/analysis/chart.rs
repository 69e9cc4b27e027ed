//! Self-contained HTML chart documents
//!
//! The chart is drawn as inline SVG so the document needs no scripts or
//! network access once delivered: a price panel (close, fast and slow moving
//! averages, Bollinger bands, crossover markers) above an RSI panel.

use chrono::NaiveDate;
use minijinja::{Environment, context};
use serde::Serialize;
use std::fmt::Write as _;

use super::AnalysisSummary;
use super::indicators::{Band, CrossoverKind, CrossoverSignal, RSI_OVERBOUGHT, RSI_OVERSOLD};
use crate::error::{Result, StockError};

const CHART_TEMPLATE: &str = include_str!("../../templates/chart.html");

const WIDTH: f64 = 1000.0;
const PLOT_LEFT: f64 = 72.0;
const PLOT_RIGHT: f64 = WIDTH - 16.0;
const PRICE_TOP: f64 = 16.0;
const PRICE_HEIGHT: f64 = 360.0;
const RSI_TOP: f64 = PRICE_TOP + PRICE_HEIGHT + 48.0;
const RSI_HEIGHT: f64 = 120.0;
const HEIGHT: f64 = RSI_TOP + RSI_HEIGHT + 36.0;
const PRICE_TICKS: usize = 5;
const DATE_LABELS: usize = 6;

/// One in-window bar with its indicator readings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub close: f64,
    pub fast_ma: Option<f64>,
    pub slow_ma: Option<f64>,
    pub band: Option<Band>,
    pub rsi: Option<f64>,
}

/// Renderable chart for one analysis
#[derive(Debug, Clone, Serialize)]
pub struct ChartArtifact {
    summary: AnalysisSummary,
    points: Vec<ChartPoint>,
    signals: Vec<CrossoverSignal>,
}

impl ChartArtifact {
    pub fn new(
        summary: AnalysisSummary,
        points: Vec<ChartPoint>,
        signals: Vec<CrossoverSignal>,
    ) -> Self {
        Self {
            summary,
            points,
            signals,
        }
    }

    /// Document title
    pub fn title(&self) -> String {
        match &self.summary.display_name {
            Some(name) => format!("{name} ({}) Technical Analysis", self.summary.symbol),
            None => format!("{} Technical Analysis", self.summary.symbol),
        }
    }

    /// Render as a complete HTML document
    pub fn to_html(&self) -> Result<String> {
        let mut env = Environment::new();
        env.add_template("chart.html", CHART_TEMPLATE)
            .map_err(|e| StockError::RenderError(e.to_string()))?;
        let template = env
            .get_template("chart.html")
            .map_err(|e| StockError::RenderError(e.to_string()))?;

        template
            .render(context! {
                title => self.title(),
                svg => self.layout(),
                rows => self.summary_rows(),
                signals => self.signal_rows(),
            })
            .map_err(|e| StockError::RenderError(e.to_string()))
    }

    fn summary_rows(&self) -> Vec<Row> {
        let s = &self.summary;
        let rsi = match (s.latest_rsi, s.rsi_zone) {
            (Some(value), Some(zone)) => format!("{value:.2} ({})", zone.interpretation()),
            _ => "n/a".to_string(),
        };
        let trend = match s.trend {
            super::Trend::Bullish => format!(
                "Bullish (SMA {} above SMA {})",
                s.fast_period, s.slow_period
            ),
            super::Trend::Bearish => format!(
                "Bearish (SMA {} below SMA {})",
                s.fast_period, s.slow_period
            ),
            super::Trend::Undetermined => {
                format!("Undetermined (SMA {} not yet defined)", s.slow_period)
            }
        };

        vec![
            Row::new("Period", format!("{} to {}", s.start_date, s.end_date)),
            Row::new("Last close", format!("{:.2}", s.last_close)),
            Row::new("Change", format!("{:+.2}%", s.change_pct)),
            Row::new("Period high", format!("{:.2}", s.period_high)),
            Row::new("Period low", format!("{:.2}", s.period_low)),
            Row::new("RSI (14)", rsi),
            Row::new("Trend", trend),
        ]
    }

    fn signal_rows(&self) -> Vec<Row> {
        self.signals
            .iter()
            .map(|s| Row::new(s.date.to_string(), format!("{} at {:.2}", s.kind.label(), s.close)))
            .collect()
    }

    fn layout(&self) -> SvgLayout {
        let n = self.points.len();
        let x = |i: usize| {
            if n < 2 {
                (PLOT_LEFT + PLOT_RIGHT) / 2.0
            } else {
                PLOT_LEFT + (PLOT_RIGHT - PLOT_LEFT) * i as f64 / (n - 1) as f64
            }
        };

        let price = Scale::fit(
            self.points.iter().flat_map(|p| {
                [
                    Some(p.close),
                    p.fast_ma,
                    p.slow_ma,
                    p.band.map(|b| b.upper),
                    p.band.map(|b| b.lower),
                ]
            }),
            PRICE_TOP,
            PRICE_HEIGHT,
        );
        let rsi = Scale {
            min: 0.0,
            max: 100.0,
            top: RSI_TOP,
            height: RSI_HEIGHT,
        };

        let price_ticks = (0..PRICE_TICKS)
            .map(|k| {
                let value = price.min + (price.max - price.min) * k as f64 / (PRICE_TICKS - 1) as f64;
                Tick {
                    pos: price.y(value),
                    label: format!("{value:.2}"),
                }
            })
            .collect();

        let mut label_indices: Vec<usize> = (0..DATE_LABELS)
            .map(|k| k * n.saturating_sub(1) / (DATE_LABELS - 1))
            .collect();
        label_indices.dedup();
        let date_labels = label_indices
            .into_iter()
            .filter_map(|i| self.points.get(i).map(|p| (i, p)))
            .map(|(i, p)| Tick {
                pos: x(i),
                label: p.date.to_string(),
            })
            .collect();

        let markers = self
            .signals
            .iter()
            .filter_map(|signal| {
                let i = self.points.iter().position(|p| p.date == signal.date)?;
                Some(Marker {
                    x: x(i),
                    y: price.y(signal.close),
                    class: match signal.kind {
                        CrossoverKind::Golden => "golden",
                        CrossoverKind::Death => "death",
                    },
                    label: format!("{} {}", signal.kind.label(), signal.date),
                })
            })
            .collect();

        SvgLayout {
            width: WIDTH,
            height: HEIGHT,
            plot_left: PLOT_LEFT,
            plot_right: PLOT_RIGHT,
            price_top: PRICE_TOP,
            price_bottom: PRICE_TOP + PRICE_HEIGHT,
            rsi_top: RSI_TOP,
            rsi_bottom: RSI_TOP + RSI_HEIGHT,
            rsi_overbought_y: rsi.y(RSI_OVERBOUGHT),
            rsi_oversold_y: rsi.y(RSI_OVERSOLD),
            close_path: line_path(self.points.iter().map(|p| Some(p.close)), &x, &price),
            fast_path: line_path(self.points.iter().map(|p| p.fast_ma), &x, &price),
            slow_path: line_path(self.points.iter().map(|p| p.slow_ma), &x, &price),
            upper_path: line_path(self.points.iter().map(|p| p.band.map(|b| b.upper)), &x, &price),
            lower_path: line_path(self.points.iter().map(|p| p.band.map(|b| b.lower)), &x, &price),
            rsi_path: line_path(self.points.iter().map(|p| p.rsi), &x, &rsi),
            fast_label: format!("SMA {}", self.summary.fast_period),
            slow_label: format!("SMA {}", self.summary.slow_period),
            price_ticks,
            date_labels,
            markers,
        }
    }
}

#[derive(Debug, Serialize)]
struct Row {
    label: String,
    value: String,
}

impl Row {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Tick {
    pos: f64,
    label: String,
}

#[derive(Debug, Serialize)]
struct Marker {
    x: f64,
    y: f64,
    class: &'static str,
    label: String,
}

#[derive(Debug, Serialize)]
struct SvgLayout {
    width: f64,
    height: f64,
    plot_left: f64,
    plot_right: f64,
    price_top: f64,
    price_bottom: f64,
    rsi_top: f64,
    rsi_bottom: f64,
    rsi_overbought_y: f64,
    rsi_oversold_y: f64,
    close_path: String,
    fast_path: String,
    slow_path: String,
    upper_path: String,
    lower_path: String,
    rsi_path: String,
    fast_label: String,
    slow_label: String,
    price_ticks: Vec<Tick>,
    date_labels: Vec<Tick>,
    markers: Vec<Marker>,
}

/// Linear value-to-pixel mapping for one panel
#[derive(Debug, Clone, Copy, PartialEq)]
struct Scale {
    min: f64,
    max: f64,
    top: f64,
    height: f64,
}

impl Scale {
    /// Fit the finite values with 5% headroom on each side
    fn fit(values: impl Iterator<Item = Option<f64>>, top: f64, height: f64) -> Self {
        let (min, max) = values
            .flatten()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });

        let (min, max) = if !min.is_finite() {
            (0.0, 1.0)
        } else if (max - min).abs() < f64::EPSILON {
            (min - 1.0, max + 1.0)
        } else {
            let pad = (max - min) * 0.05;
            (min - pad, max + pad)
        };

        Self {
            min,
            max,
            top,
            height,
        }
    }

    fn y(&self, value: f64) -> f64 {
        self.top + (self.max - value) / (self.max - self.min) * self.height
    }
}

/// SVG path through the defined values; gaps lift the pen
fn line_path(
    values: impl Iterator<Item = Option<f64>>,
    x: &impl Fn(usize) -> f64,
    scale: &Scale,
) -> String {
    let mut path = String::new();
    let mut pen_down = false;

    for (i, value) in values.enumerate() {
        match value.filter(|v| v.is_finite()) {
            Some(v) => {
                let cmd = if pen_down { 'L' } else { 'M' };
                let _ = write!(path, "{cmd}{:.2},{:.2} ", x(i), scale.y(v));
                pen_down = true;
            }
            None => pen_down = false,
        }
    }

    path.truncate(path.trim_end().len());
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{RsiZone, Trend};

    fn summary(display_name: Option<&str>) -> AnalysisSummary {
        AnalysisSummary {
            symbol: "T".to_string(),
            display_name: display_name.map(String::from),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            first_close: 10.0,
            last_close: 12.5,
            change_pct: 25.0,
            period_high: 12.5,
            period_low: 10.0,
            latest_rsi: Some(71.25),
            rsi_zone: Some(RsiZone::Overbought),
            trend: Trend::Bullish,
            fast_period: 20,
            slow_period: 50,
        }
    }

    fn points() -> Vec<ChartPoint> {
        [10.0, 11.0, 11.5, 12.5]
            .iter()
            .enumerate()
            .map(|(i, &close)| ChartPoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 2 + i as u32).unwrap(),
                close,
                fast_ma: (i > 0).then_some(close - 0.5),
                slow_ma: (i > 1).then_some(close - 1.0),
                band: None,
                rsi: Some(50.0 + i as f64),
            })
            .collect()
    }

    #[test]
    fn test_html_document_is_self_contained() {
        let signals = vec![CrossoverSignal {
            date: NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
            kind: CrossoverKind::Golden,
            close: 11.5,
        }];
        let chart = ChartArtifact::new(summary(Some("AT&T Inc.")), points(), signals);
        let html = chart.to_html().unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<svg"));
        assert!(html.contains("AT&amp;T Inc. (T) Technical Analysis"));
        assert!(html.contains("+25.00%"));
        assert!(html.contains("Golden cross at 11.50"));
        assert!(html.contains("class=\"marker golden\""));
        assert!(!html.contains("<script src"));
    }

    #[test]
    fn test_title_without_display_name() {
        let chart = ChartArtifact::new(summary(None), points(), Vec::new());
        assert_eq!(chart.title(), "T Technical Analysis");
    }

    #[test]
    fn test_line_path_breaks_on_gaps() {
        let scale = Scale {
            min: 0.0,
            max: 10.0,
            top: 0.0,
            height: 100.0,
        };
        let x = |i: usize| i as f64 * 10.0;
        let path = line_path(
            [Some(10.0), Some(5.0), None, Some(0.0), Some(f64::NAN)].into_iter(),
            &x,
            &scale,
        );
        assert_eq!(path, "M0.00,0.00 L10.00,50.00 M30.00,100.00");
    }

    #[test]
    fn test_scale_fit() {
        let scale = Scale::fit([Some(100.0), None, Some(200.0)].into_iter(), 0.0, 100.0);
        assert_eq!(scale.min, 95.0);
        assert_eq!(scale.max, 205.0);
        assert!(scale.y(205.0).abs() < 1e-9);
        assert!((scale.y(95.0) - 100.0).abs() < 1e-9);

        let flat = Scale::fit([Some(5.0), Some(5.0)].into_iter(), 0.0, 100.0);
        assert_eq!((flat.min, flat.max), (4.0, 6.0));

        let empty = Scale::fit(std::iter::empty(), 0.0, 100.0);
        assert_eq!((empty.min, empty.max), (0.0, 1.0));
    }

    #[test]
    fn test_layout_labels_and_markers() {
        let signals = vec![CrossoverSignal {
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            kind: CrossoverKind::Death,
            close: 12.5,
        }];
        let chart = ChartArtifact::new(summary(None), points(), signals);
        let layout = chart.layout();

        assert_eq!(layout.markers.len(), 1);
        assert_eq!(layout.markers[0].class, "death");
        assert!((layout.markers[0].x - PLOT_RIGHT).abs() < 1e-9);
        assert_eq!(layout.date_labels.first().unwrap().label, "2024-01-02");
        assert_eq!(layout.date_labels.last().unwrap().label, "2024-01-05");
        assert_eq!(layout.price_ticks.len(), PRICE_TICKS);
        assert!(layout.fast_path.starts_with('M'));
    }
}
