//! Technical indicator series
//!
//! Every series has one slot per input bar. Slots before the indicator has seen
//! enough bars are `None` rather than the warm-up values `ta` would report.

use chrono::NaiveDate;
use serde::Serialize;
use ta::{
    Next,
    indicators::{BollingerBands, RelativeStrengthIndex, SimpleMovingAverage},
};

use crate::error::{Result, StockError};

/// Period of the fast moving average
pub const FAST_MA_PERIOD: usize = 20;
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_STD_DEV: f64 = 2.0;
pub const RSI_PERIOD: usize = 14;

pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const RSI_OVERSOLD: f64 = 30.0;

/// Simple moving average
pub fn sma(closes: &[f64], period: usize) -> Result<Vec<Option<f64>>> {
    let mut sma =
        SimpleMovingAverage::new(period).map_err(|e| StockError::IndicatorError(e.to_string()))?;

    Ok(closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let value = sma.next(close);
            (i + 1 >= period).then_some(value)
        })
        .collect())
}

/// Relative strength index; the first value needs `period` price changes.
///
/// A flat series has no gains or losses and yields `None` instead of NaN.
pub fn rsi(closes: &[f64], period: usize) -> Result<Vec<Option<f64>>> {
    let mut rsi = RelativeStrengthIndex::new(period)
        .map_err(|e| StockError::IndicatorError(e.to_string()))?;

    Ok(closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let value = rsi.next(close);
            (i >= period && value.is_finite()).then_some(value)
        })
        .collect())
}

/// One Bollinger band reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Bollinger bands around a simple moving average
pub fn bollinger(closes: &[f64], period: usize, std_dev: f64) -> Result<Vec<Option<Band>>> {
    let mut bb = BollingerBands::new(period, std_dev)
        .map_err(|e| StockError::IndicatorError(e.to_string()))?;

    Ok(closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let out = bb.next(close);
            (i + 1 >= period).then_some(Band {
                upper: out.upper,
                middle: out.average,
                lower: out.lower,
            })
        })
        .collect())
}

/// Direction of a moving-average crossover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CrossoverKind {
    /// Fast average crossed above the slow one
    Golden,
    /// Fast average crossed below the slow one
    Death,
}

impl CrossoverKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Golden => "Golden cross",
            Self::Death => "Death cross",
        }
    }
}

/// A crossover event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossoverSignal {
    pub date: NaiveDate,
    pub kind: CrossoverKind,
    pub close: f64,
}

/// Find the bars where the fast average changes side relative to the slow one.
///
/// Touching without crossing (fast == slow, then back) is not a signal.
pub fn detect_crossovers(
    dates: &[NaiveDate],
    closes: &[f64],
    fast: &[Option<f64>],
    slow: &[Option<f64>],
) -> Vec<CrossoverSignal> {
    let mut signals = Vec::new();
    let mut last_side: Option<bool> = None;

    for (i, (f, s)) in fast.iter().zip(slow).enumerate() {
        let (Some(f), Some(s)) = (f, s) else {
            continue;
        };
        if f == s {
            continue;
        }

        let above = f > s;
        if let Some(was_above) = last_side {
            if above != was_above {
                signals.push(CrossoverSignal {
                    date: dates[i],
                    kind: if above {
                        CrossoverKind::Golden
                    } else {
                        CrossoverKind::Death
                    },
                    close: closes[i],
                });
            }
        }
        last_side = Some(above);
    }

    signals
}

/// RSI reading classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RsiZone {
    Overbought,
    Oversold,
    Neutral,
}

impl RsiZone {
    pub fn classify(rsi: f64) -> Self {
        if rsi >= RSI_OVERBOUGHT {
            Self::Overbought
        } else if rsi <= RSI_OVERSOLD {
            Self::Oversold
        } else {
            Self::Neutral
        }
    }

    pub fn interpretation(self) -> &'static str {
        match self {
            Self::Overbought => "Overbought - potential sell signal",
            Self::Oversold => "Oversold - potential buy signal",
            Self::Neutral => "Neutral",
        }
    }
}
