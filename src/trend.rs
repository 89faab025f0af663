//! Trend classification
//!
//! Every domain analyzer reduces its history to an ordered series of scalars
//! and asks this module which way it is heading. Two encodings are supported:
//! a plain first-half/second-half split and a recency window (last N records
//! against everything before them).

use crate::types::TrendDirection;
use serde::{Deserialize, Serialize};

/// Default recency window used by the domain summarizer
pub const DEFAULT_RECENCY_WINDOW: usize = 5;

/// Whether a higher raw value means better or worse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Ability/quality metrics: sensitivity, taste score, acuity
    HigherIsBetter,
    /// Burden metrics: stress, hearing threshold, cholesterol
    LowerIsBetter,
}

/// Per-call-site classification parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendConfig {
    /// Absolute mean difference below which the series is stable
    pub deadband: f64,
    pub polarity: Polarity,
    /// Width of the band above the deadband in which an inconsistent series
    /// is reported as fluctuating. `None` disables the four-way result.
    pub fluctuation_band: Option<f64>,
}

impl TrendConfig {
    pub const fn new(deadband: f64, polarity: Polarity) -> Self {
        Self {
            deadband,
            polarity,
            fluctuation_band: None,
        }
    }

    pub const fn with_fluctuation_band(mut self, band: f64) -> Self {
        self.fluctuation_band = Some(band);
        self
    }
}

/// Classify a series by comparing the means of its two halves.
///
/// For odd lengths the middle element lands in the second half.
pub fn classify(values: &[f64], config: &TrendConfig) -> TrendDirection {
    if values.len() < 2 {
        return TrendDirection::Stable;
    }

    let difference = half_split_difference(values);
    let endpoint_change = values[values.len() - 1] - values[0];

    decide(difference, endpoint_change, config)
}

/// Classify a series by comparing the last `window` values against the
/// values before them.
///
/// `older` is `prefix(max(1, n - window))`, so short series compare their
/// first value against the whole series.
pub fn classify_windowed(values: &[f64], window: usize, config: &TrendConfig) -> TrendDirection {
    if values.len() < 2 {
        return TrendDirection::Stable;
    }

    let window = window.max(1);
    let n = values.len();
    let recent = &values[n.saturating_sub(window)..];
    let older = &values[..n.saturating_sub(window).max(1)];

    let difference = mean(recent) - mean(older);
    let half_split = half_split_difference(values);

    decide(difference, half_split, config)
}

/// Arithmetic mean, 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn half_split_difference(values: &[f64]) -> f64 {
    let half = values.len() / 2;
    mean(&values[half..]) - mean(&values[..half])
}

/// Shared deadband/polarity rule. `cross_check` is the change measured by the
/// other encoding; a sign disagreement close to the deadband is fluctuation.
fn decide(difference: f64, cross_check: f64, config: &TrendConfig) -> TrendDirection {
    let magnitude = difference.abs();
    if magnitude < config.deadband {
        return TrendDirection::Stable;
    }

    if let Some(band) = config.fluctuation_band {
        let near_deadband = magnitude < config.deadband + band;
        let signs_agree = difference.signum() == cross_check.signum() && cross_check != 0.0;
        if near_deadband && !signs_agree {
            return TrendDirection::Fluctuating;
        }
    }

    let improving = match config.polarity {
        Polarity::HigherIsBetter => difference > 0.0,
        Polarity::LowerIsBetter => difference < 0.0,
    };

    if improving {
        TrendDirection::Improving
    } else {
        TrendDirection::Declining
    }
}
