//! Synthetic transaction-volume series with z-score anomaly flagging.
//!
//! Generation order (fixed, so scripted draws line up in tests):
//!   1. One noise draw per point: r_i = 1 + (u - 0.5) * volatility.
//!   2. One index draw selecting the forced outlier.
//!   3. One coin draw: above one half spikes (x2.5), otherwise dips (x0.3).
//!
//! The forced outlier is NOT guaranteed to cross the threshold. With zero
//! volatility a lone outlier among n points sits at exactly sqrt(n - 1)
//! standard deviations, so short series can stay unflagged.

use crate::{
    clock::Clock,
    error::{DashError, DashResult},
    rng::RandomSource,
    types::PointIndex,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// ── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_LENGTH: usize = 24; // hourly view
pub const DEFAULT_BASE_VALUE: f64 = 5000.0;
pub const DEFAULT_VOLATILITY: f64 = 0.2;
pub const DEFAULT_ANOMALY_THRESHOLD: f64 = 2.5;

const OUTLIER_SPIKE: f64 = 2.5;
const OUTLIER_DIP: f64 = 0.3;

/// Upper bound on generated points. Keeps label arithmetic in range.
pub const MAX_LENGTH: usize = 100_000;

/// Longest window a series may cover, oldest label to newest: one century.
pub const MAX_SPAN_DAYS: i64 = 36_525;

/// UTC en-US label, e.g. `01/20/2024, 02:00 PM`.
const LABEL_FORMAT: &str = "%m/%d/%Y, %I:%M %p";

// ── Timeframe ────────────────────────────────────────────────────────────────

/// Window presets offered by the transaction pattern panel.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Timeframe {
    #[default]
    #[serde(rename = "24h")]
    Last24Hours,
    #[serde(rename = "7d")]
    Last7Days,
    #[serde(rename = "30d")]
    Last30Days,
}

impl Timeframe {
    pub fn length(&self) -> usize {
        match self {
            Self::Last24Hours => 24,
            Self::Last7Days   => 7,
            Self::Last30Days  => 30,
        }
    }

    pub fn step(&self) -> Duration {
        match self {
            Self::Last24Hours => Duration::hours(1),
            Self::Last7Days   => Duration::days(1),
            Self::Last30Days  => Duration::days(1),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Last24Hours => "24h",
            Self::Last7Days   => "7d",
            Self::Last30Days  => "30d",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Timeframe {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "24h" => Ok(Self::Last24Hours),
            "7d"  => Ok(Self::Last7Days),
            "30d" => Ok(Self::Last30Days),
            other => Err(DashError::invalid(
                "timeframe",
                format!("unknown timeframe '{other}' (expected 24h, 7d or 30d)"),
            )),
        }
    }
}

// ── Data Structures ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesParams {
    pub length: usize,
    pub base_value: f64,
    /// Fractional noise band in [0, 1).
    pub volatility: f64,
    /// z-score cutoff; a point is anomalous when strictly above it.
    pub anomaly_threshold: f64,
    /// Spacing between consecutive labels.
    pub step: Duration,
}

impl Default for SeriesParams {
    fn default() -> Self {
        Self {
            length:            DEFAULT_LENGTH,
            base_value:        DEFAULT_BASE_VALUE,
            volatility:        DEFAULT_VOLATILITY,
            anomaly_threshold: DEFAULT_ANOMALY_THRESHOLD,
            step:              Duration::hours(1),
        }
    }
}

impl SeriesParams {
    pub fn new(length: usize, base_value: f64, volatility: f64, anomaly_threshold: f64) -> Self {
        Self {
            length,
            base_value,
            volatility,
            anomaly_threshold,
            ..Self::default()
        }
    }

    pub fn for_timeframe(timeframe: Timeframe) -> Self {
        Self {
            length: timeframe.length(),
            step: timeframe.step(),
            ..Self::default()
        }
    }

    pub fn with_threshold(mut self, anomaly_threshold: f64) -> Self {
        self.anomaly_threshold = anomaly_threshold;
        self
    }

    pub fn validate(&self) -> DashResult<()> {
        if self.length == 0 {
            return Err(DashError::invalid("length", "must be > 0"));
        }
        if self.length > MAX_LENGTH {
            return Err(DashError::invalid(
                "length",
                format!("{} exceeds the maximum of {MAX_LENGTH}", self.length),
            ));
        }
        if !self.base_value.is_finite() || self.base_value <= 0.0 {
            return Err(DashError::invalid(
                "base_value",
                format!("must be a finite value > 0, got {}", self.base_value),
            ));
        }
        if !self.volatility.is_finite() || !(0.0..1.0).contains(&self.volatility) {
            return Err(DashError::invalid(
                "volatility",
                format!("must lie in [0, 1), got {}", self.volatility),
            ));
        }
        if !self.anomaly_threshold.is_finite() || self.anomaly_threshold <= 0.0 {
            return Err(DashError::invalid(
                "anomaly_threshold",
                format!("must be a finite value > 0, got {}", self.anomaly_threshold),
            ));
        }
        if self.step <= Duration::zero() {
            return Err(DashError::invalid("step", "must be a positive duration"));
        }
        let span = i32::try_from(self.length - 1)
            .ok()
            .and_then(|k| self.step.checked_mul(k));
        match span {
            Some(span) if span <= Duration::days(MAX_SPAN_DAYS) => {}
            _ => {
                return Err(DashError::invalid(
                    "step",
                    format!(
                        "{} steps of {} exceed the {MAX_SPAN_DAYS}-day window",
                        self.length - 1,
                        self.step
                    ),
                ))
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub index: PointIndex,
    pub label: String,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Population statistics of a value sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub total: f64,
}

impl SeriesStats {
    /// Returns None for an empty slice.
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let count = values.len();
        let total: f64 = values.iter().sum();
        let mean = total / count as f64;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        Some(Self {
            count,
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
            total,
        })
    }

    /// Absolute z-score. Zero when the series has no spread.
    pub fn z_score(&self, value: f64) -> f64 {
        if self.std_dev == 0.0 {
            return 0.0;
        }
        ((value - self.mean) / self.std_dev).abs()
    }
}

/// Indices whose absolute z-score is strictly above `threshold`.
pub fn detect_anomalies(values: &[f64], threshold: f64) -> BTreeSet<PointIndex> {
    let Some(stats) = SeriesStats::compute(values) else {
        return BTreeSet::new();
    };
    values
        .iter()
        .enumerate()
        .filter(|&(_, &v)| stats.z_score(v) > threshold)
        .map(|(i, _)| i)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSeries {
    pub points: Vec<SeriesPoint>,
    pub anomaly_indices: BTreeSet<PointIndex>,
    pub stats: SeriesStats,
    pub threshold: f64,
    /// Where the forced outlier was injected. It may or may not be flagged.
    pub outlier_index: PointIndex,
    pub outlier_multiplier: f64,
}

impl GeneratedSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_anomaly(&self, index: PointIndex) -> bool {
        self.anomaly_indices.contains(&index)
    }

    pub fn z_score(&self, index: PointIndex) -> Option<f64> {
        self.points.get(index).map(|p| self.stats.z_score(p.value))
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn anomalies(&self) -> impl Iterator<Item = &SeriesPoint> + '_ {
        self.anomaly_indices.iter().filter_map(|&i| self.points.get(i))
    }
}

// ── Generator ────────────────────────────────────────────────────────────────

pub struct SeriesGenerator {
    params: SeriesParams,
}

impl SeriesGenerator {
    /// Rejects invalid parameters up front; generation itself cannot fail.
    pub fn new(params: SeriesParams) -> DashResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &SeriesParams {
        &self.params
    }

    pub fn generate<R, C>(&self, rng: &mut R, clock: &C) -> GeneratedSeries
    where
        R: RandomSource + ?Sized,
        C: Clock + ?Sized,
    {
        let p = &self.params;

        let mut values: Vec<f64> = (0..p.length)
            .map(|_| {
                let factor = 1.0 + (rng.next_f64() - 0.5) * p.volatility;
                p.base_value * factor
            })
            .collect();

        let outlier_index = rng.next_index(p.length);
        let outlier_multiplier = if rng.coin() { OUTLIER_SPIKE } else { OUTLIER_DIP };
        values[outlier_index] *= outlier_multiplier;

        let stats = SeriesStats::compute(&values).unwrap_or(SeriesStats {
            count: 0,
            mean: 0.0,
            std_dev: 0.0,
            min: 0.0,
            max: 0.0,
            total: 0.0,
        });
        let anomaly_indices = detect_anomalies(&values, p.anomaly_threshold);

        let now = clock.now();
        let points = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                // Oldest first: index 0 lies (length - 1) steps before now.
                // Saturates at the earliest representable instant.
                let steps_back = (p.length - 1 - index) as i32;
                let timestamp = p
                    .step
                    .checked_mul(steps_back)
                    .and_then(|back| now.checked_sub_signed(back))
                    .unwrap_or(DateTime::<Utc>::MIN_UTC);
                SeriesPoint {
                    index,
                    label: timestamp.format(LABEL_FORMAT).to_string(),
                    timestamp,
                    value,
                }
            })
            .collect();

        log::debug!(
            "series: generated {} points, outlier at {} (x{}), {} anomalies, mean={:.2} std_dev={:.2}",
            p.length,
            outlier_index,
            outlier_multiplier,
            anomaly_indices.len(),
            stats.mean,
            stats.std_dev,
        );

        GeneratedSeries {
            points,
            anomaly_indices,
            stats,
            threshold: p.anomaly_threshold,
            outlier_index,
            outlier_multiplier,
        }
    }
}

/// Validate and generate in one call.
pub fn generate_series<R, C>(params: SeriesParams, rng: &mut R, clock: &C) -> DashResult<GeneratedSeries>
where
    R: RandomSource + ?Sized,
    C: Clock + ?Sized,
{
    Ok(SeriesGenerator::new(params)?.generate(rng, clock))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_use_population_std_dev() {
        let stats = SeriesStats::compute(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.std_dev, 2.0);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
        assert_eq!(stats.total, 40.0);
    }

    #[test]
    fn flat_series_has_zero_z_scores() {
        let stats = SeriesStats::compute(&[3.0; 6]).unwrap();
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.z_score(3.0), 0.0);
        assert_eq!(stats.z_score(1_000.0), 0.0);
        assert!(detect_anomalies(&[3.0; 6], 0.5).is_empty());
    }

    #[test]
    fn empty_values_have_no_stats() {
        assert!(SeriesStats::compute(&[]).is_none());
        assert!(detect_anomalies(&[], 2.5).is_empty());
    }

    #[test]
    fn threshold_is_strict() {
        // Lone outlier among five equal points sits at exactly z = 2.
        let values = [100.0, 100.0, 250.0, 100.0, 100.0];
        assert!(detect_anomalies(&values, 2.0).is_empty());
        assert_eq!(detect_anomalies(&values, 1.99), BTreeSet::from([2]));
    }

    #[test]
    fn timeframe_round_trips_through_str() {
        for tf in [Timeframe::Last24Hours, Timeframe::Last7Days, Timeframe::Last30Days] {
            assert_eq!(tf.label().parse::<Timeframe>().unwrap(), tf);
        }
        assert!("1y".parse::<Timeframe>().is_err());
    }

    #[test]
    fn validation_rejects_bad_parameters() {
        let cases = [
            SeriesParams { length: 0, ..SeriesParams::default() },
            SeriesParams { base_value: 0.0, ..SeriesParams::default() },
            SeriesParams { base_value: -5.0, ..SeriesParams::default() },
            SeriesParams { volatility: -0.1, ..SeriesParams::default() },
            SeriesParams { volatility: 1.0, ..SeriesParams::default() },
            SeriesParams { volatility: f64::NAN, ..SeriesParams::default() },
            SeriesParams { anomaly_threshold: 0.0, ..SeriesParams::default() },
            SeriesParams { step: Duration::zero(), ..SeriesParams::default() },
            SeriesParams { length: MAX_LENGTH + 1, ..SeriesParams::default() },
            SeriesParams { step: Duration::days(MAX_SPAN_DAYS), ..SeriesParams::default() },
        ];
        for params in cases {
            assert!(
                matches!(params.validate(), Err(DashError::InvalidParameter { .. })),
                "expected rejection for {params:?}"
            );
        }
        assert!(SeriesParams::default().validate().is_ok());
    }
}
