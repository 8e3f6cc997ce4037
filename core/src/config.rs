use crate::{
    error::{DashError, DashResult},
    filter::SortSpec,
    series::{
        SeriesParams, Timeframe, DEFAULT_ANOMALY_THRESHOLD, DEFAULT_BASE_VALUE, DEFAULT_VOLATILITY,
    },
    types::FieldName,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    pub base_value: f64,
    pub volatility: f64,
    pub anomaly_threshold: f64,
    pub timeframe: Timeframe,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            base_value:        DEFAULT_BASE_VALUE,
            volatility:        DEFAULT_VOLATILITY,
            anomaly_threshold: DEFAULT_ANOMALY_THRESHOLD,
            timeframe:         Timeframe::default(),
        }
    }
}

impl SeriesConfig {
    /// Generator parameters for `timeframe`, falling back to the configured one.
    pub fn params(&self, timeframe: Option<Timeframe>) -> SeriesParams {
        SeriesParams {
            base_value: self.base_value,
            volatility: self.volatility,
            anomaly_threshold: self.anomaly_threshold,
            ..SeriesParams::for_timeframe(timeframe.unwrap_or(self.timeframe))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub seed: u64,
    pub series: SeriesConfig,
    pub risk_search_fields: Vec<FieldName>,
    pub event_search_fields: Vec<FieldName>,
    pub default_sort: SortSpec,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            series: SeriesConfig::default(),
            risk_search_fields: vec!["title".into(), "details".into(), "description".into()],
            event_search_fields: vec!["event".into(), "description".into(), "type".into()],
            default_sort: SortSpec::asc("priority"),
        }
    }
}

impl DashboardConfig {
    /// Load from a JSON file. Missing keys take their defaults.
    /// In tests, use DashboardConfig::default().
    pub fn load(path: impl AsRef<Path>) -> DashResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| DashError::Config {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config = Self::from_json(&content).map_err(|e| DashError::Config {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        log::info!("config: loaded {} (seed={})", path.display(), config.seed);
        Ok(config)
    }

    pub fn from_json(content: &str) -> DashResult<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.series.params(None).validate()?;
        Ok(config)
    }
}
