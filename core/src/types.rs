//! Shared primitive types used across the entire dashboard core.

use serde::{Deserialize, Serialize};

/// Position of a point inside a generated series. Zero-based, chronological.
pub type PointIndex = usize;

/// A stable identifier for any displayable record (risk, event, alert).
pub type RecordId = String;

/// The name of a field on a `Record`.
pub type FieldName = String;

/// Banding of a 0-100 composite risk score, as shown on the overview gauge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 80.0 => Self::Critical,
            s if s >= 60.0 => Self::High,
            s if s >= 40.0 => Self::Medium,
            _              => Self::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low      => "Low",
            Self::Medium   => "Medium",
            Self::High     => "High",
            Self::Critical => "Critical",
        }
    }
}
