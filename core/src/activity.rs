//! Transaction statistics panel: bucketed activity counts per period.
//!
//! Each bucket takes two draws, transactions then volume, each
//! `floor(u * max)` for the period's caps.

use crate::{rng::RandomSource, series::Timeframe};
use serde::{Deserialize, Serialize};

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityPeriod {
    Daily,   // 24 hourly buckets
    Weekly,  // 7 day buckets
    Monthly, // 4 week buckets
}

impl ActivityPeriod {
    pub fn bucket_labels(&self) -> Vec<String> {
        match self {
            Self::Daily   => (0..24).map(|h| format!("{h}:00")).collect(),
            Self::Weekly  => WEEKDAYS.iter().map(|d| d.to_string()).collect(),
            Self::Monthly => (1..=4).map(|w| format!("Week {w}")).collect(),
        }
    }

    /// (max transactions, max volume) per bucket.
    fn caps(&self) -> (u64, u64) {
        match self {
            Self::Daily   => (20, 5_000),
            Self::Weekly  => (300, 60_000),
            Self::Monthly => (2_000, 400_000),
        }
    }
}

impl From<Timeframe> for ActivityPeriod {
    fn from(tf: Timeframe) -> Self {
        match tf {
            Timeframe::Last24Hours => Self::Daily,
            Timeframe::Last7Days   => Self::Weekly,
            Timeframe::Last30Days  => Self::Monthly,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityBucket {
    pub label: String,
    pub transactions: u64,
    pub volume: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityBreakdown {
    pub period: ActivityPeriod,
    pub buckets: Vec<ActivityBucket>,
    pub total_transactions: u64,
    pub total_volume: u64,
}

impl ActivityBreakdown {
    pub fn generate<R: RandomSource + ?Sized>(period: ActivityPeriod, rng: &mut R) -> Self {
        let (max_txns, max_volume) = period.caps();
        let buckets: Vec<ActivityBucket> = period
            .bucket_labels()
            .into_iter()
            .map(|label| ActivityBucket {
                label,
                transactions: (rng.next_f64() * max_txns as f64).floor() as u64,
                volume: (rng.next_f64() * max_volume as f64).floor() as u64,
            })
            .collect();

        Self {
            period,
            total_transactions: buckets.iter().map(|b| b.transactions).sum(),
            total_volume: buckets.iter().map(|b| b.volume).sum(),
            buckets,
        }
    }

    /// The busiest bucket by transaction count; earliest wins ties.
    pub fn peak(&self) -> Option<&ActivityBucket> {
        self.buckets
            .iter()
            .reduce(|best, b| if b.transactions > best.transactions { b } else { best })
    }
}
