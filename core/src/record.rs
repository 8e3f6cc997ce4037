//! Generic displayable records: one risk, one timeline event, one alert.
//!
//! Values carry their kind so sorting can use the natural order of each
//! kind. Across kinds the order is number < date < text.

use crate::types::{FieldName, RecordId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A scalar field value. Deserializes numbers as `Number`, ISO
/// `YYYY-MM-DD` strings as `Date` and any other string as `Text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

impl FieldValue {
    /// Parse a date-like string, keeping it as text when it is not a date.
    pub fn infer(raw: &str) -> Self {
        match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
            Ok(date) => Self::Date(date),
            Err(_)   => Self::Text(raw.to_string()),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Self::Number(_) => 0,
            Self::Date(_)   => 1,
            Self::Text(_)   => 2,
        }
    }

    /// Total order: natural within a kind, kind rank across kinds.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Date(a), Self::Date(b))     => a.cmp(b),
            (Self::Text(a), Self::Text(b))     => a.cmp(b),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Case-sensitive equality against the value's display form.
    pub fn matches_exact(&self, expected: &str) -> bool {
        match self {
            Self::Text(s) => s == expected,
            other => other.to_string() == expected,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Date(d)   => write!(f, "{}", d.format(DATE_FORMAT)),
            Self::Text(s)   => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: BTreeMap<FieldName, FieldValue>,
}

impl Record {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    /// Store a `YYYY-MM-DD` string as a date. Anything unparseable is kept as text.
    pub fn with_date(mut self, name: &str, raw: &str) -> Self {
        let value = FieldValue::infer(raw);
        if value.as_date().is_none() {
            log::debug!("record {}: field '{name}' value '{raw}' is not a date, kept as text", self.id);
        }
        self.fields.insert(name.to_string(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    pub fn has(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }
}
