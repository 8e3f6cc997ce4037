//! Multi-criteria filtering and stable sorting over record collections.
//!
//! RULES:
//!   - Free-text search is a case-insensitive substring match over the
//!     display form of the filter's designated search fields, whatever
//!     kind of value they hold.
//!   - Categorical filters are exact, case-sensitive matches. The sentinel
//!     "all" (any ASCII case) disables a filter.
//!   - Sorting is stable. Records lacking the sort key go last in both
//!     directions.
//!   - Source collections are never mutated.

use crate::{
    error::{DashError, DashResult},
    record::Record,
    types::FieldName,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Filter value meaning "no constraint on this field".
pub const ALL: &str = "all";

fn is_all(value: &str) -> bool {
    value.eq_ignore_ascii_case(ALL)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub search_term: String,
    pub field_filters: BTreeMap<FieldName, String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_filter(mut self, field: impl Into<FieldName>, value: impl Into<String>) -> Self {
        self.field_filters.insert(field.into(), value.into());
        self
    }

    /// True when no record can be excluded by these criteria.
    pub fn is_passthrough(&self) -> bool {
        self.search_term.is_empty() && self.field_filters.values().all(|v| is_all(v))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

impl SortDirection {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending  => ordering,
            Self::Descending => ordering.reverse(),
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending  => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: FieldName,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(key: impl Into<FieldName>) -> Self {
        Self { key: key.into(), direction: SortDirection::Ascending }
    }

    pub fn desc(key: impl Into<FieldName>) -> Self {
        Self { key: key.into(), direction: SortDirection::Descending }
    }

    /// Column-header click: the same key flips direction, a new key starts ascending.
    pub fn clicked(&self, key: &str) -> Self {
        if self.key == key {
            Self { key: self.key.clone(), direction: self.direction.toggled() }
        } else {
            Self::asc(key)
        }
    }
}

/// Compare two records on `sort.key`. Missing values sort after present ones
/// regardless of direction.
pub fn compare_by_key(a: &Record, b: &Record, sort: &SortSpec) -> Ordering {
    match (a.get(&sort.key), b.get(&sort.key)) {
        (Some(x), Some(y)) => sort.direction.apply(x.compare(y)),
        (Some(_), None)    => Ordering::Less,
        (None, Some(_))    => Ordering::Greater,
        (None, None)       => Ordering::Equal,
    }
}

/// Stable in-place sort. When no record carries the key the slice is left
/// untouched and `InvalidSortKey` is returned.
pub fn sort_records(records: &mut [Record], sort: &SortSpec) -> DashResult<()> {
    if !records.is_empty() && !records.iter().any(|r| r.has(&sort.key)) {
        return Err(DashError::InvalidSortKey { key: sort.key.clone() });
    }
    records.sort_by(|a, b| compare_by_key(a, b, sort));
    Ok(())
}

/// A filter bound to the set of fields its view treats as free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFilter {
    search_fields: Vec<FieldName>,
}

impl RecordFilter {
    pub fn new<I, S>(search_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<FieldName>,
    {
        Self {
            search_fields: search_fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Risk list and risk register views.
    pub fn risk_register() -> Self {
        Self::new(["title", "details", "description"])
    }

    /// Events timeline view.
    pub fn event_timeline() -> Self {
        Self::new(["event", "description", "type"])
    }

    pub fn search_fields(&self) -> &[FieldName] {
        &self.search_fields
    }

    pub fn matches(&self, record: &Record, criteria: &FilterCriteria) -> bool {
        self.matches_search(record, &criteria.search_term)
            && criteria
                .field_filters
                .iter()
                .all(|(field, expected)| {
                    is_all(expected)
                        || record.get(field).is_some_and(|v| v.matches_exact(expected))
                })
    }

    fn matches_search(&self, record: &Record, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let needle = term.to_lowercase();
        self.search_fields
            .iter()
            .filter_map(|field| record.get(field))
            .any(|value| value.to_string().to_lowercase().contains(&needle))
    }

    /// Matching records in input order.
    pub fn filter(&self, records: &[Record], criteria: &FilterCriteria) -> Vec<Record> {
        records
            .iter()
            .filter(|r| self.matches(r, criteria))
            .cloned()
            .collect()
    }

    /// Filter then sort. An unresolvable sort key is logged and the
    /// filtered records keep their input order.
    pub fn apply(&self, records: &[Record], criteria: &FilterCriteria, sort: &SortSpec) -> Vec<Record> {
        let mut kept = self.filter(records, criteria);
        if let Err(e) = sort_records(&mut kept, sort) {
            log::warn!("filter: {e}; keeping input order");
        }
        log::debug!(
            "filter: kept {}/{} records, sorted by {} {:?}",
            kept.len(),
            records.len(),
            sort.key,
            sort.direction,
        );
        kept
    }
}
