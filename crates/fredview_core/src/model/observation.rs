//! Observation and series model.
//!
//! # Responsibility
//! - Represent stored observations after numeric coercion.
//! - Provide the `(date, value)` point shape emitted by analysis code.
//!
//! # Invariants
//! - `Series::observations` is sorted strictly ascending by date.
//! - Missing values are `None`, never NaN.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-identifier fetch result, keyed by `series_id`.
pub type SeriesMap = BTreeMap<String, Series>;

/// One dated value of a series. `value` is `None` when the stored value was
/// missing or not numeric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

impl Observation {
    pub fn new(date: NaiveDate, value: Option<f64>) -> Self {
        Self { date, value }
    }
}

/// Materialized series for one identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub series_id: String,
    pub observations: Vec<Observation>,
}

impl Series {
    /// Creates an empty series for `series_id`.
    pub fn empty(series_id: impl Into<String>) -> Self {
        Self {
            series_id: series_id.into(),
            observations: Vec::new(),
        }
    }

    /// Builds a series from unordered observations.
    ///
    /// Observations are sorted by date; when a date repeats, the later entry
    /// in `observations` wins.
    pub fn from_unordered(series_id: impl Into<String>, observations: Vec<Observation>) -> Self {
        let by_date: BTreeMap<NaiveDate, Option<f64>> = observations
            .into_iter()
            .map(|observation| (observation.date, observation.value))
            .collect();
        Self {
            series_id: series_id.into(),
            observations: by_date
                .into_iter()
                .map(|(date, value)| Observation { date, value })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Returns present values as points, skipping missing ones.
    pub fn points(&self) -> Vec<DataPoint> {
        self.observations
            .iter()
            .filter_map(|observation| {
                observation
                    .value
                    .map(|value| DataPoint::new(observation.date, value))
            })
            .collect()
    }
}

/// Analysis-ready `(date, value)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl DataPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Coerces textual input to a number.
///
/// Surrounding whitespace is ignored. Empty text, the upstream missing marker
/// `"."` and anything else that does not parse to a finite number map to
/// `None`.
pub fn coerce_numeric(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}
