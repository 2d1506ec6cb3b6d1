//! Browse use-case service.
//!
//! # Responsibility
//! - Run one pipeline pass: cached fetch, per-series transform, optional
//!   formula combination.
//! - Emit presentation-ready labeled series and a flattened table.
//!
//! # Invariants
//! - An empty selection yields an empty output without touching the store.
//! - Output series follow selection order; the combined series comes last.
//! - The combiner only runs when a formula and a second series are both set.

use crate::analysis::formula::{combine, COMBINED_LABEL};
use crate::analysis::transform::transform;
use crate::cache::query_cache::{QueryCache, SelectionKey};
use crate::model::observation::{DataPoint, Series, SeriesMap};
use crate::model::view::{TransformKind, ViewSelection};
use crate::repo::observation_repo::{ObservationStore, RepoResult};
use chrono::NaiveDate;
use log::debug;
use std::collections::BTreeSet;

/// One chart-ready series with its display label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSeries {
    /// Series identifier, or [`COMBINED_LABEL`] for a formula result.
    pub label: String,
    pub points: Vec<DataPoint>,
}

/// Flattened `(date, value, series_id)` row for tabular display/export.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub date: NaiveDate,
    pub value: f64,
    pub series_id: String,
}

/// Result of one browse pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrowseOutput {
    pub series: Vec<LabeledSeries>,
}

impl BrowseOutput {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Returns the series with `label`, if present.
    pub fn get(&self, label: &str) -> Option<&LabeledSeries> {
        self.series.iter().find(|series| series.label == label)
    }

    /// Flattens every series into rows ordered by date, then label.
    pub fn table_rows(&self) -> Vec<TableRow> {
        let mut rows: Vec<TableRow> = self
            .series
            .iter()
            .flat_map(|series| {
                series.points.iter().map(|point| TableRow {
                    date: point.date,
                    value: point.value,
                    series_id: series.label.clone(),
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.series_id.cmp(&b.series_id))
        });
        rows
    }
}

/// Pipeline service owning the query cache in front of a store.
pub struct BrowseService<S: ObservationStore> {
    cache: QueryCache<S>,
}

impl<S: ObservationStore> BrowseService<S> {
    pub fn new(store: S) -> Self {
        Self {
            cache: QueryCache::new(store),
        }
    }

    /// Runs fetch, transform and optional combine for `selection`.
    ///
    /// # Contract
    /// - Blank and repeated identifiers in the selection are ignored.
    /// - The second series is fetched with the selection but only shown
    ///   through the combined series.
    /// - The formula's left operand is the first selected series.
    pub fn browse(&mut self, selection: &ViewSelection) -> RepoResult<BrowseOutput> {
        let selected = normalize_selection(&selection.selected_series);
        if selected.is_empty() {
            return Ok(BrowseOutput::default());
        }

        let second = selection
            .second_series
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty());

        let mut key: SelectionKey = selected.iter().cloned().collect();
        if let Some(second) = second {
            key.insert(second.to_string());
        }
        let fetched = self.cache.fetch(&key)?;

        let mut output = BrowseOutput::default();
        let mut first: Option<Series> = None;
        for series_id in &selected {
            let transformed = transform_fetched(&fetched, series_id, selection.transform);
            output.series.push(LabeledSeries {
                label: series_id.clone(),
                points: transformed.points(),
            });
            if first.is_none() {
                first = Some(transformed);
            }
        }

        if let (Some(op), Some(second), Some(left)) =
            (selection.formula.combine_op(), second, first)
        {
            let right = transform_fetched(&fetched, second, selection.transform);
            output.series.push(LabeledSeries {
                label: COMBINED_LABEL.to_string(),
                points: combine(&left, &right, op),
            });
        }

        debug!(
            "event=browse module=service status=ok selected={} transform={} formula={} output_series={}",
            selected.len(),
            selection.transform,
            selection.formula,
            output.series.len()
        );
        Ok(output)
    }

    /// Lists identifiers available for selection. Not cached.
    pub fn list_series_ids(&self) -> RepoResult<Vec<String>> {
        self.cache.store().list_series_ids()
    }

    /// Drops cached fetch results, e.g. after an ingestion load.
    pub fn invalidate_cache(&mut self) {
        self.cache.invalidate();
    }

    pub fn cache(&self) -> &QueryCache<S> {
        &self.cache
    }
}

fn transform_fetched(fetched: &SeriesMap, series_id: &str, kind: TransformKind) -> Series {
    match fetched.get(series_id) {
        Some(series) => transform(series, kind),
        None => Series::empty(series_id),
    }
}

/// Trims identifiers, drops blanks and keeps the first occurrence of each.
fn normalize_selection(series_ids: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    series_ids
        .iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .filter(|id| seen.insert(id.to_string()))
        .map(str::to_string)
        .collect()
}
