//! Observation store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Read observations for a set of series identifiers, date-ordered.
//! - Replace one series' rows wholesale for ingestion loads.
//!
//! # Invariants
//! - Every requested identifier is present in a fetch result, possibly empty.
//! - Fetched series are strictly ascending by date; repeated dates collapse to
//!   the last stored row.
//! - Non-numeric stored values become missing; unparsable dates are rejected.

use crate::db::DbError;
use crate::model::observation::{coerce_numeric, Observation, Series, SeriesMap};
use chrono::NaiveDate;
use log::{debug, info};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Storage date format for `fred_data.date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const OBSERVATION_SELECT_SQL: &str = "SELECT
    series_id,
    date,
    value
FROM fred_data";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for observation reads and loads.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Persisted state that cannot be interpreted (e.g. a malformed date).
    InvalidData(String),
    /// Blank series identifier passed to a write path.
    InvalidSeriesId(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted observation: {message}"),
            Self::InvalidSeriesId(value) => write!(f, "invalid series id `{value}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
            Self::InvalidSeriesId(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Observation as delivered by an upstream batch, value still textual.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawObservation {
    pub date: NaiveDate,
    pub value: String,
}

/// Read access to stored observations.
pub trait ObservationStore {
    /// Returns one series per requested identifier.
    ///
    /// An empty `series_ids` set returns an empty map without querying.
    fn fetch(&self, series_ids: &BTreeSet<String>) -> RepoResult<SeriesMap>;

    /// Returns distinct stored identifiers, ascending.
    fn list_series_ids(&self) -> RepoResult<Vec<String>>;
}

/// Write access used by ingestion.
pub trait ObservationWriter {
    /// Replaces every stored row of `series_id` with `rows`.
    ///
    /// Returns the number of rows stored for the series afterwards. Repeated
    /// dates within `rows` collapse to the last one.
    fn replace_series(&mut self, series_id: &str, rows: &[RawObservation]) -> RepoResult<usize>;
}

/// SQLite-backed observation store over a borrowed connection.
pub struct SqliteObservationStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteObservationStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ObservationStore for SqliteObservationStore<'_> {
    fn fetch(&self, series_ids: &BTreeSet<String>) -> RepoResult<SeriesMap> {
        if series_ids.is_empty() {
            return Ok(SeriesMap::new());
        }

        let started_at = Instant::now();
        let placeholders = vec!["?"; series_ids.len()].join(", ");
        let sql = format!(
            "{OBSERVATION_SELECT_SQL}
             WHERE series_id IN ({placeholders})
             ORDER BY series_id ASC, date ASC, rowid ASC;"
        );

        let mut grouped: BTreeMap<String, Vec<Observation>> = series_ids
            .iter()
            .map(|id| (id.clone(), Vec::new()))
            .collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(series_ids.iter()))?;
        let mut row_count = 0usize;
        while let Some(row) = rows.next()? {
            let (series_id, observation) = parse_observation_row(row)?;
            row_count += 1;
            if let Some(observations) = grouped.get_mut(&series_id) {
                observations.push(observation);
            }
        }

        debug!(
            "event=observation_fetch module=repo status=ok series_count={} row_count={} duration_ms={}",
            series_ids.len(),
            row_count,
            started_at.elapsed().as_millis()
        );
        Ok(grouped
            .into_iter()
            .map(|(series_id, observations)| {
                let series = Series::from_unordered(series_id.as_str(), observations);
                (series_id, series)
            })
            .collect())
    }

    fn list_series_ids(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT series_id FROM fred_data ORDER BY series_id ASC;")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }
}

/// SQLite-backed writer; needs a mutable connection for its transaction.
pub struct SqliteObservationWriter<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteObservationWriter<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl ObservationWriter for SqliteObservationWriter<'_> {
    fn replace_series(&mut self, series_id: &str, rows: &[RawObservation]) -> RepoResult<usize> {
        let normalized_id = series_id.trim();
        if normalized_id.is_empty() {
            return Err(RepoError::InvalidSeriesId(series_id.to_string()));
        }

        let tx = self.conn.transaction()?;
        let deleted = tx.execute(
            "DELETE FROM fred_data WHERE series_id = ?1;",
            [normalized_id],
        )?;
        let mut written = 0usize;
        {
            let mut insert = tx.prepare(
                "INSERT OR REPLACE INTO fred_data (series_id, date, value)
                 VALUES (?1, ?2, ?3);",
            )?;
            for row in rows {
                insert.execute(params![
                    normalized_id,
                    row.date.format(DATE_FORMAT).to_string(),
                    row.value.as_str(),
                ])?;
                written += 1;
            }
        }
        let stored = count_rows(&tx, normalized_id)?;
        tx.commit()?;

        info!(
            "event=series_replace module=repo status=ok series_id={} deleted={} written={} stored={}",
            normalized_id, deleted, written, stored
        );
        Ok(stored)
    }
}

fn count_rows(conn: &Connection, series_id: &str) -> RepoResult<usize> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM fred_data WHERE series_id = ?1;",
        [series_id],
        |row| row.get(0),
    )?;
    usize::try_from(count)
        .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
}

fn parse_observation_row(row: &Row<'_>) -> RepoResult<(String, Observation)> {
    let series_id: String = row.get("series_id")?;

    let date_text: String = row.get("date")?;
    let date = parse_stored_date(&date_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid date `{date_text}` for series `{series_id}` in fred_data.date"
        ))
    })?;

    let value = coerce_value(row.get::<_, Value>("value")?);
    Ok((series_id, Observation { date, value }))
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part.
fn parse_stored_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, DATE_FORMAT).ok()
}

fn coerce_value(value: Value) -> Option<f64> {
    match value {
        Value::Null | Value::Blob(_) => None,
        Value::Integer(number) => Some(number as f64),
        Value::Real(number) => Some(number).filter(|value| value.is_finite()),
        Value::Text(text) => coerce_numeric(&text),
    }
}

#[cfg(test)]
mod tests {
    use super::{coerce_value, parse_stored_date};
    use chrono::NaiveDate;
    use rusqlite::types::Value;

    #[test]
    fn parse_stored_date_accepts_date_and_timestamp_text() {
        let expected = NaiveDate::from_ymd_opt(2020, 2, 1).unwrap();
        assert_eq!(parse_stored_date("2020-02-01"), Some(expected));
        assert_eq!(parse_stored_date("2020-02-01 00:00:00"), Some(expected));
        assert_eq!(parse_stored_date("02/01/2020"), None);
        assert_eq!(parse_stored_date(""), None);
    }

    #[test]
    fn coerce_value_handles_every_storage_class() {
        assert_eq!(coerce_value(Value::Integer(7)), Some(7.0));
        assert_eq!(coerce_value(Value::Real(1.5)), Some(1.5));
        assert_eq!(coerce_value(Value::Text("2.25".to_string())), Some(2.25));
        assert_eq!(coerce_value(Value::Text(".".to_string())), None);
        assert_eq!(coerce_value(Value::Null), None);
        assert_eq!(coerce_value(Value::Blob(vec![1, 2])), None);
    }
}
