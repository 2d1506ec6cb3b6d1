//! Decoder and loader for upstream observation payloads.

use crate::repo::observation_repo::{ObservationWriter, RawObservation, RepoError, DATE_FORMAT};
use chrono::NaiveDate;
use log::info;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type IngestResult<T> = Result<T, IngestError>;

#[derive(Debug)]
pub enum IngestError {
    Json(serde_json::Error),
    /// Body decoded but has no `observations` array.
    MissingObservations,
    InvalidDate {
        index: usize,
        value: String,
    },
    Repo(RepoError),
}

impl Display for IngestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid observations payload: {err}"),
            Self::MissingObservations => {
                write!(f, "observations payload has no `observations` array")
            }
            Self::InvalidDate { index, value } => {
                write!(f, "invalid date `{value}` at observation {index}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for IngestError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::MissingObservations => None,
            Self::InvalidDate { .. } => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<RepoError> for IngestError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

#[derive(Debug, Deserialize)]
struct ObservationsBody {
    observations: Option<Vec<BodyObservation>>,
}

/// One upstream row. Fields beyond `date`/`value` (realtime bounds) are
/// ignored.
#[derive(Debug, Deserialize)]
struct BodyObservation {
    date: String,
    #[serde(default)]
    value: serde_json::Value,
}

/// Decodes a `series/observations` JSON body into raw rows.
///
/// Values are kept as text; numeric coercion happens on read. JSON numbers
/// are rendered to text, JSON `null` becomes an empty value.
pub fn parse_observations_payload(body: &str) -> IngestResult<Vec<RawObservation>> {
    let decoded: ObservationsBody = serde_json::from_str(body)?;
    let observations = decoded
        .observations
        .ok_or(IngestError::MissingObservations)?;

    observations
        .into_iter()
        .enumerate()
        .map(|(index, row)| {
            let date = NaiveDate::parse_from_str(row.date.trim(), DATE_FORMAT).map_err(|_| {
                IngestError::InvalidDate {
                    index,
                    value: row.date.clone(),
                }
            })?;
            let value = match row.value {
                serde_json::Value::String(text) => text,
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            };
            Ok(RawObservation { date, value })
        })
        .collect()
}

/// Decodes `body` and replaces every stored row of `series_id` with it.
///
/// Returns the number of rows stored for the series afterwards.
pub fn load_series_payload<W: ObservationWriter>(
    writer: &mut W,
    series_id: &str,
    body: &str,
) -> IngestResult<usize> {
    let rows = parse_observations_payload(body)?;
    let stored = writer.replace_series(series_id, &rows)?;
    info!(
        "event=ingest_load module=ingest status=ok payload_rows={} stored_rows={}",
        rows.len(),
        stored
    );
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::{parse_observations_payload, IngestError};
    use chrono::NaiveDate;

    #[test]
    fn parses_upstream_body_and_keeps_values_textual() {
        let body = r#"{
            "realtime_start": "2024-01-01",
            "count": 3,
            "observations": [
                {"realtime_start": "2024-01-01", "realtime_end": "2024-01-01", "date": "2020-01-01", "value": "100.5"},
                {"realtime_start": "2024-01-01", "realtime_end": "2024-01-01", "date": "2020-02-01", "value": "."},
                {"date": "2020-03-01", "value": 101}
            ]
        }"#;

        let rows = parse_observations_payload(body).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(rows[0].value, "100.5");
        assert_eq!(rows[1].value, ".");
        assert_eq!(rows[2].value, "101");
    }

    #[test]
    fn missing_observations_array_is_rejected() {
        let err = parse_observations_payload(r#"{"error_code": 400}"#).unwrap_err();
        assert!(matches!(err, IngestError::MissingObservations));
    }

    #[test]
    fn malformed_date_reports_position() {
        let body = r#"{"observations": [
            {"date": "2020-01-01", "value": "1"},
            {"date": "January 2020", "value": "2"}
        ]}"#;
        let err = parse_observations_payload(body).unwrap_err();
        match err {
            IngestError::InvalidDate { index, value } => {
                assert_eq!(index, 1);
                assert_eq!(value, "January 2020");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_json_body_is_a_json_error() {
        let err = parse_observations_payload("<html>").unwrap_err();
        assert!(matches!(err, IngestError::Json(_)));
    }
}
