use chrono::NaiveDate;
use fredview_core::db::{open_db_in_memory, open_db_read_only};
use fredview_core::{
    selection_key, ObservationStore, ObservationWriter, RawObservation, RepoError,
    SqliteObservationStore, SqliteObservationWriter,
};
use rusqlite::{params, Connection};
use std::collections::BTreeSet;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn raw(y: i32, m: u32, value: &str) -> RawObservation {
    RawObservation {
        date: date(y, m, 1),
        value: value.to_string(),
    }
}

fn seeded() -> Connection {
    let mut conn = open_db_in_memory().unwrap();
    {
        let mut writer = SqliteObservationWriter::new(&mut conn);
        writer
            .replace_series(
                "GDP",
                &[raw(2020, 3, "121"), raw(2020, 1, "100"), raw(2020, 2, "110")],
            )
            .unwrap();
        writer
            .replace_series("CPIAUCSL", &[raw(2020, 1, "258.8"), raw(2020, 2, ".")])
            .unwrap();
    }
    conn
}

#[test]
fn fetch_returns_one_sorted_series_per_identifier() {
    let conn = seeded();
    let store = SqliteObservationStore::new(&conn);

    let result = store
        .fetch(&selection_key(["GDP", "CPIAUCSL", "PAYEMS"]))
        .unwrap();

    assert_eq!(result.len(), 3);
    let gdp = &result["GDP"];
    assert_eq!(gdp.series_id, "GDP");
    let dates: Vec<NaiveDate> = gdp.observations.iter().map(|o| o.date).collect();
    assert_eq!(
        dates,
        vec![date(2020, 1, 1), date(2020, 2, 1), date(2020, 3, 1)]
    );
    assert!(dates.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(gdp.observations[0].value, Some(100.0));

    assert!(result["PAYEMS"].is_empty());
    assert_eq!(result["PAYEMS"].series_id, "PAYEMS");
}

#[test]
fn fetch_of_empty_set_is_empty() {
    let conn = seeded();
    let store = SqliteObservationStore::new(&conn);
    assert!(store.fetch(&BTreeSet::new()).unwrap().is_empty());
}

#[test]
fn fetch_coerces_non_numeric_values_to_missing() {
    let conn = seeded();
    let store = SqliteObservationStore::new(&conn);

    let cpi = store
        .fetch(&selection_key(["CPIAUCSL"]))
        .unwrap()
        .remove("CPIAUCSL")
        .unwrap();
    assert_eq!(cpi.len(), 2);
    assert_eq!(cpi.observations[0].value, Some(258.8));
    assert_eq!(cpi.observations[1].value, None);
}

#[test]
fn fetch_accepts_numeric_storage_classes() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO fred_data (series_id, date, value) VALUES (?1, ?2, ?3), (?1, ?4, ?5), (?1, ?6, NULL);",
        params!["FEDFUNDS", "2020-01-01", 1.55_f64, "2020-02-01", 2_i64, "2020-03-01"],
    )
    .unwrap();
    let store = SqliteObservationStore::new(&conn);

    let series = store
        .fetch(&selection_key(["FEDFUNDS"]))
        .unwrap()
        .remove("FEDFUNDS")
        .unwrap();
    let values: Vec<Option<f64>> = series.observations.iter().map(|o| o.value).collect();
    assert_eq!(values, vec![Some(1.55), Some(2.0), None]);
}

#[test]
fn fetch_is_repeatable() {
    let conn = seeded();
    let store = SqliteObservationStore::new(&conn);
    let key = selection_key(["GDP", "CPIAUCSL"]);

    assert_eq!(store.fetch(&key).unwrap(), store.fetch(&key).unwrap());
}

#[test]
fn fetch_collapses_duplicate_dates_from_external_tables() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("external.sqlite3");
    {
        // Table populated by another tool, without the primary key.
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE fred_data (series_id TEXT, date TEXT, value);
             INSERT INTO fred_data VALUES ('GDP', '2020-02-01', '2');
             INSERT INTO fred_data VALUES ('GDP', '2020-01-01', '1');
             INSERT INTO fred_data VALUES ('GDP', '2020-02-01', '20');
             PRAGMA user_version = 1;",
        )
        .unwrap();
    }

    let conn = open_db_read_only(&path).unwrap();
    let store = SqliteObservationStore::new(&conn);
    let gdp = store
        .fetch(&selection_key(["GDP"]))
        .unwrap()
        .remove("GDP")
        .unwrap();

    assert_eq!(gdp.len(), 2);
    assert_eq!(gdp.observations[1].date, date(2020, 2, 1));
    assert_eq!(gdp.observations[1].value, Some(20.0));
}

#[test]
fn fetch_rejects_unparsable_dates() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO fred_data (series_id, date, value) VALUES ('GDP', 'Q1 2020', '1');",
        [],
    )
    .unwrap();
    let store = SqliteObservationStore::new(&conn);

    let err = store.fetch(&selection_key(["GDP"])).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("Q1 2020")));
}

#[test]
fn list_series_ids_is_distinct_and_sorted() {
    let conn = seeded();
    let store = SqliteObservationStore::new(&conn);
    assert_eq!(store.list_series_ids().unwrap(), vec!["CPIAUCSL", "GDP"]);
}
