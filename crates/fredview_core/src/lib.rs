//! Core data access, analysis and view persistence for FredView.
//! This crate is the single source of truth for series invariants.

pub mod analysis;
pub mod cache;
pub mod db;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod settings;
pub mod views;

pub use analysis::formula::{combine, COMBINED_LABEL};
pub use analysis::transform::{transform, YOY_LAG};
pub use cache::query_cache::{selection_key, QueryCache, SelectionKey};
pub use ingest::{load_series_payload, parse_observations_payload, IngestError, IngestResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError, LoggingStatus};
pub use model::observation::{coerce_numeric, DataPoint, Observation, Series, SeriesMap};
pub use model::view::{
    CombineOp, FormulaKind, Theme, TransformKind, UnknownTagError, ViewConfig, ViewSelection,
};
pub use repo::observation_repo::{
    ObservationStore, ObservationWriter, RawObservation, RepoError, RepoResult,
    SqliteObservationStore, SqliteObservationWriter,
};
pub use service::browse_service::{BrowseOutput, BrowseService, LabeledSeries, TableRow};
pub use settings::AppSettings;
pub use views::{JsonViewConfigStore, ViewConfigMap, ViewConfigStore, ViewError, ViewResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
