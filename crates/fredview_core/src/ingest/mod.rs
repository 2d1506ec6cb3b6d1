//! Load half of observation ingestion.
//!
//! # Responsibility
//! - Decode upstream `series/observations` response bodies.
//! - Load one decoded batch per series with full-replace semantics.
//!
//! # Invariants
//! - Loading the same batch twice leaves the store unchanged (idempotent).
//! - A batch never merges with previously stored rows of its series.

pub mod fred_payload;

pub use fred_payload::{
    load_series_payload, parse_observations_payload, IngestError, IngestResult,
};
