//! Memoization of observation store lookups.
//!
//! # Responsibility
//! - Avoid repeated storage scans for an unchanged series selection.
//!
//! # Invariants
//! - Keys are canonical: order and duplicates in a request do not matter.
//! - Failed lookups are never cached.

pub mod query_cache;
