//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the observation read contract consumed by the browse pipeline.
//! - Isolate SQLite query details from caching and analysis code.
//!
//! # Invariants
//! - A series without rows is an empty result, never an error.
//! - Stores are handed an explicit connection; there is no ambient handle.

pub mod observation_repo;
