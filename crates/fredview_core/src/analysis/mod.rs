//! Pure numeric analysis over fetched series.
//!
//! # Responsibility
//! - Normalize single series (`transform`).
//! - Combine two transformed series on shared dates (`formula`).
//!
//! # Invariants
//! - Incomputable points (missing operand, missing lag reference, non-finite
//!   result) are dropped, never kept as placeholders.
//! - Outputs stay ascending by date.

pub mod formula;
pub mod transform;
