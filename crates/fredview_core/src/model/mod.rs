//! Domain model for observation series and saved view state.
//!
//! # Responsibility
//! - Define the data structures shared by storage, analysis and views.
//! - Keep transform/formula selection as closed enums with exhaustive dispatch.
//!
//! # Invariants
//! - A `Series` is ordered ascending by date with unique dates.
//! - `DataPoint` values are always finite.

pub mod observation;
pub mod view;
