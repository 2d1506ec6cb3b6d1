//! Named view configuration persistence.
//!
//! # Responsibility
//! - Save and load named `ViewConfig` bundles in one JSON document.
//!
//! # Invariants
//! - A missing or corrupt document reads as "no saved views", never an error.
//! - Saves rewrite the whole document; the last writer wins.
//! - A save replaces the document atomically, so readers never observe a
//!   partially written file.

use crate::model::view::ViewConfig;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod json_store;

pub use json_store::JsonViewConfigStore;

pub type ViewResult<T> = Result<T, ViewError>;

/// Full name -> configuration mapping as persisted.
pub type ViewConfigMap = BTreeMap<String, ViewConfig>;

#[derive(Debug)]
pub enum ViewError {
    /// Blank configuration name passed to `save`.
    InvalidName(String),
    NotFound(String),
    Io(std::io::Error),
    Serialize(serde_json::Error),
}

impl Display for ViewError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(name) => write!(f, "invalid view name `{name}`"),
            Self::NotFound(name) => write!(f, "view not found: {name}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize views: {err}"),
        }
    }
}

impl Error for ViewError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidName(_) => None,
            Self::NotFound(_) => None,
            Self::Io(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ViewError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ViewError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Storage contract for named view configurations.
pub trait ViewConfigStore {
    /// Loads every saved configuration. Never fails; unreadable storage is
    /// reported as an empty mapping.
    fn load_all(&self) -> ViewConfigMap;

    /// Saves `config` under `name`, replacing any previous entry.
    fn save(&self, name: &str, config: &ViewConfig) -> ViewResult<()>;

    /// Loads one configuration by name.
    fn load(&self, name: &str) -> ViewResult<ViewConfig> {
        let key = name.trim();
        self.load_all()
            .remove(key)
            .ok_or_else(|| ViewError::NotFound(key.to_string()))
    }
}
