//! Process settings resolved from the environment.
//!
//! # Responsibility
//! - Resolve storage locations and logging options in one place.
//!
//! # Invariants
//! - Blank environment values count as unset.
//! - Resolution never fails; every setting has a default except `log_dir`.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "FREDVIEW_DB_PATH";
pub const ENV_VIEWS_PATH: &str = "FREDVIEW_VIEWS_PATH";
pub const ENV_LOG_LEVEL: &str = "FREDVIEW_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "FREDVIEW_LOG_DIR";

const DEFAULT_DB_PATH: &str = "data/fred.sqlite3";
const DEFAULT_VIEWS_PATH: &str = "data/views.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    /// Observation database file.
    pub db_path: PathBuf,
    /// Saved views JSON document.
    pub views_path: PathBuf,
    pub log_level: String,
    /// File logging is enabled only when set.
    pub log_dir: Option<PathBuf>,
}

impl AppSettings {
    /// Resolves settings from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup`, which maps a variable name to its
    /// raw value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: read(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
            views_path: read(ENV_VIEWS_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_VIEWS_PATH)),
            log_level: read(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppSettings, ENV_DB_PATH, ENV_LOG_DIR, ENV_LOG_LEVEL, ENV_VIEWS_PATH};
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let settings = AppSettings::from_lookup(|_| None);
        assert_eq!(settings.db_path, PathBuf::from("data/fred.sqlite3"));
        assert_eq!(settings.views_path, PathBuf::from("data/views.json"));
        assert_eq!(settings.log_level, default_log_level());
        assert_eq!(settings.log_dir, None);
    }

    #[test]
    fn explicit_values_override_defaults_and_blanks_are_ignored() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_DB_PATH, " /srv/fred.sqlite3 "),
            (ENV_VIEWS_PATH, "   "),
            (ENV_LOG_LEVEL, "warn"),
            (ENV_LOG_DIR, "/var/log/fredview"),
        ]);
        let settings = AppSettings::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(settings.db_path, PathBuf::from("/srv/fred.sqlite3"));
        assert_eq!(settings.views_path, PathBuf::from("data/views.json"));
        assert_eq!(settings.log_level, "warn");
        assert_eq!(settings.log_dir, Some(PathBuf::from("/var/log/fredview")));
    }
}
