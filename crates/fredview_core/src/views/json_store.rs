//! JSON-file view configuration store.

use super::{ViewConfigMap, ViewConfigStore, ViewError, ViewResult};
use crate::model::view::ViewConfig;
use log::{info, warn};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// View store backed by one human-readable JSON document at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonViewConfigStore {
    path: PathBuf,
}

impl JsonViewConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_document(&self, views: &ViewConfigMap) -> ViewResult<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)?;

        let mut body = serde_json::to_vec_pretty(views)?;
        body.push(b'\n');

        // Temp file lives in the target directory so the rename stays on one
        // filesystem.
        let mut staged = NamedTempFile::new_in(&parent)?;
        staged.write_all(&body)?;
        staged.as_file().sync_all()?;
        staged
            .persist(&self.path)
            .map_err(|err| ViewError::Io(err.error))?;
        Ok(())
    }
}

impl ViewConfigStore for JsonViewConfigStore {
    fn load_all(&self) -> ViewConfigMap {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return ViewConfigMap::new(),
            Err(err) => {
                warn!(
                    "event=views_load module=views status=degraded error_code=views_unreadable path={} error={}",
                    self.path.display(),
                    err
                );
                return ViewConfigMap::new();
            }
        };

        match serde_json::from_str::<ViewConfigMap>(&raw) {
            Ok(views) => views,
            Err(err) => {
                warn!(
                    "event=views_load module=views status=degraded error_code=views_malformed path={} error={}",
                    self.path.display(),
                    err
                );
                ViewConfigMap::new()
            }
        }
    }

    fn save(&self, name: &str, config: &ViewConfig) -> ViewResult<()> {
        let key = name.trim();
        if key.is_empty() {
            return Err(ViewError::InvalidName(name.to_string()));
        }

        let mut views = self.load_all();
        let mut stored = config.clone();
        stored.name = key.to_string();
        let replaced = views.insert(key.to_string(), stored).is_some();

        if let Err(err) = self.write_document(&views) {
            warn!(
                "event=views_save module=views status=error path={} error={}",
                self.path.display(),
                err
            );
            return Err(err);
        }

        info!(
            "event=views_save module=views status=ok replaced={} view_count={}",
            replaced,
            views.len()
        );
        Ok(())
    }
}
