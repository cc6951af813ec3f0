use std::path::PathBuf;

use log::{info, warn};
use serde::Serialize;

use crate::fs_json_util::write_json_pretty;

/// Sink for the `--debug` files.  Does nothing unless enabled.
#[derive(Clone, Debug, Default)]
pub struct DebugDumps {
    dir: Option<PathBuf>,
}

impl DebugDumps {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn to_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    pub fn write_json<T: Serialize>(&self, file: &str, value: &T) {
        if let Some(dir) = &self.dir {
            let path = dir.join(file);
            match write_json_pretty(&path, value) {
                Ok(()) => info!("Saved parsed JSON to {path:?}"),
                Err(e) => warn!("Failed to write {path:?}: {e:#}"),
            }
        }
    }

    pub fn write_text(&self, file: &str, text: &str) {
        if let Some(dir) = &self.dir {
            let path = dir.join(file);
            match fs_err::write(&path, text) {
                Ok(()) => info!("Saved raw response to {path:?}"),
                Err(e) => warn!("Failed to write {path:?}: {e:#}"),
            }
        }
    }
}
