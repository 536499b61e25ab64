//! Per-model override document.
//!
//! The document is a nested JSON table. Model-level keys (`radius`, `height`,
//! `midpos`, `tex1`, ...) sit at the root; per-piece keys live under
//! `pieces.<piece name>`. Readers only ever ask for a value with a default, so
//! a missing or broken document behaves exactly like an empty one.

mod table;

pub use table::MetaTable;

use log::{error, info};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetaError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("'{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("'{path}': document root is not a table")]
    NotATable { path: PathBuf },
}

#[derive(Debug, Clone, Default)]
pub struct MetaDocument {
    root: Map<String, Value>,
}

impl MetaDocument {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_value(value: Value, path: &Path) -> Result<Self, MetaError> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(MetaError::NotATable {
                path: path.to_path_buf(),
            }),
        }
    }

    pub fn parse(text: &str, path: &Path) -> Result<Self, MetaError> {
        let value = serde_json::from_str(text).map_err(|source| MetaError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_value(value, path)
    }

    pub fn load(path: &Path) -> Result<Self, MetaError> {
        let text = std::fs::read_to_string(path).map_err(|source| MetaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Loads the document belonging to `model_path`, falling back to an empty
    /// one when there is none or it cannot be used.
    pub fn load_for_model(model_path: &Path, extension: &str) -> Self {
        let Some(path) = find_meta_file(model_path, extension) else {
            info!(
                "No meta-file for '{}'. Using defaults.",
                model_path.display()
            );
            return Self::empty();
        };

        match Self::load(&path) {
            Ok(doc) => {
                info!("Using meta-file '{}'", path.display());
                doc
            }
            Err(e) => {
                error!("{e}. Using defaults.");
                Self::empty()
            }
        }
    }

    pub fn root(&self) -> MetaTable<'_> {
        MetaTable::new(Some(&self.root))
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

/// `<model path>.<ext>` first, then `<model dir>/<basename>.<ext>`.
pub fn find_meta_file(model_path: &Path, extension: &str) -> Option<PathBuf> {
    let mut appended = model_path.as_os_str().to_owned();
    appended.push(".");
    appended.push(extension);
    let appended = PathBuf::from(appended);
    if appended.is_file() {
        return Some(appended);
    }

    let replaced = model_path.with_extension(extension);
    if replaced.is_file() {
        return Some(replaced);
    }

    None
}
