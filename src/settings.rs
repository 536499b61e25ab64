use crate::CONFY_APP_NAME;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the importer looks for companion files of a model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSettings {
    /// Root every relative model, texture and override path is resolved against.
    pub content_root: PathBuf,
    /// Shared texture directory, relative to `content_root`.
    pub texture_dir: String,
    /// Extension of the per-model override document.
    pub meta_extension: String,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            content_root: PathBuf::from("."),
            texture_dir: "unittextures".to_string(),
            meta_extension: "json".to_string(),
        }
    }
}

impl ImportSettings {
    pub fn load() -> Self {
        confy::load(CONFY_APP_NAME, "import").unwrap_or_default()
    }

    pub fn with_content_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.content_root = root.into();
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    pub dump_json: bool,
    pub pretty_json: bool,
    pub show_piece_tree: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dump_json: false,
            pretty_json: true,
            show_piece_tree: true,
        }
    }
}

impl OutputSettings {
    pub fn load() -> Self {
        confy::load(CONFY_APP_NAME, "output").unwrap_or_default()
    }
}

// Aggregate struct for convenience
pub struct Settings {
    pub import: ImportSettings,
    pub output: OutputSettings,
}

impl Settings {
    pub fn load() -> Self {
        Self {
            import: ImportSettings::load(),
            output: OutputSettings::load(),
        }
    }
}
