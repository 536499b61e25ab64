use std::{collections::BTreeMap, fmt, sync::Arc};

/// Key of the one fatal failure class: the scene could not be read or parsed.
pub const CONTENT_ERROR: &str = "content-error";

/// Import failure: a static key, named details, and the error that caused it.
#[derive(Debug, Clone)]
pub struct ImportError {
    pub key: &'static str,
    pub args: BTreeMap<&'static str, String>,
    pub source: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

impl ImportError {
    pub fn new(key: &'static str) -> Self {
        Self {
            key,
            args: BTreeMap::new(),
            source: None,
        }
    }

    /// Scene-level failure carrying the importer's diagnostic.
    pub fn content(msg: impl ToString) -> Self {
        ImportError::new(CONTENT_ERROR).with_arg("msg", msg)
    }

    pub fn with_arg(mut self, k: &'static str, v: impl ToString) -> Self {
        self.args.insert(k, v.to_string());
        self
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    pub fn is_content_error(&self) -> bool {
        self.key == CONTENT_ERROR
    }

    pub fn arg(&self, k: &str) -> Option<&str> {
        self.args.get(k).map(String::as_str)
    }
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.key)?;
        let mut first = true;
        for (k, v) in &self.args {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{k}={v}")?;
        }
        write!(f, ")")
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// The scene importer failing is always fatal for the model being built.
impl From<gltf::Error> for ImportError {
    fn from(err: gltf::Error) -> Self {
        let msg = format!("[SceneImporter] Model Import: {err}");
        ImportError::content(msg).with_source(err)
    }
}
