use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_DOC_BASE_URL: &str = "https://lua-api.factorio.com/latest/";

/// Options controlling how stubs are generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Prefix of every documentation link.
    pub doc_base_url: String,
    /// Builtin types the consuming analyzer already knows. These get no declaration.
    pub known_builtins: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            doc_base_url: DEFAULT_DOC_BASE_URL.to_string(),
            known_builtins: ["string", "boolean", "table"]
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

impl GeneratorConfig {
    /// # Errors
    /// Returns a `ConfigError` if the text is not a valid YAML config.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(text).map_err(|err| ConfigError::Parse {
            message: err.to_string(),
        })
    }

    /// # Errors
    /// Returns a `ConfigError` if the text is not a valid JSON config.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|err| ConfigError::Parse {
            message: err.to_string(),
        })
    }

    /// Reads a config file, choosing JSON for `.json` files and YAML otherwise.
    ///
    /// # Errors
    /// Returns a `ConfigError` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&text),
            _ => Self::from_yaml(&text),
        }
    }

    pub fn is_known_builtin(&self, name: &str) -> bool {
        self.known_builtins.iter().any(|known| known == name)
    }
}
