use anyhow::Context;
use folio_dom::{AllowlistSanitizer, SanitizerConfig};
use folio_schema::{SchemaConfig, SchemaRegistry};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const DEFAULT_CONFIG_NAME: &str = "folio.config.json";

/// Folio project configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Node types, fallback policy and custom attributes
    #[serde(default)]
    pub schema: SchemaConfig,

    /// Markup allowlist applied before parsing
    #[serde(default)]
    pub sanitizer: SanitizerConfig,

    /// Undo levels kept by the editor (0 = unlimited)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_history_limit() -> usize {
    100
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = Self::path(cwd);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid config file {}", config_path.display()))
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn path(cwd: &str) -> PathBuf {
        Path::new(cwd).join(DEFAULT_CONFIG_NAME)
    }

    pub fn registry(&self) -> anyhow::Result<Arc<SchemaRegistry>> {
        Ok(Arc::new(SchemaRegistry::from_config(&self.schema)?))
    }

    pub fn sanitizer(&self) -> AllowlistSanitizer {
        AllowlistSanitizer::new(self.sanitizer.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema: SchemaConfig::default(),
            sanitizer: SanitizerConfig::default(),
            history_limit: default_history_limit(),
        }
    }
}

/// Resolve `file` against the working directory
pub fn resolve_path(cwd: &str, file: &str) -> PathBuf {
    let path = PathBuf::from(file);
    if path.is_absolute() {
        path
    } else {
        Path::new(cwd).join(path)
    }
}
