//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/sitetree/sitetree.toml`
//! 3. Environment variables: `SITETREE_*` prefix
//! 4. CLI overrides

use std::path::PathBuf;

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, ApplicationResult, MissingDeletePolicy};

/// Separator used by the original admin breadcrumbs.
pub const DEFAULT_SEPARATOR: &str = " >> ";

/// Runtime settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding one document per root subtree
    pub store_dir: PathBuf,
    /// Breadcrumb segment separator
    pub breadcrumb_separator: String,
    /// Behavior when deleting an unknown id
    pub missing_delete: MissingDeletePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            breadcrumb_separator: DEFAULT_SEPARATOR.to_string(),
            missing_delete: MissingDeletePolicy::default(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence. `store_dir_override` comes
    /// from the CLI and wins over every other source.
    pub fn load(store_dir_override: Option<PathBuf>) -> ApplicationResult<Self> {
        let defaults = Settings::default();

        let mut builder = Config::builder()
            .set_default(
                "store_dir",
                defaults.store_dir.to_string_lossy().to_string(),
            )
            .map_err(config_err)?
            .set_default("breadcrumb_separator", defaults.breadcrumb_separator)
            .map_err(config_err)?
            .set_default("missing_delete", "ignore")
            .map_err(config_err)?;

        if let Some(path) = global_config_path() {
            if path.exists() {
                builder = builder.add_source(File::from(path));
            }
        }
        builder = builder.add_source(Environment::with_prefix("SITETREE"));

        let mut settings: Settings = builder
            .build()
            .map_err(config_err)?
            .try_deserialize()
            .map_err(config_err)?;

        if let Some(dir) = store_dir_override {
            settings.store_dir = dir;
        }
        Ok(settings)
    }
}

fn config_err(e: config::ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

/// Path of the global config file, if a home directory can be resolved.
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "sitetree").map(|dirs| dirs.config_dir().join("sitetree.toml"))
}

fn default_store_dir() -> PathBuf {
    ProjectDirs::from("", "", "sitetree")
        .map(|dirs| dirs.data_dir().join("trees"))
        .unwrap_or_else(|| PathBuf::from(".sitetree/trees"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let settings = Settings::default();
        assert_eq!(settings.breadcrumb_separator, " >> ");
        assert_eq!(settings.missing_delete, MissingDeletePolicy::Ignore);
    }

    #[test]
    fn settings_serialize_to_toml() {
        let settings = Settings::default();
        let rendered = toml::to_string_pretty(&settings).unwrap();
        assert!(rendered.contains("missing_delete = \"ignore\""));
    }
}
