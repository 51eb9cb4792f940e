//! Optional TOML configuration.
//!
//! Read from `conf/guide.toml` unless `--config` or `GUIDE_CONFIG` points
//! elsewhere. A missing or broken file falls back to the defaults so the
//! window still opens.

use std::fs;
use std::path::{Path, PathBuf};

use guide_core::settings::{GuideSettings, GuideSettingsDraft, SettingsError};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const DEFAULT_CONFIG_PATH: &str = "conf/guide.toml";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GuideConfig {
    /// `EnvFilter` directive, e.g. `info` or `services=debug,info`.
    pub log_level: String,
    pub guide: GuideSettingsDraft,
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            guide: GuideSettingsDraft::default(),
        }
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl GuideConfig {
    /// Validated guide settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Settings` when a configured value is out of range.
    pub fn settings(&self) -> Result<GuideSettings, ConfigError> {
        Ok(self.guide.clone().validate()?)
    }

    /// Validated guide settings, or the defaults when validation fails.
    #[must_use]
    pub fn settings_or_default(&self) -> GuideSettings {
        self.settings().unwrap_or_else(|err| {
            warn!("Falling back to default guide settings: {err}");
            GuideSettings::default()
        })
    }
}

/// Parse a config file.
///
/// # Errors
///
/// Returns `ConfigError::Read` if the file cannot be read and
/// `ConfigError::Parse` if it is not valid TOML for this schema.
pub fn read_config(path: &Path) -> Result<GuideConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str::<GuideConfig>(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Like `read_config`, but any failure yields the default configuration.
#[must_use]
pub fn load_config(path: &Path) -> GuideConfig {
    match read_config(path) {
        Ok(config) => {
            info!(path = %path.display(), "Loaded config");
            debug!(?config, "Parsed configuration from disk");
            config
        }
        Err(ConfigError::Read { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "No config file; using defaults");
            GuideConfig::default()
        }
        Err(err) => {
            warn!("Falling back to default config: {err}");
            GuideConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: GuideConfig = toml::from_str("").unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.settings().unwrap(), GuideSettings::default());
    }

    #[test]
    fn guide_table_overrides_selected_fields() {
        let config: GuideConfig = toml::from_str(
            r#"
            log_level = "debug"

            [guide]
            scroll_weight = 0.5
            expansion_weight = 0.5
            max_results = 5
            "#,
        )
        .unwrap();
        let settings = config.settings().unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(settings.progress.scroll, 0.5);
        assert_eq!(settings.progress.expansion, 0.5);
        assert_eq!(settings.search.max_results, 5);
        assert_eq!(
            settings.copy_feedback_ms,
            GuideSettings::default().copy_feedback_ms
        );
    }

    #[test]
    fn invalid_settings_fall_back_to_defaults() {
        let config: GuideConfig = toml::from_str(
            r#"
            [guide]
            max_results = 0
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.settings(),
            Err(ConfigError::Settings(SettingsError::InvalidMaxResults))
        ));
        assert_eq!(config.settings_or_default(), GuideSettings::default());
    }

    #[test]
    fn missing_file_loads_defaults() {
        let path = Path::new("conf/definitely-not-here.toml");
        assert!(matches!(read_config(path), Err(ConfigError::Read { .. })));
        assert_eq!(load_config(path).log_level, "info");
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = toml::from_str::<GuideConfig>("log_level = [").unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
