//! Application settings loaded from `config.toml` and the environment.
//!
//! Settings are built once at startup and handed to whatever needs them.
//! Secrets such as the Discord token are read at the point of use instead.

use crate::config::database::DEFAULT_DATABASE_URL;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default number of times a contended claim is re-evaluated.
pub const DEFAULT_MAX_CLAIM_ATTEMPTS: u32 = 5;

/// Top-level application settings
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Display name used in bot replies
    pub app_name: String,
    /// `SeaORM` connection URL
    pub database_url: String,
    /// How many times a claim is evaluated before giving up on contention
    pub max_claim_attempts: u32,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "Doodlebucks".to_string(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_claim_attempts: DEFAULT_MAX_CLAIM_ATTEMPTS,
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    /// Parses settings from TOML text. Missing keys take their defaults.
    ///
    /// # Errors
    /// Returns `Error::Config` if the TOML is invalid or `max_claim_attempts` is zero.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let settings: Self = toml::from_str(contents).map_err(|e| Error::Config {
            message: format!("Failed to parse config.toml: {e}"),
        })?;
        settings.validate()
    }

    /// Applies `DOODLE_DATABASE_URL` (or `DATABASE_URL`) and
    /// `DOODLE_MAX_CLAIM_ATTEMPTS` on top of the current values.
    ///
    /// # Errors
    /// Returns `Error::Config` if an override cannot be parsed.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DOODLE_DATABASE_URL").or_else(|| lookup("DATABASE_URL")) {
            self.database_url = url;
        }
        if let Some(raw) = lookup("DOODLE_MAX_CLAIM_ATTEMPTS") {
            self.max_claim_attempts = raw.trim().parse().map_err(|e| Error::Config {
                message: format!("DOODLE_MAX_CLAIM_ATTEMPTS must be a positive integer: {e}"),
            })?;
        }
        self.validate()
    }

    fn validate(self) -> Result<Self> {
        if self.max_claim_attempts == 0 {
            return Err(Error::Config {
                message: "max_claim_attempts must be at least 1".to_string(),
            });
        }
        Ok(self)
    }
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path_ref = path.as_ref();
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    Settings::from_toml_str(&contents)
}

/// Where the base settings came from, reported once logging is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsSource {
    /// Read from this file
    File(PathBuf),
    /// No config file was present; built-in defaults were used
    Defaults,
}

/// Loads `./config.toml` if it exists (defaults otherwise) and applies
/// environment overrides.
///
/// Runs before the tracing subscriber exists, so it does not log; the caller
/// reports the returned [`SettingsSource`].
///
/// # Errors
/// Returns an error if the file exists but is invalid, or an override is malformed.
pub fn load_app_settings() -> Result<(Settings, SettingsSource)> {
    load_app_settings_from(Path::new("config.toml"))
}

/// Same as [`load_app_settings`] with an explicit config file path.
///
/// # Errors
/// Returns an error if the file exists but is invalid, or an override is malformed.
pub fn load_app_settings_from(path: &Path) -> Result<(Settings, SettingsSource)> {
    let (settings, source) = if path.exists() {
        (load_settings(path)?, SettingsSource::File(path.to_path_buf()))
    } else {
        (Settings::default(), SettingsSource::Defaults)
    };
    Ok((settings.with_env_overrides()?, source))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_partial_settings() {
        let toml_str = r#"
            app_name = "Test Bucks"
            max_claim_attempts = 3
        "#;

        let settings = Settings::from_toml_str(toml_str).unwrap();
        assert_eq!(settings.app_name, "Test Bucks");
        assert_eq!(settings.max_claim_attempts, 3);
        assert_eq!(settings.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(settings.log_filter, "info");
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let result = Settings::from_toml_str("max_claim_attempts = 0");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let result = Settings::from_toml_str("app_name = ");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let path = Path::new("definitely/not/here/config.toml");
        let (settings, source) = load_app_settings_from(path).unwrap();
        assert_eq!(source, SettingsSource::Defaults);
        assert_eq!(settings.app_name, "Doodlebucks");
    }

    #[test]
    fn test_unreadable_config_is_config_error() {
        let result = load_settings("definitely/not/here/config.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_config_file_source_reported() {
        let path = std::env::temp_dir().join(format!("doodlebucks-settings-{}.toml", std::process::id()));
        std::fs::write(&path, "app_name = \"File Bucks\"\n").unwrap();

        let loaded = load_app_settings_from(&path);
        std::fs::remove_file(&path).unwrap();

        let (settings, source) = loaded.unwrap();
        assert_eq!(settings.app_name, "File Bucks");
        assert_eq!(source, SettingsSource::File(path));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("DATABASE_URL", "sqlite://fallback.sqlite"),
            ("DOODLE_DATABASE_URL", "sqlite://preferred.sqlite"),
            ("DOODLE_MAX_CLAIM_ATTEMPTS", " 8 "),
        ]);

        let settings = Settings::default()
            .with_overrides(|key| env.get(key).map(ToString::to_string))
            .unwrap();
        assert_eq!(settings.database_url, "sqlite://preferred.sqlite");
        assert_eq!(settings.max_claim_attempts, 8);
    }

    #[test]
    fn test_database_url_fallback_override() {
        let settings = Settings::default()
            .with_overrides(|key| (key == "DATABASE_URL").then(|| "sqlite://other.sqlite".to_string()))
            .unwrap();
        assert_eq!(settings.database_url, "sqlite://other.sqlite");
    }

    #[test]
    fn test_malformed_attempts_override() {
        let result = Settings::default().with_overrides(|key| {
            (key == "DOODLE_MAX_CLAIM_ATTEMPTS").then(|| "many".to_string())
        });
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
