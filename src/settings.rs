//! Runtime configuration.
//!
//! Settings are read from an optional TOML file and then overridden by
//! environment variables, so a deployment can run from the environment
//! alone.

use std::{fmt, path::Path};

use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "tally.toml";

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,
    /// Master key for the private cookies. When unset a fresh key is
    /// generated at startup, which logs everybody out on restart.
    pub secret_key: Option<String>,
    pub log_level: String,
    /// Whether `/init_db` (which wipes the database) is reachable.
    pub allow_init_db: bool,
    pub seed_admin_username: String,
    pub seed_admin_password: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "tally.sqlite".to_string(),
            bind_address: "127.0.0.1:8000".to_string(),
            secret_key: None,
            log_level: "info".to_string(),
            allow_init_db: false,
            seed_admin_username: "admin".to_string(),
            seed_admin_password: "password".to_string(),
        }
    }
}

#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "could not read settings: {e}"),
            SettingsError::Parse(e) => {
                write!(f, "could not parse settings: {e}")
            }
        }
    }
}

impl std::error::Error for SettingsError {}

impl Settings {
    pub fn from_toml(s: &str) -> Result<Self, SettingsError> {
        toml::from_str(s).map_err(SettingsError::Parse)
    }

    /// Loads settings from `path`. A missing file is only an error if the
    /// path was given explicitly.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let settings = match path {
            Some(path) => Self::from_toml(
                &std::fs::read_to_string(path).map_err(SettingsError::Io)?,
            )?,
            None => match std::fs::read_to_string(DEFAULT_CONFIG_FILE) {
                Ok(s) => Self::from_toml(&s)?,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    Settings::default()
                }
                Err(e) => return Err(SettingsError::Io(e)),
            },
        };

        Ok(settings.with_env(|key| std::env::var(key).ok()))
    }

    pub fn with_env(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = var("DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(addr) = var("BIND_ADDRESS") {
            self.bind_address = addr;
        }
        if let Some(secret) = var("SECRET_KEY") {
            self.secret_key = Some(secret);
        }
        if let Some(level) = var("RUST_LOG") {
            self.log_level = level;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Settings::from_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn file_values_are_read() {
        let settings = Settings::from_toml(
            r#"
            database_url = "/var/lib/tally/tally.sqlite"
            allow_init_db = true
            "#,
        )
        .unwrap();

        assert_eq!(settings.database_url, "/var/lib/tally/tally.sqlite");
        assert!(settings.allow_init_db);
        assert_eq!(settings.bind_address, "127.0.0.1:8000");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Settings::from_toml("databse_url = \"x\"").is_err());
    }

    #[test]
    fn environment_overrides_file() {
        let settings = Settings::from_toml("database_url = \"a.sqlite\"")
            .unwrap()
            .with_env(|key| match key {
                "DATABASE_URL" => Some("b.sqlite".to_string()),
                "SECRET_KEY" => Some("k".repeat(64)),
                _ => None,
            });

        assert_eq!(settings.database_url, "b.sqlite");
        assert_eq!(settings.secret_key, Some("k".repeat(64)));
        assert_eq!(settings.log_level, "info");
    }
}
