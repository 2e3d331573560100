//! Configuration management for the contact book.
//!
//! This module handles loading and validating configuration from environment variables.
//! A `.env` file is read through `dotenvy`, which does not print to stdout
//! (stdout carries the MCP transport).

use crate::error::{ConfigError, ConfigResult};
use crate::models::NewUser;
use std::env;
use std::path::PathBuf;

/// Configuration for the contact book server.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON snapshot file for contacts; purely in-memory when unset
    pub data_file: Option<PathBuf>,

    /// Username of the account seeded at startup
    pub admin_username: Option<String>,

    /// Password of the account seeded at startup
    pub admin_password: Option<String>,

    /// Let anonymous sessions list and show contacts (default: false)
    pub allow_anonymous_read: bool,

    /// Log level (default: "error")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// All variables are optional:
    /// - `CONTACTS_DATA_FILE`: snapshot path
    /// - `CONTACTS_ADMIN_USERNAME` / `CONTACTS_ADMIN_PASSWORD`: seed account,
    ///   both or neither
    /// - `ALLOW_ANONYMOUS_READ`: `true`/`false` (default: false)
    /// - `LOG_LEVEL`: Logging level (default: "error")
    pub fn from_env() -> ConfigResult<Self> {
        // Try to load .env file if it exists (but don't fail if it doesn't)
        let _ = dotenvy::dotenv();

        let data_file = Self::non_empty_var("CONTACTS_DATA_FILE").map(PathBuf::from);

        let admin_username = Self::non_empty_var("CONTACTS_ADMIN_USERNAME");
        let admin_password = env::var("CONTACTS_ADMIN_PASSWORD")
            .ok()
            .filter(|v| !v.is_empty());

        match (&admin_username, &admin_password) {
            (Some(_), None) => {
                return Err(ConfigError::MissingVar(
                    "CONTACTS_ADMIN_PASSWORD".to_string(),
                ))
            }
            (None, Some(_)) => {
                return Err(ConfigError::MissingVar(
                    "CONTACTS_ADMIN_USERNAME".to_string(),
                ))
            }
            _ => {}
        }

        let allow_anonymous_read = Self::parse_env_bool("ALLOW_ANONYMOUS_READ", false)?;
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        Ok(Config {
            data_file,
            admin_username,
            admin_password,
            allow_anonymous_read,
            log_level,
        })
    }

    /// The account to seed at startup, when both parts are configured.
    pub fn admin_account(&self) -> Option<NewUser> {
        match (&self.admin_username, &self.admin_password) {
            (Some(username), Some(password)) => Some(NewUser {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => None,
        }
    }

    fn non_empty_var(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Parse an environment variable as a bool with a default value.
    fn parse_env_bool(var_name: &str, default: bool) -> ConfigResult<bool> {
        match env::var(var_name) {
            Ok(val) => match val.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::InvalidValue {
                    var: var_name.to_string(),
                    reason: format!("Must be true or false, got: {}", val),
                }),
            },
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_file: None,
            admin_username: None,
            admin_password: None,
            allow_anonymous_read: false,
            log_level: "error".to_string(),
        }
    }
}
