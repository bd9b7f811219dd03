//! Configuration management for the CRM MCP Server.
//!
//! This module handles loading and validating configuration from environment variables.
//! A `.env` file is read with `dotenvy`, which never writes to stdout (the MCP channel).

use crate::error::{ConfigError, ConfigResult};
use std::env;

/// Configuration for the CRM MCP Server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Hosted backend project URL (REST lives under `/rest/v1`, auth under `/auth/v1`)
    pub supabase_url: String,

    /// Public anon key sent as the `apikey` header
    pub supabase_anon_key: String,

    /// Access token (JWT) of the signed-in user; row-level security keys on it
    pub access_token: String,

    /// HTTP request timeout in seconds (default: 10)
    pub request_timeout: u64,

    /// Minimum confidence (0-100) for resolving contact names during imports (default: 60)
    pub contact_match_threshold: u8,

    /// Number of mapped rows returned by an import preview (default: 5)
    pub import_preview_rows: usize,

    /// Log level (default: "error")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `SUPABASE_URL`: Base URL of the hosted backend
    /// - `SUPABASE_ANON_KEY`: Project anon key
    /// - `CRM_ACCESS_TOKEN`: Access token of the signed-in user
    ///
    /// Optional environment variables:
    /// - `REQUEST_TIMEOUT`: HTTP timeout in seconds (default: 10)
    /// - `CONTACT_MATCH_THRESHOLD`: Min confidence for name resolution (default: 60)
    /// - `IMPORT_PREVIEW_ROWS`: Rows shown by import previews (default: 5)
    /// - `LOG_LEVEL`: Logging level (default: "error")
    pub fn from_env() -> ConfigResult<Self> {
        let _ = dotenvy::dotenv();

        let supabase_url = env::var("SUPABASE_URL")
            .map_err(|_| ConfigError::MissingVar("SUPABASE_URL".to_string()))?;

        let supabase_anon_key = env::var("SUPABASE_ANON_KEY")
            .map_err(|_| ConfigError::MissingVar("SUPABASE_ANON_KEY".to_string()))?;

        let access_token = env::var("CRM_ACCESS_TOKEN")
            .map_err(|_| ConfigError::MissingVar("CRM_ACCESS_TOKEN".to_string()))?;

        if !supabase_url.starts_with("http://") && !supabase_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                var: "SUPABASE_URL".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }

        Self::require_non_blank("SUPABASE_ANON_KEY", &supabase_anon_key)?;
        Self::require_non_blank("CRM_ACCESS_TOKEN", &access_token)?;

        let request_timeout = Self::parse_env_u64("REQUEST_TIMEOUT", 10)?;
        let contact_match_threshold = Self::parse_env_u8("CONTACT_MATCH_THRESHOLD", 60)?;
        let import_preview_rows = Self::parse_env_usize("IMPORT_PREVIEW_ROWS", 5)?;

        if contact_match_threshold > 100 {
            return Err(ConfigError::InvalidValue {
                var: "CONTACT_MATCH_THRESHOLD".to_string(),
                reason: "Must be between 0 and 100".to_string(),
            });
        }

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        Ok(Config {
            supabase_url,
            supabase_anon_key,
            access_token,
            request_timeout,
            contact_match_threshold,
            import_preview_rows,
            log_level,
        })
    }

    fn require_non_blank(var_name: &str, value: &str) -> ConfigResult<()> {
        if value.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: "Cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as usize with a default value.
    fn parse_env_usize(var_name: &str, default: usize) -> ConfigResult<usize> {
        match env::var(var_name) {
            Ok(val) => val.parse::<usize>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as u8 with a default value.
    fn parse_env_u8(var_name: &str, default: u8) -> ConfigResult<u8> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u8>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a number between 0-255, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            access_token: String::new(),
            request_timeout: 10,
            contact_match_threshold: 60,
            import_preview_rows: 5,
            log_level: "error".to_string(),
        }
    }
}
