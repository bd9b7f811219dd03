//! Error types for the CRM MCP Server.
//!
//! This module defines custom error types using `thiserror` for precise error handling.

use thiserror::Error;

/// Errors that can occur when talking to the hosted CRM backend.
#[derive(Error, Debug)]
pub enum CrmApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Backend returned an error status code. `message` is the backend's own text.
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse JSON response
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Network timeout
    #[error("Request timeout")]
    Timeout,

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Credentials rejected by the backend
    #[error("Authentication failed")]
    Unauthorized,

    /// No authenticated user behind the access token
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Form or request validation failed
    #[error("{0}")]
    InvalidRequest(String),

    /// Generic API error with context
    #[error("API error: {0}")]
    Other(String),
}

impl CrmApiError {
    /// Text shown to the caller: the backend's own message for `ApiError`,
    /// the display string otherwise.
    pub fn user_message(&self) -> String {
        match self {
            CrmApiError::ApiError { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },

    /// Failed to load .env file
    #[error("Failed to load .env file: {0}")]
    DotenvError(String),

    /// Generic configuration error
    #[error("Configuration error: {0}")]
    Other(String),
}

/// Errors raised by spreadsheet import and export.
#[derive(Error, Debug)]
pub enum ImportError {
    /// File extension is not a spreadsheet format we read
    #[error("Please select an Excel or CSV file (got: {0})")]
    UnsupportedFormat(String),

    /// File parsed but had no data rows
    #[error("The file appears to be empty.")]
    EmptyFile,

    /// One or more required columns were not mapped
    #[error("Please map required fields: {}", .0.join(", "))]
    MissingRequiredColumns(Vec<String>),

    /// A column override names a header the file does not have
    #[error("Column not found in file: {0}")]
    UnknownColumn(String),

    /// Spreadsheet could not be parsed
    #[error("Failed to read the file: {0}")]
    Read(String),

    /// Spreadsheet could not be written
    #[error("Failed to write the file: {0}")]
    Write(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend rejected the rows
    #[error(transparent)]
    Api(#[from] CrmApiError),
}

impl ImportError {
    pub fn user_message(&self) -> String {
        match self {
            ImportError::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

/// Convenience type alias for Results with CrmApiError
pub type CrmApiResult<T> = Result<T, CrmApiError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Convenience type alias for Results with ImportError
pub type ImportResult<T> = Result<T, ImportError>;
