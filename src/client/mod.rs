//! HTTP client for the hosted CRM backend.
//!
//! The backend exposes every table through PostgREST under `/rest/v1` and the
//! signed-in user under `/auth/v1/user`. This module provides a synchronous
//! client that can be used from async contexts via `tokio::task::spawn_blocking`.
//! Row-level security on the backend keys on the access token, and callers
//! additionally filter every request by `user_id`.

mod async_wrapper;
pub mod query;

pub use async_wrapper::{AsyncCrmClient, AsyncCrmClientImpl};
pub use query::Query;

use crate::config::Config;
use crate::error::{CrmApiError, CrmApiResult};
use crate::metrics::{HttpTimer, Metrics};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// The user behind the access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Error body returned by PostgREST and the auth service.
#[derive(Debug, Deserialize)]
struct BackendErrorBody {
    #[serde(alias = "msg", alias = "error_description")]
    message: Option<String>,
}

/// HTTP client for the hosted CRM backend.
///
/// This client uses `ureq` for synchronous HTTP requests and can be called
/// from async contexts using `tokio::task::spawn_blocking`.
#[derive(Clone)]
pub struct CrmClient {
    /// Project URL
    base_url: String,

    /// Public anon key, sent as `apikey`
    anon_key: String,

    /// User access token, sent as a bearer token
    access_token: String,

    /// HTTP client agent
    agent: Arc<ureq::Agent>,

    /// Metrics collector
    metrics: Metrics,
}

impl CrmClient {
    /// Create a new CrmClient from configuration.
    pub fn new(config: &Config) -> Self {
        Self::build(
            config.supabase_url.clone(),
            config.supabase_anon_key.clone(),
            config.access_token.clone(),
            config.request_timeout,
        )
    }

    /// Create a CrmClient with a custom base URL (useful for testing).
    #[doc(hidden)]
    pub fn with_base_url(base_url: String, anon_key: String, access_token: String) -> Self {
        Self::build(base_url, anon_key, access_token, 10)
    }

    fn build(base_url: String, anon_key: String, access_token: String, timeout: u64) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(timeout))
            .build();

        Self {
            base_url,
            anon_key,
            access_token,
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Build a full URL from a path.
    fn build_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    fn table_url(&self, table: &str, query: &Query) -> String {
        let url = self.build_url(&format!("/rest/v1/{}", table));
        let qs = query.to_query_string();
        if qs.is_empty() {
            url
        } else {
            format!("{}?{}", url, qs)
        }
    }

    /// Start a request carrying the project key and the user's token.
    fn request(&self, method: &str, url: &str) -> ureq::Request {
        self.agent
            .request(method, url)
            .set("apikey", &self.anon_key)
            .set("Authorization", &format!("Bearer {}", self.access_token))
            .set("Content-Type", "application/json")
    }

    /// Send a request, recording timing and mapping failures.
    fn send(
        &self,
        request: ureq::Request,
        body: Option<&serde_json::Value>,
    ) -> CrmApiResult<ureq::Response> {
        let timer = HttpTimer::new(self.metrics.clone());
        let method = request.method().to_string();
        let url = request.url().to_string();
        tracing::debug!("{} {}", method, url);

        let result = match body {
            Some(body) => request.send_json(body),
            None => request.call(),
        }
        .map_err(|e| self.map_error(e));

        timer.finish(result.is_err());
        if let Err(e) = &result {
            tracing::error!("{} {} - Error: {}", method, url, e);
        }
        result
    }

    fn read_rows<T: DeserializeOwned>(response: ureq::Response) -> CrmApiResult<Vec<T>> {
        let body = response
            .into_string()
            .map_err(|e| CrmApiError::HttpError(e.to_string()))?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&body).map_err(CrmApiError::JsonError)
    }

    /// Map a ureq error to a CrmApiError.
    fn map_error(&self, error: ureq::Error) -> CrmApiError {
        match error {
            ureq::Error::Status(code, response) => {
                let raw = response
                    .into_string()
                    .unwrap_or_else(|_| "Unknown error".to_string());
                let message = backend_message(&raw);

                match code {
                    401 => CrmApiError::Unauthorized,
                    404 => CrmApiError::NotFound(message),
                    429 => CrmApiError::RateLimitExceeded,
                    _ => CrmApiError::ApiError {
                        status: code,
                        message,
                    },
                }
            }
            ureq::Error::Transport(transport) => {
                if transport.kind() == ureq::ErrorKind::ConnectionFailed {
                    CrmApiError::HttpError("Connection failed".to_string())
                } else if transport.kind() == ureq::ErrorKind::Io {
                    CrmApiError::Timeout
                } else {
                    CrmApiError::HttpError(transport.to_string())
                }
            }
        }
    }

    // ========================= Auth =========================

    /// Resolve the user behind the access token.
    pub fn current_user(&self) -> CrmApiResult<AuthUser> {
        let url = self.build_url("/auth/v1/user");
        let response = match self.send(self.request("GET", &url), None) {
            Ok(response) => response,
            Err(CrmApiError::Unauthorized) | Err(CrmApiError::ApiError { status: 403, .. }) => {
                return Err(CrmApiError::NotAuthenticated)
            }
            Err(e) => return Err(e),
        };
        let body = response
            .into_string()
            .map_err(|e| CrmApiError::HttpError(e.to_string()))?;
        let user: AuthUser = serde_json::from_str(&body).map_err(CrmApiError::JsonError)?;
        if user.id.is_empty() {
            return Err(CrmApiError::NotAuthenticated);
        }
        Ok(user)
    }

    // ========================= Tables =========================

    /// Select rows from a table.
    pub fn select<T: DeserializeOwned>(&self, table: &str, query: &Query) -> CrmApiResult<Vec<T>> {
        let url = self.table_url(table, query);
        let response = self.send(self.request("GET", &url), None)?;
        let rows: Vec<T> = Self::read_rows(response)?;
        self.metrics.record_rows_fetched(rows.len());
        Ok(rows)
    }

    /// Select the first matching row; an empty result is `NotFound`.
    pub fn select_one<T: DeserializeOwned>(&self, table: &str, query: &Query) -> CrmApiResult<T> {
        self.select(table, &query.clone().limit(1))?
            .into_iter()
            .next()
            .ok_or_else(|| CrmApiError::NotFound(format!("No matching row in {}", table)))
    }

    /// Count matching rows without transferring them.
    pub fn count(&self, table: &str, query: &Query) -> CrmApiResult<u64> {
        let url = self.table_url(table, query);
        let request = self.request("HEAD", &url).set("Prefer", "count=exact");
        let response = self.send(request, None)?;
        let range = response.header("Content-Range").unwrap_or("*/0");
        parse_content_range_total(range).ok_or_else(|| {
            CrmApiError::Other(format!("Unexpected Content-Range header: {}", range))
        })
    }

    /// Insert one object or an array of objects, returning the stored rows.
    pub fn insert<T, R>(&self, table: &str, rows: &T) -> CrmApiResult<Vec<R>>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = serde_json::to_value(rows).map_err(CrmApiError::JsonError)?;
        let url = self.table_url(table, &Query::new());
        let request = self
            .request("POST", &url)
            .set("Prefer", "return=representation");
        let response = self.send(request, Some(&body))?;
        let stored: Vec<R> = Self::read_rows(response)?;
        self.metrics.record_rows_written(stored.len());
        tracing::info!("Inserted {} row(s) into {}", stored.len(), table);
        Ok(stored)
    }

    /// Update matching rows; nothing matched is `NotFound`.
    pub fn update<T, R>(&self, table: &str, query: &Query, changes: &T) -> CrmApiResult<Vec<R>>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = serde_json::to_value(changes).map_err(CrmApiError::JsonError)?;
        let url = self.table_url(table, query);
        let request = self
            .request("PATCH", &url)
            .set("Prefer", "return=representation");
        let response = self.send(request, Some(&body))?;
        let stored: Vec<R> = Self::read_rows(response)?;
        if stored.is_empty() {
            return Err(CrmApiError::NotFound(format!("No matching row in {}", table)));
        }
        self.metrics.record_rows_written(stored.len());
        tracing::info!("Updated {} row(s) in {}", stored.len(), table);
        Ok(stored)
    }

    /// Delete matching rows.
    pub fn delete(&self, table: &str, query: &Query) -> CrmApiResult<()> {
        let url = self.table_url(table, query);
        self.send(self.request("DELETE", &url), None)?;
        tracing::info!("Deleted from {}", table);
        Ok(())
    }
}

/// Pull the human-readable `message` out of a backend error body.
fn backend_message(raw: &str) -> String {
    serde_json::from_str::<BackendErrorBody>(raw)
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| raw.to_string())
}

/// Total from a `Content-Range` header such as `0-9/42` or `*/0`.
fn parse_content_range_total(range: &str) -> Option<u64> {
    range.rsplit_once('/')?.1.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url() {
        let client = CrmClient::with_base_url(
            "https://project.supabase.co/".to_string(),
            "anon".to_string(),
            "token".to_string(),
        );

        assert_eq!(
            client.build_url("/auth/v1/user"),
            "https://project.supabase.co/auth/v1/user"
        );
        assert_eq!(
            client.table_url("deals", &Query::new().eq("user_id", "u1")),
            "https://project.supabase.co/rest/v1/deals?user_id=eq.u1"
        );
        assert_eq!(
            client.table_url("deals", &Query::new()),
            "https://project.supabase.co/rest/v1/deals"
        );
    }

    #[test]
    fn test_client_creation() {
        let config = Config {
            supabase_url: "https://project.supabase.co".to_string(),
            supabase_anon_key: "anon-key".to_string(),
            access_token: "jwt".to_string(),
            ..Config::default()
        };

        let client = CrmClient::new(&config);
        assert_eq!(client.base_url, "https://project.supabase.co");
        assert_eq!(client.anon_key, "anon-key");
        assert_eq!(client.access_token, "jwt");
    }

    #[test]
    fn test_backend_message() {
        assert_eq!(
            backend_message(r#"{"code":"23505","message":"duplicate key value","details":null}"#),
            "duplicate key value"
        );
        assert_eq!(backend_message(r#"{"msg":"Invalid JWT"}"#), "Invalid JWT");
        assert_eq!(backend_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_content_range_total() {
        assert_eq!(parse_content_range_total("0-9/42"), Some(42));
        assert_eq!(parse_content_range_total("*/0"), Some(0));
        assert_eq!(parse_content_range_total("0-9/*"), None);
    }
}
