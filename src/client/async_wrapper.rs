//! Async wrapper around the synchronous CrmClient.
//!
//! This module provides an async interface to the synchronous CrmClient by using
//! `tokio::task::spawn_blocking` to run HTTP operations on a dedicated thread pool,
//! preventing blocking of the async runtime. Rows cross this boundary as
//! `serde_json::Value` so the trait stays object safe; repositories convert
//! them to typed models.

use crate::client::{AuthUser, CrmClient, Query};
use crate::error::{CrmApiError, CrmApiResult};
use crate::metrics::Metrics;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Async table operations against the backend.
#[async_trait]
pub trait AsyncCrmClient: Send + Sync {
    async fn current_user(&self) -> CrmApiResult<AuthUser>;

    async fn select(&self, table: &str, query: &Query) -> CrmApiResult<Vec<Value>>;
    async fn select_one(&self, table: &str, query: &Query) -> CrmApiResult<Value>;
    async fn count(&self, table: &str, query: &Query) -> CrmApiResult<u64>;

    /// `rows` is a single object or an array of objects.
    async fn insert(&self, table: &str, rows: Value) -> CrmApiResult<Vec<Value>>;
    async fn update(&self, table: &str, query: &Query, changes: Value)
        -> CrmApiResult<Vec<Value>>;
    async fn delete(&self, table: &str, query: &Query) -> CrmApiResult<()>;
}

/// Async wrapper around synchronous CrmClient.
///
/// Uses `tokio::task::spawn_blocking` to run synchronous HTTP
/// operations on a dedicated thread pool, preventing blocking
/// the async runtime.
#[derive(Clone)]
pub struct AsyncCrmClientImpl {
    client: Arc<CrmClient>,
}

impl AsyncCrmClientImpl {
    pub fn new(client: CrmClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    pub fn metrics(&self) -> &Metrics {
        self.client.metrics()
    }

    async fn run<T, F>(&self, op: F) -> CrmApiResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&CrmClient) -> CrmApiResult<T> + Send + 'static,
    {
        let client = self.client.clone();
        tokio::task::spawn_blocking(move || op(&client))
            .await
            .map_err(|e| CrmApiError::HttpError(format!("Task join error: {}", e)))?
    }
}

#[async_trait]
impl AsyncCrmClient for AsyncCrmClientImpl {
    async fn current_user(&self) -> CrmApiResult<AuthUser> {
        self.run(|client| client.current_user()).await
    }

    async fn select(&self, table: &str, query: &Query) -> CrmApiResult<Vec<Value>> {
        let table = table.to_string();
        let query = query.clone();
        self.run(move |client| client.select(&table, &query)).await
    }

    async fn select_one(&self, table: &str, query: &Query) -> CrmApiResult<Value> {
        let table = table.to_string();
        let query = query.clone();
        self.run(move |client| client.select_one(&table, &query))
            .await
    }

    async fn count(&self, table: &str, query: &Query) -> CrmApiResult<u64> {
        let table = table.to_string();
        let query = query.clone();
        self.run(move |client| client.count(&table, &query)).await
    }

    async fn insert(&self, table: &str, rows: Value) -> CrmApiResult<Vec<Value>> {
        let table = table.to_string();
        self.run(move |client| client.insert(&table, &rows)).await
    }

    async fn update(
        &self,
        table: &str,
        query: &Query,
        changes: Value,
    ) -> CrmApiResult<Vec<Value>> {
        let table = table.to_string();
        let query = query.clone();
        self.run(move |client| client.update(&table, &query, &changes))
            .await
    }

    async fn delete(&self, table: &str, query: &Query) -> CrmApiResult<()> {
        let table = table.to_string();
        let query = query.clone();
        self.run(move |client| client.delete(&table, &query)).await
    }
}
