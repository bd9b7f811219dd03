//! Typed, tenant-scoped access to one backend table.

use crate::client::{AsyncCrmClient, Query};
use crate::error::{CrmApiError, CrmApiResult};
use crate::models::Table;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

/// Reads and writes rows of `T` that belong to one user.
///
/// Every filter carries `user_id=eq.<user>` and every inserted row gets the
/// user's id stamped on it.
pub(crate) struct ScopedTable<T> {
    client: Arc<dyn AsyncCrmClient>,
    user_id: String,
    _row: PhantomData<fn() -> T>,
}

impl<T> ScopedTable<T>
where
    T: Table + DeserializeOwned,
{
    pub(crate) fn new(client: Arc<dyn AsyncCrmClient>, user_id: impl Into<String>) -> Self {
        Self {
            client,
            user_id: user_id.into(),
            _row: PhantomData,
        }
    }

    pub(crate) fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Base query: the user's rows only.
    pub(crate) fn query(&self) -> Query {
        Query::new().eq("user_id", &self.user_id)
    }

    /// Base query for one of the user's rows.
    pub(crate) fn by_id(&self, id: &str) -> Query {
        self.query().eq("id", id)
    }

    pub(crate) async fn select(&self, query: Query) -> CrmApiResult<Vec<T>> {
        let rows = self.client.select(T::NAME, &query).await?;
        rows.into_iter().map(from_row).collect()
    }

    pub(crate) async fn select_one(&self, query: Query) -> CrmApiResult<T> {
        let row = self.client.select_one(T::NAME, &query).await?;
        from_row(row)
    }

    pub(crate) async fn count(&self, query: Query) -> CrmApiResult<u64> {
        self.client.count(T::NAME, &query).await
    }

    /// Insert payloads with `user_id` stamped; returns the stored rows.
    pub(crate) async fn insert<N: Serialize>(&self, rows: &[N]) -> CrmApiResult<Vec<T>> {
        let stamped = rows
            .iter()
            .map(|row| self.stamp(row))
            .collect::<CrmApiResult<Vec<Value>>>()?;
        let stored = self.client.insert(T::NAME, Value::Array(stamped)).await?;
        stored.into_iter().map(from_row).collect()
    }

    pub(crate) async fn insert_one<N: Serialize>(&self, row: &N) -> CrmApiResult<T> {
        let stamped = self.stamp(row)?;
        let stored = self.client.insert(T::NAME, stamped).await?;
        stored
            .into_iter()
            .next()
            .ok_or_else(|| CrmApiError::Other(format!("Insert into {} returned no row", T::NAME)))
            .and_then(from_row)
    }

    pub(crate) async fn update<C: Serialize>(&self, id: &str, changes: &C) -> CrmApiResult<T> {
        let body = serde_json::to_value(changes)?;
        let stored = self.client.update(T::NAME, &self.by_id(id), body).await?;
        stored
            .into_iter()
            .next()
            .ok_or_else(|| CrmApiError::NotFound(format!("{} row {}", T::NAME, id)))
            .and_then(from_row)
    }

    pub(crate) async fn delete(&self, id: &str) -> CrmApiResult<()> {
        self.client.delete(T::NAME, &self.by_id(id)).await
    }

    fn stamp<N: Serialize>(&self, row: &N) -> CrmApiResult<Value> {
        let mut value = serde_json::to_value(row)?;
        match value.as_object_mut() {
            Some(object) => {
                object.insert("user_id".to_string(), Value::String(self.user_id.clone()));
                Ok(value)
            }
            None => Err(CrmApiError::Other(format!(
                "Row for {} must be a JSON object",
                T::NAME
            ))),
        }
    }
}

fn from_row<T: DeserializeOwned>(row: Value) -> CrmApiResult<T> {
    serde_json::from_value(row).map_err(CrmApiError::JsonError)
}
