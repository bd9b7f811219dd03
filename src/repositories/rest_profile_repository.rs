use async_trait::async_trait;
use std::sync::Arc;

use crate::client::{AsyncCrmClient, Query};
use crate::error::{CrmApiError, CrmApiResult};
use crate::models::{Profile, ProfileChanges, Table};
use crate::repositories::traits::ProfileRepository;

/// Profile repository. The `profiles` row is keyed by the auth user id
/// itself rather than a `user_id` column.
pub struct RestProfileRepository {
    client: Arc<dyn AsyncCrmClient>,
    user_id: String,
}

impl RestProfileRepository {
    pub fn new(client: Arc<dyn AsyncCrmClient>, user_id: impl Into<String>) -> Self {
        Self {
            client,
            user_id: user_id.into(),
        }
    }

    fn own_row(&self) -> Query {
        Query::new().eq("id", &self.user_id)
    }
}

#[async_trait]
impl ProfileRepository for RestProfileRepository {
    async fn get(&self) -> CrmApiResult<Profile> {
        let row = self
            .client
            .select_one(Profile::NAME, &self.own_row().select("*"))
            .await?;
        serde_json::from_value(row).map_err(CrmApiError::JsonError)
    }

    async fn update(&self, changes: &ProfileChanges) -> CrmApiResult<Profile> {
        let body = serde_json::to_value(changes)?;
        let row = self
            .client
            .update(Profile::NAME, &self.own_row(), body)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CrmApiError::NotFound("Profile not found".to_string()))?;
        serde_json::from_value(row).map_err(CrmApiError::JsonError)
    }
}
