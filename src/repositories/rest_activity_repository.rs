use async_trait::async_trait;
use std::sync::Arc;

use super::scoped_table::ScopedTable;
use crate::client::AsyncCrmClient;
use crate::error::CrmApiResult;
use crate::models::{Activity, NewActivity};
use crate::repositories::traits::ActivityRepository;

/// Activity repository backed by the `activities` table.
pub struct RestActivityRepository {
    table: ScopedTable<Activity>,
}

impl RestActivityRepository {
    pub fn new(client: Arc<dyn AsyncCrmClient>, user_id: impl Into<String>) -> Self {
        Self {
            table: ScopedTable::new(client, user_id),
        }
    }
}

#[async_trait]
impl ActivityRepository for RestActivityRepository {
    async fn recent(&self, limit: usize) -> CrmApiResult<Vec<Activity>> {
        let query = self
            .table
            .query()
            .select("*")
            .order("created_at", false)
            .limit(limit);
        self.table.select(query).await
    }

    async fn for_contact(&self, contact_id: &str) -> CrmApiResult<Vec<Activity>> {
        let query = self
            .table
            .query()
            .select("*")
            .eq("contact_id", contact_id)
            .order("created_at", false);
        self.table.select(query).await
    }

    async fn create(&self, activity: &NewActivity) -> CrmApiResult<Activity> {
        self.table.insert_one(activity).await
    }

    async fn delete(&self, id: &str) -> CrmApiResult<()> {
        self.table.delete(id).await
    }
}
