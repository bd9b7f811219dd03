use async_trait::async_trait;
use std::sync::Arc;

use super::scoped_table::ScopedTable;
use crate::client::{AsyncCrmClient, Query};
use crate::error::CrmApiResult;
use crate::models::{Deal, DealChanges, NewDeal};
use crate::repositories::traits::DealRepository;

const WITH_CONTACT: &str = "*, contacts(id, name, phone, email)";

/// Deal repository backed by the `deals` table.
pub struct RestDealRepository {
    table: ScopedTable<Deal>,
}

impl RestDealRepository {
    pub fn new(client: Arc<dyn AsyncCrmClient>, user_id: impl Into<String>) -> Self {
        Self {
            table: ScopedTable::new(client, user_id),
        }
    }

    fn newest_first(&self) -> Query {
        self.table
            .query()
            .select(WITH_CONTACT)
            .order("created_at", false)
    }
}

#[async_trait]
impl DealRepository for RestDealRepository {
    async fn list(&self) -> CrmApiResult<Vec<Deal>> {
        self.table.select(self.newest_first()).await
    }

    async fn recent(&self, limit: usize) -> CrmApiResult<Vec<Deal>> {
        self.table.select(self.newest_first().limit(limit)).await
    }

    async fn get(&self, id: &str) -> CrmApiResult<Deal> {
        self.table
            .select_one(self.table.by_id(id).select(WITH_CONTACT))
            .await
    }

    async fn create(&self, deal: &NewDeal) -> CrmApiResult<Deal> {
        self.table.insert_one(deal).await
    }

    async fn create_many(&self, deals: &[NewDeal]) -> CrmApiResult<Vec<Deal>> {
        self.table.insert(deals).await
    }

    async fn update(&self, id: &str, changes: &DealChanges) -> CrmApiResult<Deal> {
        self.table.update(id, changes).await
    }

    async fn delete(&self, id: &str) -> CrmApiResult<()> {
        self.table.delete(id).await
    }

    async fn count(&self) -> CrmApiResult<u64> {
        self.table.count(self.table.query()).await
    }
}
