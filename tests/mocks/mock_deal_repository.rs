use super::mock_table::MockTable;
use async_trait::async_trait;
use crm_mcp_server::error::CrmApiResult;
use crm_mcp_server::models::{Deal, DealChanges, NewDeal};
use crm_mcp_server::repositories::DealRepository;
use std::ops::Deref;

/// Mock deal repository for testing.
#[derive(Clone)]
pub struct MockDealRepository {
    table: MockTable,
}

#[allow(dead_code)]
impl MockDealRepository {
    pub fn new() -> Self {
        Self {
            table: MockTable::new("deal"),
        }
    }

    /// Stored deals in insertion order.
    pub fn all(&self) -> Vec<Deal> {
        self.table.select(|_| true).unwrap()
    }
}

impl Default for MockDealRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for MockDealRepository {
    type Target = MockTable;

    fn deref(&self) -> &MockTable {
        &self.table
    }
}

#[async_trait]
impl DealRepository for MockDealRepository {
    async fn list(&self) -> CrmApiResult<Vec<Deal>> {
        self.track_call("list");
        self.table.newest_first()
    }

    async fn recent(&self, limit: usize) -> CrmApiResult<Vec<Deal>> {
        self.track_call("recent");
        let mut deals: Vec<Deal> = self.table.newest_first()?;
        deals.truncate(limit);
        Ok(deals)
    }

    async fn get(&self, id: &str) -> CrmApiResult<Deal> {
        self.track_call("get");
        self.table.get(id)
    }

    async fn create(&self, deal: &NewDeal) -> CrmApiResult<Deal> {
        self.track_call("create");
        Ok(self.table.insert(std::slice::from_ref(deal))?.remove(0))
    }

    async fn create_many(&self, deals: &[NewDeal]) -> CrmApiResult<Vec<Deal>> {
        self.track_call("create_many");
        self.table.insert(deals)
    }

    async fn update(&self, id: &str, changes: &DealChanges) -> CrmApiResult<Deal> {
        self.track_call("update");
        self.table.update(id, changes)
    }

    async fn delete(&self, id: &str) -> CrmApiResult<()> {
        self.track_call("delete");
        self.table.delete(id)
    }

    async fn count(&self) -> CrmApiResult<u64> {
        self.track_call("count");
        Ok(self.table.len() as u64)
    }
}
