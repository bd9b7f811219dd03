use super::mock_table::MockTable;
use async_trait::async_trait;
use crm_mcp_server::error::CrmApiResult;
use crm_mcp_server::models::{Activity, NewActivity};
use crm_mcp_server::repositories::ActivityRepository;
use serde_json::Value;
use std::ops::Deref;

/// Mock activity repository for testing.
#[derive(Clone)]
pub struct MockActivityRepository {
    table: MockTable,
}

impl MockActivityRepository {
    pub fn new() -> Self {
        Self {
            table: MockTable::new("activity"),
        }
    }
}

impl Default for MockActivityRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for MockActivityRepository {
    type Target = MockTable;

    fn deref(&self) -> &MockTable {
        &self.table
    }
}

#[async_trait]
impl ActivityRepository for MockActivityRepository {
    async fn recent(&self, limit: usize) -> CrmApiResult<Vec<Activity>> {
        self.track_call("recent");
        let mut activity: Vec<Activity> = self.table.newest_first()?;
        activity.truncate(limit);
        Ok(activity)
    }

    async fn for_contact(&self, contact_id: &str) -> CrmApiResult<Vec<Activity>> {
        self.track_call("for_contact");
        let mut activity: Vec<Activity> = self
            .table
            .select(|row| row.get("contact_id").and_then(Value::as_str) == Some(contact_id))?;
        activity.reverse();
        Ok(activity)
    }

    async fn create(&self, activity: &NewActivity) -> CrmApiResult<Activity> {
        self.track_call("create");
        Ok(self.table.insert(std::slice::from_ref(activity))?.remove(0))
    }

    async fn delete(&self, id: &str) -> CrmApiResult<()> {
        self.track_call("delete");
        self.table.delete(id)
    }
}
