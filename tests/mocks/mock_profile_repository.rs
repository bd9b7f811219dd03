use super::mock_table::{MockTable, TEST_USER_ID};
use async_trait::async_trait;
use crm_mcp_server::error::CrmApiResult;
use crm_mcp_server::models::{Profile, ProfileChanges};
use crm_mcp_server::repositories::ProfileRepository;
use serde_json::json;
use std::ops::Deref;

/// Mock profile repository holding the signed-in user's row.
#[derive(Clone)]
pub struct MockProfileRepository {
    table: MockTable,
}

impl MockProfileRepository {
    pub fn new() -> Self {
        let table = MockTable::new("profile");
        table.seed(&json!({
            "id": TEST_USER_ID,
            "email": "owner@example.com",
            "full_name": "Ada Owner",
            "created_at": "2024-01-01T00:00:00.000Z",
            "updated_at": "2024-01-01T00:00:00.000Z"
        }));
        Self { table }
    }
}

impl Default for MockProfileRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for MockProfileRepository {
    type Target = MockTable;

    fn deref(&self) -> &MockTable {
        &self.table
    }
}

#[async_trait]
impl ProfileRepository for MockProfileRepository {
    async fn get(&self) -> CrmApiResult<Profile> {
        self.track_call("get");
        self.table.get(TEST_USER_ID)
    }

    async fn update(&self, changes: &ProfileChanges) -> CrmApiResult<Profile> {
        self.track_call("update");
        self.table.update(TEST_USER_ID, changes)
    }
}
