use super::mock_table::MockTable;
use async_trait::async_trait;
use crm_mcp_server::error::CrmApiResult;
use crm_mcp_server::models::{Contact, ContactChanges, NewContact};
use crm_mcp_server::repositories::ContactRepository;
use serde_json::Value;
use std::ops::Deref;

/// Mock contact repository for testing.
///
/// Provides an in-memory implementation of ContactRepository that can be
/// seeded with test data and tracks method calls for verification.
#[derive(Clone)]
pub struct MockContactRepository {
    table: MockTable,
}

#[allow(dead_code)]
impl MockContactRepository {
    pub fn new() -> Self {
        Self {
            table: MockTable::new("contact"),
        }
    }

    /// Stored contacts in insertion order.
    pub fn all(&self) -> Vec<Contact> {
        self.table.select(|_| true).unwrap()
    }

    /// Add contacts through the insert path and return the stored rows.
    pub fn add_contacts(&self, contacts: &[NewContact]) -> Vec<Contact> {
        self.table.insert(contacts).unwrap()
    }
}

impl Default for MockContactRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for MockContactRepository {
    type Target = MockTable;

    fn deref(&self) -> &MockTable {
        &self.table
    }
}

#[async_trait]
impl ContactRepository for MockContactRepository {
    async fn list(&self) -> CrmApiResult<Vec<Contact>> {
        self.track_call("list");
        self.table.newest_first()
    }

    async fn list_by_name(&self) -> CrmApiResult<Vec<Contact>> {
        self.track_call("list_by_name");
        let mut contacts: Vec<Contact> = self.table.select(|_| true)?;
        contacts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(contacts)
    }

    async fn get(&self, id: &str) -> CrmApiResult<Contact> {
        self.track_call("get");
        self.table.get(id)
    }

    async fn search(&self, term: &str, limit: usize) -> CrmApiResult<Vec<Contact>> {
        self.track_call("search");
        let term = term.to_lowercase();
        let mut found: Vec<Contact> = self.table.select(|row| {
            ["name", "email", "phone", "company"].iter().any(|column| {
                row.get(*column)
                    .and_then(Value::as_str)
                    .is_some_and(|v| v.to_lowercase().contains(&term))
            })
        })?;
        found.truncate(limit);
        Ok(found)
    }

    async fn create(&self, contact: &NewContact) -> CrmApiResult<Contact> {
        self.track_call("create");
        Ok(self.table.insert(std::slice::from_ref(contact))?.remove(0))
    }

    async fn create_many(&self, contacts: &[NewContact]) -> CrmApiResult<Vec<Contact>> {
        self.track_call("create_many");
        self.table.insert(contacts)
    }

    async fn update(&self, id: &str, changes: &ContactChanges) -> CrmApiResult<Contact> {
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
