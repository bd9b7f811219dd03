use async_trait::async_trait;
use std::sync::Arc;

use super::scoped_table::ScopedTable;
use crate::client::AsyncCrmClient;
use crate::error::CrmApiResult;
use crate::models::{Contact, ContactChanges, NewContact};
use crate::repositories::traits::ContactRepository;

const SEARCH_COLUMNS: &[&str] = &["name", "email", "phone", "company"];

/// Contact repository backed by the `contacts` table.
pub struct RestContactRepository {
    table: ScopedTable<Contact>,
}

impl RestContactRepository {
    /// Create a repository that only sees `user_id`'s contacts.
    pub fn new(client: Arc<dyn AsyncCrmClient>, user_id: impl Into<String>) -> Self {
        Self {
            table: ScopedTable::new(client, user_id),
        }
    }
}

#[async_trait]
impl ContactRepository for RestContactRepository {
    async fn list(&self) -> CrmApiResult<Vec<Contact>> {
        self.table
            .select(self.table.query().select("*").order("created_at", false))
            .await
    }

    async fn list_by_name(&self) -> CrmApiResult<Vec<Contact>> {
        self.table
            .select(self.table.query().select("*").order("name", true))
            .await
    }

    async fn get(&self, id: &str) -> CrmApiResult<Contact> {
        self.table.select_one(self.table.by_id(id).select("*")).await
    }

    async fn search(&self, term: &str, limit: usize) -> CrmApiResult<Vec<Contact>> {
        let query = self
            .table
            .query()
            .select("*")
            .or_ilike(SEARCH_COLUMNS, term)
            .order("name", true)
            .limit(limit);
        self.table.select(query).await
    }

    async fn create(&self, contact: &NewContact) -> CrmApiResult<Contact> {
        self.table.insert_one(contact).await
    }

    async fn create_many(&self, contacts: &[NewContact]) -> CrmApiResult<Vec<Contact>> {
        self.table.insert(contacts).await
    }

    async fn update(&self, id: &str, changes: &ContactChanges) -> CrmApiResult<Contact> {
        self.table.update(id, changes).await
    }

    async fn delete(&self, id: &str) -> CrmApiResult<()> {
        self.table.delete(id).await
    }

    async fn count(&self) -> CrmApiResult<u64> {
        self.table.count(self.table.query()).await
    }
}
