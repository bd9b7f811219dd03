use async_trait::async_trait;
use std::sync::Arc;

use super::scoped_table::ScopedTable;
use crate::client::AsyncCrmClient;
use crate::error::CrmApiResult;
use crate::models::{NewReminder, Reminder, ReminderChanges};
use crate::repositories::traits::ReminderRepository;

/// Reminder repository backed by the `reminders` table.
pub struct RestReminderRepository {
    table: ScopedTable<Reminder>,
}

impl RestReminderRepository {
    pub fn new(client: Arc<dyn AsyncCrmClient>, user_id: impl Into<String>) -> Self {
        Self {
            table: ScopedTable::new(client, user_id),
        }
    }
}

#[async_trait]
impl ReminderRepository for RestReminderRepository {
    async fn list(&self) -> CrmApiResult<Vec<Reminder>> {
        let query = self
            .table
            .query()
            .select("*, contacts(id, name, phone)")
            .order("due_date", true);
        self.table.select(query).await
    }

    async fn upcoming(&self, from: &str, limit: usize) -> CrmApiResult<Vec<Reminder>> {
        let query = self
            .table
            .query()
            .select("*, contacts(name)")
            .eq("is_completed", false)
            .gte("due_date", from)
            .order("due_date", true)
            .limit(limit);
        self.table.select(query).await
    }

    async fn count_pending(&self) -> CrmApiResult<u64> {
        self.table
            .count(self.table.query().eq("is_completed", false))
            .await
    }

    async fn create(&self, reminder: &NewReminder) -> CrmApiResult<Reminder> {
        self.table.insert_one(reminder).await
    }

    async fn create_many(&self, reminders: &[NewReminder]) -> CrmApiResult<Vec<Reminder>> {
        self.table.insert(reminders).await
    }

    async fn update(&self, id: &str, changes: &ReminderChanges) -> CrmApiResult<Reminder> {
        self.table.update(id, changes).await
    }

    async fn delete(&self, id: &str) -> CrmApiResult<()> {
        self.table.delete(id).await
    }
}
