use super::mock_table::MockTable;
use async_trait::async_trait;
use crm_mcp_server::error::CrmApiResult;
use crm_mcp_server::models::{NewReminder, Reminder, ReminderChanges};
use crm_mcp_server::repositories::ReminderRepository;
use serde_json::Value;
use std::ops::Deref;

/// Mock reminder repository for testing.
#[derive(Clone)]
pub struct MockReminderRepository {
    table: MockTable,
}

#[allow(dead_code)]
impl MockReminderRepository {
    pub fn new() -> Self {
        Self {
            table: MockTable::new("reminder"),
        }
    }

    /// Stored reminders in insertion order.
    pub fn all(&self) -> Vec<Reminder> {
        self.table.select(|_| true).unwrap()
    }

    fn by_due_date(&self, open_from: Option<&str>) -> CrmApiResult<Vec<Reminder>> {
        let mut reminders: Vec<Reminder> = self.table.select(|row| match open_from {
            Some(from) => {
                row.get("is_completed").and_then(Value::as_bool) != Some(true)
                    && row
                        .get("due_date")
                        .and_then(Value::as_str)
                        .is_some_and(|due| due >= from)
            }
            None => true,
        })?;
        reminders.sort_by(|a, b| a.due_date.cmp(&b.due_date));
        Ok(reminders)
    }
}

impl Default for MockReminderRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for MockReminderRepository {
    type Target = MockTable;

    fn deref(&self) -> &MockTable {
        &self.table
    }
}

#[async_trait]
impl ReminderRepository for MockReminderRepository {
    async fn list(&self) -> CrmApiResult<Vec<Reminder>> {
        self.track_call("list");
        self.by_due_date(None)
    }

    async fn upcoming(&self, from: &str, limit: usize) -> CrmApiResult<Vec<Reminder>> {
        self.track_call("upcoming");
        let mut reminders = self.by_due_date(Some(from))?;
        reminders.truncate(limit);
        Ok(reminders)
    }

    async fn count_pending(&self) -> CrmApiResult<u64> {
        self.track_call("count_pending");
        let pending: Vec<Reminder> = self
            .table
            .select(|row| row.get("is_completed").and_then(Value::as_bool) != Some(true))?;
        Ok(pending.len() as u64)
    }

    async fn create(&self, reminder: &NewReminder) -> CrmApiResult<Reminder> {
        self.track_call("create");
        Ok(self.table.insert(std::slice::from_ref(reminder))?.remove(0))
    }

    async fn create_many(&self, reminders: &[NewReminder]) -> CrmApiResult<Vec<Reminder>> {
        self.track_call("create_many");
        self.table.insert(reminders)
    }

    async fn update(&self, id: &str, changes: &ReminderChanges) -> CrmApiResult<Reminder> {
        self.track_call("update");
        self.table.update(id, changes)
    }

    async fn delete(&self, id: &str) -> CrmApiResult<()> {
        self.track_call("delete");
        self.table.delete(id)
    }
}
