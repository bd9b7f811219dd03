//! Reminder service layer.
//!
//! Business logic for reminder management and the list filters.

use super::form;
use crate::domain::calendar_date;
use crate::error::CrmApiResult;
use crate::models::{NewReminder, Reminder, ReminderChanges, ReminderPriority};
use crate::repositories::ReminderRepository;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use schemars::JsonSchema;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;

/// List filter for reminders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReminderFilter {
    /// Every reminder
    #[default]
    All,
    /// Not completed
    Pending,
    /// Completed
    Completed,
    /// Not completed and due today
    Today,
    /// Not completed and due before today
    Overdue,
}

impl FromStr for ReminderFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ReminderFilter::Pending),
            "completed" => Ok(ReminderFilter::Completed),
            "today" => Ok(ReminderFilter::Today),
            "overdue" => Ok(ReminderFilter::Overdue),
            _ => Ok(ReminderFilter::All), // Default to All for unknown values
        }
    }
}

impl ReminderFilter {
    /// Whether `reminder` belongs in this view on calendar day `today`.
    pub fn matches(&self, reminder: &Reminder, today: NaiveDate) -> bool {
        let due = calendar_date(&reminder.due_date);
        match self {
            ReminderFilter::All => true,
            ReminderFilter::Pending => !reminder.is_completed,
            ReminderFilter::Completed => reminder.is_completed,
            ReminderFilter::Today => !reminder.is_completed && due == Some(today),
            ReminderFilter::Overdue => !reminder.is_completed && due.is_some_and(|d| d < today),
        }
    }
}

/// Reminder form as submitted by a caller.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ReminderForm {
    /// Reminder title (required)
    pub title: Option<String>,
    /// Details
    pub description: Option<String>,
    /// Due date or date-time (required)
    pub due_date: Option<String>,
    /// low, medium or high (default: medium)
    pub priority: Option<String>,
    /// Linked contact id
    pub contact_id: Option<String>,
    /// Linked deal id
    pub deal_id: Option<String>,
}

/// Reminder service trait for business operations.
#[async_trait]
pub trait ReminderService: Send + Sync {
    async fn list_reminders(&self, filter: ReminderFilter) -> CrmApiResult<Vec<Reminder>>;

    async fn create_reminder(&self, form: ReminderForm) -> CrmApiResult<Reminder>;

    async fn update_reminder(&self, id: &str, form: ReminderForm) -> CrmApiResult<Reminder>;

    async fn toggle_reminder_complete(&self, id: &str, completed: bool)
        -> CrmApiResult<Reminder>;

    async fn delete_reminder(&self, id: &str) -> CrmApiResult<()>;
}

/// Default implementation of ReminderService.
pub struct ReminderServiceImpl {
    repository: Arc<dyn ReminderRepository>,
}

impl ReminderServiceImpl {
    pub fn new(repository: Arc<dyn ReminderRepository>) -> Self {
        Self { repository }
    }

    fn required_fields(form: &ReminderForm) -> CrmApiResult<[String; 2]> {
        form::require(
            [&form.title, &form.due_date],
            "Title and due date are required",
        )
    }
}

#[async_trait]
impl ReminderService for ReminderServiceImpl {
    async fn list_reminders(&self, filter: ReminderFilter) -> CrmApiResult<Vec<Reminder>> {
        let today = Utc::now().date_naive();
        let reminders = self.repository.list().await?;
        Ok(reminders
            .into_iter()
            .filter(|r| filter.matches(r, today))
            .collect())
    }

    async fn create_reminder(&self, form: ReminderForm) -> CrmApiResult<Reminder> {
        let [title, due_date] = Self::required_fields(&form)?;
        let reminder = NewReminder {
            contact_id: form::reference(&form.contact_id)?,
            deal_id: form::reference(&form.deal_id)?,
            title,
            description: form::text(&form.description),
            due_date,
            is_completed: false,
            priority: form::choice(&form.priority, ReminderPriority::Medium)?,
        };
        let created = self.repository.create(&reminder).await?;
        tracing::info!("Created reminder {} due {}", created.id, created.due_date);
        Ok(created)
    }

    async fn update_reminder(&self, id: &str, form: ReminderForm) -> CrmApiResult<Reminder> {
        let id = form::record_id(id)?;
        let [title, due_date] = Self::required_fields(&form)?;
        let changes = ReminderChanges {
            contact_id: Some(form::reference(&form.contact_id)?),
            title: Some(title),
            description: Some(form::text(&form.description)),
            due_date: Some(due_date),
            priority: form::optional_choice(&form.priority)?,
            updated_at: Some(form::now_iso()),
            ..Default::default()
        };
        let updated = self.repository.update(&id, &changes).await?;
        tracing::info!("Updated reminder {}", id);
        Ok(updated)
    }

    async fn toggle_reminder_complete(
        &self,
        id: &str,
        completed: bool,
    ) -> CrmApiResult<Reminder> {
        let id = form::record_id(id)?;
        let changes = ReminderChanges {
            is_completed: Some(completed),
            updated_at: Some(form::now_iso()),
            ..Default::default()
        };
        self.repository.update(&id, &changes).await
    }

    async fn delete_reminder(&self, id: &str) -> CrmApiResult<()> {
        let id = form::record_id(id)?;
        self.repository.delete(&id).await?;
        tracing::info!("Deleted reminder {}", id);
        Ok(())
    }
}
