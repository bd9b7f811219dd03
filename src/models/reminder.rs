//! Reminder rows and payloads.

use super::{string_enum, ContactSummary, Table};
use serde::{Deserialize, Serialize};

string_enum! {
    /// How urgent a reminder is.
    #[derive(Default)]
    ReminderPriority, "reminder priority" {
        Low => ("low", "Low"),
        #[default]
        Medium => ("medium", "Medium"),
        High => ("high", "High"),
    }
}

/// A dated follow-up, optionally linked to a contact or deal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reminder {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub contact_id: Option<String>,
    #[serde(default)]
    pub deal_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub due_date: String,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub priority: ReminderPriority,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contacts: Option<ContactSummary>,
}

impl Reminder {
    pub fn contact_name(&self) -> Option<&str> {
        self.contacts.as_ref().map(|c| c.name.as_str())
    }
}

impl Table for Reminder {
    const NAME: &'static str = "reminders";
}

/// Insert payload for a reminder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NewReminder {
    pub contact_id: Option<String>,
    pub deal_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub due_date: String,
    pub is_completed: bool,
    pub priority: ReminderPriority,
}

/// Columns written by a reminder update.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct ReminderChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<ReminderPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reminder_defaults() {
        let reminder: Reminder = serde_json::from_value(json!({
            "id": "r1",
            "user_id": "u1",
            "title": "Call back",
            "due_date": "2024-03-15T09:00:00Z",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert!(!reminder.is_completed);
        assert_eq!(reminder.priority, ReminderPriority::Medium);
        assert_eq!(reminder.contact_name(), None);
    }

    #[test]
    fn test_new_reminder_serialization() {
        let reminder = NewReminder {
            title: "Follow up".into(),
            due_date: "2024-03-15".into(),
            priority: ReminderPriority::High,
            ..Default::default()
        };
        let value = serde_json::to_value(&reminder).unwrap();
        assert_eq!(value["priority"], "high");
        assert_eq!(value["is_completed"], false);
        assert!(value["contact_id"].is_null());
    }
}
