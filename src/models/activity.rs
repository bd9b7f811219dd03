//! Activity log entries.

use super::{string_enum, Table};
use serde::{Deserialize, Serialize};

string_enum! {
    /// Kind of interaction an activity records.
    #[derive(Default)]
    ActivityType, "activity type" {
        #[default]
        Note => ("note", "Note"),
        Call => ("call", "Call"),
        Email => ("email", "Email"),
        Meeting => ("meeting", "Meeting"),
        Whatsapp => ("whatsapp", "WhatsApp"),
        Other => ("other", "Other"),
    }
}

/// Something that happened with a contact or on a deal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub contact_id: Option<String>,
    #[serde(default)]
    pub deal_id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: ActivityType,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: String,
}

impl Table for Activity {
    const NAME: &'static str = "activities";
}

/// Insert payload for an activity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NewActivity {
    pub contact_id: Option<String>,
    pub deal_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub title: String,
    pub description: Option<String>,
}
