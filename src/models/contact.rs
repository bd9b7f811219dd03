//! Contact rows and payloads.

use super::{null_as_default, Table};
use serde::{Deserialize, Serialize};

/// A person or company the user keeps track of.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub phone: String,
    #[serde(default)]
    pub whatsapp: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Table for Contact {
    const NAME: &'static str = "contacts";
}

/// Contact columns embedded in deal, invoice, reminder and ticket selects
/// (`contacts(name, phone, ...)`). Only the requested columns are present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ContactSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

/// Insert payload for a contact. `user_id` is stamped by the repository.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NewContact {
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub whatsapp: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
}

/// Columns written by a contact update.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct ContactChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<NewContact> for ContactChanges {
    fn from(contact: NewContact) -> Self {
        Self {
            name: Some(contact.name),
            email: Some(contact.email),
            phone: Some(contact.phone),
            whatsapp: Some(contact.whatsapp),
            company: Some(contact.company),
            notes: Some(contact.notes),
            tags: Some(contact.tags),
            updated_at: None,
        }
    }
}
