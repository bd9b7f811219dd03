//! Deal rows and payloads.

use super::{string_enum, ContactSummary, Table};
use serde::{Deserialize, Serialize};

string_enum! {
    /// Pipeline stage of a deal. Any stage may follow any other.
    #[derive(Default)]
    DealStatus, "deal status" {
        #[default]
        New => ("new", "New"),
        Quoted => ("quoted", "Quoted"),
        Negotiating => ("negotiating", "Negotiating"),
        Won => ("won", "Won"),
        Lost => ("lost", "Lost"),
    }
}

/// A sales opportunity, optionally tied to a contact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Deal {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub contact_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub status: DealStatus,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub expected_close_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contacts: Option<ContactSummary>,
}

impl Deal {
    /// Name of the linked contact, if it was embedded.
    pub fn contact_name(&self) -> Option<&str> {
        self.contacts.as_ref().map(|c| c.name.as_str())
    }
}

impl Table for Deal {
    const NAME: &'static str = "deals";
}

/// Insert payload for a deal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NewDeal {
    pub contact_id: Option<String>,
    pub title: String,
    pub value: f64,
    pub status: DealStatus,
    pub description: Option<String>,
    pub expected_close_date: Option<String>,
}

/// Columns written by a deal update.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct DealChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DealStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_close_date: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}
