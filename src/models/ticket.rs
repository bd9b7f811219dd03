//! Support tickets and their message threads.

use super::{null_as_default, string_enum, ContactSummary, Table};
use serde::{Deserialize, Serialize};

string_enum! {
    /// Where a ticket is in its lifecycle.
    #[derive(Default)]
    TicketStatus, "ticket status" {
        #[default]
        Open => ("open", "Open"),
        InProgress => ("in_progress", "In Progress"),
        Waiting => ("waiting", "Waiting"),
        Resolved => ("resolved", "Resolved"),
        Closed => ("closed", "Closed"),
    }
}

impl TicketStatus {
    /// Resolved and closed tickets carry a `resolved_at` stamp.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TicketStatus::Resolved | TicketStatus::Closed)
    }
}

string_enum! {
    #[derive(Default)]
    TicketPriority, "ticket priority" {
        Low => ("low", "Low"),
        #[default]
        Medium => ("medium", "Medium"),
        High => ("high", "High"),
        Urgent => ("urgent", "Urgent"),
    }
}

string_enum! {
    #[derive(Default)]
    TicketCategory, "ticket category" {
        #[default]
        General => ("general", "General"),
        Billing => ("billing", "Billing"),
        Technical => ("technical", "Technical"),
        Sales => ("sales", "Sales"),
        Complaint => ("complaint", "Complaint"),
        Inquiry => ("inquiry", "Inquiry"),
    }
}

/// A customer support ticket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ticket {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub contact_id: Option<String>,
    pub ticket_number: String,
    pub subject: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TicketStatus,
    #[serde(default)]
    pub priority: TicketPriority,
    #[serde(default)]
    pub category: TicketCategory,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub resolved_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contacts: Option<ContactSummary>,
}

impl Table for Ticket {
    const NAME: &'static str = "tickets";
}

/// Insert payload for a ticket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NewTicket {
    pub contact_id: Option<String>,
    pub ticket_number: String,
    pub subject: String,
    pub description: Option<String>,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub category: TicketCategory,
    pub assigned_to: Option<String>,
}

/// Columns written by a ticket update.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct TicketChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TicketPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<TicketCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// A reply on a ticket thread. Internal messages are staff-only notes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TicketMessage {
    pub id: String,
    pub ticket_id: String,
    pub user_id: String,
    pub message: String,
    #[serde(default)]
    pub is_internal: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attachments: serde_json::Value,
    pub created_at: String,
}

impl Table for TicketMessage {
    const NAME: &'static str = "ticket_messages";
}

/// Insert payload for a ticket message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NewTicketMessage {
    pub ticket_id: String,
    pub message: String,
    pub is_internal: bool,
}
