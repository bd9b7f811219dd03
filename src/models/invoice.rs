//! Invoice rows, line items and payloads.

use super::{null_as_default, string_enum, ContactSummary, Table};
use serde::{Deserialize, Serialize};

string_enum! {
    /// Billing state of an invoice.
    #[derive(Default)]
    InvoiceStatus, "invoice status" {
        #[default]
        Draft => ("draft", "Draft"),
        Sent => ("sent", "Sent"),
        Paid => ("paid", "Paid"),
        Overdue => ("overdue", "Overdue"),
        Cancelled => ("cancelled", "Cancelled"),
    }
}

/// One billed line, stored inside the invoice's `items` JSON column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct InvoiceItem {
    pub description: String,
    pub quantity: f64,
    pub price: f64,
}

impl InvoiceItem {
    pub fn line_total(&self) -> f64 {
        self.quantity * self.price
    }

    /// Lines without a description or with no quantity are not billed.
    pub fn is_billable(&self) -> bool {
        !self.description.trim().is_empty() && self.quantity > 0.0
    }
}

/// An invoice issued to a contact, optionally for a deal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invoice {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub contact_id: Option<String>,
    #[serde(default)]
    pub deal_id: Option<String>,
    pub invoice_number: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub tax: f64,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub status: InvoiceStatus,
    pub due_date: String,
    #[serde(default)]
    pub paid_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<InvoiceItem>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contacts: Option<ContactSummary>,
}

impl Invoice {
    /// Name of the billed contact, if it was embedded.
    pub fn customer_name(&self) -> Option<&str> {
        self.contacts.as_ref().map(|c| c.name.as_str())
    }
}

impl Table for Invoice {
    const NAME: &'static str = "invoices";
}

/// Insert payload for an invoice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NewInvoice {
    pub contact_id: Option<String>,
    pub deal_id: Option<String>,
    pub invoice_number: String,
    pub amount: f64,
    pub tax: f64,
    pub total: f64,
    pub status: InvoiceStatus,
    pub due_date: String,
    pub items: Vec<InvoiceItem>,
    pub notes: Option<String>,
}

/// Columns written by an invoice update.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct InvoiceChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InvoiceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<InvoiceItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_invoice_items_from_json_column() {
        let invoice: Invoice = serde_json::from_value(json!({
            "id": "i1",
            "user_id": "u1",
            "invoice_number": "INV-001",
            "amount": 200,
            "tax": 20,
            "total": 220,
            "status": "sent",
            "due_date": "2024-03-15",
            "items": [{ "description": "Design", "quantity": 2, "price": 100 }],
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(invoice.items.len(), 1);
        assert_eq!(invoice.items[0].line_total(), 200.0);
        assert_eq!(invoice.status, InvoiceStatus::Sent);
    }

    #[test]
    fn test_invoice_null_items() {
        let invoice: Invoice = serde_json::from_value(json!({
            "id": "i1",
            "user_id": "u1",
            "invoice_number": "INV-002",
            "due_date": "2024-03-15",
            "items": null,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert!(invoice.items.is_empty());
        assert_eq!(invoice.status, InvoiceStatus::Draft);
    }

    #[test]
    fn test_billable_items() {
        let blank = InvoiceItem {
            description: "  ".into(),
            quantity: 1.0,
            price: 10.0,
        };
        let zero = InvoiceItem {
            description: "Hosting".into(),
            quantity: 0.0,
            price: 10.0,
        };
        assert!(!blank.is_billable());
        assert!(!zero.is_billable());
    }

    #[test]
    fn test_clearing_paid_date_emits_null() {
        let changes = InvoiceChanges {
            status: Some(InvoiceStatus::Sent),
            paid_date: Some(None),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&changes).unwrap(),
            json!({ "status": "sent", "paid_date": null })
        );
    }
}
