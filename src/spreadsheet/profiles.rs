//! Per-entity import rules: columns, template examples and row conversion.

use super::mapping::{ColumnMapping, MappedRow, Transform};
use crate::domain::parse_timestamp;
use crate::matching::ContactMatcher;
use crate::models::{
    string_enum, Contact, DealStatus, InvoiceStatus, NewContact, NewDeal, NewInvoice,
    NewReminder, ReminderPriority,
};
use chrono::SecondsFormat;

string_enum! {
    /// Record kinds that can be imported from and exported to spreadsheets.
    ImportEntity, "entity" {
        Contacts => ("contacts", "Contacts"),
        Deals => ("deals", "Deals"),
        Invoices => ("invoices", "Invoices"),
        Reminders => ("reminders", "Reminders"),
    }
}

/// A template column and the example value shown under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateColumn {
    pub label: &'static str,
    pub example: &'static str,
}

const fn example(label: &'static str, example: &'static str) -> TemplateColumn {
    TemplateColumn { label, example }
}

/// Columns and template of one importable entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportProfile {
    pub entity: ImportEntity,
    pub columns: &'static [ColumnMapping],
    pub template: &'static [TemplateColumn],
}

static CONTACTS: ImportProfile = ImportProfile {
    entity: ImportEntity::Contacts,
    columns: &[
        ColumnMapping::new("Name", "name", "Name").required(),
        ColumnMapping::new("Phone", "phone", "Phone").required(),
        ColumnMapping::new("Email", "email", "Email"),
        ColumnMapping::new("WhatsApp", "whatsapp", "WhatsApp"),
        ColumnMapping::new("Company", "company", "Company"),
        ColumnMapping::new("Notes", "notes", "Notes"),
        ColumnMapping::new("Tags", "tags", "Tags").transform(Transform::TagList(',')),
    ],
    template: &[
        example("Name", "John Doe"),
        example("Phone", "+1234567890"),
        example("Email", "john@example.com"),
        example("WhatsApp", "+1234567890"),
        example("Company", "Acme Inc"),
        example("Notes", "Met at conference"),
        example("Tags", "client,vip"),
    ],
};

static DEALS: ImportProfile = ImportProfile {
    entity: ImportEntity::Deals,
    columns: &[
        ColumnMapping::new("Title", "title", "Title").required(),
        ColumnMapping::new("Value", "value", "Value").transform(Transform::Number),
        ColumnMapping::new("Status", "status", "Status"),
        ColumnMapping::new("Description", "description", "Description"),
        ColumnMapping::new("Expected Close Date", "expected_close_date", "Close Date"),
        ColumnMapping::new("Contact", "contact", "Contact"),
        ColumnMapping::new("Company", "company", "Company"),
    ],
    template: &[
        example("Title", "Website Redesign"),
        example("Value", "5000"),
        example("Status", "new"),
        example("Description", "Full website overhaul"),
        example("Expected Close Date", "2024-03-15"),
    ],
};

static INVOICES: ImportProfile = ImportProfile {
    entity: ImportEntity::Invoices,
    columns: &[
        ColumnMapping::new("Invoice Number", "invoice_number", "Invoice #").required(),
        ColumnMapping::new("Amount", "amount", "Amount").transform(Transform::Number),
        ColumnMapping::new("Tax", "tax", "Tax").transform(Transform::Number),
        ColumnMapping::new("Due Date", "due_date", "Due Date").required(),
        ColumnMapping::new("Status", "status", "Status"),
        ColumnMapping::new("Notes", "notes", "Notes"),
        ColumnMapping::new("Customer", "customer", "Customer"),
        ColumnMapping::new("Company", "company", "Company"),
    ],
    template: &[
        example("Invoice Number", "INV-001"),
        example("Amount", "1000"),
        example("Tax", "100"),
        example("Due Date", "2024-03-15"),
        example("Status", "draft"),
        example("Notes", "Payment terms: Net 30"),
    ],
};

static REMINDERS: ImportProfile = ImportProfile {
    entity: ImportEntity::Reminders,
    columns: &[
        ColumnMapping::new("Title", "title", "Title").required(),
        ColumnMapping::new("Description", "description", "Description"),
        ColumnMapping::new("Due Date", "due_date", "Due Date").required(),
        ColumnMapping::new("Priority", "priority", "Priority"),
    ],
    template: &[
        example("Title", "Follow up call"),
        example("Description", "Discuss proposal"),
        example("Due Date", "2024-03-15"),
        example("Priority", "high"),
    ],
};

impl ImportEntity {
    pub fn profile(&self) -> &'static ImportProfile {
        match self {
            ImportEntity::Contacts => &CONTACTS,
            ImportEntity::Deals => &DEALS,
            ImportEntity::Invoices => &INVOICES,
            ImportEntity::Reminders => &REMINDERS,
        }
    }

    /// Pseudo-column holding a contact name to resolve, if the entity has one.
    pub fn contact_column(&self) -> Option<&'static str> {
        match self {
            ImportEntity::Deals => Some("contact"),
            ImportEntity::Invoices => Some("customer"),
            _ => None,
        }
    }
}

/// Resolves contact names found in rows to contact ids.
pub struct ContactResolver<'a> {
    contacts: &'a [Contact],
    matcher: ContactMatcher,
    threshold: u8,
}

impl<'a> ContactResolver<'a> {
    pub fn new(contacts: &'a [Contact], threshold: u8) -> Self {
        Self {
            contacts,
            matcher: ContactMatcher::new(),
            threshold,
        }
    }

    /// `company` comes from the same row and lifts fuzzy matches at that company.
    pub fn resolve(&mut self, name: Option<&str>, company: Option<&str>) -> Option<String> {
        let name = name?;
        let found = self
            .matcher
            .resolve(name, company, self.contacts, self.threshold);
        match &found {
            Some(m) => tracing::debug!(
                "Resolved '{}' to contact {} ({}%)",
                name,
                m.contact.id,
                m.confidence
            ),
            None => tracing::debug!("No contact matches '{}'", name),
        }
        found.map(|m| m.contact.id)
    }
}

pub fn contact_from_row(row: &MappedRow) -> Result<NewContact, String> {
    let (Some(name), Some(phone)) = (row.text("name"), row.text("phone")) else {
        return Err("Name and phone are required".to_string());
    };
    Ok(NewContact {
        name,
        email: row.text("email"),
        phone,
        whatsapp: row.text("whatsapp"),
        company: row.text("company"),
        notes: row.text("notes"),
        tags: row.tags("tags"),
    })
}

pub fn deal_from_row(row: &MappedRow, resolver: &mut ContactResolver) -> Result<NewDeal, String> {
    let Some(title) = row.text("title") else {
        return Err("Title is required".to_string());
    };
    let expected_close_date = row
        .text("expected_close_date")
        .and_then(|v| parse_timestamp(&v))
        .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Millis, true));
    Ok(NewDeal {
        contact_id: resolver.resolve(
            row.text("contact").as_deref(),
            row.text("company").as_deref(),
        ),
        title,
        value: row.number("value").unwrap_or_default(),
        status: normalized::<DealStatus>(row, "status"),
        description: row.text("description"),
        expected_close_date,
    })
}

pub fn invoice_from_row(
    row: &MappedRow,
    resolver: &mut ContactResolver,
) -> Result<NewInvoice, String> {
    let (Some(invoice_number), Some(due_date)) = (row.text("invoice_number"), row.text("due_date"))
    else {
        return Err("Invoice number and due date are required".to_string());
    };
    let amount = row.number("amount").unwrap_or_default();
    let tax = row.number("tax").unwrap_or_default();
    Ok(NewInvoice {
        contact_id: resolver.resolve(
            row.text("customer").as_deref(),
            row.text("company").as_deref(),
        ),
        deal_id: None,
        invoice_number,
        amount,
        tax,
        total: amount + tax,
        status: normalized::<InvoiceStatus>(row, "status"),
        due_date,
        items: Vec::new(),
        notes: row.text("notes"),
    })
}

pub fn reminder_from_row(row: &MappedRow) -> Result<NewReminder, String> {
    let (Some(title), Some(due_date)) = (row.text("title"), row.text("due_date")) else {
        return Err("Title and due date are required".to_string());
    };
    Ok(NewReminder {
        contact_id: None,
        deal_id: None,
        title,
        description: row.text("description"),
        due_date,
        is_completed: false,
        priority: normalized::<ReminderPriority>(row, "priority"),
    })
}

/// Enum column parsed case-insensitively; unknown or blank is the default.
fn normalized<T>(row: &MappedRow, column: &str) -> T
where
    T: std::str::FromStr + Default,
{
    row.text(column)
        .and_then(|v| v.parse().ok())
        .unwrap_or_default()
}
