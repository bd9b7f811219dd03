//! Invoice service layer: numbering, line-item totals and paid stamping.

use super::form;
use crate::domain::parse_number_lenient;
use crate::error::CrmApiResult;
use crate::models::{Invoice, InvoiceChanges, InvoiceItem, InvoiceStatus, NewInvoice};
use crate::repositories::InvoiceRepository;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Invoice form as submitted by a caller.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct InvoiceForm {
    /// Invoice number, e.g. INV-004 (required unless auto_number is set)
    pub invoice_number: Option<String>,
    /// Fill a blank invoice number with the next free INV-### number
    #[serde(default)]
    pub auto_number: bool,
    /// Billed contact id
    pub contact_id: Option<String>,
    /// Related deal id
    pub deal_id: Option<String>,
    /// Due date (YYYY-MM-DD, required)
    pub due_date: Option<String>,
    /// draft, sent, paid, overdue or cancelled (default: draft)
    pub status: Option<String>,
    /// Notes printed on the invoice
    pub notes: Option<String>,
    /// Line items: an array (or JSON text of an array) of {description, quantity, price}
    pub items: Option<Value>,
    /// Tax rate in percent (default: 0)
    pub tax_rate: Option<String>,
}

/// Amount, tax and total derived from line items.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InvoiceTotals {
    pub amount: f64,
    pub tax: f64,
    pub total: f64,
}

impl InvoiceTotals {
    pub fn compute(items: &[InvoiceItem], tax_rate: f64) -> Self {
        let amount: f64 = items.iter().map(InvoiceItem::line_total).sum();
        let tax = amount * (tax_rate / 100.0);
        Self {
            amount,
            tax,
            total: amount + tax,
        }
    }
}

/// Billable line items from the form; anything unparsable is an empty list.
pub fn parse_items(raw: Option<&Value>) -> Vec<InvoiceItem> {
    let items: Vec<InvoiceItem> = match raw {
        Some(Value::String(text)) => serde_json::from_str(text).unwrap_or_default(),
        Some(value @ Value::Array(_)) => serde_json::from_value(value.clone()).unwrap_or_default(),
        _ => Vec::new(),
    };
    items.into_iter().filter(InvoiceItem::is_billable).collect()
}

/// `INV-` followed by the 1-based sequence number, padded to three digits.
pub fn format_invoice_number(existing: u64) -> String {
    format!("INV-{:03}", existing + 1)
}

/// Tax rate (whole percent) implied by a stored invoice, for edit forms.
pub fn tax_rate_of(invoice: &Invoice) -> f64 {
    if invoice.amount > 0.0 {
        (invoice.tax / invoice.amount * 100.0).round()
    } else {
        0.0
    }
}

/// `paid_date` column value for an invoice entering `status`.
fn paid_date_for(status: InvoiceStatus) -> Option<String> {
    (status == InvoiceStatus::Paid).then(form::now_iso)
}

/// Invoice service trait for business operations.
#[async_trait]
pub trait InvoiceService: Send + Sync {
    async fn list_invoices(&self) -> CrmApiResult<Vec<Invoice>>;

    async fn get_invoice(&self, id: &str) -> CrmApiResult<Invoice>;

    /// Next number in the user's `INV-###` sequence.
    async fn next_invoice_number(&self) -> CrmApiResult<String>;

    async fn create_invoice(&self, form: InvoiceForm) -> CrmApiResult<Invoice>;

    /// Rewrite items, totals, contact, notes; status and due date when given.
    async fn update_invoice(&self, id: &str, form: InvoiceForm) -> CrmApiResult<Invoice>;

    async fn update_invoice_status(&self, id: &str, status: &str) -> CrmApiResult<Invoice>;

    async fn delete_invoice(&self, id: &str) -> CrmApiResult<()>;
}

/// Default implementation of InvoiceService.
pub struct InvoiceServiceImpl {
    repository: Arc<dyn InvoiceRepository>,
}

impl InvoiceServiceImpl {
    pub fn new(repository: Arc<dyn InvoiceRepository>) -> Self {
        Self { repository }
    }

    fn items_and_totals(form: &InvoiceForm) -> (Vec<InvoiceItem>, InvoiceTotals) {
        let items = parse_items(form.items.as_ref());
        let tax_rate = parse_number_lenient(form.tax_rate.as_deref().unwrap_or_default());
        let totals = InvoiceTotals::compute(&items, tax_rate);
        (items, totals)
    }
}

#[async_trait]
impl InvoiceService for InvoiceServiceImpl {
    async fn list_invoices(&self) -> CrmApiResult<Vec<Invoice>> {
        self.repository.list().await
    }

    async fn get_invoice(&self, id: &str) -> CrmApiResult<Invoice> {
        let id = form::record_id(id)?;
        self.repository.get(&id).await
    }

    async fn next_invoice_number(&self) -> CrmApiResult<String> {
        let count = self.repository.count().await?;
        Ok(format_invoice_number(count))
    }

    async fn create_invoice(&self, mut form: InvoiceForm) -> CrmApiResult<Invoice> {
        if form.auto_number && form::text(&form.invoice_number).is_none() {
            form.invoice_number = Some(self.next_invoice_number().await?);
        }
        let [invoice_number, due_date] = form::require(
            [&form.invoice_number, &form.due_date],
            "Invoice number and due date are required",
        )?;
        let (items, totals) = Self::items_and_totals(&form);

        let invoice = NewInvoice {
            contact_id: form::reference(&form.contact_id)?,
            deal_id: form::reference(&form.deal_id)?,
            invoice_number,
            amount: totals.amount,
            tax: totals.tax,
            total: totals.total,
            status: form::choice(&form.status, InvoiceStatus::Draft)?,
            due_date,
            items,
            notes: form::text(&form.notes),
        };
        let created = self.repository.create(&invoice).await?;
        tracing::info!(
            "Created invoice {} ({}) total {:.2}",
            created.invoice_number,
            created.id,
            created.total
        );
        Ok(created)
    }

    async fn update_invoice(&self, id: &str, form: InvoiceForm) -> CrmApiResult<Invoice> {
        let id = form::record_id(id)?;
        let (items, totals) = Self::items_and_totals(&form);
        let status: Option<InvoiceStatus> = form::optional_choice(&form.status)?;

        let changes = InvoiceChanges {
            contact_id: Some(form::reference(&form.contact_id)?),
            amount: Some(totals.amount),
            tax: Some(totals.tax),
            total: Some(totals.total),
            status,
            due_date: form::text(&form.due_date),
            items: Some(items),
            notes: Some(form::text(&form.notes)),
            paid_date: status.map(paid_date_for),
            updated_at: Some(form::now_iso()),
        };
        let updated = self.repository.update(&id, &changes).await?;
        tracing::info!("Updated invoice {}", id);
        Ok(updated)
    }

    async fn update_invoice_status(&self, id: &str, status: &str) -> CrmApiResult<Invoice> {
        let id = form::record_id(id)?;
        let status: InvoiceStatus = status.parse()?;
        let changes = InvoiceChanges {
            status: Some(status),
            paid_date: Some(paid_date_for(status)),
            updated_at: Some(form::now_iso()),
            ..Default::default()
        };
        let updated = self.repository.update(&id, &changes).await?;
        tracing::info!("Invoice {} is now {}", id, status);
        Ok(updated)
    }

    async fn delete_invoice(&self, id: &str) -> CrmApiResult<()> {
        let id = form::record_id(id)?;
        self.repository.delete(&id).await?;
        tracing::info!("Deleted invoice {}", id);
        Ok(())
    }
}
