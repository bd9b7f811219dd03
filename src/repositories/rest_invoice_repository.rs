use async_trait::async_trait;
use std::sync::Arc;

use super::scoped_table::ScopedTable;
use crate::client::AsyncCrmClient;
use crate::error::CrmApiResult;
use crate::models::{Invoice, InvoiceChanges, NewInvoice};
use crate::repositories::traits::InvoiceRepository;

/// Invoice repository backed by the `invoices` table.
pub struct RestInvoiceRepository {
    table: ScopedTable<Invoice>,
}

impl RestInvoiceRepository {
    pub fn new(client: Arc<dyn AsyncCrmClient>, user_id: impl Into<String>) -> Self {
        Self {
            table: ScopedTable::new(client, user_id),
        }
    }
}

#[async_trait]
impl InvoiceRepository for RestInvoiceRepository {
    async fn list(&self) -> CrmApiResult<Vec<Invoice>> {
        let query = self
            .table
            .query()
            .select("*, contacts(id, name, phone, email)")
            .order("created_at", false);
        self.table.select(query).await
    }

    async fn get(&self, id: &str) -> CrmApiResult<Invoice> {
        // The detail view also prints the customer's company.
        let query = self
            .table
            .by_id(id)
            .select("*, contacts(id, name, phone, email, company)");
        self.table.select_one(query).await
    }

    async fn create(&self, invoice: &NewInvoice) -> CrmApiResult<Invoice> {
        self.table.insert_one(invoice).await
    }

    async fn create_many(&self, invoices: &[NewInvoice]) -> CrmApiResult<Vec<Invoice>> {
        self.table.insert(invoices).await
    }

    async fn update(&self, id: &str, changes: &InvoiceChanges) -> CrmApiResult<Invoice> {
        self.table.update(id, changes).await
    }

    async fn delete(&self, id: &str) -> CrmApiResult<()> {
        self.table.delete(id).await
    }

    async fn count(&self) -> CrmApiResult<u64> {
        self.table.count(self.table.query()).await
    }
}
