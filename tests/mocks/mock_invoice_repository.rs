use super::mock_table::MockTable;
use async_trait::async_trait;
use crm_mcp_server::error::CrmApiResult;
use crm_mcp_server::models::{Invoice, InvoiceChanges, NewInvoice};
use crm_mcp_server::repositories::InvoiceRepository;
use std::ops::Deref;

/// Mock invoice repository for testing.
#[derive(Clone)]
pub struct MockInvoiceRepository {
    table: MockTable,
}

impl MockInvoiceRepository {
    pub fn new() -> Self {
        Self {
            table: MockTable::new("invoice"),
        }
    }
}

impl Default for MockInvoiceRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for MockInvoiceRepository {
    type Target = MockTable;

    fn deref(&self) -> &MockTable {
        &self.table
    }
}

#[async_trait]
impl InvoiceRepository for MockInvoiceRepository {
    async fn list(&self) -> CrmApiResult<Vec<Invoice>> {
        self.track_call("list");
        self.table.newest_first()
    }

    async fn get(&self, id: &str) -> CrmApiResult<Invoice> {
        self.track_call("get");
        self.table.get(id)
    }

    async fn create(&self, invoice: &NewInvoice) -> CrmApiResult<Invoice> {
        self.track_call("create");
        Ok(self.table.insert(std::slice::from_ref(invoice))?.remove(0))
    }

    async fn create_many(&self, invoices: &[NewInvoice]) -> CrmApiResult<Vec<Invoice>> {
        self.track_call("create_many");
        self.table.insert(invoices)
    }

    async fn update(&self, id: &str, changes: &InvoiceChanges) -> CrmApiResult<Invoice> {
        self.track_call("update");
        self.table.update(id, changes)
    }

    async fn delete(&self, id: &str) -> CrmApiResult<()> {
        self.track_call("delete");
        self.table.delete(id)
    }

    async fn count(&self) -> CrmApiResult<u64> {
        self.track_call("count");
        Ok(self.table.len() as u64)
    }
}
