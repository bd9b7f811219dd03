//! In-memory repositories for service and importer tests.

mod mock_activity_repository;
mod mock_contact_repository;
mod mock_deal_repository;
mod mock_invoice_repository;
mod mock_profile_repository;
mod mock_reminder_repository;
mod mock_table;
mod mock_ticket_repository;

#[allow(unused_imports)]
pub use mock_activity_repository::MockActivityRepository;
#[allow(unused_imports)]
pub use mock_contact_repository::MockContactRepository;
#[allow(unused_imports)]
pub use mock_deal_repository::MockDealRepository;
#[allow(unused_imports)]
pub use mock_invoice_repository::MockInvoiceRepository;
#[allow(unused_imports)]
pub use mock_profile_repository::MockProfileRepository;
#[allow(unused_imports)]
pub use mock_reminder_repository::MockReminderRepository;
#[allow(unused_imports)]
pub use mock_table::{MockTable, TEST_USER_ID};
#[allow(unused_imports)]
pub use mock_ticket_repository::MockTicketRepository;

use crm_mcp_server::repositories::Repositories;
use std::sync::Arc;

/// One mock per table, kept so tests can seed rows and read call counts.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockRepositories {
    pub contacts: MockContactRepository,
    pub deals: MockDealRepository,
    pub invoices: MockInvoiceRepository,
    pub reminders: MockReminderRepository,
    pub tickets: MockTicketRepository,
    pub activities: MockActivityRepository,
    pub profile: MockProfileRepository,
}

#[allow(dead_code)]
impl MockRepositories {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repositories(&self) -> Repositories {
        Repositories {
            contacts: Arc::new(self.contacts.clone()),
            deals: Arc::new(self.deals.clone()),
            invoices: Arc::new(self.invoices.clone()),
            reminders: Arc::new(self.reminders.clone()),
            tickets: Arc::new(self.tickets.clone()),
            activities: Arc::new(self.activities.clone()),
            profile: Arc::new(self.profile.clone()),
        }
    }
}
