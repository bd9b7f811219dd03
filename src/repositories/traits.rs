use crate::error::CrmApiResult;
use crate::models::*;
use async_trait::async_trait;

/// Repository for the user's contacts.
///
/// Implementations are scoped to a single user at construction; no method
/// takes or returns another tenant's rows.
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// All contacts, newest first.
    async fn list(&self) -> CrmApiResult<Vec<Contact>>;

    /// All contacts ordered by name (pickers and name matching).
    async fn list_by_name(&self) -> CrmApiResult<Vec<Contact>>;

    async fn get(&self, id: &str) -> CrmApiResult<Contact>;

    /// Case-insensitive match on name, email, phone or company.
    async fn search(&self, term: &str, limit: usize) -> CrmApiResult<Vec<Contact>>;

    async fn create(&self, contact: &NewContact) -> CrmApiResult<Contact>;

    /// Bulk insert in a single request.
    async fn create_many(&self, contacts: &[NewContact]) -> CrmApiResult<Vec<Contact>>;

    async fn update(&self, id: &str, changes: &ContactChanges) -> CrmApiResult<Contact>;

    async fn delete(&self, id: &str) -> CrmApiResult<()>;

    async fn count(&self) -> CrmApiResult<u64>;
}

/// Repository for the user's deals.
#[async_trait]
pub trait DealRepository: Send + Sync {
    /// All deals with their contact embedded, newest first.
    async fn list(&self) -> CrmApiResult<Vec<Deal>>;

    async fn recent(&self, limit: usize) -> CrmApiResult<Vec<Deal>>;

    async fn get(&self, id: &str) -> CrmApiResult<Deal>;

    async fn create(&self, deal: &NewDeal) -> CrmApiResult<Deal>;

    async fn create_many(&self, deals: &[NewDeal]) -> CrmApiResult<Vec<Deal>>;

    async fn update(&self, id: &str, changes: &DealChanges) -> CrmApiResult<Deal>;

    async fn delete(&self, id: &str) -> CrmApiResult<()>;

    async fn count(&self) -> CrmApiResult<u64>;
}

/// Repository for the user's invoices.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    async fn list(&self) -> CrmApiResult<Vec<Invoice>>;

    async fn get(&self, id: &str) -> CrmApiResult<Invoice>;

    async fn create(&self, invoice: &NewInvoice) -> CrmApiResult<Invoice>;

    async fn create_many(&self, invoices: &[NewInvoice]) -> CrmApiResult<Vec<Invoice>>;

    async fn update(&self, id: &str, changes: &InvoiceChanges) -> CrmApiResult<Invoice>;

    async fn delete(&self, id: &str) -> CrmApiResult<()>;

    /// Number of invoices the user has issued (drives invoice numbering).
    async fn count(&self) -> CrmApiResult<u64>;
}

/// Repository for the user's reminders.
#[async_trait]
pub trait ReminderRepository: Send + Sync {
    /// All reminders, earliest due first.
    async fn list(&self) -> CrmApiResult<Vec<Reminder>>;

    /// Open reminders due at or after `from` (RFC 3339), earliest first.
    async fn upcoming(&self, from: &str, limit: usize) -> CrmApiResult<Vec<Reminder>>;

    /// Number of reminders not yet completed.
    async fn count_pending(&self) -> CrmApiResult<u64>;

    async fn create(&self, reminder: &NewReminder) -> CrmApiResult<Reminder>;

    async fn create_many(&self, reminders: &[NewReminder]) -> CrmApiResult<Vec<Reminder>>;

    async fn update(&self, id: &str, changes: &ReminderChanges) -> CrmApiResult<Reminder>;

    async fn delete(&self, id: &str) -> CrmApiResult<()>;
}

/// Repository for the user's support tickets and their messages.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn list(&self) -> CrmApiResult<Vec<Ticket>>;

    async fn get(&self, id: &str) -> CrmApiResult<Ticket>;

    async fn create(&self, ticket: &NewTicket) -> CrmApiResult<Ticket>;

    async fn update(&self, id: &str, changes: &TicketChanges) -> CrmApiResult<Ticket>;

    async fn delete(&self, id: &str) -> CrmApiResult<()>;

    /// Thread of a ticket, oldest first.
    async fn messages(&self, ticket_id: &str) -> CrmApiResult<Vec<TicketMessage>>;

    async fn add_message(&self, message: &NewTicketMessage) -> CrmApiResult<TicketMessage>;
}

/// Repository for the user's activity log.
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    async fn recent(&self, limit: usize) -> CrmApiResult<Vec<Activity>>;

    async fn for_contact(&self, contact_id: &str) -> CrmApiResult<Vec<Activity>>;

    async fn create(&self, activity: &NewActivity) -> CrmApiResult<Activity>;

    async fn delete(&self, id: &str) -> CrmApiResult<()>;
}

/// Repository for the signed-in user's profile row.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn get(&self) -> CrmApiResult<Profile>;

    async fn update(&self, changes: &ProfileChanges) -> CrmApiResult<Profile>;
}
