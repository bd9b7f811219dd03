//! Per-table persistence traits and their REST implementations.
//!
//! Every REST repository is bound to one user id at construction and adds a
//! `user_id` filter (or column, on insert) to each request.

mod rest_activity_repository;
mod rest_contact_repository;
mod rest_deal_repository;
mod rest_invoice_repository;
mod rest_profile_repository;
mod rest_reminder_repository;
mod rest_ticket_repository;
mod scoped_table;
mod traits;

pub use rest_activity_repository::RestActivityRepository;
pub use rest_contact_repository::RestContactRepository;
pub use rest_deal_repository::RestDealRepository;
pub use rest_invoice_repository::RestInvoiceRepository;
pub use rest_profile_repository::RestProfileRepository;
pub use rest_reminder_repository::RestReminderRepository;
pub use rest_ticket_repository::RestTicketRepository;
pub use traits::{
    ActivityRepository, ContactRepository, DealRepository, InvoiceRepository,
    ProfileRepository, ReminderRepository, TicketRepository,
};

use crate::client::AsyncCrmClient;
use std::sync::Arc;

/// One repository per table, all scoped to the same user.
#[derive(Clone)]
pub struct Repositories {
    pub contacts: Arc<dyn ContactRepository>,
    pub deals: Arc<dyn DealRepository>,
    pub invoices: Arc<dyn InvoiceRepository>,
    pub reminders: Arc<dyn ReminderRepository>,
    pub tickets: Arc<dyn TicketRepository>,
    pub activities: Arc<dyn ActivityRepository>,
    pub profile: Arc<dyn ProfileRepository>,
}

impl Repositories {
    /// REST repositories for `user_id` sharing one client.
    pub fn rest(client: Arc<dyn AsyncCrmClient>, user_id: &str) -> Self {
        Self {
            contacts: Arc::new(RestContactRepository::new(client.clone(), user_id)),
            deals: Arc::new(RestDealRepository::new(client.clone(), user_id)),
            invoices: Arc::new(RestInvoiceRepository::new(client.clone(), user_id)),
            reminders: Arc::new(RestReminderRepository::new(client.clone(), user_id)),
            tickets: Arc::new(RestTicketRepository::new(client.clone(), user_id)),
            activities: Arc::new(RestActivityRepository::new(client.clone(), user_id)),
            profile: Arc::new(RestProfileRepository::new(client, user_id)),
        }
    }
}
