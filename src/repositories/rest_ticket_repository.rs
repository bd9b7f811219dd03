use async_trait::async_trait;
use std::sync::Arc;

use super::scoped_table::ScopedTable;
use crate::client::{AsyncCrmClient, Query};
use crate::error::{CrmApiError, CrmApiResult};
use crate::models::{NewTicket, NewTicketMessage, Table, Ticket, TicketChanges, TicketMessage};
use crate::repositories::traits::TicketRepository;

const WITH_CONTACT: &str = "*, contacts(id, name, phone, email, company)";

/// Ticket repository backed by the `tickets` and `ticket_messages` tables.
pub struct RestTicketRepository {
    client: Arc<dyn AsyncCrmClient>,
    tickets: ScopedTable<Ticket>,
    messages: ScopedTable<TicketMessage>,
}

impl RestTicketRepository {
    pub fn new(client: Arc<dyn AsyncCrmClient>, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        Self {
            tickets: ScopedTable::new(client.clone(), user_id.clone()),
            messages: ScopedTable::new(client.clone(), user_id),
            client,
        }
    }
}

#[async_trait]
impl TicketRepository for RestTicketRepository {
    async fn list(&self) -> CrmApiResult<Vec<Ticket>> {
        let query = self
            .tickets
            .query()
            .select(WITH_CONTACT)
            .order("created_at", false);
        self.tickets.select(query).await
    }

    async fn get(&self, id: &str) -> CrmApiResult<Ticket> {
        self.tickets
            .select_one(self.tickets.by_id(id).select(WITH_CONTACT))
            .await
    }

    async fn create(&self, ticket: &NewTicket) -> CrmApiResult<Ticket> {
        self.tickets.insert_one(ticket).await
    }

    async fn update(&self, id: &str, changes: &TicketChanges) -> CrmApiResult<Ticket> {
        self.tickets.update(id, changes).await
    }

    async fn delete(&self, id: &str) -> CrmApiResult<()> {
        self.tickets.delete(id).await
    }

    async fn messages(&self, ticket_id: &str) -> CrmApiResult<Vec<TicketMessage>> {
        // Replies on the thread may come from other staff accounts, so the
        // thread is keyed by ticket only. Callers check ticket ownership first.
        let query = Query::new()
            .select("*")
            .eq("ticket_id", ticket_id)
            .order("created_at", true);
        let rows = self.client.select(TicketMessage::NAME, &query).await?;
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(CrmApiError::JsonError))
            .collect()
    }

    async fn add_message(&self, message: &NewTicketMessage) -> CrmApiResult<TicketMessage> {
        tracing::debug!(
            "Adding message to ticket {} as {}",
            message.ticket_id,
            self.messages.user_id()
        );
        self.messages.insert_one(message).await
    }
}
