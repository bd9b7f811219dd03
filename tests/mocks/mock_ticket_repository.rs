use super::mock_table::MockTable;
use async_trait::async_trait;
use crm_mcp_server::error::CrmApiResult;
use crm_mcp_server::models::{NewTicket, NewTicketMessage, Ticket, TicketChanges, TicketMessage};
use crm_mcp_server::repositories::TicketRepository;
use serde_json::Value;
use std::ops::Deref;

/// Mock ticket repository for testing; messages live in a second table.
#[derive(Clone)]
pub struct MockTicketRepository {
    tickets: MockTable,
    messages: MockTable,
}

#[allow(dead_code)]
impl MockTicketRepository {
    pub fn new() -> Self {
        Self {
            tickets: MockTable::new("ticket"),
            messages: MockTable::new("message"),
        }
    }

    pub fn messages_table(&self) -> &MockTable {
        &self.messages
    }
}

impl Default for MockTicketRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for MockTicketRepository {
    type Target = MockTable;

    fn deref(&self) -> &MockTable {
        &self.tickets
    }
}

#[async_trait]
impl TicketRepository for MockTicketRepository {
    async fn list(&self) -> CrmApiResult<Vec<Ticket>> {
        self.track_call("list");
        self.tickets.newest_first()
    }

    async fn get(&self, id: &str) -> CrmApiResult<Ticket> {
        self.track_call("get");
        self.tickets.get(id)
    }

    async fn create(&self, ticket: &NewTicket) -> CrmApiResult<Ticket> {
        self.track_call("create");
        Ok(self.tickets.insert(std::slice::from_ref(ticket))?.remove(0))
    }

    async fn update(&self, id: &str, changes: &TicketChanges) -> CrmApiResult<Ticket> {
        self.track_call("update");
        self.tickets.update(id, changes)
    }

    async fn delete(&self, id: &str) -> CrmApiResult<()> {
        self.track_call("delete");
        self.tickets.delete(id)
    }

    async fn messages(&self, ticket_id: &str) -> CrmApiResult<Vec<TicketMessage>> {
        self.track_call("messages");
        self.messages
            .select(|row| row.get("ticket_id").and_then(Value::as_str) == Some(ticket_id))
    }

    async fn add_message(&self, message: &NewTicketMessage) -> CrmApiResult<TicketMessage> {
        self.track_call("add_message");
        Ok(self.messages.insert(std::slice::from_ref(message))?.remove(0))
    }
}
