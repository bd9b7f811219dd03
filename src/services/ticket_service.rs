//! Ticket service layer: numbering, status stamping and message threads.

use super::form;
use crate::error::{CrmApiError, CrmApiResult};
use crate::models::{
    NewTicket, NewTicketMessage, Ticket, TicketCategory, TicketChanges, TicketMessage,
    TicketPriority, TicketStatus,
};
use crate::repositories::TicketRepository;
use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const BASE36: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Ticket form as submitted by a caller.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct TicketForm {
    /// Subject line (required)
    pub subject: Option<String>,
    /// Problem description
    pub description: Option<String>,
    /// open, in_progress, waiting, resolved or closed (default: open)
    pub status: Option<String>,
    /// low, medium, high or urgent (default: medium)
    pub priority: Option<String>,
    /// general, billing, technical, sales, complaint or inquiry (default: general)
    pub category: Option<String>,
    /// Contact who raised the ticket
    pub contact_id: Option<String>,
    /// Person handling the ticket
    pub assigned_to: Option<String>,
}

/// Ticket totals shown above the ticket list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TicketCounts {
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    /// Resolved and closed tickets together.
    pub resolved: usize,
}

impl TicketCounts {
    pub fn from_tickets(tickets: &[Ticket]) -> Self {
        let with = |pred: fn(&TicketStatus) -> bool| {
            tickets.iter().filter(|t| pred(&t.status)).count()
        };
        Self {
            total: tickets.len(),
            open: with(|s| *s == TicketStatus::Open),
            in_progress: with(|s| *s == TicketStatus::InProgress),
            resolved: with(TicketStatus::is_terminal),
        }
    }
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

/// `TKT-` + base-36 millisecond timestamp + three random base-36 characters.
pub fn generate_ticket_number() -> String {
    let millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
    let mut rng = rand::thread_rng();
    let suffix: String = (0..3)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("TKT-{}{}", to_base36(millis), suffix)
}

/// Ticket service trait for business operations.
#[async_trait]
pub trait TicketService: Send + Sync {
    /// Tickets, newest first; `status` of `None` or "all" lists every ticket.
    async fn list_tickets(&self, status: Option<&str>) -> CrmApiResult<Vec<Ticket>>;

    async fn get_ticket(&self, id: &str) -> CrmApiResult<Ticket>;

    async fn create_ticket(&self, form: TicketForm) -> CrmApiResult<Ticket>;

    /// Change the fields present in `form`; omitted fields and the ticket
    /// number stay as they are.
    async fn update_ticket(&self, id: &str, form: TicketForm) -> CrmApiResult<Ticket>;

    /// Resolved and closed stamp `resolved_at`.
    async fn update_ticket_status(&self, id: &str, status: &str) -> CrmApiResult<Ticket>;

    async fn delete_ticket(&self, id: &str) -> CrmApiResult<()>;

    async fn list_messages(&self, ticket_id: &str) -> CrmApiResult<Vec<TicketMessage>>;

    async fn add_message(
        &self,
        ticket_id: &str,
        message: &str,
        is_internal: bool,
    ) -> CrmApiResult<TicketMessage>;

    async fn ticket_counts(&self) -> CrmApiResult<TicketCounts>;
}

/// Default implementation of TicketService.
pub struct TicketServiceImpl {
    repository: Arc<dyn TicketRepository>,
}

impl TicketServiceImpl {
    pub fn new(repository: Arc<dyn TicketRepository>) -> Self {
        Self { repository }
    }

    fn parse_form(form: &TicketForm, ticket_number: String) -> CrmApiResult<NewTicket> {
        let [subject] = form::require([&form.subject], "Subject is required")?;
        Ok(NewTicket {
            contact_id: form::reference(&form.contact_id)?,
            ticket_number,
            subject,
            description: form::text(&form.description),
            status: form::choice(&form.status, TicketStatus::Open)?,
            priority: form::choice(&form.priority, TicketPriority::Medium)?,
            category: form::choice(&form.category, TicketCategory::General)?,
            assigned_to: form::text(&form.assigned_to),
        })
    }
}

/// Column value for a field the caller sent; absent fields are left untouched.
fn supplied<T>(
    field: &Option<String>,
    parse: impl FnOnce(&Option<String>) -> CrmApiResult<Option<T>>,
) -> CrmApiResult<Option<Option<T>>> {
    match field {
        Some(_) => parse(field).map(Some),
        None => Ok(None),
    }
}

#[async_trait]
impl TicketService for TicketServiceImpl {
    async fn list_tickets(&self, status: Option<&str>) -> CrmApiResult<Vec<Ticket>> {
        let wanted = match status.map(str::trim) {
            None | Some("") => None,
            Some(s) if s.eq_ignore_ascii_case("all") => None,
            Some(s) => Some(s.parse::<TicketStatus>()?),
        };
        let tickets = self.repository.list().await?;
        Ok(match wanted {
            Some(status) => tickets.into_iter().filter(|t| t.status == status).collect(),
            None => tickets,
        })
    }

    async fn get_ticket(&self, id: &str) -> CrmApiResult<Ticket> {
        let id = form::record_id(id)?;
        self.repository.get(&id).await
    }

    async fn create_ticket(&self, form: TicketForm) -> CrmApiResult<Ticket> {
        let ticket = Self::parse_form(&form, generate_ticket_number())?;
        let created = self.repository.create(&ticket).await?;
        tracing::info!("Created ticket {} ({})", created.ticket_number, created.id);
        Ok(created)
    }

    async fn update_ticket(&self, id: &str, form: TicketForm) -> CrmApiResult<Ticket> {
        let id = form::record_id(id)?;
        let subject = match &form.subject {
            Some(_) => {
                let [subject] = form::require([&form.subject], "Subject is required")?;
                Some(subject)
            }
            None => None,
        };
        let status: Option<TicketStatus> = form::optional_choice(&form.status)?;
        let changes = TicketChanges {
            contact_id: supplied(&form.contact_id, form::reference)?,
            subject,
            description: supplied(&form.description, |f| Ok(form::text(f)))?,
            status,
            priority: form::optional_choice(&form.priority)?,
            category: form::optional_choice(&form.category)?,
            assigned_to: supplied(&form.assigned_to, |f| Ok(form::text(f)))?,
            resolved_at: status.filter(TicketStatus::is_terminal).map(|_| form::now_iso()),
            updated_at: Some(form::now_iso()),
        };
        let updated = self.repository.update(&id, &changes).await?;
        tracing::info!("Updated ticket {}", updated.ticket_number);
        Ok(updated)
    }

    async fn update_ticket_status(&self, id: &str, status: &str) -> CrmApiResult<Ticket> {
        let id = form::record_id(id)?;
        let status: TicketStatus = status.parse()?;
        let changes = TicketChanges {
            status: Some(status),
            resolved_at: status.is_terminal().then(form::now_iso),
            updated_at: Some(form::now_iso()),
            ..Default::default()
        };
        let updated = self.repository.update(&id, &changes).await?;
        tracing::info!("Ticket {} is now {}", updated.ticket_number, status);
        Ok(updated)
    }

    async fn delete_ticket(&self, id: &str) -> CrmApiResult<()> {
        let id = form::record_id(id)?;
        self.repository.delete(&id).await?;
        tracing::info!("Deleted ticket {}", id);
        Ok(())
    }

    async fn list_messages(&self, ticket_id: &str) -> CrmApiResult<Vec<TicketMessage>> {
        let ticket = self.get_ticket(ticket_id).await?;
        self.repository.messages(&ticket.id).await
    }

    async fn add_message(
        &self,
        ticket_id: &str,
        message: &str,
        is_internal: bool,
    ) -> CrmApiResult<TicketMessage> {
        if message.trim().is_empty() {
            return Err(CrmApiError::InvalidRequest(
                "Message cannot be empty".to_string(),
            ));
        }
        let ticket = self.get_ticket(ticket_id).await?;
        let new_message = NewTicketMessage {
            ticket_id: ticket.id,
            message: message.to_string(),
            is_internal,
        };
        self.repository.add_message(&new_message).await
    }

    async fn ticket_counts(&self) -> CrmApiResult<TicketCounts> {
        let tickets = self.repository.list().await?;
        Ok(TicketCounts::from_tickets(&tickets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "Z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_700_000_000_000), "LOYW3V28");
    }

    #[test]
    fn test_ticket_number_shape() {
        let number = generate_ticket_number();
        let body = number.strip_prefix("TKT-").unwrap();
        assert!(body.len() >= 11);
        assert!(body
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_subject_required() {
        let err = TicketServiceImpl::parse_form(&TicketForm::default(), "TKT-1".into()).unwrap_err();
        assert_eq!(err.to_string(), "Subject is required");
    }

    #[test]
    fn test_defaults() {
        let form = TicketForm {
            subject: Some("Cannot log in".into()),
            contact_id: Some("".into()),
            ..Default::default()
        };
        let ticket = TicketServiceImpl::parse_form(&form, "TKT-1".into()).unwrap();
        assert_eq!(ticket.status, TicketStatus::Open);
        assert_eq!(ticket.priority, TicketPriority::Medium);
        assert_eq!(ticket.category, TicketCategory::General);
        assert_eq!(ticket.contact_id, None);
    }
}
