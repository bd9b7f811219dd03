//! Application service layer.
//!
//! Services hold the form rules of the CRM: required fields, defaults,
//! numbering and timestamp stamping. They sit between the MCP handlers and
//! the repositories.

mod activity_service;
mod contact_service;
mod deal_service;
mod form;
mod invoice_service;
mod profile_service;
mod reminder_service;
mod ticket_service;

pub use activity_service::{ActivityForm, ActivityService, ActivityServiceImpl};
pub use contact_service::{ContactForm, ContactService, ContactServiceImpl};
pub use deal_service::{DealForm, DealService, DealServiceImpl, Pipeline, PipelineStage};
pub use invoice_service::{
    format_invoice_number, parse_items, tax_rate_of, InvoiceForm, InvoiceService,
    InvoiceServiceImpl, InvoiceTotals,
};
pub use profile_service::{ProfileForm, ProfileService, ProfileServiceImpl};
pub use reminder_service::{ReminderFilter, ReminderForm, ReminderService, ReminderServiceImpl};
pub use ticket_service::{
    generate_ticket_number, TicketCounts, TicketForm, TicketService, TicketServiceImpl,
};
