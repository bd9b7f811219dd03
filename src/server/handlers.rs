//! MCP tool handlers for the CRM server.
//!
//! This module implements all the MCP tools using the rmcp SDK's tool_router pattern.
//! Each tool forwards to a service and returns the result as pretty-printed JSON.

use crate::config::Config;
use crate::error::{CrmApiError, ImportError};
use crate::reports::{ReportService, ReportServiceImpl, ReportSources, TimeRange};
use crate::repositories::Repositories;
use crate::services::{
    ActivityForm, ActivityService, ActivityServiceImpl, ContactForm, ContactService,
    ContactServiceImpl, DealForm, DealService, DealServiceImpl, InvoiceForm, InvoiceService,
    InvoiceServiceImpl, ProfileForm, ProfileService, ProfileServiceImpl, ReminderFilter,
    ReminderForm, ReminderService, ReminderServiceImpl, TicketForm, TicketService,
    TicketServiceImpl,
};
use crate::spreadsheet::{
    export_records, run_blocking, write_template, ExportData, ExportFormat, ImportEntity,
    SpreadsheetImporter,
};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Rows returned by `list_recent_activity` when no limit is given.
const DEFAULT_ACTIVITY_LIMIT: usize = 20;

/// The CRM MCP server that exposes tools for one signed-in user.
#[derive(Clone)]
pub struct CrmMcpServer {
    contact_service: Arc<dyn ContactService>,
    deal_service: Arc<dyn DealService>,
    invoice_service: Arc<dyn InvoiceService>,
    reminder_service: Arc<dyn ReminderService>,
    ticket_service: Arc<dyn TicketService>,
    activity_service: Arc<dyn ActivityService>,
    profile_service: Arc<dyn ProfileService>,
    report_service: Arc<dyn ReportService>,
    importer: Arc<SpreadsheetImporter>,
    tool_router: ToolRouter<Self>,
}

#[tool_handler]
impl ServerHandler for CrmMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities {
                tools: Some(Default::default()),
                ..Default::default()
            },
            server_info: Implementation {
                name: "crm-mcp-server".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some("MCP server for a hosted CRM - manage contacts, deals, invoices, reminders and support tickets, read dashboard and analytics figures, and import or export spreadsheets.".into()),
        }
    }
}

// Helper structs for tool parameters
#[derive(Debug, Deserialize, JsonSchema)]
struct IdParams {
    /// Record id
    id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SearchParams {
    /// Text matched against name, email, phone and company
    query: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct UpdateContactParams {
    id: String,
    #[serde(flatten)]
    contact: ContactForm,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct UpdateDealParams {
    id: String,
    #[serde(flatten)]
    deal: DealForm,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct UpdateInvoiceParams {
    id: String,
    #[serde(flatten)]
    invoice: InvoiceForm,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct UpdateReminderParams {
    id: String,
    #[serde(flatten)]
    reminder: ReminderForm,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct UpdateTicketParams {
    id: String,
    #[serde(flatten)]
    ticket: TicketForm,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct StatusParams {
    id: String,
    /// New status value
    status: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ListRemindersParams {
    /// all, pending, completed, today or overdue (default: all)
    #[serde(default)]
    filter: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ToggleReminderParams {
    id: String,
    /// Completion state to set
    completed: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ListTicketsParams {
    /// Only tickets with this status
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct AddTicketMessageParams {
    ticket_id: String,
    message: String,
    /// Internal notes are hidden from the customer
    #[serde(default)]
    is_internal: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ListActivityParams {
    /// Only activity with this contact
    #[serde(default)]
    contact_id: Option<String>,
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct AnalyticsParams {
    /// 7d, 30d or 90d (default: 30d)
    #[serde(default)]
    range: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ImportParams {
    /// contacts, deals, invoices or reminders
    entity: String,
    /// Path of a .csv, .xlsx, .xls or .ods file
    file_path: String,
    /// Table column to spreadsheet header, overriding the automatic mapping
    #[serde(default)]
    mapping: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ExportParams {
    /// contacts, deals, invoices or reminders
    entity: String,
    /// csv or xlsx (default: csv)
    #[serde(default)]
    format: Option<String>,
    /// Output file, or a directory to write <entity>.<ext> into
    path: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct TemplateParams {
    /// contacts, deals, invoices or reminders
    entity: String,
    /// Directory to write <entity>_template.xlsx into
    dir: String,
}

// Helper functions to convert errors to MCP errors
fn to_mcp_error(e: impl std::fmt::Display) -> McpError {
    McpError {
        code: ErrorCode::INTERNAL_ERROR,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

fn api_error(e: CrmApiError) -> McpError {
    to_mcp_error(e.user_message())
}

fn import_error(e: ImportError) -> McpError {
    to_mcp_error(e.user_message())
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json_response = serde_json::to_string_pretty(value).map_err(to_mcp_error)?;
    Ok(CallToolResult::success(vec![Content::text(json_response)]))
}

fn parse_entity(entity: &str) -> Result<ImportEntity, McpError> {
    entity.parse::<ImportEntity>().map_err(to_mcp_error)
}

// Tool router implementation
#[tool_router]
impl CrmMcpServer {
    /// Create a new CRM MCP server over repositories scoped to one user.
    pub fn new(repos: Repositories, config: &Config) -> Self {
        let importer = Arc::new(SpreadsheetImporter::new(
            repos.contacts.clone(),
            repos.deals.clone(),
            repos.invoices.clone(),
            repos.reminders.clone(),
            config.contact_match_threshold,
            config.import_preview_rows,
        ));
        let report_service =
            Arc::new(ReportServiceImpl::new(ReportSources::from(&repos))) as Arc<dyn ReportService>;

        Self {
            contact_service: Arc::new(ContactServiceImpl::new(repos.contacts)),
            deal_service: Arc::new(DealServiceImpl::new(repos.deals)),
            invoice_service: Arc::new(InvoiceServiceImpl::new(repos.invoices)),
            reminder_service: Arc::new(ReminderServiceImpl::new(repos.reminders)),
            ticket_service: Arc::new(TicketServiceImpl::new(repos.tickets)),
            activity_service: Arc::new(ActivityServiceImpl::new(repos.activities)),
            profile_service: Arc::new(ProfileServiceImpl::new(repos.profile)),
            report_service,
            importer,
            tool_router: Self::tool_router(),
        }
    }

    // ========================= Contacts =========================

    #[tool(description = "List all contacts, newest first")]
    async fn list_contacts(&self) -> Result<CallToolResult, McpError> {
        let contacts = self
            .contact_service
            .list_contacts()
            .await
            .map_err(api_error)?;
        json_result(&contacts)
    }

    #[tool(description = "Retrieve a contact by ID")]
    async fn get_contact(&self, params: Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let contact = self
            .contact_service
            .get_contact(&params.0.id)
            .await
            .map_err(api_error)?;
        json_result(&contact)
    }

    /// Search contacts by name, email, phone or company.
    #[tool(
        description = "Search contacts by name, email, phone or company (case-insensitive substring match)"
    )]
    async fn search_contacts(
        &self,
        params: Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let contacts = self
            .contact_service
            .search_contacts(&params.query)
            .await
            .map_err(api_error)?;

        json_result(&serde_json::json!({
            "query": params.query,
            "result_count": contacts.len(),
            "results": contacts,
        }))
    }

    #[tool(
        description = "Create a contact. Name and phone are required; WhatsApp defaults to the phone number and tags are comma-separated."
    )]
    async fn create_contact(
        &self,
        params: Parameters<ContactForm>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("MCP Handler: create_contact called");
        let contact = self
            .contact_service
            .create_contact(params.0)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create contact: {:?}", e);
                api_error(e)
            })?;
        json_result(&contact)
    }

    #[tool(description = "Replace the fields of an existing contact")]
    async fn update_contact(
        &self,
        params: Parameters<UpdateContactParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let contact = self
            .contact_service
            .update_contact(&params.id, params.contact)
            .await
            .map_err(api_error)?;
        json_result(&contact)
    }

    #[tool(description = "Delete a contact")]
    async fn delete_contact(
        &self,
        params: Parameters<IdParams>,
    ) -> Result<CallToolResult, McpError> {
        let id = params.0.id;
        self.contact_service
            .delete_contact(&id)
            .await
            .map_err(api_error)?;
        json_result(&serde_json::json!({ "deleted": id }))
    }

    // ========================= Deals =========================

    #[tool(description = "List all deals with their linked contact, newest first")]
    async fn list_deals(&self) -> Result<CallToolResult, McpError> {
        let deals = self.deal_service.list_deals().await.map_err(api_error)?;
        json_result(&deals)
    }

    #[tool(description = "Retrieve a deal by ID")]
    async fn get_deal(&self, params: Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let deal = self
            .deal_service
            .get_deal(&params.0.id)
            .await
            .map_err(api_error)?;
        json_result(&deal)
    }

    #[tool(
        description = "Create a deal. Title is required; value takes the leading number of the text (otherwise 0) and status defaults to new."
    )]
    async fn create_deal(&self, params: Parameters<DealForm>) -> Result<CallToolResult, McpError> {
        tracing::info!("MCP Handler: create_deal called");
        let deal = self
            .deal_service
            .create_deal(params.0)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create deal: {:?}", e);
                api_error(e)
            })?;
        json_result(&deal)
    }

    #[tool(description = "Replace the fields of an existing deal")]
    async fn update_deal(
        &self,
        params: Parameters<UpdateDealParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let deal = self
            .deal_service
            .update_deal(&params.id, params.deal)
            .await
            .map_err(api_error)?;
        json_result(&deal)
    }

    #[tool(
        description = "Move a deal to another pipeline stage: new, quoted, negotiating, won or lost"
    )]
    async fn update_deal_status(
        &self,
        params: Parameters<StatusParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let deal = self
            .deal_service
            .update_deal_status(&params.id, &params.status)
            .await
            .map_err(api_error)?;
        json_result(&deal)
    }

    #[tool(description = "Delete a deal")]
    async fn delete_deal(&self, params: Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let id = params.0.id;
        self.deal_service.delete_deal(&id).await.map_err(api_error)?;
        json_result(&serde_json::json!({ "deleted": id }))
    }

    #[tool(
        description = "Get deals grouped by pipeline stage with per-stage counts and values, plus the value of all open and won deals"
    )]
    async fn get_deal_pipeline(&self) -> Result<CallToolResult, McpError> {
        let pipeline = self.deal_service.pipeline().await.map_err(api_error)?;
        json_result(&pipeline)
    }

    // ========================= Invoices =========================

    #[tool(description = "List all invoices with their customer, newest first")]
    async fn list_invoices(&self) -> Result<CallToolResult, McpError> {
        let invoices = self
            .invoice_service
            .list_invoices()
            .await
            .map_err(api_error)?;
        json_result(&invoices)
    }

    #[tool(description = "Retrieve an invoice by ID")]
    async fn get_invoice(&self, params: Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let invoice = self
            .invoice_service
            .get_invoice(&params.0.id)
            .await
            .map_err(api_error)?;
        json_result(&invoice)
    }

    #[tool(description = "Suggest the next invoice number (INV-001, INV-002, ...)")]
    async fn next_invoice_number(&self) -> Result<CallToolResult, McpError> {
        let number = self
            .invoice_service
            .next_invoice_number()
            .await
            .map_err(api_error)?;
        json_result(&serde_json::json!({ "invoice_number": number }))
    }

    #[tool(
        description = "Create an invoice. Invoice number and due date are required; amount, tax and total are computed from the line items and tax rate."
    )]
    async fn create_invoice(
        &self,
        params: Parameters<InvoiceForm>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("MCP Handler: create_invoice called");
        let invoice = self
            .invoice_service
            .create_invoice(params.0)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create invoice: {:?}", e);
                api_error(e)
            })?;
        json_result(&invoice)
    }

    #[tool(
        description = "Update an invoice; totals are recomputed and the status and due date are kept when not given"
    )]
    async fn update_invoice(
        &self,
        params: Parameters<UpdateInvoiceParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let invoice = self
            .invoice_service
            .update_invoice(&params.id, params.invoice)
            .await
            .map_err(api_error)?;
        json_result(&invoice)
    }

    #[tool(
        description = "Set an invoice status: draft, sent, paid, overdue or cancelled. Marking it paid stamps the paid date."
    )]
    async fn update_invoice_status(
        &self,
        params: Parameters<StatusParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let invoice = self
            .invoice_service
            .update_invoice_status(&params.id, &params.status)
            .await
            .map_err(api_error)?;
        json_result(&invoice)
    }

    #[tool(description = "Delete an invoice")]
    async fn delete_invoice(
        &self,
        params: Parameters<IdParams>,
    ) -> Result<CallToolResult, McpError> {
        let id = params.0.id;
        self.invoice_service
            .delete_invoice(&id)
            .await
            .map_err(api_error)?;
        json_result(&serde_json::json!({ "deleted": id }))
    }

    // ========================= Reminders =========================

    #[tool(
        description = "List reminders ordered by due date, optionally filtered to pending, completed, today or overdue"
    )]
    async fn list_reminders(
        &self,
        params: Parameters<ListRemindersParams>,
    ) -> Result<CallToolResult, McpError> {
        let filter = params
            .0
            .filter
            .as_deref()
            .map(|f| f.parse::<ReminderFilter>().unwrap_or_default())
            .unwrap_or_default();

        let reminders = self
            .reminder_service
            .list_reminders(filter)
            .await
            .map_err(api_error)?;
        json_result(&reminders)
    }

    #[tool(
        description = "Create a reminder. Title and due date are required; priority defaults to medium."
    )]
    async fn create_reminder(
        &self,
        params: Parameters<ReminderForm>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("MCP Handler: create_reminder called");
        let reminder = self
            .reminder_service
            .create_reminder(params.0)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create reminder: {:?}", e);
                api_error(e)
            })?;
        json_result(&reminder)
    }

    #[tool(description = "Update the fields of an existing reminder")]
    async fn update_reminder(
        &self,
        params: Parameters<UpdateReminderParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let reminder = self
            .reminder_service
            .update_reminder(&params.id, params.reminder)
            .await
            .map_err(api_error)?;
        json_result(&reminder)
    }

    #[tool(description = "Mark a reminder as completed or not completed")]
    async fn toggle_reminder_complete(
        &self,
        params: Parameters<ToggleReminderParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let reminder = self
            .reminder_service
            .toggle_reminder_complete(&params.id, params.completed)
            .await
            .map_err(api_error)?;
        json_result(&reminder)
    }

    #[tool(description = "Delete a reminder")]
    async fn delete_reminder(
        &self,
        params: Parameters<IdParams>,
    ) -> Result<CallToolResult, McpError> {
        let id = params.0.id;
        self.reminder_service
            .delete_reminder(&id)
            .await
            .map_err(api_error)?;
        json_result(&serde_json::json!({ "deleted": id }))
    }

    // ========================= Tickets =========================

    #[tool(description = "List support tickets, newest first, optionally by status")]
    async fn list_tickets(
        &self,
        params: Parameters<ListTicketsParams>,
    ) -> Result<CallToolResult, McpError> {
        let tickets = self
            .ticket_service
            .list_tickets(params.0.status.as_deref())
            .await
            .map_err(api_error)?;
        json_result(&tickets)
    }

    #[tool(description = "Retrieve a support ticket by ID")]
    async fn get_ticket(&self, params: Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let ticket = self
            .ticket_service
            .get_ticket(&params.0.id)
            .await
            .map_err(api_error)?;
        json_result(&ticket)
    }

    #[tool(
        description = "Open a support ticket. Subject is required; a TKT- number is assigned automatically."
    )]
    async fn create_ticket(
        &self,
        params: Parameters<TicketForm>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("MCP Handler: create_ticket called");
        let ticket = self
            .ticket_service
            .create_ticket(params.0)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create ticket: {:?}", e);
                api_error(e)
            })?;
        json_result(&ticket)
    }

    #[tool(
        description = "Update an existing support ticket. Only the fields sent are changed; a blank optional field clears it."
    )]
    async fn update_ticket(
        &self,
        params: Parameters<UpdateTicketParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let ticket = self
            .ticket_service
            .update_ticket(&params.id, params.ticket)
            .await
            .map_err(api_error)?;
        json_result(&ticket)
    }

    #[tool(
        description = "Set a ticket status: open, in_progress, waiting, resolved or closed. Resolving or closing stamps the resolution time."
    )]
    async fn update_ticket_status(
        &self,
        params: Parameters<StatusParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let ticket = self
            .ticket_service
            .update_ticket_status(&params.id, &params.status)
            .await
            .map_err(api_error)?;
        json_result(&ticket)
    }

    #[tool(description = "Delete a support ticket")]
    async fn delete_ticket(&self, params: Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let id = params.0.id;
        self.ticket_service
            .delete_ticket(&id)
            .await
            .map_err(api_error)?;
        json_result(&serde_json::json!({ "deleted": id }))
    }

    #[tool(description = "List the conversation on a ticket, oldest message first")]
    async fn list_ticket_messages(
        &self,
        params: Parameters<IdParams>,
    ) -> Result<CallToolResult, McpError> {
        let messages = self
            .ticket_service
            .list_messages(&params.0.id)
            .await
            .map_err(api_error)?;
        json_result(&messages)
    }

    #[tool(description = "Add a reply or an internal note to a ticket")]
    async fn add_ticket_message(
        &self,
        params: Parameters<AddTicketMessageParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        tracing::debug!(
            "Parameters: ticket_id={}, message_len={}, internal={}",
            params.ticket_id,
            params.message.len(),
            params.is_internal
        );
        let message = self
            .ticket_service
            .add_message(&params.ticket_id, &params.message, params.is_internal)
            .await
            .map_err(api_error)?;
        json_result(&message)
    }

    // ========================= Activity & profile =========================

    #[tool(
        description = "List recent activity (calls, emails, meetings, notes), newest first, optionally for one contact"
    )]
    async fn list_recent_activity(
        &self,
        params: Parameters<ListActivityParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let activity = match params.contact_id {
            Some(contact_id) => self.activity_service.contact_activity(&contact_id).await,
            None => {
                self.activity_service
                    .recent_activity(params.limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT))
                    .await
            }
        }
        .map_err(api_error)?;
        json_result(&activity)
    }

    #[tool(description = "Log an activity against a contact or deal. Title is required.")]
    async fn log_activity(
        &self,
        params: Parameters<ActivityForm>,
    ) -> Result<CallToolResult, McpError> {
        let activity = self
            .activity_service
            .log_activity(params.0)
            .await
            .map_err(api_error)?;
        json_result(&activity)
    }

    #[tool(description = "Delete an activity log entry")]
    async fn delete_activity(
        &self,
        params: Parameters<IdParams>,
    ) -> Result<CallToolResult, McpError> {
        let id = params.0.id;
        self.activity_service
            .delete_activity(&id)
            .await
            .map_err(api_error)?;
        json_result(&serde_json::json!({ "deleted": id }))
    }

    #[tool(description = "Get the signed-in user's profile")]
    async fn get_profile(&self) -> Result<CallToolResult, McpError> {
        let profile = self
            .profile_service
            .get_profile()
            .await
            .map_err(api_error)?;
        json_result(&profile)
    }

    #[tool(description = "Update the signed-in user's name, phone and company")]
    async fn update_profile(
        &self,
        params: Parameters<ProfileForm>,
    ) -> Result<CallToolResult, McpError> {
        let profile = self
            .profile_service
            .update_profile(params.0)
            .await
            .map_err(api_error)?;
        json_result(&profile)
    }

    // ========================= Reports =========================

    #[tool(
        description = "Get dashboard figures (contacts, deals, deal value, won deals, invoices, paid total, pending reminders) with recent deals, upcoming reminders and recent activity"
    )]
    async fn get_dashboard(&self) -> Result<CallToolResult, McpError> {
        let dashboard = self.report_service.dashboard().await.map_err(api_error)?;
        json_result(&dashboard)
    }

    #[tool(
        description = "Get analytics for a 7d, 30d or 90d window: totals and growth against the previous window, a six-month series and status breakdowns"
    )]
    async fn get_analytics(
        &self,
        params: Parameters<AnalyticsParams>,
    ) -> Result<CallToolResult, McpError> {
        let range = params
            .0
            .range
            .as_deref()
            .map(|r| r.parse::<TimeRange>().unwrap_or_default())
            .unwrap_or_default();
        let analytics = self
            .report_service
            .analytics(range)
            .await
            .map_err(api_error)?;
        json_result(&analytics)
    }

    #[tool(description = "Count reminders: total, pending, due today, overdue and completed")]
    async fn get_reminder_counts(&self) -> Result<CallToolResult, McpError> {
        let counts = self
            .report_service
            .reminder_counts()
            .await
            .map_err(api_error)?;
        json_result(&counts)
    }

    #[tool(description = "Count tickets: total, open, in progress and resolved")]
    async fn get_ticket_counts(&self) -> Result<CallToolResult, McpError> {
        let counts = self
            .report_service
            .ticket_counts()
            .await
            .map_err(api_error)?;
        json_result(&counts)
    }

    // ========================= Spreadsheets =========================

    #[tool(
        description = "Read a CSV or Excel file and show how its columns map to contacts, deals, invoices or reminders, which required fields are unmapped, and the first rows as they would be imported. Nothing is written."
    )]
    async fn preview_import(
        &self,
        params: Parameters<ImportParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let entity = parse_entity(&params.entity)?;
        let preview = self
            .importer
            .preview_file(
                entity,
                &params.file_path,
                &params.mapping.unwrap_or_default(),
            )
            .await
            .map_err(import_error)?;
        json_result(&preview)
    }

    #[tool(
        description = "Import a CSV or Excel file as contacts, deals, invoices or reminders. Rows missing required values are skipped and reported; the rest are inserted in one request."
    )]
    async fn import_spreadsheet(
        &self,
        params: Parameters<ImportParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let entity = parse_entity(&params.entity)?;
        tracing::info!(
            "MCP Handler: import_spreadsheet called for {} from {}",
            entity,
            params.file_path
        );
        let report = self
            .importer
            .import_file(
                entity,
                &params.file_path,
                &params.mapping.unwrap_or_default(),
            )
            .await
            .map_err(|e| {
                tracing::error!("Import failed: {:?}", e);
                import_error(e)
            })?;
        json_result(&report)
    }

    #[tool(
        description = "Export all contacts, deals, invoices or reminders to a CSV or Excel file"
    )]
    async fn export_records(
        &self,
        params: Parameters<ExportParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let entity = parse_entity(&params.entity)?;
        let format = match params.format.as_deref() {
            Some(format) => format.parse::<ExportFormat>().map_err(import_error)?,
            None => ExportFormat::default(),
        };

        let data = match entity {
            ImportEntity::Contacts => {
                ExportData::Contacts(self.contact_service.list_contacts().await.map_err(api_error)?)
            }
            ImportEntity::Deals => {
                ExportData::Deals(self.deal_service.list_deals().await.map_err(api_error)?)
            }
            ImportEntity::Invoices => ExportData::Invoices(
                self.invoice_service
                    .list_invoices()
                    .await
                    .map_err(api_error)?,
            ),
            ImportEntity::Reminders => ExportData::Reminders(
                self.reminder_service
                    .list_reminders(ReminderFilter::All)
                    .await
                    .map_err(api_error)?,
            ),
        };

        let records = data.len();
        let target = params.path;
        let path = run_blocking(move || export_records(&data, format, target))
            .await
            .map_err(import_error)?;
        json_result(&serde_json::json!({
            "entity": entity,
            "format": format.extension(),
            "records": records,
            "path": path.display().to_string(),
        }))
    }

    #[tool(
        description = "Write an Excel import template (header row plus one example row) for contacts, deals, invoices or reminders"
    )]
    async fn download_template(
        &self,
        params: Parameters<TemplateParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let entity = parse_entity(&params.entity)?;
        let dir = params.dir;
        let path = run_blocking(move || write_template(entity, dir))
            .await
            .map_err(import_error)?;
        json_result(&serde_json::json!({
            "entity": entity,
            "path": path.display().to_string(),
        }))
    }
}
