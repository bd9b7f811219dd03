//! CRM MCP Server - a Model Context Protocol server for a multi-tenant hosted CRM.
//!
//! Every record lives in a PostgREST backend with row-level security keyed
//! on the signed-in user. This crate exposes that data to AI assistants:
//! CRUD over contacts, deals, invoices, reminders, tickets and activity,
//! dashboard and analytics reports, and spreadsheet import/export.
//!
//! # Architecture
//!
//! - **config**: Configuration from environment variables
//! - **error**: Error types for the backend, configuration and spreadsheets
//! - **domain**: Validated value objects and date/number parsing
//! - **models**: Rows, inserts, change sets and status enums
//! - **client**: PostgREST client (sync `ureq`, async wrapper)
//! - **repositories**: Per-table persistence scoped to one user
//! - **services**: Form rules, defaults and timestamps
//! - **spreadsheet**: CSV/Excel reading, column mapping, import, export, templates
//! - **matching**: Fuzzy contact-name resolution
//! - **reports**: Dashboard, analytics and counters
//! - **server**: MCP protocol server

pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod matching;
pub mod metrics;
pub mod models;
pub mod reports;
pub mod repositories;
pub mod server;
pub mod services;
pub mod spreadsheet;

pub use client::{AsyncCrmClient, AsyncCrmClientImpl, AuthUser, CrmClient};
pub use config::Config;
pub use error::{ConfigError, CrmApiError, CrmApiResult, ImportError, ImportResult};
pub use matching::{ContactMatcher, MatchResult};
pub use metrics::{HttpTimer, Metrics, MetricsSummary};
pub use models::{Activity, Contact, Deal, Invoice, Profile, Reminder, Ticket, TicketMessage};
pub use repositories::Repositories;
pub use server::CrmMcpServer;
