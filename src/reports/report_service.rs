//! Report service: fetches the rows a report needs concurrently and
//! aggregates them.

use super::analytics::{Analytics, TimeRange};
use super::dashboard::{Dashboard, DashboardStats, ReminderCounts};
use crate::error::CrmApiResult;
use crate::repositories::{
    ActivityRepository, ContactRepository, DealRepository, InvoiceRepository, ReminderRepository,
    Repositories, TicketRepository,
};
use crate::services::TicketCounts;
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;

/// Rows shown in each dashboard list.
const DASHBOARD_LIST_LEN: usize = 5;

#[async_trait]
pub trait ReportService: Send + Sync {
    async fn dashboard_stats(&self) -> CrmApiResult<DashboardStats>;

    /// Stats plus recent deals, upcoming reminders and recent activity.
    async fn dashboard(&self) -> CrmApiResult<Dashboard>;

    async fn analytics(&self, range: TimeRange) -> CrmApiResult<Analytics>;

    async fn reminder_counts(&self) -> CrmApiResult<ReminderCounts>;

    async fn ticket_counts(&self) -> CrmApiResult<TicketCounts>;
}

/// Repositories a report reads from.
#[derive(Clone)]
pub struct ReportSources {
    pub contacts: Arc<dyn ContactRepository>,
    pub deals: Arc<dyn DealRepository>,
    pub invoices: Arc<dyn InvoiceRepository>,
    pub reminders: Arc<dyn ReminderRepository>,
    pub tickets: Arc<dyn TicketRepository>,
    pub activities: Arc<dyn ActivityRepository>,
}

impl From<&Repositories> for ReportSources {
    fn from(repos: &Repositories) -> Self {
        Self {
            contacts: repos.contacts.clone(),
            deals: repos.deals.clone(),
            invoices: repos.invoices.clone(),
            reminders: repos.reminders.clone(),
            tickets: repos.tickets.clone(),
            activities: repos.activities.clone(),
        }
    }
}

/// Default implementation of ReportService.
pub struct ReportServiceImpl {
    sources: ReportSources,
}

impl ReportServiceImpl {
    pub fn new(sources: ReportSources) -> Self {
        Self { sources }
    }
}

#[async_trait]
impl ReportService for ReportServiceImpl {
    async fn dashboard_stats(&self) -> CrmApiResult<DashboardStats> {
        let s = &self.sources;
        let (contacts, deals, invoices, pending) = futures::try_join!(
            s.contacts.count(),
            s.deals.list(),
            s.invoices.list(),
            s.reminders.count_pending(),
        )?;
        Ok(DashboardStats::compute(contacts, &deals, &invoices, pending))
    }

    async fn dashboard(&self) -> CrmApiResult<Dashboard> {
        let s = &self.sources;
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let (stats, recent_deals, upcoming_reminders, recent_activity) = futures::try_join!(
            self.dashboard_stats(),
            s.deals.recent(DASHBOARD_LIST_LEN),
            s.reminders.upcoming(&now, DASHBOARD_LIST_LEN),
            s.activities.recent(DASHBOARD_LIST_LEN),
        )?;
        tracing::debug!(
            "Dashboard: {} contacts, {} deals",
            stats.total_contacts,
            stats.total_deals
        );
        Ok(Dashboard {
            stats,
            recent_deals,
            upcoming_reminders,
            recent_activity,
        })
    }

    async fn analytics(&self, range: TimeRange) -> CrmApiResult<Analytics> {
        let s = &self.sources;
        let (deals, contacts, invoices, tickets) = futures::try_join!(
            s.deals.list(),
            s.contacts.list(),
            s.invoices.list(),
            s.tickets.list(),
        )?;
        Ok(Analytics::compute(
            range,
            Utc::now(),
            &deals,
            &contacts,
            &invoices,
            &tickets,
        ))
    }

    async fn reminder_counts(&self) -> CrmApiResult<ReminderCounts> {
        let reminders = self.sources.reminders.list().await?;
        Ok(ReminderCounts::from_reminders(
            &reminders,
            Utc::now().date_naive(),
        ))
    }

    async fn ticket_counts(&self) -> CrmApiResult<TicketCounts> {
        let tickets = self.sources.tickets.list().await?;
        Ok(TicketCounts::from_tickets(&tickets))
    }
}
