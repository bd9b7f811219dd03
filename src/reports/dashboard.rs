//! Dashboard figures and reminder counters.

use crate::models::{Activity, Deal, DealStatus, Invoice, InvoiceStatus, Reminder};
use crate::services::ReminderFilter;
use chrono::NaiveDate;
use serde::Serialize;

/// Headline numbers on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_contacts: u64,
    pub total_deals: usize,
    /// Sum of every deal's value, whatever its status
    pub deal_value: f64,
    pub won_deals: usize,
    pub total_invoices: usize,
    /// Sum of the totals of paid invoices
    pub paid_invoices: f64,
    pub pending_reminders: u64,
}

impl DashboardStats {
    pub fn compute(
        total_contacts: u64,
        deals: &[Deal],
        invoices: &[Invoice],
        pending_reminders: u64,
    ) -> Self {
        Self {
            total_contacts,
            total_deals: deals.len(),
            deal_value: deals.iter().map(|d| d.value).sum(),
            won_deals: deals.iter().filter(|d| d.status == DealStatus::Won).count(),
            total_invoices: invoices.len(),
            paid_invoices: invoices
                .iter()
                .filter(|i| i.status == InvoiceStatus::Paid)
                .map(|i| i.total)
                .sum(),
            pending_reminders,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub recent_deals: Vec<Deal>,
    pub upcoming_reminders: Vec<Reminder>,
    pub recent_activity: Vec<Activity>,
}

/// Counters shown above the reminder list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReminderCounts {
    pub total: usize,
    pub pending: usize,
    pub today: usize,
    pub overdue: usize,
    pub completed: usize,
}

impl ReminderCounts {
    pub fn from_reminders(reminders: &[Reminder], today: NaiveDate) -> Self {
        let count = |filter: ReminderFilter| {
            reminders
                .iter()
                .filter(|r| filter.matches(r, today))
                .count()
        };
        Self {
            total: reminders.len(),
            pending: count(ReminderFilter::Pending),
            today: count(ReminderFilter::Today),
            overdue: count(ReminderFilter::Overdue),
            completed: count(ReminderFilter::Completed),
        }
    }
}
