//! Dashboard, analytics and list counters.
//!
//! Aggregation is pure (`DashboardStats::compute`, `Analytics::compute`,
//! `ReminderCounts::from_reminders`); `ReportServiceImpl` only gathers rows.

pub mod analytics;
pub mod dashboard;
mod report_service;

pub use analytics::{
    growth, Analytics, AnalyticsSummary, CategoryCount, MonthlyPoint, StatusCount, TimeRange,
};
pub use dashboard::{Dashboard, DashboardStats, ReminderCounts};
pub use report_service::{ReportService, ReportServiceImpl, ReportSources};
