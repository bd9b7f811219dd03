//! Analytics over a trailing window: totals, growth, monthly series and
//! status breakdowns.

use crate::domain::parse_timestamp;
use crate::models::{Contact, Deal, DealStatus, Invoice, Ticket};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::str::FromStr;

const MONTHS: i32 = 6;

/// Trailing window the summary compares against the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TimeRange {
    #[serde(rename = "7d")]
    Week,
    #[default]
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
}

impl TimeRange {
    pub fn days(&self) -> i64 {
        match self {
            TimeRange::Week => 7,
            TimeRange::Month => 30,
            TimeRange::Quarter => 90,
        }
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "7d" => Ok(TimeRange::Week),
            "90d" => Ok(TimeRange::Quarter),
            _ => Ok(TimeRange::Month), // Default to 30d for unknown values
        }
    }
}

/// Percentage change, rounded half up; 100 when growing from nothing.
pub fn growth(current: f64, previous: f64) -> i64 {
    if previous == 0.0 {
        return if current > 0.0 { 100 } else { 0 };
    }
    ((current - previous) / previous * 100.0 + 0.5).floor() as i64
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub total_deals: usize,
    /// Value of won deals
    pub total_revenue: f64,
    pub total_contacts: usize,
    pub total_invoices: usize,
    pub total_tickets: usize,
    pub deal_growth: i64,
    pub revenue_growth: i64,
    pub contact_growth: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPoint {
    /// Short month name, e.g. `Mar`
    pub month: String,
    pub deals: usize,
    pub revenue: f64,
    pub contacts: usize,
    pub invoices: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analytics {
    pub range: TimeRange,
    pub summary: AnalyticsSummary,
    /// Oldest month first
    pub monthly: Vec<MonthlyPoint>,
    pub deals_by_status: Vec<StatusCount>,
    pub invoices_by_status: Vec<StatusCount>,
    pub tickets_by_status: Vec<StatusCount>,
    pub tickets_by_category: Vec<CategoryCount>,
}

/// Half-open `[start, end)` interval; `end` of `None` is unbounded.
#[derive(Debug, Clone, Copy)]
struct Window {
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
}

impl Window {
    fn contains(&self, created_at: &str) -> bool {
        parse_timestamp(created_at)
            .is_some_and(|ts| ts >= self.start && self.end.map_or(true, |end| ts < end))
    }
}

fn won_value<'a>(deals: impl Iterator<Item = &'a Deal>) -> f64 {
    deals
        .filter(|d| d.status == DealStatus::Won)
        .map(|d| d.value)
        .sum()
}

fn month_start(year: i32, month0: i32) -> Option<DateTime<Utc>> {
    let index = year * 12 + month0;
    NaiveDate::from_ymd_opt(index.div_euclid(12), (index.rem_euclid(12) + 1) as u32, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
}

/// Counts in first-seen order.
fn tally<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for key in keys {
        match counts.iter_mut().find(|(k, _)| k == key) {
            Some((_, n)) => *n += 1,
            None => counts.push((key.to_string(), 1)),
        }
    }
    counts
}

fn status_counts<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<StatusCount> {
    tally(keys)
        .into_iter()
        .map(|(status, count)| StatusCount { status, count })
        .collect()
}

impl Analytics {
    /// Build the report as of `now`.
    pub fn compute(
        range: TimeRange,
        now: DateTime<Utc>,
        deals: &[Deal],
        contacts: &[Contact],
        invoices: &[Invoice],
        tickets: &[Ticket],
    ) -> Self {
        let span = Duration::days(range.days());
        let current = Window {
            start: now - span,
            end: None,
        };
        let previous = Window {
            start: now - span - span,
            end: Some(now - span),
        };

        let deals_in = |w: Window| deals.iter().filter(move |d| w.contains(&d.created_at));
        let contacts_in = |w: Window| contacts.iter().filter(|c| w.contains(&c.created_at)).count();

        let summary = AnalyticsSummary {
            total_deals: deals.len(),
            total_revenue: won_value(deals.iter()),
            total_contacts: contacts.len(),
            total_invoices: invoices.len(),
            total_tickets: tickets.len(),
            deal_growth: growth(
                deals_in(current).count() as f64,
                deals_in(previous).count() as f64,
            ),
            revenue_growth: growth(won_value(deals_in(current)), won_value(deals_in(previous))),
            contact_growth: growth(contacts_in(current) as f64, contacts_in(previous) as f64),
        };

        let monthly = (0..MONTHS)
            .rev()
            .filter_map(|back| {
                let month0 = now.month0() as i32 - back;
                let start = month_start(now.year(), month0)?;
                let end = month_start(now.year(), month0 + 1)?;
                let window = Window {
                    start,
                    end: Some(end),
                };
                Some(MonthlyPoint {
                    month: start.format("%b").to_string(),
                    deals: deals_in(window).count(),
                    revenue: won_value(deals_in(window)),
                    contacts: contacts_in(window),
                    invoices: invoices
                        .iter()
                        .filter(|i| window.contains(&i.created_at))
                        .count(),
                })
            })
            .collect();

        Self {
            range,
            summary,
            monthly,
            deals_by_status: status_counts(deals.iter().map(|d| d.status.as_str())),
            invoices_by_status: status_counts(invoices.iter().map(|i| i.status.as_str())),
            tickets_by_status: tally(tickets.iter().map(|t| t.status.as_str()))
                .into_iter()
                .map(|(status, count)| StatusCount {
                    status: status.replacen('_', " ", 1),
                    count,
                })
                .collect(),
            tickets_by_category: tally(tickets.iter().map(|t| t.category.as_str()))
                .into_iter()
                .map(|(category, count)| CategoryCount { category, count })
                .collect(),
        }
    }
}
