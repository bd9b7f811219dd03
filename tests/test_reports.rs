//! Dashboard and analytics reports over in-memory repositories.

mod mocks;

use crm_mcp_server::reports::{ReportService, ReportServiceImpl, ReportSources, TimeRange};
use crm_mcp_server::services::*;
use mocks::MockRepositories;
use std::sync::Arc;

struct Fixture {
    mocks: MockRepositories,
    reports: ReportServiceImpl,
}

async fn fixture() -> Fixture {
    let mocks = MockRepositories::new();
    let contacts = ContactServiceImpl::new(Arc::new(mocks.contacts.clone()));
    let deals = DealServiceImpl::new(Arc::new(mocks.deals.clone()));
    let invoices = InvoiceServiceImpl::new(Arc::new(mocks.invoices.clone()));
    let reminders = ReminderServiceImpl::new(Arc::new(mocks.reminders.clone()));
    let tickets = TicketServiceImpl::new(Arc::new(mocks.tickets.clone()));

    for name in ["Ana", "Bruno", "Carla"] {
        contacts
            .create_contact(ContactForm {
                name: Some(name.to_string()),
                phone: Some("1".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    for (title, value, status) in [
        ("Website", "1000", "won"),
        ("Logo", "250", "new"),
        ("Hosting", "400", "won"),
        ("Audit", "900", "lost"),
    ] {
        deals
            .create_deal(DealForm {
                title: Some(title.to_string()),
                value: Some(value.to_string()),
                status: Some(status.to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    for (number, status, price) in [("INV-001", "paid", 500), ("INV-002", "sent", 300)] {
        invoices
            .create_invoice(InvoiceForm {
                invoice_number: Some(number.to_string()),
                due_date: Some("2024-04-01".to_string()),
                status: Some(status.to_string()),
                items: Some(serde_json::json!([
                    {"description": "Work", "quantity": 1, "price": price}
                ])),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    for (title, due) in [("Past", "2000-01-01"), ("Future", "2099-01-01")] {
        reminders
            .create_reminder(ReminderForm {
                title: Some(title.to_string()),
                due_date: Some(due.to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    for (subject, category) in [("Login", "technical"), ("Refund", "billing"), ("Crash", "technical")] {
        tickets
            .create_ticket(TicketForm {
                subject: Some(subject.to_string()),
                category: Some(category.to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    let reports = ReportServiceImpl::new(ReportSources::from(&mocks.repositories()));
    Fixture { mocks, reports }
}

#[tokio::test]
async fn test_dashboard_stats() {
    let f = fixture().await;

    let stats = f.reports.dashboard_stats().await.unwrap();

    assert_eq!(stats.total_contacts, 3);
    assert_eq!(stats.total_deals, 4);
    assert_eq!(stats.deal_value, 2550.0);
    assert_eq!(stats.won_deals, 2);
    assert_eq!(stats.total_invoices, 2);
    assert_eq!(stats.paid_invoices, 500.0);
    assert_eq!(stats.pending_reminders, 2);
    assert_eq!(f.mocks.contacts.get_call_count("count"), 1);
}

#[tokio::test]
async fn test_dashboard_lists() {
    let f = fixture().await;

    let dashboard = f.reports.dashboard().await.unwrap();

    assert_eq!(dashboard.recent_deals.len(), 4);
    assert_eq!(dashboard.recent_deals[0].title, "Audit");
    let upcoming: Vec<&str> = dashboard
        .upcoming_reminders
        .iter()
        .map(|r| r.title.as_str())
        .collect();
    assert_eq!(upcoming, vec!["Future"]);
    assert!(dashboard.recent_activity.is_empty());
}

#[tokio::test]
async fn test_reminder_and_ticket_counts() {
    let f = fixture().await;

    let reminders = f.reports.reminder_counts().await.unwrap();
    assert_eq!(reminders.total, 2);
    assert_eq!(reminders.pending, 2);
    assert_eq!(reminders.overdue, 1);
    assert_eq!(reminders.completed, 0);

    let tickets = f.reports.ticket_counts().await.unwrap();
    assert_eq!(tickets.total, 3);
    assert_eq!(tickets.open, 3);
    assert_eq!(tickets.resolved, 0);
}

#[tokio::test]
async fn test_analytics_totals_and_breakdowns() {
    let f = fixture().await;

    let analytics = f.reports.analytics(TimeRange::Quarter).await.unwrap();

    assert_eq!(analytics.range, TimeRange::Quarter);
    assert_eq!(analytics.summary.total_deals, 4);
    assert_eq!(analytics.summary.total_revenue, 1400.0);
    assert_eq!(analytics.summary.total_contacts, 3);
    assert_eq!(analytics.summary.total_invoices, 2);
    assert_eq!(analytics.summary.total_tickets, 3);
    assert_eq!(analytics.monthly.len(), 6);

    let categories: Vec<(&str, usize)> = analytics
        .tickets_by_category
        .iter()
        .map(|c| (c.category.as_str(), c.count))
        .collect();
    // newest ticket first, so "technical" (Crash) is seen before "billing"
    assert_eq!(categories, vec![("technical", 2), ("billing", 1)]);
    assert_eq!(analytics.invoices_by_status.len(), 2);
}

#[tokio::test]
async fn test_report_fails_when_a_source_fails() {
    let f = fixture().await;
    f.mocks.deals.fail_reads();

    assert!(f.reports.dashboard_stats().await.is_err());
}
