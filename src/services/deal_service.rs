//! Deal service layer: deal forms and the pipeline view.

use super::form;
use crate::domain::parse_number_lenient;
use crate::error::CrmApiResult;
use crate::models::{Deal, DealChanges, DealStatus, NewDeal};
use crate::repositories::DealRepository;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Deal form as submitted by a caller.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct DealForm {
    /// Deal title (required)
    pub title: Option<String>,
    /// Deal value; the leading number is used ("1500 EUR" is 1500), otherwise 0
    pub value: Option<String>,
    /// new, quoted, negotiating, won or lost (default: new)
    pub status: Option<String>,
    /// Linked contact id
    pub contact_id: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Expected close date (YYYY-MM-DD)
    pub expected_close_date: Option<String>,
}

/// One column of the pipeline board.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PipelineStage {
    pub status: DealStatus,
    pub label: &'static str,
    pub count: usize,
    pub value: f64,
    pub deals: Vec<Deal>,
}

/// Deals grouped by stage.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Pipeline {
    pub stages: Vec<PipelineStage>,
    /// Value of every deal that is not lost.
    pub total_value: f64,
}

impl Pipeline {
    pub fn from_deals(deals: Vec<Deal>) -> Self {
        let total_value = deals
            .iter()
            .filter(|d| d.status != DealStatus::Lost)
            .map(|d| d.value)
            .sum();

        let stages = DealStatus::ALL
            .iter()
            .map(|&status| {
                let in_stage: Vec<Deal> =
                    deals.iter().filter(|d| d.status == status).cloned().collect();
                PipelineStage {
                    status,
                    label: status.label(),
                    count: in_stage.len(),
                    value: in_stage.iter().map(|d| d.value).sum(),
                    deals: in_stage,
                }
            })
            .collect();

        Self {
            stages,
            total_value,
        }
    }
}

/// Deal service trait for business operations.
#[async_trait]
pub trait DealService: Send + Sync {
    async fn list_deals(&self) -> CrmApiResult<Vec<Deal>>;

    async fn get_deal(&self, id: &str) -> CrmApiResult<Deal>;

    async fn create_deal(&self, form: DealForm) -> CrmApiResult<Deal>;

    /// Rewrite a deal; an absent status leaves the stage unchanged.
    async fn update_deal(&self, id: &str, form: DealForm) -> CrmApiResult<Deal>;

    /// Move a deal to any stage.
    async fn update_deal_status(&self, id: &str, status: &str) -> CrmApiResult<Deal>;

    async fn delete_deal(&self, id: &str) -> CrmApiResult<()>;

    async fn pipeline(&self) -> CrmApiResult<Pipeline>;
}

/// Default implementation of DealService.
pub struct DealServiceImpl {
    repository: Arc<dyn DealRepository>,
}

impl DealServiceImpl {
    pub fn new(repository: Arc<dyn DealRepository>) -> Self {
        Self { repository }
    }

    /// Apply the deal form rules; the status falls back to `new`.
    fn parse_form(form: &DealForm) -> CrmApiResult<NewDeal> {
        let [title] = form::require([&form.title], "Title is required")?;
        Ok(NewDeal {
            contact_id: form::reference(&form.contact_id)?,
            title,
            value: parse_number_lenient(form.value.as_deref().unwrap_or_default()),
            status: form::choice(&form.status, DealStatus::New)?,
            description: form::text(&form.description),
            expected_close_date: form::text(&form.expected_close_date),
        })
    }
}

#[async_trait]
impl DealService for DealServiceImpl {
    async fn list_deals(&self) -> CrmApiResult<Vec<Deal>> {
        self.repository.list().await
    }

    async fn get_deal(&self, id: &str) -> CrmApiResult<Deal> {
        let id = form::record_id(id)?;
        self.repository.get(&id).await
    }

    async fn create_deal(&self, form: DealForm) -> CrmApiResult<Deal> {
        let deal = Self::parse_form(&form)?;
        let created = self.repository.create(&deal).await?;
        tracing::info!("Created deal {} ({})", created.id, created.status);
        Ok(created)
    }

    async fn update_deal(&self, id: &str, form: DealForm) -> CrmApiResult<Deal> {
        let id = form::record_id(id)?;
        let deal = Self::parse_form(&form)?;
        let changes = DealChanges {
            contact_id: Some(deal.contact_id),
            title: Some(deal.title),
            value: Some(deal.value),
            status: form::optional_choice(&form.status)?,
            description: Some(deal.description),
            expected_close_date: Some(deal.expected_close_date),
            updated_at: Some(form::now_iso()),
        };
        let updated = self.repository.update(&id, &changes).await?;
        tracing::info!("Updated deal {}", id);
        Ok(updated)
    }

    async fn update_deal_status(&self, id: &str, status: &str) -> CrmApiResult<Deal> {
        let id = form::record_id(id)?;
        let status: DealStatus = status.parse()?;
        let changes = DealChanges {
            status: Some(status),
            updated_at: Some(form::now_iso()),
            ..Default::default()
        };
        let updated = self.repository.update(&id, &changes).await?;
        tracing::info!("Moved deal {} to {}", id, status);
        Ok(updated)
    }

    async fn delete_deal(&self, id: &str) -> CrmApiResult<()> {
        let id = form::record_id(id)?;
        self.repository.delete(&id).await?;
        tracing::info!("Deleted deal {}", id);
        Ok(())
    }

    async fn pipeline(&self) -> CrmApiResult<Pipeline> {
        Ok(Pipeline::from_deals(self.repository.list().await?))
    }
}
