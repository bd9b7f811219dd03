//! Activity log service.

use super::form;
use crate::error::CrmApiResult;
use crate::models::{Activity, ActivityType, NewActivity};
use crate::repositories::ActivityRepository;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;

/// Activity entry as submitted by a caller.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ActivityForm {
    /// Short summary (required)
    pub title: Option<String>,
    /// note, call, email, meeting, whatsapp or other (default: note)
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Details
    pub description: Option<String>,
    /// Contact the activity was with
    pub contact_id: Option<String>,
    /// Deal the activity belongs to
    pub deal_id: Option<String>,
}

#[async_trait]
pub trait ActivityService: Send + Sync {
    async fn recent_activity(&self, limit: usize) -> CrmApiResult<Vec<Activity>>;

    async fn contact_activity(&self, contact_id: &str) -> CrmApiResult<Vec<Activity>>;

    async fn log_activity(&self, form: ActivityForm) -> CrmApiResult<Activity>;

    async fn delete_activity(&self, id: &str) -> CrmApiResult<()>;
}

/// Default implementation of ActivityService.
pub struct ActivityServiceImpl {
    repository: Arc<dyn ActivityRepository>,
}

impl ActivityServiceImpl {
    pub fn new(repository: Arc<dyn ActivityRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl ActivityService for ActivityServiceImpl {
    async fn recent_activity(&self, limit: usize) -> CrmApiResult<Vec<Activity>> {
        self.repository.recent(limit).await
    }

    async fn contact_activity(&self, contact_id: &str) -> CrmApiResult<Vec<Activity>> {
        let contact_id = form::record_id(contact_id)?;
        self.repository.for_contact(&contact_id).await
    }

    async fn log_activity(&self, form: ActivityForm) -> CrmApiResult<Activity> {
        let [title] = form::require([&form.title], "Title is required")?;
        let activity = NewActivity {
            contact_id: form::reference(&form.contact_id)?,
            deal_id: form::reference(&form.deal_id)?,
            kind: form::choice(&form.kind, ActivityType::Note)?,
            title,
            description: form::text(&form.description),
        };
        let created = self.repository.create(&activity).await?;
        tracing::info!("Logged {} activity {}", created.kind, created.id);
        Ok(created)
    }

    async fn delete_activity(&self, id: &str) -> CrmApiResult<()> {
        let id = form::record_id(id)?;
        self.repository.delete(&id).await
    }
}
