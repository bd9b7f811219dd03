//! Profile settings service.

use super::form;
use crate::error::CrmApiResult;
use crate::models::{Profile, ProfileChanges};
use crate::repositories::ProfileRepository;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;

/// Editable profile fields. Blank clears the field.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ProfileForm {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
}

#[async_trait]
pub trait ProfileService: Send + Sync {
    async fn get_profile(&self) -> CrmApiResult<Profile>;

    async fn update_profile(&self, form: ProfileForm) -> CrmApiResult<Profile>;
}

/// Default implementation of ProfileService.
pub struct ProfileServiceImpl {
    repository: Arc<dyn ProfileRepository>,
}

impl ProfileServiceImpl {
    pub fn new(repository: Arc<dyn ProfileRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl ProfileService for ProfileServiceImpl {
    async fn get_profile(&self) -> CrmApiResult<Profile> {
        self.repository.get().await
    }

    async fn update_profile(&self, form: ProfileForm) -> CrmApiResult<Profile> {
        let changes = ProfileChanges {
            full_name: Some(form::text(&form.full_name)),
            phone: Some(form::text(&form.phone)),
            company_name: Some(form::text(&form.company_name)),
            updated_at: Some(form::now_iso()),
        };
        let updated = self.repository.update(&changes).await?;
        tracing::info!("Updated profile {}", updated.id);
        Ok(updated)
    }
}
