//! Contact service layer.
//!
//! Form validation and defaults for contacts.

use super::form;
use crate::domain::EmailAddress;
use crate::error::{CrmApiError, CrmApiResult};
use crate::models::{Contact, ContactChanges, NewContact};
use crate::repositories::ContactRepository;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;

const SEARCH_LIMIT: usize = 10;

/// Contact form as submitted by a caller. Blank fields count as absent.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ContactForm {
    /// Full name (required)
    pub name: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Phone number (required)
    pub phone: Option<String>,
    /// WhatsApp number; defaults to the phone number
    pub whatsapp: Option<String>,
    /// Company name
    pub company: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Comma-separated tags, e.g. "client, vip"
    pub tags: Option<String>,
}

/// Contact service trait for business operations.
#[async_trait]
pub trait ContactService: Send + Sync {
    async fn list_contacts(&self) -> CrmApiResult<Vec<Contact>>;

    async fn get_contact(&self, id: &str) -> CrmApiResult<Contact>;

    /// Up to 10 contacts whose name, email, phone or company contains `query`.
    async fn search_contacts(&self, query: &str) -> CrmApiResult<Vec<Contact>>;

    async fn create_contact(&self, form: ContactForm) -> CrmApiResult<Contact>;

    async fn update_contact(&self, id: &str, form: ContactForm) -> CrmApiResult<Contact>;

    async fn delete_contact(&self, id: &str) -> CrmApiResult<()>;
}

/// Default implementation of ContactService.
pub struct ContactServiceImpl {
    repository: Arc<dyn ContactRepository>,
}

impl ContactServiceImpl {
    pub fn new(repository: Arc<dyn ContactRepository>) -> Self {
        Self { repository }
    }

    /// Apply the contact form rules shared by create and update.
    pub fn parse_form(form: &ContactForm) -> CrmApiResult<NewContact> {
        let [name, phone] = form::require(
            [&form.name, &form.phone],
            "Name and phone are required",
        )?;
        let email = EmailAddress::optional(form.email.as_deref())?.map(EmailAddress::into_inner);
        let whatsapp = form::text(&form.whatsapp).unwrap_or_else(|| phone.clone());

        Ok(NewContact {
            name,
            email,
            phone,
            whatsapp: Some(whatsapp),
            company: form::text(&form.company),
            notes: form::text(&form.notes),
            tags: form::tag_list(&form.tags, ','),
        })
    }

    fn validate_search_query(query: &str) -> Result<(), String> {
        if query.trim().is_empty() {
            return Err("Search query cannot be empty".to_string());
        }
        if query.len() > 500 {
            return Err("Search query too long (max 500 characters)".to_string());
        }
        Ok(())
    }
}

#[async_trait]
impl ContactService for ContactServiceImpl {
    async fn list_contacts(&self) -> CrmApiResult<Vec<Contact>> {
        self.repository.list().await
    }

    async fn get_contact(&self, id: &str) -> CrmApiResult<Contact> {
        let id = form::record_id(id)?;
        self.repository.get(&id).await
    }

    async fn search_contacts(&self, query: &str) -> CrmApiResult<Vec<Contact>> {
        Self::validate_search_query(query).map_err(CrmApiError::InvalidRequest)?;
        self.repository.search(query.trim(), SEARCH_LIMIT).await
    }

    async fn create_contact(&self, form: ContactForm) -> CrmApiResult<Contact> {
        let contact = Self::parse_form(&form)?;
        let created = self.repository.create(&contact).await?;
        tracing::info!("Created contact {}", created.id);
        Ok(created)
    }

    async fn update_contact(&self, id: &str, form: ContactForm) -> CrmApiResult<Contact> {
        let id = form::record_id(id)?;
        let mut changes = ContactChanges::from(Self::parse_form(&form)?);
        changes.updated_at = Some(form::now_iso());
        let updated = self.repository.update(&id, &changes).await?;
        tracing::info!("Updated contact {}", id);
        Ok(updated)
    }

    async fn delete_contact(&self, id: &str) -> CrmApiResult<()> {
        let id = form::record_id(id)?;
        self.repository.delete(&id).await?;
        tracing::info!("Deleted contact {}", id);
        Ok(())
    }
}
