//! RecordId value object.

use super::errors::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const MAX_ID_LEN: usize = 100;

/// A type-safe wrapper for row ids (contacts, deals, invoices, ...).
///
/// Ids are trimmed and must be non-empty; they are interpolated into
/// PostgREST `id=eq.` filters.
///
/// # Example
///
/// ```
/// use crm_mcp_server::domain::RecordId;
///
/// let id = RecordId::new(" 6f1c2a ").unwrap();
/// assert_eq!(id.as_str(), "6f1c2a");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId(String);

impl RecordId {
    /// Create a new RecordId.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyId` for blank input and
    /// `ValidationError::IdTooLong` past 100 characters.
    pub fn new(id: impl AsRef<str>) -> Result<Self, ValidationError> {
        let id = id.as_ref().trim();
        if id.is_empty() {
            return Err(ValidationError::EmptyId);
        }
        if id.len() > MAX_ID_LEN {
            return Err(ValidationError::IdTooLong(id.len()));
        }
        Ok(Self(id.to_string()))
    }

    /// Parse an optional form field: blank means "no reference".
    pub fn optional(id: Option<&str>) -> Result<Option<Self>, ValidationError> {
        match id.map(str::trim) {
            None | Some("") => Ok(None),
            Some(id) => Self::new(id).map(Some),
        }
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the underlying String.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Serialize for RecordId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RecordId::new(s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
