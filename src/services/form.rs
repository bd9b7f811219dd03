//! Helpers for form-style inputs where an absent field and an empty field
//! mean the same thing.

use crate::domain::RecordId;
use crate::error::{CrmApiError, CrmApiResult};
use chrono::{SecondsFormat, Utc};
use std::str::FromStr;

/// Trimmed value, or `None` when absent or blank.
pub(crate) fn text(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Trimmed non-blank values for every required field, or the fixed message.
pub(crate) fn require<const N: usize>(
    fields: [&Option<String>; N],
    message: &str,
) -> CrmApiResult<[String; N]> {
    let mut values: [String; N] = std::array::from_fn(|_| String::new());
    for (slot, field) in values.iter_mut().zip(fields) {
        *slot = text(field).ok_or_else(|| CrmApiError::InvalidRequest(message.to_string()))?;
    }
    Ok(values)
}

/// Parse an optional enum field; blank selects `default`.
pub(crate) fn choice<T>(field: &Option<String>, default: T) -> CrmApiResult<T>
where
    T: FromStr,
    CrmApiError: From<T::Err>,
{
    match text(field) {
        Some(value) => Ok(value.parse::<T>()?),
        None => Ok(default),
    }
}

/// Parse an optional enum field; blank means "leave unchanged".
pub(crate) fn optional_choice<T>(field: &Option<String>) -> CrmApiResult<Option<T>>
where
    T: FromStr,
    CrmApiError: From<T::Err>,
{
    text(field).map(|v| v.parse::<T>()).transpose().map_err(Into::into)
}

/// Validate an id coming from a caller.
pub(crate) fn record_id(id: &str) -> CrmApiResult<String> {
    Ok(RecordId::new(id)?.into_inner())
}

/// Validate an optional reference to another row; blank means no link.
pub(crate) fn reference(field: &Option<String>) -> CrmApiResult<Option<String>> {
    Ok(RecordId::optional(field.as_deref())?.map(RecordId::into_inner))
}

/// Comma-separated tags, trimmed, empty entries dropped.
pub(crate) fn tag_list(field: &Option<String>, separator: char) -> Vec<String> {
    field
        .as_deref()
        .unwrap_or_default()
        .split(separator)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Current time as stored in `timestamptz` columns (`2024-03-15T09:30:00.000Z`).
pub(crate) fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
