//! Field checks shared by the record types.

use chrono::{DateTime, Utc};

use mercado_core::{DomainError, DomainResult};

pub(crate) fn image_url(field: &str, url: &str) -> DomainResult<()> {
    if url.is_empty() || url.starts_with("https://") || url.starts_with("http://") {
        return Ok(());
    }
    Err(DomainError::validation(format!(
        "{field} must be an http(s) URL"
    )))
}

/// Resolve `createdAt`/`updatedAt` for a new record.
pub(crate) fn creation_stamps(
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> DomainResult<(DateTime<Utc>, DateTime<Utc>)> {
    let created = created_at.unwrap_or(now);
    let updated = updated_at.unwrap_or(created);
    if updated < created {
        return Err(DomainError::validation("updatedAt cannot precede createdAt"));
    }
    Ok((created, updated))
}

/// `updatedAt` for a write happening at `now`; never moves backwards.
pub(crate) fn refreshed(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    previous.max(now)
}
