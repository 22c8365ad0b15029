use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mercado_core::{DomainError, DomainResult, Entity, UserId, require_non_blank};

use crate::validate;

/// Profile document of a user, keyed by the user's own id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub display_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for UserProfile {
    type Id = UserId;
    const KIND: &'static str = "user";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUserProfile {
    pub id: UserId,
    pub display_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserProfilePatch {
    pub display_name: Option<String>,
    pub email: Option<String>,
}

impl UserProfile {
    pub fn create(data: NewUserProfile, now: DateTime<Utc>) -> DomainResult<Self> {
        let profile = Self {
            id: data.id,
            display_name: data.display_name.trim().to_string(),
            email: data.email.trim().to_string(),
            created_at: now,
            updated_at: now,
        };
        profile.validate()?;
        Ok(profile)
    }

    pub fn patched(&self, patch: &UserProfilePatch, now: DateTime<Utc>) -> DomainResult<Self> {
        let mut next = self.clone();
        if let Some(display_name) = &patch.display_name {
            next.display_name = display_name.trim().to_string();
        }
        if let Some(email) = &patch.email {
            next.email = email.trim().to_string();
        }
        next.validate()?;
        next.updated_at = validate::refreshed(self.updated_at, now);
        Ok(next)
    }

    fn validate(&self) -> DomainResult<()> {
        require_non_blank("displayName", &self.display_name)?;
        match self.email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(DomainError::validation(format!(
                "email '{}' is not a valid address",
                self.email
            ))),
        }
    }
}
