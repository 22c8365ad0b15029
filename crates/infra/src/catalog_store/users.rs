//! Owned collection: user profiles, owned by the user whose id is the document id.

use tracing::{info, instrument};

use mercado_auth::{Access, Collection, Ownership, Principal};
use mercado_catalog::{NewUserProfile, UserProfile, UserProfilePatch};
use mercado_core::UserId;

use super::{CatalogStore, StoreError, authenticated, guard, not_found, now};

impl CatalogStore {
    #[instrument(skip(self, data, principal), fields(user_id = %data.id), err)]
    pub fn create_user_profile(
        &self,
        data: NewUserProfile,
        principal: Option<&Principal>,
    ) -> Result<UserProfile, StoreError> {
        guard(
            Collection::Users,
            Access::Write,
            principal,
            Ownership::incoming(&data.id),
        )?;
        let profile = self.users.insert(UserProfile::create(data, now())?)?;
        info!("user profile created");
        Ok(profile)
    }

    #[instrument(skip(self, principal), fields(user_id = %id), err)]
    pub fn read_user_profile(
        &self,
        id: &UserId,
        principal: Option<&Principal>,
    ) -> Result<UserProfile, StoreError> {
        let principal = authenticated(Collection::Users, Access::Read, principal)?;
        guard(Collection::Users, Access::Read, Some(principal), Ownership::stored(id))?;
        self.users.get(id)?.ok_or_else(|| not_found::<UserProfile>(id))
    }

    #[instrument(skip(self, patch, principal), fields(user_id = %id), err)]
    pub fn update_user_profile(
        &self,
        id: &UserId,
        patch: &UserProfilePatch,
        principal: Option<&Principal>,
    ) -> Result<UserProfile, StoreError> {
        guard(Collection::Users, Access::Write, principal, Ownership::stored(id))?;
        let now = now();
        let profile = self.users.modify(id, &mut |p| Ok(p.patched(patch, now)?))?;
        info!("user profile updated");
        Ok(profile)
    }
}
