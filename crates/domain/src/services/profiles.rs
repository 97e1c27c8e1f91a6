//! Profile provisioning for application users.

use std::sync::Arc;

use tracing::info;

use super::store::HiveStore;
use crate::error::HiveError;
use crate::models::{CallForwarding, UserProfiles, UserRef};

/// Creates the default profile rows for a user.
pub struct ProfileProvisioner<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for ProfileProvisioner<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: HiveStore + ?Sized> ProfileProvisioner<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Attach a device list and a call forwarding profile to `user`.
    ///
    /// No existence check is made: associating the same user twice leaves
    /// two rows of each profile.
    pub async fn associate_profiles(&self, user: UserRef) -> Result<UserRef, HiveError> {
        let device_list = self.store.insert_device_list(user.id).await?;
        let forwarding = self.new_call_forwarding_profile(user).await?;

        info!(
            user_id = %user.id,
            device_list_id = device_list.id,
            call_forwarding_id = forwarding.id,
            "Profiles associated with user"
        );
        Ok(user)
    }

    /// Attach a single call forwarding profile to `user`.
    pub async fn new_call_forwarding_profile(
        &self,
        user: UserRef,
    ) -> Result<CallForwarding, HiveError> {
        Ok(self.store.insert_call_forwarding(user.id).await?)
    }

    /// Profile rows currently attached to `user`.
    pub async fn profiles_for(&self, user: UserRef) -> Result<UserProfiles, HiveError> {
        Ok(UserProfiles {
            device_lists: self.store.list_device_lists(user.id).await?,
            call_forwardings: self.store.list_call_forwardings(user.id).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::InMemoryHiveStore;
    use uuid::Uuid;

    fn provisioner() -> ProfileProvisioner<InMemoryHiveStore> {
        ProfileProvisioner::new(Arc::new(InMemoryHiveStore::new()))
    }

    #[tokio::test]
    async fn test_associate_profiles_creates_one_of_each() {
        let provisioner = provisioner();
        let user = UserRef::new(Uuid::new_v4());

        let returned = provisioner.associate_profiles(user).await.unwrap();
        assert_eq!(returned, user);

        let profiles = provisioner.profiles_for(user).await.unwrap();
        assert_eq!(profiles.device_lists.len(), 1);
        assert_eq!(profiles.call_forwardings.len(), 1);
        assert!(profiles.is_provisioned());
    }

    #[tokio::test]
    async fn test_associate_twice_creates_duplicates() {
        let provisioner = provisioner();
        let user = UserRef::new(Uuid::new_v4());

        provisioner.associate_profiles(user).await.unwrap();
        provisioner.associate_profiles(user).await.unwrap();

        let profiles = provisioner.profiles_for(user).await.unwrap();
        assert_eq!(profiles.device_lists.len(), 2);
        assert_eq!(profiles.call_forwardings.len(), 2);
    }

    #[tokio::test]
    async fn test_profiles_are_per_user() {
        let provisioner = provisioner();
        let alice = UserRef::new(Uuid::new_v4());
        let bob = UserRef::new(Uuid::new_v4());

        provisioner.associate_profiles(alice).await.unwrap();
        provisioner.new_call_forwarding_profile(bob).await.unwrap();

        let bob_profiles = provisioner.profiles_for(bob).await.unwrap();
        assert!(bob_profiles.device_lists.is_empty());
        assert_eq!(bob_profiles.call_forwardings.len(), 1);
        assert_eq!(bob_profiles.call_forwardings[0].user_id, bob.id);
    }
}
