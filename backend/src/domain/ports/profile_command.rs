//! Driving port for professionals editing their profile.

use async_trait::async_trait;

use crate::domain::{Error, ProfileDetails, UserId};

use super::OwnProfile;

#[async_trait]
pub trait ProfileCommand: Send + Sync {
    /// Replace the caller's profile details.
    async fn update_profile(
        &self,
        user_id: &UserId,
        details: ProfileDetails,
    ) -> Result<OwnProfile, Error>;
}
