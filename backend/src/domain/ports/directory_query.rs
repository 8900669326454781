//! Driving port for the public directory and profile pages.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Credits, DirectoryFilter, Error, ProfessionalCard, Review, UserId};

/// Review as shown on a profile page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    #[schema(value_type = String)]
    pub id: String,
    #[schema(value_type = String)]
    pub client_id: String,
    pub stars: u8,
    pub comment: String,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
}

impl From<&Review> for ReviewView {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id.to_string(),
            client_id: review.client_id.to_string(),
            stars: review.stars.get(),
            comment: review.comment.as_ref().to_owned(),
            created_at: review.created_at,
        }
    }
}

/// Public profile page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalPage {
    #[serde(flatten)]
    pub card: ProfessionalCard,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub reviews: Vec<ReviewView>,
}

/// A professional's view of their own profile, including the balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnProfile {
    #[serde(flatten)]
    pub card: ProfessionalCard,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[schema(value_type = u32)]
    pub credits: Credits,
}

#[async_trait]
pub trait DirectoryQuery: Send + Sync {
    /// Listed professionals matching `filter`, best ranked first.
    async fn search(&self, filter: &DirectoryFilter) -> Result<Vec<ProfessionalCard>, Error>;

    /// Profile page with reviews, newest first.
    async fn profile(&self, professional: &UserId) -> Result<ProfessionalPage, Error>;

    /// The caller's own profile.
    async fn own_profile(&self, user_id: &UserId) -> Result<OwnProfile, Error>;
}
