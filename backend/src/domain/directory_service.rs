//! Directory search, profile pages, profile edits and reviews.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;
use uuid::Uuid;

use crate::domain::access::{
    actor_with_role, map_order_error, map_professional_error,
};
use crate::domain::directory::{self, DirectoryEntry};
use crate::domain::ports::{
    DirectoryQuery, OrderRepository, OwnProfile, ProfessionalPage, ProfessionalRepository,
    ProfileCommand, ReviewCommand, ReviewPersistenceError, ReviewRepository, ReviewView,
    UserRepository,
};
use crate::domain::{
    DirectoryFilter, Error, ProfessionalCard, ProfileDetails, Review, ReviewComment, Role, Stars,
    UserId,
};

fn map_review_error(error: ReviewPersistenceError) -> Error {
    match error {
        ReviewPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("review repository unavailable: {message}"))
        }
        ReviewPersistenceError::Query { message } => {
            Error::internal(format!("review repository error: {message}"))
        }
        ReviewPersistenceError::Duplicate { .. } => {
            Error::conflict("you have already reviewed this professional")
        }
        ReviewPersistenceError::ProfileNotFound { id } => {
            Error::not_found(format!("professional {id} not found"))
        }
    }
}

fn own_profile(entry: &DirectoryEntry) -> OwnProfile {
    OwnProfile {
        card: ProfessionalCard::from(entry),
        phone: entry.profile.phone.as_ref().map(|phone| phone.masked()),
        credits: entry.profile.credits,
    }
}

/// Driven ports used by [`DirectoryService`].
pub struct DirectoryRepositories<U, P, R, O> {
    pub users: Arc<U>,
    pub professionals: Arc<P>,
    pub reviews: Arc<R>,
    pub orders: Arc<O>,
}

/// Service implementing the directory, profile and review driving ports.
pub struct DirectoryService<U, P, R, O> {
    users: Arc<U>,
    professionals: Arc<P>,
    reviews: Arc<R>,
    orders: Arc<O>,
    clock: Arc<dyn Clock>,
}

impl<U, P, R, O> DirectoryService<U, P, R, O> {
    /// Reviews are timestamped with `clock`.
    pub fn new(repositories: DirectoryRepositories<U, P, R, O>, clock: Arc<dyn Clock>) -> Self {
        let DirectoryRepositories {
            users,
            professionals,
            reviews,
            orders,
        } = repositories;
        Self {
            users,
            professionals,
            reviews,
            orders,
            clock,
        }
    }
}

impl<U, P, R, O> DirectoryService<U, P, R, O>
where
    P: ProfessionalRepository,
{
    async fn entry(&self, id: &UserId) -> Result<DirectoryEntry, Error> {
        self.professionals
            .find_entry(id)
            .await
            .map_err(map_professional_error)?
            .ok_or_else(|| Error::not_found(format!("professional {id} not found")))
    }
}

#[async_trait]
impl<U, P, R, O> DirectoryQuery for DirectoryService<U, P, R, O>
where
    U: UserRepository,
    P: ProfessionalRepository,
    R: ReviewRepository,
    O: OrderRepository,
{
    async fn search(&self, filter: &DirectoryFilter) -> Result<Vec<ProfessionalCard>, Error> {
        let entries = self
            .professionals
            .list_entries()
            .await
            .map_err(map_professional_error)?;
        Ok(directory::search(filter, entries)
            .iter()
            .map(ProfessionalCard::from)
            .collect())
    }

    async fn profile(&self, professional: &UserId) -> Result<ProfessionalPage, Error> {
        let entry = self.entry(professional).await?;
        if !entry.profile.is_listed() {
            return Err(Error::not_found(format!(
                "professional {professional} not found"
            )));
        }
        let reviews = self
            .reviews
            .list_for_professional(professional)
            .await
            .map_err(map_review_error)?;
        Ok(ProfessionalPage {
            card: ProfessionalCard::from(&entry),
            phone: entry.profile.phone.as_ref().map(|phone| phone.masked()),
            reviews: reviews.iter().map(ReviewView::from).collect(),
        })
    }

    async fn own_profile(&self, user_id: &UserId) -> Result<OwnProfile, Error> {
        actor_with_role(self.users.as_ref(), user_id, Role::Professional).await?;
        Ok(own_profile(&self.entry(user_id).await?))
    }
}

#[async_trait]
impl<U, P, R, O> ProfileCommand for DirectoryService<U, P, R, O>
where
    U: UserRepository,
    P: ProfessionalRepository,
    R: ReviewRepository,
    O: OrderRepository,
{
    async fn update_profile(
        &self,
        user_id: &UserId,
        details: ProfileDetails,
    ) -> Result<OwnProfile, Error> {
        actor_with_role(self.users.as_ref(), user_id, Role::Professional).await?;
        self.professionals
            .save_details(user_id, &details)
            .await
            .map_err(map_professional_error)?;
        Ok(own_profile(&self.entry(user_id).await?))
    }
}

#[async_trait]
impl<U, P, R, O> ReviewCommand for DirectoryService<U, P, R, O>
where
    U: UserRepository,
    P: ProfessionalRepository,
    R: ReviewRepository,
    O: OrderRepository,
{
    async fn submit_review(
        &self,
        client: &UserId,
        professional: &UserId,
        stars: Stars,
        comment: ReviewComment,
    ) -> Result<ReviewView, Error> {
        actor_with_role(self.users.as_ref(), client, Role::Client).await?;
        self.entry(professional).await?;
        let engaged = self
            .orders
            .has_engaged(client, professional)
            .await
            .map_err(map_order_error)?;
        if !engaged {
            return Err(Error::forbidden(
                "only clients whose order this professional unlocked may review them",
            ));
        }
        let review = Review {
            id: Uuid::new_v4(),
            professional_id: professional.clone(),
            client_id: client.clone(),
            stars,
            comment,
            created_at: self.clock.utc(),
        };
        let summary = self
            .reviews
            .insert_and_rerate(&review)
            .await
            .map_err(map_review_error)?;
        info!(
            professional_id = %professional,
            stars = stars.get(),
            reviews = summary.count(),
            "review recorded"
        );
        Ok(ReviewView::from(&review))
    }
}

#[cfg(test)]
#[path = "directory_service_tests.rs"]
mod tests;
