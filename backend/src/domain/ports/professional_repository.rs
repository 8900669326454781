//! Port for professional profile persistence.
use async_trait::async_trait;

use crate::domain::{Credits, DirectoryEntry, ProfessionalProfile, ProfileDetails, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by professional profile adapters.
    pub enum ProfessionalPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "profile repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "profile repository query failed: {message}",
        /// No profile for this user.
        NotFound { id: String } => "professional profile {id} not found",
        /// The grant would overflow the balance.
        CreditOverflow { id: String } => "credit balance of {id} would overflow",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfessionalRepository: Send + Sync {
    /// Fetch a profile by its owner.
    async fn find(
        &self,
        id: &UserId,
    ) -> Result<Option<ProfessionalProfile>, ProfessionalPersistenceError>;

    /// Fetch a profile joined with its account.
    async fn find_entry(
        &self,
        id: &UserId,
    ) -> Result<Option<DirectoryEntry>, ProfessionalPersistenceError>;

    /// Every professional with a profile, joined with their account.
    async fn list_entries(&self) -> Result<Vec<DirectoryEntry>, ProfessionalPersistenceError>;

    /// Replace the editable details and return the stored profile.
    async fn save_details(
        &self,
        id: &UserId,
        details: &ProfileDetails,
    ) -> Result<ProfessionalProfile, ProfessionalPersistenceError>;

    /// Add `amount` to the balance and return the new balance.
    async fn grant_credits(
        &self,
        id: &UserId,
        amount: Credits,
    ) -> Result<Credits, ProfessionalPersistenceError>;
}
