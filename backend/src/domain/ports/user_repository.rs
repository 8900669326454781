//! Port abstraction for account persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Credits, EmailAddress, ProfessionalProfile, Role, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses this e-mail.
        DuplicateEmail { email: String } => "email {email} is already registered",
        /// No account with this id.
        NotFound { id: String } => "user {id} not found",
    }
}

/// New account written in one go: the user row, its password hash and, for
/// professionals, the empty profile.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub user: User,
    pub password_hash: String,
    pub profile: Option<ProfessionalProfile>,
}

/// Account row used for password verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub user: User,
    pub password_hash: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert the account atomically.
    async fn create_account(&self, account: &NewAccount) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch the account and password hash for a login attempt.
    async fn find_credentials(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;

    /// Every account, ordered by display name.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Persist display name and avatar changes.
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Change the role. Promoting to professional creates an empty profile
    /// holding `welcome_credits` in the same transaction when none exists.
    async fn set_role(
        &self,
        id: &UserId,
        role: Role,
        welcome_credits: Credits,
    ) -> Result<User, UserPersistenceError>;
}
