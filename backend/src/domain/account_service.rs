//! Account sign-up, login and self-service edits.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tracing::{error, info, warn};
use zeroize::Zeroizing;

use crate::domain::access::{load_actor, map_user_error};
use crate::domain::ports::{
    AccountCommand, AccountUpdate, CredentialHashError, CredentialHasher, LoginService,
    NewAccount, StoredCredentials, UserRepository, UsersQuery,
};
use crate::domain::{
    Credits, DisplayName, Error, LoginCredentials, ProfessionalProfile, Registration, Role, User,
    UserId,
};

const BOOTSTRAP_ADMIN_NAME: &str = "Administrador";

/// Hashed once per service and verified against when a login names an
/// unknown e-mail, so both failure paths cost one Argon2 verification.
const STAND_IN_PASSWORD: &str = "marketplace-unknown-account";

fn map_hash_error(err: CredentialHashError) -> Error {
    error!(error = %err, "credential hashing failed");
    Error::internal("credential hashing failed")
}

/// Run CPU-bound hashing on the blocking pool instead of the worker thread.
async fn run_blocking<T, F>(task: F) -> Result<T, Error>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, CredentialHashError> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| Error::internal(format!("credential task failed: {err}")))?
        .map_err(map_hash_error)
}

/// Account service implementing the login, account and user driving ports.
#[derive(Clone)]
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    welcome_credits: Credits,
    stand_in_hash: Arc<OnceLock<String>>,
}

impl<U, H> AccountService<U, H> {
    /// Create a service granting `welcome_credits` to new professionals.
    pub fn new(users: Arc<U>, hasher: Arc<H>, welcome_credits: Credits) -> Self {
        Self {
            users,
            hasher,
            welcome_credits,
            stand_in_hash: Arc::new(OnceLock::new()),
        }
    }
}

impl<U, H> AccountService<U, H>
where
    H: CredentialHasher + 'static,
{
    async fn hash_password(&self, password: &str) -> Result<String, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        run_blocking(move || hasher.hash(&password)).await
    }

    /// Check `password` against `hash`, or against the stand-in hash when
    /// there is no account; the stand-in never matches.
    async fn verify_password(&self, password: &str, hash: Option<String>) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let stand_in = Arc::clone(&self.stand_in_hash);
        let password = Zeroizing::new(password.to_owned());
        run_blocking(move || match hash {
            Some(hash) => hasher.verify(&password, &hash),
            None => {
                let stand_in_hash = match stand_in.get() {
                    Some(existing) => existing.clone(),
                    None => {
                        let fresh = hasher.hash(STAND_IN_PASSWORD)?;
                        stand_in.get_or_init(|| fresh).clone()
                    }
                };
                hasher.verify(&password, &stand_in_hash).map(|_| false)
            }
        })
        .await
    }
}

impl<U, H> AccountService<U, H>
where
    U: UserRepository,
    H: CredentialHasher + 'static,
{
    /// Create an admin account for `credentials` unless the e-mail is
    /// already registered. Returns `true` when an account was created.
    pub async fn ensure_admin(&self, credentials: &LoginCredentials) -> Result<bool, Error> {
        let existing = self
            .users
            .find_credentials(credentials.email())
            .await
            .map_err(map_user_error)?;
        if let Some(stored) = existing {
            if stored.user.role() != Role::Admin {
                warn!(
                    user_id = %stored.user.id(),
                    "bootstrap admin e-mail belongs to a non-admin account"
                );
            }
            return Ok(false);
        }
        let password_hash = self.hash_password(credentials.password()).await?;
        let display_name = DisplayName::new(BOOTSTRAP_ADMIN_NAME)
            .map_err(|err| Error::internal(format!("bootstrap admin name: {err}")))?;
        let user = User::new(
            UserId::random(),
            display_name,
            credentials.email().clone(),
            Role::Admin,
        );
        self.users
            .create_account(&NewAccount {
                user: user.clone(),
                password_hash,
                profile: None,
            })
            .await
            .map_err(map_user_error)?;
        info!(user_id = %user.id(), "bootstrap admin created");
        Ok(true)
    }
}

#[async_trait]
impl<U, H> LoginService for AccountService<U, H>
where
    U: UserRepository,
    H: CredentialHasher + 'static,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let stored = self
            .users
            .find_credentials(credentials.email())
            .await
            .map_err(map_user_error)?;
        let Some(StoredCredentials {
            user,
            password_hash,
        }) = stored
        else {
            self.verify_password(credentials.password(), None).await?;
            return Err(Error::unauthorized("invalid credentials"));
        };
        let valid = self
            .verify_password(credentials.password(), Some(password_hash))
            .await?;
        if !valid {
            return Err(Error::unauthorized("invalid credentials"));
        }
        Ok(user.id().clone())
    }
}

#[async_trait]
impl<U, H> AccountCommand for AccountService<U, H>
where
    U: UserRepository,
    H: CredentialHasher + 'static,
{
    async fn register(&self, registration: &Registration) -> Result<User, Error> {
        let password_hash = self.hash_password(registration.password()).await?;
        let user = User::new(
            UserId::random(),
            registration.display_name().clone(),
            registration.email().clone(),
            registration.role(),
        );
        let profile = (registration.role() == Role::Professional)
            .then(|| ProfessionalProfile::empty(user.id().clone(), self.welcome_credits));
        self.users
            .create_account(&NewAccount {
                user: user.clone(),
                password_hash,
                profile,
            })
            .await
            .map_err(map_user_error)?;
        info!(user_id = %user.id(), role = %user.role(), "account registered");
        Ok(user)
    }

    async fn update_account(
        &self,
        user_id: &UserId,
        update: AccountUpdate,
    ) -> Result<User, Error> {
        let mut user = load_actor(self.users.as_ref(), user_id).await?;
        user.rename(update.display_name);
        let user = user.with_avatar(update.avatar);
        self.users.update(&user).await.map_err(map_user_error)?;
        Ok(user)
    }
}

#[async_trait]
impl<U, H> UsersQuery for AccountService<U, H>
where
    U: UserRepository,
    H: CredentialHasher,
{
    async fn current_user(&self, user_id: &UserId) -> Result<User, Error> {
        load_actor(self.users.as_ref(), user_id).await
    }
}
