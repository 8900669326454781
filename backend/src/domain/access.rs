//! Role checks and error mapping shared by the domain services.

use tracing::warn;

use crate::domain::ports::{
    OrderPersistenceError, ProfessionalPersistenceError, UserPersistenceError, UserRepository,
};
use crate::domain::{Error, Role, User, UserId};

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { email } => {
            Error::conflict(format!("email {email} is already registered"))
        }
        UserPersistenceError::NotFound { id } => Error::not_found(format!("user {id} not found")),
    }
}

pub(crate) fn map_professional_error(error: ProfessionalPersistenceError) -> Error {
    match error {
        ProfessionalPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("profile repository unavailable: {message}"))
        }
        ProfessionalPersistenceError::Query { message } => {
            Error::internal(format!("profile repository error: {message}"))
        }
        ProfessionalPersistenceError::NotFound { id } => {
            Error::not_found(format!("professional {id} not found"))
        }
        ProfessionalPersistenceError::CreditOverflow { id } => {
            Error::conflict(format!("credit balance of {id} would overflow"))
        }
    }
}

pub(crate) fn map_order_error(error: OrderPersistenceError) -> Error {
    match error {
        OrderPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("order repository unavailable: {message}"))
        }
        OrderPersistenceError::Query { message } => {
            Error::internal(format!("order repository error: {message}"))
        }
        OrderPersistenceError::NotFound { id } => {
            Error::not_found(format!("order {id} not found"))
        }
        OrderPersistenceError::NotOpen { id } => Error::conflict(format!("order {id} is not open")),
        OrderPersistenceError::HiredWithoutUnlock { id, professional } => Error::invalid_request(
            format!("professional {professional} has not unlocked order {id}"),
        ),
    }
}

/// Load the acting user. A session pointing at a deleted account is treated
/// as logged out.
pub(crate) async fn load_actor<U>(users: &U, id: &UserId) -> Result<User, Error>
where
    U: UserRepository + ?Sized,
{
    users
        .find_by_id(id)
        .await
        .map_err(map_user_error)?
        .ok_or_else(|| {
            warn!(user_id = %id, "session refers to a missing account");
            Error::unauthorized("login required")
        })
}

/// Fail with `forbidden` unless `user` holds `role`.
pub(crate) fn require_role(user: &User, role: Role) -> Result<(), Error> {
    if user.role() == role {
        Ok(())
    } else {
        Err(Error::forbidden(format!(
            "{} role required",
            role.as_str().to_ascii_lowercase()
        )))
    }
}

/// Load the acting user and require `role` in one step.
pub(crate) async fn actor_with_role<U>(users: &U, id: &UserId, role: Role) -> Result<User, Error>
where
    U: UserRepository + ?Sized,
{
    let user = load_actor(users, id).await?;
    require_role(&user, role)?;
    Ok(user)
}
