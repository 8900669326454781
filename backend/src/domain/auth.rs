//! Authentication primitives: login credentials and account registration.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{DisplayName, EmailAddress, Role, UserValidationError};

/// Minimum password length accepted at registration.
pub const PASSWORD_MIN: usize = 8;
/// Maximum password length accepted at registration.
pub const PASSWORD_MAX: usize = 128;

/// Domain error returned when login or registration payloads are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthValidationError {
    /// E-mail was blank once trimmed.
    EmptyEmail,
    /// E-mail did not have a valid shape.
    InvalidEmail,
    /// Password was blank.
    EmptyPassword,
    /// Password length outside the accepted range.
    PasswordLength { min: usize, max: usize },
    /// Display name failed its own rules.
    DisplayName(UserValidationError),
    /// Self-service registration cannot request this role.
    RoleNotSelfServe,
}

impl fmt::Display for AuthValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must look like name@domain.tld"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordLength { min, max } => {
                write!(f, "password must be between {min} and {max} characters")
            }
            Self::DisplayName(err) => err.fmt(f),
            Self::RoleNotSelfServe => write!(f, "role must be CLIENT or PROFESSIONAL"),
        }
    }
}

impl std::error::Error for AuthValidationError {}

fn parse_email(raw: &str) -> Result<EmailAddress, AuthValidationError> {
    if raw.trim().is_empty() {
        return Err(AuthValidationError::EmptyEmail);
    }
    EmailAddress::new(raw).map_err(|_| AuthValidationError::InvalidEmail)
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is trimmed, lowercased and well formed.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use marketplace::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Ana@Example.com ", "segredo123").unwrap();
/// assert_eq!(creds.email().as_ref(), "ana@example.com");
/// assert_eq!(creds.password(), "segredo123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw e-mail/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        let email = parse_email(email)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }

        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// E-mail used for the account lookup.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated self-service sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    email: EmailAddress,
    password: Zeroizing<String>,
    display_name: DisplayName,
    role: Role,
}

impl Registration {
    /// Validate sign-up input. Only clients and professionals may register
    /// themselves.
    pub fn try_from_parts(
        email: &str,
        password: &str,
        display_name: &str,
        role: Role,
    ) -> Result<Self, AuthValidationError> {
        let email = parse_email(email)?;
        let length = password.chars().count();
        if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&length) {
            return Err(AuthValidationError::PasswordLength {
                min: PASSWORD_MIN,
                max: PASSWORD_MAX,
            });
        }
        let display_name =
            DisplayName::new(display_name).map_err(AuthValidationError::DisplayName)?;
        if role == Role::Admin {
            return Err(AuthValidationError::RoleNotSelfServe);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
            display_name,
            role,
        })
    }

    /// E-mail the account will log in with.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plaintext password, hashed before storage.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Client or professional; admins are never self-registered.
    pub fn role(&self) -> Role {
        self.role
    }
}
