//! Driven port for password hashing.

use super::define_port_error;

define_port_error! {
    /// Errors raised by credential hashers.
    pub enum CredentialHashError {
        /// Hashing failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Hashing is CPU-bound and synchronous.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    /// Produce a self-describing hash string for `password`.
    fn hash(&self, password: &str) -> Result<String, CredentialHashError>;

    /// Check `password` against a hash produced by [`CredentialHasher::hash`].
    fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialHashError>;
}
