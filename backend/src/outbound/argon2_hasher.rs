//! Argon2id implementation of the `CredentialHasher` port.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::domain::ports::{CredentialHashError, CredentialHasher};

/// Hashes passwords into PHC strings with the crate's default Argon2id
/// parameters.
#[derive(Debug, Default, Clone)]
pub struct Argon2CredentialHasher {
    argon: Argon2<'static>,
}

impl Argon2CredentialHasher {
    /// Hasher with the default Argon2id parameters.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, password: &str) -> Result<String, CredentialHashError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| CredentialHashError::hash(err.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialHashError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|err| CredentialHashError::malformed_hash(err.to_string()))?;
        match self.argon.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(CredentialHashError::hash(err.to_string())),
        }
    }
}
