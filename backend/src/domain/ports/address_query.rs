//! Driving port for CEP autocompletion.

use async_trait::async_trait;

use crate::domain::{AddressSuggestion, Error};

#[async_trait]
pub trait AddressQuery: Send + Sync {
    /// Validate `raw_postal_code` and resolve it to an address.
    async fn lookup(&self, raw_postal_code: &str) -> Result<AddressSuggestion, Error>;
}
