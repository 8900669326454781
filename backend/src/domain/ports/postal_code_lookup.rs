//! Driven port for resolving a CEP into a street address.
use async_trait::async_trait;

use crate::domain::{AddressSuggestion, PostalCode};

use super::define_port_error;

define_port_error! {
    /// Errors raised by postal lookup adapters.
    pub enum PostalLookupError {
        /// The upstream did not answer in time.
        Timeout { message: String } => "postal lookup timed out: {message}",
        /// The upstream failed or could not be reached.
        Unavailable { message: String } => "postal lookup unavailable: {message}",
        /// The upstream answered with an unexpected payload.
        Decode { message: String } => "postal lookup response could not be decoded: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostalCodeLookup: Send + Sync {
    /// Resolve `code`; `None` when the CEP does not exist.
    async fn lookup(
        &self,
        code: &PostalCode,
    ) -> Result<Option<AddressSuggestion>, PostalLookupError>;
}
