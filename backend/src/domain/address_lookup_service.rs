//! CEP autocompletion for the order wizard's location step.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use crate::domain::ports::{AddressQuery, PostalCodeLookup, PostalLookupError};
use crate::domain::{AddressSuggestion, Error, PostalCode};

fn map_lookup_error(error: PostalLookupError) -> Error {
    warn!(error = %error, "postal lookup failed");
    match error {
        PostalLookupError::Timeout { .. } | PostalLookupError::Unavailable { .. } => {
            Error::service_unavailable("postal code lookup is temporarily unavailable")
        }
        PostalLookupError::Decode { .. } => {
            Error::service_unavailable("postal code lookup returned an unexpected response")
        }
    }
}

/// Service implementing [`AddressQuery`] on top of a [`PostalCodeLookup`].
#[derive(Clone)]
pub struct AddressLookupService<L> {
    lookup: Arc<L>,
}

impl<L> AddressLookupService<L> {
    /// Service resolving postal codes through `lookup`.
    pub fn new(lookup: Arc<L>) -> Self {
        Self { lookup }
    }
}

#[async_trait]
impl<L> AddressQuery for AddressLookupService<L>
where
    L: PostalCodeLookup,
{
    async fn lookup(&self, raw_postal_code: &str) -> Result<AddressSuggestion, Error> {
        let code = PostalCode::new(raw_postal_code).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({
                "field": "cep",
                "code": "invalid_postal_code",
                "value": raw_postal_code,
            }))
        })?;
        self.lookup
            .lookup(&code)
            .await
            .map_err(map_lookup_error)?
            .ok_or_else(|| Error::not_found(format!("postal code {code} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockPostalCodeLookup;
    use crate::domain::{ErrorCode, RegionCode};
    use rstest::rstest;

    fn suggestion() -> AddressSuggestion {
        AddressSuggestion {
            postal_code: PostalCode::new("01001000").expect("cep"),
            street: "Praça da Sé".into(),
            neighborhood: "Sé".into(),
            city: "São Paulo".into(),
            region: RegionCode::Sp,
        }
    }

    #[tokio::test]
    async fn masked_input_is_normalised_before_lookup() {
        let mut lookup = MockPostalCodeLookup::new();
        lookup
            .expect_lookup()
            .withf(|code| code.digits() == "01001000")
            .times(1)
            .return_once(|_| Ok(Some(suggestion())));
        let found = AddressLookupService::new(Arc::new(lookup))
            .lookup("01001-000")
            .await
            .expect("found");
        assert_eq!(found.city, "São Paulo");
    }

    #[tokio::test]
    async fn malformed_cep_never_reaches_the_upstream() {
        let mut lookup = MockPostalCodeLookup::new();
        lookup.expect_lookup().times(0);
        let err = AddressLookupService::new(Arc::new(lookup))
            .lookup("123")
            .await
            .expect_err("invalid");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[case(Ok(None), ErrorCode::NotFound)]
    #[case(Err(PostalLookupError::timeout("5s")), ErrorCode::ServiceUnavailable)]
    #[case(Err(PostalLookupError::unavailable("502")), ErrorCode::ServiceUnavailable)]
    #[case(Err(PostalLookupError::decode("bad json")), ErrorCode::ServiceUnavailable)]
    #[tokio::test]
    async fn upstream_failures_are_mapped(
        #[case] outcome: Result<Option<AddressSuggestion>, PostalLookupError>,
        #[case] expected: ErrorCode,
    ) {
        let mut lookup = MockPostalCodeLookup::new();
        lookup.expect_lookup().return_once(move |_| outcome);
        let err = AddressLookupService::new(Arc::new(lookup))
            .lookup("01001000")
            .await
            .expect_err("mapped");
        assert_eq!(err.code(), expected);
    }
}
