//! Reqwest-backed ViaCEP lookup adapter.
//!
//! This adapter owns transport details only: URL construction, timeout and
//! HTTP error mapping, and JSON decoding into address suggestions.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::dto::ViaCepResponseDto;
use crate::domain::ports::{PostalCodeLookup, PostalLookupError};
use crate::domain::{AddressSuggestion, PostalCode};

const DEFAULT_USER_AGENT: &str = "marketplace-backend/0.1";

/// Postal lookup adapter that performs `GET {base}{cep}/json/` requests.
pub struct ViaCepLookup {
    client: Client,
    base: Url,
}

impl ViaCepLookup {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// A missing trailing slash on `base` is added so that the CEP is
    /// appended rather than replacing the last path segment.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(mut base: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self { client, base })
    }

    fn endpoint(&self, code: &PostalCode) -> Result<Url, PostalLookupError> {
        self.base
            .join(&format!("{}/json/", code.digits()))
            .map_err(|err| PostalLookupError::unavailable(format!("invalid lookup url: {err}")))
    }
}

#[async_trait]
impl PostalCodeLookup for ViaCepLookup {
    async fn lookup(
        &self,
        code: &PostalCode,
    ) -> Result<Option<AddressSuggestion>, PostalLookupError> {
        let url = self.endpoint(code)?;
        debug!(%url, "requesting postal code");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_suggestion(body.as_ref(), code)
    }
}

fn parse_suggestion(
    body: &[u8],
    requested: &PostalCode,
) -> Result<Option<AddressSuggestion>, PostalLookupError> {
    let decoded: ViaCepResponseDto = serde_json::from_slice(body).map_err(|error| {
        PostalLookupError::decode(format!("invalid ViaCEP JSON payload: {error}"))
    })?;
    if decoded.is_not_found() {
        return Ok(None);
    }
    decoded
        .into_suggestion(requested)
        .map(Some)
        .map_err(PostalLookupError::decode)
}

fn map_transport_error(error: reqwest::Error) -> PostalLookupError {
    if error.is_timeout() {
        PostalLookupError::timeout(error.to_string())
    } else {
        PostalLookupError::unavailable(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> PostalLookupError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            PostalLookupError::timeout(message)
        }
        _ => PostalLookupError::unavailable(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
