//! Postal-code outbound adapters.
//!
//! A thin HTTP implementation of the `PostalCodeLookup` port against a
//! ViaCEP-compatible endpoint.

mod dto;
mod http_source;

pub use http_source::ViaCepLookup;
