//! Test utilities for the marketplace crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled for tests or with the
//! `test-support` feature.

pub mod clock;
pub mod doubles;
pub mod fixtures;

pub mod openapi {
    //! Lookups over the generated OpenAPI document.

    use utoipa::openapi::{OpenApi, RefOr, schema::Schema};

    /// Property names of the object schema registered as `name`.
    ///
    /// # Panics
    /// When `name` is not registered or is not an inline object schema.
    pub fn object_properties(doc: &OpenApi, name: &str) -> Vec<String> {
        let schema = doc
            .components
            .as_ref()
            .and_then(|components| components.schemas.get(name))
            .unwrap_or_else(|| panic!("schema {name} is not registered"));
        match schema {
            RefOr::T(Schema::Object(object)) => object.properties.keys().cloned().collect(),
            RefOr::Ref(reference) => {
                panic!("schema {name} points at {}", reference.ref_location)
            }
            _ => panic!("schema {name} is not an object"),
        }
    }
}
