//! DTOs for decoding ViaCEP JSON responses.
//!
//! The adapter decodes into this transport DTO first, then maps it into an
//! [`AddressSuggestion`] in one pass.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::{AddressSuggestion, PostalCode, RegionCode};

#[derive(Debug, Deserialize)]
pub(super) struct ViaCepResponseDto {
    #[serde(default)]
    pub(super) erro: Option<Value>,
    #[serde(default)]
    pub(super) cep: Option<String>,
    #[serde(default)]
    pub(super) logradouro: String,
    #[serde(default)]
    pub(super) bairro: String,
    #[serde(default)]
    pub(super) localidade: String,
    #[serde(default)]
    pub(super) uf: String,
}

impl ViaCepResponseDto {
    /// ViaCEP answers 200 with `{"erro": true}` (older deployments send the
    /// string `"true"`) for unknown codes.
    pub(super) fn is_not_found(&self) -> bool {
        match &self.erro {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    pub(super) fn into_suggestion(
        self,
        requested: &PostalCode,
    ) -> Result<AddressSuggestion, String> {
        let postal_code = match self.cep.as_deref() {
            Some(raw) => {
                PostalCode::new(raw).map_err(|err| format!("invalid cep {raw:?}: {err}"))?
            }
            None => requested.clone(),
        };
        let region = self
            .uf
            .parse::<RegionCode>()
            .map_err(|err| format!("invalid uf {:?}: {err}", self.uf))?;
        if self.localidade.trim().is_empty() {
            return Err("response is missing localidade".to_owned());
        }
        Ok(AddressSuggestion {
            postal_code,
            street: self.logradouro.trim().to_owned(),
            neighborhood: self.bairro.trim().to_owned(),
            city: self.localidade.trim().to_owned(),
            region,
        })
    }
}
