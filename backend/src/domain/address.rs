//! Postal addresses: CEP, federative unit and street address.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::documents::{CEP_LEN, mask_cep, only_digits};

/// Validation errors for address value objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressValidationError {
    InvalidPostalCode,
    UnknownRegion,
    MissingField { field: &'static str },
    FieldTooLong { field: &'static str, max: usize },
}

impl fmt::Display for AddressValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPostalCode => write!(f, "postal code must have 8 digits"),
            Self::UnknownRegion => write!(f, "region must be a Brazilian state code"),
            Self::MissingField { field } => write!(f, "{field} must not be empty"),
            Self::FieldTooLong { field, max } => {
                write!(f, "{field} must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for AddressValidationError {}

/// Brazilian postal code (CEP), stored as 8 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostalCode(String);

impl PostalCode {
    /// Accept masked or bare input with exactly 8 digits.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, AddressValidationError> {
        let raw = raw.as_ref();
        if raw
            .chars()
            .any(|c| !(c.is_ascii_digit() || c == '-' || c == '.' || c.is_whitespace()))
        {
            return Err(AddressValidationError::InvalidPostalCode);
        }
        let digits = only_digits(raw);
        if digits.len() != CEP_LEN {
            return Err(AddressValidationError::InvalidPostalCode);
        }
        Ok(Self(digits))
    }

    /// Bare digits.
    pub fn digits(&self) -> &str {
        &self.0
    }

    /// `00000-000` formatting.
    pub fn masked(&self) -> String {
        mask_cep(&self.0)
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

impl From<PostalCode> for String {
    fn from(value: PostalCode) -> Self {
        value.0
    }
}

impl TryFrom<String> for PostalCode {
    type Error = AddressValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

macro_rules! regions {
    ($($variant:ident => $code:literal, $name:literal;)*) => {
        /// Brazilian federative unit (UF).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
        pub enum RegionCode {
            $(
                #[doc = $name]
                #[serde(rename = $code)]
                $variant,
            )*
        }

        impl RegionCode {
            /// All 27 units in alphabetical order of their code.
            pub const ALL: [RegionCode; 27] = [$(RegionCode::$variant),*];

            /// Two-letter code.
            pub const fn code(self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)*
                }
            }

            /// Full state name.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }
        }

        impl FromStr for RegionCode {
            type Err = AddressValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_uppercase().as_str() {
                    $($code => Ok(Self::$variant),)*
                    _ => Err(AddressValidationError::UnknownRegion),
                }
            }
        }
    };
}

regions! {
    Ac => "AC", "Acre";
    Al => "AL", "Alagoas";
    Am => "AM", "Amazonas";
    Ap => "AP", "Amapá";
    Ba => "BA", "Bahia";
    Ce => "CE", "Ceará";
    Df => "DF", "Distrito Federal";
    Es => "ES", "Espírito Santo";
    Go => "GO", "Goiás";
    Ma => "MA", "Maranhão";
    Mg => "MG", "Minas Gerais";
    Ms => "MS", "Mato Grosso do Sul";
    Mt => "MT", "Mato Grosso";
    Pa => "PA", "Pará";
    Pb => "PB", "Paraíba";
    Pe => "PE", "Pernambuco";
    Pi => "PI", "Piauí";
    Pr => "PR", "Paraná";
    Rj => "RJ", "Rio de Janeiro";
    Rn => "RN", "Rio Grande do Norte";
    Ro => "RO", "Rondônia";
    Rr => "RR", "Roraima";
    Rs => "RS", "Rio Grande do Sul";
    Sc => "SC", "Santa Catarina";
    Se => "SE", "Sergipe";
    Sp => "SP", "São Paulo";
    To => "TO", "Tocantins";
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Maximum length of free-text address lines.
pub const ADDRESS_LINE_MAX: usize = 120;

fn required_line(
    value: &str,
    field: &'static str,
) -> Result<String, AddressValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AddressValidationError::MissingField { field });
    }
    optional_line(trimmed, field)
}

fn optional_line(value: &str, field: &'static str) -> Result<String, AddressValidationError> {
    let trimmed = value.trim();
    if trimmed.chars().count() > ADDRESS_LINE_MAX {
        return Err(AddressValidationError::FieldTooLong {
            field,
            max: ADDRESS_LINE_MAX,
        });
    }
    Ok(trimmed.to_owned())
}

/// Raw address parts before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressParts<'a> {
    pub postal_code: &'a str,
    pub street: &'a str,
    pub number: &'a str,
    pub complement: Option<&'a str>,
    pub neighborhood: &'a str,
    pub city: &'a str,
    pub region: &'a str,
}

/// Service location of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[schema(value_type = String, example = "01310100")]
    pub postal_code: PostalCode,
    pub street: String,
    pub number: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub region: RegionCode,
}

impl Address {
    /// Validate every part, reporting the first failure.
    pub fn try_from_parts(parts: AddressParts<'_>) -> Result<Self, AddressValidationError> {
        Ok(Self {
            postal_code: PostalCode::new(parts.postal_code)?,
            street: required_line(parts.street, "street")?,
            number: required_line(parts.number, "number")?,
            complement: parts
                .complement
                .map(|value| optional_line(value, "complement"))
                .transpose()?
                .filter(|value| !value.is_empty()),
            neighborhood: required_line(parts.neighborhood, "neighborhood")?,
            city: required_line(parts.city, "city")?,
            region: parts.region.parse()?,
        })
    }

    /// Validate every part, collecting all failures with their field names.
    pub fn validate_parts(parts: &AddressParts<'_>) -> Vec<(&'static str, AddressValidationError)> {
        let mut issues = Vec::new();
        if let Err(error) = PostalCode::new(parts.postal_code) {
            issues.push(("postalCode", error));
        }
        for (field, value) in [
            ("street", parts.street),
            ("number", parts.number),
            ("neighborhood", parts.neighborhood),
            ("city", parts.city),
        ] {
            if let Err(error) = required_line(value, field) {
                issues.push((field, error));
            }
        }
        if let Some(Err(error)) = parts
            .complement
            .map(|complement| optional_line(complement, "complement"))
        {
            issues.push(("complement", error));
        }
        if let Err(error) = parts.region.parse::<RegionCode>() {
            issues.push(("region", error));
        }
        issues
    }

    /// Copy keeping only the coarse location (CEP prefix, neighbourhood, city,
    /// region) for professionals who have not unlocked the lead.
    pub fn redacted(&self) -> RedactedAddress {
        RedactedAddress {
            postal_prefix: self.postal_code.digits()[..5].to_owned(),
            neighborhood: self.neighborhood.clone(),
            city: self.city.clone(),
            region: self.region,
        }
    }
}

/// Coarse location shown before a lead is unlocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedactedAddress {
    pub postal_prefix: String,
    pub neighborhood: String,
    pub city: String,
    pub region: RegionCode,
}

/// Address returned by a postal-code lookup; fields may be blank for
/// city-wide CEPs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressSuggestion {
    #[schema(value_type = String)]
    pub postal_code: PostalCode,
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub region: RegionCode,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parts() -> AddressParts<'static> {
        AddressParts {
            postal_code: "01310-100",
            street: "Avenida Paulista",
            number: "1578",
            complement: Some(""),
            neighborhood: "Bela Vista",
            city: "São Paulo",
            region: "sp",
        }
    }

    #[rstest]
    #[case("01310-100", Some("01310100"))]
    #[case("01310100", Some("01310100"))]
    #[case("0131010", None)]
    #[case("01310-10a", None)]
    fn postal_code_requires_eight_digits(#[case] raw: &str, #[case] expected: Option<&str>) {
        let parsed = PostalCode::new(raw).ok();
        assert_eq!(parsed.as_ref().map(PostalCode::digits), expected);
    }

    #[rstest]
    fn every_region_round_trips_through_its_code() {
        for region in RegionCode::ALL {
            assert_eq!(region.code().parse::<RegionCode>(), Ok(region));
        }
        assert!("XX".parse::<RegionCode>().is_err());
    }

    #[rstest]
    fn region_serialises_as_code() {
        let value = serde_json::to_value(RegionCode::Rj).expect("serialise region");
        assert_eq!(value, serde_json::json!("RJ"));
    }

    #[rstest]
    fn address_normalises_parts() {
        let address = Address::try_from_parts(parts()).expect("valid address");
        assert_eq!(address.region, RegionCode::Sp);
        assert_eq!(address.postal_code.masked(), "01310-100");
        assert!(address.complement.is_none());
    }

    #[rstest]
    fn validate_parts_collects_every_problem() {
        let broken = AddressParts {
            postal_code: "123",
            street: " ",
            region: "ZZ",
            ..parts()
        };
        let fields: Vec<_> = Address::validate_parts(&broken)
            .into_iter()
            .map(|(field, _)| field)
            .collect();
        assert_eq!(fields, vec!["postalCode", "street", "region"]);
    }

    #[rstest]
    fn redaction_drops_street_level_detail() {
        let address = Address::try_from_parts(parts()).expect("valid address");
        let redacted = serde_json::to_value(address.redacted()).expect("serialise");
        assert_eq!(redacted["postalPrefix"], "01310");
        assert!(redacted.get("street").is_none());
        assert!(redacted.get("number").is_none());
    }
}
