//! Brazilian taxpayer documents and input masks.
//!
//! CPF identifies individuals (11 digits) and CNPJ identifies companies
//! (14 digits). Both end in two check digits computed from weighted sums
//! modulo 11. Validators and masks are pure: they ignore any non-digit
//! character, never allocate more than the input, and never panic.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Number of digits in a CPF.
pub const CPF_LEN: usize = 11;
/// Number of digits in a CNPJ.
pub const CNPJ_LEN: usize = 14;
/// Number of digits in a CEP (postal code).
pub const CEP_LEN: usize = 8;
/// Maximum number of digits in a phone number with area code.
pub const PHONE_MAX_LEN: usize = 11;

const CNPJ_FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// Keep only ASCII digits, as numeric values.
fn digits_of(input: &str) -> Vec<u32> {
    input.chars().filter_map(|c| c.to_digit(10)).collect()
}

/// Keep only ASCII digits, as a string.
pub fn only_digits(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

fn all_same(digits: &[u32]) -> bool {
    digits.windows(2).all(|pair| pair[0] == pair[1])
}

fn check_digit(digits: &[u32], weights: impl IntoIterator<Item = u32>) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    let remainder = sum % 11;
    if remainder < 2 { 0 } else { 11 - remainder }
}

/// Validate a CPF, ignoring punctuation.
///
/// # Examples
/// ```
/// use marketplace::domain::documents::validate_cpf;
///
/// assert!(validate_cpf("529.982.247-25"));
/// assert!(!validate_cpf("11111111111"));
/// ```
pub fn validate_cpf(input: &str) -> bool {
    let digits = digits_of(input);
    if digits.len() != CPF_LEN || all_same(&digits) {
        return false;
    }
    let first = check_digit(&digits[..9], (2..=10).rev());
    if first != digits[9] {
        return false;
    }
    let second = check_digit(&digits[..10], (2..=11).rev());
    second == digits[10]
}

/// Validate a CNPJ, ignoring punctuation.
///
/// # Examples
/// ```
/// use marketplace::domain::documents::validate_cnpj;
///
/// assert!(validate_cnpj("11.222.333/0001-81"));
/// assert!(!validate_cnpj("00000000000000"));
/// ```
pub fn validate_cnpj(input: &str) -> bool {
    let digits = digits_of(input);
    if digits.len() != CNPJ_LEN || all_same(&digits) {
        return false;
    }
    let first = check_digit(&digits[..12], CNPJ_FIRST_WEIGHTS);
    if first != digits[12] {
        return false;
    }
    let second = check_digit(&digits[..13], CNPJ_SECOND_WEIGHTS);
    second == digits[13]
}

/// Apply a digit pattern where `#` consumes one digit and any other
/// character is a separator emitted only when a digit follows it.
fn apply_pattern(input: &str, pattern: &str, max_digits: usize) -> String {
    let digits: Vec<char> = input
        .chars()
        .filter(char::is_ascii_digit)
        .take(max_digits)
        .collect();
    let mut out = String::with_capacity(pattern.len());
    let mut next = digits.iter();
    let mut pending = String::new();
    for symbol in pattern.chars() {
        if symbol == '#' {
            match next.next() {
                Some(digit) => {
                    out.push_str(&pending);
                    pending.clear();
                    out.push(*digit);
                }
                None => break,
            }
        } else {
            pending.push(symbol);
        }
    }
    out
}

/// Progressive CPF mask: `000.000.000-00`.
///
/// # Examples
/// ```
/// use marketplace::domain::documents::mask_cpf;
///
/// assert_eq!(mask_cpf("5299822"), "529.982.2");
/// assert_eq!(mask_cpf("52998224725"), "529.982.247-25");
/// ```
pub fn mask_cpf(input: &str) -> String {
    apply_pattern(input, "###.###.###-##", CPF_LEN)
}

/// Progressive CNPJ mask: `00.000.000/0000-00`.
pub fn mask_cnpj(input: &str) -> String {
    apply_pattern(input, "##.###.###/####-##", CNPJ_LEN)
}

/// CPF mask up to 11 digits, CNPJ mask beyond.
pub fn mask_document(input: &str) -> String {
    let count = input.chars().filter(char::is_ascii_digit).count();
    if count <= CPF_LEN {
        mask_cpf(input)
    } else {
        mask_cnpj(input)
    }
}

/// Progressive phone mask: `(11) 9999-9999` for landlines and
/// `(11) 99999-9999` once an eleventh digit is typed.
pub fn mask_phone(input: &str) -> String {
    let count = input.chars().filter(char::is_ascii_digit).count();
    if count > 10 {
        apply_pattern(input, "(##) #####-####", PHONE_MAX_LEN)
    } else {
        apply_pattern(input, "(##) ####-####", 10)
    }
}

/// Progressive CEP mask: `00000-000`.
pub fn mask_cep(input: &str) -> String {
    apply_pattern(input, "#####-###", CEP_LEN)
}

/// Kind of taxpayer document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentKind {
    /// Individual taxpayer registry.
    Cpf,
    /// Company registry.
    Cnpj,
}

impl DocumentKind {
    /// Infer the kind from the digit count, if it matches one exactly.
    pub fn detect(input: &str) -> Option<Self> {
        match input.chars().filter(char::is_ascii_digit).count() {
            CPF_LEN => Some(Self::Cpf),
            CNPJ_LEN => Some(Self::Cnpj),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpf => f.write_str("CPF"),
            Self::Cnpj => f.write_str("CNPJ"),
        }
    }
}

/// Reasons a document fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentError {
    /// Digit count is neither 11 nor 14.
    UnknownLength { digits: usize },
    /// Check digits do not match.
    InvalidCheckDigits { kind: DocumentKind },
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownLength { digits } => {
                write!(f, "document must have 11 or 14 digits, got {digits}")
            }
            Self::InvalidCheckDigits { kind } => write!(f, "{kind} check digits do not match"),
        }
    }
}

impl std::error::Error for DocumentError {}

/// A CPF or CNPJ whose check digits have been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    kind: DocumentKind,
    digits: String,
}

impl Document {
    /// Detect the kind by digit count and verify the check digits.
    pub fn parse(input: &str) -> Result<Self, DocumentError> {
        let digits = only_digits(input);
        let kind = DocumentKind::detect(&digits).ok_or(DocumentError::UnknownLength {
            digits: digits.len(),
        })?;
        let valid = match kind {
            DocumentKind::Cpf => validate_cpf(&digits),
            DocumentKind::Cnpj => validate_cnpj(&digits),
        };
        if !valid {
            return Err(DocumentError::InvalidCheckDigits { kind });
        }
        Ok(Self { kind, digits })
    }

    /// Document kind.
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Bare digits.
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Fully formatted representation.
    pub fn masked(&self) -> String {
        mask_document(&self.digits)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}
