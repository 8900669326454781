//! Professional profiles and the value objects they are built from.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::address::RegionCode;
use super::documents::{mask_phone, only_digits};
use super::user::UserId;

/// Validation errors for profile value objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileValidationError {
    InvalidCategory,
    NoCategories,
    TooManyCategories { max: usize },
    InvalidPhone,
    DescriptionTooLong { max: usize },
}

impl fmt::Display for ProfileValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCategory => write!(
                f,
                "category must be a lowercase slug of 2 to 48 letters, digits or hyphens",
            ),
            Self::NoCategories => write!(f, "at least one category is required"),
            Self::TooManyCategories { max } => write!(f, "at most {max} categories are allowed"),
            Self::InvalidPhone => write!(f, "phone must have 10 or 11 digits including area code"),
            Self::DescriptionTooLong { max } => {
                write!(f, "description must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for ProfileValidationError {}

/// Service category slug such as `eletricista` or `pintura-residencial`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceCategory(String);

impl ServiceCategory {
    /// Validate a kebab-case slug; input is trimmed and lowercased.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ProfileValidationError> {
        let slug = raw.as_ref().trim().to_ascii_lowercase();
        let len = slug.len();
        let well_formed = (2..=48).contains(&len)
            && slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
            && !slug.starts_with('-')
            && !slug.ends_with('-')
            && !slug.contains("--");
        if well_formed {
            Ok(Self(slug))
        } else {
            Err(ProfileValidationError::InvalidCategory)
        }
    }
}

impl AsRef<str> for ServiceCategory {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ServiceCategory> for String {
    fn from(value: ServiceCategory) -> Self {
        value.0
    }
}

impl TryFrom<String> for ServiceCategory {
    type Error = ProfileValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Maximum number of categories on one profile.
pub const MAX_CATEGORIES: usize = 10;

/// Validate, deduplicate and sort a category list.
pub fn parse_categories<I, S>(raw: I) -> Result<Vec<ServiceCategory>, ProfileValidationError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let unique = raw
        .into_iter()
        .map(ServiceCategory::new)
        .collect::<Result<BTreeSet<_>, _>>()?;
    if unique.is_empty() {
        return Err(ProfileValidationError::NoCategories);
    }
    if unique.len() > MAX_CATEGORIES {
        return Err(ProfileValidationError::TooManyCategories {
            max: MAX_CATEGORIES,
        });
    }
    Ok(unique.into_iter().collect())
}

/// Brazilian phone number with area code, stored as digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Accept masked or bare input with 10 (landline) or 11 (mobile) digits.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ProfileValidationError> {
        let digits = only_digits(raw.as_ref());
        if !(10..=11).contains(&digits.len()) || digits.starts_with('0') {
            return Err(ProfileValidationError::InvalidPhone);
        }
        Ok(Self(digits))
    }

    /// Bare digits.
    pub fn digits(&self) -> &str {
        &self.0
    }

    /// Display form such as `(11) 98765-4321`.
    pub fn masked(&self) -> String {
        mask_phone(&self.0)
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = ProfileValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Credit balance or amount. Arithmetic is checked; balances never go
/// negative.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct Credits(u32);

impl Credits {
    /// Zero credits.
    pub const ZERO: Self = Self(0);

    /// Wrap a raw amount.
    pub const fn new(amount: u32) -> Self {
        Self(amount)
    }

    /// Raw amount.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Add, returning `None` on overflow.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Subtract, returning `None` when the balance would go negative.
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Whether this balance covers `price`.
    pub fn covers(self, price: Self) -> bool {
        self.0 >= price.0
    }
}

impl fmt::Display for Credits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Aggregate of review stars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingSummary {
    total: u32,
    count: u32,
}

impl RatingSummary {
    /// Build from stored totals.
    pub const fn new(total: u32, count: u32) -> Self {
        Self { total, count }
    }

    /// Sum of all stars.
    pub const fn total(self) -> u32 {
        self.total
    }

    /// Number of reviews.
    pub const fn count(self) -> u32 {
        self.count
    }

    /// Include one more review.
    pub fn record(self, stars: u8) -> Self {
        Self {
            total: self.total.saturating_add(u32::from(stars)),
            count: self.count.saturating_add(1),
        }
    }

    /// Mean rating rounded to one decimal, `None` before the first review.
    pub fn average(self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        let mean = f64::from(self.total) / f64::from(self.count);
        Some((mean * 10.0).round() / 10.0)
    }
}

/// Maximum length of a profile description.
pub const PROFILE_DESCRIPTION_MAX: usize = 2000;

/// Editable portion of a professional profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDetails {
    pub description: String,
    pub categories: Vec<ServiceCategory>,
    pub region: RegionCode,
    pub phone: PhoneNumber,
}

impl ProfileDetails {
    /// Validate raw profile input.
    pub fn try_new<I, S>(
        description: &str,
        categories: I,
        region: RegionCode,
        phone: &str,
    ) -> Result<Self, ProfileValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let description = description.trim();
        if description.chars().count() > PROFILE_DESCRIPTION_MAX {
            return Err(ProfileValidationError::DescriptionTooLong {
                max: PROFILE_DESCRIPTION_MAX,
            });
        }
        Ok(Self {
            description: description.to_owned(),
            categories: parse_categories(categories)?,
            region,
            phone: PhoneNumber::new(phone)?,
        })
    }
}

/// Professional side of a user account.
///
/// A freshly registered professional has no categories, region or phone;
/// such a profile is hidden from the directory until completed.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfessionalProfile {
    pub user_id: UserId,
    pub description: String,
    pub categories: Vec<ServiceCategory>,
    pub region: Option<RegionCode>,
    pub phone: Option<PhoneNumber>,
    pub credits: Credits,
    pub completed_jobs: u32,
    pub rating: RatingSummary,
}

impl ProfessionalProfile {
    /// Empty profile holding `credits`.
    pub fn empty(user_id: UserId, credits: Credits) -> Self {
        Self {
            user_id,
            description: String::new(),
            categories: Vec::new(),
            region: None,
            phone: None,
            credits,
            completed_jobs: 0,
            rating: RatingSummary::default(),
        }
    }

    /// Replace the editable details.
    pub fn apply(&mut self, details: ProfileDetails) {
        self.description = details.description;
        self.categories = details.categories;
        self.region = Some(details.region);
        self.phone = Some(details.phone);
    }

    /// Whether the profile can appear in the directory.
    pub fn is_listed(&self) -> bool {
        !self.categories.is_empty() && self.region.is_some()
    }

    /// Whether the profile offers `category`.
    pub fn offers(&self, category: &ServiceCategory) -> bool {
        self.categories.contains(category)
    }
}
