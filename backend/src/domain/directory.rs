//! Public directory of professionals: filtering, ranking and the card shown
//! to visitors.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::address::RegionCode;
use super::professional::{ProfessionalProfile, ProfileValidationError, ServiceCategory};
use super::user::User;

/// Validation errors for directory filters.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectoryFilterError {
    Category(ProfileValidationError),
    UnknownRegion,
    RatingOutOfRange { value: f64 },
}

impl fmt::Display for DirectoryFilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category(err) => err.fmt(f),
            Self::UnknownRegion => write!(f, "region must be a Brazilian state code"),
            Self::RatingOutOfRange { value } => {
                write!(f, "minimum rating must be between 0 and 5, got {value}")
            }
        }
    }
}

impl std::error::Error for DirectoryFilterError {}

/// Fold case and strip Portuguese diacritics so `"Joao"` matches `"João"`.
///
/// # Examples
/// ```
/// use marketplace::domain::directory::fold_text;
///
/// assert_eq!(fold_text("Instalação ELÉTRICA"), "instalacao eletrica");
/// ```
pub fn fold_text(input: &str) -> String {
    input
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

/// Professional joined with its account, as listed in the directory.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryEntry {
    pub user: User,
    pub profile: ProfessionalProfile,
}

/// Directory search criteria. Absent fields do not filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryFilter {
    category: Option<ServiceCategory>,
    region: Option<RegionCode>,
    min_rating: Option<f64>,
    query: Option<String>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl DirectoryFilter {
    /// Validate raw query parameters. Blank strings count as absent.
    pub fn try_new(
        category: Option<&str>,
        region: Option<&str>,
        min_rating: Option<f64>,
        query: Option<&str>,
    ) -> Result<Self, DirectoryFilterError> {
        let category = non_blank(category)
            .map(ServiceCategory::new)
            .transpose()
            .map_err(DirectoryFilterError::Category)?;
        let region = non_blank(region)
            .map(str::parse::<RegionCode>)
            .transpose()
            .map_err(|_| DirectoryFilterError::UnknownRegion)?;
        if let Some(value) = min_rating
            && !(0.0..=5.0).contains(&value)
        {
            return Err(DirectoryFilterError::RatingOutOfRange { value });
        }
        Ok(Self {
            category,
            region,
            min_rating,
            query: non_blank(query).map(fold_text),
        })
    }

    /// Whether `entry` satisfies every criterion. Incomplete profiles never
    /// match.
    pub fn matches(&self, entry: &DirectoryEntry) -> bool {
        let profile = &entry.profile;
        if !profile.is_listed() {
            return false;
        }
        if let Some(category) = &self.category
            && !profile.offers(category)
        {
            return false;
        }
        if self.region.is_some() && profile.region != self.region {
            return false;
        }
        if let Some(min) = self.min_rating
            && profile.rating.average().unwrap_or(0.0) < min
        {
            return false;
        }
        match &self.query {
            Some(needle) => {
                fold_text(entry.user.display_name().as_ref()).contains(needle.as_str())
                    || fold_text(&profile.description).contains(needle.as_str())
            }
            None => true,
        }
    }
}

/// Ranking: best average rating first, then most completed jobs, then name.
pub fn rank(a: &DirectoryEntry, b: &DirectoryEntry) -> Ordering {
    let rating = |entry: &DirectoryEntry| entry.profile.rating.average().unwrap_or(0.0);
    rating(b)
        .total_cmp(&rating(a))
        .then_with(|| b.profile.completed_jobs.cmp(&a.profile.completed_jobs))
        .then_with(|| {
            fold_text(a.user.display_name().as_ref())
                .cmp(&fold_text(b.user.display_name().as_ref()))
        })
}

/// Filter and rank directory entries.
pub fn search(filter: &DirectoryFilter, entries: Vec<DirectoryEntry>) -> Vec<DirectoryEntry> {
    let mut found: Vec<_> = entries
        .into_iter()
        .filter(|entry| filter.matches(entry))
        .collect();
    found.sort_by(rank);
    found
}

/// Public card for a professional. Never carries the credit balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalCard {
    #[schema(value_type = String)]
    pub id: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub description: String,
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<RegionCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    pub review_count: u32,
    pub completed_jobs: u32,
}

impl From<&DirectoryEntry> for ProfessionalCard {
    fn from(entry: &DirectoryEntry) -> Self {
        let DirectoryEntry { user, profile } = entry;
        Self {
            id: user.id().to_string(),
            display_name: user.display_name().to_string(),
            avatar_url: user.avatar().map(|url| url.as_ref().to_owned()),
            description: profile.description.clone(),
            categories: profile.categories.iter().map(ToString::to_string).collect(),
            region: profile.region,
            rating: profile.rating.average(),
            review_count: profile.rating.count(),
            completed_jobs: profile.completed_jobs,
        }
    }
}
