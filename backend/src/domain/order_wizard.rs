//! Step-by-step order creation.
//!
//! Clients fill an [`OrderDraft`] across five steps. Each step can be
//! validated on its own so the UI can block "next" early; [`OrderWizard::finish`]
//! re-validates everything and produces the [`NewOrder`] to persist.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::address::{Address, AddressParts};
use super::order::{DeadlineBucket, NewOrder};
use super::professional::{PhoneNumber, ServiceCategory};

/// Minimum description length in characters.
pub const ORDER_DESCRIPTION_MIN: usize = 20;
/// Maximum description length in characters.
pub const ORDER_DESCRIPTION_MAX: usize = 2000;

/// Wizard steps in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WizardStep {
    Category,
    Description,
    Location,
    Deadline,
    Review,
}

impl WizardStep {
    /// Every step in order.
    pub const ALL: [WizardStep; 5] = [
        Self::Category,
        Self::Description,
        Self::Location,
        Self::Deadline,
        Self::Review,
    ];

    fn index(self) -> usize {
        match self {
            Self::Category => 0,
            Self::Description => 1,
            Self::Location => 2,
            Self::Deadline => 3,
            Self::Review => 4,
        }
    }
}

/// Partially filled order. Every field is optional until its step is
/// validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderDraft {
    pub category: Option<String>,
    pub description: Option<String>,
    pub postal_code: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub complement: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub contact_phone: Option<String>,
    pub deadline: Option<String>,
}

/// A problem with one draft field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldIssue {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl FieldIssue {
    fn new(field: &str, code: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_owned(),
            code: code.to_owned(),
            message: message.into(),
        }
    }

    fn missing(field: &str) -> Self {
        Self::new(field, "missing_field", format!("{field} is required"))
    }
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

/// Stateless validator driving the order wizard.
pub struct OrderWizard;

impl OrderWizard {
    /// Step after `step`, or `None` on the review step.
    pub fn next_step(step: WizardStep) -> Option<WizardStep> {
        WizardStep::ALL.get(step.index() + 1).copied()
    }

    /// Step before `step`, or `None` on the first step.
    pub fn previous_step(step: WizardStep) -> Option<WizardStep> {
        step.index()
            .checked_sub(1)
            .and_then(|index| WizardStep::ALL.get(index).copied())
    }

    /// Validate the fields owned by `step`. The review step validates the
    /// whole draft.
    pub fn validate_step(step: WizardStep, draft: &OrderDraft) -> Vec<FieldIssue> {
        match step {
            WizardStep::Category => Self::check_category(draft),
            WizardStep::Description => Self::check_description(draft),
            WizardStep::Location => Self::check_location(draft),
            WizardStep::Deadline => Self::check_deadline(draft),
            WizardStep::Review => WizardStep::ALL[..4]
                .iter()
                .flat_map(|step| Self::validate_step(*step, draft))
                .collect(),
        }
    }

    /// First step whose fields are not yet valid.
    pub fn first_incomplete_step(draft: &OrderDraft) -> Option<WizardStep> {
        WizardStep::ALL[..4]
            .iter()
            .copied()
            .find(|step| !Self::validate_step(*step, draft).is_empty())
    }

    /// Validate every step and build the order content.
    ///
    /// # Examples
    /// ```
    /// use marketplace::domain::order_wizard::{OrderDraft, OrderWizard};
    ///
    /// let issues = OrderWizard::finish(&OrderDraft::default()).expect_err("empty draft");
    /// assert!(issues.iter().any(|issue| issue.field == "category"));
    /// ```
    pub fn finish(draft: &OrderDraft) -> Result<NewOrder, Vec<FieldIssue>> {
        let issues = Self::validate_step(WizardStep::Review, draft);
        if !issues.is_empty() {
            return Err(issues);
        }
        let build = || -> Option<NewOrder> {
            Some(NewOrder {
                category: ServiceCategory::new(text(&draft.category)).ok()?,
                description: text(&draft.description).trim().to_owned(),
                address: Address::try_from_parts(Self::address_parts(draft)).ok()?,
                contact_phone: PhoneNumber::new(text(&draft.contact_phone)).ok()?,
                deadline: text(&draft.deadline).parse().ok()?,
            })
        };
        build().ok_or_else(|| {
            vec![FieldIssue::new(
                "draft",
                "invalid_draft",
                "draft could not be converted into an order",
            )]
        })
    }

    fn address_parts(draft: &OrderDraft) -> AddressParts<'_> {
        AddressParts {
            postal_code: text(&draft.postal_code),
            street: text(&draft.street),
            number: text(&draft.number),
            complement: draft.complement.as_deref(),
            neighborhood: text(&draft.neighborhood),
            city: text(&draft.city),
            region: text(&draft.region),
        }
    }

    fn check_category(draft: &OrderDraft) -> Vec<FieldIssue> {
        match draft.category.as_deref().map(str::trim) {
            None | Some("") => vec![FieldIssue::missing("category")],
            Some(raw) => match ServiceCategory::new(raw) {
                Ok(_) => Vec::new(),
                Err(error) => vec![FieldIssue::new("category", "invalid_category", error.to_string())],
            },
        }
    }

    fn check_description(draft: &OrderDraft) -> Vec<FieldIssue> {
        let description = text(&draft.description).trim();
        let length = description.chars().count();
        if length == 0 {
            vec![FieldIssue::missing("description")]
        } else if length < ORDER_DESCRIPTION_MIN {
            vec![FieldIssue::new(
                "description",
                "too_short",
                format!("description must be at least {ORDER_DESCRIPTION_MIN} characters"),
            )]
        } else if length > ORDER_DESCRIPTION_MAX {
            vec![FieldIssue::new(
                "description",
                "too_long",
                format!("description must be at most {ORDER_DESCRIPTION_MAX} characters"),
            )]
        } else {
            Vec::new()
        }
    }

    fn check_location(draft: &OrderDraft) -> Vec<FieldIssue> {
        let mut issues: Vec<FieldIssue> = Address::validate_parts(&Self::address_parts(draft))
            .into_iter()
            .map(|(field, error)| {
                use super::address::AddressValidationError as E;
                let code = match error {
                    E::InvalidPostalCode => "invalid_postal_code",
                    E::UnknownRegion => "invalid_region",
                    E::MissingField { .. } => "missing_field",
                    E::FieldTooLong { .. } => "too_long",
                };
                FieldIssue::new(field, code, error.to_string())
            })
            .collect();
        match draft.contact_phone.as_deref().map(str::trim) {
            None | Some("") => issues.push(FieldIssue::missing("contactPhone")),
            Some(raw) => {
                if let Err(error) = PhoneNumber::new(raw) {
                    issues.push(FieldIssue::new("contactPhone", "invalid_phone", error.to_string()));
                }
            }
        }
        issues
    }

    fn check_deadline(draft: &OrderDraft) -> Vec<FieldIssue> {
        match draft.deadline.as_deref().map(str::trim) {
            None | Some("") => vec![FieldIssue::missing("deadline")],
            Some(raw) => match raw.parse::<DeadlineBucket>() {
                Ok(_) => Vec::new(),
                Err(error) => vec![FieldIssue::new("deadline", "invalid_deadline", error.to_string())],
            },
        }
    }
}
