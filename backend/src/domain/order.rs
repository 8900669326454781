//! Order requests published by clients and sold to professionals as leads.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::address::Address;
use super::professional::{Credits, PhoneNumber, ServiceCategory};
use super::user::UserId;

/// Order request identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap a stored UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrderId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Parse failure for order enums.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {}", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

/// Lifecycle of an order request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Visible to professionals and unlockable.
    Open,
    /// The client closed it, possibly after hiring someone.
    Closed,
    /// The deadline passed while still open.
    Expired,
}

impl OrderStatus {
    /// Every status, in dashboard order.
    pub const ALL: [OrderStatus; 3] = [Self::Open, Self::Closed, Self::Expired];

    /// Storage and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
            Self::Expired => "EXPIRED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OPEN" => Ok(Self::Open),
            "CLOSED" => Ok(Self::Closed),
            "EXPIRED" => Ok(Self::Expired),
            _ => Err(UnknownVariant {
                kind: "order status",
                value: s.to_owned(),
            }),
        }
    }
}

/// How soon the client needs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeadlineBucket {
    /// Within two days.
    Urgent,
    /// Within a week.
    ThisWeek,
    /// Within a month.
    ThisMonth,
    /// No hard deadline; expires after 90 days.
    Flexible,
}

impl DeadlineBucket {
    /// Every bucket, from most to least urgent.
    pub const ALL: [DeadlineBucket; 4] =
        [Self::Urgent, Self::ThisWeek, Self::ThisMonth, Self::Flexible];

    /// Days an order stays open.
    pub const fn horizon_days(self) -> i64 {
        match self {
            Self::Urgent => 2,
            Self::ThisWeek => 7,
            Self::ThisMonth => 30,
            Self::Flexible => 90,
        }
    }

    /// Open window as a duration.
    pub fn horizon(self) -> Duration {
        Duration::days(self.horizon_days())
    }

    /// Storage and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Urgent => "URGENT",
            Self::ThisWeek => "THIS_WEEK",
            Self::ThisMonth => "THIS_MONTH",
            Self::Flexible => "FLEXIBLE",
        }
    }
}

impl fmt::Display for DeadlineBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeadlineBucket {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "URGENT" => Ok(Self::Urgent),
            "THIS_WEEK" => Ok(Self::ThisWeek),
            "THIS_MONTH" => Ok(Self::ThisMonth),
            "FLEXIBLE" => Ok(Self::Flexible),
            _ => Err(UnknownVariant {
                kind: "deadline",
                value: s.to_owned(),
            }),
        }
    }
}

/// Validated order content produced by the creation wizard.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub category: ServiceCategory,
    pub description: String,
    pub address: Address,
    pub contact_phone: PhoneNumber,
    pub deadline: DeadlineBucket,
}

/// Order request.
///
/// ## Invariants
/// - `unlocked_by` holds each professional at most once, in unlock order.
/// - `lead_price` is fixed when the order is created.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub id: OrderId,
    pub client_id: UserId,
    pub category: ServiceCategory,
    pub description: String,
    pub address: Address,
    pub contact_phone: PhoneNumber,
    pub deadline: DeadlineBucket,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub lead_price: Credits,
    pub unlocked_by: Vec<UserId>,
}

impl OrderRequest {
    /// Open a new order for `client_id`.
    pub fn open(
        client_id: UserId,
        order: NewOrder,
        lead_price: Credits,
        created_at: DateTime<Utc>,
    ) -> Self {
        let NewOrder {
            category,
            description,
            address,
            contact_phone,
            deadline,
        } = order;
        Self {
            id: OrderId::random(),
            client_id,
            category,
            description,
            address,
            contact_phone,
            deadline,
            status: OrderStatus::Open,
            created_at,
            lead_price,
            unlocked_by: Vec::new(),
        }
    }

    /// Whether `professional` already paid for this lead.
    pub fn is_unlocked_by(&self, professional: &UserId) -> bool {
        self.unlocked_by.contains(professional)
    }

    /// Instant after which an open order expires.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + self.deadline.horizon()
    }

    /// Whether the order is open past its deadline at `now`.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status == OrderStatus::Open && now >= self.expires_at()
    }

    /// Whether the order still takes unlocks at `now`. An overdue order
    /// counts as closed even before the expiry sweep rewrites its status.
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.status == OrderStatus::Open && now < self.expires_at()
    }
}
