//! Aggregates shown on the admin dashboard.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::order::OrderStatus;
use super::user::Role;

/// Count of users holding one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RoleCount {
    pub role: Role,
    pub count: u64,
}

/// Count of orders in one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: u64,
}

/// Marketplace-wide totals.
///
/// ## Invariants
/// - `users_by_role` lists every [`Role`] once, in [`Role::ALL`] order.
/// - `orders_by_status` lists every [`OrderStatus`] once, in
///   [`OrderStatus::ALL`] order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub users_by_role: Vec<RoleCount>,
    pub orders_by_status: Vec<StatusCount>,
    pub total_unlocks: u64,
    pub credits_held: u64,
    pub credits_spent: u64,
}

impl DashboardStats {
    /// Assemble stats from sparse counts; missing roles and statuses count
    /// as zero.
    pub fn assemble(
        roles: impl IntoIterator<Item = (Role, u64)>,
        statuses: impl IntoIterator<Item = (OrderStatus, u64)>,
        total_unlocks: u64,
        credits_held: u64,
        credits_spent: u64,
    ) -> Self {
        let roles: Vec<_> = roles.into_iter().collect();
        let statuses: Vec<_> = statuses.into_iter().collect();
        Self {
            users_by_role: Role::ALL
                .iter()
                .map(|role| RoleCount {
                    role: *role,
                    count: roles
                        .iter()
                        .filter(|(r, _)| r == role)
                        .map(|(_, count)| count)
                        .sum(),
                })
                .collect(),
            orders_by_status: OrderStatus::ALL
                .iter()
                .map(|status| StatusCount {
                    status: *status,
                    count: statuses
                        .iter()
                        .filter(|(s, _)| s == status)
                        .map(|(_, count)| count)
                        .sum(),
                })
                .collect(),
            total_unlocks,
            credits_held,
            credits_spent,
        }
    }
}
