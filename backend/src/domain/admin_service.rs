//! Admin dashboard reads and interventions.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::access::{
    actor_with_role, map_order_error, map_professional_error, map_user_error,
};
use crate::domain::ports::{
    AdminCommand, AdminQuery, OrderRepository, ProfessionalRepository, StatsError,
    StatsRepository, UserRepository,
};
use crate::domain::{
    Credits, DashboardStats, Error, OrderId, OrderStatus, OrderView, Role, User, UserId,
    Visibility,
};

/// Largest single credit grant.
pub const MAX_CREDIT_GRANT: u32 = 10_000;

fn map_stats_error(error: StatsError) -> Error {
    match error {
        StatsError::Connection { message } => {
            Error::service_unavailable(format!("stats repository unavailable: {message}"))
        }
        StatsError::Query { message } => {
            Error::internal(format!("stats repository error: {message}"))
        }
    }
}

/// Driven ports used by [`AdminService`].
pub struct AdminRepositories<U, P, O, S> {
    pub users: Arc<U>,
    pub professionals: Arc<P>,
    pub orders: Arc<O>,
    pub stats: Arc<S>,
}

/// Service implementing the admin driving ports. Every call requires the
/// ADMIN role.
pub struct AdminService<U, P, O, S> {
    users: Arc<U>,
    professionals: Arc<P>,
    orders: Arc<O>,
    stats: Arc<S>,
    clock: Arc<dyn Clock>,
    welcome_credits: Credits,
}

impl<U, P, O, S> AdminService<U, P, O, S> {
    /// The expiry sweep reads `clock`; `welcome_credits` seeds profiles
    /// created by a role change.
    pub fn new(
        repositories: AdminRepositories<U, P, O, S>,
        clock: Arc<dyn Clock>,
        welcome_credits: Credits,
    ) -> Self {
        let AdminRepositories {
            users,
            professionals,
            orders,
            stats,
        } = repositories;
        Self {
            users,
            professionals,
            orders,
            stats,
            clock,
            welcome_credits,
        }
    }
}

impl<U, P, O, S> AdminService<U, P, O, S>
where
    O: OrderRepository,
{
    /// Expire overdue orders without an acting admin; used by the periodic
    /// sweep.
    pub async fn sweep_expired(&self) -> Result<u64, Error> {
        let expired = self
            .orders
            .expire_overdue(self.clock.utc())
            .await
            .map_err(map_order_error)?;
        if expired > 0 {
            info!(expired, "expired overdue orders");
        }
        Ok(expired)
    }
}

#[async_trait]
impl<U, P, O, S> AdminQuery for AdminService<U, P, O, S>
where
    U: UserRepository,
    P: ProfessionalRepository,
    O: OrderRepository,
    S: StatsRepository,
{
    async fn dashboard(&self, admin: &UserId) -> Result<DashboardStats, Error> {
        actor_with_role(self.users.as_ref(), admin, Role::Admin).await?;
        self.stats.dashboard().await.map_err(map_stats_error)
    }

    async fn users(&self, admin: &UserId) -> Result<Vec<User>, Error> {
        actor_with_role(self.users.as_ref(), admin, Role::Admin).await?;
        self.users.list().await.map_err(map_user_error)
    }
}

#[async_trait]
impl<U, P, O, S> AdminCommand for AdminService<U, P, O, S>
where
    U: UserRepository,
    P: ProfessionalRepository,
    O: OrderRepository,
    S: StatsRepository,
{
    async fn set_role(&self, admin: &UserId, target: &UserId, role: Role) -> Result<User, Error> {
        actor_with_role(self.users.as_ref(), admin, Role::Admin).await?;
        if admin == target && role != Role::Admin {
            return Err(Error::conflict("admins cannot demote themselves"));
        }
        let user = self
            .users
            .set_role(target, role, self.welcome_credits)
            .await
            .map_err(map_user_error)?;
        info!(admin_id = %admin, user_id = %target, role = %role, "role changed");
        Ok(user)
    }

    async fn grant_credits(
        &self,
        admin: &UserId,
        professional: &UserId,
        amount: u32,
    ) -> Result<Credits, Error> {
        actor_with_role(self.users.as_ref(), admin, Role::Admin).await?;
        if !(1..=MAX_CREDIT_GRANT).contains(&amount) {
            return Err(Error::invalid_request(format!(
                "amount must be between 1 and {MAX_CREDIT_GRANT}"
            )));
        }
        let balance = self
            .professionals
            .grant_credits(professional, Credits::new(amount))
            .await
            .map_err(map_professional_error)?;
        info!(
            admin_id = %admin,
            professional_id = %professional,
            amount,
            balance = balance.get(),
            "credits granted"
        );
        Ok(balance)
    }

    async fn set_order_status(
        &self,
        admin: &UserId,
        order: &OrderId,
        status: OrderStatus,
    ) -> Result<OrderView, Error> {
        actor_with_role(self.users.as_ref(), admin, Role::Admin).await?;
        let updated = self
            .orders
            .set_status(order, status)
            .await
            .map_err(map_order_error)?;
        warn!(admin_id = %admin, order_id = %order, status = %status, "order status overridden");
        Ok(OrderView::project(&updated, Visibility::Full))
    }

    async fn expire_orders(&self, admin: &UserId) -> Result<u64, Error> {
        actor_with_role(self.users.as_ref(), admin, Role::Admin).await?;
        self.sweep_expired().await
    }
}
