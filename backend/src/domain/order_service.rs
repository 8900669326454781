//! Order publication, closing, reads and lead browsing.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::access::{
    actor_with_role, load_actor, map_order_error, map_professional_error,
};
use crate::domain::ports::{
    LeadFilter, OrderCommand, OrderQuery, OrderRepository, ProfessionalRepository, UserRepository,
};
use crate::domain::{
    Credits, Error, NewOrder, OrderId, OrderRequest, OrderView, Role, UserId, Visibility,
};

/// Driven ports used by [`OrderService`].
pub struct OrderRepositories<U, P, O> {
    pub users: Arc<U>,
    pub professionals: Arc<P>,
    pub orders: Arc<O>,
}

/// Service implementing the order command and query driving ports.
pub struct OrderService<U, P, O> {
    users: Arc<U>,
    professionals: Arc<P>,
    orders: Arc<O>,
    clock: Arc<dyn Clock>,
    lead_price: Credits,
}

impl<U, P, O> OrderService<U, P, O> {
    /// New orders are priced at `lead_price` credits per unlock.
    pub fn new(
        repositories: OrderRepositories<U, P, O>,
        clock: Arc<dyn Clock>,
        lead_price: Credits,
    ) -> Self {
        let OrderRepositories {
            users,
            professionals,
            orders,
        } = repositories;
        Self {
            users,
            professionals,
            orders,
            clock,
            lead_price,
        }
    }
}

impl<U, P, O> OrderService<U, P, O>
where
    O: OrderRepository,
{
    async fn find(&self, id: &OrderId) -> Result<OrderRequest, Error> {
        self.orders
            .find(id)
            .await
            .map_err(map_order_error)?
            .ok_or_else(|| Error::not_found(format!("order {id} not found")))
    }
}

#[async_trait]
impl<U, P, O> OrderCommand for OrderService<U, P, O>
where
    U: UserRepository,
    P: ProfessionalRepository,
    O: OrderRepository,
{
    async fn create_order(&self, client: &UserId, order: NewOrder) -> Result<OrderView, Error> {
        actor_with_role(self.users.as_ref(), client, Role::Client).await?;
        let order = OrderRequest::open(client.clone(), order, self.lead_price, self.clock.utc());
        self.orders.insert(&order).await.map_err(map_order_error)?;
        info!(order_id = %order.id, category = %order.category, "order published");
        Ok(OrderView::project(&order, Visibility::Full))
    }

    async fn close_order(
        &self,
        client: &UserId,
        order: &OrderId,
        hired: Option<UserId>,
    ) -> Result<OrderView, Error> {
        let actor = load_actor(self.users.as_ref(), client).await?;
        let existing = self.find(order).await?;
        if &existing.client_id != actor.id() {
            return Err(Error::forbidden("only the order owner may close it"));
        }
        let closed = self
            .orders
            .close(order, hired.clone())
            .await
            .map_err(map_order_error)?;
        info!(
            order_id = %order,
            hired = ?hired,
            "order closed"
        );
        Ok(OrderView::project(&closed, Visibility::Full))
    }
}

#[async_trait]
impl<U, P, O> OrderQuery for OrderService<U, P, O>
where
    U: UserRepository,
    P: ProfessionalRepository,
    O: OrderRepository,
{
    async fn my_orders(&self, client: &UserId) -> Result<Vec<OrderView>, Error> {
        load_actor(self.users.as_ref(), client).await?;
        let orders = self
            .orders
            .list_by_client(client)
            .await
            .map_err(map_order_error)?;
        Ok(orders
            .iter()
            .map(|order| OrderView::project(order, Visibility::Full))
            .collect())
    }

    async fn order(&self, viewer: &UserId, order: &OrderId) -> Result<OrderView, Error> {
        let actor = load_actor(self.users.as_ref(), viewer).await?;
        let found = self.find(order).await?;
        match Visibility::resolve(&found, viewer, actor.role()) {
            Some(visibility) => Ok(OrderView::project(&found, visibility)),
            None if actor.role() == Role::Client => {
                Err(Error::not_found(format!("order {order} not found")))
            }
            None => Err(Error::forbidden("order is no longer available")),
        }
    }

    async fn leads(
        &self,
        professional: &UserId,
        filter: LeadFilter,
    ) -> Result<Vec<OrderView>, Error> {
        actor_with_role(self.users.as_ref(), professional, Role::Professional).await?;
        let profile = self
            .professionals
            .find(professional)
            .await
            .map_err(map_professional_error)?
            .ok_or_else(|| Error::not_found("complete your professional profile first"))?;
        let use_profile = filter.category.is_none() && filter.region.is_none();
        let now = self.clock.utc();
        let open = self.orders.list_open().await.map_err(map_order_error)?;
        Ok(open
            .iter()
            .filter(|order| order.is_open_at(now))
            .filter(|order| {
                if use_profile {
                    profile.offers(&order.category)
                        && profile
                            .region
                            .is_none_or(|region| order.address.region == region)
                } else {
                    filter
                        .category
                        .as_ref()
                        .is_none_or(|category| &order.category == category)
                        && filter
                            .region
                            .is_none_or(|region| order.address.region == region)
                }
            })
            .filter(|order| &order.client_id != professional)
            .map(|order| {
                let visibility = if order.is_unlocked_by(professional) {
                    Visibility::Unlocked
                } else {
                    Visibility::Redacted
                };
                OrderView::project(order, visibility)
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "order_service_tests.rs"]
mod tests;
