//! In-memory implementation of every repository port.
//!
//! Used when no database URL is configured and by the HTTP and BDD tests.
//! The whole state sits behind one mutex, so each port call observes and
//! mutates a consistent snapshot; in particular an unlock's balance check,
//! debit and append cannot interleave with another unlock.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    LeadUnlockError, LeadUnlockRepository, NewAccount, OrderPersistenceError, OrderRepository,
    ProfessionalPersistenceError, ProfessionalRepository, ReviewPersistenceError,
    ReviewRepository, StatsError, StatsRepository, StoredCredentials, UnlockOutcome,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Credits, DashboardStats, DirectoryEntry, EmailAddress, OrderId, OrderRequest, OrderStatus,
    ProfessionalProfile, ProfileDetails, RatingSummary, Review, Role, User, UserId,
};

#[derive(Default)]
struct State {
    users: HashMap<UserId, StoredCredentials>,
    profiles: HashMap<UserId, ProfessionalProfile>,
    orders: Vec<OrderRequest>,
    reviews: Vec<Review>,
}

impl State {
    fn order_mut(&mut self, id: &OrderId) -> Option<&mut OrderRequest> {
        self.orders.iter_mut().find(|order| &order.id == id)
    }

    fn entry(&self, id: &UserId) -> Option<DirectoryEntry> {
        let profile = self.profiles.get(id)?;
        let user = &self.users.get(id)?.user;
        Some(DirectoryEntry {
            user: user.clone(),
            profile: profile.clone(),
        })
    }
}

fn newest_first(mut orders: Vec<OrderRequest>) -> Vec<OrderRequest> {
    orders.reverse();
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    orders
}

const POISONED: &str = "in-memory store lock poisoned";

/// Shared in-memory store.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    /// Empty store with no accounts, orders or reviews.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Option<MutexGuard<'_, State>> {
        self.state.lock().ok()
    }

    /// Insert an account directly, bypassing registration rules. Used to seed
    /// the first admin and by tests.
    pub fn seed_account(&self, account: NewAccount) -> bool {
        let Some(mut state) = self.lock() else {
            return false;
        };
        let id = account.user.id().clone();
        if let Some(profile) = account.profile {
            state.profiles.insert(id.clone(), profile);
        }
        state.users.insert(
            id,
            StoredCredentials {
                user: account.user,
                password_hash: account.password_hash,
            },
        );
        true
    }

    /// Insert or replace an order directly. Used by tests.
    pub fn seed_order(&self, order: OrderRequest) -> bool {
        let Some(mut state) = self.lock() else {
            return false;
        };
        state.orders.retain(|existing| existing.id != order.id);
        state.orders.push(order);
        true
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create_account(&self, account: &NewAccount) -> Result<(), UserPersistenceError> {
        let mut state = self.lock().ok_or_else(|| UserPersistenceError::query(POISONED))?;
        let email = account.user.email();
        if state.users.values().any(|stored| stored.user.email() == email) {
            return Err(UserPersistenceError::duplicate_email(email.as_ref()));
        }
        let id = account.user.id().clone();
        if let Some(profile) = &account.profile {
            state.profiles.insert(id.clone(), profile.clone());
        }
        state.users.insert(
            id,
            StoredCredentials {
                user: account.user.clone(),
                password_hash: account.password_hash.clone(),
            },
        );
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock().ok_or_else(|| UserPersistenceError::query(POISONED))?;
        Ok(state.users.get(id).map(|stored| stored.user.clone()))
    }

    async fn find_credentials(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let state = self.lock().ok_or_else(|| UserPersistenceError::query(POISONED))?;
        Ok(state
            .users
            .values()
            .find(|stored| stored.user.email() == email)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let state = self.lock().ok_or_else(|| UserPersistenceError::query(POISONED))?;
        let mut users: Vec<User> = state.users.values().map(|s| s.user.clone()).collect();
        users.sort_by(|a, b| {
            a.display_name()
                .as_ref()
                .cmp(b.display_name().as_ref())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(users)
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut state = self.lock().ok_or_else(|| UserPersistenceError::query(POISONED))?;
        let stored = state
            .users
            .get_mut(user.id())
            .ok_or_else(|| UserPersistenceError::not_found(user.id().to_string()))?;
        stored.user = user.clone();
        Ok(())
    }

    async fn set_role(
        &self,
        id: &UserId,
        role: Role,
        welcome_credits: Credits,
    ) -> Result<User, UserPersistenceError> {
        let mut state = self.lock().ok_or_else(|| UserPersistenceError::query(POISONED))?;
        let stored = state
            .users
            .get_mut(id)
            .ok_or_else(|| UserPersistenceError::not_found(id.to_string()))?;
        stored.user.assign_role(role);
        let user = stored.user.clone();
        if role == Role::Professional {
            state
                .profiles
                .entry(id.clone())
                .or_insert_with(|| ProfessionalProfile::empty(id.clone(), welcome_credits));
        }
        Ok(user)
    }
}

#[async_trait]
impl ProfessionalRepository for InMemoryStore {
    async fn find(
        &self,
        id: &UserId,
    ) -> Result<Option<ProfessionalProfile>, ProfessionalPersistenceError> {
        let state = self
            .lock()
            .ok_or_else(|| ProfessionalPersistenceError::query(POISONED))?;
        Ok(state.profiles.get(id).cloned())
    }

    async fn find_entry(
        &self,
        id: &UserId,
    ) -> Result<Option<DirectoryEntry>, ProfessionalPersistenceError> {
        let state = self
            .lock()
            .ok_or_else(|| ProfessionalPersistenceError::query(POISONED))?;
        Ok(state
            .entry(id)
            .filter(|entry| entry.user.role() == Role::Professional))
    }

    async fn list_entries(&self) -> Result<Vec<DirectoryEntry>, ProfessionalPersistenceError> {
        let state = self
            .lock()
            .ok_or_else(|| ProfessionalPersistenceError::query(POISONED))?;
        Ok(state
            .profiles
            .keys()
            .filter_map(|id| state.entry(id))
            .filter(|entry| entry.user.role() == Role::Professional)
            .collect())
    }

    async fn save_details(
        &self,
        id: &UserId,
        details: &ProfileDetails,
    ) -> Result<ProfessionalProfile, ProfessionalPersistenceError> {
        let mut state = self
            .lock()
            .ok_or_else(|| ProfessionalPersistenceError::query(POISONED))?;
        let profile = state
            .profiles
            .get_mut(id)
            .ok_or_else(|| ProfessionalPersistenceError::not_found(id.to_string()))?;
        profile.apply(details.clone());
        Ok(profile.clone())
    }

    async fn grant_credits(
        &self,
        id: &UserId,
        amount: Credits,
    ) -> Result<Credits, ProfessionalPersistenceError> {
        let mut state = self
            .lock()
            .ok_or_else(|| ProfessionalPersistenceError::query(POISONED))?;
        let profile = state
            .profiles
            .get_mut(id)
            .ok_or_else(|| ProfessionalPersistenceError::not_found(id.to_string()))?;
        profile.credits = profile
            .credits
            .checked_add(amount)
            .ok_or_else(|| ProfessionalPersistenceError::credit_overflow(id.to_string()))?;
        Ok(profile.credits)
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn insert(&self, order: &OrderRequest) -> Result<(), OrderPersistenceError> {
        let mut state = self.lock().ok_or_else(|| OrderPersistenceError::query(POISONED))?;
        state.orders.push(order.clone());
        Ok(())
    }

    async fn find(&self, id: &OrderId) -> Result<Option<OrderRequest>, OrderPersistenceError> {
        let state = self.lock().ok_or_else(|| OrderPersistenceError::query(POISONED))?;
        Ok(state.orders.iter().find(|order| &order.id == id).cloned())
    }

    async fn list_by_client(
        &self,
        client: &UserId,
    ) -> Result<Vec<OrderRequest>, OrderPersistenceError> {
        let state = self.lock().ok_or_else(|| OrderPersistenceError::query(POISONED))?;
        Ok(newest_first(
            state
                .orders
                .iter()
                .filter(|order| &order.client_id == client)
                .cloned()
                .collect(),
        ))
    }

    async fn list_open(&self) -> Result<Vec<OrderRequest>, OrderPersistenceError> {
        let state = self.lock().ok_or_else(|| OrderPersistenceError::query(POISONED))?;
        Ok(newest_first(
            state
                .orders
                .iter()
                .filter(|order| order.status == OrderStatus::Open)
                .cloned()
                .collect(),
        ))
    }

    async fn set_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<OrderRequest, OrderPersistenceError> {
        let mut state = self.lock().ok_or_else(|| OrderPersistenceError::query(POISONED))?;
        let order = state
            .order_mut(id)
            .ok_or_else(|| OrderPersistenceError::not_found(id.to_string()))?;
        order.status = status;
        Ok(order.clone())
    }

    async fn close(
        &self,
        id: &OrderId,
        hired: Option<UserId>,
    ) -> Result<OrderRequest, OrderPersistenceError> {
        let mut state = self.lock().ok_or_else(|| OrderPersistenceError::query(POISONED))?;
        let order = state
            .order_mut(id)
            .ok_or_else(|| OrderPersistenceError::not_found(id.to_string()))?;
        if order.status != OrderStatus::Open {
            return Err(OrderPersistenceError::not_open(id.to_string()));
        }
        if let Some(professional) = &hired
            && !order.is_unlocked_by(professional)
        {
            return Err(OrderPersistenceError::hired_without_unlock(
                id.to_string(),
                professional.to_string(),
            ));
        }
        order.status = OrderStatus::Closed;
        let closed = order.clone();
        if let Some(profile) = hired.and_then(|id| state.profiles.get_mut(&id)) {
            profile.completed_jobs = profile.completed_jobs.saturating_add(1);
        }
        Ok(closed)
    }

    async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<u64, OrderPersistenceError> {
        let mut state = self.lock().ok_or_else(|| OrderPersistenceError::query(POISONED))?;
        let mut expired = 0;
        for order in state.orders.iter_mut().filter(|order| order.is_overdue(now)) {
            order.status = OrderStatus::Expired;
            expired += 1;
        }
        Ok(expired)
    }

    async fn has_engaged(
        &self,
        client: &UserId,
        professional: &UserId,
    ) -> Result<bool, OrderPersistenceError> {
        let state = self.lock().ok_or_else(|| OrderPersistenceError::query(POISONED))?;
        Ok(state
            .orders
            .iter()
            .any(|order| &order.client_id == client && order.is_unlocked_by(professional)))
    }
}

#[async_trait]
impl LeadUnlockRepository for InMemoryStore {
    async fn unlock(
        &self,
        order_id: &OrderId,
        professional: &UserId,
        now: DateTime<Utc>,
    ) -> Result<UnlockOutcome, LeadUnlockError> {
        let mut guard = self.lock().ok_or_else(|| LeadUnlockError::query(POISONED))?;
        let state = &mut *guard;
        let order = state
            .orders
            .iter_mut()
            .find(|order| &order.id == order_id)
            .ok_or_else(|| LeadUnlockError::order_not_found(order_id.to_string()))?;
        let profile = state
            .profiles
            .get_mut(professional)
            .ok_or_else(|| LeadUnlockError::profile_not_found(professional.to_string()))?;
        if order.is_unlocked_by(professional) {
            return Ok(UnlockOutcome::AlreadyUnlocked {
                order: order.clone(),
                balance: profile.credits,
            });
        }
        if !order.is_open_at(now) {
            return Err(LeadUnlockError::order_not_open(order_id.to_string()));
        }
        let Some(remaining) = profile.credits.checked_sub(order.lead_price) else {
            return Ok(UnlockOutcome::InsufficientCredits {
                balance: profile.credits,
                price: order.lead_price,
            });
        };
        profile.credits = remaining;
        order.unlocked_by.push(professional.clone());
        Ok(UnlockOutcome::Unlocked {
            order: order.clone(),
            remaining,
        })
    }
}

#[async_trait]
impl ReviewRepository for InMemoryStore {
    async fn insert_and_rerate(
        &self,
        review: &Review,
    ) -> Result<RatingSummary, ReviewPersistenceError> {
        let mut guard = self
            .lock()
            .ok_or_else(|| ReviewPersistenceError::query(POISONED))?;
        let state = &mut *guard;
        let duplicate = state.reviews.iter().any(|existing| {
            existing.client_id == review.client_id
                && existing.professional_id == review.professional_id
        });
        if duplicate {
            return Err(ReviewPersistenceError::duplicate(
                review.client_id.to_string(),
                review.professional_id.to_string(),
            ));
        }
        let profile = state.profiles.get_mut(&review.professional_id).ok_or_else(|| {
            ReviewPersistenceError::profile_not_found(review.professional_id.to_string())
        })?;
        profile.rating = profile.rating.record(review.stars.get());
        state.reviews.push(review.clone());
        Ok(profile.rating)
    }

    async fn list_for_professional(
        &self,
        professional: &UserId,
    ) -> Result<Vec<Review>, ReviewPersistenceError> {
        let state = self
            .lock()
            .ok_or_else(|| ReviewPersistenceError::query(POISONED))?;
        let mut reviews: Vec<Review> = state
            .reviews
            .iter()
            .rev()
            .filter(|review| &review.professional_id == professional)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }
}

#[async_trait]
impl StatsRepository for InMemoryStore {
    async fn dashboard(&self) -> Result<DashboardStats, StatsError> {
        let state = self.lock().ok_or_else(|| StatsError::query(POISONED))?;
        let roles = state.users.values().map(|stored| (stored.user.role(), 1));
        let statuses = state.orders.iter().map(|order| (order.status, 1));
        let total_unlocks: u64 = state
            .orders
            .iter()
            .map(|order| order.unlocked_by.len() as u64)
            .sum();
        let credits_spent: u64 = state
            .orders
            .iter()
            .map(|order| u64::from(order.lead_price.get()) * order.unlocked_by.len() as u64)
            .sum();
        let credits_held: u64 = state
            .profiles
            .values()
            .map(|profile| u64::from(profile.credits.get()))
            .sum();
        Ok(DashboardStats::assemble(
            roles,
            statuses,
            total_unlocks,
            credits_held,
            credits_spent,
        ))
    }
}

#[cfg(test)]
mod tests;
