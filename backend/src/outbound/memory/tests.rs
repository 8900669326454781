//! Behavioural coverage for the in-memory store.

use std::sync::Arc;

use chrono::Duration;
use rstest::{fixture, rstest};
use uuid::Uuid;

use super::*;
use crate::domain::{DeadlineBucket, RegionCode, ReviewComment, Stars};
use crate::test_support::clock::fixture_time;
use crate::test_support::fixtures;

struct Seeded {
    store: Arc<InMemoryStore>,
    client: UserId,
    professional: UserId,
}

fn seed_professional(store: &InMemoryStore, credits: u32) -> UserId {
    let user = fixtures::user(
        Role::Professional,
        "Otávio Nunes",
        &format!("otavio.{}", Uuid::new_v4().simple()),
    );
    let id = user.id().clone();
    let profile = fixtures::listed_profile(&id, "eletricista", RegionCode::Sp, credits);
    assert!(store.seed_account(NewAccount {
        user,
        password_hash: "hash".into(),
        profile: Some(profile),
    }));
    id
}

#[fixture]
fn seeded() -> Seeded {
    let store = Arc::new(InMemoryStore::new());
    let client = fixtures::user(Role::Client, "Clara Lins", "clara");
    let client_id = client.id().clone();
    assert!(store.seed_account(NewAccount {
        user: client,
        password_hash: "hash".into(),
        profile: None,
    }));
    let professional = seed_professional(&store, 25);
    Seeded {
        store,
        client: client_id,
        professional,
    }
}

fn publish(seeded: &Seeded, price: u32) -> OrderId {
    let order = fixtures::open_order(&seeded.client, "eletricista", price, fixture_time());
    let id = order.id;
    assert!(seeded.store.seed_order(order));
    id
}

#[rstest]
#[tokio::test]
async fn duplicate_email_is_rejected(seeded: Seeded) {
    let again = fixtures::user(Role::Client, "Outra Clara", "clara");
    let err = seeded
        .store
        .create_account(&NewAccount {
            user: again,
            password_hash: "hash".into(),
            profile: None,
        })
        .await
        .expect_err("duplicate");
    assert!(matches!(err, UserPersistenceError::DuplicateEmail { .. }));
}

#[rstest]
#[tokio::test]
async fn unlock_debits_once_and_is_idempotent(seeded: Seeded) {
    let order = publish(&seeded, 10);
    let first = seeded
        .store
        .unlock(&order, &seeded.professional, fixture_time())
        .await
        .expect("first unlock");
    assert!(matches!(first, UnlockOutcome::Unlocked { remaining, .. } if remaining == Credits::new(15)));

    let second = seeded
        .store
        .unlock(&order, &seeded.professional, fixture_time())
        .await
        .expect("second unlock");
    assert!(matches!(second, UnlockOutcome::AlreadyUnlocked { balance, .. } if balance == Credits::new(15)));

    let stored = OrderRepository::find(seeded.store.as_ref(), &order)
        .await
        .expect("find")
        .expect("order");
    assert_eq!(stored.unlocked_by, vec![seeded.professional.clone()]);
}

#[rstest]
#[tokio::test]
async fn insufficient_balance_writes_nothing(seeded: Seeded) {
    let order = publish(&seeded, 30);
    let outcome = seeded
        .store
        .unlock(&order, &seeded.professional, fixture_time())
        .await
        .expect("decided");
    assert_eq!(
        outcome,
        UnlockOutcome::InsufficientCredits {
            balance: Credits::new(25),
            price: Credits::new(30),
        }
    );
    let profile = ProfessionalRepository::find(seeded.store.as_ref(), &seeded.professional)
        .await
        .expect("find")
        .expect("profile");
    assert_eq!(profile.credits, Credits::new(25));
}

#[rstest]
#[tokio::test]
async fn closed_orders_cannot_be_unlocked(seeded: Seeded) {
    let order = publish(&seeded, 10);
    seeded
        .store
        .close(&order, None)
        .await
        .expect("closed");
    let err = seeded
        .store
        .unlock(&order, &seeded.professional, fixture_time())
        .await
        .expect_err("not open");
    assert!(matches!(err, LeadUnlockError::OrderNotOpen { .. }));
}

#[rstest]
#[tokio::test]
async fn overdue_orders_refuse_unlocks_without_charging(seeded: Seeded) {
    let order = publish(&seeded, 10);
    let past_deadline = fixture_time() + DeadlineBucket::ThisWeek.horizon();
    let err = seeded
        .store
        .unlock(&order, &seeded.professional, past_deadline)
        .await
        .expect_err("overdue");
    assert!(matches!(err, LeadUnlockError::OrderNotOpen { .. }));
    let profile = ProfessionalRepository::find(seeded.store.as_ref(), &seeded.professional)
        .await
        .expect("find")
        .expect("profile");
    assert_eq!(profile.credits, Credits::new(25));
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_unlocks_never_overspend(seeded: Seeded) {
    let orders: Vec<OrderId> = (0..6).map(|_| publish(&seeded, 10)).collect();
    let mut handles = Vec::new();
    for order in orders.iter().chain(orders.iter()) {
        let store = Arc::clone(&seeded.store);
        let order = *order;
        let professional = seeded.professional.clone();
        handles.push(tokio::spawn(async move {
            store.unlock(&order, &professional, fixture_time()).await
        }));
    }
    let mut unlocked = 0;
    for handle in handles {
        if let Ok(UnlockOutcome::Unlocked { .. }) = handle.await.expect("task") {
            unlocked += 1;
        }
    }
    assert_eq!(unlocked, 2, "balance 25 at price 10 buys two leads");
    let profile = ProfessionalRepository::find(seeded.store.as_ref(), &seeded.professional)
        .await
        .expect("find")
        .expect("profile");
    assert_eq!(profile.credits, Credits::new(5));
}

#[rstest]
#[tokio::test]
async fn closing_with_hire_counts_a_completed_job(seeded: Seeded) {
    let order = publish(&seeded, 10);
    seeded
        .store
        .unlock(&order, &seeded.professional, fixture_time())
        .await
        .expect("unlock");
    let closed = seeded
        .store
        .close(&order, Some(seeded.professional.clone()))
        .await
        .expect("closed");
    assert_eq!(closed.status, OrderStatus::Closed);
    let profile = ProfessionalRepository::find(seeded.store.as_ref(), &seeded.professional)
        .await
        .expect("find")
        .expect("profile");
    assert_eq!(profile.completed_jobs, 1);
}

#[rstest]
#[tokio::test]
async fn hiring_requires_an_unlock(seeded: Seeded) {
    let order = publish(&seeded, 10);
    let err = seeded
        .store
        .close(&order, Some(seeded.professional.clone()))
        .await
        .expect_err("never unlocked");
    assert!(matches!(err, OrderPersistenceError::HiredWithoutUnlock { .. }));
}

#[rstest]
#[tokio::test]
async fn expiry_only_touches_overdue_open_orders(seeded: Seeded) {
    let urgent = OrderRequest::open(
        seeded.client.clone(),
        fixtures::new_order("pintura", DeadlineBucket::Urgent),
        Credits::new(10),
        fixture_time(),
    );
    let flexible = OrderRequest::open(
        seeded.client.clone(),
        fixtures::new_order("pintura", DeadlineBucket::Flexible),
        Credits::new(10),
        fixture_time(),
    );
    let urgent_id = urgent.id;
    assert!(seeded.store.seed_order(urgent));
    assert!(seeded.store.seed_order(flexible));

    let expired = seeded
        .store
        .expire_overdue(fixture_time() + Duration::days(3))
        .await
        .expect("sweep");
    assert_eq!(expired, 1);
    let order = OrderRepository::find(seeded.store.as_ref(), &urgent_id)
        .await
        .expect("find")
        .expect("order");
    assert_eq!(order.status, OrderStatus::Expired);
}

#[rstest]
#[tokio::test]
async fn reviews_are_unique_per_pair_and_update_rating(seeded: Seeded) {
    let review = Review {
        id: Uuid::new_v4(),
        professional_id: seeded.professional.clone(),
        client_id: seeded.client.clone(),
        stars: Stars::new(4).expect("stars"),
        comment: ReviewComment::new("Pontual").expect("comment"),
        created_at: fixture_time(),
    };
    let summary = seeded
        .store
        .insert_and_rerate(&review)
        .await
        .expect("inserted");
    assert_eq!(summary, RatingSummary::new(4, 1));

    let again = Review {
        id: Uuid::new_v4(),
        ..review
    };
    let err = seeded
        .store
        .insert_and_rerate(&again)
        .await
        .expect_err("duplicate");
    assert!(matches!(err, ReviewPersistenceError::Duplicate { .. }));
}

#[rstest]
#[tokio::test]
async fn promotion_creates_an_empty_profile(seeded: Seeded) {
    let user = seeded
        .store
        .set_role(&seeded.client, Role::Professional, Credits::new(7))
        .await
        .expect("promoted");
    assert_eq!(user.role(), Role::Professional);
    let profile = ProfessionalRepository::find(seeded.store.as_ref(), &seeded.client)
        .await
        .expect("find")
        .expect("profile");
    assert_eq!(profile.credits, Credits::new(7));
    assert!(!profile.is_listed());
}

#[rstest]
#[tokio::test]
async fn dashboard_totals_follow_unlocks(seeded: Seeded) {
    let order = publish(&seeded, 10);
    seeded
        .store
        .unlock(&order, &seeded.professional, fixture_time())
        .await
        .expect("unlock");
    let stats = seeded.store.dashboard().await.expect("stats");
    assert_eq!(stats.total_unlocks, 1);
    assert_eq!(stats.credits_spent, 10);
    assert_eq!(stats.credits_held, 15);
    let clients = stats
        .users_by_role
        .iter()
        .find(|count| count.role == Role::Client)
        .map(|count| count.count);
    assert_eq!(clients, Some(1));
}
