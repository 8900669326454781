//! Builders for the HTTP state and the background tasks sharing its adapters.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use marketplace::domain::ports::{
    LeadUnlockRepository, OrderRepository, ProfessionalRepository, ReviewRepository,
    StatsRepository, UserRepository,
};
use marketplace::domain::{AccountService, AdminRepositories, AdminService};
use marketplace::inbound::http::state::{Adapters, HttpState};
use marketplace::outbound::argon2_hasher::Argon2CredentialHasher;
use marketplace::outbound::memory::InMemoryStore;
use marketplace::outbound::persistence::{
    DieselLeadUnlockRepository, DieselOrderRepository, DieselProfessionalRepository,
    DieselReviewRepository, DieselStatsRepository, DieselUserRepository,
};
use marketplace::outbound::postal::ViaCepLookup;

use super::ServerConfig;

type ServerAdapters<U, P, O, L, R, S> =
    Adapters<U, P, O, L, R, S, Argon2CredentialHasher, ViaCepLookup>;

/// Build the HTTP state over Diesel repositories when a pool is configured,
/// otherwise over a fresh in-memory store.
///
/// # Errors
/// Returns [`io::Error`] when the postal client cannot be built or the
/// bootstrap admin cannot be created.
pub(super) async fn build_http_state(config: &ServerConfig) -> io::Result<web::Data<HttpState>> {
    let postal = ViaCepLookup::new(config.postal.base_url.clone(), config.postal.timeout)
        .map_err(|err| io::Error::other(format!("postal lookup client: {err}")))?;
    let postal = Arc::new(postal);
    let hasher = Arc::new(Argon2CredentialHasher::new());

    match &config.db_pool {
        Some(pool) => {
            assemble(
                Adapters {
                    users: Arc::new(DieselUserRepository::new(pool.clone())),
                    professionals: Arc::new(DieselProfessionalRepository::new(pool.clone())),
                    orders: Arc::new(DieselOrderRepository::new(pool.clone())),
                    unlocks: Arc::new(DieselLeadUnlockRepository::new(pool.clone())),
                    reviews: Arc::new(DieselReviewRepository::new(pool.clone())),
                    stats: Arc::new(DieselStatsRepository::new(pool.clone())),
                    hasher,
                    postal,
                },
                config,
            )
            .await
        }
        None => {
            warn!("no database configured; state is kept in memory and lost on restart");
            let store = Arc::new(InMemoryStore::new());
            assemble(
                Adapters {
                    users: store.clone(),
                    professionals: store.clone(),
                    orders: store.clone(),
                    unlocks: store.clone(),
                    reviews: store.clone(),
                    stats: store,
                    hasher,
                    postal,
                },
                config,
            )
            .await
        }
    }
}

async fn assemble<U, P, O, L, R, S>(
    adapters: ServerAdapters<U, P, O, L, R, S>,
    config: &ServerConfig,
) -> io::Result<web::Data<HttpState>>
where
    U: UserRepository + 'static,
    P: ProfessionalRepository + 'static,
    O: OrderRepository + 'static,
    L: LeadUnlockRepository + 'static,
    R: ReviewRepository + 'static,
    S: StatsRepository + 'static,
{
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let welcome_credits = config.pricing.welcome_credits;

    if let Some(credentials) = &config.bootstrap_admin {
        let accounts = AccountService::new(
            adapters.users.clone(),
            adapters.hasher.clone(),
            welcome_credits,
        );
        let created = accounts
            .ensure_admin(credentials)
            .await
            .map_err(|err| io::Error::other(format!("bootstrap admin: {err}")))?;
        if !created {
            info!(email = %credentials.email(), "bootstrap admin already present");
        }
    }

    if let Some(period) = config.expiry_sweep {
        let sweeper = AdminService::new(
            AdminRepositories {
                users: adapters.users.clone(),
                professionals: adapters.professionals.clone(),
                orders: adapters.orders.clone(),
                stats: adapters.stats.clone(),
            },
            clock.clone(),
            welcome_credits,
        );
        spawn_expiry_sweep(sweeper, period);
    }

    Ok(web::Data::new(HttpState::from_adapters(
        adapters,
        clock,
        config.pricing,
    )))
}

/// Expire overdue orders every `period` on the current Actix runtime.
fn spawn_expiry_sweep<U, P, O, S>(sweeper: AdminService<U, P, O, S>, period: Duration)
where
    U: 'static,
    P: 'static,
    O: OrderRepository + 'static,
    S: 'static,
{
    info!(period_secs = period.as_secs(), "order expiry sweep enabled");
    actix_web::rt::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if let Err(err) = sweeper.sweep_expired().await {
                warn!(error = %err, "order expiry sweep failed");
            }
        }
    });
}
