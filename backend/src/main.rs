//! Marketplace entry-point: loads settings, wires adapters and serves the
//! REST API, health probes and, in debug builds, the OpenAPI docs.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig as _;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use marketplace::domain::LoginCredentials;
use marketplace::inbound::http::health::HealthState;
use marketplace::inbound::http::session_config::fingerprint::key_fingerprint;
use marketplace::inbound::http::session_config::{BuildMode, SessionToggles, session_settings};
use marketplace::inbound::http::state::Pricing;
use marketplace::outbound::persistence::{DbPool, PoolConfig};
use marketplace::settings::MarketplaceSettings;
use server::{PostalLookupConfig, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = MarketplaceSettings::load()
        .map_err(|err| std::io::Error::other(format!("configuration: {err}")))?;

    let session = session_settings(
        &SessionToggles::from(&settings),
        BuildMode::from_debug_assertions(),
    )
    .map_err(std::io::Error::other)?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        ephemeral = session.ephemeral,
        "session key loaded"
    );

    let base_url = Url::parse(settings.postal_lookup_url()).map_err(|err| {
        std::io::Error::other(format!(
            "invalid postal lookup url {}: {err}",
            settings.postal_lookup_url()
        ))
    })?;
    let bootstrap_admin = settings
        .admin_credentials()
        .map(|(email, password)| LoginCredentials::try_from_parts(email, password))
        .transpose()
        .map_err(|err| std::io::Error::other(format!("invalid bootstrap admin: {err}")))?;

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        settings.bind_addr(),
        PostalLookupConfig {
            base_url,
            timeout: settings.postal_lookup_timeout(),
        },
        Pricing {
            lead_price: settings.lead_price(),
            welcome_credits: settings.welcome_credits(),
        },
    )
    .with_expiry_sweep(settings.expiry_sweep_interval())
    .with_bootstrap_admin(bootstrap_admin);

    if let Some(database_url) = settings.database_url() {
        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .map_err(|err| std::io::Error::other(format!("database pool: {err}")))?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).await?;
    server.await
}
