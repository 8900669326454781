//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use marketplace::domain::LoginCredentials;
use marketplace::inbound::http::state::Pricing;
use marketplace::outbound::persistence::DbPool;
use url::Url;

/// Where and how patiently to call the postal-code service.
#[derive(Debug, Clone)]
pub struct PostalLookupConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) postal: PostalLookupConfig,
    pub(crate) pricing: Pricing,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) expiry_sweep: Option<Duration>,
    pub(crate) bootstrap_admin: Option<LoginCredentials>,
}

impl ServerConfig {
    /// Construct a server configuration from the session and network settings.
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        postal: PostalLookupConfig,
        pricing: Pricing,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            postal,
            pricing,
            db_pool: None,
            expiry_sweep: None,
            bootstrap_admin: None,
        }
    }

    /// Attach a database connection pool.
    ///
    /// Without one the server keeps all state in process memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Run the order expiry sweep every `period`.
    #[must_use]
    pub fn with_expiry_sweep(mut self, period: Option<Duration>) -> Self {
        self.expiry_sweep = period;
        self
    }

    /// Create an admin account with `credentials` at startup if missing.
    #[must_use]
    pub fn with_bootstrap_admin(mut self, credentials: Option<LoginCredentials>) -> Self {
        self.bootstrap_admin = credentials;
        self
    }
}
