//! Runtime configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `MARKETPLACE_*` environment variables and an
//! optional configuration file, in increasing order of precedence for the
//! later sources as OrthoConfig layers them.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::Credits;

const DEFAULT_LEAD_PRICE: u32 = 10;
const DEFAULT_POSTAL_LOOKUP_URL: &str = "https://viacep.com.br/ws/";
const DEFAULT_POSTAL_LOOKUP_TIMEOUT_SECS: u64 = 5;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Marketplace server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MARKETPLACE")]
pub struct MarketplaceSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL URL. Without it the server runs on the in-memory store.
    pub database_url: Option<String>,
    /// File holding at least 64 bytes of session key material.
    pub session_key_file: Option<PathBuf>,
    /// Fall back to a generated key when the key file is unreadable.
    pub session_allow_ephemeral: Option<bool>,
    /// Send session cookies without `Secure`, for plain-HTTP local runs.
    pub cookie_insecure: Option<bool>,
    /// Credits charged per lead unlock.
    pub lead_price: Option<u32>,
    /// Credits granted to new professional profiles.
    pub welcome_credits: Option<u32>,
    /// ViaCEP base URL, ending in `/`.
    pub postal_lookup_url: Option<String>,
    pub postal_lookup_timeout_secs: Option<u64>,
    /// Interval of the background expiry sweep; disabled when absent.
    pub expiry_sweep_secs: Option<u64>,
    /// E-mail of an admin account created at startup when missing.
    pub admin_email: Option<String>,
    /// Password for [`Self::admin_email`].
    pub admin_password: Option<String>,
}

impl MarketplaceSettings {
    /// Configured bind address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or(SocketAddr::from(([0, 0, 0, 0], 8080)))
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Path of the 64-byte session key.
    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    /// Whether session cookies carry `Secure`; only an explicit
    /// `cookie_insecure` turns it off.
    pub fn cookie_secure(&self) -> bool {
        !self.cookie_insecure.unwrap_or(false)
    }

    /// Credits charged per unlock on newly published orders.
    pub fn lead_price(&self) -> Credits {
        Credits::new(self.lead_price.unwrap_or(DEFAULT_LEAD_PRICE))
    }

    /// Credits granted to newly registered professionals.
    pub fn welcome_credits(&self) -> Credits {
        Credits::new(self.welcome_credits.unwrap_or(0))
    }

    /// Base URL of the postal-code service.
    pub fn postal_lookup_url(&self) -> &str {
        self.postal_lookup_url
            .as_deref()
            .unwrap_or(DEFAULT_POSTAL_LOOKUP_URL)
    }

    /// Request timeout for postal-code lookups.
    pub fn postal_lookup_timeout(&self) -> Duration {
        Duration::from_secs(
            self.postal_lookup_timeout_secs
                .unwrap_or(DEFAULT_POSTAL_LOOKUP_TIMEOUT_SECS),
        )
    }

    /// Sweep interval; zero disables the sweep like an absent value.
    pub fn expiry_sweep_interval(&self) -> Option<Duration> {
        self.expiry_sweep_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Bootstrap admin credentials when both halves are configured.
    pub fn admin_credentials(&self) -> Option<(&str, &str)> {
        match (self.admin_email.as_deref(), self.admin_password.as_deref()) {
            (Some(email), Some(password)) if !email.trim().is_empty() => Some((email, password)),
            _ => None,
        }
    }
}
