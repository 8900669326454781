//! Session cookie configuration.
//!
//! Turns the session-related [`MarketplaceSettings`] into the key and cookie
//! flags used by the session middleware. Debug builds fill gaps with
//! warnings; release builds refuse to start on a weak or missing key.

pub mod fingerprint;

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use tracing::warn;
use zeroize::Zeroize;

use crate::settings::MarketplaceSettings;

/// Minimum key file length accepted in release builds.
pub const SESSION_KEY_MIN_LEN: usize = 64;
/// `Key::derive_from` panics below this length.
const DERIVE_MIN_LEN: usize = 32;

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate missing keys and generate a temporary one.
    Debug,
    /// Release builds require a readable key of sufficient length.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Session toggles as configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToggles {
    pub key_file: PathBuf,
    pub allow_ephemeral: bool,
    pub cookie_secure: bool,
}

impl From<&MarketplaceSettings> for SessionToggles {
    fn from(settings: &MarketplaceSettings) -> Self {
        Self {
            key_file: settings.session_key_file(),
            allow_ephemeral: settings.session_allow_ephemeral.unwrap_or(false),
            cookie_secure: settings.cookie_secure(),
        }
    }
}

/// Session settings handed to the server.
pub struct SessionSettings {
    /// Signing and encryption key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// `Lax` in debug builds so local front ends on other ports work,
    /// `Strict` otherwise.
    pub same_site: SameSite,
    /// `true` when the key was generated for this process only.
    pub ephemeral: bool,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The key file exists but is too short for release builds.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// Release builds must not run on a generated key.
    #[error("session_allow_ephemeral must be disabled in release builds")]
    EphemeralNotAllowed,
}

/// Resolve session settings for `mode`.
///
/// # Examples
///
/// ```rust
/// use marketplace::inbound::http::session_config::{
///     BuildMode, SessionToggles, session_settings,
/// };
///
/// let toggles = SessionToggles {
///     key_file: "/nonexistent/session_key".into(),
///     allow_ephemeral: false,
///     cookie_secure: false,
/// };
/// let settings = session_settings(&toggles, BuildMode::Debug).expect("debug falls back");
/// assert!(settings.ephemeral);
/// ```
pub fn session_settings(
    toggles: &SessionToggles,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    if toggles.allow_ephemeral && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    if !toggles.cookie_secure {
        warn!("session cookies are not marked Secure");
    }
    let (key, ephemeral) = load_key(toggles, mode)?;
    Ok(SessionSettings {
        key,
        cookie_secure: toggles.cookie_secure,
        same_site: if mode.is_debug() {
            SameSite::Lax
        } else {
            SameSite::Strict
        },
        ephemeral,
    })
}

fn load_key(toggles: &SessionToggles, mode: BuildMode) -> Result<(Key, bool), SessionConfigError> {
    let path = &toggles.key_file;
    match std::fs::read(path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if !mode.is_debug() && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path: path.clone(),
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            if length < DERIVE_MIN_LEN {
                bytes.zeroize();
                warn!(
                    path = %path.display(),
                    length,
                    "session key too short to derive from; using temporary key (dev only)"
                );
                return Ok((Key::generate(), true));
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok((key, false))
        }
        Err(error) if mode.is_debug() || toggles.allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok((Key::generate(), true))
        }
        Err(error) => Err(SessionConfigError::KeyRead {
            path: path.clone(),
            source: error,
        }),
    }
}
