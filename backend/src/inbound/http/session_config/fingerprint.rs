//! Short, non-secret identifier of the active session key.
//!
//! Logged at startup so operators can tell which key file a process loaded
//! (and whether replicas agree) without the key itself reaching the logs.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

const FINGERPRINT_BYTES: usize = 8;

/// First 8 bytes of the SHA-256 of the key's signing half, as lowercase hex.
///
/// # Examples
///
/// ```rust
/// use actix_web::cookie::Key;
/// use marketplace::inbound::http::session_config::fingerprint::key_fingerprint;
///
/// let fingerprint = key_fingerprint(&Key::derive_from(&[7; 64]));
/// assert_eq!(fingerprint.len(), 16);
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn equal_material_gives_equal_fingerprints() {
        let first = key_fingerprint(&Key::derive_from(&[b'k'; 64]));
        let second = key_fingerprint(&Key::derive_from(&[b'k'; 64]));
        assert_eq!(first, second);
    }

    #[rstest]
    #[case(&[b'a'; 64], &[b'b'; 64])]
    #[case(&[b'a'; 64], &[b'a'; 65])]
    fn different_material_gives_different_fingerprints(#[case] left: &[u8], #[case] right: &[u8]) {
        assert_ne!(
            key_fingerprint(&Key::derive_from(left)),
            key_fingerprint(&Key::derive_from(right))
        );
    }

    #[rstest]
    fn fingerprint_is_sixteen_lowercase_hex_digits() {
        let fingerprint = key_fingerprint(&Key::generate());
        assert_eq!(fingerprint.len(), FINGERPRINT_BYTES * 2);
        assert!(
            fingerprint
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }
}
