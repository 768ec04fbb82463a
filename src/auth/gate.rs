use sha2::{Digest, Sha256};

use crate::config::AppConfig;

/// Lifetime of an issued admin session, in days. Matches the cookie
/// max-age set by the login handler.
pub const SESSION_TTL_DAYS: i64 = 7;

/// Number of random bytes in a session token (hex-encoded to 64 chars).
const TOKEN_BYTES: usize = 32;

/// Check the supplied credentials against the configured admin account.
///
/// Both comparisons run over fixed-length sha256 digests and neither
/// short-circuits.
pub fn verify_credentials(config: &AppConfig, username: &str, password: &str) -> bool {
    let username_ok = digest_eq(username, &config.admin_username);
    let password_ok = digest_eq(password, &config.admin_password);
    username_ok & password_ok
}

fn digest_eq(supplied: &str, expected: &str) -> bool {
    Sha256::digest(supplied.as_bytes()) == Sha256::digest(expected.as_bytes())
}

/// Generate a fresh opaque session token: 32 random bytes, hex-encoded.
pub fn generate_token() -> String {
    use rand::Rng;

    let bytes: [u8; TOKEN_BYTES] = rand::rng().random();
    to_hex(&bytes)
}

/// The sha256 digest of a token, hex-encoded, as stored in the session
/// collection.
pub fn token_digest(token: &str) -> String {
    to_hex(&Sha256::digest(token.as_bytes()))
}

fn to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;

    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, byte| {
        let _ = write!(out, "{byte:02x}");
        out
    })
}
