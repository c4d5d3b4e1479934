//! Opaque token generation and digests.
//!
//! Refresh tokens leave the server as hex text and are stored only as their
//! SHA-256 digest, so a leaked table cannot be replayed.

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

/// `len` bytes from the OS CSPRNG, lower-case hex encoded (`2 * len` chars).
pub fn random_token_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Digest under which a token is looked up at rest.
pub fn token_digest(token: &str) -> Vec<u8> {
    Sha256::digest(token.as_bytes()).to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_sized_token_is_80_hex_chars() {
        let token = random_token_hex(40);
        assert_eq!(token.len(), 80);
        assert!(token.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
        assert_ne!(token, random_token_hex(40));
    }

    #[test]
    fn digest_is_plain_sha256() {
        assert_eq!(
            hex::encode(token_digest("")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(token_digest("abc"), token_digest("abc"));
        assert_ne!(token_digest("abc"), token_digest("abd"));
    }
}
