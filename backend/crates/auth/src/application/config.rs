//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing secret for access tokens
    pub jwt_secret: Vec<u8>,
    /// Access token lifetime (1 hour)
    pub access_token_ttl: Duration,
    /// Refresh token lifetime (30 days)
    pub refresh_token_ttl: Duration,
    /// Entropy of an opaque refresh token, in bytes
    pub refresh_token_bytes: usize,
    /// Clock skew tolerated when validating `exp`
    pub clock_skew_leeway: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: Vec::new(),
            access_token_ttl: Duration::from_secs(3600),              // 1 hour
            refresh_token_ttl: Duration::from_secs(30 * 24 * 3600), // 30 days
            refresh_token_bytes: 40,
            clock_skew_leeway: Duration::ZERO,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("refresh_token_bytes", &self.refresh_token_bytes)
            .field("clock_skew_leeway", &self.clock_skew_leeway)
            .finish()
    }
}

impl AuthConfig {
    /// Create config with an explicit signing secret
    pub fn with_secret(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: secret.into(),
            ..Default::default()
        }
    }

    /// Create config with a random signing secret (for development)
    ///
    /// Tokens do not survive a restart.
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self::with_secret(secret.to_vec())
    }

    /// Create config for development
    pub fn development() -> Self {
        Self::with_random_secret()
    }

    /// Access token TTL in seconds
    pub fn access_token_ttl_secs(&self) -> i64 {
        self.access_token_ttl.as_secs() as i64
    }

    /// Refresh token TTL as a chrono duration
    pub fn refresh_token_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.refresh_token_ttl.as_secs() as i64)
    }

    /// Human label for the access token TTL ("1h")
    pub fn access_token_ttl_label(&self) -> String {
        ttl_label(self.access_token_ttl)
    }

    /// Human label for the refresh token TTL ("30d")
    pub fn refresh_token_ttl_label(&self) -> String {
        ttl_label(self.refresh_token_ttl)
    }
}

/// Largest whole unit that divides the duration exactly
fn ttl_label(ttl: Duration) -> String {
    let secs = ttl.as_secs();
    match secs {
        s if s > 0 && s % 86_400 == 0 => format!("{}d", s / 86_400),
        s if s > 0 && s % 3_600 == 0 => format!("{}h", s / 3_600),
        s if s > 0 && s % 60 == 0 => format!("{}m", s / 60),
        s => format!("{}s", s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.access_token_ttl_secs(), 3600);
        assert_eq!(config.refresh_token_ttl_chrono(), chrono::Duration::days(30));
        assert_eq!(config.refresh_token_bytes, 40);
    }

    #[test]
    fn test_labels() {
        let config = AuthConfig::default();
        assert_eq!(config.access_token_ttl_label(), "1h");
        assert_eq!(config.refresh_token_ttl_label(), "30d");
        assert_eq!(ttl_label(Duration::from_secs(90)), "90s");
        assert_eq!(ttl_label(Duration::from_secs(900)), "15m");
    }

    #[test]
    fn test_random_secret_differs() {
        let a = AuthConfig::with_random_secret();
        let b = AuthConfig::with_random_secret();
        assert_eq!(a.jwt_secret.len(), 32);
        assert_ne!(a.jwt_secret, b.jwt_secret);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = AuthConfig::with_secret(b"super-secret".to_vec());
        assert!(!format!("{:?}", config).contains("super-secret"));
    }
}
