//! Application Configuration
//!
//! Ledger awards for the learning workflows.

/// Learning application configuration
#[derive(Debug, Clone)]
pub struct LearningConfig {
    /// Points for marking a content item viewed
    pub content_viewed_points: i64,
    /// Points awarded with a certificate
    pub certificate_points: i64,
    /// Coins awarded with a certificate
    pub certificate_coins: i64,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            content_viewed_points: 10,
            certificate_points: 100,
            certificate_coins: 50,
        }
    }
}

impl LearningConfig {
    /// Create config for development
    pub fn development() -> Self {
        Self::default()
    }
}
