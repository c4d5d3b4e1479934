//! Certificate entity

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, CertificateId, TrailId};

/// At most one per (account, trail)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    pub id: CertificateId,
    pub account_id: AccountId,
    pub trail_id: TrailId,
    pub issued_at: DateTime<Utc>,
}

impl Certificate {
    pub fn issue(account_id: AccountId, trail_id: TrailId) -> Self {
        Self {
            id: CertificateId::new(),
            account_id,
            trail_id,
            issued_at: Utc::now(),
        }
    }
}

/// Everything a renderer needs to print a certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateDocument {
    pub certificate: Certificate,
    pub trail_name: String,
    pub trail_description: String,
    pub holder_name: String,
    pub holder_enrollment_id: String,
    pub holder_sector: String,
}
