//! Redemption Status
//!
//! `RESGATADO → PROCESSANDO → ENTREGUE`, with `CANCELADO` reachable from any
//! non-cancelled state. A cancelled redemption stays cancelled.

use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display)]
pub enum RedemptionStatus {
    #[default]
    #[serde(rename = "RESGATADO")]
    #[display("RESGATADO")]
    Requested,
    #[serde(rename = "PROCESSANDO")]
    #[display("PROCESSANDO")]
    Processing,
    #[serde(rename = "ENTREGUE")]
    #[display("ENTREGUE")]
    Delivered,
    #[serde(rename = "CANCELADO")]
    #[display("CANCELADO")]
    Cancelled,
}

impl RedemptionStatus {
    pub const ALL: [RedemptionStatus; 4] = [
        RedemptionStatus::Requested,
        RedemptionStatus::Processing,
        RedemptionStatus::Delivered,
        RedemptionStatus::Cancelled,
    ];

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            RedemptionStatus::Requested => "RESGATADO",
            RedemptionStatus::Processing => "PROCESSANDO",
            RedemptionStatus::Delivered => "ENTREGUE",
            RedemptionStatus::Cancelled => "CANCELADO",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    /// Wire names, reported back on an invalid status
    pub fn codes() -> Vec<&'static str> {
        Self::ALL.iter().map(RedemptionStatus::code).collect()
    }

    #[inline]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, RedemptionStatus::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        for status in RedemptionStatus::ALL {
            assert_eq!(RedemptionStatus::from_code(status.code()), Some(status));
            assert_eq!(status.to_string(), status.code());
        }
        assert_eq!(RedemptionStatus::from_code("resgatado"), None);
        assert_eq!(
            RedemptionStatus::codes(),
            vec!["RESGATADO", "PROCESSANDO", "ENTREGUE", "CANCELADO"]
        );
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&RedemptionStatus::Cancelled).unwrap();
        assert_eq!(json, "\"CANCELADO\"");
    }
}
