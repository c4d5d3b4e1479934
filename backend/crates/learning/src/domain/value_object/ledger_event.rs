//! Ledger event types
//!
//! Point and coin ledgers share the same event vocabulary.

use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum LedgerEvent {
    #[serde(rename = "CONTEUDO_ASSISTIDO")]
    #[display("CONTEUDO_ASSISTIDO")]
    ContentViewed,
    #[serde(rename = "AVALIACAO")]
    #[display("AVALIACAO")]
    Assessment,
    #[serde(rename = "CERTIFICADO")]
    #[display("CERTIFICADO")]
    Certificate,
    #[serde(rename = "RESGATE_RECOMPENSA")]
    #[display("RESGATE_RECOMPENSA")]
    RewardRedemption,
    #[serde(rename = "ESTORNO_RECOMPENSA")]
    #[display("ESTORNO_RECOMPENSA")]
    RewardRefund,
}

impl LedgerEvent {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            LedgerEvent::ContentViewed => "CONTEUDO_ASSISTIDO",
            LedgerEvent::Assessment => "AVALIACAO",
            LedgerEvent::Certificate => "CERTIFICADO",
            LedgerEvent::RewardRedemption => "RESGATE_RECOMPENSA",
            LedgerEvent::RewardRefund => "ESTORNO_RECOMPENSA",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        [
            LedgerEvent::ContentViewed,
            LedgerEvent::Assessment,
            LedgerEvent::Certificate,
            LedgerEvent::RewardRedemption,
            LedgerEvent::RewardRefund,
        ]
        .into_iter()
        .find(|e| e.code() == code)
    }
}
