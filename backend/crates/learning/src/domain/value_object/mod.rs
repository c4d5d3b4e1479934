//! Value Object Module

pub mod ledger_event;
pub mod redemption_status;

pub use ledger_event::LedgerEvent;
pub use redemption_status::RedemptionStatus;
