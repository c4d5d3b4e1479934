//! Entities

pub mod account;
pub mod caller;
pub mod refresh_token;

pub use account::Account;
pub use caller::{AccessClaims, Caller};
pub use refresh_token::RefreshToken;
