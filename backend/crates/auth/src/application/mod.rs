//! Application Layer
//!
//! Use cases and application services.

pub mod accounts;
pub mod config;
pub mod refresh;
pub mod sign_in;
pub mod sign_out;
pub mod token;

// Re-exports
pub use accounts::{
    AccountQueryUseCase, CreateAccountInput, CreateAccountUseCase, DeleteAccountUseCase,
    UpdateAccountInput, UpdateAccountUseCase,
};
pub use config::AuthConfig;
pub use refresh::{RefreshAccessTokenUseCase, RefreshOutput};
pub use sign_in::{IssuedRefreshToken, SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use token::{IssuedAccessToken, TokenService};
