//! Auth (Authentication / Authorization) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases and token service
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router, access gate
//!
//! ## Features
//! - Sign in with enrollment id ("matrícula") + password
//! - HS256 access tokens carrying id / enrollment id / name / role
//! - Opaque refresh tokens (stored as SHA-256 digests only)
//! - Role-based access (colaborador, gestor, admin)
//! - Account administration
//!
//! ## Security Model
//! - Passwords hashed with Argon2id
//! - Unknown account and wrong password are indistinguishable
//! - Expired and malformed access tokens are reported separately

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::token::TokenService;
pub use domain::entity::{AccessClaims, Caller};
pub use domain::value_object::Role;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use presentation::middleware::{AccessGate, require_access_token};
pub use presentation::router::{auth_router, users_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
