//! Learning Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository and unit-of-work traits
//! - `application/` - Use cases
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Curriculum: modules, contents, trails and per-account trail progress
//! - Assessments with questions, alternatives and graded submissions
//! - Challenges built from ordered assessment stages
//! - Point and coin ledgers; balances are sums of signed entries
//! - Reward catalog, redemption and redemption status workflow
//! - One certificate per (account, trail), issued on completion
//!
//! Multi-step workflows run inside one transaction obtained from
//! [`domain::repository::UnitOfWork`]; dropping it uncommitted rolls back.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::LearningConfig;
pub use domain::repository::LearningStore;
pub use error::{LearningError, LearningResult};
pub use infra::postgres::PgLearningStore;
pub use presentation::router::{learning_router, learning_router_generic};
