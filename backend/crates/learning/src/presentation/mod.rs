//! Presentation Layer
//!
//! HTTP handlers, DTOs, and router. Authentication comes from the
//! `auth` access gate.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::LearningAppState;
pub use router::{learning_router, learning_router_generic};
