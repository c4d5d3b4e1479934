//! Domain Layer
//!
//! Curriculum, assessments, rewards and certificates: entities, value
//! objects, repository traits and pure services.

pub mod entity;
pub mod repository;
pub mod services;
pub mod value_object;
