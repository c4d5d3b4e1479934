//! Value Object Module

pub mod account_password;
pub mod enrollment_id;
pub mod role;

pub use account_password::{AccountPassword, RawPassword};
pub use enrollment_id::EnrollmentId;
pub use role::Role;
