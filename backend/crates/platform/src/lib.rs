//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (CSPRNG, SHA-256, opaque tokens)
//! - Password hashing (Argon2id)
//! - Bearer credential extraction

pub mod bearer;
pub mod crypto;
pub mod password;
