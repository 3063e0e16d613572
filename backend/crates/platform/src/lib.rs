//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations with no domain knowledge:
//! - Cryptographic utilities (SHA-256, HMAC, base64url, constant-time compare)
//! - Password hashing (Argon2id, NIST SP 800-63B policy)
//! - HMAC-signed token codec
//! - Cookie building and extraction

pub mod cookie;
pub mod crypto;
pub mod password;
pub mod token;
