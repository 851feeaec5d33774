//! Cryptographic functionality for the wallet core
//!
//! This module provides PIN key derivation, envelope encryption, Stellar key
//! management and configuration auditing.
//!
//! SECURITY: This module implements hardened cryptographic operations with:
//! - Memory zeroization for all sensitive data
//! - Authenticated encryption with a fresh nonce per seal
//! - Cryptographic parameter validation

pub mod kdf;
pub mod encryption;
pub mod keys;
pub mod security_audit;

// Re-export all public items from submodules
pub use kdf::*;
pub use encryption::*;
pub use keys::*;
pub use security_audit::*;
