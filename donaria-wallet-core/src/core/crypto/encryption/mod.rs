//! Envelope encryption for the wallet core
//!
//! This module seals wallet secrets with AES-256-GCM or ChaCha20-Poly1305 and
//! produces the storable envelope string.

pub mod encryption_manager;
pub mod encryption_algorithm;
pub mod envelope;

// Re-export all public items from submodules
pub use encryption_manager::*;
pub use encryption_algorithm::*;
pub use envelope::*;
