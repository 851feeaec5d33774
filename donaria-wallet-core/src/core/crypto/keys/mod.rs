//! Key management for the wallet core
//!
//! This module handles generation, encoding and use of Stellar ed25519 keys.

pub mod secret_seed;
pub mod key_manager;

// Re-export all public items from submodules
pub use secret_seed::*;
pub use key_manager::*;
