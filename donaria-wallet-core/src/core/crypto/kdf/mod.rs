//! PIN key derivation for the wallet core
//!
//! This module turns a low-entropy PIN and the application salt into the
//! symmetric key that seals a wallet secret.

pub mod kdf_algorithm;
pub mod kdf_params;
pub mod pin_key_deriver;

// Re-export all public items from submodules
pub use kdf_algorithm::*;
pub use kdf_params::*;
pub use pin_key_deriver::*;
