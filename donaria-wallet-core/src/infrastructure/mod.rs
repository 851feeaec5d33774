//! Infrastructure layer
//!
//! This module contains the environment-facing pieces of the wallet core,
//! currently runtime configuration.

pub mod config;

// Re-export infrastructure components
pub use config::*;
