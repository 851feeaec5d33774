//! Domain entities and value objects
//!
//! This module contains the core domain entities and value objects
//! that represent the business concepts in the wallet vault.

pub mod vault_record;

// Re-export entities
pub use vault_record::*;
