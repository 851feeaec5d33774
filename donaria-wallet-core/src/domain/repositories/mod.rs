//! Domain repositories
//!
//! This module contains repository traits for data access
//! following Domain-Driven Design principles.

pub mod vault_repository;

// Re-export repositories
pub use vault_repository::*;
