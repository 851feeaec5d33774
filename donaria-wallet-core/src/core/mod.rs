//! Core wallet functionality
//!
//! This module contains the core vault functionality including
//! cryptography, record storage, unlocking, session caching, gated actions,
//! PIN entry and the ledger collaborators.

pub mod crypto;
pub mod storage;
pub mod vault;
pub mod session;
pub mod gate;
pub mod pin;
pub mod ledger;
