//! Utility functions for the wallet core
//!
//! This module contains common utility functions used throughout the wallet core.

use crate::shared::constants::{LOG_IDENTITY_PREFIX, MAX_AMOUNT_DECIMALS, MAX_MEMO_BYTES};
use crate::shared::error::WalletError;

/// Shorten a public identity for log output (`GABCDEFG...`)
pub fn truncate_identity(identity: &str) -> String {
    match identity.char_indices().nth(LOG_IDENTITY_PREFIX) {
        Some((idx, _)) => format!("{}...", &identity[..idx]),
        None => identity.to_string(),
    }
}

/// Validate a native payment amount (positive, at most 7 decimals)
pub fn validate_amount(amount: &str) -> Result<(), WalletError> {
    if amount.is_empty() {
        return Err(WalletError::validation("Amount cannot be empty"));
    }

    let parts: Vec<&str> = amount.split('.').collect();
    let (whole, fraction) = match parts.as_slice() {
        [whole] => (*whole, ""),
        [whole, fraction] => (*whole, *fraction),
        _ => return Err(WalletError::validation("Invalid amount format")),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(WalletError::validation("Invalid amount format"));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(WalletError::validation("Amount must be a decimal number"));
    }
    if fraction.len() > MAX_AMOUNT_DECIMALS {
        return Err(WalletError::validation(format!(
            "Amount supports at most {} decimal places",
            MAX_AMOUNT_DECIMALS
        )));
    }
    if whole.chars().chain(fraction.chars()).all(|c| c == '0') {
        return Err(WalletError::validation("Amount must be greater than zero"));
    }

    Ok(())
}

/// Validate a text memo
pub fn validate_memo(memo: &str) -> Result<(), WalletError> {
    if memo.len() > MAX_MEMO_BYTES {
        return Err(WalletError::validation(format!(
            "Memo must be at most {} bytes",
            MAX_MEMO_BYTES
        )));
    }
    Ok(())
}

/// Calculate SHA256 hash
pub fn sha256_hash(data: &[u8]) -> Vec<u8> {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}
