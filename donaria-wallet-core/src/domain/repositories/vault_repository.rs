//! Vault repository for data access
//!
//! This module defines the persistent record store used by the unlock protocol.

use crate::domain::entities::WalletVaultRecord;
use crate::shared::error::WalletError;
use async_trait::async_trait;

/// Vault record store, keyed by owner only
#[async_trait]
pub trait VaultRepository: Send + Sync {
    /// Fetch the owner's record, `None` if it was never provisioned
    async fn get(&self, owner_id: &str) -> Result<Option<WalletVaultRecord>, WalletError>;

    /// Store the owner's record, replacing any previous one
    async fn put(&self, owner_id: &str, record: &WalletVaultRecord) -> Result<(), WalletError>;
}
