//! Session key cache
//!
//! Holds at most one unlocked wallet for the current session. The cache is
//! constructed explicitly and passed to whoever needs it; there is no global.

use crate::domain::entities::{SessionState, UnlockedWallet};
use crate::shared::types::OwnerId;
use crate::shared::utils::truncate_identity;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Zero or one unlocked wallet
///
/// ```
/// # use std::sync::Arc;
/// # use donaria_wallet_core::core::crypto::keys::SecretSeed;
/// # use donaria_wallet_core::core::session::SessionKeyCache;
/// # use donaria_wallet_core::UnlockedWallet;
/// # tokio_test::block_on(async {
/// let cache = SessionKeyCache::new();
/// let seed = SecretSeed::generate();
/// let identity = seed.public_identity();
/// cache.put(Arc::new(UnlockedWallet::new("owner-1", identity, seed))).await;
///
/// assert!(cache.get("owner-1").await.is_some());
/// assert!(cache.get("owner-2").await.is_none());
/// # })
/// ```
#[derive(Default)]
pub struct SessionKeyCache {
    entry: RwLock<Option<Arc<UnlockedWallet>>>,
}

impl SessionKeyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached wallet for `owner_id`; `None` when empty or held for someone else
    pub async fn get(&self, owner_id: &str) -> Option<Arc<UnlockedWallet>> {
        self.entry
            .read()
            .await
            .as_ref()
            .filter(|wallet| wallet.owner_id == owner_id)
            .cloned()
    }

    /// Store `wallet`, replacing any previous entry
    pub async fn put(&self, wallet: Arc<UnlockedWallet>) {
        log::info!(
            "Session unlocked for {}",
            truncate_identity(&wallet.public_identity)
        );
        let previous = self.entry.write().await.replace(wallet);
        if previous.is_some() {
            log::debug!("Replaced previously cached wallet");
        }
    }

    /// Drop the cached wallet. The secret is zeroized once the last holder
    /// releases it.
    pub async fn clear(&self) {
        if let Some(wallet) = self.entry.write().await.take() {
            log::info!("Session locked for {}", truncate_identity(&wallet.public_identity));
        }
    }

    pub async fn state(&self) -> SessionState {
        if self.entry.read().await.is_some() {
            SessionState::Unlocked
        } else {
            SessionState::Locked
        }
    }

    pub async fn current_owner(&self) -> Option<OwnerId> {
        self.entry.read().await.as_ref().map(|wallet| wallet.owner_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::crypto::keys::SecretSeed;

    fn unlocked(owner_id: &str) -> Arc<UnlockedWallet> {
        let seed = SecretSeed::generate();
        let public_identity = seed.public_identity();
        Arc::new(UnlockedWallet::new(owner_id, public_identity, seed))
    }

    #[tokio::test]
    async fn test_empty_cache_is_locked() {
        let cache = SessionKeyCache::new();
        assert_eq!(cache.state().await, SessionState::Locked);
        assert!(cache.get("user-1").await.is_none());
        assert!(cache.current_owner().await.is_none());
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let cache = SessionKeyCache::new();
        let wallet = unlocked("user-1");
        cache.put(Arc::clone(&wallet)).await;

        assert_eq!(cache.state().await, SessionState::Unlocked);
        let cached = cache.get("user-1").await.expect("Wallet should be cached");
        assert!(Arc::ptr_eq(&cached, &wallet));
        assert_eq!(cache.current_owner().await.as_deref(), Some("user-1"));
    }

    #[tokio::test]
    async fn test_get_for_other_owner_is_absent() {
        let cache = SessionKeyCache::new();
        cache.put(unlocked("user-1")).await;
        assert!(cache.get("user-2").await.is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_entry() {
        let cache = SessionKeyCache::new();
        cache.put(unlocked("user-1")).await;
        cache.put(unlocked("user-2")).await;

        assert!(cache.get("user-1").await.is_none());
        assert!(cache.get("user-2").await.is_some());
    }

    #[tokio::test]
    async fn test_clear_releases_wallet() {
        let cache = SessionKeyCache::new();
        let wallet = unlocked("user-1");
        cache.put(Arc::clone(&wallet)).await;
        assert_eq!(Arc::strong_count(&wallet), 2);

        cache.clear().await;
        assert_eq!(cache.state().await, SessionState::Locked);
        assert_eq!(Arc::strong_count(&wallet), 1);
    }
}
