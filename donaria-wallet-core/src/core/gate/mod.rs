//! Gated actions
//!
//! Runs an operation that needs the wallet secret. A cached unlocked wallet
//! is used when present; otherwise the user is prompted for the PIN once.
//! A failed unlock is returned to the caller and never retried here; the
//! next prompt for the same owner carries a generic failure notice.

use crate::core::pin::failure_message;
use crate::core::session::SessionKeyCache;
use crate::core::vault::WalletVault;
use crate::domain::entities::{UnlockAttempt, UnlockedWallet};
use crate::domain::repositories::VaultRepository;
use crate::shared::error::WalletError;
use crate::shared::types::OwnerId;
use crate::shared::WalletResult;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Source of PINs, typically a dialog or a terminal
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PinPrompt: Send + Sync {
    /// Ask for the owner's PIN. `failure` is a generic notice to show with
    /// the prompt. Returns `None` when the user cancels.
    async fn prompt_pin(&self, owner_id: &str, failure: Option<&'static str>) -> Option<String>;
}

/// Whether unlocked wallets are kept for the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    CacheUnlocked,
    AlwaysPrompt,
}

impl CachePolicy {
    pub fn from_flag(cache_unlocked: bool) -> Self {
        if cache_unlocked {
            Self::CacheUnlocked
        } else {
            Self::AlwaysPrompt
        }
    }
}

/// Wraps actions that need an unlocked wallet
pub struct GatedActionRunner<R: VaultRepository> {
    vault: Arc<WalletVault<R>>,
    cache: Arc<SessionKeyCache>,
    policy: CachePolicy,
    last_failure: Mutex<Option<(OwnerId, &'static str)>>,
}

impl<R: VaultRepository> GatedActionRunner<R> {
    pub fn new(vault: Arc<WalletVault<R>>, cache: Arc<SessionKeyCache>, policy: CachePolicy) -> Self {
        Self {
            vault,
            cache,
            policy,
            last_failure: Mutex::new(None),
        }
    }

    pub fn vault(&self) -> &Arc<WalletVault<R>> {
        &self.vault
    }

    pub fn cache(&self) -> &Arc<SessionKeyCache> {
        &self.cache
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Run `action` with the owner's unlocked wallet.
    ///
    /// The action is invoked at most once, and only after a successful
    /// unlock. Its error is returned unchanged.
    pub async fn run_gated<T, F, Fut>(&self, owner_id: &str, prompt: &dyn PinPrompt, action: F) -> WalletResult<T>
    where
        F: FnOnce(Arc<UnlockedWallet>) -> Fut + Send,
        Fut: Future<Output = WalletResult<T>> + Send,
    {
        let wallet = self.obtain_wallet(owner_id, prompt).await?;
        action(wallet).await
    }

    async fn obtain_wallet(&self, owner_id: &str, prompt: &dyn PinPrompt) -> WalletResult<Arc<UnlockedWallet>> {
        if self.policy == CachePolicy::CacheUnlocked {
            if let Some(wallet) = self.cache.get(owner_id).await {
                log::debug!("Using cached wallet, no PIN prompt");
                return Ok(wallet);
            }
        }

        let notice = self.take_notice(owner_id).await;
        let pin = prompt
            .prompt_pin(owner_id, notice)
            .await
            .ok_or_else(|| WalletError::cancelled("PIN entry cancelled"))?;

        let wallet = match self.vault.unlock(UnlockAttempt::new(owner_id, pin)).await {
            Ok(wallet) => Arc::new(wallet),
            Err(error) => {
                // Nothing to retry against a vault that does not exist
                if !error.is_not_found() {
                    *self.last_failure.lock().await = Some((owner_id.to_string(), failure_message(&error)));
                }
                return Err(error);
            }
        };

        if self.policy == CachePolicy::CacheUnlocked {
            self.cache.put(Arc::clone(&wallet)).await;
        }
        Ok(wallet)
    }

    /// Notice left by the previous failed unlock of `owner_id`, consumed once
    async fn take_notice(&self, owner_id: &str) -> Option<&'static str> {
        match self.last_failure.lock().await.take() {
            Some((owner, notice)) if owner == owner_id => Some(notice),
            _ => None,
        }
    }

    /// Sign-out: forget any cached wallet
    pub async fn lock(&self) {
        self.cache.clear().await;
        *self.last_failure.lock().await = None;
    }
}
