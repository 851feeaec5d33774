//! Donaria Wallet Core
//!
//! PIN-protected Stellar wallet vault for Donaria.
//! Handles key derivation, envelope encryption, unlocking and PIN-gated
//! signing in Rust.
//!
//! ## Architecture
//!
//! - **Core**: crypto (KDF, envelope cipher, keys), record storage, vault,
//!   session cache, gated actions, PIN entry, ledger collaborators
//! - **Domain**: vault record entities and the repository trait
//! - **Infrastructure**: configuration from `.env` and the environment
//! - **Shared**: common types, constants, errors and utilities
//!
//! ## Security Features
//!
//! - The wallet secret is stored only inside an authenticated envelope
//! - Every failed unlock reports the same generic `Invalid PIN`
//! - Secrets and PINs are zeroized on drop and never logged
//!
//! ## Usage
//!
//! ```rust,no_run
//! use donaria_wallet_core::{init_wallet_core, TerminalPinPrompt};
//!
//! # async fn run() -> Result<(), donaria_wallet_core::WalletError> {
//! let core = init_wallet_core().await?;
//!
//! // Create a wallet sealed under a 4-digit PIN
//! let public_identity = core.create_wallet("firebase-uid-123", "4821").await?;
//!
//! // Sign; prompts for the PIN unless the session is already unlocked
//! let prompt = TerminalPinPrompt::new();
//! let signature = core.sign_message("firebase-uid-123", "donation #42", &prompt).await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

pub mod core;
pub mod domain;
pub mod shared;
pub mod infrastructure;

use crate::core::crypto::keys::KeyManager;
use crate::core::crypto::security_audit::SecurityAuditor;
use crate::core::gate::{CachePolicy, GatedActionRunner};
use crate::core::ledger::{HorizonClient, LedgerClient};
use crate::core::session::SessionKeyCache;
use crate::core::vault::WalletVault;

// Re-export specific components
pub use crate::core::gate::PinPrompt;
pub use crate::core::pin::{validate_pin, PinEntry, TerminalPinPrompt};
pub use crate::core::storage::{FileVaultStore, InMemoryVaultStore};
pub use crate::infrastructure::config::VaultConfig;

// Re-export domain entities
pub use crate::domain::entities::{SessionState, UnlockAttempt, UnlockedWallet, VaultState, WalletVaultRecord};
pub use crate::domain::repositories::VaultRepository;

// Re-export shared types
pub use shared::error::WalletError;
pub use shared::types::{AccountInfo, Network, PaymentRequest, PublicIdentity, TransactionReceipt, WalletResult};

// Initialize logging
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::try_init()?;
    Ok(())
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Initialize the wallet core with configuration from .env or safe defaults
pub async fn init_wallet_core() -> WalletResult<WalletCore<FileVaultStore>> {
    let config = VaultConfig::from_env()?;

    let audit = SecurityAuditor::audit_config(&config);
    for warning in &audit.warnings {
        log::warn!("Security audit: {}", warning);
    }
    if !audit.passed {
        return Err(WalletError::config(format!(
            "Security audit failed: {}",
            audit.errors.join("; ")
        )));
    }

    let store = Arc::new(FileVaultStore::new(&config.vault_dir));
    log::info!(
        "Wallet core initialized: network={}, vault_dir={}",
        config.network,
        config.vault_dir.display()
    );
    WalletCore::new(config, store)
}

/// Main wallet core struct that provides access to all functionality
pub struct WalletCore<R: VaultRepository> {
    config: VaultConfig,
    runner: GatedActionRunner<R>,
    horizon: HorizonClient,
    ledger: Option<Arc<dyn LedgerClient>>,
    keys: KeyManager,
}

impl<R: VaultRepository> WalletCore<R> {
    pub fn new(config: VaultConfig, repository: Arc<R>) -> WalletResult<Self> {
        let vault = Arc::new(WalletVault::from_config(repository, &config)?);
        let runner = GatedActionRunner::new(
            vault,
            Arc::new(SessionKeyCache::new()),
            CachePolicy::from_flag(config.cache_unlocked),
        );
        let horizon = HorizonClient::with_base_url(config.network, config.horizon_url.clone())?;

        Ok(Self {
            config,
            runner,
            horizon,
            ledger: None,
            keys: KeyManager::new(),
        })
    }

    /// Attach the client that submits payments
    pub fn with_ledger(mut self, ledger: Arc<dyn LedgerClient>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    pub fn vault(&self) -> &Arc<WalletVault<R>> {
        self.runner.vault()
    }

    /// Create a wallet with a new keypair sealed under `pin`
    pub async fn create_wallet(&self, owner_id: &str, pin: &str) -> WalletResult<PublicIdentity> {
        let record = self.vault().provision(owner_id, pin).await?;
        Ok(record.public_identity)
    }

    /// Seal an existing Stellar secret under `pin`
    pub async fn import_wallet(&self, owner_id: &str, pin: &str, secret: &str) -> WalletResult<PublicIdentity> {
        let record = self.vault().provision_with_secret(owner_id, pin, secret).await?;
        Ok(record.public_identity)
    }

    /// Unlock with a PIN the caller already collected, e.g. on sign-in.
    /// The session keeps the wallet when caching is enabled.
    pub async fn unlock(&self, owner_id: &str, pin: &str) -> WalletResult<PublicIdentity> {
        let wallet = Arc::new(self.vault().unlock(UnlockAttempt::new(owner_id, pin)).await?);
        let public_identity = wallet.public_identity.clone();
        if self.runner.policy() == CachePolicy::CacheUnlocked {
            self.runner.cache().put(wallet).await;
        }
        Ok(public_identity)
    }

    pub async fn wallet_state(&self, owner_id: &str) -> WalletResult<VaultState> {
        self.vault().state(owner_id).await
    }

    pub async fn session_state(&self) -> SessionState {
        self.runner.cache().state().await
    }

    /// Sign `message` with the owner's key; returns a hex signature
    pub async fn sign_message(&self, owner_id: &str, message: &str, prompt: &dyn PinPrompt) -> WalletResult<String> {
        let keys = self.keys;
        let message = message.to_string();
        self.runner
            .run_gated(owner_id, prompt, move |wallet| async move {
                Ok(keys.sign_message(wallet.secret(), &message))
            })
            .await
    }

    /// Send a native payment through the attached ledger client
    pub async fn send_payment(
        &self,
        owner_id: &str,
        payment: &PaymentRequest,
        prompt: &dyn PinPrompt,
    ) -> WalletResult<TransactionReceipt> {
        payment.validate()?;
        let ledger = self
            .ledger
            .as_ref()
            .map(Arc::clone)
            .ok_or_else(|| WalletError::config("No ledger client configured"))?;

        let payment = payment.clone();
        let receipt = self
            .runner
            .run_gated(owner_id, prompt, move |wallet| async move {
                ledger.submit_payment(&wallet, &payment).await
            })
            .await?;

        log::info!("Payment submitted: {}", receipt.hash);
        Ok(receipt)
    }

    /// Ledger state of the owner's account; needs no PIN
    pub async fn account_info(&self, owner_id: &str) -> WalletResult<AccountInfo> {
        let public_identity = self.vault().public_identity(owner_id).await?;
        self.horizon.account_info(&public_identity).await
    }

    /// Fund the owner's account from friendbot (testnet only)
    pub async fn fund_account(&self, owner_id: &str) -> WalletResult<()> {
        let public_identity = self.vault().public_identity(owner_id).await?;
        self.horizon.fund_testnet_account(&public_identity).await
    }

    /// Block explorer page for the owner's account
    pub async fn explorer_url(&self, owner_id: &str) -> WalletResult<String> {
        let public_identity = self.vault().public_identity(owner_id).await?;
        Ok(self.config.network.account_url(&public_identity))
    }

    /// Sign-out: drop the cached wallet
    pub async fn lock(&self) {
        self.runner.lock().await;
    }
}

impl<R: VaultRepository> Drop for WalletCore<R> {
    fn drop(&mut self) {
        log::debug!("WalletCore dropped - cached wallet released");
    }
}
