//! Wallet vault
//!
//! Provisioning and unlocking of PIN-sealed wallets.
//!
//! SECURITY: every failure between reading a record and recovering a secret
//! whose public identity matches the record surfaces as `InvalidPin`. The
//! cause is logged at debug level and never returned.

use crate::core::crypto::encryption::{EncryptionManager, Envelope};
use crate::core::crypto::keys::SecretSeed;
use crate::core::crypto::kdf::{KdfParams, PinKeyDeriver};
use crate::core::pin::validate_pin;
use crate::domain::entities::{UnlockAttempt, UnlockedWallet, VaultState, WalletVaultRecord};
use crate::domain::repositories::VaultRepository;
use crate::infrastructure::config::VaultConfig;
use crate::shared::error::WalletError;
use crate::shared::types::PublicIdentity;
use crate::shared::utils::truncate_identity;
use crate::shared::WalletResult;
use std::sync::Arc;
use tokio::sync::Mutex;
use zeroize::Zeroizing;

/// PIN-sealed wallet store
pub struct WalletVault<R: VaultRepository> {
    repository: Arc<R>,
    deriver: Arc<PinKeyDeriver>,
    encryption: Arc<EncryptionManager>,
    provision_lock: Mutex<()>,
}

impl<R: VaultRepository> WalletVault<R> {
    pub fn new(repository: Arc<R>, deriver: PinKeyDeriver, encryption: EncryptionManager) -> Self {
        Self {
            repository,
            deriver: Arc::new(deriver),
            encryption: Arc::new(encryption),
            provision_lock: Mutex::new(()),
        }
    }

    pub fn from_config(repository: Arc<R>, config: &VaultConfig) -> WalletResult<Self> {
        let deriver = PinKeyDeriver::new(config.kdf_salt.as_bytes(), config.kdf)?;
        Ok(Self::new(repository, deriver, EncryptionManager::new(config.cipher)))
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Parameters new envelopes are sealed with
    pub fn kdf_params(&self) -> KdfParams {
        *self.deriver.params()
    }

    /// Create a wallet for `owner_id` with a freshly generated keypair
    pub async fn provision(&self, owner_id: &str, pin: &str) -> WalletResult<WalletVaultRecord> {
        validate_pin(pin)?;
        self.seal_and_store(owner_id, pin, SecretSeed::generate()).await
    }

    /// Create a wallet for `owner_id` around an existing Stellar secret
    pub async fn provision_with_secret(
        &self,
        owner_id: &str,
        pin: &str,
        secret: &str,
    ) -> WalletResult<WalletVaultRecord> {
        validate_pin(pin)?;
        let seed = SecretSeed::from_strkey(secret)
            .map_err(|_| WalletError::validation("Invalid Stellar secret seed"))?;
        self.seal_and_store(owner_id, pin, seed).await
    }

    async fn seal_and_store(&self, owner_id: &str, pin: &str, seed: SecretSeed) -> WalletResult<WalletVaultRecord> {
        // Fail fast before paying for the KDF
        if self.repository.get(owner_id).await?.is_some() {
            return Err(WalletError::wallet_already_exists(owner_id));
        }

        let deriver = Arc::clone(&self.deriver);
        let encryption = Arc::clone(&self.encryption);
        let pin = Zeroizing::new(pin.to_string());
        let (public_identity, envelope) = tokio::task::spawn_blocking(move || -> WalletResult<_> {
            let key = deriver.derive(&pin)?;
            let envelope = encryption.seal(seed.to_strkey().as_bytes(), &key, *deriver.params())?;
            Ok((seed.public_identity(), envelope))
        })
        .await??;

        let record = WalletVaultRecord::new(owner_id, public_identity, envelope.to_string());
        {
            let _guard = self.provision_lock.lock().await;
            if self.repository.get(owner_id).await?.is_some() {
                return Err(WalletError::wallet_already_exists(owner_id));
            }
            self.repository.put(owner_id, &record).await?;
        }

        log::info!(
            "Wallet provisioned: {} ({}, {})",
            truncate_identity(&record.public_identity),
            envelope.algorithm,
            envelope.kdf.algorithm
        );
        Ok(record)
    }

    /// Recover the secret for an unlock attempt.
    ///
    /// Errors:
    /// - `WalletNotFound` when the owner has no vault
    /// - `InvalidPin` for a wrong PIN or any corruption of the stored record
    /// - `Storage` when the record store itself fails
    pub async fn unlock(&self, attempt: UnlockAttempt) -> WalletResult<UnlockedWallet> {
        let record = self
            .repository
            .get(&attempt.owner_id)
            .await?
            .ok_or_else(|| WalletError::wallet_not_found(attempt.owner_id.clone()))?;

        let deriver = Arc::clone(&self.deriver);
        let encryption = Arc::clone(&self.encryption);
        let envelope = record.envelope.clone();
        let public_identity = record.public_identity.clone();
        let pin = Zeroizing::new(attempt.pin().to_string());
        let opened = tokio::task::spawn_blocking(move || {
            open_envelope(&deriver, &encryption, &envelope, &public_identity, &pin)
        })
        .await?;

        match opened {
            Ok(secret) => {
                log::info!("Wallet unlocked: {}", truncate_identity(&record.public_identity));
                Ok(UnlockedWallet::new(attempt.owner_id.clone(), record.public_identity, secret))
            }
            Err(cause) => {
                log::debug!("Unlock rejected for {}: {}", truncate_identity(&record.public_identity), cause);
                Err(WalletError::InvalidPin)
            }
        }
    }

    pub async fn unlock_with_pin(&self, owner_id: &str, pin: &str) -> WalletResult<UnlockedWallet> {
        self.unlock(UnlockAttempt::new(owner_id, pin)).await
    }

    pub async fn state(&self, owner_id: &str) -> WalletResult<VaultState> {
        Ok(match self.repository.get(owner_id).await? {
            Some(_) => VaultState::Provisioned,
            None => VaultState::NonExistent,
        })
    }

    /// Stored public identity; readable without the PIN
    pub async fn public_identity(&self, owner_id: &str) -> WalletResult<PublicIdentity> {
        self.repository
            .get(owner_id)
            .await?
            .map(|record| record.public_identity)
            .ok_or_else(|| WalletError::wallet_not_found(owner_id))
    }
}

fn open_envelope(
    deriver: &PinKeyDeriver,
    encryption: &EncryptionManager,
    envelope: &str,
    public_identity: &str,
    pin: &str,
) -> WalletResult<SecretSeed> {
    let envelope: Envelope = envelope.parse()?;
    let key = deriver.derive_with(pin, &envelope.kdf)?;
    let plaintext = encryption.open_utf8(&envelope, &key)?;
    let secret = SecretSeed::from_strkey(&plaintext)?;

    if secret.public_identity() != public_identity {
        return Err(WalletError::crypto("Recovered key does not match stored public identity"));
    }
    Ok(secret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::crypto::encryption::EncryptionAlgorithm;
    use crate::core::crypto::kdf::KdfAlgorithm;
    use crate::shared::constants::DEFAULT_KDF_SALT;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    fn generated_secret() -> String {
        SecretSeed::generate().to_strkey().to_string()
    }

    // Mock store for tests
    #[derive(Default)]
    struct MockStore {
        data: std::sync::Mutex<HashMap<String, WalletVaultRecord>>,
        fail_reads: AtomicBool,
        writes: AtomicUsize,
    }

    impl MockStore {
        fn snapshot(&self, owner_id: &str) -> Option<WalletVaultRecord> {
            self.data.lock()
                .expect("Failed to acquire lock for storage read")
                .get(owner_id)
                .cloned()
        }

        fn replace(&self, record: WalletVaultRecord) {
            self.data.lock()
                .expect("Failed to acquire lock for storage write")
                .insert(record.owner_id.clone(), record);
        }
    }

    #[async_trait]
    impl VaultRepository for MockStore {
        async fn get(&self, owner_id: &str) -> Result<Option<WalletVaultRecord>, WalletError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(WalletError::storage("disk unavailable"));
            }
            Ok(self.snapshot(owner_id))
        }

        async fn put(&self, _owner_id: &str, record: &WalletVaultRecord) -> Result<(), WalletError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.replace(record.clone());
            Ok(())
        }
    }

    fn vault_with(algorithm: EncryptionAlgorithm) -> WalletVault<MockStore> {
        let deriver = PinKeyDeriver::new(DEFAULT_KDF_SALT, KdfParams::new(KdfAlgorithm::Pbkdf2Sha256, 1_000))
            .expect("Failed to create deriver");
        WalletVault::new(Arc::new(MockStore::default()), deriver, EncryptionManager::new(algorithm))
    }

    fn vault() -> WalletVault<MockStore> {
        vault_with(EncryptionAlgorithm::AES256GCM)
    }

    #[tokio::test]
    async fn test_provision_then_unlock() {
        let vault = vault();
        assert_eq!(vault.state("user-1").await.expect("Failed to read state"), VaultState::NonExistent);

        let record = vault.provision("user-1", "4821").await.expect("Failed to provision wallet");
        assert!(record.public_identity.starts_with('G'));
        assert!(record.envelope.starts_with("$dwv1$aes256gcm$pbkdf2-sha256$i=1000$"));
        assert_eq!(vault.state("user-1").await.expect("Failed to read state"), VaultState::Provisioned);

        let unlocked = vault.unlock_with_pin("user-1", "4821").await.expect("Failed to unlock wallet");
        assert_eq!(unlocked.owner_id, "user-1");
        assert_eq!(unlocked.public_identity, record.public_identity);
        assert_eq!(unlocked.secret().public_identity(), record.public_identity);
    }

    #[tokio::test]
    async fn test_record_never_contains_plaintext_secret() {
        let vault = vault();
        let secret = generated_secret();
        let record = vault.provision_with_secret("user-1", "1234", &secret).await
            .expect("Failed to provision wallet");

        let json = serde_json::to_string(&record).expect("Failed to serialize record");
        assert!(!json.contains(&secret));
    }

    #[tokio::test]
    async fn test_provision_with_secret_keeps_identity() {
        let vault = vault();
        let secret = generated_secret();
        let expected = SecretSeed::from_strkey(&secret).expect("Failed to parse secret").public_identity();
        let record = vault.provision_with_secret("user-1", "1234", &secret).await
            .expect("Failed to provision wallet");
        assert_eq!(record.public_identity, expected);

        let unlocked = vault.unlock_with_pin("user-1", "1234").await.expect("Failed to unlock wallet");
        assert_eq!(unlocked.secret().to_strkey().as_str(), secret);
    }

    #[tokio::test]
    async fn test_provision_validates_input() {
        let vault = vault();
        assert!(matches!(vault.provision("user-1", "12345").await, Err(WalletError::Validation(_))));
        assert!(matches!(vault.provision("user-1", "abcd").await, Err(WalletError::Validation(_))));
        assert!(matches!(
            vault.provision_with_secret("user-1", "1234", "SNOTASECRET").await,
            Err(WalletError::Validation(_))
        ));
        assert_eq!(vault.repository().writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_provision_refuses_to_overwrite() {
        let vault = vault();
        let first = vault.provision("user-1", "1111").await.expect("Failed to provision wallet");
        let second = vault.provision("user-1", "2222").await;

        assert!(matches!(second, Err(WalletError::WalletAlreadyExists(_))));
        assert_eq!(vault.repository().snapshot("user-1"), Some(first));
    }

    #[tokio::test]
    async fn test_wrong_pin_is_invalid_pin_and_changes_nothing() {
        let vault = vault();
        vault.provision("user-1", "4821").await.expect("Failed to provision wallet");
        let before = vault.repository().snapshot("user-1");
        let writes = vault.repository().writes.load(Ordering::SeqCst);

        let error = vault.unlock_with_pin("user-1", "0000").await.expect_err("Wrong PIN must fail");
        assert!(matches!(error, WalletError::InvalidPin));
        assert_eq!(error.to_string(), "Invalid PIN");

        assert_eq!(vault.repository().snapshot("user-1"), before);
        assert_eq!(vault.repository().writes.load(Ordering::SeqCst), writes);
    }

    #[tokio::test]
    async fn test_malformed_pins_are_invalid_pin() {
        let vault = vault();
        vault.provision("user-1", "4821").await.expect("Failed to provision wallet");

        for pin in ["", "48", "482100", "abcd"] {
            let result = vault.unlock_with_pin("user-1", pin).await;
            assert!(matches!(result, Err(WalletError::InvalidPin)), "pin {:?}", pin);
        }
    }

    #[tokio::test]
    async fn test_missing_vault_is_not_found() {
        let vault = vault();
        let error = vault.unlock_with_pin("nobody", "1234").await.expect_err("Unlock must fail");
        assert!(error.is_not_found());
        assert!(matches!(vault.public_identity("nobody").await, Err(WalletError::WalletNotFound(_))));
    }

    #[tokio::test]
    async fn test_storage_failure_is_not_masked() {
        let vault = vault();
        vault.provision("user-1", "4821").await.expect("Failed to provision wallet");
        vault.repository().fail_reads.store(true, Ordering::SeqCst);

        let result = vault.unlock_with_pin("user-1", "4821").await;
        assert!(matches!(result, Err(WalletError::Storage(_))));
    }

    #[tokio::test]
    async fn test_identity_mismatch_is_invalid_pin() {
        let vault = vault();
        let mut record = vault.provision("user-1", "4821").await.expect("Failed to provision wallet");
        record.public_identity = SecretSeed::generate().public_identity();
        vault.repository().replace(record);

        let result = vault.unlock_with_pin("user-1", "4821").await;
        assert!(matches!(result, Err(WalletError::InvalidPin)));
    }

    #[tokio::test]
    async fn test_corrupted_envelope_is_invalid_pin() {
        let vault = vault();
        let mut record = vault.provision("user-1", "4821").await.expect("Failed to provision wallet");

        let mut envelope: Envelope = record.envelope.parse().expect("Failed to parse envelope");
        envelope.ciphertext[3] ^= 0x40;
        record.envelope = envelope.to_string();
        vault.repository().replace(record.clone());
        assert!(matches!(vault.unlock_with_pin("user-1", "4821").await, Err(WalletError::InvalidPin)));

        record.envelope = "U2FsdGVkX19legacyformat".to_string();
        vault.repository().replace(record);
        assert!(matches!(vault.unlock_with_pin("user-1", "4821").await, Err(WalletError::InvalidPin)));
    }

    #[tokio::test]
    async fn test_oversized_kdf_cost_fails_fast() {
        let vault = vault();
        let mut record = vault.provision("user-1", "4821").await.expect("Failed to provision wallet");

        let mut envelope: Envelope = record.envelope.parse().expect("Failed to parse envelope");
        envelope.kdf.iterations = u32::MAX;
        record.envelope = envelope.to_string();
        vault.repository().replace(record.clone());

        let result = tokio::time::timeout(Duration::from_secs(5), vault.unlock_with_pin("user-1", "4821"))
            .await
            .expect("Unlock must not run the oversized KDF");
        assert!(matches!(result, Err(WalletError::InvalidPin)));

        envelope.kdf = KdfParams::new(KdfAlgorithm::Argon2id, u32::MAX);
        record.envelope = envelope.to_string();
        vault.repository().replace(record);

        let result = tokio::time::timeout(Duration::from_secs(5), vault.unlock_with_pin("user-1", "4821"))
            .await
            .expect("Unlock must not run the oversized KDF");
        assert!(matches!(result, Err(WalletError::InvalidPin)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_provisions_store_one_record() {
        let vault = Arc::new(vault());
        let first = {
            let vault = Arc::clone(&vault);
            tokio::spawn(async move { vault.provision("user-1", "1111").await })
        };
        let second = {
            let vault = Arc::clone(&vault);
            tokio::spawn(async move { vault.provision("user-1", "2222").await })
        };

        let results = [
            first.await.expect("Provision task panicked"),
            second.await.expect("Provision task panicked"),
        ];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(WalletError::WalletAlreadyExists(_)))));
        assert_eq!(vault.repository().writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unlock_uses_envelope_parameters() {
        // Sealed with ChaCha20 at 1 000 iterations, opened by a vault configured differently
        let sealing = vault_with(EncryptionAlgorithm::ChaCha20Poly1305);
        let record = sealing.provision("user-1", "4821").await.expect("Failed to provision wallet");

        let deriver = PinKeyDeriver::new(DEFAULT_KDF_SALT, KdfParams::new(KdfAlgorithm::Pbkdf2Sha256, 2_000))
            .expect("Failed to create deriver");
        let store = MockStore::default();
        store.replace(record);
        let reading = WalletVault::new(Arc::new(store), deriver, EncryptionManager::new_default());

        assert!(reading.unlock_with_pin("user-1", "4821").await.is_ok());
    }

    #[tokio::test]
    async fn test_public_identity_without_pin() {
        let vault = vault();
        let record = vault.provision("user-1", "4821").await.expect("Failed to provision wallet");
        assert_eq!(
            vault.public_identity("user-1").await.expect("Failed to read identity"),
            record.public_identity
        );
    }

    #[tokio::test]
    async fn test_from_config() {
        let config = VaultConfig {
            kdf: KdfParams::new(KdfAlgorithm::Pbkdf2Sha256, 1_000),
            cipher: EncryptionAlgorithm::ChaCha20Poly1305,
            ..VaultConfig::default()
        };
        let vault = WalletVault::from_config(Arc::new(MockStore::default()), &config)
            .expect("Failed to build vault");
        let record = vault.provision("user-1", "4821").await.expect("Failed to provision wallet");
        assert!(record.envelope.starts_with("$dwv1$chacha20poly1305$pbkdf2-sha256$i=1000$"));
    }
}
