use crate::core::crypto::kdf::{DerivedKey, KdfParams};
use crate::shared::constants::NONCE_SIZE;
use crate::shared::error::WalletError;
use crate::shared::WalletResult;
use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use chacha20poly1305::{ChaCha20Poly1305, Key as ChaChaKey, Nonce as ChaChaNonce};
use rand_core::OsRng;
use rand_core::RngCore;
use zeroize::Zeroizing;
use super::{EncryptionAlgorithm, Envelope};

/// Authenticated envelope encryption
pub struct EncryptionManager {
    algorithm: EncryptionAlgorithm,
}

impl EncryptionManager {
    pub fn new(algorithm: EncryptionAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn new_default() -> Self {
        Self::new(EncryptionAlgorithm::AES256GCM)
    }

    pub fn algorithm(&self) -> EncryptionAlgorithm {
        self.algorithm
    }

    /// Seal a secret under `key`. A fresh nonce is drawn for every call.
    pub fn seal(&self, secret: &[u8], key: &DerivedKey, kdf: KdfParams) -> WalletResult<Envelope> {
        if secret.is_empty() {
            return Err(WalletError::validation("Secret cannot be empty"));
        }

        let nonce = self.generate_nonce();
        let ciphertext = match self.algorithm {
            EncryptionAlgorithm::AES256GCM => {
                let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
                cipher
                    .encrypt(Nonce::from_slice(&nonce), secret)
                    .map_err(|e| WalletError::crypto(format!("AES-GCM encryption failed: {}", e)))?
            }
            EncryptionAlgorithm::ChaCha20Poly1305 => {
                let cipher = ChaCha20Poly1305::new(ChaChaKey::from_slice(key.as_bytes()));
                cipher
                    .encrypt(ChaChaNonce::from_slice(&nonce), secret)
                    .map_err(|e| WalletError::crypto(format!("ChaCha20-Poly1305 encryption failed: {}", e)))?
            }
        };

        Ok(Envelope {
            algorithm: self.algorithm,
            kdf,
            nonce: nonce.to_vec(),
            ciphertext,
        })
    }

    /// Open an envelope. Uses the cipher recorded in the envelope, not the
    /// manager's default, so envelopes stay readable after a config change.
    pub fn open(&self, envelope: &Envelope, key: &DerivedKey) -> WalletResult<Zeroizing<Vec<u8>>> {
        envelope.validate()?;

        let plaintext = match envelope.algorithm {
            EncryptionAlgorithm::AES256GCM => {
                let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
                cipher
                    .decrypt(Nonce::from_slice(&envelope.nonce), envelope.ciphertext.as_slice())
                    .map_err(|e| WalletError::crypto(format!("AES-GCM decryption failed: {}", e)))?
            }
            EncryptionAlgorithm::ChaCha20Poly1305 => {
                let cipher = ChaCha20Poly1305::new(ChaChaKey::from_slice(key.as_bytes()));
                cipher
                    .decrypt(ChaChaNonce::from_slice(&envelope.nonce), envelope.ciphertext.as_slice())
                    .map_err(|e| WalletError::crypto(format!("ChaCha20-Poly1305 decryption failed: {}", e)))?
            }
        };
        let plaintext = Zeroizing::new(plaintext);

        if plaintext.is_empty() {
            return Err(WalletError::crypto("Decrypted secret is empty"));
        }
        Ok(plaintext)
    }

    /// Open an envelope whose payload must be UTF-8 text
    pub fn open_utf8(&self, envelope: &Envelope, key: &DerivedKey) -> WalletResult<Zeroizing<String>> {
        let plaintext = self.open(envelope, key)?;
        let text = std::str::from_utf8(&plaintext)
            .map_err(|_| WalletError::crypto("Decrypted secret is not valid UTF-8"))?;
        Ok(Zeroizing::new(text.to_string()))
    }

    /// Generate a secure random nonce
    fn generate_nonce(&self) -> [u8; NONCE_SIZE] {
        let mut nonce = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce);
        nonce
    }
}

impl Default for EncryptionManager {
    fn default() -> Self {
        Self::new_default()
    }
}
