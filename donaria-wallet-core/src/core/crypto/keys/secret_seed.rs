use crate::shared::constants::SECRET_SEED_SIZE;
use crate::shared::error::WalletError;
use crate::shared::types::PublicIdentity;
use crate::shared::WalletResult;
use ed25519_dalek::{Signature, Signer, SigningKey};
use rand_core::OsRng;
use zeroize::{Zeroize, Zeroizing};

/// Stellar ed25519 secret seed (`S...` in strkey form).
///
/// Bytes are zeroized on drop.
pub struct SecretSeed {
    seed: Zeroizing<[u8; SECRET_SEED_SIZE]>,
}

impl SecretSeed {
    /// Generate a fresh random seed
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self {
            seed: Zeroizing::new(signing_key.to_bytes()),
        }
    }

    /// Parse a strkey-encoded secret (`S...`)
    pub fn from_strkey(secret: &str) -> WalletResult<Self> {
        let mut decoded = stellar_strkey::ed25519::PrivateKey::from_string(secret.trim())
            .map_err(|_| WalletError::crypto("Invalid Stellar secret seed"))?;
        let seed = Zeroizing::new(decoded.0);
        decoded.0.zeroize();
        Ok(Self { seed })
    }

    /// Strkey form of the secret. Only ever handed to the envelope cipher or
    /// a ledger client, never to a log.
    pub fn to_strkey(&self) -> Zeroizing<String> {
        Zeroizing::new(stellar_strkey::ed25519::PrivateKey(*self.seed).to_string())
    }

    /// Recompute the public identity (`G...`) from the secret
    pub fn public_identity(&self) -> PublicIdentity {
        let verifying_key = self.signing_key().verifying_key();
        stellar_strkey::ed25519::PublicKey(verifying_key.to_bytes()).to_string()
    }

    /// Sign raw bytes
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.signing_key().sign(message)
    }

    fn signing_key(&self) -> SigningKey {
        SigningKey::from_bytes(&self.seed)
    }
}

// No Debug implementation to prevent key exposure in logs
// No Clone implementation to prevent accidental key duplication
