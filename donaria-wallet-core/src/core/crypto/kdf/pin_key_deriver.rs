use super::{KdfAlgorithm, KdfParams};
use crate::shared::constants::*;
use crate::shared::error::WalletError;
use crate::shared::WalletResult;
use argon2::Argon2;
use pbkdf2::pbkdf2;
use zeroize::Zeroizing;

/// 256-bit key derived from a PIN. Zeroized on drop.
// No Debug or Clone implementation to prevent key exposure
pub struct DerivedKey(Zeroizing<[u8; DERIVED_KEY_SIZE]>);

impl DerivedKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0[..]
    }

    #[cfg(test)]
    pub(crate) fn from_bytes(bytes: [u8; DERIVED_KEY_SIZE]) -> Self {
        Self(Zeroizing::new(bytes))
    }
}

/// Deterministic PIN key derivation under a fixed application salt
pub struct PinKeyDeriver {
    salt: Vec<u8>,
    params: KdfParams,
}

impl PinKeyDeriver {
    pub fn new(salt: impl Into<Vec<u8>>, params: KdfParams) -> WalletResult<Self> {
        let salt = salt.into();
        if salt.len() < MIN_SALT_LENGTH {
            return Err(WalletError::config(format!(
                "KDF salt must be at least {} bytes",
                MIN_SALT_LENGTH
            )));
        }
        params.validate()?;
        Ok(Self { salt, params })
    }

    pub fn new_default() -> Self {
        Self {
            salt: DEFAULT_KDF_SALT.as_bytes().to_vec(),
            params: KdfParams::default(),
        }
    }

    /// Parameters used when sealing new envelopes
    pub fn params(&self) -> &KdfParams {
        &self.params
    }

    /// Derive the key for `pin` with the configured parameters
    pub fn derive(&self, pin: &str) -> WalletResult<DerivedKey> {
        self.derive_with(pin, &self.params)
    }

    /// Derive the key for `pin` with explicit parameters, e.g. the ones an
    /// existing envelope was sealed with
    pub fn derive_with(&self, pin: &str, params: &KdfParams) -> WalletResult<DerivedKey> {
        if pin.is_empty() {
            return Err(WalletError::validation("PIN cannot be empty"));
        }
        params.validate()?;

        let mut key = Zeroizing::new([0u8; DERIVED_KEY_SIZE]);
        match params.algorithm {
            KdfAlgorithm::Pbkdf2Sha256 => {
                pbkdf2::<hmac::Hmac<sha2::Sha256>>(pin.as_bytes(), &self.salt, params.iterations, &mut key[..])
                    .map_err(|e| WalletError::crypto(format!("PBKDF2 error: {:?}", e)))?;
            }
            KdfAlgorithm::Argon2id => {
                let argon2 = Argon2::new(
                    argon2::Algorithm::Argon2id,
                    argon2::Version::V0x13,
                    argon2::Params::new(
                        ARGON2_MEMORY_COST_KIB,
                        params.iterations,
                        ARGON2_PARALLELISM,
                        Some(DERIVED_KEY_SIZE),
                    )?,
                );
                argon2.hash_password_into(pin.as_bytes(), &self.salt, &mut key[..])?;
            }
        }

        Ok(DerivedKey(key))
    }
}
