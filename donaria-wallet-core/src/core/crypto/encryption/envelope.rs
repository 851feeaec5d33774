use super::EncryptionAlgorithm;
use crate::core::crypto::kdf::{KdfAlgorithm, KdfParams};
use crate::shared::constants::{ENVELOPE_VERSION, NONCE_SIZE, TAG_SIZE};
use crate::shared::error::WalletError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;
use std::str::FromStr;

/// Sealed wallet secret: everything needed to attempt decryption except the PIN.
///
/// Text form:
/// `$dwv1$<cipher>$<kdf>$i=<iterations>$<base64(nonce)>$<base64(ciphertext||tag)>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub algorithm: EncryptionAlgorithm,
    pub kdf: KdfParams,
    pub nonce: Vec<u8>,
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Structural checks, independent of any key
    pub fn validate(&self) -> Result<(), WalletError> {
        if self.nonce.len() != NONCE_SIZE {
            return Err(WalletError::crypto(format!(
                "Envelope nonce must be {} bytes, got {}",
                NONCE_SIZE,
                self.nonce.len()
            )));
        }
        if self.ciphertext.len() <= TAG_SIZE {
            return Err(WalletError::crypto("Envelope ciphertext too short"));
        }
        self.kdf.validate()
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${}${}${}$i={}${}${}",
            ENVELOPE_VERSION,
            self.algorithm.id(),
            self.kdf.algorithm.id(),
            self.kdf.iterations,
            STANDARD.encode(&self.nonce),
            STANDARD.encode(&self.ciphertext)
        )
    }
}

impl FromStr for Envelope {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('$').collect();
        if parts.len() != 7 || !parts[0].is_empty() {
            return Err(WalletError::crypto("Invalid envelope format"));
        }
        if parts[1] != ENVELOPE_VERSION {
            return Err(WalletError::crypto(format!("Unsupported envelope version: {}", parts[1])));
        }

        let algorithm: EncryptionAlgorithm = parts[2].parse()?;
        let kdf_algorithm: KdfAlgorithm = parts[3].parse()?;
        let iterations: u32 = parts[4]
            .strip_prefix("i=")
            .and_then(|value| value.parse().ok())
            .ok_or_else(|| WalletError::crypto("Invalid iterations in envelope"))?;
        let nonce = STANDARD.decode(parts[5])?;
        let ciphertext = STANDARD.decode(parts[6])?;

        let envelope = Envelope {
            algorithm,
            kdf: KdfParams::new(kdf_algorithm, iterations),
            nonce,
            ciphertext,
        };
        envelope.validate()?;
        Ok(envelope)
    }
}
