use crate::shared::error::WalletError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Encryption algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EncryptionAlgorithm {
    #[default]
    AES256GCM,
    ChaCha20Poly1305,
}

impl EncryptionAlgorithm {
    pub fn id(&self) -> &'static str {
        match self {
            EncryptionAlgorithm::AES256GCM => "aes256gcm",
            EncryptionAlgorithm::ChaCha20Poly1305 => "chacha20poly1305",
        }
    }
}

impl fmt::Display for EncryptionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for EncryptionAlgorithm {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aes256gcm" | "aes-256-gcm" => Ok(EncryptionAlgorithm::AES256GCM),
            "chacha20poly1305" | "chacha20-poly1305" => Ok(EncryptionAlgorithm::ChaCha20Poly1305),
            other => Err(WalletError::crypto(format!("Unsupported cipher: {}", other))),
        }
    }
}
