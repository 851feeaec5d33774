use crate::shared::constants::{
    DEFAULT_KDF_ITERATIONS, MAX_ARGON2_TIME_COST, MAX_KDF_ITERATIONS, MIN_KDF_ITERATIONS,
    RECOMMENDED_MIN_KDF_ITERATIONS,
};
use crate::shared::error::WalletError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Key derivation algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum KdfAlgorithm {
    #[default]
    Pbkdf2Sha256,
    Argon2id,
}

impl KdfAlgorithm {
    /// Identifier used in envelopes and configuration
    pub fn id(&self) -> &'static str {
        match self {
            KdfAlgorithm::Pbkdf2Sha256 => "pbkdf2-sha256",
            KdfAlgorithm::Argon2id => "argon2id",
        }
    }

    /// Default cost. For Argon2id this is the time cost (passes), not rounds.
    pub fn default_iterations(&self) -> u32 {
        match self {
            KdfAlgorithm::Pbkdf2Sha256 => DEFAULT_KDF_ITERATIONS,
            KdfAlgorithm::Argon2id => 3,
        }
    }

    /// Lowest cost accepted at all
    pub fn min_iterations(&self) -> u32 {
        match self {
            KdfAlgorithm::Pbkdf2Sha256 => MIN_KDF_ITERATIONS,
            KdfAlgorithm::Argon2id => 1,
        }
    }

    /// Highest cost accepted, including from stored envelopes
    pub fn max_iterations(&self) -> u32 {
        match self {
            KdfAlgorithm::Pbkdf2Sha256 => MAX_KDF_ITERATIONS,
            KdfAlgorithm::Argon2id => MAX_ARGON2_TIME_COST,
        }
    }

    /// Lowest cost the security audit accepts without a warning
    pub fn recommended_min_iterations(&self) -> u32 {
        match self {
            KdfAlgorithm::Pbkdf2Sha256 => RECOMMENDED_MIN_KDF_ITERATIONS,
            KdfAlgorithm::Argon2id => 2,
        }
    }
}

impl fmt::Display for KdfAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for KdfAlgorithm {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pbkdf2-sha256" | "pbkdf2" => Ok(KdfAlgorithm::Pbkdf2Sha256),
            "argon2id" | "argon2" => Ok(KdfAlgorithm::Argon2id),
            other => Err(WalletError::crypto(format!("Unsupported KDF: {}", other))),
        }
    }
}
