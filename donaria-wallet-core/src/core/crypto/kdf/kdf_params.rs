use super::KdfAlgorithm;
use crate::shared::error::WalletError;
use crate::shared::WalletResult;
use serde::{Deserialize, Serialize};

/// Key derivation parameters, recorded in every envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    pub algorithm: KdfAlgorithm,
    pub iterations: u32,
}

impl KdfParams {
    pub fn new(algorithm: KdfAlgorithm, iterations: u32) -> Self {
        Self { algorithm, iterations }
    }

    /// Parameters with the algorithm's default cost
    pub fn for_algorithm(algorithm: KdfAlgorithm) -> Self {
        Self::new(algorithm, algorithm.default_iterations())
    }

    pub fn validate(&self) -> WalletResult<()> {
        if self.iterations < self.algorithm.min_iterations() {
            return Err(WalletError::crypto(format!(
                "{} requires at least {} iterations, got {}",
                self.algorithm,
                self.algorithm.min_iterations(),
                self.iterations
            )));
        }
        if self.iterations > self.algorithm.max_iterations() {
            return Err(WalletError::crypto(format!(
                "{} allows at most {} iterations, got {}",
                self.algorithm,
                self.algorithm.max_iterations(),
                self.iterations
            )));
        }
        Ok(())
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::for_algorithm(KdfAlgorithm::default())
    }
}
