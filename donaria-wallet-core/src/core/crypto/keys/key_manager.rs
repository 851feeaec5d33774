//! Key generation and management
//!
//! This module contains keypair generation, public identity derivation and
//! message signing for Stellar ed25519 keys.

use super::SecretSeed;
use crate::shared::error::WalletError;
use crate::shared::types::PublicIdentity;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};

/// Key manager for cryptographic key operations
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyManager;

impl KeyManager {
    pub fn new() -> Self {
        Self
    }

    /// Generate a new keypair
    pub fn generate_keypair(&self) -> (SecretSeed, PublicIdentity) {
        let seed = SecretSeed::generate();
        let public_identity = seed.public_identity();
        (seed, public_identity)
    }

    /// Public identity for a strkey-encoded secret
    pub fn public_identity_of(&self, secret: &str) -> Result<PublicIdentity, WalletError> {
        Ok(SecretSeed::from_strkey(secret)?.public_identity())
    }

    /// Check that a string is a well-formed public identity (`G...`)
    pub fn validate_public_identity(&self, public_identity: &str) -> bool {
        stellar_strkey::ed25519::PublicKey::from_string(public_identity).is_ok()
    }

    /// Sign a message; returns the hex-encoded signature
    pub fn sign_message(&self, seed: &SecretSeed, message: &str) -> String {
        hex::encode(seed.sign(message.as_bytes()).to_bytes())
    }

    /// Verify a hex signature produced by `sign_message`
    pub fn verify_message(&self, public_identity: &str, message: &str, signature: &str) -> Result<bool, WalletError> {
        let public_key = stellar_strkey::ed25519::PublicKey::from_string(public_identity)
            .map_err(|_| WalletError::validation("Invalid public identity"))?;
        let verifying_key = VerifyingKey::from_bytes(&public_key.0)
            .map_err(|e| WalletError::crypto(format!("Invalid public key: {}", e)))?;

        let signature_bytes = hex::decode(signature)?;
        let signature = Signature::from_slice(&signature_bytes)
            .map_err(|e| WalletError::validation(format!("Invalid signature: {}", e)))?;

        Ok(verifying_key.verify(message.as_bytes(), &signature).is_ok())
    }
}
