//! Wallet vault entities
//!
//! The persisted record, the unlock request and the unlocked outcome.

use crate::core::crypto::keys::SecretSeed;
use crate::shared::types::{OwnerId, PublicIdentity};
use crate::shared::utils::truncate_identity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroizing;

/// Persisted vault for one owner.
///
/// The envelope string is the only stored form of the secret; the public
/// identity is stored in the clear so unlock can cross-check it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletVaultRecord {
    pub owner_id: OwnerId,
    pub public_identity: PublicIdentity,
    pub envelope: String,
    pub created_at: DateTime<Utc>,
}

impl WalletVaultRecord {
    pub fn new(owner_id: impl Into<OwnerId>, public_identity: PublicIdentity, envelope: String) -> Self {
        Self {
            owner_id: owner_id.into(),
            public_identity,
            envelope,
            created_at: Utc::now(),
        }
    }
}

/// Storage state of an owner's vault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultState {
    NonExistent,
    Provisioned,
}

/// Whether the session currently holds an unlocked wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Locked,
    Unlocked,
}

/// A single unlock request. The PIN is zeroized on drop.
pub struct UnlockAttempt {
    pub owner_id: OwnerId,
    supplied_pin: Zeroizing<String>,
}

impl UnlockAttempt {
    pub fn new(owner_id: impl Into<OwnerId>, supplied_pin: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            supplied_pin: Zeroizing::new(supplied_pin.into()),
        }
    }

    pub fn pin(&self) -> &str {
        self.supplied_pin.as_str()
    }
}

impl fmt::Debug for UnlockAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnlockAttempt")
            .field("owner_id", &self.owner_id)
            .field("supplied_pin", &"[REDACTED]")
            .finish()
    }
}

/// Outcome of a successful unlock
// No Clone implementation; share it through an Arc
pub struct UnlockedWallet {
    pub owner_id: OwnerId,
    pub public_identity: PublicIdentity,
    secret: SecretSeed,
}

impl UnlockedWallet {
    pub fn new(owner_id: impl Into<OwnerId>, public_identity: PublicIdentity, secret: SecretSeed) -> Self {
        Self {
            owner_id: owner_id.into(),
            public_identity,
            secret,
        }
    }

    /// Secret key, for signing only
    pub fn secret(&self) -> &SecretSeed {
        &self.secret
    }
}

impl fmt::Debug for UnlockedWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnlockedWallet")
            .field("owner_id", &self.owner_id)
            .field("public_identity", &truncate_identity(&self.public_identity))
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
