use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Basic types for vault operations
pub type OwnerId = String;
pub type PublicIdentity = String;
pub type TransactionHash = String;
pub type Amount = String;
pub type Balance = String;

// Stellar networks - testnet for development, public for production
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Network {
    Testnet,
    Public,
}

impl Network {
    pub fn passphrase(&self) -> &'static str {
        match self {
            Network::Testnet => "Test SDF Network ; September 2015",
            Network::Public => "Public Global Stellar Network ; September 2015",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Network::Testnet => "testnet",
            Network::Public => "public",
        }
    }

    pub fn horizon_url(&self) -> &'static str {
        match self {
            Network::Testnet => "https://horizon-testnet.stellar.org",
            Network::Public => "https://horizon.stellar.org",
        }
    }

    /// Friendbot only exists on testnet
    pub fn friendbot_url(&self) -> Option<&'static str> {
        match self {
            Network::Testnet => Some("https://friendbot.stellar.org"),
            Network::Public => None,
        }
    }

    pub fn explorer_url(&self) -> &'static str {
        match self {
            Network::Testnet => "https://stellarexpert.io/explorer/testnet",
            Network::Public => "https://stellarexpert.io/explorer/public",
        }
    }

    pub fn account_url(&self, public_identity: &str) -> String {
        format!("{}/account/{}", self.explorer_url(), public_identity)
    }

    pub fn transaction_url(&self, hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url(), hash)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = crate::shared::error::WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "testnet" | "test" => Ok(Network::Testnet),
            "public" | "mainnet" | "pubnet" => Ok(Network::Public),
            other => Err(crate::shared::error::WalletError::config(format!(
                "Unknown network: {}",
                other
            ))),
        }
    }
}

/// Native XLM payment handed to the ledger collaborator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentRequest {
    pub destination: PublicIdentity,
    pub amount: Amount,
    pub memo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub hash: TransactionHash,
    pub ledger: Option<u32>,
    pub successful: bool,
}

/// Account state as reported by Horizon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountInfo {
    pub public_identity: PublicIdentity,
    pub exists: bool,
    pub balance: Balance,
    pub sequence: String,
    pub subentry_count: u32,
}

impl AccountInfo {
    /// Placeholder for an account the ledger has not seen yet
    pub fn unfunded(public_identity: &str) -> Self {
        Self {
            public_identity: public_identity.to_string(),
            exists: false,
            balance: "0".to_string(),
            sequence: "0".to_string(),
            subentry_count: 0,
        }
    }
}

// Result types for better error handling
pub type WalletResult<T> = Result<T, crate::shared::error::WalletError>;
