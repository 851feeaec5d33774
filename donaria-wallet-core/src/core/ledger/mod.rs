//! Ledger collaborators
//!
//! `LedgerClient` is the seam to whatever builds and submits Stellar
//! transactions. `HorizonClient` covers the read-only Horizon calls the wallet
//! needs (account state, testnet funding) and never sees a secret.

use crate::core::crypto::keys::KeyManager;
use crate::domain::entities::UnlockedWallet;
use crate::shared::constants::HTTP_TIMEOUT_SECS;
use crate::shared::error::WalletError;
use crate::shared::types::{AccountInfo, Network, PaymentRequest, TransactionReceipt};
use crate::shared::utils::{truncate_identity, validate_amount, validate_memo};
use crate::shared::WalletResult;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Submits signed payments to the ledger. Failures are `Action` errors.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn submit_payment(
        &self,
        signer: &UnlockedWallet,
        payment: &PaymentRequest,
    ) -> Result<TransactionReceipt, WalletError>;
}

impl PaymentRequest {
    pub fn new(destination: impl Into<String>, amount: impl Into<String>, memo: Option<String>) -> Self {
        Self {
            destination: destination.into(),
            amount: amount.into(),
            memo,
        }
    }

    pub fn validate(&self) -> Result<(), WalletError> {
        if !KeyManager::new().validate_public_identity(&self.destination) {
            return Err(WalletError::validation("Invalid destination account"));
        }
        validate_amount(&self.amount)?;
        if let Some(memo) = &self.memo {
            validate_memo(memo)?;
        }
        Ok(())
    }
}

/// Read-only Horizon client
pub struct HorizonClient {
    client: Client,
    base_url: String,
    network: Network,
}

impl HorizonClient {
    pub fn new(network: Network) -> WalletResult<Self> {
        Self::with_base_url(network, network.horizon_url())
    }

    pub fn with_base_url(network: Network, base_url: impl Into<String>) -> WalletResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            network,
        })
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Load account state. An account Horizon does not know is reported as
    /// unfunded rather than as an error.
    pub async fn account_info(&self, public_identity: &str) -> WalletResult<AccountInfo> {
        if !KeyManager::new().validate_public_identity(public_identity) {
            return Err(WalletError::validation("Invalid public identity"));
        }

        let url = format!("{}/accounts/{}", self.base_url, public_identity);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WalletError::network(format!("Failed to load account: {}", e)))?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                log::info!("Account not yet funded: {}", truncate_identity(public_identity));
                Ok(AccountInfo::unfunded(public_identity))
            }
            status if status.is_success() => {
                let body: Value = response
                    .json()
                    .await
                    .map_err(|e| WalletError::network(format!("Invalid account response: {}", e)))?;
                parse_account_response(public_identity, &body)
            }
            status => Err(WalletError::network(format!("Horizon returned {} for account lookup", status))),
        }
    }

    /// Fund a testnet account through friendbot
    pub async fn fund_testnet_account(&self, public_identity: &str) -> WalletResult<()> {
        let friendbot = self
            .network
            .friendbot_url()
            .ok_or_else(|| WalletError::config(format!("Friendbot is not available on {}", self.network)))?;
        if !KeyManager::new().validate_public_identity(public_identity) {
            return Err(WalletError::validation("Invalid public identity"));
        }

        let response = self
            .client
            .get(friendbot)
            .query(&[("addr", public_identity)])
            .send()
            .await
            .map_err(|e| WalletError::network(format!("Friendbot request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(WalletError::network(format!("Friendbot returned {}", response.status())));
        }

        log::info!("Funded testnet account {}", truncate_identity(public_identity));
        Ok(())
    }
}

/// Extract the fields the wallet uses from a Horizon account document
pub fn parse_account_response(public_identity: &str, body: &Value) -> WalletResult<AccountInfo> {
    let balance = body
        .get("balances")
        .and_then(Value::as_array)
        .and_then(|balances| {
            balances
                .iter()
                .find(|b| b.get("asset_type").and_then(Value::as_str) == Some("native"))
        })
        .and_then(|native| native.get("balance"))
        .and_then(Value::as_str)
        .unwrap_or("0")
        .to_string();

    let sequence = body
        .get("sequence")
        .and_then(Value::as_str)
        .ok_or_else(|| WalletError::network("Missing sequence in account response"))?
        .to_string();

    let subentry_count = body
        .get("subentry_count")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    let subentry_count = u32::try_from(subentry_count)
        .map_err(|_| WalletError::network(format!("Horizon subentry_count out of range: {}", subentry_count)))?;

    Ok(AccountInfo {
        public_identity: public_identity.to_string(),
        exists: true,
        balance,
        sequence,
        subentry_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_account_response() {
        let body = json!({
            "id": "GABC",
            "sequence": "4294967296",
            "subentry_count": 2,
            "balances": [
                { "asset_type": "credit_alphanum4", "asset_code": "USDC", "balance": "12.0000000" },
                { "asset_type": "native", "balance": "9999.9999900" }
            ]
        });

        let info = parse_account_response("GABC", &body).expect("Failed to parse account");
        assert!(info.exists);
        assert_eq!(info.balance, "9999.9999900");
        assert_eq!(info.sequence, "4294967296");
        assert_eq!(info.subentry_count, 2);
    }

    #[test]
    fn test_parse_account_without_native_balance() {
        let body = json!({ "sequence": "1", "balances": [] });
        let info = parse_account_response("GABC", &body).expect("Failed to parse account");
        assert_eq!(info.balance, "0");
        assert_eq!(info.subentry_count, 0);
    }

    #[test]
    fn test_parse_account_missing_sequence() {
        let body = json!({ "balances": [] });
        assert!(matches!(parse_account_response("GABC", &body), Err(WalletError::Network(_))));
    }

    #[test]
    fn test_parse_account_subentry_count_out_of_range() {
        let body = json!({
            "sequence": "1",
            "subentry_count": u64::from(u32::MAX) + 1,
            "balances": [{ "asset_type": "native", "balance": "1.0000000" }]
        });
        assert!(matches!(parse_account_response("GABC", &body), Err(WalletError::Network(_))));
    }

    #[test]
    fn test_payment_request_validation() {
        let (_, destination) = KeyManager::new().generate_keypair();

        assert!(PaymentRequest::new(destination.clone(), "10.5", None).validate().is_ok());
        assert!(PaymentRequest::new(destination.clone(), "1", Some("Flood relief".to_string())).validate().is_ok());

        assert!(PaymentRequest::new("GNOTANACCOUNT", "10", None).validate().is_err());
        assert!(PaymentRequest::new(destination.clone(), "0", None).validate().is_err());
        assert!(PaymentRequest::new(destination.clone(), "1.12345678", None).validate().is_err());
        assert!(PaymentRequest::new(destination, "1", Some("x".repeat(29))).validate().is_err());
    }

    #[test]
    fn test_horizon_client_urls() {
        let client = HorizonClient::with_base_url(Network::Testnet, "http://localhost:8000/")
            .expect("Failed to build client");
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.network(), Network::Testnet);

        let public = HorizonClient::new(Network::Public).expect("Failed to build client");
        assert_eq!(public.base_url(), Network::Public.horizon_url().trim_end_matches('/'));
    }

    #[tokio::test]
    async fn test_account_info_rejects_bad_identity_before_network() {
        let client = HorizonClient::with_base_url(Network::Testnet, "http://127.0.0.1:9")
            .expect("Failed to build client");
        assert!(matches!(client.account_info("not-an-account").await, Err(WalletError::Validation(_))));
    }

    #[tokio::test]
    async fn test_friendbot_unavailable_on_public() {
        let client = HorizonClient::new(Network::Public).expect("Failed to build client");
        let (_, identity) = KeyManager::new().generate_keypair();
        assert!(matches!(client.fund_testnet_account(&identity).await, Err(WalletError::Config(_))));
    }
}
