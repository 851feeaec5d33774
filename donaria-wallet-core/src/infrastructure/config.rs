//! Runtime configuration
//!
//! Values come from the process environment, with a `.env` file loaded first
//! when present. Missing keys fall back to defaults; malformed ones are
//! configuration errors.

use crate::core::crypto::encryption::EncryptionAlgorithm;
use crate::core::crypto::kdf::{KdfAlgorithm, KdfParams};
use crate::shared::constants::*;
use crate::shared::error::WalletError;
use crate::shared::types::Network;
use crate::shared::WalletResult;
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

pub const ENV_KDF_ALGORITHM: &str = "DONARIA_KDF_ALGORITHM";
pub const ENV_KDF_ITERATIONS: &str = "DONARIA_KDF_ITERATIONS";
pub const ENV_KDF_SALT: &str = "DONARIA_KDF_SALT";
pub const ENV_CIPHER: &str = "DONARIA_CIPHER";
pub const ENV_VAULT_DIR: &str = "DONARIA_VAULT_DIR";
pub const ENV_CACHE_UNLOCKED: &str = "DONARIA_CACHE_UNLOCKED";
pub const ENV_NETWORK: &str = "DONARIA_NETWORK";
pub const ENV_HORIZON_URL: &str = "DONARIA_HORIZON_URL";

/// Effective wallet core configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultConfig {
    pub kdf: KdfParams,
    pub kdf_salt: String,
    pub cipher: EncryptionAlgorithm,
    pub vault_dir: PathBuf,
    pub cache_unlocked: bool,
    pub network: Network,
    pub horizon_url: String,
}

impl VaultConfig {
    /// Load configuration from `.env` and the process environment
    pub fn from_env() -> WalletResult<Self> {
        dotenv().ok(); // Load .env if present
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> WalletResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let kdf_algorithm = match get(ENV_KDF_ALGORITHM) {
            Some(value) => value
                .parse::<KdfAlgorithm>()
                .map_err(|_| WalletError::config(format!("{}: unsupported KDF '{}'", ENV_KDF_ALGORITHM, value)))?,
            None => KdfAlgorithm::default(),
        };

        let iterations = match get(ENV_KDF_ITERATIONS) {
            Some(value) => value
                .parse::<u32>()
                .map_err(|_| WalletError::config(format!("{}: not a number '{}'", ENV_KDF_ITERATIONS, value)))?,
            None => kdf_algorithm.default_iterations(),
        };
        let kdf = KdfParams::new(kdf_algorithm, iterations);
        kdf.validate()
            .map_err(|e| WalletError::config(format!("{}: {}", ENV_KDF_ITERATIONS, e)))?;

        let kdf_salt = get(ENV_KDF_SALT).unwrap_or_else(|| DEFAULT_KDF_SALT.to_string());
        if kdf_salt.len() < MIN_SALT_LENGTH {
            return Err(WalletError::config(format!(
                "{}: salt must be at least {} bytes",
                ENV_KDF_SALT, MIN_SALT_LENGTH
            )));
        }

        let cipher = match get(ENV_CIPHER) {
            Some(value) => value
                .parse::<EncryptionAlgorithm>()
                .map_err(|_| WalletError::config(format!("{}: unsupported cipher '{}'", ENV_CIPHER, value)))?,
            None => EncryptionAlgorithm::default(),
        };

        let vault_dir = get(ENV_VAULT_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(default_vault_dir);

        let cache_unlocked = match get(ENV_CACHE_UNLOCKED) {
            Some(value) => parse_bool(&value)
                .ok_or_else(|| WalletError::config(format!("{}: expected a boolean, got '{}'", ENV_CACHE_UNLOCKED, value)))?,
            None => true,
        };

        let network = match get(ENV_NETWORK) {
            Some(value) => value.parse::<Network>()?,
            None => Network::Testnet,
        };

        let horizon_url = get(ENV_HORIZON_URL)
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| network.horizon_url().to_string());

        Ok(Self {
            kdf,
            kdf_salt,
            cipher,
            vault_dir,
            cache_unlocked,
            network,
            horizon_url,
        })
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        let network = Network::Testnet;
        Self {
            kdf: KdfParams::default(),
            kdf_salt: DEFAULT_KDF_SALT.to_string(),
            cipher: EncryptionAlgorithm::default(),
            vault_dir: default_vault_dir(),
            cache_unlocked: true,
            network,
            horizon_url: network.horizon_url().to_string(),
        }
    }
}

/// `<data dir>/donaria/vaults`, or a relative directory when the platform
/// reports no data dir
pub fn default_vault_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join(VAULT_DIR_NAME)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> WalletResult<VaultConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        VaultConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = load(&[]).expect("Failed to load config");
        assert_eq!(config, VaultConfig::default());
        assert_eq!(config.kdf.algorithm, KdfAlgorithm::Pbkdf2Sha256);
        assert_eq!(config.kdf.iterations, DEFAULT_KDF_ITERATIONS);
        assert_eq!(config.kdf_salt, "stellar-wallet-v1");
        assert!(config.cache_unlocked);
        assert!(config.vault_dir.ends_with("donaria/vaults"));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            (ENV_KDF_ALGORITHM, "argon2id"),
            (ENV_KDF_ITERATIONS, "4"),
            (ENV_KDF_SALT, "custom-salt-value"),
            (ENV_CIPHER, "chacha20poly1305"),
            (ENV_VAULT_DIR, "/tmp/donaria-test"),
            (ENV_CACHE_UNLOCKED, "false"),
            (ENV_NETWORK, "public"),
        ])
        .expect("Failed to load config");

        assert_eq!(config.kdf, KdfParams::new(KdfAlgorithm::Argon2id, 4));
        assert_eq!(config.kdf_salt, "custom-salt-value");
        assert_eq!(config.cipher, EncryptionAlgorithm::ChaCha20Poly1305);
        assert_eq!(config.vault_dir, PathBuf::from("/tmp/donaria-test"));
        assert!(!config.cache_unlocked);
        assert_eq!(config.network, Network::Public);
        assert_eq!(config.horizon_url, Network::Public.horizon_url());
    }

    #[test]
    fn test_iterations_default_follows_algorithm() {
        let config = load(&[(ENV_KDF_ALGORITHM, "argon2id")]).expect("Failed to load config");
        assert_eq!(config.kdf.iterations, KdfAlgorithm::Argon2id.default_iterations());
    }

    #[test]
    fn test_horizon_url_override_strips_trailing_slash() {
        let config = load(&[(ENV_HORIZON_URL, "http://localhost:8000/")]).expect("Failed to load config");
        assert_eq!(config.horizon_url, "http://localhost:8000");
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = load(&[(ENV_KDF_ITERATIONS, "  "), (ENV_CIPHER, "")]).expect("Failed to load config");
        assert_eq!(config.kdf.iterations, DEFAULT_KDF_ITERATIONS);
        assert_eq!(config.cipher, EncryptionAlgorithm::AES256GCM);
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        for pairs in [
            vec![(ENV_KDF_ALGORITHM, "md5")],
            vec![(ENV_KDF_ITERATIONS, "lots")],
            vec![(ENV_KDF_ITERATIONS, "10")],
            vec![(ENV_KDF_SALT, "short")],
            vec![(ENV_CIPHER, "rot13")],
            vec![(ENV_CACHE_UNLOCKED, "maybe")],
            vec![(ENV_NETWORK, "futurenet")],
        ] {
            let result = load(&pairs);
            assert!(matches!(result, Err(WalletError::Config(_))), "expected config error for {:?}", pairs);
        }
    }
}
