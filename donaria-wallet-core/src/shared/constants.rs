//! Constants used throughout the wallet core

/// Number of digits in a wallet PIN
pub const PIN_LENGTH: usize = 4;

/// Application-wide, non-secret KDF salt
pub const DEFAULT_KDF_SALT: &str = "stellar-wallet-v1";

/// Default PBKDF2 iteration count
pub const DEFAULT_KDF_ITERATIONS: u32 = 100_000;

/// Iteration count below which the security audit warns
pub const RECOMMENDED_MIN_KDF_ITERATIONS: u32 = 10_000;

/// Hard floor accepted by the configuration loader
pub const MIN_KDF_ITERATIONS: u32 = 1_000;

/// Hard ceiling for PBKDF2; envelopes asking for more are rejected unopened
pub const MAX_KDF_ITERATIONS: u32 = 1_000_000;

/// Hard ceiling for the Argon2id time cost
pub const MAX_ARGON2_TIME_COST: u32 = 10;

/// Minimum salt length (Argon2 rejects shorter salts)
pub const MIN_SALT_LENGTH: usize = 8;

/// Argon2id memory cost in KiB when selected as the KDF
pub const ARGON2_MEMORY_COST_KIB: u32 = 19_456;

/// Argon2id lanes
pub const ARGON2_PARALLELISM: u32 = 1;

/// Derived key size in bytes (256 bits)
pub const DERIVED_KEY_SIZE: usize = 32;

/// AEAD nonce size for both supported ciphers
pub const NONCE_SIZE: usize = 12;

/// AEAD authentication tag size
pub const TAG_SIZE: usize = 16;

/// Envelope format version tag
pub const ENVELOPE_VERSION: &str = "dwv1";

/// ed25519 seed length
pub const SECRET_SEED_SIZE: usize = 32;

/// Characters of a public identity kept in log output
pub const LOG_IDENTITY_PREFIX: usize = 8;

/// Maximum Stellar text memo length in bytes
pub const MAX_MEMO_BYTES: usize = 28;

/// Maximum fractional digits of a Stellar amount
pub const MAX_AMOUNT_DECIMALS: usize = 7;

/// Directory name under the platform data dir
pub const APP_DIR_NAME: &str = "donaria";

/// Vault subdirectory
pub const VAULT_DIR_NAME: &str = "vaults";

/// HTTP timeout for Horizon calls, in seconds
pub const HTTP_TIMEOUT_SECS: u64 = 30;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kdf_constants_are_consistent() {
        assert!(MIN_KDF_ITERATIONS < RECOMMENDED_MIN_KDF_ITERATIONS);
        assert!(RECOMMENDED_MIN_KDF_ITERATIONS <= DEFAULT_KDF_ITERATIONS);
        assert!(DEFAULT_KDF_ITERATIONS <= MAX_KDF_ITERATIONS);
        assert!(DEFAULT_KDF_SALT.len() >= MIN_SALT_LENGTH);
        assert_eq!(DERIVED_KEY_SIZE * 8, 256);
    }
}
