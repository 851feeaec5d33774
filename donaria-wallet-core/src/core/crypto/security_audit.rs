//! Security audit and validation module
//!
//! This module provides security auditing for the vault configuration and for
//! stored envelopes.
//!
//! SECURITY: the audit checks:
//! - KDF cost against the recommended floor for the chosen algorithm
//! - Application salt length
//! - Stored envelope cost and parameters against the configuration

use crate::core::crypto::encryption::Envelope;
use crate::infrastructure::config::VaultConfig;
use crate::shared::constants::*;
use crate::shared::error::WalletError;

/// Security audit results
#[derive(Debug, Clone)]
pub struct SecurityAuditResult {
    pub passed: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub recommendations: Vec<String>,
}

impl SecurityAuditResult {
    pub fn new() -> Self {
        Self {
            passed: true,
            warnings: Vec::new(),
            errors: Vec::new(),
            recommendations: Vec::new(),
        }
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
        self.passed = false;
    }

    pub fn add_recommendation(&mut self, recommendation: String) {
        self.recommendations.push(recommendation);
    }
}

impl Default for SecurityAuditResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Security auditor for wallet core operations
pub struct SecurityAuditor;

impl SecurityAuditor {
    /// Audit the effective configuration
    pub fn audit_config(config: &VaultConfig) -> SecurityAuditResult {
        let mut result = SecurityAuditResult::new();

        Self::audit_kdf(config, &mut result);
        Self::audit_salt(config, &mut result);
        Self::audit_session(config, &mut result);

        result
    }

    /// Audit key derivation cost
    fn audit_kdf(config: &VaultConfig, result: &mut SecurityAuditResult) {
        let algorithm = config.kdf.algorithm;

        if let Err(e) = config.kdf.validate() {
            result.add_error(e.to_string());
            return;
        }

        if config.kdf.iterations < algorithm.recommended_min_iterations() {
            result.add_warning(format!(
                "{} cost {} is below the recommended minimum of {}",
                algorithm,
                config.kdf.iterations,
                algorithm.recommended_min_iterations()
            ));
        }

        result.add_recommendation(format!(
            "PIN space is {} digits; keep envelopes out of reach of untrusted readers",
            PIN_LENGTH
        ));
    }

    /// Audit the application salt
    fn audit_salt(config: &VaultConfig, result: &mut SecurityAuditResult) {
        if config.kdf_salt.is_empty() {
            result.add_error("KDF salt is empty".to_string());
        } else if config.kdf_salt.len() < MIN_SALT_LENGTH {
            result.add_error(format!("KDF salt must be at least {} bytes", MIN_SALT_LENGTH));
        }

        if config.kdf_salt != DEFAULT_KDF_SALT {
            result.add_warning(
                "Custom KDF salt in use; vaults sealed under another salt will not unlock".to_string(),
            );
        }
    }

    /// Audit session caching
    fn audit_session(config: &VaultConfig, result: &mut SecurityAuditResult) {
        if config.cache_unlocked {
            result.add_recommendation(
                "Unlocked wallets are cached for the session; call lock() on sign-out".to_string(),
            );
        }
    }

    /// Audit a stored envelope against the current configuration.
    ///
    /// Malformed envelopes are an error. A well-formed envelope sealed with a
    /// weak or outdated cost still opens, so that is reported as a warning.
    pub fn audit_envelope(envelope: &str, config: &VaultConfig) -> Result<SecurityAuditResult, WalletError> {
        let parsed: Envelope = envelope.parse()?;
        let mut result = SecurityAuditResult::new();
        let kdf = parsed.kdf;

        if kdf.iterations < kdf.algorithm.recommended_min_iterations() {
            result.add_warning(format!(
                "Envelope {} cost {} is below the recommended minimum of {}",
                kdf.algorithm,
                kdf.iterations,
                kdf.algorithm.recommended_min_iterations()
            ));
        }

        if kdf != config.kdf || parsed.algorithm != config.cipher {
            result.add_recommendation(format!(
                "Envelope sealed with {} / {} i={}; re-seal to match {} / {} i={}",
                parsed.algorithm, kdf.algorithm, kdf.iterations,
                config.cipher, config.kdf.algorithm, config.kdf.iterations
            ));
        }

        Ok(result)
    }

    /// Generate security report
    pub fn generate_security_report(config: &VaultConfig) -> String {
        let audit_result = Self::audit_config(config);

        let mut report = String::new();
        report.push_str("=== Donaria Wallet Core Security Report ===\n\n");

        if audit_result.passed {
            report.push_str("Security audit PASSED\n\n");
        } else {
            report.push_str("Security audit FAILED\n\n");
        }

        if !audit_result.errors.is_empty() {
            report.push_str("Errors:\n");
            for error in &audit_result.errors {
                report.push_str(&format!("  - {}\n", error));
            }
            report.push('\n');
        }

        if !audit_result.warnings.is_empty() {
            report.push_str("Warnings:\n");
            for warning in &audit_result.warnings {
                report.push_str(&format!("  - {}\n", warning));
            }
            report.push('\n');
        }

        if !audit_result.recommendations.is_empty() {
            report.push_str("Recommendations:\n");
            for recommendation in &audit_result.recommendations {
                report.push_str(&format!("  - {}\n", recommendation));
            }
            report.push('\n');
        }

        report.push_str(&format!(
            "Key derivation: {} ({} iterations)\n",
            config.kdf.algorithm, config.kdf.iterations
        ));
        report.push_str(&format!("Envelope cipher: {}\n", config.cipher));

        report
    }
}
