use donaria_wallet_core::core::crypto::security_audit::SecurityAuditor;
use donaria_wallet_core::VaultConfig;
use std::process::ExitCode;

fn main() -> ExitCode {
    let _ = env_logger::try_init();

    let config = match VaultConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Donaria Wallet Core Configuration:\n");
    println!("  Network: {}", config.network);
    println!("  Horizon URL: {}", config.horizon_url);
    println!("  Friendbot URL: {}", config.network.friendbot_url().unwrap_or("(not available)"));
    println!("  Explorer URL: {}", config.network.explorer_url());
    println!("  Vault directory: {}", config.vault_dir.display());
    println!("  KDF: {} ({} iterations)", config.kdf.algorithm, config.kdf.iterations);
    println!("  KDF salt: {}", config.kdf_salt);
    println!("  Envelope cipher: {}", config.cipher);
    println!("  Cache unlocked wallet: {}", config.cache_unlocked);
    println!();
    print!("{}", SecurityAuditor::generate_security_report(&config));

    ExitCode::SUCCESS
}
