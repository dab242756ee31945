//! geto - Entry point
//!
//! Parses CLI arguments, loads and validates the host inventory, and reports
//! it. Exits non-zero when the configuration is unusable.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use geto::config::{Args, Settings};
use geto::inventory::{self, Credential};

fn main() -> Result<()> {
    // Logs go to stderr so --json output stays clean on stdout
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let settings = Settings::from_args(args)?;

    info!("geto v{} starting...", env!("CARGO_PKG_VERSION"));

    let inventory = inventory::parse_config(&settings.config_path).with_context(|| {
        format!(
            "Failed to load configuration from {}",
            settings.config_path.display()
        )
    })?;

    for host in &inventory.hosts {
        let auth = match inventory.credential_for(host) {
            Credential::Password(_) => "password",
            Credential::PrivateKey(_) => "private key",
            Credential::Unset => "none",
        };
        info!(
            "Host {}: {}@{} (auth: {})",
            host.name, host.username, host.address, auth
        );
    }

    if settings.verify_key {
        match inventory.load_private_key()? {
            Some(key) => info!("Private key fingerprint: {}", inventory::fingerprint(&key)),
            None => warn!("No privkey_path configured, nothing to verify"),
        }
    }

    if settings.json {
        let json = serde_json::to_string_pretty(inventory.as_ref())
            .context("Failed to serialize inventory")?;
        println!("{}", json);
    }

    Ok(())
}
