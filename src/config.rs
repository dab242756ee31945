//! Command line arguments for the geto binary

use clap::Parser;
use std::path::PathBuf;

use crate::error::{GetoError, Result};

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "/etc/geto.ini";

/// geto CLI Arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "geto")]
#[command(version)]
#[command(about = "Validate a geto host inventory configuration file")]
pub struct Args {
    /// Configuration file path
    #[arg(long, default_value = DEFAULT_CONFIG_PATH, env = "GETO_CONFIG_PATH")]
    pub config_path: PathBuf,

    /// Print the validated inventory as JSON (passwords are omitted)
    #[arg(long, default_value = "false")]
    pub json: bool,

    /// Load the shared private key and report its fingerprint
    #[arg(long, default_value = "false", env = "GETO_VERIFY_KEY")]
    pub verify_key: bool,
}

/// Validated settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// Configuration file to parse
    pub config_path: PathBuf,

    /// Emit JSON on stdout
    pub json: bool,

    /// Load the private key after parsing
    pub verify_key: bool,
}

impl Settings {
    /// Create Settings from CLI Args
    pub fn from_args(args: Args) -> Result<Self> {
        if args.config_path.as_os_str().is_empty() {
            return Err(GetoError::config("Missing required --config-path"));
        }

        Ok(Settings {
            config_path: args.config_path,
            json: args.json,
            verify_key: args.verify_key,
        })
    }
}
