//! geto - host inventory configuration for a remote command dispatcher
//!
//! This crate reads an INI style configuration file describing remote hosts
//! and their credentials, and turns it into a validated [`Inventory`]. Each
//! host authenticates with its own password or, failing that, with the single
//! private key shared by the whole inventory.
//!
//! # Configuration file
//!
//! ```ini
//! [geto]
//! privkey_path = /home/geto/.ssh/id_ed25519
//!
//! [hosts]
//! web01 = 192.168.1.10
//! db01 = 192.168.1.20
//!
//! [web01]
//! username = deploy
//! password = secret
//!
//! [db01]
//! username = postgres
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! let inventory = geto::parse_config("/etc/geto.ini")?;
//! for host in &inventory.hosts {
//!     println!("{}@{}", host.username, host.address);
//! }
//! # Ok::<(), geto::GetoError>(())
//! ```
//!
//! Callers that do not want process-wide state can use
//! [`Inventory::from_path`] or their own [`ConfigStore`].

pub mod config;
pub mod error;
pub mod ini;
pub mod inventory;

// Re-exports for convenience
pub use config::{Args, Settings};
pub use error::{GetoError, Result};
pub use ini::{IniFile, SectionReader};
pub use inventory::{get_config, parse_config, ConfigStore, Credential, Host, Inventory};
