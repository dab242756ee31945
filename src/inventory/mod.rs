//! Host inventory module
//!
//! Turns a configuration file into a validated [`Inventory`] and keeps the
//! current one available to the rest of the process.

pub mod keys;
pub mod parse;
pub mod store;
pub mod types;

// Re-exports
pub use keys::{fingerprint, load_private_key};
pub use store::{get_config, parse_config, ConfigStore};
pub use types::{Credential, Host, Inventory};
