//! Inventory types
//!
//! Hosts, the assembled inventory, and credential resolution.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Credential a host authenticates with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential<'a> {
    /// The host's own password
    Password(&'a str),

    /// The inventory-wide private key
    PrivateKey(&'a Path),

    /// Neither is available
    Unset,
}

/// A remote host from the `[hosts]` section
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Host {
    /// Key name within `[hosts]`
    pub name: String,

    /// Connection target
    pub address: String,

    /// Username for authentication
    pub username: String,

    /// Password for password authentication
    #[serde(skip_serializing)]
    pub password: Option<String>,

    /// Whether a password was configured for this host
    pub has_valid_password: bool,
}

impl Host {
    /// Create a host with no password
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            username: username.into(),
            password: None,
            has_valid_password: false,
        }
    }

    /// Set password authentication
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self.has_valid_password = true;
        self
    }

    /// Resolve the credential to authenticate with
    ///
    /// The host's own password is preferred over the shared private key.
    pub fn credential<'a>(&'a self, private_key_path: Option<&'a Path>) -> Credential<'a> {
        match (self.password.as_deref(), private_key_path) {
            (Some(password), _) if self.has_valid_password => Credential::Password(password),
            (_, Some(key)) => Credential::PrivateKey(key),
            _ => Credential::Unset,
        }
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("name", &self.name)
            .field("address", &self.address)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("has_valid_password", &self.has_valid_password)
            .finish()
    }
}

/// Validated host inventory
///
/// The default value is the zeroed inventory handed out before any
/// successful parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Inventory {
    /// Source file, set only on a successful parse
    pub file_path: Option<PathBuf>,

    /// Private key shared by every host without a password
    pub private_key_path: Option<PathBuf>,

    /// Hosts in `[hosts]` order
    pub hosts: Vec<Host>,
}

impl Inventory {
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// Look up a host by name
    pub fn host(&self, name: &str) -> Option<&Host> {
        self.hosts.iter().find(|h| h.name == name)
    }

    /// Resolve the credential for one of this inventory's hosts
    pub fn credential_for<'a>(&'a self, host: &'a Host) -> Credential<'a> {
        host.credential(self.private_key_path.as_deref())
    }
}
