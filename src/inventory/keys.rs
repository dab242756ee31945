//! Private key loading
//!
//! Parsing only records `privkey_path`; the dispatcher loads the key through
//! here when it is about to authenticate.

use std::path::Path;

use ssh_key::{HashAlg, PrivateKey};

use super::types::Inventory;
use crate::error::{GetoError, Result};

impl Inventory {
    /// Load the shared private key, if one is configured
    pub fn load_private_key(&self) -> Result<Option<PrivateKey>> {
        match self.private_key_path.as_deref() {
            Some(path) => load_private_key(path).map(Some),
            None => Ok(None),
        }
    }
}

/// Read an OpenSSH private key file
pub fn load_private_key(path: &Path) -> Result<PrivateKey> {
    PrivateKey::read_openssh_file(path).map_err(|e| {
        GetoError::ssh_key(format!(
            "Failed to read private key {}: {}",
            path.display(),
            e
        ))
    })
}

/// SHA-256 fingerprint of a private key's public half
pub fn fingerprint(key: &PrivateKey) -> String {
    key.public_key().fingerprint(HashAlg::Sha256).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    #[test]
    fn test_no_key_configured() {
        let inventory = Inventory::default();
        assert!(inventory.load_private_key().unwrap().is_none());
    }

    #[test]
    fn test_missing_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let inventory = Inventory {
            private_key_path: Some(dir.path().join("id_ed25519")),
            ..Inventory::default()
        };

        let err = inventory.load_private_key().unwrap_err();
        assert!(matches!(err, GetoError::SshKey(_)));
    }

    #[test]
    fn test_invalid_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let path: PathBuf = dir.path().join("id_rsa");
        fs::write(&path, "not a key\n").unwrap();

        match load_private_key(&path) {
            Err(GetoError::SshKey(msg)) => assert!(msg.contains("id_rsa")),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }
}
