//! Inventory parsing and credential validation
//!
//! A parse is all-or-nothing: the first structural problem aborts it and no
//! partial inventory is returned.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, error, info};

use super::types::{Host, Inventory};
use crate::error::{GetoError, Result};
use crate::ini::{IniFile, SectionReader};

/// Section holding global settings
pub const GLOBAL_SECTION: &str = "geto";

/// Optional private key shared by all hosts
pub const PRIVKEY_PATH_KEY: &str = "privkey_path";

/// Section mapping host names to addresses
pub const HOSTS_SECTION: &str = "hosts";

pub const USERNAME_KEY: &str = "username";
pub const PASSWORD_KEY: &str = "password";

/// A configuration with fewer hosts is never valid
pub const MIN_REQUIRED_HOSTS: usize = 1;

impl Inventory {
    /// Parse and validate the configuration file at `path`
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        ensure_file_exists(path)?;

        info!("Parsing configuration file: {}", path.display());

        let ini = IniFile::from_file(path).map_err(|e| {
            error!("Failed to parse config file {}: {}", path.display(), e);
            e
        })?;

        Self::from_reader(&ini, path)
    }

    /// Validate already-read configuration data
    ///
    /// `path` is recorded as the inventory's source on success.
    pub fn from_reader<R>(reader: &R, path: &Path) -> Result<Self>
    where
        R: SectionReader + ?Sized,
    {
        match assemble(reader) {
            Ok(mut inventory) => {
                inventory.file_path = Some(path.to_path_buf());
                info!(
                    "Loaded {} host(s) from {}",
                    inventory.hosts.len(),
                    path.display()
                );
                Ok(inventory)
            }
            Err(e) => {
                error!("Invalid configuration in {}: {}", path.display(), e);
                Err(e)
            }
        }
    }
}

/// Confirm `path` names an existing regular file
fn ensure_file_exists(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        error!("No configuration file: empty path");
        return Err(GetoError::not_found(path));
    }

    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => {
            error!("Configuration path is not a file: {}", path.display());
            Err(GetoError::not_found(path))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            error!("No configuration file: {}", path.display());
            Err(GetoError::not_found(path))
        }
        Err(e) => {
            error!("Failed to stat {}: {}", path.display(), e);
            Err(GetoError::Io(e))
        }
    }
}

fn assemble<R>(reader: &R) -> Result<Inventory>
where
    R: SectionReader + ?Sized,
{
    let mut inventory = Inventory::default();

    if let Some(path) = reader.value(GLOBAL_SECTION, PRIVKEY_PATH_KEY) {
        debug!("Using private key {}", path);
        inventory.private_key_path = Some(path.into());
    }
    let has_private_key = inventory.private_key_path.is_some();

    let names = reader
        .require_keys(HOSTS_SECTION)
        .map_err(|_| GetoError::MissingHostsSection)?;
    if names.len() < MIN_REQUIRED_HOSTS {
        return Err(GetoError::NoHostsConfigured);
    }

    for name in names {
        inventory
            .hosts
            .push(read_host(reader, name, has_private_key)?);
    }

    Ok(inventory)
}

fn read_host<R>(reader: &R, name: &str, has_private_key: bool) -> Result<Host>
where
    R: SectionReader + ?Sized,
{
    let host = || name.to_string();

    let address = reader
        .require(HOSTS_SECTION, name)
        .map_err(|_| GetoError::MissingAddress { host: host() })?;

    reader
        .require_keys(name)
        .map_err(|_| GetoError::MissingHostSection { host: host() })?;

    let username = reader
        .require(name, USERNAME_KEY)
        .map_err(|_| GetoError::MissingUsername { host: host() })?;

    let mut parsed = Host::new(name, address, username);
    match reader.value(name, PASSWORD_KEY) {
        Some(password) => parsed = parsed.with_password(password),
        // The host falls back to the shared private key
        None if has_private_key => {}
        None => return Err(GetoError::MissingCredential { host: host() }),
    }

    debug!(
        "Host {} -> {}@{} (password: {})",
        parsed.name, parsed.username, parsed.address, parsed.has_valid_password
    );

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(content: &str) -> Result<Inventory> {
        let ini = IniFile::parse(content).unwrap();
        Inventory::from_reader(&ini, Path::new("/etc/geto.ini"))
    }

    #[test]
    fn test_password_hosts_in_order() {
        let inv = parse(
            r#"
[hosts]
web02 = 192.168.1.2
web01 = 192.168.1.1

[web01]
username = deploy
password = one

[web02]
username = admin
password = two
"#,
        )
        .unwrap();

        assert_eq!(inv.file_path, Some(PathBuf::from("/etc/geto.ini")));
        assert_eq!(inv.private_key_path, None);
        let names: Vec<&str> = inv.hosts.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["web02", "web01"]);
        assert_eq!(inv.hosts[0].address, "192.168.1.2");
        assert_eq!(inv.hosts[0].username, "admin");
        assert_eq!(inv.hosts[0].password.as_deref(), Some("two"));
        assert!(inv.hosts[1].has_valid_password);
    }

    #[test]
    fn test_missing_password_without_key() {
        let err = parse("[hosts]\na = 1.2.3.4\n\n[a]\nusername = bob\n").unwrap_err();
        match err {
            GetoError::MissingCredential { host } => assert_eq!(host, "a"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_password_with_key() {
        let inv = parse(
            "[geto]\nprivkey_path = /k\n\n[hosts]\na = 1.2.3.4\n\n[a]\nusername = bob\n",
        )
        .unwrap();

        assert_eq!(inv.private_key_path, Some(PathBuf::from("/k")));
        assert_eq!(inv.hosts, vec![Host::new("a", "1.2.3.4", "bob")]);
        assert!(!inv.hosts[0].has_valid_password);
    }

    #[test]
    fn test_mixed_credentials() {
        let inv = parse(
            r#"
[geto]
privkey_path = /home/geto/.ssh/id_ed25519

[hosts]
a = 10.0.0.1
b = 10.0.0.2

[a]
username = root
password = pw

[b]
username = root
"#,
        )
        .unwrap();

        assert!(inv.hosts[0].has_valid_password);
        assert!(!inv.hosts[1].has_valid_password);
    }

    #[test]
    fn test_missing_hosts_section() {
        let err = parse("[geto]\nprivkey_path = /k\n").unwrap_err();
        assert!(matches!(err, GetoError::MissingHostsSection));
    }

    #[test]
    fn test_empty_hosts_section() {
        let err = parse("[geto]\nprivkey_path = /k\n\n[hosts]\n").unwrap_err();
        assert!(matches!(err, GetoError::NoHostsConfigured));
    }

    #[test]
    fn test_missing_host_section() {
        let err = parse("[hosts]\na = 1.2.3.4\n").unwrap_err();
        match err {
            GetoError::MissingHostSection { host } => assert_eq!(host, "a"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_username_fails_whole_parse() {
        let err = parse(
            r#"
[hosts]
good = 10.0.0.1
bad = 10.0.0.2

[good]
username = root
password = pw

[bad]
password = pw
"#,
        )
        .unwrap_err();

        match err {
            GetoError::MissingUsername { host } => assert_eq!(host, "bad"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_first_failure_wins() {
        // Both hosts are broken; the first listed is reported
        let err = parse("[hosts]\nx = 1\ny = 2\n\n[y]\nusername = u\npassword = p\n")
            .unwrap_err();
        assert!(matches!(err, GetoError::MissingHostSection { ref host } if host == "x"));
    }

    #[test]
    fn test_empty_password_counts_as_present() {
        let inv = parse("[hosts]\na = 1.2.3.4\n\n[a]\nusername = bob\npassword =\n").unwrap();
        assert!(inv.hosts[0].has_valid_password);
        assert_eq!(inv.hosts[0].password.as_deref(), Some(""));
    }

    #[test]
    fn test_default_section_supplies_username() {
        let inv = parse(
            "[DEFAULT]\nusername = ops\n\n[hosts]\na = 1.2.3.4\n\n[a]\npassword = pw\n",
        )
        .unwrap();
        assert_eq!(inv.hosts[0].username, "ops");
    }

    #[test]
    fn test_commented_sample_file() {
        let inv = parse(
            r#"
[geto]
privkey_path = /k            ; optional

[hosts]
a = 1.2.3.4                  ; one or more
b = 1.2.3.5

[a]                          ; one such section per host listed above
username = bob               ; required
password = pw                ; optional

[b]
username = alice             # required
"#,
        )
        .unwrap();

        assert_eq!(inv.private_key_path, Some(PathBuf::from("/k")));
        assert_eq!(inv.hosts[0].address, "1.2.3.4");
        assert_eq!(inv.hosts[0].username, "bob");
        assert_eq!(inv.hosts[0].password.as_deref(), Some("pw"));
        assert_eq!(inv.hosts[1], Host::new("b", "1.2.3.5", "alice"));
    }

    #[test]
    fn test_indented_host_options() {
        let inv =
            parse("[hosts]\na = 1.2.3.4\n[a]\n  username = bob\n  password = pw\n").unwrap();
        assert_eq!(inv.hosts[0].username, "bob");
        assert_eq!(inv.hosts[0].password.as_deref(), Some("pw"));
    }

    /// Reader missing the address for a listed key
    struct ListingOnly;

    impl SectionReader for ListingOnly {
        fn value(&self, _section: &str, _key: &str) -> Option<&str> {
            None
        }

        fn keys(&self, section: &str) -> Option<Vec<&str>> {
            (section == HOSTS_SECTION).then(|| vec!["ghost"])
        }
    }

    #[test]
    fn test_missing_address() {
        let err = Inventory::from_reader(&ListingOnly, Path::new("/x")).unwrap_err();
        match err {
            GetoError::MissingAddress { host } => assert_eq!(host, "ghost"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_from_path_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.ini");

        match Inventory::from_path(&path) {
            Err(GetoError::NotFound { path: p }) => assert_eq!(p, path),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(matches!(
            Inventory::from_path(""),
            Err(GetoError::NotFound { .. })
        ));
        assert!(matches!(
            Inventory::from_path(dir.path()),
            Err(GetoError::NotFound { .. })
        ));
    }

    #[test]
    fn test_from_path_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geto.ini");
        fs::write(&path, "[hosts\n").unwrap();

        assert!(matches!(
            Inventory::from_path(&path),
            Err(GetoError::Malformed { line: 1, .. })
        ));
    }

    #[test]
    fn test_from_path_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geto.ini");
        fs::write(
            &path,
            "[geto]\nprivkey_path = /k\n\n[hosts]\na = 1.2.3.4\n\n[a]\nusername = bob\n",
        )
        .unwrap();

        let first = Inventory::from_path(&path).unwrap();
        let second = Inventory::from_path(&path).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.file_path.as_deref(), Some(path.as_path()));
    }
}
