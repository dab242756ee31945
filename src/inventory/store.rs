//! Current inventory snapshot
//!
//! [`ConfigStore`] holds the inventory of the last parse. Writers swap the
//! whole record, readers get an `Arc` to an immutable snapshot, so no reader
//! ever observes a half-built inventory.

use std::path::Path;
use std::sync::{Arc, LazyLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

use super::types::Inventory;
use crate::error::Result;

#[derive(Debug, Default)]
struct Snapshot {
    inventory: Arc<Inventory>,

    /// Set by the first successful parse and never cleared
    parsed: bool,
}

/// Owner of the current inventory
#[derive(Debug, Default)]
pub struct ConfigStore {
    state: RwLock<Snapshot>,
}

impl ConfigStore {
    /// Create an unparsed store holding the empty inventory
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `path` and make the result current
    ///
    /// On failure the current inventory is reset to the empty one rather
    /// than keeping the previous result.
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<Arc<Inventory>> {
        match Inventory::from_path(path) {
            Ok(inventory) => {
                let inventory = Arc::new(inventory);
                let mut state = self.write();
                state.inventory = Arc::clone(&inventory);
                state.parsed = true;
                Ok(inventory)
            }
            Err(e) => {
                self.write().inventory = Arc::default();
                Err(e)
            }
        }
    }

    /// Current inventory
    ///
    /// Before any successful parse this is the empty inventory, and a
    /// warning is logged. Never triggers a parse.
    pub fn get(&self) -> Arc<Inventory> {
        let state = self.read();
        if !state.parsed {
            warn!("Unparsed configuration");
        }
        Arc::clone(&state.inventory)
    }

    /// Whether a parse has ever succeeded
    pub fn is_parsed(&self) -> bool {
        self.read().parsed
    }

    // A poisoned lock still holds a whole snapshot
    fn read(&self) -> RwLockReadGuard<'_, Snapshot> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Snapshot> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

static GLOBAL: LazyLock<ConfigStore> = LazyLock::new(ConfigStore::new);

/// Process-wide store used by [`parse_config`] and [`get_config`]
pub fn global() -> &'static ConfigStore {
    &GLOBAL
}

/// Parse `path` into the process-wide store
pub fn parse_config(path: impl AsRef<Path>) -> Result<Arc<Inventory>> {
    GLOBAL.parse(path)
}

/// Current process-wide inventory
pub fn get_config() -> Arc<Inventory> {
    GLOBAL.get()
}
