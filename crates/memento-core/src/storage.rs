//! Key-value stores backing the persistent and session scopes.
//!
//! Both scopes are plain string maps. Reads and writes are synchronous and
//! not coordinated across pages: two pages sharing a persistent store may
//! observe each other's writes interleaved.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::Result;

/// Persistent keys (survive a browser restart).
pub const IS_LOGIN_KEY: &str = "isLogin";
pub const NOTES_THEME_KEY: &str = "notesTheme";
pub const PHOTOS_THEME_KEY: &str = "photosTheme";

/// Session-scoped keys (cleared with the browsing context).
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const IS_VERIFIED_KEY: &str = "isVerified";

/// Literal value stored for boolean flags.
pub const FLAG_TRUE: &str = "true";

pub trait KeyValueStore: Clone + Send + Sync + 'static {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;

    /// `true` only when the key holds the literal `"true"`.
    fn flag(&self, key: &str) -> bool {
        self.get(key).as_deref() == Some(FLAG_TRUE)
    }
}

fn lock(map: &Mutex<BTreeMap<String, String>>) -> MutexGuard<'_, BTreeMap<String, String>> {
    map.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory store; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        lock(&self.entries).remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        lock(&self.entries).clear();
        Ok(())
    }
}

/// JSON-file-backed store used as the persistent scope outside a browser.
///
/// The whole map is rewritten on every mutation. A missing file is an empty
/// store.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            entries: Arc::new(Mutex::new(entries)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        lock(&self.entries).clone()
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let serialized = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, serialized)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = lock(&self.entries);
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = lock(&self.entries);
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut entries = lock(&self.entries);
        entries.clear();
        self.persist(&entries)
    }
}
