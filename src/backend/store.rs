#[cfg(not(target_arch = "wasm32"))]
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;
use std::sync::Mutex;

use crate::backend::error::{StorageError, StorageResult};

/// Small string key/value storage the session layer persists into.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn put(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
}

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// File-backed store used by the desktop build.
#[cfg(not(target_arch = "wasm32"))]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

#[cfg(not(target_arch = "wasm32"))]
impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        Self::init(Connection::open(path)?)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StorageResult<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self { conn: Mutex::new(conn) })
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> StorageResult<()> {
        let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

/// `localStorage` behind a synchronous cache.
///
/// Reads are served from the cache, which `hydrate` fills from the browser.
/// Writes update the cache immediately and are mirrored to `localStorage`
/// through script evaluation, so they must happen inside the Dioxus runtime.
#[cfg(target_arch = "wasm32")]
#[derive(Default)]
pub struct BrowserStore {
    cache: MemoryStore,
}

#[cfg(target_arch = "wasm32")]
impl BrowserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the given keys from `localStorage` into the cache.
    pub async fn hydrate(&self, keys: &[&str]) -> StorageResult<()> {
        for key in keys {
            let script = format!("return localStorage.getItem({});", serde_json::to_string(key)?);
            let value = match dioxus::document::eval(&script).join::<Option<String>>().await {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!("Failed to read {} from localStorage: {:?}", key, e);
                    None
                }
            };
            match value {
                Some(v) => self.cache.put(key, &v)?,
                None => self.cache.remove(key)?,
            }
        }
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.cache.get(key)
    }

    fn put(&self, key: &str, value: &str) -> StorageResult<()> {
        self.cache.put(key, value)?;
        let script = format!(
            "localStorage.setItem({}, {});",
            serde_json::to_string(key)?,
            serde_json::to_string(value)?
        );
        let _ = dioxus::document::eval(&script);
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.cache.remove(key)?;
        let script = format!("localStorage.removeItem({});", serde_json::to_string(key)?);
        let _ = dioxus::document::eval(&script);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn exercise(store: &dyn KeyValueStore) {
        assert_eq!(store.get("theme").unwrap(), None);
        store.put("theme", "dark").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
        store.put("theme", "light").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("light"));
        store.remove("theme").unwrap();
        assert_eq!(store.get("theme").unwrap(), None);
        // removing a missing key is not an error
        store.remove("theme").unwrap();
    }

    #[test]
    fn memory_store_put_get_remove() {
        exercise(&MemoryStore::new());
    }

    #[test]
    fn sqlite_store_put_get_remove() {
        exercise(&SqliteStore::open_in_memory().expect("Failed to open store"));
    }

    #[test]
    fn sqlite_store_persists_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.db");

        {
            let store = SqliteStore::open(&path).expect("Failed to open store");
            store.put("unicms:user", r#"{"email":"a@x","role":"ADMIN"}"#).unwrap();
        }

        let reopened = SqliteStore::open(&path).expect("Failed to reopen store");
        assert_eq!(
            reopened.get("unicms:user").unwrap().as_deref(),
            Some(r#"{"email":"a@x","role":"ADMIN"}"#)
        );
    }
}
