//! Shared settings store
//!
//! [`RemoteSettings`] is the record API of the backing service: rows in named
//! tables, addressed by string id, written with upsert semantics. The theme
//! engine only ever touches one row (see [`crate::store::GLOBAL_THEME_ID`]).

use rustc_hash::FxHashMap;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;

/// Remote store failures
#[derive(Error, Debug)]
pub enum RemoteError {
    /// The table hasn't been provisioned yet
    #[error("table `{0}` does not exist")]
    MissingTable(String),

    /// The store couldn't be reached
    #[error("remote store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the request (permissions, validation)
    #[error("remote store rejected the request: {0}")]
    Rejected(String),

    #[error("remote store I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("malformed record: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl RemoteError {
    /// Whether this is the expected "not set up yet" condition rather than a fault
    pub fn is_missing_table(&self) -> bool {
        matches!(self, Self::MissingTable(_))
    }
}

/// Record store addressable by table and id
#[allow(async_fn_in_trait)]
pub trait RemoteSettings {
    /// Insert or overwrite the row `id` in `table`
    async fn upsert(&self, table: &str, id: &str, record: Value) -> Result<(), RemoteError>;

    /// Fetch the row `id` from `table`, `None` when absent
    async fn get(&self, table: &str, id: &str) -> Result<Option<Value>, RemoteError>;
}

impl<T: RemoteSettings + ?Sized> RemoteSettings for &T {
    async fn upsert(&self, table: &str, id: &str, record: Value) -> Result<(), RemoteError> {
        (**self).upsert(table, id, record).await
    }

    async fn get(&self, table: &str, id: &str) -> Result<Option<Value>, RemoteError> {
        (**self).get(table, id).await
    }
}

/// Simulated outage for [`MemoryRemote`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outage {
    Unreachable,
    PermissionDenied,
}

/// In-memory record store.
///
/// Tables must be provisioned with [`MemoryRemote::create_table`] before
/// use, mirroring a database whose schema is rolled out separately.
#[derive(Default)]
pub struct MemoryRemote {
    tables: RwLock<FxHashMap<String, FxHashMap<String, Value>>>,
    outage: RwLock<Option<Outage>>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(table: &str) -> Self {
        let remote = Self::new();
        remote.create_table(table);
        remote
    }

    pub fn create_table(&self, table: &str) {
        self.tables
            .write()
            .unwrap()
            .entry(table.to_string())
            .or_default();
    }

    pub fn set_outage(&self, outage: Option<Outage>) {
        *self.outage.write().unwrap() = outage;
    }

    /// Read a row directly, bypassing outages
    pub fn record(&self, table: &str, id: &str) -> Option<Value> {
        self.tables.read().unwrap().get(table)?.get(id).cloned()
    }

    fn check_outage(&self) -> Result<(), RemoteError> {
        match *self.outage.read().unwrap() {
            Some(Outage::Unreachable) => {
                Err(RemoteError::Unavailable("connection refused".to_string()))
            }
            Some(Outage::PermissionDenied) => {
                Err(RemoteError::Rejected("permission denied".to_string()))
            }
            None => Ok(()),
        }
    }
}

impl RemoteSettings for MemoryRemote {
    async fn upsert(&self, table: &str, id: &str, record: Value) -> Result<(), RemoteError> {
        self.check_outage()?;
        let mut tables = self.tables.write().unwrap();
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| RemoteError::MissingTable(table.to_string()))?;
        rows.insert(id.to_string(), record);
        Ok(())
    }

    async fn get(&self, table: &str, id: &str) -> Result<Option<Value>, RemoteError> {
        self.check_outage()?;
        let tables = self.tables.read().unwrap();
        let rows = tables
            .get(table)
            .ok_or_else(|| RemoteError::MissingTable(table.to_string()))?;
        Ok(rows.get(id).cloned())
    }
}

/// Record store laid out on disk as `<root>/<table>/<id>.json`.
///
/// A table exists when its directory does.
pub struct DirectoryRemote {
    root: PathBuf,
}

impl DirectoryRemote {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the table directory if it doesn't exist
    pub fn provision(&self, table: &str) -> Result<(), RemoteError> {
        fs::create_dir_all(self.root.join(table))?;
        Ok(())
    }

    fn table_dir(&self, table: &str) -> Result<PathBuf, RemoteError> {
        let dir = self.root.join(table);
        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(RemoteError::MissingTable(table.to_string()))
        }
    }
}

fn row_file(id: &str) -> Result<String, RemoteError> {
    if id.is_empty() || id.contains(['/', '\\']) || id.starts_with('.') {
        return Err(RemoteError::Rejected(format!("invalid record id `{id}`")));
    }
    Ok(format!("{id}.json"))
}

impl RemoteSettings for DirectoryRemote {
    async fn upsert(&self, table: &str, id: &str, record: Value) -> Result<(), RemoteError> {
        let dir = self.table_dir(table)?;
        let path = dir.join(row_file(id)?);
        let tmp = dir.join(format!(".{id}.json.tmp"));
        fs::write(&tmp, serde_json::to_vec_pretty(&record)?)?;
        fs::rename(&tmp, &path)?;
        tracing::debug!(table, id, path = %path.display(), "upserted record");
        Ok(())
    }

    async fn get(&self, table: &str, id: &str) -> Result<Option<Value>, RemoteError> {
        let path = self.table_dir(table)?.join(row_file(id)?);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn memory_remote_requires_provisioned_table() {
        let remote = MemoryRemote::new();
        let err = pollster::block_on(remote.get("app_settings", "x")).unwrap_err();
        assert!(err.is_missing_table());

        remote.create_table("app_settings");
        assert!(pollster::block_on(remote.get("app_settings", "x"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn memory_remote_upsert_overwrites() {
        let remote = MemoryRemote::with_table("t");
        pollster::block_on(remote.upsert("t", "row", json!({"v": 1}))).unwrap();
        pollster::block_on(remote.upsert("t", "row", json!({"v": 2}))).unwrap();
        let row = pollster::block_on(remote.get("t", "row")).unwrap();
        assert_eq!(row, Some(json!({"v": 2})));
    }

    #[test]
    fn outages_surface_as_errors() {
        let remote = MemoryRemote::with_table("t");
        remote.set_outage(Some(Outage::Unreachable));
        assert!(matches!(
            pollster::block_on(remote.get("t", "row")),
            Err(RemoteError::Unavailable(_))
        ));
        remote.set_outage(Some(Outage::PermissionDenied));
        assert!(matches!(
            pollster::block_on(remote.upsert("t", "row", json!(null))),
            Err(RemoteError::Rejected(_))
        ));
        assert!(remote.record("t", "row").is_none());
    }

    #[test]
    fn directory_remote_stores_rows_as_files() {
        let dir = tempfile::tempdir().unwrap();
        let remote = DirectoryRemote::new(dir.path());

        let err = pollster::block_on(remote.upsert("app_settings", "a", json!({}))).unwrap_err();
        assert!(err.is_missing_table());

        remote.provision("app_settings").unwrap();
        pollster::block_on(remote.upsert("app_settings", "a", json!({"x": true}))).unwrap();
        assert!(dir.path().join("app_settings").join("a.json").is_file());
        assert_eq!(
            pollster::block_on(remote.get("app_settings", "a")).unwrap(),
            Some(json!({"x": true}))
        );
        assert!(pollster::block_on(remote.get("app_settings", "b"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn directory_remote_rejects_path_like_ids() {
        let dir = tempfile::tempdir().unwrap();
        let remote = DirectoryRemote::new(dir.path());
        remote.provision("t").unwrap();
        for id in ["", "../escape", ".hidden", "a/b"] {
            assert!(
                matches!(
                    pollster::block_on(remote.get("t", id)),
                    Err(RemoteError::Rejected(_))
                ),
                "{id:?}"
            );
        }
    }
}
