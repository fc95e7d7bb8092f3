//! Shared catalog cache
//!
//! A batch fetcher writes the catalog under two keys; serving processes
//! read them back instead of hitting the upstream feed.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use tempfile::NamedTempFile;

use crate::cache::CacheEntryStatus;
use crate::catalog::{ApplicationRecord, CatalogSnapshot};
use crate::error::{Result, UdbError};

/// Key holding the JSON-encoded record array
pub const CATALOG_KEY: &str = "catalog";

/// Key holding the ISO-8601 capture timestamp
pub const INTEGRITY_KEY: &str = "integrity";

/// Minimal string key-value store
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Key-value store backed by one file per key
///
/// Writes go to a temp file that is renamed into place, so a reader in
/// another process sees either the old value or the new one.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(UdbError::InvalidArgument(format!(
                "Invalid cache key: '{}'",
                key
            )));
        }
        Ok(self.dir.join(key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

/// Catalog snapshot persisted in a [`KeyValueStore`]
pub struct SharedCache<S = FileStore> {
    store: S,
}

impl SharedCache<FileStore> {
    /// Shared cache stored as files in `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(FileStore::new(dir))
    }
}

impl<S: KeyValueStore> SharedCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Persist a snapshot, catalog first, integrity last
    pub fn write(&self, snapshot: &CatalogSnapshot) -> Result<()> {
        let catalog = serde_json::to_string(snapshot.all_records())?;
        self.store.set(CATALOG_KEY, &catalog)?;
        self.store.set(
            INTEGRITY_KEY,
            &snapshot
                .fetched_at()
                .to_rfc3339_opts(SecondsFormat::Micros, false),
        )?;
        Ok(())
    }

    /// Rebuild a snapshot from the stored keys
    pub fn read(&self) -> Result<CatalogSnapshot> {
        let fetched_at = self.read_integrity()?;
        let catalog = self
            .store
            .get(CATALOG_KEY)?
            .ok_or_else(|| UdbError::CacheMissing(CATALOG_KEY.to_string()))?;

        let records: Vec<ApplicationRecord> = serde_json::from_str(&catalog)
            .map_err(|e| UdbError::MalformedUpstream(format!("cached catalog: {e}")))?;

        Ok(CatalogSnapshot::new(records, fetched_at))
    }

    fn read_integrity(&self) -> Result<DateTime<Utc>> {
        let integrity = self
            .store
            .get(INTEGRITY_KEY)?
            .ok_or_else(|| UdbError::CacheMissing(INTEGRITY_KEY.to_string()))?;

        DateTime::parse_from_rfc3339(integrity.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| UdbError::MalformedUpstream(format!("integrity timestamp: {e}")))
    }

    /// Remove both keys
    pub fn clear(&self) -> Result<()> {
        self.store.remove(CATALOG_KEY)?;
        self.store.remove(INTEGRITY_KEY)?;
        Ok(())
    }

    /// Describe what is currently stored
    pub fn status(&self) -> CacheEntryStatus {
        let exists = matches!(self.store.get(CATALOG_KEY), Ok(Some(_)));
        if !exists {
            return CacheEntryStatus {
                exists: false,
                fetched_at: None,
                age_secs: None,
                count: None,
            };
        }

        match self.read() {
            Ok(snapshot) => {
                let age = Utc::now()
                    .signed_duration_since(snapshot.fetched_at())
                    .num_seconds()
                    .max(0) as u64;
                CacheEntryStatus {
                    exists: true,
                    fetched_at: Some(snapshot.fetched_at()),
                    age_secs: Some(age),
                    count: Some(snapshot.record_count()),
                }
            }
            Err(_) => CacheEntryStatus {
                exists: true,
                fetched_at: None,
                age_secs: None,
                count: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_snapshot(titles: &[&str]) -> CatalogSnapshot {
        CatalogSnapshot::new(
            titles
                .iter()
                .map(|t| ApplicationRecord::new(*t, &["3DS"]))
                .collect(),
            Utc::now(),
        )
    }

    // ─────────────────────────────────────────────────────────────────────────
    // FileStore Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_get_missing_key_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        assert!(store.get(CATALOG_KEY).unwrap().is_none());
    }

    #[test]
    fn test_set_creates_directory_and_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("nested").join("cache");
        let store = FileStore::new(&dir);

        store.set(INTEGRITY_KEY, "2024-01-01T00:00:00+00:00").unwrap();

        let names: Vec<String> = fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![INTEGRITY_KEY.to_string()]);
        assert_eq!(
            store.get(INTEGRITY_KEY).unwrap().as_deref(),
            Some("2024-01-01T00:00:00+00:00")
        );
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        let err = store.set("../escape", "x").unwrap_err();
        assert!(matches!(err, UdbError::InvalidArgument(_)));
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        store.remove(CATALOG_KEY).unwrap();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // SharedCache Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_read_without_write_is_cache_missing() {
        let temp_dir = TempDir::new().unwrap();
        let cache = SharedCache::in_dir(temp_dir.path());

        let err = cache.read().unwrap_err();
        assert!(matches!(err, UdbError::CacheMissing(ref key) if key == INTEGRITY_KEY));
    }

    #[test]
    fn test_write_then_read_keeps_records_and_timestamp() {
        let temp_dir = TempDir::new().unwrap();
        let cache = SharedCache::in_dir(temp_dir.path());
        let snapshot = make_snapshot(&["App One", "App Two"]);

        cache.write(&snapshot).unwrap();
        let restored = cache.read().unwrap();

        assert_eq!(restored.all_records(), snapshot.all_records());
        assert_eq!(
            restored.fetched_at().timestamp_micros(),
            snapshot.fetched_at().timestamp_micros()
        );
    }

    #[test]
    fn test_reads_python_style_isoformat_integrity() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        store.set(CATALOG_KEY, r#"[{"title": "App One", "systems": ["3DS"]}]"#).unwrap();
        store.set(INTEGRITY_KEY, "2024-03-09T18:22:41.123456+00:00").unwrap();

        let snapshot = SharedCache::new(store).read().unwrap();
        assert_eq!(snapshot.record_count(), 1);
        assert_eq!(snapshot.fetched_at().to_rfc3339(), "2024-03-09T18:22:41.123456+00:00");
    }

    #[test]
    fn test_malformed_catalog_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        store.set(CATALOG_KEY, r#"{"not": "a list"}"#).unwrap();
        store.set(INTEGRITY_KEY, "2024-03-09T18:22:41Z").unwrap();

        let err = SharedCache::new(store).read().unwrap_err();
        assert!(matches!(err, UdbError::MalformedUpstream(_)));
    }

    #[test]
    fn test_bad_integrity_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        store.set(CATALOG_KEY, "[]").unwrap();
        store.set(INTEGRITY_KEY, "yesterday").unwrap();

        let err = SharedCache::new(store).read().unwrap_err();
        assert!(matches!(err, UdbError::MalformedUpstream(_)));
    }

    #[test]
    fn test_clear_removes_both_keys() {
        let temp_dir = TempDir::new().unwrap();
        let cache = SharedCache::in_dir(temp_dir.path());
        cache.write(&make_snapshot(&["App One"])).unwrap();

        cache.clear().unwrap();

        assert!(!temp_dir.path().join(CATALOG_KEY).exists());
        assert!(!temp_dir.path().join(INTEGRITY_KEY).exists());
    }

    #[test]
    fn test_clear_leaves_unrelated_files() {
        let temp_dir = TempDir::new().unwrap();
        let cache = SharedCache::in_dir(temp_dir.path());
        cache.write(&make_snapshot(&["App One"])).unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "keep me").unwrap();

        cache.clear().unwrap();

        assert!(temp_dir.path().join("notes.txt").exists());
    }

    #[test]
    fn test_concurrent_writers_never_leave_torn_values() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().to_path_buf();

        let writers: Vec<_> = ["a", "b", "c", "d"]
            .into_iter()
            .map(|tag| {
                let store = FileStore::new(&dir);
                std::thread::spawn(move || {
                    let value = tag.repeat(64 * 1024);
                    for _ in 0..20 {
                        store.set(CATALOG_KEY, &value).unwrap();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let value = FileStore::new(&dir).get(CATALOG_KEY).unwrap().unwrap();
        assert_eq!(value.len(), 64 * 1024);
        let first = value.chars().next().unwrap();
        assert!(value.chars().all(|c| c == first));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Status Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_status_when_no_cache() {
        let temp_dir = TempDir::new().unwrap();
        let status = SharedCache::in_dir(temp_dir.path()).status();

        assert!(!status.exists);
        assert!(status.age_secs.is_none());
        assert!(status.count.is_none());
    }

    #[test]
    fn test_status_when_cache_exists() {
        let temp_dir = TempDir::new().unwrap();
        let cache = SharedCache::in_dir(temp_dir.path());
        cache.write(&make_snapshot(&["A", "B", "C"])).unwrap();

        let status = cache.status();
        assert!(status.exists);
        assert_eq!(status.count, Some(3));
        assert!(status.age_secs.unwrap() < 5);
        assert!(status.fetched_at.is_some());
    }

    #[test]
    fn test_status_with_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        store.set(CATALOG_KEY, "invalid json").unwrap();

        let status = SharedCache::new(store).status();
        assert!(status.exists);
        assert!(status.age_secs.is_none());
        assert!(status.count.is_none());
    }
}
