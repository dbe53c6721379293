//! File-backed version history.
//!
//! Layout inside the versions directory:
//! ```text
//! version_000001.json   - one self-describing JSON record per version
//! version_000002.json
//! version_000003.json.tmp - in-flight write, renamed into place when complete
//! ```

use crate::snapshot::Snapshot;
use campaign_kernel::KernelError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const FILE_PREFIX: &str = "version_";
const FILE_SUFFIX: &str = ".json";
const TMP_SUFFIX: &str = ".json.tmp";

/// Errors from persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("version {version} not found")]
    NotFound { version: i64 },
    #[error("corrupt version file {file}: {reason}")]
    Corrupt { file: String, reason: String },
    #[error("retention bound must keep at least one version")]
    InvalidRetention,
    #[error("version numbers exhausted: {latest} is the highest representable version")]
    Exhausted { latest: u32 },
    #[error("no project file in {0}")]
    ProjectNotFound(PathBuf),
    #[error(transparent)]
    Kernel(#[from] KernelError),
}

impl StoreError {
    /// Whether the failure is a lookup of a version that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Configuration for a version store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Maximum number of versions kept after each write.
    pub retention: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { retention: 3 }
    }
}

/// An immutable, numbered record wrapping one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Version {
    pub version_number: u32,
    pub timestamp: DateTime<Utc>,
    pub description: Option<String>,
    pub data: Snapshot,
}

/// Numbered snapshot history for one project.
///
/// Single writer: mutating calls take `&mut self`, and two stores pointed at
/// the same directory must be serialized by the caller.
#[derive(Debug)]
pub struct VersionStore {
    dir: PathBuf,
    config: StoreConfig,
}

impl VersionStore {
    /// Open or create a version store in `dir`.
    ///
    /// Leftover temp files from interrupted writes are removed.
    pub fn open(dir: impl AsRef<Path>, config: StoreConfig) -> Result<Self, StoreError> {
        if config.retention == 0 {
            return Err(StoreError::InvalidRetention);
        }
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;

        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            let is_tmp = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(FILE_PREFIX) && n.ends_with(TMP_SUFFIX));
            if is_tmp {
                match std::fs::remove_file(&path) {
                    Ok(()) => debug!(path = %path.display(), "removed stale temp file"),
                    Err(e) => warn!(path = %path.display(), "failed to remove stale temp file: {e}"),
                }
            }
        }

        Ok(Self { dir, config })
    }

    /// Directory holding the version files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn retention(&self) -> usize {
        self.config.retention
    }

    /// Record `snapshot` as a new version unless it matches the latest one.
    ///
    /// Returns `Ok(None)` when the content is unchanged and `force` is false;
    /// nothing is written in that case.
    pub fn create_version(
        &mut self,
        snapshot: &Snapshot,
        description: Option<&str>,
        force: bool,
    ) -> Result<Option<Version>, StoreError> {
        if !force {
            if let Some(&latest) = self.version_numbers()?.last() {
                match self.read_version(latest) {
                    Ok(current) => {
                        if current.data.digest()? == snapshot.digest()? {
                            debug!(version = latest, "snapshot unchanged, no version created");
                            return Ok(None);
                        }
                    }
                    // An unreadable latest version cannot match anything.
                    Err(e) => warn!(version = latest, "cannot compare against latest version: {e}"),
                }
            }
        }
        self.commit(snapshot, description).map(Some)
    }

    /// Record `snapshot` as a new version unconditionally, then prune.
    pub fn commit(
        &mut self,
        snapshot: &Snapshot,
        description: Option<&str>,
    ) -> Result<Version, StoreError> {
        let latest = self.current_version_number()?;
        let version = Version {
            version_number: latest
                .checked_add(1)
                .ok_or(StoreError::Exhausted { latest })?,
            timestamp: Utc::now(),
            description: description.map(str::to_owned),
            data: snapshot.clone(),
        };
        self.write_version(&version)?;
        info!(
            version = version.version_number,
            description = version.description.as_deref().unwrap_or(""),
            "created version"
        );
        self.prune();
        Ok(version)
    }

    /// Highest version number on disk, or 0 when there is none.
    pub fn current_version_number(&self) -> Result<u32, StoreError> {
        Ok(self.version_numbers()?.last().copied().unwrap_or(0))
    }

    /// The most recent version, if any.
    pub fn current_version(&self) -> Result<Option<Version>, StoreError> {
        match self.current_version_number()? {
            0 => Ok(None),
            n => self.get_version(i64::from(n)),
        }
    }

    /// Look up a version. Numbers that were pruned, never existed, or are
    /// not positive yield `Ok(None)`.
    pub fn get_version(&self, number: i64) -> Result<Option<Version>, StoreError> {
        let Ok(number) = u32::try_from(number) else {
            return Ok(None);
        };
        if number == 0 {
            return Ok(None);
        }
        match self.read_version(number) {
            Ok(version) => Ok(Some(version)),
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// All retained versions, oldest first.
    ///
    /// Unreadable or corrupt files are skipped with a warning rather than
    /// failing the whole listing.
    pub fn list_versions(&self) -> Result<Vec<Version>, StoreError> {
        let mut versions = Vec::new();
        for number in self.version_numbers()? {
            match self.read_version(number) {
                Ok(version) => versions.push(version),
                Err(e) => warn!(version = number, "skipping unreadable version: {e}"),
            }
        }
        Ok(versions)
    }

    /// The snapshot stored for `number`. Reads only; history is untouched.
    pub fn rollback_to_version(&self, number: i64) -> Result<Snapshot, StoreError> {
        self.get_version(number)?
            .map(|v| v.data)
            .ok_or(StoreError::NotFound { version: number })
    }

    fn version_path(&self, number: u32) -> PathBuf {
        self.dir.join(file_name(number))
    }

    /// Version numbers present on disk, ascending.
    fn version_numbers(&self) -> Result<Vec<u32>, StoreError> {
        let mut numbers = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            if let Some(n) = entry.file_name().to_str().and_then(parse_file_number) {
                numbers.push(n);
            }
        }
        numbers.sort_unstable();
        Ok(numbers)
    }

    fn read_version(&self, number: u32) -> Result<Version, StoreError> {
        let path = self.version_path(number);
        debug!(path = %path.display(), "reading version");
        let content = std::fs::read_to_string(&path)?;
        let version: Version = serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;
        if version.version_number != number {
            return Err(StoreError::Corrupt {
                file: path.display().to_string(),
                reason: format!("records version {}", version.version_number),
            });
        }
        Ok(version)
    }

    /// Write to a temp file, sync, then rename so readers never see a partial version.
    fn write_version(&self, version: &Version) -> Result<(), StoreError> {
        let path = self.version_path(version.version_number);
        let tmp = path.with_extension("json.tmp");
        let content = serde_json::to_vec_pretty(version)?;

        let written = File::create(&tmp).and_then(|mut file| {
            file.write_all(&content)?;
            file.sync_all()
        });
        if let Err(e) = written.and_then(|()| std::fs::rename(&tmp, &path)) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        debug!(path = %path.display(), "wrote version");
        Ok(())
    }

    /// Delete the oldest versions beyond the retention bound.
    ///
    /// Best effort: the new version is already committed, so failures are
    /// logged and never propagated.
    fn prune(&self) {
        let numbers = match self.version_numbers() {
            Ok(numbers) => numbers,
            Err(e) => {
                warn!("cannot list versions for pruning: {e}");
                return;
            }
        };
        let excess = numbers.len().saturating_sub(self.config.retention);
        for &number in &numbers[..excess] {
            let path = self.version_path(number);
            match std::fs::remove_file(&path) {
                Ok(()) => info!(version = number, "pruned version"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!(version = number, "version already removed");
                }
                Err(e) => warn!(version = number, "failed to prune version: {e}"),
            }
        }
    }
}

fn file_name(number: u32) -> String {
    format!("{FILE_PREFIX}{number:06}{FILE_SUFFIX}")
}

/// `version_000042.json` -> `Some(42)`.
///
/// Only the exact name [`file_name`] produces is accepted, so every listed
/// number can be read back and no number is listed twice.
fn parse_file_number(name: &str) -> Option<u32> {
    let digits = name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_SUFFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let number: u32 = digits.parse().ok().filter(|n| *n > 0)?;
    (file_name(number) == name).then_some(number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn open(dir: &Path, retention: usize) -> VersionStore {
        VersionStore::open(dir.join("versions"), StoreConfig { retention }).unwrap()
    }

    fn snap(value: serde_json::Value) -> Snapshot {
        Snapshot::new(value)
    }

    fn numbers(store: &VersionStore) -> Vec<u32> {
        store
            .list_versions()
            .unwrap()
            .iter()
            .map(|v| v.version_number)
            .collect()
    }

    #[test]
    fn open_creates_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let store = open(tmp.path(), 3);
        assert!(store.dir().is_dir());
        assert_eq!(store.current_version_number().unwrap(), 0);
        assert!(store.current_version().unwrap().is_none());
        assert!(store.list_versions().unwrap().is_empty());
    }

    #[test]
    fn zero_retention_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let result = VersionStore::open(tmp.path(), StoreConfig { retention: 0 });
        assert!(matches!(result, Err(StoreError::InvalidRetention)));
    }

    #[test]
    fn numbering_is_monotonic_from_one() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = open(tmp.path(), 10);
        for i in 1..=5u32 {
            let v = store
                .create_version(&snap(json!({ "x": i })), None, false)
                .unwrap()
                .unwrap();
            assert_eq!(v.version_number, i);
        }
        assert_eq!(store.current_version_number().unwrap(), 5);
    }

    #[test]
    fn unchanged_snapshot_is_deduplicated() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = open(tmp.path(), 3);
        let s = snap(json!({"x": 1}));

        let first = store.create_version(&s, None, false).unwrap();
        assert_eq!(first.unwrap().version_number, 1);

        let second = store.create_version(&s, Some("again"), false).unwrap();
        assert!(second.is_none());
        assert_eq!(store.current_version_number().unwrap(), 1);
        assert_eq!(numbers(&store), vec![1]);
    }

    #[test]
    fn dedup_ignores_key_order() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = open(tmp.path(), 3);
        let mut m1 = serde_json::Map::new();
        m1.insert("a".into(), json!(1));
        m1.insert("b".into(), json!(2));
        let mut m2 = serde_json::Map::new();
        m2.insert("b".into(), json!(2));
        m2.insert("a".into(), json!(1));

        store.create_version(&snap(m1.into()), None, false).unwrap();
        assert!(store.create_version(&snap(m2.into()), None, false).unwrap().is_none());
    }

    #[test]
    fn dedup_only_compares_with_latest() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = open(tmp.path(), 5);
        store.create_version(&snap(json!({"x": 1})), None, false).unwrap();
        store.create_version(&snap(json!({"x": 2})), None, false).unwrap();
        let v = store.create_version(&snap(json!({"x": 1})), None, false).unwrap();
        assert_eq!(v.unwrap().version_number, 3);
    }

    #[test]
    fn force_bypasses_dedup() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = open(tmp.path(), 3);
        let s = snap(json!({"x": 1}));
        let a = store.create_version(&s, None, true).unwrap().unwrap();
        let b = store.create_version(&s, None, true).unwrap().unwrap();
        assert_eq!(a.version_number, 1);
        assert_eq!(b.version_number, 2);
        assert_eq!(a.data, b.data);
    }

    #[test]
    fn retention_keeps_newest() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = open(tmp.path(), 3);
        for x in 1..=4 {
            let v = store.create_version(&snap(json!({ "x": x })), None, false).unwrap();
            assert_eq!(v.unwrap().version_number, x);
        }
        assert_eq!(numbers(&store), vec![2, 3, 4]);
        assert!(store.get_version(1).unwrap().is_none());
        assert!(matches!(
            store.rollback_to_version(1),
            Err(StoreError::NotFound { version: 1 })
        ));
    }

    #[test]
    fn retention_bound_holds_after_many_writes() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = open(tmp.path(), 3);
        for x in 1..=10 {
            store.create_version(&snap(json!({ "x": x })), None, false).unwrap();
        }
        assert_eq!(numbers(&store), vec![8, 9, 10]);
        for pruned in 1..=7 {
            assert!(store.get_version(pruned).unwrap().is_none());
        }
        // Numbers are never reused after pruning.
        let next = store.create_version(&snap(json!({"x": 11})), None, false).unwrap();
        assert_eq!(next.unwrap().version_number, 11);
    }

    #[test]
    fn next_number_follows_max_after_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        {
            let mut store = open(tmp.path(), 2);
            for x in 1..=4 {
                store.create_version(&snap(json!({ "x": x })), None, false).unwrap();
            }
        }
        let mut store = open(tmp.path(), 2);
        assert_eq!(store.current_version_number().unwrap(), 4);
        let v = store.commit(&snap(json!({"x": 5})), None).unwrap();
        assert_eq!(v.version_number, 5);
    }

    #[test]
    fn rollback_is_pure() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = open(tmp.path(), 3);
        let original = json!({"x": 1, "nested": {"list": [1, "two", null]}});
        store.create_version(&snap(original.clone()), None, false).unwrap();
        store.create_version(&snap(json!({"x": 2})), None, false).unwrap();

        let before = store.list_versions().unwrap();
        for _ in 0..3 {
            let restored = store.rollback_to_version(1).unwrap();
            assert_eq!(restored.as_value(), &original);
        }
        assert_eq!(store.list_versions().unwrap(), before);
        assert_eq!(store.current_version_number().unwrap(), 2);
    }

    #[test]
    fn rollback_then_commit_scenario() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = open(tmp.path(), 3);
        store.create_version(&snap(json!({"x": 1})), None, false).unwrap();

        let restored = store.rollback_to_version(1).unwrap();
        assert_eq!(restored.as_value(), &json!({"x": 1}));
        assert_eq!(store.current_version_number().unwrap(), 1);

        let v = store
            .create_version(&restored, Some("Rollback to version 1"), true)
            .unwrap()
            .unwrap();
        assert_eq!(v.version_number, 2);
        assert_eq!(v.description.as_deref(), Some("Rollback to version 1"));
        assert_eq!(v.data.as_value(), &json!({"x": 1}));
    }

    #[test]
    fn roundtrip_preserves_nested_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = open(tmp.path(), 3);
        let value = json!({
            "name": "Osgild",
            "flags": [true, false, null],
            "depth": {"a": {"b": {"c": [1, 2.5, -3, "ünïcødé"]}}},
            "empty": {},
            "none": []
        });
        let created = store
            .create_version(&snap(value.clone()), Some("note"), false)
            .unwrap()
            .unwrap();
        let read = store.get_version(i64::from(created.version_number)).unwrap().unwrap();
        assert_eq!(read.data.as_value(), &value);
        assert_eq!(read.description.as_deref(), Some("note"));
        assert_eq!(read, created);
    }

    #[test]
    fn stored_snapshot_is_a_copy() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = open(tmp.path(), 3);
        let mut value = json!({"x": 1});
        let created = store.create_version(&snap(value.clone()), None, false).unwrap().unwrap();
        value["x"] = json!(99);
        assert_eq!(created.data.as_value(), &json!({"x": 1}));
        assert_eq!(store.rollback_to_version(1).unwrap().as_value(), &json!({"x": 1}));
    }

    #[test]
    fn missing_numbers_are_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = open(tmp.path(), 3);
        store.create_version(&snap(json!({"x": 1})), None, false).unwrap();
        assert!(store.get_version(0).unwrap().is_none());
        assert!(store.get_version(-1).unwrap().is_none());
        assert!(store.get_version(42).unwrap().is_none());
        assert!(store.get_version(i64::MAX).unwrap().is_none());
        assert!(store.rollback_to_version(-1).unwrap_err().is_not_found());
    }

    #[test]
    fn files_use_padded_names_and_record_fields() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = open(tmp.path(), 3);
        store.create_version(&snap(json!({"x": 1})), Some("first"), false).unwrap();

        let path = store.dir().join("version_000001.json");
        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["version_number"], 1);
        assert_eq!(raw["description"], "first");
        assert_eq!(raw["data"], json!({"x": 1}));
        let ts = raw["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(ts).is_ok());
    }

    #[test]
    fn stale_temp_files_are_invisible_and_cleaned() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("versions");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("version_000001.json.tmp"), "{ half").unwrap();

        let store = open(tmp.path(), 3);
        assert!(!dir.join("version_000001.json.tmp").exists());
        assert_eq!(store.current_version_number().unwrap(), 0);
    }

    #[test]
    fn corrupt_entry_skipped_in_listing_but_reported_on_get() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = open(tmp.path(), 5);
        for x in 1..=3 {
            store.create_version(&snap(json!({ "x": x })), None, false).unwrap();
        }
        std::fs::write(store.dir().join("version_000002.json"), "not json").unwrap();

        assert_eq!(numbers(&store), vec![1, 3]);
        assert!(matches!(
            store.get_version(2),
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[test]
    fn mismatched_number_is_corrupt() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = open(tmp.path(), 5);
        store.create_version(&snap(json!({"x": 1})), None, false).unwrap();
        std::fs::copy(
            store.dir().join("version_000001.json"),
            store.dir().join("version_000007.json"),
        )
        .unwrap();
        assert!(matches!(
            store.get_version(7),
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[test]
    fn corrupt_latest_does_not_block_new_versions() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = open(tmp.path(), 5);
        store.create_version(&snap(json!({"x": 1})), None, false).unwrap();
        std::fs::write(store.dir().join("version_000001.json"), "garbage").unwrap();

        let v = store.create_version(&snap(json!({"x": 1})), None, false).unwrap();
        assert_eq!(v.unwrap().version_number, 2);
    }

    #[test]
    fn prune_failure_does_not_fail_create() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = open(tmp.path(), 2);
        store.create_version(&snap(json!({"x": 1})), None, false).unwrap();
        store.create_version(&snap(json!({"x": 2})), None, false).unwrap();

        // A directory in place of version 1 cannot be removed with remove_file.
        let oldest = store.dir().join("version_000001.json");
        std::fs::remove_file(&oldest).unwrap();
        std::fs::create_dir(&oldest).unwrap();

        let v = store.create_version(&snap(json!({"x": 3})), None, false).unwrap();
        assert_eq!(v.unwrap().version_number, 3);
        assert!(oldest.is_dir());
        assert_eq!(numbers(&store), vec![2, 3]);
    }

    #[test]
    fn unrelated_files_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = open(tmp.path(), 3);
        std::fs::write(store.dir().join("notes.txt"), "hi").unwrap();
        std::fs::write(store.dir().join("version_abc.json"), "{}").unwrap();
        let v = store.create_version(&snap(json!({"x": 1})), None, false).unwrap();
        assert_eq!(v.unwrap().version_number, 1);
        assert_eq!(numbers(&store), vec![1]);
    }

    #[test]
    fn differently_padded_names_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = open(tmp.path(), 5);
        store.create_version(&snap(json!({"x": 1})), None, false).unwrap();
        std::fs::copy(
            store.dir().join("version_000001.json"),
            store.dir().join("version_0001.json"),
        )
        .unwrap();

        assert_eq!(numbers(&store), vec![1]);
        assert_eq!(store.current_version_number().unwrap(), 1);
    }

    #[test]
    fn short_padded_file_alone_is_not_counted() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = open(tmp.path(), 5);
        store.create_version(&snap(json!({"x": 1})), None, false).unwrap();
        std::fs::rename(
            store.dir().join("version_000001.json"),
            store.dir().join("version_0001.json"),
        )
        .unwrap();

        // Counted history and readable history agree.
        assert_eq!(store.current_version_number().unwrap(), 0);
        assert!(store.current_version().unwrap().is_none());
        assert!(store.list_versions().unwrap().is_empty());
    }

    #[test]
    fn exhausted_numbering_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = open(tmp.path(), 5);
        let last = Version {
            version_number: u32::MAX,
            timestamp: Utc::now(),
            description: None,
            data: snap(json!({"x": 1})),
        };
        std::fs::write(
            store.dir().join(file_name(u32::MAX)),
            serde_json::to_vec_pretty(&last).unwrap(),
        )
        .unwrap();

        let result = store.create_version(&snap(json!({"x": 2})), None, false);
        assert!(matches!(
            result,
            Err(StoreError::Exhausted { latest: u32::MAX })
        ));
        assert_eq!(store.current_version_number().unwrap(), u32::MAX);
        assert!(!store.dir().join("version_000000.json").exists());
    }

    #[test]
    fn failed_write_propagates_and_leaves_no_version() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = open(tmp.path(), 5);
        store.create_version(&snap(json!({"x": 1})), None, false).unwrap();

        // A directory where the temp file must go makes the write fail.
        let blocked = store.dir().join("version_000002.json.tmp");
        std::fs::create_dir(&blocked).unwrap();
        std::fs::write(blocked.join("keep"), "x").unwrap();

        let result = store.create_version(&snap(json!({"x": 2})), None, false);
        assert!(matches!(result, Err(StoreError::Io(_))));
        assert_eq!(store.current_version_number().unwrap(), 1);
        assert!(!store.dir().join("version_000002.json").exists());
        assert_eq!(numbers(&store), vec![1]);

        let leftovers: Vec<_> = std::fs::read_dir(store.dir())
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.is_file() && p.to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "temp files left behind: {leftovers:?}");
    }

    #[test]
    fn parse_file_number_cases() {
        assert_eq!(parse_file_number("version_000042.json"), Some(42));
        assert_eq!(parse_file_number("version_1234567.json"), Some(1_234_567));
        assert_eq!(parse_file_number("version_1.json"), None);
        assert_eq!(parse_file_number("version_0001.json"), None);
        assert_eq!(parse_file_number("version_0000001.json"), None);
        assert_eq!(parse_file_number("version_000000.json"), None);
        assert_eq!(parse_file_number("version_.json"), None);
        assert_eq!(parse_file_number("version_-1.json"), None);
        assert_eq!(parse_file_number("version_000001.json.tmp"), None);
        assert_eq!(parse_file_number("other_000001.json"), None);
    }
}
