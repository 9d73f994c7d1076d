//! File-backed store accessor
//!
//! Owns the single backing file: guarantees it exists before a read, loads
//! the full record set, and replaces it atomically by writing a sibling
//! temporary file and renaming it over the original, so a crash mid-write
//! never leaves a truncated or partially-written file.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::warn;

use crate::config::CorruptionPolicy;
use crate::domain::user::User;
use crate::domain::DomainError;

/// Accessor providing whole-file load and whole-file replace semantics for
/// the user record set
///
/// The accessor performs no locking itself; callers bracket each
/// load/compute/replace cycle in their own critical section.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    on_corrupt: CorruptionPolicy,
}

impl FileStore {
    /// Create an accessor for the given path with the fail-closed policy
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            on_corrupt: CorruptionPolicy::default(),
        }
    }

    /// Override the corruption policy
    pub fn with_policy(mut self, policy: CorruptionPolicy) -> Self {
        self.on_corrupt = policy;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Guarantee the backing path exists, creating parent directories and
    /// an empty file if absent
    ///
    /// Idempotent; touches the filesystem only on first use.
    pub async fn ensure(&self) -> Result<(), DomainError> {
        self.ensure_parent().await?;

        // Open without truncating; losing a creation race to another
        // process still leaves a usable file behind
        fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                DomainError::io(format!(
                    "failed to create '{}': {}",
                    self.path.display(),
                    e
                ))
            })?;

        Ok(())
    }

    async fn ensure_parent(&self) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    DomainError::io(format!(
                        "failed to create directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }
        Ok(())
    }

    /// Load the full record set
    ///
    /// An empty or whitespace-only file yields an empty set. Malformed
    /// content surfaces as an I/O failure under
    /// [`CorruptionPolicy::FailClosed`], or is logged and recovered as an
    /// empty set under [`CorruptionPolicy::RecoverEmpty`]; in the latter
    /// case an empty result does not prove that no users exist.
    pub async fn load(&self) -> Result<Vec<User>, DomainError> {
        self.ensure().await?;

        let contents = fs::read_to_string(&self.path).await.map_err(|e| {
            DomainError::io(format!("failed to read '{}': {}", self.path.display(), e))
        })?;

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        match parse_records(&contents) {
            Ok(users) => Ok(users),
            Err(reason) => match self.on_corrupt {
                CorruptionPolicy::FailClosed => Err(DomainError::io(format!(
                    "backing file '{}' is malformed: {}",
                    self.path.display(),
                    reason
                ))),
                CorruptionPolicy::RecoverEmpty => {
                    warn!(
                        "backing file '{}' is malformed, recovering as empty: {}",
                        self.path.display(),
                        reason
                    );
                    Ok(Vec::new())
                }
            },
        }
    }

    /// Replace the full record set atomically
    ///
    /// Serializes the set as a pretty-printed JSON array, writes it to a
    /// sibling temporary file, and renames that over the original. On any
    /// write failure the previous file contents stay intact.
    pub async fn replace(&self, users: &[User]) -> Result<(), DomainError> {
        self.ensure_parent().await?;

        let json = serde_json::to_string_pretty(users)
            .map_err(|e| DomainError::io(format!("failed to serialize record set: {}", e)))?;

        let tmp_path = self.path.with_extension("tmp");

        fs::write(&tmp_path, json).await.map_err(|e| {
            DomainError::io(format!("failed to write '{}': {}", tmp_path.display(), e))
        })?;

        fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            DomainError::io(format!(
                "failed to move '{}' over '{}': {}",
                tmp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }
}

/// Parse the record set and reject records that fail schema validation
fn parse_records(contents: &str) -> Result<Vec<User>, String> {
    let users: Vec<User> = serde_json::from_str(contents).map_err(|e| e.to_string())?;

    for user in &users {
        if user.id() == 0 {
            return Err(format!("record '{}' has a zero id", user.username()));
        }
        if user.username().is_empty() {
            return Err(format!("record {} has an empty username", user.id()));
        }
    }

    Ok(users)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FileStore {
        FileStore::new(dir.path().join("database").join("users.json"))
    }

    #[tokio::test]
    async fn test_ensure_creates_parents_and_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.ensure().await.unwrap();

        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn test_ensure_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.ensure().await.unwrap();
        store
            .replace(&[User::new(1, "alice", "hash")])
            .await
            .unwrap();
        store.ensure().await.unwrap();

        // A second ensure must not truncate existing content
        let users = store.load().await.unwrap();
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn test_load_fresh_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let users = store.load().await.unwrap();
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_load_whitespace_only_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.ensure().await.unwrap();
        tokio::fs::write(store.path(), "  \n\t\n").await.unwrap();

        let users = store.load().await.unwrap();
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_replace_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let written = vec![
            User::new(1, "alice", "hash-a"),
            User::new(2, "bob", "hash-b"),
        ];
        store.replace(&written).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, written);
    }

    #[tokio::test]
    async fn test_replace_leaves_no_temporary_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store
            .replace(&[User::new(1, "alice", "hash")])
            .await
            .unwrap();

        assert!(!store.path().with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_on_disk_format_is_a_json_array() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store
            .replace(&[User::new(1, "alice", "hash")])
            .await
            .unwrap();

        let raw = tokio::fs::read_to_string(store.path()).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        let records = value.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["id"], 1);
        assert_eq!(records[0]["username"], "alice");
        assert_eq!(records[0]["password_hash"], "hash");
    }

    #[tokio::test]
    async fn test_malformed_file_fails_closed_by_default() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.ensure().await.unwrap();
        tokio::fs::write(store.path(), "{not json").await.unwrap();

        let result = store.load().await;
        assert!(matches!(result, Err(DomainError::Io { .. })));
    }

    #[tokio::test]
    async fn test_malformed_file_recovers_empty_when_configured() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).with_policy(CorruptionPolicy::RecoverEmpty);

        store.ensure().await.unwrap();
        tokio::fs::write(store.path(), "{not json").await.unwrap();

        let users = store.load().await.unwrap();
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_schema_invalid_record_is_treated_as_corruption() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.ensure().await.unwrap();
        tokio::fs::write(
            store.path(),
            r#"[{"id":0,"username":"zero","password_hash":"h"}]"#,
        )
        .await
        .unwrap();

        let result = store.load().await;
        assert!(matches!(result, Err(DomainError::Io { .. })));
    }

    #[tokio::test]
    async fn test_interrupted_replace_leaves_previous_contents_intact() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let written = vec![User::new(1, "alice", "hash")];
        store.replace(&written).await.unwrap();

        // Simulate a writer that died after producing the temporary file
        // but before the final rename
        tokio::fs::write(store.path().with_extension("tmp"), "garbage")
            .await
            .unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, written);
    }
}
