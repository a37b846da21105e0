// ── Session persistence ──
//
// Local persisted state mirrors browser storage: two string entries, the
// token and the serialized user record. Writes replace both entries
// wholesale; only one session is ever active per store.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CoreError;
use crate::session::{Session, UserRecord};

/// Where the session lives between invocations.
pub trait SessionStore: Send + Sync {
    /// The persisted token, if any.
    fn token(&self) -> Result<Option<SecretString>, CoreError>;

    /// The persisted user record, if any.
    fn user(&self) -> Result<Option<UserRecord>, CoreError>;

    /// Persist a session, replacing whatever was stored.
    fn save(&self, session: &Session) -> Result<(), CoreError>;

    /// Remove the session. Clearing an empty store is a no-op.
    fn clear(&self) -> Result<(), CoreError>;
}

// ── In-memory ────────────────────────────────────────────────────────

/// Process-local store. Used by embedders that manage persistence
/// themselves, and by tests.
#[derive(Default)]
pub struct MemorySessionStore {
    current: ArcSwapOption<Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn token(&self) -> Result<Option<SecretString>, CoreError> {
        Ok(self.current.load().as_ref().map(|s| s.token.clone()))
    }

    fn user(&self) -> Result<Option<UserRecord>, CoreError> {
        Ok(self.current.load().as_ref().map(|s| s.user.clone()))
    }

    fn save(&self, session: &Session) -> Result<(), CoreError> {
        self.current.store(Some(Arc::new(session.clone())));
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        self.current.store(None);
        Ok(())
    }
}

// ── File-backed ──────────────────────────────────────────────────────

/// On-disk layout: both entries are strings, the user record being its
/// JSON serialization.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredEntries {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<String>,
}

/// A JSON file holding the `token` and `user` entries.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn storage_err(&self, reason: impl std::fmt::Display) -> CoreError {
        CoreError::Storage {
            path: self.path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    fn read(&self) -> Result<StoredEntries, CoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(StoredEntries::default()),
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| self.storage_err(e)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoredEntries::default()),
            Err(e) => Err(self.storage_err(e)),
        }
    }
}

impl SessionStore for FileSessionStore {
    fn token(&self) -> Result<Option<SecretString>, CoreError> {
        Ok(self
            .read()?
            .token
            .filter(|t| !t.is_empty())
            .map(SecretString::from))
    }

    fn user(&self) -> Result<Option<UserRecord>, CoreError> {
        self.read()?
            .user
            .map(|raw| serde_json::from_str(&raw).map_err(|e| self.storage_err(e)))
            .transpose()
    }

    /// The file carries a bearer token: written owner-only, then renamed
    /// into place.
    fn save(&self, session: &Session) -> Result<(), CoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| self.storage_err(e))?;
        let entries = StoredEntries {
            token: Some(session.token.expose_secret().to_owned()),
            user: Some(serde_json::to_string(&session.user).map_err(|e| self.storage_err(e))?),
        };
        let contents = serde_json::to_string_pretty(&entries).map_err(|e| self.storage_err(e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| self.storage_err(e))?;
        tmp.write_all(contents.as_bytes()).map_err(|e| self.storage_err(e))?;
        tmp.flush().map_err(|e| self.storage_err(e))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(tmp.path(), std::fs::Permissions::from_mode(0o600))
                .map_err(|e| self.storage_err(e))?;
        }
        tmp.persist(&self.path).map_err(|e| self.storage_err(e.error))?;
        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "session cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.storage_err(e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn session(token: &str) -> Session {
        Session::new(
            SecretString::from(token.to_owned()),
            UserRecord::from_value(Some(json!({"id": 1, "email": "ada@shop.io"}))),
        )
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemorySessionStore::new();
        assert!(store.token().unwrap().is_none());

        store.save(&session("t1")).unwrap();
        assert_eq!(store.token().unwrap().unwrap().expose_secret(), "t1");
        assert_eq!(store.user().unwrap().unwrap().email(), Some("ada@shop.io"));

        store.save(&session("t2")).unwrap();
        assert_eq!(store.token().unwrap().unwrap().expose_secret(), "t2");

        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.token().unwrap().is_none());
        assert!(store.user().unwrap().is_none());
    }

    #[test]
    fn file_store_writes_two_string_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions").join("default.json");
        let store = FileSessionStore::new(&path);

        store.save(&session("jwt-1")).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["token"], "jwt-1");
        assert!(raw["user"].is_string());

        let reopened = FileSessionStore::new(&path);
        assert_eq!(reopened.token().unwrap().unwrap().expose_secret(), "jwt-1");
        assert_eq!(reopened.user().unwrap().unwrap().id(), Some(&json!(1)));
    }

    #[cfg(unix)]
    #[test]
    fn file_store_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        std::fs::write(&path, "{}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let store = FileSessionStore::new(&path);
        store.save(&session("jwt")).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0, "session file mode {:o}", mode & 0o777);
        assert_eq!(store.token().unwrap().unwrap().expose_secret(), "jwt");
    }

    #[test]
    fn file_store_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("s.json"));

        store.clear().unwrap();
        store.save(&session("jwt")).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();

        assert!(store.token().unwrap().is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FileSessionStore::new(&path).token().unwrap_err();
        assert!(matches!(err, CoreError::Storage { .. }), "{err:?}");
    }
}
