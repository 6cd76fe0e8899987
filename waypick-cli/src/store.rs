/// Saved decisions, one JSON file per user.
///
/// Each user keeps a history of decision sessions; the last one is the
/// current session and is resumed on the next run if it was left unfinished.
/// Files are written to a temporary sibling and renamed into place so an
/// interrupted save never leaves a half-written record.
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use waypick_core::{DecisionSession, Phase};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("saved data at {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user: String,
    pub sessions: Vec<DecisionSession>,
}

impl UserRecord {
    pub fn new(user: impl Into<String>) -> Self {
        UserRecord {
            user: user.into(),
            sessions: Vec::new(),
        }
    }

    pub fn current(&self) -> Option<&DecisionSession> {
        self.sessions.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut DecisionSession> {
        self.sessions.last_mut()
    }

    /// The current session if it is still in progress.
    pub fn unfinished(&self) -> Option<&DecisionSession> {
        self.current()
            .filter(|s| !matches!(s.phase(), Phase::Idle | Phase::Decided))
    }

    /// Start a new session at the end of the history and return it.
    pub fn begin(&mut self) -> &mut DecisionSession {
        self.sessions.push(DecisionSession::new());
        let last = self.sessions.len() - 1;
        &mut self.sessions[last]
    }
}

pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SessionStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File for `user`. Anything outside `[A-Za-z0-9_-]` becomes `_` so a user
    /// name can never point outside the store directory.
    pub fn path_for(&self, user: &str) -> PathBuf {
        let safe: String = user
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        let safe = if safe.is_empty() { "_".to_string() } else { safe };
        self.dir.join(format!("{safe}.json"))
    }

    /// Load the record for `user`, or an empty one if nothing is saved yet.
    pub fn load(&self, user: &str) -> Result<UserRecord, StoreError> {
        let path = self.path_for(user);
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let record = serde_json::from_str(&content)
                    .map_err(|source| StoreError::Corrupt { path: path.clone(), source })?;
                debug!(path = %path.display(), "loaded user record");
                Ok(record)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(UserRecord::new(user)),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    pub fn save(&self, record: &UserRecord) -> Result<(), StoreError> {
        let path = self.path_for(&record.user);
        std::fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let json = serde_json::to_string_pretty(record)
            .map_err(|source| StoreError::Corrupt { path: path.clone(), source })?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|source| StoreError::Io { path: tmp.clone(), source })?;
        std::fs::rename(&tmp, &path).map_err(|source| StoreError::Io { path: path.clone(), source })?;

        debug!(path = %path.display(), sessions = record.sessions.len(), "saved user record");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_user_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        let record = store.load("nobody").unwrap();
        assert_eq!(record, UserRecord::new("nobody"));
        assert!(record.current().is_none());
    }

    #[test]
    fn test_save_and_load_keeps_session_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested"));

        let mut record = UserRecord::new("ann");
        let session = record.begin();
        session.start_adding().unwrap();
        session.add_way("Sea").unwrap();
        session.add_way("Mountains").unwrap();
        store.save(&record).unwrap();

        let loaded = store.load("ann").unwrap();
        assert_eq!(loaded, record);
        let current = loaded.unfinished().unwrap();
        assert_eq!(current.phase(), Phase::AddingWays);
        assert_eq!(current.items().len(), 2);
        assert!(!store.path_for("ann").with_extension("json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        std::fs::write(store.path_for("bob"), "{ not json").unwrap();
        assert!(matches!(store.load("bob"), Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn test_user_names_stay_inside_store() {
        let store = SessionStore::new("/data");
        assert_eq!(store.path_for("../../etc/passwd"), PathBuf::from("/data/______etc_passwd.json"));
        assert_eq!(store.path_for(""), PathBuf::from("/data/_.json"));
        assert_eq!(store.path_for("ann-2_b"), PathBuf::from("/data/ann-2_b.json"));
    }

    #[test]
    fn test_idle_session_is_not_unfinished() {
        let mut record = UserRecord::new("cy");
        record.begin();
        assert!(record.unfinished().is_none());
    }
}
