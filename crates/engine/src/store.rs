//! Single-slot session cache.
//!
//! The store only ever holds the exported caption text, the session name and
//! a media reference. It can be rebuilt from an export at any time.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{EngineError, Result};

/// Fixed slot key; the editor keeps exactly one session.
pub const SESSION_SLOT: &str = "current";

/// Persisted session payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub name: String,
    pub track_text: String,
    pub media_path: Option<PathBuf>,
}

/// Persistence seam for the session cache.
pub trait SessionStore {
    fn save(&mut self, session: &StoredSession) -> Result<()>;

    fn load(&self) -> Result<Option<StoredSession>>;

    fn clear(&mut self) -> Result<()>;
}

/// Store kept in memory for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    slot: Option<StoredSession>,
}

impl SessionStore for MemorySessionStore {
    fn save(&mut self, session: &StoredSession) -> Result<()> {
        self.slot = Some(session.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<StoredSession>> {
        Ok(self.slot.clone())
    }

    fn clear(&mut self) -> Result<()> {
        self.slot = None;
        Ok(())
    }
}

/// Store writing the slot as JSON into a directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{SESSION_SLOT}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn save(&mut self, session: &StoredSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| EngineError::StoreIo {
                context: "failed to create session directory",
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(session).map_err(|source| {
            EngineError::StoreSerialization {
                path: self.path.clone(),
                source,
            }
        })?;
        std::fs::write(&self.path, json).map_err(|source| EngineError::StoreIo {
            context: "failed to write session",
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), name = %session.name, "session saved");
        Ok(())
    }

    fn load(&self) -> Result<Option<StoredSession>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no stored session");
                return Ok(None);
            }
            Err(source) => {
                return Err(EngineError::StoreIo {
                    context: "failed to read session",
                    path: self.path.clone(),
                    source,
                });
            }
        };
        let session = serde_json::from_str(&raw).map_err(|source| {
            EngineError::StoreSerialization {
                path: self.path.clone(),
                source,
            }
        })?;
        Ok(Some(session))
    }

    fn clear(&mut self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(EngineError::StoreIo {
                context: "failed to remove session",
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{FileSessionStore, MemorySessionStore, SessionStore, StoredSession};
    use crate::error::EngineError;

    fn sample_session() -> StoredSession {
        StoredSession {
            name: "episode-01.srt".to_string(),
            track_text: "1\n00:00:01,000 --> 00:00:02,000\nhi\n".to_string(),
            media_path: Some(PathBuf::from("episode-01.mp4")),
        }
    }

    #[test]
    fn file_store_round_trips_session() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut store = FileSessionStore::new(dir.path());

        assert_eq!(store.load().expect("load empty"), None);
        store.save(&sample_session()).expect("save");
        assert_eq!(store.load().expect("load"), Some(sample_session()));

        store.clear().expect("clear");
        assert_eq!(store.load().expect("load cleared"), None);
        store.clear().expect("clearing twice is fine");
    }

    #[test]
    fn file_store_reports_corrupt_slot() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FileSessionStore::new(dir.path());
        std::fs::write(store.path(), "not json").expect("write corrupt slot");

        assert!(matches!(
            store.load(),
            Err(EngineError::StoreSerialization { .. })
        ));
    }

    #[test]
    fn memory_store_overwrites_single_slot() {
        let mut store = MemorySessionStore::default();
        store.save(&sample_session()).expect("save");
        let replacement = StoredSession {
            name: "other".to_string(),
            ..StoredSession::default()
        };
        store.save(&replacement).expect("save again");
        assert_eq!(store.load().expect("load"), Some(replacement));
    }
}
