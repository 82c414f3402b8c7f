use gentax_core::{GentaxError, GentaxResult, Turn};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

/// Trait for session transcript storage backends.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns a snapshot of the session's turns, seeding a new session
    /// with a single system turn when the id is unknown. In-memory only;
    /// nothing is written to disk until [`SessionStore::persist`].
    async fn get_or_create(&self, id: &str, system_prompt: &str) -> Vec<Turn>;

    /// Appends a turn to an existing session.
    ///
    /// The session must have been seeded via [`SessionStore::get_or_create`];
    /// appending to an unknown id is an error.
    async fn append(&self, id: &str, turn: Turn) -> GentaxResult<()>;

    /// Returns a snapshot of the session's turns, or `None` for an
    /// unknown id.
    async fn transcript(&self, id: &str) -> Option<Vec<Turn>>;

    /// Serializes the entire mapping to storage, replacing any previous
    /// content.
    async fn persist(&self) -> GentaxResult<()>;

    /// Lists all session ids currently in memory.
    async fn session_ids(&self) -> Vec<String>;

    /// Returns the per-session mutual-exclusion handle for `id`.
    ///
    /// Callers that read, mutate, and persist a session across multiple
    /// await points must hold this lock for the whole exchange so that
    /// concurrent chats against the same session serialize instead of
    /// interleaving. Distinct sessions lock independently.
    fn lock_session(&self, id: &str) -> Arc<Mutex<()>>;
}

/// File-based session store: one JSON document mapping session id to its
/// ordered `[{role, content}]` transcript, loaded once at startup and
/// rewritten in full on every persist.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    sessions: RwLock<HashMap<String, Vec<Turn>>>,
    locks: parking_lot::Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl FileSessionStore {
    /// Loads the store from `path`.
    ///
    /// A missing file starts the store empty; a present-but-unparseable
    /// file is a hard error so the process never starts on top of a
    /// corrupt transcript history.
    pub async fn load(path: PathBuf) -> GentaxResult<Self> {
        let sessions = if path.exists() {
            let data = tokio::fs::read_to_string(&path).await.map_err(|e| {
                GentaxError::Session(format!(
                    "Failed to read session store '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            let sessions: HashMap<String, Vec<Turn>> =
                serde_json::from_str(&data).map_err(|e| {
                    GentaxError::Session(format!(
                        "Corrupt session store '{}': {}",
                        path.display(),
                        e
                    ))
                })?;
            info!(sessions = sessions.len(), path = %path.display(), "Session store loaded");
            sessions
        } else {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
            HashMap::new()
        };

        Ok(Self {
            path,
            sessions: RwLock::new(sessions),
            locks: parking_lot::Mutex::new(HashMap::new()),
        })
    }

    /// Number of sessions currently in memory.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether the store holds no sessions.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get_or_create(&self, id: &str, system_prompt: &str) -> Vec<Turn> {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(id.to_string())
            .or_insert_with(|| vec![Turn::system(system_prompt)])
            .clone()
    }

    async fn append(&self, id: &str, turn: Turn) -> GentaxResult<()> {
        let mut sessions = self.sessions.write().await;
        let turns = sessions
            .get_mut(id)
            .ok_or_else(|| GentaxError::Session(format!("Unknown session: {id}")))?;
        turns.push(turn);
        Ok(())
    }

    async fn transcript(&self, id: &str) -> Option<Vec<Turn>> {
        self.sessions.read().await.get(id).cloned()
    }

    async fn persist(&self) -> GentaxResult<()> {
        let sessions = self.sessions.read().await;
        let json = serde_json::to_string_pretty(&*sessions)?;
        drop(sessions);
        tokio::fs::write(&self.path, json).await.map_err(|e| {
            GentaxError::Session(format!(
                "Failed to write session store '{}': {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(())
    }

    async fn session_ids(&self) -> Vec<String> {
        self.sessions.read().await.keys().cloned().collect()
    }

    fn lock_session(&self, id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        locks
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PROMPT: &str = "You are a tax assistant.";

    fn store_path(tmp: &TempDir) -> PathBuf {
        tmp.path().join("sessions.json")
    }

    #[tokio::test]
    async fn new_session_seeds_single_system_turn() {
        let tmp = TempDir::new().unwrap();
        let store = FileSessionStore::load(store_path(&tmp)).await.unwrap();

        let turns = store.get_or_create("s1", PROMPT).await;
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0], Turn::system(PROMPT));

        // A second resolve must not seed again.
        let turns = store.get_or_create("s1", PROMPT).await;
        assert_eq!(turns.len(), 1);
    }

    #[tokio::test]
    async fn append_grows_transcript_in_order() {
        let tmp = TempDir::new().unwrap();
        let store = FileSessionStore::load(store_path(&tmp)).await.unwrap();

        store.get_or_create("s1", PROMPT).await;
        store.append("s1", Turn::user("What is GST?")).await.unwrap();
        store.append("s1", Turn::assistant("A consumption tax.")).await.unwrap();

        let turns = store.transcript("s1").await.unwrap();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0].role, gentax_core::Role::System);
        assert_eq!(turns[1].content, "What is GST?");
        assert_eq!(turns[2].content, "A consumption tax.");
    }

    #[tokio::test]
    async fn append_to_unknown_session_fails() {
        let tmp = TempDir::new().unwrap();
        let store = FileSessionStore::load(store_path(&tmp)).await.unwrap();

        let err = store.append("ghost", Turn::user("hi")).await.unwrap_err();
        assert!(err.to_string().contains("Unknown session"));
    }

    #[tokio::test]
    async fn persist_and_reload_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = store_path(&tmp);

        {
            let store = FileSessionStore::load(path.clone()).await.unwrap();
            store.get_or_create("s1", PROMPT).await;
            store.append("s1", Turn::user("hello")).await.unwrap();
            store.get_or_create("s2", PROMPT).await;
            store.persist().await.unwrap();
        }

        let store = FileSessionStore::load(path).await.unwrap();
        assert_eq!(store.len().await, 2);
        let turns = store.transcript("s1").await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[1], Turn::user("hello"));
        assert_eq!(store.transcript("s2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn persisted_document_is_a_role_content_mapping() {
        let tmp = TempDir::new().unwrap();
        let path = store_path(&tmp);

        let store = FileSessionStore::load(path.clone()).await.unwrap();
        store.get_or_create("s1", PROMPT).await;
        store.append("s1", Turn::user("hello")).await.unwrap();
        store.persist().await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            doc,
            serde_json::json!({
                "s1": [
                    {"role": "system", "content": PROMPT},
                    {"role": "user", "content": "hello"},
                ]
            })
        );
        // Human-readable indentation, not a single line.
        assert!(raw.lines().count() > 1);
    }

    #[tokio::test]
    async fn corrupt_store_fails_to_load() {
        let tmp = TempDir::new().unwrap();
        let path = store_path(&tmp);
        std::fs::write(&path, "{ not json").unwrap();

        let err = FileSessionStore::load(path).await.unwrap_err();
        assert!(err.to_string().contains("Corrupt session store"));
    }

    #[tokio::test]
    async fn missing_file_starts_empty() {
        let tmp = TempDir::new().unwrap();
        let store = FileSessionStore::load(store_path(&tmp)).await.unwrap();
        assert!(store.is_empty().await);
        assert!(store.transcript("nope").await.is_none());
    }

    #[tokio::test]
    async fn lock_session_is_stable_per_id() {
        let tmp = TempDir::new().unwrap();
        let store = FileSessionStore::load(store_path(&tmp)).await.unwrap();

        let a = store.lock_session("s1");
        let b = store.lock_session("s1");
        let c = store.lock_session("s2");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }
}
