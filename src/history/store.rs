//! On-disk mirror of the chat history.
//!
//! The snapshot is one JSON file holding every turn. It is read once at start-up
//! and rewritten in full after every cycle. Writes go to a temporary file in the
//! same directory which is then renamed over the target, so a reader never sees
//! a half-written snapshot.

use crate::error::Result;
use crate::history::log::History;
use crate::history::turn::Turn;
use crate::llm::models::MessageRole;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use uuid::Uuid;

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    turns: &'a [Turn],
}

#[derive(Deserialize)]
struct Snapshot {
    turns: Vec<Turn>,
}

/// Layouts accepted when reading a snapshot.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredHistory {
    Current(Snapshot),
    /// Bare `[["user", "..."], ["assistant", "..."]]` pairs with no pairing keys.
    Legacy(Vec<(MessageRole, String)>),
}

impl StoredHistory {
    fn into_history(self) -> History {
        match self {
            StoredHistory::Current(snapshot) => History::from(snapshot.turns),
            StoredHistory::Legacy(pairs) => upgrade_legacy(pairs),
        }
    }
}

/// Assign pairing keys by adjacency: a reply joins the exchange of the user
/// turn right before it.
fn upgrade_legacy(pairs: Vec<(MessageRole, String)>) -> History {
    let mut history = History::new();
    let mut open_exchange: Option<Uuid> = None;

    for (role, text) in pairs {
        let turn = match role {
            MessageRole::User => {
                let turn = Turn::user(text);
                open_exchange = Some(turn.exchange());
                turn
            }
            MessageRole::Assistant => {
                let exchange = open_exchange.take().unwrap_or_else(Uuid::new_v4);
                Turn::assistant(exchange, text)
            }
        };
        history.append(turn);
    }

    history
}

/// Owns the path of the snapshot file.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot, or start empty.
    ///
    /// A missing file means no history. A file that cannot be read or parsed is
    /// moved aside to `<name>.corrupt` and an empty history is returned.
    pub fn load(&self) -> History {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No history snapshot found, starting empty");
            return History::new();
        }

        match self.read_snapshot() {
            Ok(history) => {
                info!(path = %self.path.display(), turns = history.len(), "Loaded history");
                history
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to load history");
                self.quarantine();
                History::new()
            }
        }
    }

    /// Overwrite the snapshot with the full history.
    pub fn persist(&self, history: &History) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let bytes = serde_json::to_vec_pretty(&SnapshotRef {
            version: SNAPSHOT_VERSION,
            turns: history.turns(),
        })?;

        let mut file = NamedTempFile::new_in(&dir)?;
        file.write_all(&bytes)?;
        file.as_file().sync_all()?;
        file.persist(&self.path)?;

        debug!(path = %self.path.display(), turns = history.len(), "Persisted history");
        Ok(())
    }

    fn read_snapshot(&self) -> Result<History> {
        let content = fs::read_to_string(&self.path)?;
        let stored: StoredHistory = serde_json::from_str(&content)?;
        Ok(stored.into_history())
    }

    fn quarantine_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".corrupt");
        PathBuf::from(name)
    }

    fn quarantine(&self) {
        let target = self.quarantine_path();
        match fs::rename(&self.path, &target) {
            Ok(()) => warn!(path = %target.display(), "Moved unreadable history aside"),
            Err(e) => warn!(error = %e, "Failed to move unreadable history aside"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_history() -> History {
        let mut history = History::new();
        for (prompt, reply) in [("Hello", "Hi there"), ("Second\nline", "❌ Error from API")] {
            let user = Turn::user(prompt);
            let key = user.exchange();
            history.append(user);
            history.append(Turn::assistant(key, reply));
        }
        history
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::new(dir.path().join("chat_history.json"));

        assert!(store.load().is_empty());
    }

    #[test]
    fn test_persist_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::new(dir.path().join("chat_history.json"));
        let history = sample_history();

        store.persist(&history).unwrap();
        let loaded = store.load();

        assert_eq!(loaded, history);
    }

    #[test]
    fn test_persist_overwrites_previous_snapshot() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::new(dir.path().join("chat_history.json"));

        store.persist(&sample_history()).unwrap();
        let mut shorter = History::new();
        shorter.append(Turn::user("only"));
        store.persist(&shorter).unwrap();

        let loaded = store.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.turn_at(0).unwrap().text(), "only");
    }

    #[test]
    fn test_persist_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("chat_history.json");
        let store = HistoryStore::new(&path);

        store.persist(&sample_history()).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_persist_leaves_no_temporary_files() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::new(dir.path().join("chat_history.json"));

        store.persist(&sample_history()).unwrap();
        store.persist(&sample_history()).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_snapshot_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chat_history.json");
        let store = HistoryStore::new(&path);

        store.persist(&sample_history()).unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(raw["version"], 1);
        assert_eq!(raw["turns"].as_array().unwrap().len(), 4);
        assert_eq!(raw["turns"][0]["role"], "user");
        assert_eq!(raw["turns"][0]["text"], "Hello");
        assert_eq!(raw["turns"][0]["exchange"], raw["turns"][1]["exchange"]);
    }

    #[test]
    fn test_load_legacy_pairs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chat_history.json");
        fs::write(
            &path,
            r#"[["user","Hello"],["assistant","Hi"],["user","Again"],["assistant","Sure"]]"#,
        )
        .unwrap();

        let history = HistoryStore::new(&path).load();

        assert_eq!(history.len(), 4);
        let (prompt, reply) = history.pair_at(2).unwrap();
        assert_eq!(prompt.text(), "Again");
        assert_eq!(reply.text(), "Sure");
        assert_ne!(
            history.turn_at(0).unwrap().exchange(),
            history.turn_at(2).unwrap().exchange()
        );
    }

    #[test]
    fn test_legacy_orphan_reply_gets_own_exchange() {
        let history = upgrade_legacy(vec![
            (MessageRole::Assistant, "orphan".to_string()),
            (MessageRole::User, "Hello".to_string()),
            (MessageRole::Assistant, "Hi".to_string()),
        ]);

        assert_eq!(history.len(), 3);
        assert!(history.pair_at(1).is_ok());
        assert_ne!(
            history.turn_at(0).unwrap().exchange(),
            history.turn_at(1).unwrap().exchange()
        );
    }

    #[test]
    fn test_load_corrupt_file_fails_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chat_history.json");
        fs::write(&path, "{not json").unwrap();
        let store = HistoryStore::new(&path);

        let history = store.load();

        assert!(history.is_empty());
        assert!(!path.exists());
        let quarantined = dir.path().join("chat_history.json.corrupt");
        assert_eq!(fs::read_to_string(quarantined).unwrap(), "{not json");
    }
}
