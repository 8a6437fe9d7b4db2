//! Saved topic suggestions.
//!
//! A flat, ordered list of topics the user has typed before. It is loaded
//! once at startup and only ever grows.

use parking_lot::Mutex;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TopicStoreError {
    #[error("failed to create topic directory: {0}")]
    CreateDir(#[source] std::io::Error),
    #[error("failed to write topics file: {0}")]
    Write(#[source] std::io::Error),
    #[error("failed to serialize topics: {0}")]
    Serialize(#[source] serde_json::Error),
}

pub struct TopicStore {
    path: PathBuf,
    topics: Mutex<Vec<String>>,
}

impl TopicStore {
    /// Load topics from `path`. A missing or unreadable file starts empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let topics = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Vec<String>>(&contents) {
                Ok(topics) => dedup(topics),
                Err(e) => {
                    log::warn!(
                        "Ignoring malformed topics file {}: {}",
                        path.display(),
                        e
                    );
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                log::warn!("Failed to read topics file {}: {}", path.display(), e);
                Vec::new()
            }
        };
        log::info!("Loaded {} saved topic(s)", topics.len());

        Self {
            path,
            topics: Mutex::new(topics),
        }
    }

    pub fn list(&self) -> Vec<String> {
        self.topics.lock().clone()
    }

    /// Record a topic when the topic field loses focus.
    ///
    /// Returns `Ok(true)` when the topic was new and has been persisted.
    /// The in-memory list only grows once the file write succeeded.
    pub fn remember(&self, topic: &str) -> Result<bool, TopicStoreError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Ok(false);
        }

        let mut topics = self.topics.lock();
        if topics.iter().any(|existing| existing == topic) {
            return Ok(false);
        }
        let mut next = topics.clone();
        next.push(topic.to_string());
        self.persist(&next)?;
        *topics = next;
        log::debug!("Saved topic '{}' ({} total)", topic, topics.len());
        Ok(true)
    }

    fn persist(&self, topics: &[String]) -> Result<(), TopicStoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(TopicStoreError::CreateDir)?;
        }
        let json = serde_json::to_vec_pretty(topics).map_err(TopicStoreError::Serialize)?;
        fs::write(&self.path, json).map_err(TopicStoreError::Write)
    }
}

fn dedup(topics: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(topics.len());
    for topic in topics {
        if !unique.contains(&topic) {
            unique.push(topic);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempdir().unwrap();
        let store = TopicStore::load(dir.path().join("topics.json"));
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_remember_appends_once_and_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("topics.json");
        let store = TopicStore::load(&path);

        assert!(store.remember("  Data Structures ").unwrap());
        assert!(!store.remember("Data Structures").unwrap());
        assert!(!store.remember("   ").unwrap());
        assert!(store.remember("Graph Theory").unwrap());

        assert_eq!(store.list(), vec!["Data Structures", "Graph Theory"]);

        let reloaded = TopicStore::load(&path);
        assert_eq!(reloaded.list(), vec!["Data Structures", "Graph Theory"]);
    }

    #[test]
    fn test_failed_write_keeps_list_unchanged() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("data");
        fs::write(&blocker, "not a directory").unwrap();
        let store = TopicStore::load(blocker.join("topics.json"));

        assert!(store.remember("Graphs").is_err());
        assert!(store.list().is_empty());
        assert!(store.remember("Graphs").is_err());

        fs::remove_file(&blocker).unwrap();
        assert!(store.remember("Graphs").unwrap());
        assert_eq!(store.list(), vec!["Graphs"]);
    }

    #[test]
    fn test_malformed_file_is_ignored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("topics.json");
        fs::write(&path, "{not json").unwrap();
        let store = TopicStore::load(&path);
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_duplicates_in_file_are_collapsed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("topics.json");
        fs::write(&path, r#"["A", "B", "A"]"#).unwrap();
        assert_eq!(TopicStore::load(&path).list(), vec!["A", "B"]);
    }
}
