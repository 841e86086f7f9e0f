use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Minimal key-value persistence seam. Writes are fire-and-forget: no
/// read-modify-write atomicity is promised or needed here.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Session-lifetime store. Stands in for whatever the host environment
/// persists with.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// Durable store keeping one file per key, so difficult-word marks
/// survive the process. Writes stay fire-and-forget: a failed write is
/// reported, never fatal.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Store under the user data directory, falling back to the
    /// working directory.
    pub fn default_location() -> Self {
        let dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shengci");
        Self::new(dir)
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        self.dir.join(name)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) {
        let result = fs::create_dir_all(&self.dir)
            .and_then(|_| fs::write(self.path_for(key), value));
        if let Err(e) = result {
            eprintln!("Warning: failed to persist '{}': {}", key, e);
        }
    }
}

fn difficult_key(book_id: &str) -> String {
    format!("difficult:{}", book_id)
}

/// Headwords the learner has marked as difficult for one book.
pub fn difficult_words(store: &dyn KeyValueStore, book_id: &str) -> Vec<String> {
    store
        .get(&difficult_key(book_id))
        .map(|value| {
            value
                .lines()
                .map(str::trim)
                .filter(|word| !word.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Adds a headword to the book's difficult list. Duplicates are kept
/// out; the write itself is fire-and-forget.
pub fn mark_difficult(store: &mut dyn KeyValueStore, book_id: &str, headword: &str) {
    let mut words = difficult_words(store, book_id);
    if words.iter().any(|word| word == headword) {
        return;
    }
    words.push(headword.to_string());
    store.set(&difficult_key(book_id), &words.join("\n"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marked_words_round_trip() {
        let mut store = MemoryStore::default();
        mark_difficult(&mut store, "book1", "你好");
        mark_difficult(&mut store, "book1", "謝謝");
        assert_eq!(difficult_words(&store, "book1"), vec!["你好", "謝謝"]);
    }

    #[test]
    fn marking_twice_keeps_one_entry() {
        let mut store = MemoryStore::default();
        mark_difficult(&mut store, "book1", "你好");
        mark_difficult(&mut store, "book1", "你好");
        assert_eq!(difficult_words(&store, "book1").len(), 1);
    }

    #[test]
    fn file_store_marks_survive_a_new_instance() {
        let dir = std::env::temp_dir().join(format!("shengci-store-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        let mut store = FileStore::new(dir.clone());
        mark_difficult(&mut store, "book1", "你好");
        mark_difficult(&mut store, "book1", "謝謝");

        // A fresh instance over the same directory sees the marks.
        let reopened = FileStore::new(dir.clone());
        assert_eq!(difficult_words(&reopened, "book1"), vec!["你好", "謝謝"]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_store_misses_cleanly_on_unwritten_keys() {
        let store = FileStore::new(std::env::temp_dir().join("shengci-store-missing"));
        assert!(store.get("difficult:book1").is_none());
        assert!(difficult_words(&store, "book1").is_empty());
    }

    #[test]
    fn books_do_not_share_lists() {
        let mut store = MemoryStore::default();
        mark_difficult(&mut store, "book1", "你好");
        assert!(difficult_words(&store, "book2").is_empty());
    }
}
