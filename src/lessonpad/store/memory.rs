use super::KeyValueStore;
use crate::error::{LessonError, Result};
use std::collections::BTreeMap;

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: BTreeMap<String, String>,
    simulate_write_error: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set`/`remove` fail, for error-path tests.
    pub fn set_simulate_write_error(&mut self, simulate: bool) {
        self.simulate_write_error = simulate;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_writable(&self) -> Result<()> {
        if self.simulate_write_error {
            return Err(LessonError::Store("Simulated write error".to_string()));
        }
        Ok(())
    }
}

impl KeyValueStore for InMemoryStore {
    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.check_writable()?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.check_writable()?;
        self.entries.remove(key);
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{Lesson, LessonRecord, OutlineItem};

    pub const PREFIX: &str = "lessonPlan";

    pub fn record(topic: &str, subject: &str, grade_level: &str) -> LessonRecord {
        LessonRecord {
            topic: topic.to_string(),
            subject: subject.to_string(),
            grade_level: grade_level.to_string(),
            date: "2024-03-01".to_string(),
            lesson_outline: vec![OutlineItem::new("10m", "Intro", "")],
            ..LessonRecord::default()
        }
    }

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_lessons(mut self, count: usize) -> Self {
            for i in 0..count {
                let lesson = Lesson::new(record(&format!("Topic {}", i + 1), "Math", "5"));
                let key = format!("{}_{}", PREFIX, lesson.id());
                self.store.set(&key, &lesson.encode().unwrap()).unwrap();
            }
            self
        }

        /// A value under the lesson namespace that does not decode.
        pub fn with_corrupt_entry(mut self, suffix: &str) -> Self {
            let key = format!("{}_{}", PREFIX, suffix);
            self.store.set(&key, "{not json").unwrap();
            self
        }

        /// A bare record under a key the way older versions wrote them.
        pub fn with_legacy_entry(mut self, key: &str, topic: &str) -> Self {
            let value = record(topic, "Science", "4").encode().unwrap();
            self.store.set(key, &value).unwrap();
            self
        }

        /// A key outside the lesson namespace.
        pub fn with_foreign_entry(mut self, key: &str, value: &str) -> Self {
            self.store.set(key, value).unwrap();
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let mut store = InMemoryStore::new();
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));

        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));

        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn keys_are_sorted() {
        let mut store = InMemoryStore::new();
        store.set("b", "").unwrap();
        store.set("a", "").unwrap();
        store.set("c", "").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn removing_absent_key_is_noop() {
        let mut store = InMemoryStore::new();
        store.remove("missing").unwrap();
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn simulated_write_error() {
        let mut store = InMemoryStore::new();
        store.set("a", "1").unwrap();
        store.set_simulate_write_error(true);

        assert!(matches!(store.set("b", "2"), Err(LessonError::Store(_))));
        assert!(store.remove("a").is_err());
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
    }
}
