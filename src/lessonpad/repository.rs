//! # Lesson Repository
//!
//! Mediates every read and write of lessons against a [`KeyValueStore`].
//!
//! ## Key Layout
//!
//! Each lesson lives under `<prefix>_<uuid>`, where the prefix defaults to
//! [`DEFAULT_KEY_PREFIX`]. The uuid is assigned once at creation and is the
//! only handle used to find the lesson again: updates and deletes never match
//! on list position or field values.
//!
//! Keys that start with the prefix but carry no uuid are *legacy* entries,
//! written by older versions under a creation timestamp (`lessonPlan_<millis>`)
//! or a list position (`lessonPlan<n>`). A uuid in any form other than
//! lowercase hyphenated counts as legacy too, since lookups build that form. They are reported by [`scan`] and
//! rewritten under fresh ids by [`migrate_legacy`]; they are never returned by
//! [`list_all`].
//!
//! ## Delete Policy
//!
//! Deleting is strict: deleting an id that is not stored fails with
//! [`LessonError::NotFound`], including a second delete of the same id.
//!
//! [`scan`]: LessonRepository::scan
//! [`migrate_legacy`]: LessonRepository::migrate_legacy
//! [`list_all`]: LessonRepository::list_all

use crate::error::{LessonError, Result};
use crate::model::{Lesson, LessonRecord, Metadata};
use crate::store::KeyValueStore;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

pub const DEFAULT_KEY_PREFIX: &str = "lessonPlan";

/// Millisecond timestamps before this are treated as list positions, not dates.
const MIN_LEGACY_TIMESTAMP_MS: i64 = 1_000_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
enum KeyKind {
    Lesson(Uuid),
    Legacy,
    Foreign,
}

/// A stored value that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub key: String,
    pub reason: String,
}

/// Everything found under the lesson namespace.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Decoded lessons, newest first.
    pub lessons: Vec<Lesson>,
    pub skipped: Vec<SkippedEntry>,
    pub legacy_keys: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigratedEntry {
    pub old_key: String,
    pub id: Uuid,
}

#[derive(Debug, Default)]
pub struct MigrationReport {
    pub migrated: Vec<MigratedEntry>,
    /// Entries left untouched because they do not decode.
    pub unreadable: Vec<SkippedEntry>,
}

pub struct LessonRepository<S: KeyValueStore> {
    store: S,
    prefix: String,
}

impl<S: KeyValueStore> LessonRepository<S> {
    pub fn new(store: S) -> Self {
        Self::with_prefix(store, DEFAULT_KEY_PREFIX)
    }

    pub fn with_prefix(store: S, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn key_for(&self, id: &Uuid) -> String {
        format!("{}_{}", self.prefix, id)
    }

    fn classify(&self, key: &str) -> KeyKind {
        let Some(rest) = key.strip_prefix(self.prefix.as_str()) else {
            return KeyKind::Foreign;
        };
        if let Some(suffix) = rest.strip_prefix('_')
            && let Ok(id) = Uuid::parse_str(suffix)
            && suffix == id.hyphenated().to_string()
        {
            return KeyKind::Lesson(id);
        }
        KeyKind::Legacy
    }

    /// All decodable lessons, newest first. Undecodable entries are logged
    /// and skipped.
    pub fn list_all(&self) -> Result<Vec<Lesson>> {
        Ok(self.scan()?.lessons)
    }

    /// Walks the lesson namespace, decoding what it can and reporting the rest.
    pub fn scan(&self) -> Result<ScanReport> {
        let mut report = ScanReport::default();

        for key in self.store.keys()? {
            let kind = self.classify(&key);
            if kind == KeyKind::Foreign {
                continue;
            }
            let Some(value) = self.store.get(&key)? else {
                continue;
            };

            match kind {
                KeyKind::Lesson(id) => match Lesson::decode(&value) {
                    Ok(mut lesson) => {
                        if lesson.metadata.id != id {
                            warn!(%key, stored_id = %lesson.metadata.id, "stored id differs from key, using key");
                            lesson.metadata.id = id;
                        }
                        report.lessons.push(lesson);
                    }
                    Err(e) => {
                        warn!(%key, error = %e, "skipping undecodable lesson");
                        report.skipped.push(SkippedEntry {
                            key,
                            reason: e.to_string(),
                        });
                    }
                },
                KeyKind::Legacy => match LessonRecord::decode(&value) {
                    Ok(_) => report.legacy_keys.push(key),
                    Err(e) => {
                        warn!(%key, error = %e, "skipping undecodable legacy entry");
                        report.skipped.push(SkippedEntry {
                            key,
                            reason: e.to_string(),
                        });
                    }
                },
                KeyKind::Foreign => {}
            }
        }

        report.lessons.sort_by(|a, b| {
            b.metadata
                .created_at
                .cmp(&a.metadata.created_at)
                .then_with(|| a.metadata.id.cmp(&b.metadata.id))
        });
        Ok(report)
    }

    pub fn get(&self, id: &Uuid) -> Result<Lesson> {
        let key = self.key_for(id);
        let value = self.store.get(&key)?.ok_or(LessonError::NotFound(*id))?;
        let mut lesson = Lesson::decode(&value).map_err(|source| LessonError::Decode { key, source })?;
        lesson.metadata.id = *id;
        Ok(lesson)
    }

    /// Stores `record` under a freshly assigned id.
    pub fn create(&mut self, record: LessonRecord) -> Result<Lesson> {
        let lesson = self.unique(Lesson::new(record))?;
        self.write(&lesson)?;
        debug!(id = %lesson.id(), topic = %lesson.record.topic, "lesson created");
        Ok(lesson)
    }

    /// Replaces the record stored under `id`, keeping its key and creation time.
    pub fn update(&mut self, id: &Uuid, record: LessonRecord) -> Result<Lesson> {
        let mut lesson = self.get(id)?;
        lesson.record = record;
        lesson.metadata.updated_at = Utc::now();
        self.write(&lesson)?;
        debug!(%id, "lesson updated");
        Ok(lesson)
    }

    pub fn delete(&mut self, id: &Uuid) -> Result<()> {
        let key = self.key_for(id);
        if self.store.get(&key)?.is_none() {
            return Err(LessonError::NotFound(*id));
        }
        self.store.remove(&key)?;
        debug!(%id, "lesson deleted");
        Ok(())
    }

    /// Rewrites every legacy entry under a canonical key and removes the old
    /// one. Entries that already carry metadata keep their id and timestamps
    /// unless the id is taken.
    pub fn migrate_legacy(&mut self) -> Result<MigrationReport> {
        let scan = self.scan()?;
        let mut report = MigrationReport {
            unreadable: scan.skipped,
            ..MigrationReport::default()
        };

        for old_key in scan.legacy_keys {
            let Some(value) = self.store.get(&old_key)? else {
                continue;
            };
            let lesson = match Lesson::decode(&value) {
                Ok(stored) => stored,
                Err(_) => {
                    let record = LessonRecord::decode(&value).map_err(|source| {
                        LessonError::Decode {
                            key: old_key.clone(),
                            source,
                        }
                    })?;
                    let created_at = self.legacy_timestamp(&old_key).unwrap_or_else(Utc::now);
                    Lesson {
                        metadata: Metadata::stamped_at(created_at),
                        record,
                    }
                }
            };
            let lesson = self.unique(lesson)?;

            self.write(&lesson)?;
            self.store.remove(&old_key)?;
            debug!(%old_key, id = %lesson.id(), "legacy lesson migrated");
            report.migrated.push(MigratedEntry {
                old_key,
                id: lesson.id(),
            });
        }

        Ok(report)
    }

    fn legacy_timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        let rest = key.strip_prefix(self.prefix.as_str())?;
        let millis: i64 = rest.trim_start_matches('_').parse().ok()?;
        if millis < MIN_LEGACY_TIMESTAMP_MS {
            return None;
        }
        DateTime::from_timestamp_millis(millis)
    }

    fn unique(&self, mut lesson: Lesson) -> Result<Lesson> {
        while self.store.get(&self.key_for(&lesson.metadata.id))?.is_some() {
            lesson.metadata.id = Uuid::new_v4();
        }
        Ok(lesson)
    }

    fn write(&mut self, lesson: &Lesson) -> Result<()> {
        let value = lesson.encode().map_err(LessonError::Serialization)?;
        let key = self.key_for(&lesson.metadata.id);
        self.store.set(&key, &value)
    }
}
