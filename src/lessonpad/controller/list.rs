use crate::error::{LessonError, Result};
use crate::index::{self, DisplayLesson, LessonSelector};
use crate::model::{Lesson, LessonRecord};
use crate::repository::LessonRepository;
use crate::store::KeyValueStore;
use tracing::debug;
use uuid::Uuid;

/// An open edit of one stored lesson.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub id: Uuid,
    pub draft: LessonRecord,
}

/// State of the lesson-browsing flow.
///
/// The list is loaded once on activation and afterwards kept in step with
/// the saves and deletes made through this controller.
#[derive(Debug, Clone, Default)]
pub struct LessonListController {
    lessons: Vec<Lesson>,
    session: Option<EditSession>,
}

impl LessonListController {
    pub fn activate<S: KeyValueStore>(repo: &LessonRepository<S>) -> Result<Self> {
        let lessons = repo.list_all()?;
        debug!(count = lessons.len(), "lesson list loaded");
        Ok(Self {
            lessons,
            session: None,
        })
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    pub fn entries(&self) -> Vec<DisplayLesson> {
        index::index_lessons(&self.lessons)
    }

    pub fn find(&self, id: Uuid) -> Option<&Lesson> {
        self.lessons.iter().find(|lesson| lesson.id() == id)
    }

    pub fn resolve(&self, selector: &LessonSelector) -> Result<Uuid> {
        index::resolve(&self.lessons, selector)
    }

    /// Opens `id` for editing, replacing any open session.
    pub fn open(&mut self, id: Uuid) -> Result<&mut LessonRecord> {
        let draft = self
            .find(id)
            .map(|lesson| lesson.record.clone())
            .ok_or(LessonError::NotFound(id))?;
        let session = self.session.insert(EditSession { id, draft });
        Ok(&mut session.draft)
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn edit_mut(&mut self) -> Option<&mut LessonRecord> {
        self.session.as_mut().map(|session| &mut session.draft)
    }

    /// Closes the open session, discarding its changes.
    pub fn cancel_edit(&mut self) -> Option<EditSession> {
        self.session.take()
    }

    /// Writes the open session back and refreshes the in-memory entry.
    ///
    /// On failure the session stays open so the edit is not lost.
    pub fn save<S: KeyValueStore>(&mut self, repo: &mut LessonRepository<S>) -> Result<Lesson> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| LessonError::Validation("No lesson is open for editing".to_string()))?;
        let updated = repo.update(&session.id, session.draft.clone())?;

        if let Some(slot) = self.lessons.iter_mut().find(|l| l.id() == updated.id()) {
            *slot = updated.clone();
        }
        self.session = None;
        Ok(updated)
    }

    /// Deletes `id` from storage and from the list, closing its session if
    /// open.
    pub fn delete<S: KeyValueStore>(
        &mut self,
        repo: &mut LessonRepository<S>,
        id: Uuid,
    ) -> Result<Lesson> {
        let pos = self
            .lessons
            .iter()
            .position(|lesson| lesson.id() == id)
            .ok_or(LessonError::NotFound(id))?;
        repo.delete(&id)?;

        if self.session.as_ref().is_some_and(|s| s.id == id) {
            self.session = None;
        }
        Ok(self.lessons.remove(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::DisplayIndex;
    use crate::store::memory::InMemoryStore;
    use crate::store::memory::fixtures::StoreFixture;

    fn repo_with(n: usize) -> LessonRepository<InMemoryStore> {
        LessonRepository::new(StoreFixture::new().with_lessons(n).store)
    }

    #[test]
    fn activate_loads_lessons() {
        let repo = repo_with(3);
        let list = LessonListController::activate(&repo).unwrap();
        assert_eq!(list.lessons().len(), 3);
        let entries = list.entries();
        assert_eq!(entries[0].index, DisplayIndex(1));
        assert_eq!(entries[0].lesson, list.lessons()[0]);
    }

    #[test]
    fn activate_skips_corrupt_entries() {
        let store = StoreFixture::new()
            .with_lessons(1)
            .with_corrupt_entry("broken")
            .store;
        let repo = LessonRepository::new(store);
        let list = LessonListController::activate(&repo).unwrap();
        assert_eq!(list.lessons().len(), 1);
    }

    #[test]
    fn empty_store_lists_nothing() {
        let repo = repo_with(0);
        let list = LessonListController::activate(&repo).unwrap();
        assert!(list.is_empty());
        assert!(list.entries().is_empty());
    }

    #[test]
    fn edit_and_save_updates_list_and_store() {
        let mut repo = repo_with(2);
        let mut list = LessonListController::activate(&repo).unwrap();
        let id = list.resolve(&LessonSelector::Index(DisplayIndex(2))).unwrap();

        list.open(id).unwrap().summary = "Edited".into();
        let saved = list.save(&mut repo).unwrap();

        assert_eq!(saved.id(), id);
        assert!(list.session().is_none());
        assert_eq!(list.find(id).unwrap().record.summary, "Edited");
        assert_eq!(repo.get(&id).unwrap().record.summary, "Edited");
    }

    #[test]
    fn cancel_edit_discards_changes() {
        let repo = repo_with(1);
        let mut list = LessonListController::activate(&repo).unwrap();
        let id = list.lessons()[0].id();

        list.open(id).unwrap().topic = "Changed".into();
        let session = list.cancel_edit().unwrap();
        assert_eq!(session.draft.topic, "Changed");
        assert_eq!(list.find(id).unwrap().record.topic, "Topic 1");
        assert!(list.edit_mut().is_none());
    }

    #[test]
    fn failed_save_keeps_session() {
        let mut repo = repo_with(1);
        let mut list = LessonListController::activate(&repo).unwrap();
        let id = list.lessons()[0].id();
        list.open(id).unwrap().notes = "keep me".into();

        repo.store_mut().set_simulate_write_error(true);
        assert!(list.save(&mut repo).is_err());
        assert_eq!(list.session().unwrap().draft.notes, "keep me");
        assert_eq!(list.find(id).unwrap().record.notes, "");
    }

    #[test]
    fn save_without_session_fails() {
        let mut repo = repo_with(1);
        let mut list = LessonListController::activate(&repo).unwrap();
        assert!(matches!(
            list.save(&mut repo),
            Err(LessonError::Validation(_))
        ));
    }

    #[test]
    fn delete_removes_and_closes_session() {
        let mut repo = repo_with(2);
        let mut list = LessonListController::activate(&repo).unwrap();
        let id = list.lessons()[0].id();
        list.open(id).unwrap();

        let removed = list.delete(&mut repo, id).unwrap();
        assert_eq!(removed.id(), id);
        assert!(list.session().is_none());
        assert_eq!(list.lessons().len(), 1);
        assert!(matches!(repo.get(&id), Err(LessonError::NotFound(_))));
    }

    #[test]
    fn delete_unknown_id_is_not_found() {
        let mut repo = repo_with(1);
        let mut list = LessonListController::activate(&repo).unwrap();
        let err = list.delete(&mut repo, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, LessonError::NotFound(_)));
        assert_eq!(list.lessons().len(), 1);
    }

    #[test]
    fn open_unknown_id_is_not_found() {
        let repo = repo_with(1);
        let mut list = LessonListController::activate(&repo).unwrap();
        assert!(matches!(
            list.open(Uuid::new_v4()),
            Err(LessonError::NotFound(_))
        ));
    }
}
