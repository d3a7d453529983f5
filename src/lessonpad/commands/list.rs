use crate::commands::{CmdMessage, CmdResult};
use crate::controller::LessonListController;
use crate::error::Result;
use crate::repository::LessonRepository;
use crate::store::KeyValueStore;

pub fn run<S: KeyValueStore>(repo: &LessonRepository<S>) -> Result<CmdResult> {
    let list = LessonListController::activate(repo)?;
    let mut result = CmdResult::default();
    if list.is_empty() {
        result.add_message(CmdMessage::info(
            "No lesson plans yet. Create one with `lessonpad new`.",
        ));
    }
    Ok(result.with_listed_lessons(list.entries()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create;
    use crate::index::DisplayIndex;
    use crate::store::memory::InMemoryStore;
    use crate::store::memory::fixtures::{StoreFixture, record};

    #[test]
    fn lists_newest_first() {
        let mut repo = LessonRepository::new(InMemoryStore::new());
        create::run(&mut repo, record("First", "Math", "5")).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        create::run(&mut repo, record("Second", "Math", "5")).unwrap();

        let result = run(&repo).unwrap();
        assert_eq!(result.listed_lessons.len(), 2);
        assert_eq!(result.listed_lessons[0].index, DisplayIndex(1));
        assert_eq!(result.listed_lessons[0].lesson.record.topic, "Second");
        assert!(result.messages.is_empty());
    }

    #[test]
    fn empty_store_has_hint() {
        let repo = LessonRepository::new(InMemoryStore::new());
        let result = run(&repo).unwrap();
        assert!(result.listed_lessons.is_empty());
        assert_eq!(result.messages.len(), 1);
    }

    #[test]
    fn malformed_values_are_skipped() {
        let store = StoreFixture::new()
            .with_lessons(2)
            .with_corrupt_entry("bad1")
            .with_corrupt_entry("bad2")
            .with_foreign_entry("theme", "dark")
            .store;
        let repo = LessonRepository::new(store);
        assert_eq!(run(&repo).unwrap().listed_lessons.len(), 2);
    }
}
