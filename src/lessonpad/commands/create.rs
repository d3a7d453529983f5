use crate::commands::{CmdMessage, CmdResult};
use crate::controller::PlannerController;
use crate::error::Result;
use crate::model::LessonRecord;
use crate::repository::LessonRepository;
use crate::store::KeyValueStore;

pub fn run<S: KeyValueStore>(
    repo: &mut LessonRepository<S>,
    record: LessonRecord,
) -> Result<CmdResult> {
    let mut planner = PlannerController::with_draft(record);
    let lesson = planner.save(repo)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Lesson plan saved: {}",
        lesson.record.display_title()
    )));
    Ok(result.with_affected_lessons(vec![lesson]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;
    use crate::store::memory::fixtures::record;

    #[test]
    fn creates_lesson() {
        let mut repo = LessonRepository::new(InMemoryStore::new());
        let result = run(&mut repo, record("Fractions", "Math", "5")).unwrap();

        assert_eq!(result.affected_lessons.len(), 1);
        let stored = repo.list_all().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].record, record("Fractions", "Math", "5"));
        assert_eq!(stored[0].id(), result.affected_lessons[0].id());
    }

    #[test]
    fn untitled_lesson_message() {
        let mut repo = LessonRepository::new(InMemoryStore::new());
        let result = run(&mut repo, LessonRecord::default()).unwrap();
        assert!(result.messages[0].content.contains("Untitled Lesson"));
    }

    #[test]
    fn write_failure_stores_nothing() {
        let mut store = InMemoryStore::new();
        store.set_simulate_write_error(true);
        let mut repo = LessonRepository::new(store);
        assert!(run(&mut repo, record("Fractions", "Math", "5")).is_err());
        assert!(repo.store().is_empty());
    }
}
