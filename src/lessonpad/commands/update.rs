use crate::commands::{CmdMessage, CmdResult};
use crate::controller::LessonListController;
use crate::error::Result;
use crate::index::LessonSelector;
use crate::model::LessonRecord;
use crate::repository::LessonRepository;
use crate::store::KeyValueStore;

/// Edits one lesson through `edit`, which receives the stored record and
/// returns the replacement.
///
/// An unchanged record is not written back.
pub fn run<S, F>(
    repo: &mut LessonRepository<S>,
    selector: &LessonSelector,
    edit: F,
) -> Result<CmdResult>
where
    S: KeyValueStore,
    F: FnOnce(&LessonRecord) -> Result<LessonRecord>,
{
    let mut list = LessonListController::activate(repo)?;
    let id = list.resolve(selector)?;
    let draft = list.open(id)?;
    let edited = edit(draft)?;

    let mut result = CmdResult::default();
    if edited == *draft {
        list.cancel_edit();
        result.add_message(CmdMessage::info(format!(
            "No changes to lesson plan ({})",
            selector
        )));
        return Ok(result);
    }

    *draft = edited;
    let lesson = list.save(repo)?;
    result.add_message(CmdMessage::success(format!(
        "Lesson plan updated ({}): {}",
        selector,
        lesson.record.display_title()
    )));
    Ok(result.with_affected_lessons(vec![lesson]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LessonError;
    use crate::index::DisplayIndex;
    use crate::store::memory::fixtures::StoreFixture;

    fn first() -> LessonSelector {
        LessonSelector::Index(DisplayIndex(1))
    }

    #[test]
    fn updates_record() {
        let mut repo = LessonRepository::new(StoreFixture::new().with_lessons(2).store);
        let target = repo.list_all().unwrap()[0].clone();

        let result = run(&mut repo, &first(), |record| {
            Ok(LessonRecord {
                summary: "Revised".into(),
                ..record.clone()
            })
        })
        .unwrap();

        assert_eq!(result.affected_lessons[0].id(), target.id());
        let stored = repo.get(&target.id()).unwrap();
        assert_eq!(stored.record.summary, "Revised");
        assert_eq!(stored.metadata.created_at, target.metadata.created_at);
        assert_eq!(repo.list_all().unwrap().len(), 2);
    }

    #[test]
    fn unchanged_record_is_not_written() {
        let mut repo = LessonRepository::new(StoreFixture::new().with_lessons(1).store);
        let before = repo.list_all().unwrap()[0].clone();

        let result = run(&mut repo, &first(), |record| Ok(record.clone())).unwrap();
        assert!(result.affected_lessons.is_empty());
        assert_eq!(repo.get(&before.id()).unwrap(), before);
    }

    #[test]
    fn edit_error_aborts() {
        let mut repo = LessonRepository::new(StoreFixture::new().with_lessons(1).store);
        let before = repo.list_all().unwrap()[0].clone();

        let err = run(&mut repo, &first(), |_| {
            Err(LessonError::Api("editor crashed".into()))
        })
        .unwrap_err();
        assert!(err.to_string().contains("editor crashed"));
        assert_eq!(repo.get(&before.id()).unwrap(), before);
    }
}
