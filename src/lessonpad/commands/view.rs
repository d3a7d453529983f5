use crate::commands::CmdResult;
use crate::controller::LessonListController;
use crate::error::Result;
use crate::index::{DisplayLesson, LessonSelector};
use crate::repository::LessonRepository;
use crate::store::KeyValueStore;

pub fn run<S: KeyValueStore>(
    repo: &LessonRepository<S>,
    selectors: &[LessonSelector],
) -> Result<CmdResult> {
    let list = LessonListController::activate(repo)?;
    let entries = list.entries();

    let mut listed = Vec::with_capacity(selectors.len());
    for selector in selectors {
        let id = list.resolve(selector)?;
        if let Some(entry) = entries.iter().find(|e| e.lesson.id() == id) {
            listed.push(DisplayLesson {
                index: entry.index,
                lesson: entry.lesson.clone(),
            });
        }
    }
    Ok(CmdResult::default().with_listed_lessons(listed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::DisplayIndex;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn views_by_index_and_id() {
        let repo = LessonRepository::new(StoreFixture::new().with_lessons(3).store);
        let all = repo.list_all().unwrap();
        let prefix = all[2].id().to_string()[..8].to_string();

        let result = run(
            &repo,
            &[
                LessonSelector::Index(DisplayIndex(1)),
                LessonSelector::Id(prefix),
            ],
        )
        .unwrap();

        assert_eq!(result.listed_lessons.len(), 2);
        assert_eq!(result.listed_lessons[0].lesson, all[0]);
        assert_eq!(result.listed_lessons[1].index, DisplayIndex(3));
        assert_eq!(result.listed_lessons[1].lesson, all[2]);
    }

    #[test]
    fn unknown_index_fails() {
        let repo = LessonRepository::new(StoreFixture::new().with_lessons(1).store);
        assert!(run(&repo, &[LessonSelector::Index(DisplayIndex(5))]).is_err());
    }
}
