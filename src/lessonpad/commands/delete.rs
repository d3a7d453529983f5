use crate::commands::{CmdMessage, CmdResult};
use crate::controller::LessonListController;
use crate::error::Result;
use crate::index::LessonSelector;
use crate::repository::LessonRepository;
use crate::store::KeyValueStore;

/// Deletes the selected lessons.
///
/// All selectors are resolved against the same listing before anything is
/// removed, so `delete 1 2` removes the first two lessons as listed.
pub fn run<S: KeyValueStore>(
    repo: &mut LessonRepository<S>,
    selectors: &[LessonSelector],
) -> Result<CmdResult> {
    let mut list = LessonListController::activate(repo)?;

    let mut targets = Vec::with_capacity(selectors.len());
    for selector in selectors {
        let id = list.resolve(selector)?;
        if !targets.iter().any(|(_, existing)| *existing == id) {
            targets.push((selector, id));
        }
    }

    let mut result = CmdResult::default();
    for (selector, id) in targets {
        let lesson = list.delete(repo, id)?;
        result.add_message(CmdMessage::success(format!(
            "Lesson plan deleted ({}): {}",
            selector,
            lesson.record.display_title()
        )));
        result.affected_lessons.push(lesson);
    }
    Ok(result)
}
