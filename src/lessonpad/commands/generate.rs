use crate::ai::TextCompletion;
use crate::commands::{CmdMessage, CmdResult};
use crate::controller::{LessonListController, PlannerController};
use crate::error::Result;
use crate::index::LessonSelector;
use crate::model::{LessonRecord, Suggestion};
use crate::repository::LessonRepository;
use crate::store::KeyValueStore;

/// Where the draft for a suggestion comes from.
#[derive(Debug, Clone)]
pub enum DraftSource {
    /// A new, unsaved lesson.
    New(LessonRecord),
    /// A stored lesson, which is updated if the suggestion is applied.
    Existing(LessonSelector),
}

/// Asks `endpoint` for a suggestion and hands it to `review` along with the
/// draft it would be merged into. The suggestion is merged and saved only if
/// `review` returns true.
///
/// The staged suggestion is returned in the result either way.
pub fn run<S, E, R>(
    repo: &mut LessonRepository<S>,
    source: DraftSource,
    endpoint: &E,
    review: R,
) -> Result<CmdResult>
where
    S: KeyValueStore,
    E: TextCompletion + ?Sized,
    R: FnOnce(&LessonRecord, &Suggestion) -> bool,
{
    let mut planner = match source {
        DraftSource::New(record) => PlannerController::with_draft(record),
        DraftSource::Existing(selector) => {
            let list = LessonListController::activate(repo)?;
            let id = list.resolve(&selector)?;
            PlannerController::for_lesson(&repo.get(&id)?)
        }
    };

    let suggestion = planner.generate(endpoint)?.clone();
    let mut result = CmdResult::default();

    if suggestion.is_empty() {
        result.add_message(CmdMessage::warning(
            "The AI service returned no usable fields.",
        ));
    }

    if !review(planner.draft(), &suggestion) {
        planner.discard_suggestion();
        result.add_message(CmdMessage::info("Suggestion not applied."));
        result.suggestion = Some(suggestion);
        return Ok(result);
    }

    let lesson = planner.apply(repo)?;
    result.add_message(CmdMessage::success(format!(
        "Suggestion applied and saved: {}",
        lesson.record.display_title()
    )));
    result.suggestion = Some(suggestion);
    Ok(result.with_affected_lessons(vec![lesson]))
}
