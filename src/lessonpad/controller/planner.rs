use crate::ai::{self, SuggestError, TextCompletion};
use crate::error::{LessonError, Result};
use crate::model::{Lesson, LessonRecord, Suggestion};
use crate::repository::LessonRepository;
use crate::store::KeyValueStore;
use tracing::{debug, info};
use uuid::Uuid;

/// Proof that a suggestion request was started, carrying the draft it was
/// started from.
///
/// A response is only accepted if its ticket is still the pending one, so
/// replies to cancelled or superseded requests never reach the draft.
#[derive(Debug, Clone)]
pub struct GenerationTicket {
    seq: u64,
    draft: LessonRecord,
}

impl GenerationTicket {
    pub fn draft(&self) -> &LessonRecord {
        &self.draft
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The suggestion is staged for review.
    Staged,
    /// The request was cancelled or superseded; nothing changed.
    Discarded,
}

/// State of the lesson-composition flow.
///
/// Holds the draft being edited, at most one in-flight suggestion request,
/// and the last suggestion waiting to be applied. A suggestion never touches
/// the draft until [`apply`](Self::apply) is called.
#[derive(Debug, Clone)]
pub struct PlannerController {
    draft: LessonRecord,
    editing: Option<Uuid>,
    pending: Option<u64>,
    next_seq: u64,
    staged: Option<Suggestion>,
}

impl Default for PlannerController {
    fn default() -> Self {
        Self::new()
    }
}

impl PlannerController {
    /// Starts from a blank draft with empty outline rows.
    pub fn new() -> Self {
        Self::with_draft(LessonRecord::blank())
    }

    pub fn with_draft(draft: LessonRecord) -> Self {
        Self {
            draft,
            editing: None,
            pending: None,
            next_seq: 0,
            staged: None,
        }
    }

    /// Starts from a stored lesson; saving updates it in place.
    pub fn for_lesson(lesson: &Lesson) -> Self {
        Self {
            editing: Some(lesson.id()),
            ..Self::with_draft(lesson.record.clone())
        }
    }

    pub fn draft(&self) -> &LessonRecord {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut LessonRecord {
        &mut self.draft
    }

    /// Id of the stored lesson this draft saves to, if any.
    pub fn editing(&self) -> Option<Uuid> {
        self.editing
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn staged(&self) -> Option<&Suggestion> {
        self.staged.as_ref()
    }

    /// Drops the staged suggestion without touching the draft.
    pub fn discard_suggestion(&mut self) -> Option<Suggestion> {
        self.staged.take()
    }

    /// Opens a suggestion request.
    ///
    /// Fails without side effects if a request is already pending or if
    /// topic, subject or grade level is empty.
    pub fn begin_generation(&mut self) -> Result<GenerationTicket> {
        if self.pending.is_some() {
            return Err(LessonError::GenerationPending);
        }
        let missing = self.draft.missing_required();
        if !missing.is_empty() {
            return Err(LessonError::Validation(format!(
                "Please fill in {} before generating a lesson plan",
                missing.join(", ")
            )));
        }

        self.next_seq += 1;
        self.pending = Some(self.next_seq);
        debug!(seq = self.next_seq, "begin_generation");
        Ok(GenerationTicket {
            seq: self.next_seq,
            draft: self.draft.clone(),
        })
    }

    /// Settles the request `ticket` was issued for.
    ///
    /// A stale ticket is discarded silently. Otherwise the pending state is
    /// cleared and either the suggestion is staged or the endpoint error is
    /// returned, leaving the draft and any earlier staged suggestion as they
    /// were.
    pub fn finish_generation(
        &mut self,
        ticket: GenerationTicket,
        response: std::result::Result<Suggestion, SuggestError>,
    ) -> Result<GenerationOutcome> {
        if self.pending != Some(ticket.seq) {
            debug!(seq = ticket.seq, "finish_generation: stale response discarded");
            return Ok(GenerationOutcome::Discarded);
        }
        self.pending = None;

        let suggestion = response?;
        info!(seq = ticket.seq, "suggestion staged");
        self.staged = Some(suggestion);
        Ok(GenerationOutcome::Staged)
    }

    /// Abandons the pending request, if any.
    pub fn cancel(&mut self) {
        if let Some(seq) = self.pending.take() {
            debug!(seq, "generation cancelled");
        }
    }

    /// Runs a full request against `endpoint` and returns the staged
    /// suggestion.
    pub fn generate<E: TextCompletion + ?Sized>(&mut self, endpoint: &E) -> Result<&Suggestion> {
        let ticket = self.begin_generation()?;
        let response = ai::suggest(endpoint, ticket.draft());
        self.finish_generation(ticket, response)?;
        self.staged
            .as_ref()
            .ok_or_else(|| LessonError::Api("Suggestion was discarded".to_string()))
    }

    /// Merges the staged suggestion into the draft and saves the result.
    ///
    /// If the save fails the draft and the staged suggestion are left as
    /// they were.
    pub fn apply<S: KeyValueStore>(&mut self, repo: &mut LessonRepository<S>) -> Result<Lesson> {
        let suggestion = self
            .staged
            .as_ref()
            .ok_or_else(|| LessonError::Validation("No suggestion to apply".to_string()))?;
        let mut merged = self.draft.clone();
        merged.merge_suggestion(suggestion);

        let lesson = self.persist(repo, merged.clone())?;
        self.draft = merged;
        self.staged = None;
        Ok(lesson)
    }

    /// Persists the draft: creates a new lesson the first time, updates it
    /// afterwards.
    pub fn save<S: KeyValueStore>(&mut self, repo: &mut LessonRepository<S>) -> Result<Lesson> {
        self.persist(repo, self.draft.clone())
    }

    fn persist<S: KeyValueStore>(
        &mut self,
        repo: &mut LessonRepository<S>,
        record: LessonRecord,
    ) -> Result<Lesson> {
        let lesson = match self.editing {
            Some(id) => repo.update(&id, record)?,
            None => repo.create(record)?,
        };
        self.editing = Some(lesson.id());
        Ok(lesson)
    }
}
