//! Session state for the two interactive flows.
//!
//! - [`PlannerController`]: composing a lesson, optionally with an AI
//!   suggestion that the user reviews before it is merged and saved.
//! - [`LessonListController`]: browsing stored lessons, editing one at a time,
//!   and deleting.
//!
//! Controllers hold in-memory state only and reach storage through a
//! [`LessonRepository`](crate::repository::LessonRepository) passed to each
//! call that needs it.

mod list;
mod planner;

pub use list::{EditSession, LessonListController};
pub use planner::{GenerationOutcome, GenerationTicket, PlannerController};
