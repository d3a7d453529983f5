//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for lessonpad operations, whatever the UI.
//!
//! It:
//! - **Dispatches** to the matching `commands/*.rs` function
//! - **Normalizes inputs**, turning user-typed indexes and id prefixes into
//!   [`LessonSelector`]s
//! - **Returns structured types** (`Result<CmdResult>`), never strings
//!
//! Business rules live in the commands and controllers; printing lives in the
//! client.
//!
//! `LessonApi<S: KeyValueStore>` is generic over storage: the CLI uses
//! `LessonApi<FileStore>`, tests use `LessonApi<InMemoryStore>`.

use crate::ai::TextCompletion;
use crate::commands;
use crate::config::LessonpadConfig;
use crate::error::{LessonError, Result};
use crate::index::{self, LessonSelector};
use crate::model::{LessonRecord, Suggestion};
use crate::repository::LessonRepository;
use crate::store::KeyValueStore;
use std::path::{Path, PathBuf};

pub struct LessonApi<S: KeyValueStore> {
    repo: LessonRepository<S>,
    data_dir: PathBuf,
}

impl<S: KeyValueStore> LessonApi<S> {
    /// Lessons are namespaced under `config.key_prefix`; `data_dir` is where
    /// `config.json` lives.
    pub fn new(store: S, config: &LessonpadConfig, data_dir: PathBuf) -> Self {
        Self {
            repo: LessonRepository::with_prefix(store, config.key_prefix.clone()),
            data_dir,
        }
    }

    pub fn create_lesson(&mut self, record: LessonRecord) -> Result<commands::CmdResult> {
        commands::create::run(&mut self.repo, record)
    }

    pub fn list_lessons(&self) -> Result<commands::CmdResult> {
        commands::list::run(&self.repo)
    }

    pub fn view_lessons<I: AsRef<str>>(&self, inputs: &[I]) -> Result<commands::CmdResult> {
        let selectors = index::parse_selectors(inputs)?;
        commands::view::run(&self.repo, &selectors)
    }

    pub fn edit_lesson<F>(&mut self, input: &str, edit: F) -> Result<commands::CmdResult>
    where
        F: FnOnce(&LessonRecord) -> Result<LessonRecord>,
    {
        let selector = single_selector(input)?;
        commands::update::run(&mut self.repo, &selector, edit)
    }

    /// Suggests content for a new lesson built from `record`.
    pub fn suggest_new<E, R>(
        &mut self,
        record: LessonRecord,
        endpoint: &E,
        review: R,
    ) -> Result<commands::CmdResult>
    where
        E: TextCompletion + ?Sized,
        R: FnOnce(&LessonRecord, &Suggestion) -> bool,
    {
        let source = commands::generate::DraftSource::New(record);
        commands::generate::run(&mut self.repo, source, endpoint, review)
    }

    /// Suggests content for the stored lesson `input` selects.
    pub fn suggest_existing<E, R>(
        &mut self,
        input: &str,
        endpoint: &E,
        review: R,
    ) -> Result<commands::CmdResult>
    where
        E: TextCompletion + ?Sized,
        R: FnOnce(&LessonRecord, &Suggestion) -> bool,
    {
        let source = commands::generate::DraftSource::Existing(single_selector(input)?);
        commands::generate::run(&mut self.repo, source, endpoint, review)
    }

    pub fn delete_lessons<I: AsRef<str>>(&mut self, inputs: &[I]) -> Result<commands::CmdResult> {
        let selectors = index::parse_selectors(inputs)?;
        commands::delete::run(&mut self.repo, &selectors)
    }

    pub fn doctor(&mut self) -> Result<commands::CmdResult> {
        commands::doctor::run(&mut self.repo)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.data_dir, action)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn repository(&self) -> &LessonRepository<S> {
        &self.repo
    }
}

fn single_selector(input: &str) -> Result<LessonSelector> {
    let mut selectors = index::parse_selectors(&[input])?;
    if selectors.len() != 1 {
        return Err(LessonError::Api(format!(
            "Expected a single lesson, got {}",
            input
        )));
    }
    Ok(selectors.remove(0))
}

pub use crate::commands::config::ConfigAction;
pub use commands::{CmdMessage, CmdResult, MessageLevel};
