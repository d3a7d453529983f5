use crate::config::LessonpadConfig;
use crate::index::DisplayLesson;
use crate::model::{Lesson, Suggestion};

pub mod config;
pub mod create;
pub mod delete;
pub mod doctor;
pub mod generate;
pub mod list;
pub mod update;
pub mod view;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_lessons: Vec<Lesson>,
    pub listed_lessons: Vec<DisplayLesson>,
    pub suggestion: Option<Suggestion>,
    pub config: Option<LessonpadConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_lessons(mut self, lessons: Vec<Lesson>) -> Self {
        self.affected_lessons = lessons;
        self
    }

    pub fn with_listed_lessons(mut self, lessons: Vec<DisplayLesson>) -> Self {
        self.listed_lessons = lessons;
        self
    }

    pub fn with_config(mut self, config: LessonpadConfig) -> Self {
        self.config = Some(config);
        self
    }
}
