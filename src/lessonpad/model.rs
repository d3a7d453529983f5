use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Number of outline rows a fresh planner draft starts with.
pub const PLANNER_OUTLINE_ROWS: usize = 3;

const UNTITLED: &str = "Untitled Lesson";

/// One row of the lesson outline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineItem {
    #[serde(deserialize_with = "lenient_text")]
    pub duration: String,
    #[serde(deserialize_with = "lenient_text")]
    pub activity: String,
    #[serde(deserialize_with = "lenient_text")]
    pub remarks: String,
}

impl OutlineItem {
    pub fn new(
        duration: impl Into<String>,
        activity: impl Into<String>,
        remarks: impl Into<String>,
    ) -> Self {
        Self {
            duration: duration.into(),
            activity: activity.into(),
            remarks: remarks.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.duration.trim().is_empty()
            && self.activity.trim().is_empty()
            && self.remarks.trim().is_empty()
    }
}

/// The complete data for one lesson plan.
///
/// Every field is free text except the outline, whose order is the
/// presentation order. Keys this version does not know about are carried in
/// `extra` so that records written by other versions survive a rewrite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LessonRecord {
    pub topic: String,
    pub subject: String,
    pub grade_level: String,
    pub date: String,
    pub summary: String,
    pub main_topic: String,
    pub subtopics: String,
    pub materials_needed: String,
    pub learning_objectives: String,
    pub lesson_outline: Vec<OutlineItem>,
    pub notes: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LessonRecord {
    /// A blank planner draft with the default number of outline rows.
    pub fn blank() -> Self {
        Self {
            lesson_outline: vec![OutlineItem::default(); PLANNER_OUTLINE_ROWS],
            ..Self::default()
        }
    }

    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn decode(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn display_title(&self) -> &str {
        let topic = self.topic.trim();
        if topic.is_empty() { UNTITLED } else { topic }
    }

    /// Labels of the fields AI generation needs but the draft leaves empty.
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            ("Topic", &self.topic),
            ("Subject", &self.subject),
            ("Grade Level", &self.grade_level),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| label)
        .collect()
    }

    /// Folds a suggestion into this record.
    ///
    /// A suggested text value replaces the current one only when it is
    /// non-empty; a suggested outline replaces the current outline whenever
    /// it is present. Topic, subject, grade level, date and notes are never
    /// touched.
    pub fn merge_suggestion(&mut self, suggestion: &Suggestion) {
        merge_text(&mut self.summary, &suggestion.summary);
        merge_text(&mut self.main_topic, &suggestion.main_topic);
        merge_text(&mut self.subtopics, &suggestion.subtopics);
        merge_text(&mut self.materials_needed, &suggestion.materials_needed);
        merge_text(&mut self.learning_objectives, &suggestion.learning_objectives);
        if let Some(outline) = &suggestion.lesson_outline {
            self.lesson_outline = outline.clone();
        }
    }
}

fn merge_text(current: &mut String, suggested: &Option<String>) {
    if let Some(value) = suggested
        && !value.trim().is_empty()
    {
        *current = value.clone();
    }
}

/// A partial lesson record proposed by the AI endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Suggestion {
    #[serde(deserialize_with = "lenient_opt_text")]
    pub summary: Option<String>,
    #[serde(deserialize_with = "lenient_opt_text")]
    pub main_topic: Option<String>,
    #[serde(deserialize_with = "lenient_opt_text")]
    pub subtopics: Option<String>,
    #[serde(deserialize_with = "lenient_opt_text")]
    pub materials_needed: Option<String>,
    #[serde(deserialize_with = "lenient_opt_text")]
    pub learning_objectives: Option<String>,
    pub lesson_outline: Option<Vec<OutlineItem>>,
}

impl Suggestion {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::stamped_at(Utc::now())
    }

    pub fn stamped_at(at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: at,
            updated_at: at,
        }
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self::new()
    }
}

/// A persisted lesson: its identity plus the record itself.
///
/// Stored as a single JSON object with the metadata keys alongside the
/// record keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    #[serde(flatten)]
    pub metadata: Metadata,
    #[serde(flatten)]
    pub record: LessonRecord,
}

impl Lesson {
    pub fn new(record: LessonRecord) -> Self {
        Self {
            metadata: Metadata::new(),
            record,
        }
    }

    pub fn id(&self) -> Uuid {
        self.metadata.id
    }

    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn decode(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

/// Accepts a string, a list of strings (joined by newlines), a scalar or null.
fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(value_to_text)
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        other => Some(other.to_string()),
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(value_to_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_opt_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(value_to_text))
}
