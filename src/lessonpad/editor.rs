//! Editing a lesson record as a plain-text form in `$EDITOR`.
//!
//! The form has a header block of `Label: value` lines for the short fields,
//! followed by one `## Heading` section per long field:
//!
//! ```text
//! Topic: Fractions
//! Subject: Math
//! Grade Level: 5
//! Date: 2024-03-01
//!
//! ## Summary
//! Adding fractions with like denominators.
//!
//! ## Lesson Outline
//! - 10m | Warm-up | mental math
//! - 25m | Pizza slices |
//! ```
//!
//! Outline rows are `- duration | activity | remarks`, with `\|` for a
//! literal pipe. Only the headings above start a section; any other line is
//! body text. A body line that would read as a heading is written with a
//! leading `\`. Headers or sections missing from an edited buffer leave the
//! corresponding field unchanged.

use crate::error::{LessonError, Result};
use crate::model::{LessonRecord, OutlineItem};
use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Topic,
    Subject,
    GradeLevel,
    Date,
    Summary,
    MainTopic,
    Subtopics,
    MaterialsNeeded,
    LearningObjectives,
    LessonOutline,
    Notes,
}

const HEADERS: &[(&str, Field)] = &[
    ("Topic", Field::Topic),
    ("Subject", Field::Subject),
    ("Grade Level", Field::GradeLevel),
    ("Date", Field::Date),
];

const SECTIONS: &[(&str, Field)] = &[
    ("Summary", Field::Summary),
    ("Main Topic", Field::MainTopic),
    ("Subtopics", Field::Subtopics),
    ("Materials Needed", Field::MaterialsNeeded),
    ("Learning Objectives", Field::LearningObjectives),
    ("Lesson Outline", Field::LessonOutline),
    ("Notes", Field::Notes),
];

fn text_value(record: &LessonRecord, field: Field) -> &str {
    match field {
        Field::Topic => &record.topic,
        Field::Subject => &record.subject,
        Field::GradeLevel => &record.grade_level,
        Field::Date => &record.date,
        Field::Summary => &record.summary,
        Field::MainTopic => &record.main_topic,
        Field::Subtopics => &record.subtopics,
        Field::MaterialsNeeded => &record.materials_needed,
        Field::LearningObjectives => &record.learning_objectives,
        Field::Notes => &record.notes,
        Field::LessonOutline => "",
    }
}

fn text_field(record: &mut LessonRecord, field: Field) -> Option<&mut String> {
    match field {
        Field::Topic => Some(&mut record.topic),
        Field::Subject => Some(&mut record.subject),
        Field::GradeLevel => Some(&mut record.grade_level),
        Field::Date => Some(&mut record.date),
        Field::Summary => Some(&mut record.summary),
        Field::MainTopic => Some(&mut record.main_topic),
        Field::Subtopics => Some(&mut record.subtopics),
        Field::MaterialsNeeded => Some(&mut record.materials_needed),
        Field::LearningObjectives => Some(&mut record.learning_objectives),
        Field::Notes => Some(&mut record.notes),
        Field::LessonOutline => None,
    }
}

/// Renders `record` as an editable form.
pub fn to_buffer(record: &LessonRecord) -> String {
    let mut buffer = String::new();
    for (label, field) in HEADERS {
        buffer.push_str(&format!("{}: {}\n", label, text_value(record, *field)));
    }

    for (heading, field) in SECTIONS {
        buffer.push_str(&format!("\n## {}\n", heading));
        if *field == Field::LessonOutline {
            for item in &record.lesson_outline {
                buffer.push_str(&outline_row(item));
                buffer.push('\n');
            }
            continue;
        }
        let value = text_value(record, *field);
        if !value.trim().is_empty() {
            for line in value.trim_end().lines() {
                buffer.push_str(&escape_body_line(line));
                buffer.push('\n');
            }
        }
    }
    buffer
}

fn escape_body_line(line: &str) -> String {
    if line.starts_with('\\') || section(line).is_some() {
        format!("\\{}", line)
    } else {
        line.to_string()
    }
}

fn unescape_body_line(line: &str) -> &str {
    line.strip_prefix('\\').unwrap_or(line)
}

fn escape_cell(cell: &str) -> String {
    cell.replace('\\', "\\\\").replace('|', "\\|")
}

fn outline_row(item: &OutlineItem) -> String {
    if item.is_blank() {
        return "- | |".to_string();
    }
    format!(
        "- {} | {} | {}",
        escape_cell(&item.duration),
        escape_cell(&item.activity),
        escape_cell(&item.remarks)
    )
    .trim_end()
    .to_string()
}

/// Splits a row on unescaped pipes; the third cell takes the rest of the line.
fn parse_outline_row(line: &str) -> OutlineItem {
    let line = line.trim();
    let line = line.strip_prefix('-').unwrap_or(line);

    let mut cells: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(next @ ('\\' | '|')) => cell.push(next),
                Some(other) => {
                    cell.push('\\');
                    cell.push(other);
                }
                None => cell.push('\\'),
            },
            '|' if cells.len() < 2 => cells.push(std::mem::take(&mut cell)),
            _ => cell.push(c),
        }
    }
    cells.push(cell);

    let mut cells = cells.iter().map(|cell| cell.trim());
    OutlineItem::new(
        cells.next().unwrap_or_default(),
        cells.next().unwrap_or_default(),
        cells.next().unwrap_or_default(),
    )
}

fn header(line: &str) -> Option<(Field, &str)> {
    let (label, value) = line.split_once(':')?;
    HEADERS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(label.trim()))
        .map(|(_, field)| (*field, value.trim()))
}

fn section(line: &str) -> Option<Field> {
    let heading = line.trim_start().strip_prefix("##")?.trim();
    SECTIONS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(heading))
        .map(|(_, field)| *field)
}

/// Applies an edited form to `base`.
///
/// Fields the buffer does not mention keep their value from `base`, as do
/// keys this version does not model.
pub fn apply_buffer(base: &LessonRecord, buffer: &str) -> LessonRecord {
    let mut record = base.clone();
    // `None` while still in the header block.
    let mut current: Option<Field> = None;
    let mut body: Vec<&str> = Vec::new();

    for line in buffer.lines() {
        if let Some(next) = section(line) {
            flush(&mut record, current, &body);
            current = Some(next);
            body.clear();
            continue;
        }
        match current {
            None => {
                if let Some((field, value)) = header(line)
                    && let Some(slot) = text_field(&mut record, field)
                {
                    *slot = value.to_string();
                }
            }
            Some(_) => body.push(line),
        }
    }
    flush(&mut record, current, &body);
    record
}

fn flush(record: &mut LessonRecord, current: Option<Field>, body: &[&str]) {
    let Some(field) = current else {
        return;
    };
    if field == Field::LessonOutline {
        record.lesson_outline = body
            .iter()
            .filter(|line| !line.trim().is_empty())
            .map(|line| parse_outline_row(line))
            .collect();
        return;
    }
    if let Some(slot) = text_field(record, field) {
        let lines: Vec<&str> = body.iter().map(|line| unescape_body_line(line)).collect();
        *slot = lines.join("\n").trim().to_string();
    }
}

/// Gets the editor command from environment.
/// Checks $EDITOR, then $VISUAL, then falls back to common editors.
pub fn get_editor() -> Result<String> {
    for var in ["EDITOR", "VISUAL"] {
        if let Ok(editor) = env::var(var)
            && !editor.trim().is_empty()
        {
            return Ok(editor);
        }
    }

    for fallback in ["vim", "vi", "nano"] {
        if Command::new("which")
            .arg(fallback)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
        {
            return Ok(fallback.to_string());
        }
    }

    Err(LessonError::Api(
        "No editor found. Set $EDITOR environment variable.".to_string(),
    ))
}

/// Opens a file in the user's editor and waits for it to close.
/// Returns the contents of the file after editing.
pub fn open_in_editor<P: AsRef<Path>>(file_path: P) -> Result<String> {
    let editor = get_editor()?;
    let path = file_path.as_ref();

    let status = Command::new(&editor)
        .arg(path)
        .status()
        .map_err(|e| LessonError::Api(format!("Failed to launch editor '{}': {}", editor, e)))?;

    if !status.success() {
        return Err(LessonError::Api(format!(
            "Editor '{}' exited with non-zero status",
            editor
        )));
    }

    fs::read_to_string(path).map_err(LessonError::Io)
}

/// Round-trips `record` through the user's editor.
pub fn edit_record(record: &LessonRecord) -> Result<LessonRecord> {
    let temp_file = env::temp_dir().join(format!("lessonpad_edit_{}.md", Uuid::new_v4()));
    fs::write(&temp_file, to_buffer(record)).map_err(LessonError::Io)?;

    let result = open_in_editor(&temp_file);
    let _ = fs::remove_file(&temp_file);

    Ok(apply_buffer(record, &result?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> LessonRecord {
        LessonRecord {
            topic: "Fractions".into(),
            subject: "Math".into(),
            grade_level: "5".into(),
            date: "2024-03-01".into(),
            summary: "Adding fractions".into(),
            subtopics: "Halves\nQuarters".into(),
            lesson_outline: vec![
                OutlineItem::new("10m", "Warm-up", "mental math"),
                OutlineItem::new("25m", "Pizza slices", ""),
            ],
            ..LessonRecord::default()
        }
    }

    #[test]
    fn buffer_layout() {
        let buffer = to_buffer(&sample());
        assert!(buffer.starts_with("Topic: Fractions\nSubject: Math\nGrade Level: 5\n"));
        assert!(buffer.contains("## Summary\nAdding fractions\n"));
        assert!(buffer.contains("## Subtopics\nHalves\nQuarters\n"));
        assert!(buffer.contains("- 10m | Warm-up | mental math\n- 25m | Pizza slices |\n"));
    }

    #[test]
    fn unedited_buffer_reproduces_record() {
        let record = sample();
        assert_eq!(apply_buffer(&record, &to_buffer(&record)), record);
    }

    #[test]
    fn blank_outline_rows_survive() {
        let record = LessonRecord::blank();
        let buffer = to_buffer(&record);
        assert!(buffer.contains("## Lesson Outline\n- | |\n- | |\n- | |\n"));
        assert_eq!(apply_buffer(&record, &buffer), record);
    }

    #[test]
    fn edits_are_applied() {
        let buffer = "\
Topic: Decimals
subject:  Math
Grade Level: 6

## Summary
Place value
to the hundredths

## Lesson Outline
- 5m | Intro
- 30m | Number line | pairs | with extra pipe

## Notes
Check homework
";
        let edited = apply_buffer(&sample(), buffer);
        assert_eq!(edited.topic, "Decimals");
        assert_eq!(edited.subject, "Math");
        assert_eq!(edited.grade_level, "6");
        assert_eq!(edited.date, "2024-03-01");
        assert_eq!(edited.summary, "Place value\nto the hundredths");
        assert_eq!(edited.subtopics, "Halves\nQuarters");
        assert_eq!(
            edited.lesson_outline,
            vec![
                OutlineItem::new("5m", "Intro", ""),
                OutlineItem::new("30m", "Number line", "pairs | with extra pipe"),
            ]
        );
        assert_eq!(edited.notes, "Check homework");
    }

    #[test]
    fn emptied_section_clears_field() {
        let buffer = "## Summary\n\n## Subtopics\n";
        let edited = apply_buffer(&sample(), buffer);
        assert_eq!(edited.summary, "");
        assert_eq!(edited.subtopics, "");
        assert_eq!(edited.topic, "Fractions");
    }

    #[test]
    fn unknown_heading_before_sections_is_ignored() {
        let buffer = "## Homework\nPage 12\n## Notes\nok\n";
        let edited = apply_buffer(&sample(), buffer);
        assert_eq!(edited.notes, "ok");
        assert_eq!(edited.summary, "Adding fractions");
    }

    #[test]
    fn markdown_headings_in_text_survive() {
        let mut record = sample();
        record.notes = "Intro\n## Homework\nPage 12".into();
        record.summary = "## Summary\n\\escaped already".into();
        let buffer = to_buffer(&record);
        assert!(buffer.contains("## Notes\nIntro\n## Homework\nPage 12\n"));
        assert!(buffer.contains("\\## Summary\n\\\\escaped already\n"));
        assert_eq!(apply_buffer(&record, &buffer), record);
    }

    #[test]
    fn typed_heading_inside_section_is_body_text() {
        let buffer = "## Notes\nIntro\n## Homework\nPage 12\n";
        let edited = apply_buffer(&sample(), buffer);
        assert_eq!(edited.notes, "Intro\n## Homework\nPage 12");
    }

    #[test]
    fn pipes_in_outline_cells_survive() {
        let mut record = sample();
        record.lesson_outline = vec![
            OutlineItem::new("10m", "Think | pair | share", "groups of 2\\3"),
            OutlineItem::new("5m", "Exit ticket", "a|b"),
        ];
        let buffer = to_buffer(&record);
        assert!(buffer.contains("- 10m | Think \\| pair \\| share | groups of 2\\\\3\n"));
        assert_eq!(apply_buffer(&record, &buffer), record);
    }

    #[test]
    fn extra_keys_are_preserved() {
        let mut record = sample();
        record.extra.insert("rubric".into(), json!("A-F"));
        let edited = apply_buffer(&record, "Topic: Other\n");
        assert_eq!(edited.extra.get("rubric"), Some(&json!("A-F")));
    }
}
