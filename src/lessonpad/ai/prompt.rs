use crate::model::{LessonRecord, OutlineItem};
use std::fmt::Write;

const RESPONSE_SHAPE: &str = r#"{
  "summary": "",
  "mainTopic": "",
  "subtopics": "",
  "materialsNeeded": "",
  "learningObjectives": "",
  "lessonOutline": [
    {"duration": "", "activity": "", "remarks": ""}
  ]
}"#;

/// Builds the completion prompt for `draft`.
///
/// Topic, subject and grade level are always stated. Any other field the user
/// already filled in is passed along so the model can build on it instead of
/// replacing it.
pub fn build_prompt(draft: &LessonRecord) -> String {
    let mut prompt = String::new();
    let _ = writeln!(prompt, "Create a detailed lesson plan for the following:");
    let _ = writeln!(prompt, "Topic: {}", draft.topic.trim());
    let _ = writeln!(prompt, "Subject: {}", draft.subject.trim());
    let _ = writeln!(prompt, "Grade Level: {}", draft.grade_level.trim());

    let existing = existing_fields(draft);
    if !existing.is_empty() {
        let _ = writeln!(prompt);
        let _ = writeln!(prompt, "The teacher has already written the following; keep it consistent:");
        for (label, value) in existing {
            let _ = writeln!(prompt, "{}: {}", label, value);
        }
    }

    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Please provide:");
    let _ = writeln!(prompt, "1. A brief summary");
    let _ = writeln!(prompt, "2. Main topic and subtopics");
    let _ = writeln!(prompt, "3. Materials needed");
    let _ = writeln!(prompt, "4. Learning objectives");
    let _ = writeln!(prompt, "5. Three lesson activities with duration and remarks");
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Format the response as a JSON object matching this structure:");
    prompt.push_str(RESPONSE_SHAPE);
    prompt
}

fn existing_fields(draft: &LessonRecord) -> Vec<(&'static str, String)> {
    let mut fields: Vec<(&'static str, String)> = [
        ("Summary", &draft.summary),
        ("Main topic", &draft.main_topic),
        ("Subtopics", &draft.subtopics),
        ("Materials needed", &draft.materials_needed),
        ("Learning objectives", &draft.learning_objectives),
    ]
    .into_iter()
    .filter(|(_, value)| !value.trim().is_empty())
    .map(|(label, value)| (label, value.trim().to_string()))
    .collect();

    let outline: Vec<String> = draft
        .lesson_outline
        .iter()
        .filter(|item| !item.is_blank())
        .map(outline_line)
        .collect();
    if !outline.is_empty() {
        fields.push(("Lesson outline", format!("\n{}", outline.join("\n"))));
    }
    fields
}

fn outline_line(item: &OutlineItem) -> String {
    let mut line = format!("- {} {}", item.duration.trim(), item.activity.trim());
    if !item.remarks.trim().is_empty() {
        let _ = write!(line, " ({})", item.remarks.trim());
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> LessonRecord {
        LessonRecord {
            topic: "Fractions".into(),
            subject: "Math".into(),
            grade_level: "5".into(),
            ..LessonRecord::blank()
        }
    }

    #[test]
    fn states_required_fields_and_shape() {
        let prompt = build_prompt(&draft());
        assert!(prompt.contains("Topic: Fractions"));
        assert!(prompt.contains("Subject: Math"));
        assert!(prompt.contains("Grade Level: 5"));
        assert!(prompt.contains("\"lessonOutline\""));
        assert!(!prompt.contains("already written"));
    }

    #[test]
    fn includes_filled_fields_only() {
        let mut d = draft();
        d.summary = "Adding fractions".into();
        d.lesson_outline[1] = OutlineItem::new("15m", "Pizza slices", "paper plates");
        let prompt = build_prompt(&d);

        assert!(prompt.contains("Summary: Adding fractions"));
        assert!(prompt.contains("- 15m Pizza slices (paper plates)"));
        assert!(!prompt.contains("Materials needed:"));
    }
}
