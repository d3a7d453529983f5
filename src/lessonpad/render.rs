use chrono::{DateTime, Utc};
use colored::*;
use lessonpad::api::{CmdMessage, MessageLevel};
use lessonpad::config::LessonpadConfig;
use lessonpad::index::DisplayLesson;
use lessonpad::model::{LessonRecord, OutlineItem, Suggestion};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

/// One line per lesson: index, title, subject and grade, age.
pub fn print_lessons(lessons: &[DisplayLesson]) {
    for dl in lessons {
        let record = &dl.lesson.record;
        let idx_str = format!("{}. ", dl.index);
        let time_ago = format_time_ago(dl.lesson.metadata.created_at);
        let summary = lesson_summary_line(record);
        let available = LINE_WIDTH.saturating_sub(4 + idx_str.width() + 2 + TIME_WIDTH);
        let title_display = truncate_to_width(&summary, available);
        let padding = available.saturating_sub(title_display.width());

        println!(
            "    {}{}{}  {}",
            idx_str.yellow(),
            title_display,
            " ".repeat(padding),
            time_ago.dimmed()
        );
    }
}

fn grade_label(record: &LessonRecord) -> String {
    let grade = record.grade_level.trim();
    if grade.is_empty() {
        String::new()
    } else {
        format!("Grade {}", grade)
    }
}

fn lesson_summary_line(record: &LessonRecord) -> String {
    let details: Vec<String> = [record.subject.trim().to_string(), grade_label(record)]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    if details.is_empty() {
        record.display_title().to_string()
    } else {
        format!("{} ({})", record.display_title(), details.join(", "))
    }
}

pub fn print_full_lessons(lessons: &[DisplayLesson]) {
    for (i, dl) in lessons.iter().enumerate() {
        if i > 0 {
            println!("\n================================\n");
        }
        println!(
            "{} {}",
            dl.index.to_string().yellow(),
            dl.lesson.record.display_title().bold()
        );
        println!("{}", format!("id: {}", dl.lesson.id()).dimmed());
        println!("--------------------------------");
        print_record(&dl.lesson.record);
    }
}

fn print_record(record: &LessonRecord) {
    for (label, value) in [
        ("Subject", &record.subject),
        ("Grade Level", &record.grade_level),
        ("Date", &record.date),
    ] {
        if !value.trim().is_empty() {
            println!("{}: {}", label.bold(), value);
        }
    }
    for (label, value) in [
        ("Summary", &record.summary),
        ("Main Topic", &record.main_topic),
        ("Subtopics", &record.subtopics),
        ("Materials Needed", &record.materials_needed),
        ("Learning Objectives", &record.learning_objectives),
    ] {
        print_section(label, value);
    }
    print_outline(&record.lesson_outline);
    print_section("Notes", &record.notes);
}

fn print_section(label: &str, value: &str) {
    if value.trim().is_empty() {
        return;
    }
    println!("\n{}", label.bold());
    println!("{}", value.trim_end());
}

fn print_outline(outline: &[OutlineItem]) {
    let rows: Vec<&OutlineItem> = outline.iter().filter(|item| !item.is_blank()).collect();
    if rows.is_empty() {
        return;
    }
    println!("\n{}", "Lesson Outline".bold());
    let duration_width = rows.iter().map(|r| r.duration.width()).max().unwrap_or(0);
    for row in rows {
        let mut line = format!(
            "  {}{}  {}",
            row.duration.cyan(),
            " ".repeat(duration_width.saturating_sub(row.duration.width())),
            row.activity
        );
        if !row.remarks.trim().is_empty() {
            line.push_str(&format!(" {}", format!("({})", row.remarks).dimmed()));
        }
        println!("{}", line);
    }
}

/// Shows what applying `suggestion` would change in `draft`.
pub fn print_suggestion(draft: &LessonRecord, suggestion: &Suggestion) {
    println!("{}", "Suggested lesson plan".bold().underline());
    for (label, current, suggested) in [
        ("Summary", &draft.summary, &suggestion.summary),
        ("Main Topic", &draft.main_topic, &suggestion.main_topic),
        ("Subtopics", &draft.subtopics, &suggestion.subtopics),
        (
            "Materials Needed",
            &draft.materials_needed,
            &suggestion.materials_needed,
        ),
        (
            "Learning Objectives",
            &draft.learning_objectives,
            &suggestion.learning_objectives,
        ),
    ] {
        let Some(value) = suggested.as_deref().filter(|v| !v.trim().is_empty()) else {
            continue;
        };
        let marker = if current.trim().is_empty() {
            "new".green()
        } else {
            "replaces".yellow()
        };
        println!("\n{} {}", label.bold(), format!("[{}]", marker).dimmed());
        println!("{}", value.trim_end());
    }
    if let Some(outline) = &suggestion.lesson_outline {
        print_outline(outline);
    }
    println!();
}

pub fn print_config(config: &LessonpadConfig) {
    for (key, value) in config.entries() {
        println!("{} = {}", key, value);
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_wide_text() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefghijkl", 6), "abcde…");
        assert_eq!(truncate_to_width("日本語の授業", 6), "日本…");
    }

    #[test]
    fn summary_line_details() {
        let record = LessonRecord {
            topic: "Fractions".into(),
            subject: "Math".into(),
            grade_level: "5".into(),
            ..LessonRecord::default()
        };
        assert_eq!(lesson_summary_line(&record), "Fractions (Math, Grade 5)");
        assert_eq!(
            lesson_summary_line(&LessonRecord::default()),
            "Untitled Lesson"
        );
    }
}
