use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::repository::LessonRepository;
use crate::store::KeyValueStore;

/// Moves legacy entries under id-bearing keys and reports entries that
/// cannot be read.
pub fn run<S: KeyValueStore>(repo: &mut LessonRepository<S>) -> Result<CmdResult> {
    let report = repo.migrate_legacy()?;
    let mut result = CmdResult::default();

    if report.migrated.is_empty() && report.unreadable.is_empty() {
        result.add_message(CmdMessage::success("No inconsistencies found."));
        return Ok(result);
    }

    if !report.migrated.is_empty() {
        result.add_message(CmdMessage::success(format!(
            "Migrated {} legacy lesson plan(s):",
            report.migrated.len()
        )));
        for entry in &report.migrated {
            result.add_message(CmdMessage::info(format!(
                "  - {} -> {}",
                entry.old_key,
                repo.key_for(&entry.id)
            )));
        }
    }

    if !report.unreadable.is_empty() {
        result.add_message(CmdMessage::warning(format!(
            "Found {} unreadable entr{} (left in place):",
            report.unreadable.len(),
            if report.unreadable.len() == 1 { "y" } else { "ies" }
        )));
        for entry in &report.unreadable {
            result.add_message(CmdMessage::info(format!(
                "  - {}: {}",
                entry.key, entry.reason
            )));
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn clean_store() {
        let mut repo = LessonRepository::new(StoreFixture::new().with_lessons(2).store);
        let result = run(&mut repo).unwrap();
        assert_eq!(result.messages.len(), 1);
        assert_eq!(result.messages[0].level, MessageLevel::Success);
    }

    #[test]
    fn migrates_legacy_and_reports_corrupt() {
        let store = StoreFixture::new()
            .with_lessons(1)
            .with_legacy_entry("lessonPlan_1709251200000", "Plants")
            .with_legacy_entry("lessonPlan0", "Rocks")
            .with_corrupt_entry("broken")
            .store;
        let mut repo = LessonRepository::new(store);

        let result = run(&mut repo).unwrap();
        assert!(
            result
                .messages
                .iter()
                .any(|m| m.content.contains("Migrated 2 legacy"))
        );
        assert!(
            result
                .messages
                .iter()
                .any(|m| m.level == MessageLevel::Warning && m.content.contains("1 unreadable entry"))
        );

        let topics: Vec<String> = repo
            .list_all()
            .unwrap()
            .into_iter()
            .map(|l| l.record.topic)
            .collect();
        assert_eq!(topics.len(), 3);
        assert!(topics.contains(&"Plants".to_string()));
        assert!(topics.contains(&"Rocks".to_string()));

        let second = run(&mut repo).unwrap();
        assert!(
            !second
                .messages
                .iter()
                .any(|m| m.content.contains("Migrated"))
        );
    }
}
