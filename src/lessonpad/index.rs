//! # Display Indexes
//!
//! Lessons are identified by uuids, which nobody wants to type. Lists show a
//! 1-based position instead, and this module maps those positions (or a
//! unique id prefix) back to the uuid before any operation touches storage.
//!
//! Positions are only meaningful for the listing they were taken from: they
//! are assigned over the repository's newest-first order at the moment of
//! listing and are resolved against the same snapshot.

use crate::error::{LessonError, Result};
use crate::model::Lesson;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Id prefixes shorter than this are rejected as too ambiguous.
const MIN_ID_PREFIX: usize = 4;

/// Upper bound on the number of indexes a single range may expand to.
const MAX_RANGE_LEN: usize = 1000;

/// A user-facing, 1-based list position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisplayIndex(pub usize);

impl fmt::Display for DisplayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DisplayIndex {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().parse::<usize>() {
            Ok(0) => Err("Indexes start at 1".to_string()),
            Ok(n) => Ok(DisplayIndex(n)),
            Err(_) => Err(format!("Invalid index format: {}", s)),
        }
    }
}

/// A user input selecting a lesson: its list position or an id prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LessonSelector {
    Index(DisplayIndex),
    Id(String),
}

impl fmt::Display for LessonSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LessonSelector::Index(idx) => write!(f, "{}", idx),
            LessonSelector::Id(prefix) => write!(f, "{}", prefix),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayLesson {
    pub index: DisplayIndex,
    pub lesson: Lesson,
}

/// Assigns display indexes in the order given.
pub fn index_lessons(lessons: &[Lesson]) -> Vec<DisplayLesson> {
    lessons
        .iter()
        .enumerate()
        .map(|(i, lesson)| DisplayLesson {
            index: DisplayIndex(i + 1),
            lesson: lesson.clone(),
        })
        .collect()
}

/// Parses a single index or an inclusive range such as `3-5`.
pub fn parse_index_or_range(s: &str) -> std::result::Result<Vec<DisplayIndex>, String> {
    if let Some((start, end)) = s.split_once('-')
        && !start.is_empty()
    {
        let start = DisplayIndex::from_str(start)?;
        let end = DisplayIndex::from_str(end)?;
        if start > end {
            return Err(format!(
                "Invalid range: start ({}) must be <= end ({})",
                start, end
            ));
        }
        if end.0 - start.0 >= MAX_RANGE_LEN {
            return Err(format!(
                "Range too large: {}-{} (at most {} lessons at once)",
                start, end, MAX_RANGE_LEN
            ));
        }
        return Ok((start.0..=end.0).map(DisplayIndex).collect());
    }
    DisplayIndex::from_str(s).map(|idx| vec![idx])
}

/// Parses user inputs into selectors, expanding ranges.
///
/// Anything that is not an index or range is taken as an id prefix; input
/// made only of digits and dashes is always read as an index or range.
pub fn parse_selectors<I: AsRef<str>>(inputs: &[I]) -> Result<Vec<LessonSelector>> {
    let mut selectors = Vec::new();
    for input in inputs {
        let input = input.as_ref().trim();
        match parse_index_or_range(input) {
            Ok(indexes) => selectors.extend(indexes.into_iter().map(LessonSelector::Index)),
            Err(index_err) => {
                if !is_index_like(input) && looks_like_id(input) {
                    selectors.push(LessonSelector::Id(input.to_ascii_lowercase()));
                } else {
                    return Err(LessonError::Api(index_err));
                }
            }
        }
    }
    Ok(selectors)
}

fn is_index_like(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_digit() || c == '-')
}

fn looks_like_id(s: &str) -> bool {
    s.len() >= MIN_ID_PREFIX && s.chars().all(|c| c.is_ascii_hexdigit() || c == '-')
}

/// Maps a selector to the id of a lesson in `lessons`, which must be in
/// display order.
pub fn resolve(lessons: &[Lesson], selector: &LessonSelector) -> Result<Uuid> {
    match selector {
        LessonSelector::Index(idx) => idx
            .0
            .checked_sub(1)
            .and_then(|i| lessons.get(i))
            .map(Lesson::id)
            .ok_or_else(|| LessonError::Api(format!("Index {} not found", idx))),
        LessonSelector::Id(prefix) => {
            let matches: Vec<Uuid> = lessons
                .iter()
                .map(Lesson::id)
                .filter(|id| id.to_string().starts_with(prefix.as_str()))
                .collect();
            match matches.as_slice() {
                [id] => Ok(*id),
                [] => Err(LessonError::Api(format!("No lesson id starts with {}", prefix))),
                _ => Err(LessonError::Api(format!(
                    "Id prefix {} matches {} lessons",
                    prefix,
                    matches.len()
                ))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LessonRecord;

    fn lessons(n: usize) -> Vec<Lesson> {
        (0..n)
            .map(|i| {
                Lesson::new(LessonRecord {
                    topic: format!("Lesson {}", i + 1),
                    ..LessonRecord::default()
                })
            })
            .collect()
    }

    #[test]
    fn index_lessons_is_one_based() {
        let indexed = index_lessons(&lessons(2));
        assert_eq!(indexed[0].index, DisplayIndex(1));
        assert_eq!(indexed[1].index, DisplayIndex(2));
        assert_eq!(indexed[1].lesson.record.topic, "Lesson 2");
    }

    #[test]
    fn parse_single_and_range() {
        assert_eq!(parse_index_or_range("3").unwrap(), vec![DisplayIndex(3)]);
        assert_eq!(
            parse_index_or_range("2-4").unwrap(),
            vec![DisplayIndex(2), DisplayIndex(3), DisplayIndex(4)]
        );
        assert!(parse_index_or_range("4-2").is_err());
        assert!(parse_index_or_range("0").is_err());
        assert!(parse_index_or_range("abc").is_err());
    }

    #[test]
    fn oversized_range_is_rejected() {
        let err = parse_index_or_range("1-99999999999").unwrap_err();
        assert!(err.contains("Range too large"));
        assert_eq!(parse_index_or_range("1-1000").unwrap().len(), 1000);

        match parse_selectors(&["1-99999999999"]) {
            Err(LessonError::Api(msg)) => assert!(msg.contains("Range too large")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn parse_selectors_mixes_indexes_and_ids() {
        let selectors = parse_selectors(&["1-2", "A1B2C3"]).unwrap();
        assert_eq!(
            selectors,
            vec![
                LessonSelector::Index(DisplayIndex(1)),
                LessonSelector::Index(DisplayIndex(2)),
                LessonSelector::Id("a1b2c3".to_string()),
            ]
        );
    }

    #[test]
    fn parse_selectors_rejects_garbage() {
        assert!(parse_selectors(&["fractions"]).is_err());
        assert!(parse_selectors(&["ab"]).is_err());
    }

    #[test]
    fn resolve_by_index() {
        let list = lessons(3);
        let id = resolve(&list, &LessonSelector::Index(DisplayIndex(2))).unwrap();
        assert_eq!(id, list[1].id());
        assert!(resolve(&list, &LessonSelector::Index(DisplayIndex(4))).is_err());
    }

    #[test]
    fn resolve_by_id_prefix() {
        let list = lessons(3);
        let full = list[2].id().to_string();
        let id = resolve(&list, &LessonSelector::Id(full.clone())).unwrap();
        assert_eq!(id, list[2].id());

        let missing = resolve(&list, &LessonSelector::Id("zzzz".to_string()));
        assert!(missing.is_err());
    }
}
