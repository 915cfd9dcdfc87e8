use crate::errors::{FormatError, ValidationError};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Names seeded into a fresh session when nothing has been stored yet.
pub const DEFAULT_STUDENTS: [&str; 3] = ["Alice Smith", "Bob Johnson", "Carol Williams"];

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Student {
    pub id: u64,
    pub name: String,
}

/// The outcome of a bulk import.
#[derive(Debug, Default, PartialEq)]
pub struct ImportResult {
    /// Students appended to the roster, in file order.
    pub added: Vec<Student>,

    /// Names dropped because a student with the same name (ignoring case)
    /// was already on the roster.
    pub skipped: Vec<String>,
}

/// A Roster is the ordered collection of every known student. Insertion
/// order is display order and students are never mutated once added.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Roster {
    students: Vec<Student>,
}

impl Roster {
    pub fn with_defaults() -> Self {
        let students = DEFAULT_STUDENTS
            .iter()
            .zip(1..)
            .map(|(name, id)| Student {
                id,
                name: name.to_string(),
            })
            .collect();

        Self { students }
    }

    pub fn list_students(&self) -> &[Student] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.students.iter().any(|s| s.id == id)
    }

    /// Add a single student to the end of the roster.
    ///
    /// The name is trimmed first; a name that is empty after trimming is
    /// rejected and the roster is left untouched. New students receive the
    /// id one greater than the largest id currently in use. Once the largest
    /// id is `u64::MAX` no further students can be added.
    pub fn add_student(&mut self, name: &str) -> Result<Student, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let student = Student {
            id: self.next_id()?,
            name: name.to_string(),
        };
        self.students.push(student.clone());

        Ok(student)
    }

    /// Merge a block of text, one name per line, into the roster.
    ///
    /// Every non-blank line becomes a candidate and is numbered from the
    /// pre-import maximum id before any filtering happens, so a dropped
    /// candidate leaves a gap in the id sequence. Candidates are only
    /// compared against students that existed before the import; repeated
    /// names inside the same batch are all kept.
    ///
    /// If any surviving candidate would need an id past `u64::MAX` the whole
    /// import is rejected and the roster is left untouched.
    pub fn import_students(&mut self, raw: &[u8]) -> Result<ImportResult, FormatError> {
        let text = String::from_utf8(raw.to_vec())?;
        let base = self.max_id();

        let existing: HashSet<String> = self
            .students
            .iter()
            .map(|s| s.name.to_lowercase())
            .collect();

        let mut result = ImportResult::default();
        let candidates = text
            .split(|c: char| c == '\n' || c == '\r')
            .map(str::trim)
            .filter(|line| !line.is_empty());

        for (offset, name) in candidates.enumerate() {
            if existing.contains(&name.to_lowercase()) {
                debug!("event=import_skip module=roster name={:?}", name);
                result.skipped.push(name.to_string());
                continue;
            }

            let id = base
                .checked_add(offset as u64)
                .and_then(|id| id.checked_add(1))
                .ok_or(ValidationError::IdsExhausted)?;
            result.added.push(Student {
                id,
                name: name.to_string(),
            });
        }

        self.students.extend(result.added.iter().cloned());

        Ok(result)
    }

    fn max_id(&self) -> u64 {
        self.students.iter().map(|s| s.id).max().unwrap_or(0)
    }

    fn next_id(&self) -> Result<u64, ValidationError> {
        self.max_id()
            .checked_add(1)
            .ok_or(ValidationError::IdsExhausted)
    }
}

impl From<Vec<Student>> for Roster {
    fn from(students: Vec<Student>) -> Self {
        Self { students }
    }
}
