use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Formatter;

/// Per-student presence flags for a single date.
pub type AttendanceRecord = BTreeMap<u64, bool>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presence {
    Present,
    Absent,
}

impl From<bool> for Presence {
    fn from(present: bool) -> Self {
        if present {
            Presence::Present
        } else {
            Presence::Absent
        }
    }
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Presence::Present => write!(f, "Present"),
            Presence::Absent => write!(f, "Absent"),
        }
    }
}

/// Head count for one date, as shown under the attendance sheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DaySummary {
    pub date: String,
    pub present: usize,
    pub total: usize,
}

impl fmt::Display for DaySummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Present: {} / {} students", self.present, self.total)
    }
}

/// A Ledger maps ISO dates ("YYYY-MM-DD") to the presence flag of each
/// student id for that day.
///
/// Missing dates and missing student keys both read as absent. Date entries
/// are created the first time a student is toggled on that date and are
/// never removed.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(transparent)]
pub struct Ledger {
    records: BTreeMap<String, AttendanceRecord>,
}

impl Ledger {
    /// Flip the presence flag of a student on the given date and return the
    /// new value. A student with no flag is treated as absent, so the first
    /// toggle marks them present.
    ///
    /// The id is not checked against any roster; toggling an unknown id
    /// simply records an orphan entry.
    pub fn toggle_presence(&mut self, date: &str, student_id: u64) -> bool {
        let record = match self.records.entry(date.to_string()) {
            Entry::Occupied(record) => record.into_mut(),
            Entry::Vacant(vacancy) => vacancy.insert(AttendanceRecord::new()),
        };

        let flag = record.entry(student_id).or_insert(false);
        *flag = !*flag;

        *flag
    }

    pub fn is_present(&self, date: &str, student_id: u64) -> bool {
        self.records
            .get(date)
            .and_then(|record| record.get(&student_id))
            .copied()
            .unwrap_or(false)
    }

    /// Count every `true` flag recorded for the date, orphans included.
    pub fn present_count(&self, date: &str) -> usize {
        self.records
            .get(date)
            .map(|record| record.values().filter(|present| **present).count())
            .unwrap_or(0)
    }

    pub fn record(&self, date: &str) -> Option<&AttendanceRecord> {
        self.records.get(date)
    }

    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: &str = "2024-01-01";

    #[test]
    fn should_mark_present_on_first_toggle() {
        let mut ledger = Ledger::default();

        assert!(ledger.toggle_presence(DAY, 1));
        assert!(ledger.is_present(DAY, 1));
    }

    #[test]
    fn should_restore_original_value_after_two_toggles() {
        let mut ledger = Ledger::default();

        // Check both starting states: never toggled, and already present.
        ledger.toggle_presence(DAY, 1);
        ledger.toggle_presence(DAY, 1);
        assert!(!ledger.is_present(DAY, 1));

        ledger.toggle_presence(DAY, 2);
        let before = ledger.is_present(DAY, 2);
        ledger.toggle_presence(DAY, 2);
        ledger.toggle_presence(DAY, 2);
        assert_eq!(ledger.is_present(DAY, 2), before);
    }

    #[test]
    fn should_default_to_absent_for_unknown_dates_and_students() {
        let mut ledger = Ledger::default();
        assert!(!ledger.is_present(DAY, 1));

        // A date entry exists but this student was never toggled on it.
        ledger.toggle_presence(DAY, 1);
        assert!(!ledger.is_present(DAY, 2));
        assert!(!ledger.is_present("2024-01-02", 1));
    }

    #[test]
    fn should_create_date_entries_lazily() {
        let mut ledger = Ledger::default();
        assert_eq!(ledger.record(DAY), None);

        ledger.toggle_presence(DAY, 3);
        assert_eq!(ledger.record(DAY).map(|r| r.len()), Some(1));
        assert_eq!(ledger.dates().collect::<Vec<_>>(), vec![DAY]);
    }

    #[test]
    fn should_keep_dates_independent() {
        let mut ledger = Ledger::default();
        ledger.toggle_presence(DAY, 1);
        ledger.toggle_presence("2024-01-02", 2);

        assert!(ledger.is_present(DAY, 1));
        assert!(!ledger.is_present(DAY, 2));
        assert!(ledger.is_present("2024-01-02", 2));
        assert!(!ledger.is_present("2024-01-02", 1));
    }

    #[test]
    fn should_count_present_students() {
        let mut ledger = Ledger::default();
        assert_eq!(ledger.present_count(DAY), 0);

        ledger.toggle_presence(DAY, 1);
        ledger.toggle_presence(DAY, 2);
        ledger.toggle_presence(DAY, 3);
        // Student 2 is marked absent again, leaving a stored `false`.
        ledger.toggle_presence(DAY, 2);

        assert_eq!(ledger.present_count(DAY), 2);
    }

    #[test]
    fn should_record_orphan_entries() {
        let mut ledger = Ledger::default();
        ledger.toggle_presence(DAY, 999);

        assert!(ledger.is_present(DAY, 999));
        assert_eq!(ledger.present_count(DAY), 1);
    }

    #[test]
    fn should_serialize_as_nested_date_map() {
        let mut ledger = Ledger::default();
        ledger.toggle_presence(DAY, 1);
        ledger.toggle_presence(DAY, 2);
        ledger.toggle_presence(DAY, 2);

        assert_eq!(
            serde_json::to_string(&ledger).unwrap(),
            r#"{"2024-01-01":{"1":true,"2":false}}"#
        );
    }

    #[test]
    fn should_render_summary_and_presence_labels() {
        let summary = DaySummary {
            date: String::from(DAY),
            present: 1,
            total: 3,
        };

        assert_eq!(summary.to_string(), "Present: 1 / 3 students");
        assert_eq!(Presence::from(true).to_string(), "Present");
        assert_eq!(Presence::from(false).to_string(), "Absent");
    }
}
