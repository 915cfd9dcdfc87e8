use crate::errors::{FormatError, PersistenceError, ReportError, ValidationError};
use crate::ledger::{DaySummary, Ledger};
use crate::persistence::{BlobStore, Snapshot, SnapshotStore};
use crate::report::generate_attendance_report;
use crate::roster::{ImportResult, Roster, Student};
use chrono::{Local, NaiveDate};
use log::{error, info, warn};
use std::fs;
use std::io;
use std::path::Path;

const DATE_FORMAT: &str = "%Y-%m-%d";
const IMPORT_EXTENSIONS: [&str; 2] = ["txt", "csv"];

/// Today's local date as an ISO "YYYY-MM-DD" key.
pub fn today() -> String {
    Local::now().date_naive().format(DATE_FORMAT).to_string()
}

/// Identifies one in-flight import. Only the most recently issued ticket is
/// honoured when content arrives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImportTicket(u64);

#[derive(Debug, PartialEq)]
pub enum ImportOutcome {
    Applied(ImportResult),

    /// The ticket was superseded by a later import; nothing changed.
    Stale,
}

/// An AttendanceTracker is one editing session: the roster, the ledger, the
/// selected date and the store they are saved to.
///
/// Construction loads the stored snapshot once. Every successful mutation of
/// the roster or the ledger saves a full snapshot right away. Storage
/// failures are logged and never reported as errors from mutators; a failed
/// save is retried by the next mutation or by [`AttendanceTracker::flush`].
pub struct AttendanceTracker<S: BlobStore> {
    roster: Roster,
    ledger: Ledger,
    selected_date: String,
    store: SnapshotStore<S>,
    latest_import: u64,
    pending_import: Option<u64>,
    saved: bool,
}

impl<S: BlobStore> AttendanceTracker<S> {
    /// Open a session over `backend`, starting from the stored snapshot or,
    /// when there is none or it cannot be read, from the default roster.
    pub fn open(backend: S) -> Self {
        let store = SnapshotStore::new(backend);

        let (roster, ledger) = match store.load() {
            Ok(Some(snapshot)) => (Roster::from(snapshot.students), snapshot.attendance),
            Ok(None) => {
                info!("event=session_open module=tracker status=defaults reason=empty_store");
                (Roster::with_defaults(), Ledger::default())
            }
            Err(err) => {
                error!(
                    "event=session_open module=tracker status=defaults reason=load_failed error={}",
                    err
                );
                (Roster::with_defaults(), Ledger::default())
            }
        };

        Self {
            roster,
            ledger,
            selected_date: today(),
            store,
            latest_import: 0,
            pending_import: None,
            saved: true,
        }
    }

    pub fn add_student(&mut self, name: &str) -> Result<Student, ValidationError> {
        let student = self.roster.add_student(name)?;
        info!(
            "event=student_add module=tracker id={} name={:?}",
            student.id, student.name
        );
        self.persist();

        Ok(student)
    }

    /// Merge already-read import content into the roster.
    pub fn import_students(&mut self, raw: &[u8]) -> Result<ImportResult, FormatError> {
        let result = self.roster.import_students(raw)?;
        info!(
            "event=student_import module=tracker added={} skipped={}",
            result.added.len(),
            result.skipped.len()
        );
        if !result.added.is_empty() {
            self.persist();
        }

        Ok(result)
    }

    /// Start reading an import file. Any earlier ticket becomes stale.
    pub fn begin_import(&mut self) -> ImportTicket {
        self.latest_import += 1;
        self.pending_import = Some(self.latest_import);

        ImportTicket(self.latest_import)
    }

    pub fn is_importing(&self) -> bool {
        self.pending_import.is_some()
    }

    /// Deliver the content read for `ticket`. Import logic only runs here,
    /// and only for the most recent ticket.
    pub fn complete_import(
        &mut self,
        ticket: ImportTicket,
        content: io::Result<Vec<u8>>,
    ) -> Result<ImportOutcome, FormatError> {
        if self.pending_import != Some(ticket.0) {
            warn!(
                "event=import_complete module=tracker status=stale ticket={}",
                ticket.0
            );
            return Ok(ImportOutcome::Stale);
        }
        self.pending_import = None;

        let raw = content?;
        Ok(ImportOutcome::Applied(self.import_students(&raw)?))
    }

    /// Read and import a `.txt` or `.csv` file, one name per line.
    pub fn import_file(&mut self, path: &Path) -> Result<ImportOutcome, FormatError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_lowercase();
        if !IMPORT_EXTENSIONS.contains(&extension.as_str()) {
            return Err(FormatError::UnsupportedExtension(extension));
        }

        let ticket = self.begin_import();
        self.complete_import(ticket, fs::read(path))
    }

    /// Flip a student's presence on `date` and return the new value.
    pub fn toggle_presence(&mut self, date: &str, student_id: u64) -> bool {
        if !self.roster.contains(student_id) {
            warn!(
                "event=presence_toggle module=tracker status=orphan date={} id={}",
                date, student_id
            );
        }

        let present = self.ledger.toggle_presence(date, student_id);
        self.persist();

        present
    }

    /// Flip a student's presence on the selected date.
    pub fn toggle_selected(&mut self, student_id: u64) -> bool {
        let date = self.selected_date.clone();
        self.toggle_presence(&date, student_id)
    }

    pub fn is_present(&self, date: &str, student_id: u64) -> bool {
        self.ledger.is_present(date, student_id)
    }

    /// Number of rostered students marked present on `date`. Orphan entries
    /// are not counted, so this never exceeds [`Self::total_count`].
    pub fn present_count(&self, date: &str) -> usize {
        self.roster
            .list_students()
            .iter()
            .filter(|s| self.ledger.is_present(date, s.id))
            .count()
    }

    pub fn total_count(&self) -> usize {
        self.roster.len()
    }

    pub fn summary(&self, date: &str) -> DaySummary {
        DaySummary {
            date: date.to_string(),
            present: self.present_count(date),
            total: self.total_count(),
        }
    }

    pub fn list_students(&self) -> &[Student] {
        self.roster.list_students()
    }

    pub fn selected_date(&self) -> &str {
        &self.selected_date
    }

    /// Change the selected date. Only canonical "YYYY-MM-DD" calendar dates
    /// are accepted. The selection is not persisted.
    pub fn set_selected_date(&mut self, date: &str) -> Result<(), ValidationError> {
        let parsed = NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|_| ValidationError::MalformedDate(date.to_string()))?;
        if parsed.format(DATE_FORMAT).to_string() != date {
            return Err(ValidationError::MalformedDate(date.to_string()));
        }

        self.selected_date = date.to_string();
        Ok(())
    }

    pub fn attendance_report(&self, date: &str) -> Result<String, ReportError> {
        generate_attendance_report(&self.roster, &self.ledger, date)
    }

    /// Copy the current state into a standalone snapshot.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            students: self.roster.list_students().to_vec(),
            attendance: self.ledger.clone(),
        }
    }

    /// Whether the last save attempt succeeded.
    pub fn is_saved(&self) -> bool {
        self.saved
    }

    /// Save the current snapshot, reporting any storage failure.
    pub fn flush(&mut self) -> Result<(), PersistenceError> {
        let result = self.store.save(&self.snapshot());
        self.saved = result.is_ok();
        result
    }

    pub fn store(&self) -> &SnapshotStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SnapshotStore<S> {
        &mut self.store
    }

    fn persist(&mut self) {
        if let Err(err) = self.flush() {
            warn!(
                "event=snapshot_save module=tracker status=failed error={}",
                err
            );
        }
    }
}
