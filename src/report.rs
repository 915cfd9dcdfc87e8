use crate::errors::ReportError;
use crate::ledger::{Ledger, Presence};
use crate::roster::Roster;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct SheetRow<'a> {
    id: u64,
    name: &'a str,
    status: String,
}

/// Generate a CSV attendance sheet for `date`: one row per rostered student,
/// in roster order, with a `Present`/`Absent` status column.
///
/// Ledger entries for ids that are not on the roster are left out.
pub fn generate_attendance_report(
    roster: &Roster,
    ledger: &Ledger,
    date: &str,
) -> Result<String, ReportError> {
    let mut buf = Vec::new();
    {
        let mut wtr = csv::Writer::from_writer(&mut buf);

        for student in roster.list_students() {
            let presence = Presence::from(ledger.is_present(date, student.id));
            wtr.serialize(SheetRow {
                id: student.id,
                name: &student.name,
                status: presence.to_string(),
            })?;
        }

        wtr.flush().map_err(csv::Error::from)?;
    }

    Ok(String::from_utf8(buf)?)
}
