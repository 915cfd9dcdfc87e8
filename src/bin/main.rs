use attendance_tracker::args::{Args, Command};
use attendance_tracker::ledger::Presence;
use attendance_tracker::logging::init_logging;
use attendance_tracker::persistence::FileStore;
use attendance_tracker::tracker::{AttendanceTracker, ImportOutcome};
use std::error::Error;
use std::path::Path;
use std::process;

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut tracker = AttendanceTracker::open(FileStore::new(&args.store_dir));
    if let Some(date) = &args.date {
        tracker.set_selected_date(date)?;
    }
    let date = tracker.selected_date().to_string();

    match args.command {
        Command::Add { name } => {
            let student = tracker.add_student(&name)?;
            println!("added {} ({})", student.name, student.id);
        }
        Command::Import { path } => {
            if let ImportOutcome::Applied(result) = tracker.import_file(Path::new(&path))? {
                println!(
                    "imported {} students, skipped {} already on the roster",
                    result.added.len(),
                    result.skipped.len()
                );
            }
        }
        Command::Toggle { id } => {
            let present = tracker.toggle_selected(id);
            println!("{} {} on {}", id, Presence::from(present), date);
        }
        Command::List => {
            for student in tracker.list_students() {
                let presence = Presence::from(tracker.is_present(&date, student.id));
                println!("{:>4}  {:<30} {}", student.id, student.name, presence);
            }
            println!("{}", tracker.summary(&date));
        }
        Command::Report => print!("{}", tracker.attendance_report(&date)?),
    }

    // Mutations already tried to save; make a lost save visible here.
    if !tracker.is_saved() {
        tracker.flush()?;
    }

    Ok(())
}

fn main() {
    let args = Args::parse();

    let _logger = match init_logging(&args.log_level, args.log_dir.as_deref().map(Path::new)) {
        Ok(handle) => handle,
        Err(err) => {
            eprintln!("failed to start logging: {}", err);
            process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("attendance: {}", err);
        process::exit(1);
    }
}
