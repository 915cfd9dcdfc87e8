use clap::{value_t, App, AppSettings, Arg, SubCommand};

pub const DEFAULT_STORE_DIR: &str = ".attendance";

#[derive(Debug, PartialEq)]
pub enum Command {
    Add { name: String },
    Import { path: String },
    Toggle { id: u64 },
    List,
    Report,
}

pub struct Args {
    pub store_dir: String,
    pub date: Option<String>,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub command: Command,
}

impl Args {
    pub fn parse() -> Self {
        let matches = App::new("attendance")
            .version(env!("CARGO_PKG_VERSION"))
            .setting(AppSettings::SubcommandRequiredElseHelp)
            .arg(Arg::with_name("store")
                .long("store").takes_value(true).default_value(DEFAULT_STORE_DIR)
                .help("directory the attendance data is kept in"))
            .arg(Arg::with_name("date")
                .long("date").takes_value(true)
                .help("date to work on as YYYY-MM-DD, defaults to today"))
            .arg(Arg::with_name("log_level")
                .long("log-level").takes_value(true).default_value("info")
                .help("log specification, e.g. info or debug"))
            .arg(Arg::with_name("log_dir")
                .long("log-dir").takes_value(true)
                .help("write logs to rotating files in this directory instead of stderr"))
            .subcommand(SubCommand::with_name("add")
                .about("add a student to the roster")
                .arg(Arg::with_name("name").required(true).help("name of the student")))
            .subcommand(SubCommand::with_name("import")
                .about("import students from a .txt or .csv file, one name per line")
                .arg(Arg::with_name("file").required(true).help("path of the file to import")))
            .subcommand(SubCommand::with_name("toggle")
                .about("mark a student present or absent")
                .arg(Arg::with_name("id").required(true).help("id of the student")))
            .subcommand(SubCommand::with_name("list")
                .about("show the roster with each student's status"))
            .subcommand(SubCommand::with_name("report")
                .about("print the attendance sheet as CSV"))
            .get_matches();

        let command = match matches.subcommand() {
            ("add", Some(sub)) => Command::Add {
                name: sub.value_of("name").unwrap_or_default().to_string(),
            },
            ("import", Some(sub)) => Command::Import {
                path: sub.value_of("file").unwrap_or_default().to_string(),
            },
            ("toggle", Some(sub)) => Command::Toggle {
                id: value_t!(sub, "id", u64).unwrap_or_else(|e| e.exit()),
            },
            ("report", _) => Command::Report,
            _ => Command::List,
        };

        Self {
            store_dir: matches.value_of("store").unwrap_or(DEFAULT_STORE_DIR).to_string(),
            date: matches.value_of("date").map(String::from),
            log_level: matches.value_of("log_level").unwrap_or("info").to_string(),
            log_dir: matches.value_of("log_dir").map(String::from),
            command,
        }
    }
}
