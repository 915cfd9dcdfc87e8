use std::error::Error;
use std::fmt;
use std::fmt::Formatter;
use std::io;
use std::string::FromUtf8Error;

#[derive(Debug, PartialEq)]
pub enum ValidationError {
    EmptyName,
    MalformedDate(String),
    IdsExhausted,
}

#[derive(Debug)]
pub enum FormatError {
    NotUtf8(FromUtf8Error),
    Unreadable(io::Error),
    UnsupportedExtension(String),
    Rejected(ValidationError),
}

#[derive(Debug)]
pub enum PersistenceError {
    Io(io::Error),
    EncodeError(serde_json::Error),
    DecodeError(serde_json::Error),
}

#[derive(Debug)]
pub enum ReportError {
    SerializeError(csv::Error),
    EncodingError(FromUtf8Error),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyName => write!(f, "student name MUST NOT be empty"),
            ValidationError::MalformedDate(date) => {
                write!(f, "invalid date {:?}, expected YYYY-MM-DD", date)
            }
            ValidationError::IdsExhausted => {
                write!(f, "no student ids left to assign, the roster is full")
            }
        }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::NotUtf8(err) => {
                write!(f, "import file is not valid UTF-8 text: {}", err)
            }
            FormatError::Unreadable(err) => write!(f, "unable to read import file: {}", err),
            FormatError::UnsupportedExtension(ext) => write!(
                f,
                "unsupported import file type {:?}, expected .txt or .csv",
                ext
            ),
            FormatError::Rejected(err) => write!(f, "import rejected: {}", err),
        }
    }
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Io(err) => write!(f, "storage i/o failure: {}", err),
            PersistenceError::EncodeError(err) => {
                write!(f, "failed to encode attendance snapshot: {}", err)
            }
            PersistenceError::DecodeError(err) => {
                write!(f, "failed to decode attendance snapshot: {}", err)
            }
        }
    }
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::SerializeError(err) => {
                write!(f, "failed to serialize attendance record: {}", err)
            }
            ReportError::EncodingError(err) => write!(f, "failed to encode csv report: {}", err),
        }
    }
}

impl From<FromUtf8Error> for FormatError {
    fn from(err: FromUtf8Error) -> Self {
        FormatError::NotUtf8(err)
    }
}

impl From<ValidationError> for FormatError {
    fn from(err: ValidationError) -> Self {
        FormatError::Rejected(err)
    }
}

impl From<io::Error> for FormatError {
    fn from(err: io::Error) -> Self {
        FormatError::Unreadable(err)
    }
}

impl From<io::Error> for PersistenceError {
    fn from(err: io::Error) -> Self {
        PersistenceError::Io(err)
    }
}

impl From<csv::Error> for ReportError {
    fn from(err: csv::Error) -> Self {
        ReportError::SerializeError(err)
    }
}

impl From<FromUtf8Error> for ReportError {
    fn from(err: FromUtf8Error) -> Self {
        ReportError::EncodingError(err)
    }
}

impl Error for ValidationError {}
impl Error for FormatError {}
impl Error for PersistenceError {}
impl Error for ReportError {}
