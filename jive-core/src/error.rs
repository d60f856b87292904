use std::{error, fmt, io};

#[derive(Debug)]
pub enum Error {
    /// The record carried neither a non-empty "cmd" nor "id" field.  Fatal
    /// for that single record; callers must never substitute a synthetic
    /// identifier.
    MissingItemId,
    UnexpectedResponse,
    JsonError(Box<dyn error::Error + Send>),
    IoError(io::Error),
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingItemId => write!(f, "Record is missing an item identifier"),
            Self::UnexpectedResponse => write!(f, "Unknown server response"),
            Self::JsonError(err) => err.fmt(f),
            Self::IoError(err) => err.fmt(f),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::JsonError(Box::new(err))
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IoError(err)
    }
}
