use std::fmt;

#[derive(Debug)]
pub enum IoError {
    /// File could not be opened or read.
    Read { path: String, message: String },
    /// Bytes are not valid in the requested encoding.
    Decode { path: String, encoding: &'static str },
    /// CSV syntax error that prevents reading the header.
    Csv(String),
    /// A column every record needs is absent from the header.
    MissingColumn { column: String, available: Vec<String> },
    /// Output could not be produced or written.
    Write(String),
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => write!(f, "cannot read {path}: {message}"),
            Self::Decode { path, encoding } => write!(f, "{path} is not valid {encoding}"),
            Self::Csv(msg) => write!(f, "CSV parse error: {msg}"),
            Self::MissingColumn { column, available } => write!(
                f,
                "missing column '{column}' (found: {})",
                available.join(", ")
            ),
            Self::Write(msg) => write!(f, "write error: {msg}"),
        }
    }
}

impl std::error::Error for IoError {}
