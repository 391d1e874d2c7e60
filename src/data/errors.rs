//! Errors raised by historical data providers.

/// Result alias for provider operations.
pub type DataResult<T> = Result<T, DataError>;

#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    /// The source could not be opened or its metadata read.
    Io { path: String, message: String },

    /// A row failed to parse.
    MalformedRow { path: String, line: u64, message: String },

    /// The source parsed but contains no observations.
    EmptySource { path: String },

    /// The provider could not produce a snapshot for another reason.
    Unavailable { reason: String },
}

impl std::error::Error for DataError {}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::Io { path, message } => {
                write!(f, "Failed to read historical data '{path}': {message}")
            }
            DataError::MalformedRow { path, line, message } => {
                write!(f, "Malformed row at line {line} of '{path}': {message}")
            }
            DataError::EmptySource { path } => {
                write!(f, "Historical data source '{path}' contains no observations.")
            }
            DataError::Unavailable { reason } => {
                write!(f, "Historical data unavailable: {reason}")
            }
        }
    }
}
