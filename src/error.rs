use std::fmt;

pub type Result<T> = std::result::Result<T, GridError>;

#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    // grid too small for the fixed layout
    UnsupportedGridSize {
        size: i32,
        min: i32,
    },

    InvalidArgument {
        name: String,
        reason: String,
    },

    IoError(String),

    CsvError(String),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::UnsupportedGridSize { size, min } => {
                write!(f, "Unsupported grid size {}: the layout needs at least {}x{}", size, min, min)
            }
            GridError::InvalidArgument { name, reason } => {
                write!(f, "Invalid argument '{}': {}", name, reason)
            }
            GridError::IoError(msg) => write!(f, "IO error: {}", msg),
            GridError::CsvError(msg) => write!(f, "CSV error: {}", msg),
        }
    }
}

impl std::error::Error for GridError {}

impl From<std::io::Error> for GridError {
    fn from(err: std::io::Error) -> Self {
        GridError::IoError(err.to_string())
    }
}

impl From<csv::Error> for GridError {
    fn from(err: csv::Error) -> Self {
        GridError::CsvError(err.to_string())
    }
}
