use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaxError {
    #[error("Network request failed for {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Required field '{field}' missing or malformed in source data")]
    Schema { field: String },

    #[error("Unknown timezone '{0}'")]
    UnknownTimezone(String),

    #[error("Could not parse '{text}' with format '{format}'")]
    DateParse {
        text: String,
        format: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Locale '{0}' is not available")]
    LocaleUnavailable(String),

    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    #[error("Invalid date format string '{0}'")]
    InvalidFormat(String),

    #[error("I/O error on dataset file '{0}'")]
    DatasetIo(PathBuf, #[source] std::io::Error),

    #[error("CSV error on dataset file '{0}'")]
    DatasetCsv(PathBuf, #[source] csv::Error),

    #[error("Malformed dataset file '{path}' at line {line}: {message}")]
    DatasetFormat {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, VaxError>;

impl VaxError {
    pub(crate) fn schema(field: impl Into<String>) -> Self {
        VaxError::Schema {
            field: field.into(),
        }
    }
}
