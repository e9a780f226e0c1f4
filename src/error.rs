use thiserror::Error;

#[derive(Error, Debug)]
pub enum MyflationError {
    #[error("Invalid period '{0}': expected YYYY-MM or YYYYMnn")]
    InvalidPeriod(String),

    #[error("Unknown expenditure category: {0}")]
    UnknownCategory(String),

    #[error("Remote payload rejected: {0}")]
    PayloadRejected(String),

    #[error("Category coverage too low for {period}: {found} of {required} required categories have values")]
    InsufficientCoverage {
        period: String,
        found: usize,
        required: usize,
    },

    #[error("Fallback dataset schema mismatch: {0}")]
    FallbackSchema(String),

    #[error("Fallback dataset row {line} is malformed: {details}")]
    FallbackRow { line: usize, details: String },

    #[error("No inflation data available: {0}")]
    NoDataAvailable(String),

    #[error("Invalid provider configuration: {0}")]
    InvalidConfig(String),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MyflationError>;
