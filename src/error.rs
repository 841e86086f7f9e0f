use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShengciError {
    #[error("input has no data rows (need a header line and at least one record line)")]
    EmptyInput,

    #[error("header row contains no recognized column labels")]
    UnrecognizedSchema,

    #[error("not enough records to study ({size} in pool)")]
    InsufficientPool { size: usize },

    #[error("vocabulary source unavailable: {0}")]
    SourceUnavailable(String),
}
