use thiserror::Error;

pub type AggregatorResult<T> = Result<T, AggregatorError>;

#[derive(Error, Debug)]
pub enum AggregatorError {
    /// The input is unreadable or its header is missing a required column.
    #[error("Source error: {0}")]
    Source(String),

    /// A data row could not be parsed. Aborts the whole aggregation; no
    /// partial totals survive a parse failure.
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The output directory or a report file could not be written.
    #[error("Destination error: {0}")]
    Destination(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
