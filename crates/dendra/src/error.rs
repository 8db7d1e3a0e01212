use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("expected a JSON array of [nodes, connectors, tags]")]
    NotAnExport,
    #[error("malformed {table} row {index}: {message}")]
    MalformedRow {
        table: &'static str,
        index: usize,
        message: String,
    },
    #[error("skeleton has more than one root: {first} and {second}")]
    MultipleRoots { first: u64, second: u64 },
    #[error("skeleton has nodes but no root")]
    MissingRoot,
    #[error("bandwidth must be a positive number, got {0}")]
    InvalidBandwidth(f64),
    #[error("fraction must lie in [0, 1], got {0}")]
    InvalidFraction(f64),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
