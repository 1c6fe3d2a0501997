use thiserror::Error;

/// Errors that can occur while loading or validating a [`Config`](crate::config::Config).
///
/// The packet pipeline itself is infallible (see [`crate::pipeline`]): it always
/// returns a [`Verdict`](crate::pipeline::Verdict), never an error. This type only
/// covers the crate's fallible edges.
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(String),

    #[error("invalid configuration: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, FilterError>;
