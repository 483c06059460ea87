use thiserror::Error;

/// Failures raised to the caller. Only contract violations land here;
/// malformed document content is always handled as a skip or repair warning.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid theme: {0}")]
    InvalidTheme(String),

    #[error("invalid layout config: {0}")]
    InvalidConfig(String),
}
