use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The caller handed us something we refuse to trace.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// A programmer error: the working arrays no longer agree with each other.
    #[error("internal invariant violated: {context}")]
    InternalInvariantViolation { context: String },

    #[error("failed to encode or decode trace: {0}")]
    Codec(#[from] bincode::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        Error::InvalidInput { reason: reason.into() }
    }

    pub(crate) fn invariant(context: impl Into<String>) -> Self {
        Error::InternalInvariantViolation { context: context.into() }
    }
}

/// Fails with [`Error::InternalInvariantViolation`] when two arrays that must
/// line up have different lengths.
pub(crate) fn ensure_len(what: &str, actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(Error::invariant(format!(
            "{what} has length {actual}, expected {expected}"
        )));
    }
    Ok(())
}
