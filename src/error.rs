use thiserror::Error;

pub type TimelineResult<T> = Result<T, TimelineError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimelineError {
    #[error("no active session: a subject id is required")]
    NoSession,

    #[error("schedule load failed: {0}")]
    LoadFailure(String),

    #[error("invalid schedule item: {0}")]
    ValidationFailure(String),

    #[error("schedule write rejected: {0}")]
    WriteRejected(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl TimelineError {
    /// Only load failures recover by retrying the same request.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LoadFailure(_))
    }
}
