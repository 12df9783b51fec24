use chrono::{DateTime, Utc};

/// Rejected user input. Nothing was changed and the user should be asked
/// again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    #[error("`{0}` is not a valid date and time")]
    InvalidDate(String),
    #[error("{0} is already in the past")]
    PastDate(DateTime<Utc>),
}

/// Error returned by widget operations that change persisted state.
#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Persist(#[from] anyhow::Error),
}

impl WidgetError {
    /// The validation failure behind this error, if that is what it is.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            WidgetError::Invalid(e) => Some(e),
            WidgetError::Persist(_) => None,
        }
    }
}
