use super::Error;

/// Error when a correlation refers to a parent context that the declaring
/// view type cannot supply.
///
/// Raised while planning, before any query is executed.
#[derive(Debug)]
pub(super) struct IllegalGroupingStateError {
    message: Box<str>,
}

impl std::error::Error for IllegalGroupingStateError {}

impl core::fmt::Display for IllegalGroupingStateError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "illegal grouping state: {}", self.message)
    }
}

impl Error {
    /// Creates an illegal grouping state error.
    pub fn illegal_grouping_state(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::IllegalGroupingState(
            IllegalGroupingStateError {
                message: message.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is an illegal grouping state error.
    pub fn is_illegal_grouping_state(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::IllegalGroupingState(_))
    }
}
