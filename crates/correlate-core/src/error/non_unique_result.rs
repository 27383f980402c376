use super::Error;

/// Error when a singular correlated attribute receives more than one result
/// row for the same correlation key.
#[derive(Debug)]
pub(super) struct NonUniqueResultError {
    context: Option<Box<str>>,
}

impl std::error::Error for NonUniqueResultError {}

impl core::fmt::Display for NonUniqueResultError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("non-unique result")?;
        if let Some(ref ctx) = self.context {
            write!(f, ": {}", ctx)?;
        }
        Ok(())
    }
}

impl Error {
    /// Creates a non-unique result error.
    ///
    /// The context parameter names the attribute and the offending key.
    pub fn non_unique_result(context: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::NonUniqueResult(NonUniqueResultError {
            context: Some(context.into().into()),
        }))
    }

    /// Returns `true` if this error is a non-unique result error.
    pub fn is_non_unique_result(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::NonUniqueResult(_))
    }
}
