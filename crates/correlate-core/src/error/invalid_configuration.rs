use super::Error;

/// Error when resolution configuration is invalid.
///
/// This occurs when:
/// - A batch size of zero is configured
/// - A configuration file cannot be parsed
/// - An attribute requests a strategy its view context cannot support
#[derive(Debug)]
pub(super) struct InvalidConfigurationError {
    message: Box<str>,
}

impl std::error::Error for InvalidConfigurationError {}

impl core::fmt::Display for InvalidConfigurationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid configuration: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidConfiguration(
            InvalidConfigurationError {
                message: message.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is an invalid configuration error.
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidConfiguration(_))
    }
}
