use super::Error;

/// Error when a correlation provider uses the correlation builder in a way
/// the resolution strategy cannot honor.
///
/// This occurs when:
/// - A provider correlates more than one root, or none at all
/// - A provider changes the limit or offset of a sub-select correlation
/// - A provider limits a query that batches several keys
#[derive(Debug)]
pub(super) struct ProviderMisuseError {
    provider: Box<str>,
    message: Box<str>,
}

impl std::error::Error for ProviderMisuseError {}

impl core::fmt::Display for ProviderMisuseError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "correlation provider '{}' misused the correlation builder: {}",
            self.provider, self.message
        )
    }
}

impl Error {
    /// Creates a provider misuse error attributed to the named provider.
    pub fn provider_misuse(provider: impl Into<String>, message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::ProviderMisuse(ProviderMisuseError {
            provider: provider.into().into(),
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a provider misuse error.
    pub fn is_provider_misuse(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::ProviderMisuse(_))
    }
}
