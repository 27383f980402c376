use super::Error;

/// Error reported by the external query engine while executing a query.
#[derive(Debug)]
pub(super) struct QueryEngineError {
    inner: anyhow::Error,
}

impl std::error::Error for QueryEngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source()
    }
}

impl core::fmt::Display for QueryEngineError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "query engine error: {}", self.inner)
    }
}

impl Error {
    /// Wraps a failure reported by a query engine implementation.
    pub fn query_engine(err: impl Into<anyhow::Error>) -> Error {
        Error::from(super::ErrorKind::QueryEngine(QueryEngineError {
            inner: err.into(),
        }))
    }

    /// Returns `true` if this error was reported by the query engine.
    pub fn is_query_engine(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::QueryEngine(_))
    }
}
