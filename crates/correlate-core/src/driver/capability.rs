#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capability {
    /// Supports a row limit inside an `IN (subquery)` predicate. When false,
    /// a sub-select correlation of a limited primary query cannot keep the
    /// limit.
    pub subquery_limit: bool,
}

impl Capability {
    /// Capabilities of the in-memory engine.
    pub const MEMORY: Self = Self {
        subquery_limit: true,
    };

    /// Engines in the MySQL family reject `LIMIT` inside `IN (subquery)`.
    pub const NO_SUBQUERY_LIMIT: Self = Self {
        subquery_limit: false,
    };
}

impl Default for Capability {
    fn default() -> Self {
        Self::MEMORY
    }
}
