use super::{Expr, ExprPath};

use std::fmt;

/// Name under which a source is bound in a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Alias(String);

impl Alias {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// References a field of the source bound to this alias.
    pub fn field(&self, name: impl Into<String>) -> Expr {
        ExprPath::field(self.clone(), name).into()
    }

    /// References the whole record bound to this alias.
    pub fn whole(&self) -> Expr {
        ExprPath::whole(self.clone()).into()
    }
}

impl From<&str> for Alias {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Alias {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
