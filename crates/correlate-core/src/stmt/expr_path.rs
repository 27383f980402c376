use super::*;

/// References a source bound in the query by its alias.
///
/// With a field, evaluates to that field of the bound record; without one,
/// evaluates to the whole bound value.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprPath {
    pub alias: Alias,
    pub field: Option<String>,
}

impl ExprPath {
    pub fn field(alias: impl Into<Alias>, field: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            field: Some(field.into()),
        }
    }

    pub fn whole(alias: impl Into<Alias>) -> Self {
        Self {
            alias: alias.into(),
            field: None,
        }
    }
}

impl Expr {
    pub fn path(alias: impl Into<Alias>, field: impl Into<String>) -> Self {
        ExprPath::field(alias, field).into()
    }
}

impl From<ExprPath> for Expr {
    fn from(value: ExprPath) -> Self {
        Self::Path(value)
    }
}
