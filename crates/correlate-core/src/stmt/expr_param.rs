use super::*;

/// References a value bound in the query's [`Params`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExprParam {
    pub name: String,
}

impl Expr {
    pub fn param(name: impl Into<String>) -> Self {
        ExprParam { name: name.into() }.into()
    }
}

impl From<ExprParam> for Expr {
    fn from(value: ExprParam) -> Self {
        Self::Param(value)
    }
}
