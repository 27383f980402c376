use super::*;

use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// AND a set of binary expressions
    And(ExprAnd),

    /// Binary expression
    BinaryOp(ExprBinaryOp),

    /// Whether an expression is contained by a list of values
    InList(ExprInList),

    /// Whether an expression is contained by the rows of a sub-query
    InSubquery(ExprInSubquery),

    /// Whether an expression evaluates to null
    IsNull(ExprIsNull),

    /// Negates a boolean expression
    Not(ExprNot),

    /// OR a set of binary expressions
    Or(ExprOr),

    /// A named query parameter
    Param(ExprParam),

    /// A field of a bound source, or the whole bound record
    Path(ExprPath),

    /// Evaluates to a constant value
    Value(Value),
}

impl Expr {
    pub fn null() -> Self {
        Self::Value(Value::Null)
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&ExprPath> {
        match self {
            Self::Path(path) => Some(path),
            _ => None,
        }
    }

    /// Returns `true` if the expression, or any of its operands, references
    /// the parameter `name`. Sub-queries are searched too.
    pub fn references_param(&self, name: &str) -> bool {
        match self {
            Self::And(expr) => expr.operands.iter().any(|e| e.references_param(name)),
            Self::Or(expr) => expr.operands.iter().any(|e| e.references_param(name)),
            Self::BinaryOp(expr) => {
                expr.lhs.references_param(name) || expr.rhs.references_param(name)
            }
            Self::InList(expr) => {
                expr.expr.references_param(name) || expr.list.references_param(name)
            }
            Self::InSubquery(expr) => {
                expr.expr.references_param(name) || expr.query.references_param(name)
            }
            Self::IsNull(expr) => expr.expr.references_param(name),
            Self::Not(expr) => expr.expr.references_param(name),
            Self::Param(param) => param.name == name,
            Self::Path(_) | Self::Value(_) => false,
        }
    }
}

impl Default for Expr {
    fn default() -> Self {
        Self::null()
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

macro_rules! impl_from_primitive {
    ( $( $ty:ty ),* ) => {
        $(
            impl From<$ty> for Expr {
                fn from(value: $ty) -> Self {
                    Self::Value(value.into())
                }
            }
        )*
    };
}

impl_from_primitive!(bool, i32, i64, u64, String, &str, Uuid, Reference);

impl From<Alias> for Expr {
    fn from(value: Alias) -> Self {
        value.whole()
    }
}
