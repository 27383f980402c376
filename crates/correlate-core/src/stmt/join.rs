use super::{Expr, Source};

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub source: Source,
    pub on: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// Only combinations satisfying the join condition are kept
    Inner,

    /// Rows without a match are kept, with the joined source bound to null
    Left,
}

impl Join {
    pub fn inner(source: impl Into<Source>, on: impl Into<Expr>) -> Self {
        Self {
            kind: JoinKind::Inner,
            source: source.into(),
            on: on.into(),
        }
    }

    pub fn left(source: impl Into<Source>, on: impl Into<Expr>) -> Self {
        Self {
            kind: JoinKind::Left,
            source: source.into(),
            on: on.into(),
        }
    }
}
