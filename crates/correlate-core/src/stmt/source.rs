use super::Alias;

/// A relation a query reads rows from.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// The rows of an entity table
    Table(SourceTable),

    /// One row per element of a list parameter
    Keys(SourceKeys),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceTable {
    pub entity: String,
    pub alias: Alias,
}

/// Iterates the elements of the list bound to `param`, binding each one to
/// `alias`. Null elements produce no row.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceKeys {
    pub alias: Alias,
    pub param: String,
}

impl Source {
    pub fn table(entity: impl Into<String>, alias: impl Into<Alias>) -> Self {
        Self::Table(SourceTable {
            entity: entity.into(),
            alias: alias.into(),
        })
    }

    pub fn keys(alias: impl Into<Alias>, param: impl Into<String>) -> Self {
        Self::Keys(SourceKeys {
            alias: alias.into(),
            param: param.into(),
        })
    }

    pub fn alias(&self) -> &Alias {
        match self {
            Self::Table(table) => &table.alias,
            Self::Keys(keys) => &keys.alias,
        }
    }
}

impl From<SourceTable> for Source {
    fn from(value: SourceTable) -> Self {
        Self::Table(value)
    }
}

impl From<SourceKeys> for Source {
    fn from(value: SourceKeys) -> Self {
        Self::Keys(value)
    }
}
