mod eval;

use correlate_core::{
    async_trait,
    driver::{Capability, Response},
    stmt::{Query, ValueRecord},
    QueryEngine, Result,
};

use indexmap::IndexMap;

/// Evaluates queries over tables held in memory.
///
/// Rows are scanned with nested loops in insertion order; there are no
/// indexes.
#[derive(Debug, Default, Clone)]
pub struct Memory {
    tables: IndexMap<String, Table>,
    capability: Capability,
}

#[derive(Debug, Clone)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<ValueRecord>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports `capability` instead of [`Capability::MEMORY`]. Evaluation is
    /// unaffected.
    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capability = capability;
        self
    }

    /// Registers an empty table.
    pub fn table<I, S>(&mut self, entity: impl Into<String>, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables.insert(
            entity.into(),
            Table {
                columns: columns.into_iter().map(Into::into).collect(),
                rows: vec![],
            },
        );
        self
    }

    /// Appends a row to a registered table.
    ///
    /// # Panics
    ///
    /// Panics if the table is not registered or the row has the wrong width.
    #[track_caller]
    pub fn insert(&mut self, entity: &str, row: impl Into<ValueRecord>) -> &mut Self {
        let Some(table) = self.tables.get_mut(entity) else {
            panic!("table '{entity}' is not registered");
        };

        let row = row.into();
        assert_eq!(
            row.len(),
            table.columns.len(),
            "row width does not match table '{entity}'"
        );

        table.rows.push(row);
        self
    }

    pub fn get_table(&self, entity: &str) -> Option<&Table> {
        self.tables.get(entity)
    }
}

impl Table {
    pub(crate) fn column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }
}

#[async_trait]
impl QueryEngine for Memory {
    fn capability(&self) -> &Capability {
        &self.capability
    }

    async fn exec(&self, query: Query) -> Result<Response> {
        let rows = eval::Eval::new(self, &query.params).query(&query, None)?;
        Ok(Response::value_stream(rows))
    }
}
