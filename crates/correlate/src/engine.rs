mod accumulator;
use accumulator::ContainerAccumulator;

mod batch;
use batch::BatchResolver;

mod builder;
pub use builder::Builder;

mod correlation_query;
mod fill_default;
mod fixed_buffer;
mod grouping;
mod layout;
mod populate;
mod promise;

mod subselect;
use subselect::SubselectResolver;

use crate::{CorrelatedAttribute, Config, Error, FetchStrategy, Result, ViewContext};
use correlate_core::{
    driver::{ReferenceResolver, UnfetchedReferences},
    stmt::ValueRecord,
    QueryEngine,
};

use std::sync::Arc;
use tracing::debug;

/// Resolves correlated attributes of rows produced by a primary query.
///
/// Cloning is cheap; clones share the query engine.
#[derive(Debug, Clone)]
pub struct Engine {
    query_engine: Arc<dyn QueryEngine>,
    config: Arc<Config>,
    references: Arc<dyn ReferenceResolver>,
}

impl Engine {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Creates an engine with the default configuration.
    pub fn new(query_engine: impl QueryEngine) -> Self {
        Self {
            query_engine: Arc::new(query_engine),
            config: Arc::new(Config::default()),
            references: Arc::new(UnfetchedReferences),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn query_engine(&self) -> &dyn QueryEngine {
        &*self.query_engine
    }

    /// Fills the slot of `attr` in every row with its correlated value and
    /// returns the rows in their original order.
    ///
    /// Every row receives a value: rows without a correlation key, and keys
    /// without a correlated row, get the attribute's default (null, or an
    /// empty container). On error the rows are dropped.
    pub async fn resolve(
        &self,
        view: &ViewContext,
        attr: &CorrelatedAttribute,
        mut rows: Vec<ValueRecord>,
    ) -> Result<Vec<ValueRecord>> {
        if rows.is_empty() {
            return Ok(rows);
        }

        if let Some(row) = rows.iter().find(|row| row.len() <= attr.slot) {
            return Err(Error::invalid_configuration(format!(
                "slot {} of '{}' is out of bounds for a row of {} fields",
                attr.slot,
                attr.path,
                row.len()
            )));
        }

        let accumulator = ContainerAccumulator::new(&attr.container, attr.recording);

        let queries = match attr.fetch {
            FetchStrategy::Select { .. } => {
                let batch_size = self
                    .config
                    .batch_size_for(&attr.path, attr.declared_batch_size())?;

                BatchResolver {
                    engine: self,
                    view,
                    attr,
                    batch_size,
                    accumulator,
                }
                .resolve(&mut rows)
                .await?
            }
            FetchStrategy::Subselect => {
                SubselectResolver {
                    engine: self,
                    view,
                    attr,
                    accumulator,
                }
                .resolve(&mut rows)
                .await?
            }
        };

        debug!(
            attribute = %attr.path,
            strategy = ?attr.fetch,
            rows = rows.len(),
            queries,
            "correlation resolved"
        );

        Ok(rows)
    }

    /// Resolves each attribute in turn.
    pub async fn resolve_all(
        &self,
        view: &ViewContext,
        attrs: &[CorrelatedAttribute],
        mut rows: Vec<ValueRecord>,
    ) -> Result<Vec<ValueRecord>> {
        for attr in attrs {
            rows = self.resolve(view, attr, rows).await?;
        }
        Ok(rows)
    }
}
