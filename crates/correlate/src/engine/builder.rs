use super::Engine;
use crate::{Config, Result};
use correlate_core::{
    driver::{ReferenceResolver, UnfetchedReferences},
    QueryEngine,
};

use std::sync::Arc;

#[derive(Debug, Default)]
pub struct Builder {
    config: Config,
    references: Option<Arc<dyn ReferenceResolver>>,
}

impl Builder {
    pub fn config(&mut self, config: Config) -> &mut Self {
        self.config = config;
        self
    }

    /// Sets how entity-typed keys are turned into query parameters.
    /// Defaults to [`UnfetchedReferences`].
    pub fn reference_resolver(&mut self, references: impl ReferenceResolver) -> &mut Self {
        self.references = Some(Arc::new(references));
        self
    }

    pub fn build(&mut self, query_engine: impl QueryEngine) -> Result<Engine> {
        self.config.validate()?;

        Ok(Engine {
            query_engine: Arc::new(query_engine),
            config: Arc::new(self.config.clone()),
            references: self
                .references
                .clone()
                .unwrap_or_else(|| Arc::new(UnfetchedReferences) as Arc<dyn ReferenceResolver>),
        })
    }
}
