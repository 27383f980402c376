use crate::provider::CorrelationProvider;
use correlate_core::stmt::{Comparator, Expr};

use std::{fmt, sync::Arc};

/// Mapping metadata of one correlated attribute.
///
/// Supplied by the metamodel; the engine only reads it.
#[derive(Clone)]
pub struct CorrelatedAttribute {
    /// Attribute path used in messages and to look up configuration, e.g.
    /// `"DocumentView.owner"`.
    pub path: String,

    /// Row slot holding the correlation basis value. The resolved value is
    /// written back to the same slot.
    pub slot: usize,

    /// Basis expression in terms of the primary query's aliases. Only the
    /// sub-select strategy evaluates it; batching reads `slot` instead.
    pub basis: Expr,

    /// Entity type of an entity-typed basis. Keys are bound as references
    /// to this entity.
    pub basis_entity: Option<String>,

    pub provider: Arc<dyn CorrelationProvider>,

    pub correlator: Correlator,

    pub container: ContainerKind,

    /// Build dirty-tracking containers
    pub recording: bool,

    /// Field of the correlated entity used as map key
    pub index: Option<String>,

    pub fetch: FetchStrategy,

    /// Associations of the correlated entity to fetch alongside it
    pub fetches: Vec<String>,
}

/// What the correlated query selects for each correlated row.
#[derive(Debug, Clone, PartialEq)]
pub enum Correlator {
    /// One field of the correlated entity, or the whole entity record.
    Basic { result: Option<String> },

    /// Several fields assembled into a record. The record is null when its
    /// first field, the sub-view id, is null.
    Subview { fields: Vec<String> },
}

#[derive(Debug, Clone)]
pub enum ContainerKind {
    /// At most one value per key
    Singular,
    List,
    Set,
    OrderedSet,
    SortedSet(Comparator),
    Map,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    /// Re-query with batches of keys
    Select { batch_size: Option<usize> },

    /// One correlated query joined to the primary query
    Subselect,
}

impl CorrelatedAttribute {
    pub fn new(
        path: impl Into<String>,
        slot: usize,
        provider: impl CorrelationProvider + 'static,
    ) -> Self {
        Self {
            path: path.into(),
            slot,
            basis: Expr::null(),
            basis_entity: None,
            provider: Arc::new(provider),
            correlator: Correlator::Basic { result: None },
            container: ContainerKind::Singular,
            recording: false,
            index: None,
            fetch: FetchStrategy::Select { batch_size: None },
            fetches: vec![],
        }
    }

    pub fn basis(mut self, basis: impl Into<Expr>) -> Self {
        self.basis = basis.into();
        self
    }

    pub fn basis_entity(mut self, entity: impl Into<String>) -> Self {
        self.basis_entity = Some(entity.into());
        self
    }

    /// Select `field` of the correlated entity
    pub fn result(mut self, field: impl Into<String>) -> Self {
        self.correlator = Correlator::Basic {
            result: Some(field.into()),
        };
        self
    }

    pub fn subview<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.correlator = Correlator::Subview {
            fields: fields.into_iter().map(Into::into).collect(),
        };
        self
    }

    pub fn container(mut self, container: ContainerKind) -> Self {
        self.container = container;
        self
    }

    pub fn recording(mut self) -> Self {
        self.recording = true;
        self
    }

    /// Collect into a map keyed by `field`
    pub fn index(mut self, field: impl Into<String>) -> Self {
        self.container = ContainerKind::Map;
        self.index = Some(field.into());
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.fetch = FetchStrategy::Select {
            batch_size: Some(batch_size),
        };
        self
    }

    pub fn subselect(mut self) -> Self {
        self.fetch = FetchStrategy::Subselect;
        self
    }

    pub fn fetch(mut self, path: impl Into<String>) -> Self {
        self.fetches.push(path.into());
        self
    }

    pub fn is_collection(&self) -> bool {
        !matches!(self.container, ContainerKind::Singular)
    }

    pub(crate) fn declared_batch_size(&self) -> Option<usize> {
        match self.fetch {
            FetchStrategy::Select { batch_size } => batch_size,
            FetchStrategy::Subselect => None,
        }
    }
}

impl fmt::Debug for CorrelatedAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CorrelatedAttribute")
            .field("path", &self.path)
            .field("slot", &self.slot)
            .field("provider", &self.provider.name())
            .field("correlator", &self.correlator)
            .field("container", &self.container)
            .field("fetch", &self.fetch)
            .finish()
    }
}
