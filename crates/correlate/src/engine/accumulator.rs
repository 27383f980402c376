use crate::attribute::ContainerKind;
use correlate_core::stmt::{RecordingContainer, Value, ValueMap, ValueSet, ValueSortedSet};

/// Builds the correlated value of an attribute from its contributing
/// elements.
#[derive(Debug, Clone)]
pub(crate) struct ContainerAccumulator {
    kind: ContainerKind,
    recording: bool,
}

/// How a resolved value is duplicated for every row after the first one
/// sharing a promise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Copier {
    /// Scalars and records: a plain clone
    Identity,

    /// Containers: a fresh container with the same loaded elements
    Container,
}

impl ContainerAccumulator {
    pub(crate) fn new(kind: &ContainerKind, recording: bool) -> Self {
        Self {
            kind: kind.clone(),
            recording,
        }
    }

    pub(crate) fn is_collection(&self) -> bool {
        !matches!(self.kind, ContainerKind::Singular)
    }

    pub(crate) fn is_map(&self) -> bool {
        matches!(self.kind, ContainerKind::Map)
    }

    /// Creates an empty container. Singular attributes have none and get null.
    pub(crate) fn create_container(&self, size_hint: usize) -> Value {
        let container = match &self.kind {
            ContainerKind::Singular => return Value::Null,
            ContainerKind::List => Value::List(Vec::with_capacity(size_hint)),
            ContainerKind::Set | ContainerKind::OrderedSet => {
                Value::Set(ValueSet::with_capacity(size_hint))
            }
            ContainerKind::SortedSet(comparator) => {
                Value::SortedSet(ValueSortedSet::with_capacity(comparator.clone(), size_hint))
            }
            ContainerKind::Map => Value::Map(ValueMap::with_capacity(size_hint)),
        };

        if self.recording {
            RecordingContainer::new(container).into()
        } else {
            container
        }
    }

    /// Adds a loaded element to a container built by `create_container`.
    ///
    /// Maps take their key from `index`; other containers ignore it.
    pub(crate) fn add(&self, container: &mut Value, index: Option<Value>, element: Value) {
        match container {
            Value::List(items) => items.push(element),
            Value::Set(set) => {
                set.insert(element);
            }
            Value::SortedSet(set) => {
                set.insert(element);
            }
            Value::Map(map) => {
                map.insert(index.unwrap_or_default(), element);
            }
            Value::Recording(recording) => match index {
                Some(index) if self.is_map() => recording.load_entry(index, element),
                _ => recording.load(element),
            },
            _ => panic!("not a container; value={container:#?}"),
        }
    }

    /// Value delivered to promises that received no result.
    pub(crate) fn default_value(&self) -> Value {
        self.create_container(0)
    }

    pub(crate) fn copier(&self) -> Copier {
        if self.is_collection() {
            Copier::Container
        } else {
            Copier::Identity
        }
    }
}

impl Copier {
    pub(crate) fn copy(&self, value: &Value) -> Value {
        match (self, value) {
            (Copier::Container, Value::Recording(recording)) => recording.fresh_copy().into(),
            _ => value.clone(),
        }
    }
}
