use correlate_core::stmt::{Alias, Params, Query, Value};

/// A view type that can act as the parent context of a correlation.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewType {
    /// Type name, used in messages
    pub name: String,

    /// Alias of the backing entity in the primary query
    pub alias: Alias,

    /// Id field of the backing entity, if the view type declares an id
    pub id: Option<String>,

    /// Row slot holding the id
    pub id_slot: Option<usize>,
}

impl ViewType {
    pub fn new(name: impl Into<String>, alias: impl Into<Alias>) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
            id: None,
            id_slot: None,
        }
    }

    pub fn id(mut self, field: impl Into<String>, slot: usize) -> Self {
        self.id = Some(field.into());
        self.id_slot = Some(slot);
        self
    }

    pub(crate) fn has_id(&self) -> bool {
        self.id.is_some() && self.id_slot.is_some()
    }
}

/// Where the rows being resolved came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewContext {
    pub view_root: ViewType,

    /// The view immediately owning the attribute, when it is not the root
    pub embedding_view: Option<ViewType>,

    /// The query that produced the rows. Required by sub-select fetching.
    pub primary: Option<Query>,

    /// Optional parameters copied into every correlated query
    pub params: Params,
}

impl ViewContext {
    pub fn new(view_root: ViewType) -> Self {
        Self {
            view_root,
            embedding_view: None,
            primary: None,
            params: Params::new(),
        }
    }

    pub fn embedding_view(mut self, view: ViewType) -> Self {
        self.embedding_view = Some(view);
        self
    }

    pub fn primary(mut self, query: Query) -> Self {
        self.primary = Some(query);
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name, value);
        self
    }

    /// Parameters of the primary query followed by the optional parameters.
    pub(crate) fn secondary_params(&self) -> Params {
        let mut params = self
            .primary
            .as_ref()
            .map(|query| query.params.clone())
            .unwrap_or_default();
        params.extend_missing(&self.params);
        params
    }
}
