use super::Value;

/// An unfetched reference to an entity.
///
/// Carries just enough to identify the entity; nothing about it is loaded.
/// Bound as a query parameter, a reference compares equal to its raw id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub entity: String,
    pub id: Box<Value>,
}

impl Reference {
    pub fn new(entity: impl Into<String>, id: impl Into<Value>) -> Self {
        Self {
            entity: entity.into(),
            id: Box::new(id.into()),
        }
    }

    pub fn id(&self) -> &Value {
        &self.id
    }

    pub fn into_id(self) -> Value {
        *self.id
    }
}
