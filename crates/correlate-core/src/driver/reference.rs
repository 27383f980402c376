use crate::{stmt::{Reference, Value}, Result};

use std::fmt::Debug;

/// Turns raw identifiers into lightweight references suitable for binding
/// as query parameters, without loading the referenced entity.
pub trait ReferenceResolver: Debug + Send + Sync + 'static {
    fn reference(&self, entity: &str, id: Value) -> Result<Value>;
}

/// Resolves every id to an unfetched [`Value::Reference`].
///
/// Null ids stay null.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnfetchedReferences;

impl ReferenceResolver for UnfetchedReferences {
    fn reference(&self, entity: &str, id: Value) -> Result<Value> {
        Ok(match id {
            Value::Null => Value::Null,
            // Already a reference; keep it.
            Value::Reference(reference) => Value::Reference(reference),
            id => Reference::new(entity, id).into(),
        })
    }
}
