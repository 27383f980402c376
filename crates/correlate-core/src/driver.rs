mod capability;
pub use capability::Capability;

mod reference;
pub use reference::{ReferenceResolver, UnfetchedReferences};

mod response;
pub use response::{Response, Rows};

use crate::{async_trait, stmt::Query};

use std::fmt::Debug;

/// Executes the secondary queries issued while resolving correlations.
#[async_trait]
pub trait QueryEngine: Debug + Send + Sync + 'static {
    /// Describes the engine's capability, which informs query construction.
    fn capability(&self) -> &Capability;

    /// Execute a query, binding the parameters it carries.
    async fn exec(&self, query: Query) -> crate::Result<Response>;
}
