use crate::{Error, Result};
use correlate_core::stmt::{Alias, Expr, Limit, OrderByExpr, Params, Value};

/// Defines what a correlated attribute correlates to.
///
/// A provider correlates exactly one root entity and constrains it with a
/// join condition on the basis expression. It may reference the view root
/// or the embedding view through the builder, which makes the engine group
/// rows by that parent as well.
pub trait CorrelationProvider: Send + Sync {
    fn apply_correlation(&self, builder: &mut CorrelationBuilder<'_>, basis: Expr) -> Result<()>;

    /// Name used in error messages.
    fn name(&self) -> &str {
        let name = std::any::type_name::<Self>();
        name.rsplit("::").next().unwrap_or(name)
    }
}

/// Adapts a closure into a [`CorrelationProvider`].
pub fn from_fn<F>(name: impl Into<String>, f: F) -> FnProvider<F>
where
    F: Fn(&mut CorrelationBuilder<'_>, Expr) -> Result<()> + Send + Sync,
{
    FnProvider {
        name: name.into(),
        f,
    }
}

pub struct FnProvider<F> {
    name: String,
    f: F,
}

impl<F> CorrelationProvider for FnProvider<F>
where
    F: Fn(&mut CorrelationBuilder<'_>, Expr) -> Result<()> + Send + Sync,
{
    fn apply_correlation(&self, builder: &mut CorrelationBuilder<'_>, basis: Expr) -> Result<()> {
        (self.f)(builder, basis)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Collects a provider's correlation.
pub struct CorrelationBuilder<'a> {
    provider: &'a str,
    alias: Alias,
    parents: ParentExprs,
    root: Option<String>,
    predicate: Option<Expr>,
    order_by: Vec<OrderByExpr>,
    limit: Option<Limit>,
    params: Params,
    uses: ParentUsage,
    misuse: Option<String>,
}

/// Expressions the builder hands out for the parent contexts.
#[derive(Debug, Clone)]
pub(crate) struct ParentExprs {
    pub(crate) view_root: Expr,
    pub(crate) embedding_view: Option<Expr>,
}

/// Which parent contexts a provider referenced.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ParentUsage {
    pub(crate) view_root: bool,
    pub(crate) embedding_view: bool,
}

/// A provider's finished correlation.
#[derive(Debug, Clone)]
pub(crate) struct Correlation {
    pub(crate) entity: String,
    pub(crate) alias: Alias,
    pub(crate) predicate: Option<Expr>,
    pub(crate) order_by: Vec<OrderByExpr>,
    pub(crate) limit: Option<Limit>,
    pub(crate) params: Params,
    pub(crate) uses: ParentUsage,
}

impl<'a> CorrelationBuilder<'a> {
    pub(crate) fn new(provider: &'a str, alias: Alias, parents: ParentExprs) -> Self {
        Self {
            provider,
            alias,
            parents,
            root: None,
            predicate: None,
            order_by: vec![],
            limit: None,
            params: Params::new(),
            uses: ParentUsage::default(),
            misuse: None,
        }
    }

    /// Correlates the root entity, returning the alias it is bound to.
    ///
    /// A provider correlates exactly one root.
    pub fn correlate(&mut self, entity: impl Into<String>) -> Result<Alias> {
        let entity = entity.into();

        if let Some(root) = &self.root {
            let message = format!("correlated '{entity}' after '{root}'; only one root is allowed");
            self.misuse.get_or_insert_with(|| message.clone());
            return Err(Error::provider_misuse(self.provider, message));
        }

        self.root = Some(entity);
        Ok(self.alias.clone())
    }

    /// ANDs a join condition between the correlated root and the basis.
    pub fn on(&mut self, expr: impl Into<Expr>) -> &mut Self {
        if self.root.is_none() {
            self.misuse
                .get_or_insert_with(|| "join condition added before correlating a root".into());
        }

        self.predicate = Some(match self.predicate.take() {
            Some(predicate) => Expr::and(predicate, expr),
            None => expr.into(),
        });
        self
    }

    /// References the id of the view root.
    pub fn view_root(&mut self) -> Expr {
        self.uses.view_root = true;
        self.parents.view_root.clone()
    }

    /// References the id of the embedding view.
    pub fn embedding_view(&mut self) -> Expr {
        self.uses.embedding_view = true;
        self.parents.embedding_view.clone().unwrap_or_default()
    }

    /// References an optional parameter of the view context.
    pub fn param(&self, name: impl Into<String>) -> Expr {
        Expr::param(name)
    }

    /// Binds a parameter for the correlated query.
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.params.insert(name, value);
        self
    }

    pub fn order_by(&mut self, order_by: OrderByExpr) -> &mut Self {
        self.order_by.push(order_by);
        self
    }

    pub fn limit(&mut self, count: usize) -> &mut Self {
        self.limit.get_or_insert_with(Limit::default).count = Some(count);
        self
    }

    pub fn offset(&mut self, offset: usize) -> &mut Self {
        self.limit.get_or_insert_with(Limit::default).offset = offset;
        self
    }

    pub(crate) fn finish(self) -> Result<Correlation> {
        if let Some(message) = self.misuse {
            return Err(Error::provider_misuse(self.provider, message));
        }

        let Some(entity) = self.root else {
            return Err(Error::provider_misuse(
                self.provider,
                "no root was correlated",
            ));
        };

        Ok(Correlation {
            entity,
            alias: self.alias,
            predicate: self.predicate,
            order_by: self.order_by,
            limit: self.limit,
            params: self.params,
            uses: self.uses,
        })
    }
}

impl ParentUsage {
    pub(crate) fn any(&self) -> bool {
        self.view_root || self.embedding_view
    }
}
