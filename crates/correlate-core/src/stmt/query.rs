use super::*;

/// A parameterized query handed to a [`QueryEngine`](crate::QueryEngine).
///
/// Rows are produced from the cartesian product of `from`, extended by each
/// join in order, kept when `filter` evaluates to true, sorted by `order_by`,
/// cut by `limit` and projected through `select`. Each result row is a
/// [`Value::Record`] with one field per selected expression.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub from: Vec<Source>,
    pub joins: Vec<Join>,
    pub filter: Option<Expr>,
    pub select: Vec<Expr>,
    pub order_by: Vec<OrderByExpr>,
    pub limit: Option<Limit>,

    /// Associations the engine may load together with the selected rows
    pub fetches: Vec<ExprPath>,

    pub params: Params,
}

impl Query {
    pub fn from_source(source: impl Into<Source>) -> Self {
        Self {
            from: vec![source.into()],
            ..Self::default()
        }
    }

    pub fn from_table(entity: impl Into<String>, alias: impl Into<Alias>) -> Self {
        Self::from_source(Source::table(entity, alias))
    }

    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    /// ANDs `expr` into the filter.
    pub fn and_filter(&mut self, expr: impl Into<Expr>) {
        self.filter = Some(match self.filter.take() {
            Some(filter) => Expr::and(filter, expr),
            None => expr.into(),
        });
    }

    pub fn filter(mut self, expr: impl Into<Expr>) -> Self {
        self.and_filter(expr);
        self
    }

    pub fn select(mut self, exprs: impl IntoIterator<Item = Expr>) -> Self {
        self.select = exprs.into_iter().collect();
        self
    }

    pub fn order_by(mut self, order_by: OrderByExpr) -> Self {
        self.order_by.push(order_by);
        self
    }

    pub fn limit(mut self, count: usize) -> Self {
        self.limit.get_or_insert_with(Limit::default).count = Some(count);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.limit.get_or_insert_with(Limit::default).offset = offset;
        self
    }

    pub fn bind(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name, value);
        self
    }

    /// Returns `true` if the query may return fewer rows than it matches.
    pub fn is_limited(&self) -> bool {
        self.limit.as_ref().is_some_and(|limit| !limit.is_unbounded())
    }

    /// Iterates over the aliases bound by `from` and `joins`.
    pub fn aliases(&self) -> impl Iterator<Item = &Alias> {
        self.from
            .iter()
            .map(Source::alias)
            .chain(self.joins.iter().map(|join| join.source.alias()))
    }

    /// Returns `true` if any expression of the query references the
    /// parameter `name`, or a keys source iterates it.
    pub fn references_param(&self, name: &str) -> bool {
        let source_uses = |source: &Source| matches!(source, Source::Keys(keys) if keys.param == name);

        self.from.iter().any(source_uses)
            || self
                .joins
                .iter()
                .any(|join| source_uses(&join.source) || join.on.references_param(name))
            || self
                .filter
                .as_ref()
                .is_some_and(|filter| filter.references_param(name))
            || self.select.iter().any(|expr| expr.references_param(name))
            || self
                .order_by
                .iter()
                .any(|order_by| order_by.expr.references_param(name))
    }
}
