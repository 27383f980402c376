use crate::{Memory, Table};
use correlate_core::{
    stmt::{
        Alias, BinaryOp, Direction, Expr, ExprPath, JoinKind, Params, Query, Source, Value,
    },
    Error, Result,
};

use anyhow::anyhow;
use std::cmp::Ordering;

/// What an alias is bound to while a row combination is evaluated.
#[derive(Debug, Clone)]
enum Binding<'a> {
    Row { table: &'a Table, row: &'a [Value] },
    Value(Value),

    /// Left join without a match
    Null,
}

/// Bindings of one row combination, chained to the enclosing query's
/// bindings while a sub-query is evaluated.
pub(crate) struct Scope<'s, 'a> {
    aliases: &'s [&'a Alias],
    bindings: &'s [Binding<'a>],
    parent: Option<&'s Scope<'s, 'a>>,
}

pub(crate) struct Eval<'a> {
    memory: &'a Memory,
    params: &'a Params,
}

impl<'a> Eval<'a> {
    pub(crate) fn new(memory: &'a Memory, params: &'a Params) -> Self {
        Self { memory, params }
    }

    pub(crate) fn query(
        &self,
        query: &'a Query,
        parent: Option<&Scope<'_, 'a>>,
    ) -> Result<Vec<Value>> {
        if query.select.is_empty() {
            return Err(Error::query_engine(anyhow!("query selects no columns")));
        }

        let aliases: Vec<&'a Alias> = query.aliases().collect();

        let mut combos: Vec<Vec<Binding<'a>>> = vec![vec![]];
        for source in &query.from {
            let rows = self.source(source)?;
            combos = combos
                .into_iter()
                .flat_map(|combo| {
                    rows.iter().map(move |binding| {
                        let mut combo = combo.clone();
                        combo.push(binding.clone());
                        combo
                    })
                })
                .collect();
        }

        for join in &query.joins {
            let rows = self.source(&join.source)?;
            let mut joined = vec![];

            for combo in combos {
                let mut matched = false;

                for binding in &rows {
                    let mut candidate = combo.clone();
                    candidate.push(binding.clone());

                    let width = candidate.len();
                    let scope = Scope {
                        aliases: &aliases[..width],
                        bindings: &candidate,
                        parent,
                    };

                    if is_true(&self.expr(&join.on, &scope)?) {
                        matched = true;
                        joined.push(candidate);
                    }
                }

                if !matched && join.kind == JoinKind::Left {
                    let mut candidate = combo;
                    candidate.push(Binding::Null);
                    joined.push(candidate);
                }
            }

            combos = joined;
        }

        if let Some(filter) = &query.filter {
            let mut kept = vec![];
            for combo in combos {
                let scope = Scope {
                    aliases: &aliases,
                    bindings: &combo,
                    parent,
                };
                if is_true(&self.expr(filter, &scope)?) {
                    kept.push(combo);
                }
            }
            combos = kept;
        }

        if !query.order_by.is_empty() {
            let mut keyed = combos
                .into_iter()
                .map(|combo| {
                    let scope = Scope {
                        aliases: &aliases,
                        bindings: &combo,
                        parent,
                    };
                    let keys = query
                        .order_by
                        .iter()
                        .map(|order_by| self.expr(&order_by.expr, &scope))
                        .collect::<Result<Vec<_>>>()?;
                    Ok((keys, combo))
                })
                .collect::<Result<Vec<_>>>()?;

            keyed.sort_by(|(lhs, _), (rhs, _)| {
                for ((lhs, rhs), order_by) in lhs.iter().zip(rhs).zip(&query.order_by) {
                    let ordering = match order_by.direction {
                        Direction::Asc => lhs.total_cmp(rhs),
                        Direction::Desc => rhs.total_cmp(lhs),
                    };
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                }
                Ordering::Equal
            });

            combos = keyed.into_iter().map(|(_, combo)| combo).collect();
        }

        if let Some(limit) = &query.limit {
            combos = combos
                .into_iter()
                .skip(limit.offset)
                .take(limit.count.unwrap_or(usize::MAX))
                .collect();
        }

        combos
            .iter()
            .map(|combo| {
                let scope = Scope {
                    aliases: &aliases,
                    bindings: combo,
                    parent,
                };
                let fields = query
                    .select
                    .iter()
                    .map(|expr| self.expr(expr, &scope))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::record_from_vec(fields))
            })
            .collect()
    }

    fn source(&self, source: &'a Source) -> Result<Vec<Binding<'a>>> {
        match source {
            Source::Table(source) => {
                let Some(table) = self.memory.get_table(&source.entity) else {
                    return Err(Error::query_engine(anyhow!(
                        "unknown table '{}'",
                        source.entity
                    )));
                };

                Ok(table
                    .rows
                    .iter()
                    .map(|row| Binding::Row { table, row })
                    .collect())
            }
            Source::Keys(source) => match self.param(&source.param)? {
                Value::List(items) => Ok(items
                    .iter()
                    .filter(|item| !item.is_null())
                    .map(|item| Binding::Value(item.clone()))
                    .collect()),
                value => Err(Error::query_engine(anyhow!(
                    "parameter '{}' must be a list to be used as keys; actual={value:?}",
                    source.param
                ))),
            },
        }
    }

    fn param(&self, name: &str) -> Result<&'a Value> {
        self.params
            .get(name)
            .ok_or_else(|| Error::query_engine(anyhow!("parameter '{name}' is not bound")))
    }

    fn expr(&self, expr: &'a Expr, scope: &Scope<'_, 'a>) -> Result<Value> {
        Ok(match expr {
            Expr::And(expr) => {
                let mut unknown = false;
                for operand in &expr.operands {
                    match self.expr(operand, scope)? {
                        Value::Bool(false) => return Ok(false.into()),
                        Value::Null => unknown = true,
                        _ => {}
                    }
                }
                if unknown {
                    Value::Null
                } else {
                    true.into()
                }
            }
            Expr::Or(expr) => {
                let mut unknown = false;
                for operand in &expr.operands {
                    match self.expr(operand, scope)? {
                        Value::Bool(true) => return Ok(true.into()),
                        Value::Null => unknown = true,
                        _ => {}
                    }
                }
                if unknown {
                    Value::Null
                } else {
                    false.into()
                }
            }
            Expr::Not(expr) => match self.expr(&expr.expr, scope)? {
                Value::Bool(value) => (!value).into(),
                Value::Null => Value::Null,
                value => {
                    return Err(Error::query_engine(anyhow!(
                        "NOT requires a boolean; actual={value:?}"
                    )))
                }
            },
            Expr::IsNull(expr) => self.expr(&expr.expr, scope)?.is_null().into(),
            Expr::BinaryOp(expr) => {
                let lhs = self.expr(&expr.lhs, scope)?.into_key();
                let rhs = self.expr(&expr.rhs, scope)?.into_key();

                if lhs.is_null() || rhs.is_null() {
                    return Ok(Value::Null);
                }

                let ordering = lhs.total_cmp(&rhs);
                let result = match expr.op {
                    BinaryOp::Eq => ordering == Ordering::Equal,
                    BinaryOp::Ne => ordering != Ordering::Equal,
                    BinaryOp::Ge => ordering != Ordering::Less,
                    BinaryOp::Gt => ordering == Ordering::Greater,
                    BinaryOp::Le => ordering != Ordering::Greater,
                    BinaryOp::Lt => ordering == Ordering::Less,
                };
                result.into()
            }
            Expr::InList(expr) => {
                let lhs = self.expr(&expr.expr, scope)?;
                let list = match self.expr(&expr.list, scope)? {
                    Value::List(items) => items,
                    Value::Null => return Ok(Value::Null),
                    value => {
                        return Err(Error::query_engine(anyhow!(
                            "IN requires a list; actual={value:?}"
                        )))
                    }
                };
                contains(lhs, list)
            }
            Expr::InSubquery(expr) => {
                let lhs = self.expr(&expr.expr, scope)?;
                let rows = self.query(&expr.query, Some(scope))?;
                let list = rows
                    .into_iter()
                    .map(|row| match row {
                        Value::Record(record) => record.into_vec().into_iter().next(),
                        _ => None,
                    })
                    .map(Option::unwrap_or_default)
                    .collect();
                contains(lhs, list)
            }
            Expr::Param(param) => self.param(&param.name)?.clone(),
            Expr::Path(path) => scope.resolve(path)?,
            Expr::Value(value) => value.clone(),
        })
    }
}

impl Scope<'_, '_> {
    fn resolve(&self, path: &ExprPath) -> Result<Value> {
        let position = self
            .aliases
            .iter()
            .rposition(|alias| **alias == path.alias);

        let Some(position) = position else {
            return match self.parent {
                Some(parent) => parent.resolve(path),
                None => Err(Error::query_engine(anyhow!(
                    "alias '{}' is not bound",
                    path.alias
                ))),
            };
        };

        match (&self.bindings[position], &path.field) {
            (Binding::Null, _) => Ok(Value::Null),
            (Binding::Row { table, row }, Some(field)) => match table.column(field) {
                Some(index) => Ok(row[index].clone()),
                None => Err(Error::query_engine(anyhow!(
                    "unknown field '{field}' of alias '{}'",
                    path.alias
                ))),
            },
            (Binding::Row { row, .. }, None) => Ok(Value::record_from_vec(row.to_vec())),
            (Binding::Value(value), None) => Ok(value.clone()),
            (Binding::Value(_), Some(field)) => Err(Error::query_engine(anyhow!(
                "alias '{}' binds a key, which has no field '{field}'",
                path.alias
            ))),
        }
    }
}

fn is_true(value: &Value) -> bool {
    matches!(value, Value::Bool(true))
}

/// Three-valued membership: null when nothing matched and either side
/// involved a null.
fn contains(lhs: Value, list: Vec<Value>) -> Value {
    let lhs = lhs.into_key();
    if lhs.is_null() {
        return Value::Null;
    }

    let mut unknown = false;
    for item in list {
        let item = item.into_key();
        if item.is_null() {
            unknown = true;
        } else if lhs.total_cmp(&item) == Ordering::Equal {
            return true.into();
        }
    }

    if unknown {
        Value::Null
    } else {
        false.into()
    }
}
