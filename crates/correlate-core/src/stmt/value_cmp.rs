//! Ordering for `Value` and `PartialEq` implementations with Rust primitive
//! types, so test assertions can compare values directly.

use super::{Expr, Value};

use std::cmp::Ordering;

impl Value {
    /// A total ordering over values.
    ///
    /// Null sorts first. Values of the same type use their natural order;
    /// records and lists compare lexicographically; containers compare by
    /// their elements in iteration order. Values of different types order by
    /// a fixed rank of their variant. References compare by their id.
    pub fn total_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Less,
            (_, Value::Null) => Ordering::Greater,

            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::I32(a), Value::I32(b)) => a.cmp(b),
            (Value::I64(a), Value::I64(b)) => a.cmp(b),
            (Value::U64(a), Value::U64(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Uuid(a), Value::Uuid(b)) => a.cmp(b),

            // Integers of different widths compare numerically.
            (a, b) if a.as_i64().is_some() && b.as_i64().is_some() => {
                a.as_i64().cmp(&b.as_i64())
            }

            (Value::Reference(a), b) => a.id().total_cmp(b),
            (a, Value::Reference(b)) => a.total_cmp(b.id()),

            (Value::Record(a), Value::Record(b)) => cmp_iter(a.iter(), b.iter()),
            (Value::List(a), Value::List(b)) => cmp_iter(a.iter(), b.iter()),
            (Value::Set(a), Value::Set(b)) => cmp_iter(a.iter(), b.iter()),
            (Value::SortedSet(a), Value::SortedSet(b)) => cmp_iter(a.iter(), b.iter()),
            (Value::Map(a), Value::Map(b)) => {
                cmp_iter(a.keys(), b.keys()).then_with(|| {
                    let a = a.iter().map(|(_, v)| v);
                    let b = b.iter().map(|(_, v)| v);
                    cmp_iter(a, b)
                })
            }
            (Value::Recording(a), b) => a.value().total_cmp(b),
            (a, Value::Recording(b)) => a.total_cmp(b.value()),

            (a, b) => variant_rank(a).cmp(&variant_rank(b)),
        }
    }
}

fn cmp_iter<'a>(
    mut a: impl Iterator<Item = &'a Value>,
    mut b: impl Iterator<Item = &'a Value>,
) -> Ordering {
    loop {
        match (a.next(), b.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = x.total_cmp(y);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

fn variant_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::I32(_) | Value::I64(_) | Value::U64(_) => 2,
        Value::String(_) => 3,
        Value::Uuid(_) => 4,
        Value::Reference(_) => 5,
        Value::Record(_) => 6,
        Value::List(_) => 7,
        Value::Set(_) => 8,
        Value::SortedSet(_) => 9,
        Value::Map(_) => 10,
        Value::Recording(_) => 11,
    }
}

/// Macro to implement PartialEq for numeric and simple types
macro_rules! impl_value_eq {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl PartialEq<$ty> for Value {
                fn eq(&self, other: &$ty) -> bool {
                    matches!(self, Value::$variant(val) if val == other)
                }
            }

            impl PartialEq<$ty> for Expr {
                fn eq(&self, other: &$ty) -> bool {
                    matches!(self, Expr::Value(Value::$variant(val)) if val == other)
                }
            }

            impl PartialEq<Value> for $ty {
                fn eq(&self, other: &Value) -> bool {
                    other.eq(self)
                }
            }
        )*
    };
}

impl_value_eq! {
    bool => Bool,
    i32 => I32,
    i64 => I64,
    u64 => U64,
    String => String,
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        matches!(self, Value::String(val) if val == other)
    }
}

impl PartialEq<Value> for &str {
    fn eq(&self, other: &Value) -> bool {
        other.eq(self)
    }
}

impl PartialEq<&str> for Expr {
    fn eq(&self, other: &&str) -> bool {
        matches!(self, Expr::Value(Value::String(val)) if val == other)
    }
}
