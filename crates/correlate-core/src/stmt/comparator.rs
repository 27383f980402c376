use super::Value;

use std::{cmp::Ordering, fmt, sync::Arc};

/// Ordering used by sorted-set containers.
#[derive(Clone)]
pub struct Comparator {
    cmp: Arc<dyn Fn(&Value, &Value) -> Ordering + Send + Sync>,
}

impl Comparator {
    /// Orders values by [`Value::total_cmp`].
    pub fn natural() -> Self {
        Self::by(Value::total_cmp)
    }

    /// Orders values by a caller supplied function.
    pub fn by(cmp: impl Fn(&Value, &Value) -> Ordering + Send + Sync + 'static) -> Self {
        Self { cmp: Arc::new(cmp) }
    }

    /// Orders records by the field at `index`, using the natural order.
    pub fn by_field(index: usize) -> Self {
        Self::by(move |a, b| {
            let a = a.as_record().and_then(|record| record.get(index));
            let b = b.as_record().and_then(|record| record.get(index));
            match (a, b) {
                (Some(a), Some(b)) => a.total_cmp(b),
                (a, b) => a.is_some().cmp(&b.is_some()),
            }
        })
    }

    /// Returns a comparator with the opposite order.
    pub fn reverse(&self) -> Self {
        let cmp = self.cmp.clone();
        Self::by(move |a, b| cmp(b, a))
    }

    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        (self.cmp)(a, b)
    }
}

impl Default for Comparator {
    fn default() -> Self {
        Self::natural()
    }
}

impl fmt::Debug for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Comparator")
    }
}
