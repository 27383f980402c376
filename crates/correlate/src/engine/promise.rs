use super::accumulator::Copier;
use correlate_core::stmt::{Value, ValueRecord};

/// Index of a promise in its grouping's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct PromiseId(pub(crate) usize);

/// Deferred correlated value for every row sharing one key.
///
/// Rows are referenced by index into the row list being resolved. The
/// promise resolves at most once: the first row receives the value itself,
/// every other row a copy made by the attribute's [`Copier`].
#[derive(Debug)]
pub(crate) struct Promise {
    key: Value,
    rows: Vec<usize>,
    resolved: bool,
}

impl Promise {
    pub(crate) fn new(key: Value, row: usize) -> Self {
        Self {
            key,
            rows: vec![row],
            resolved: false,
        }
    }

    /// The key of the inner grouping level this promise was created for.
    pub(crate) fn key(&self) -> &Value {
        &self.key
    }

    /// Attaches another row. A row attached after resolution receives a copy
    /// of the value already delivered to the first row.
    pub(crate) fn add(&mut self, row: usize, rows: &mut [ValueRecord], slot: usize, copier: Copier) {
        if self.resolved {
            let value = copier.copy(&rows[self.rows[0]][slot]);
            rows[row][slot] = value;
        }
        self.rows.push(row);
    }

    pub(crate) fn is_resolved(&self) -> bool {
        self.resolved
    }

    #[cfg(test)]
    pub(crate) fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Delivers the resolved value to every attached row.
    ///
    /// # Panics
    ///
    /// Panics if the promise was already resolved.
    #[track_caller]
    pub(crate) fn on_result(
        &mut self,
        value: Value,
        rows: &mut [ValueRecord],
        slot: usize,
        copier: Copier,
    ) {
        assert!(!self.resolved, "promise resolved twice");
        self.resolved = true;

        let Some((&first, rest)) = self.rows.split_first() else {
            return;
        };

        for &row in rest {
            rows[row][slot] = copier.copy(&value);
        }
        rows[first][slot] = value;
    }
}
