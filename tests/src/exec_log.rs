use crate::logging_engine::EngineOp;
use correlate_core::stmt::{Query, Value};
use std::sync::{Arc, Mutex};

/// A wrapper around the query log that provides a clean API for tests
pub struct ExecLog {
    ops: Arc<Mutex<Vec<EngineOp>>>,
}

impl ExecLog {
    pub(crate) fn new(ops: Arc<Mutex<Vec<EngineOp>>>) -> Self {
        Self { ops }
    }

    /// Get the number of executed queries
    pub fn len(&self) -> usize {
        self.ops.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.lock().unwrap().is_empty()
    }

    /// Count queries matching the given predicate
    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Query) -> bool,
    {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter(|op| predicate(&op.query))
            .count()
    }

    /// Returns the value bound to `name` by each query, in execution order
    pub fn params(&self, name: &str) -> Vec<Option<Value>> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .map(|op| op.query.params.get(name).cloned())
            .collect()
    }

    pub fn clear(&mut self) {
        self.ops.lock().unwrap().clear();
    }

    /// Remove and return the first query from the log
    /// Returns None if the log is empty
    pub fn pop(&mut self) -> Option<Query> {
        let mut ops = self.ops.lock().unwrap();
        if ops.is_empty() {
            None
        } else {
            Some(ops.remove(0).query)
        }
    }

    /// Get access to all operations for custom assertions
    pub fn with_ops<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[EngineOp]) -> R,
    {
        let ops = self.ops.lock().unwrap();
        f(&ops)
    }
}
