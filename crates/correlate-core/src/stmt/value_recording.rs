use super::Value;

/// A container wrapper that records every change made after loading.
///
/// Elements added through [`RecordingContainer::load`] and
/// [`RecordingContainer::load_entry`] are part of the loaded state and are
/// not recorded. The mutating methods apply the change and append it to the
/// change log.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordingContainer {
    value: Value,
    actions: Vec<ChangeAction>,
}

/// A change applied to a recording container.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChangeAction {
    Add(Value),
    Remove(Value),
    Put { key: Value, value: Value },
    Clear,
}

impl RecordingContainer {
    /// Wraps a list, set, sorted set or map value.
    #[track_caller]
    pub fn new(value: Value) -> Self {
        assert!(
            matches!(
                value,
                Value::List(_) | Value::Set(_) | Value::SortedSet(_) | Value::Map(_)
            ),
            "recording container must wrap a plain container; value={value:#?}"
        );
        Self {
            value,
            actions: vec![],
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn actions(&self) -> &[ChangeAction] {
        &self.actions
    }

    pub fn is_dirty(&self) -> bool {
        !self.actions.is_empty()
    }

    /// Adds an element as part of the loaded state.
    pub fn load(&mut self, element: Value) {
        add(&mut self.value, element);
    }

    /// Puts a map entry as part of the loaded state.
    pub fn load_entry(&mut self, key: Value, value: Value) {
        if let Value::Map(map) = &mut self.value {
            map.insert(key, value);
        }
    }

    pub fn add(&mut self, element: Value) {
        add(&mut self.value, element.clone());
        self.actions.push(ChangeAction::Add(element));
    }

    pub fn remove(&mut self, element: &Value) -> bool {
        let removed = match &mut self.value {
            Value::List(items) => match items.iter().position(|item| item == element) {
                Some(pos) => {
                    items.remove(pos);
                    true
                }
                None => false,
            },
            Value::Set(set) => set.remove(element),
            Value::SortedSet(set) => set.remove(element),
            Value::Map(map) => map.remove(element).is_some(),
            _ => false,
        };

        if removed {
            self.actions.push(ChangeAction::Remove(element.clone()));
        }

        removed
    }

    pub fn put(&mut self, key: Value, value: Value) {
        self.load_entry(key.clone(), value.clone());
        self.actions.push(ChangeAction::Put { key, value });
    }

    pub fn clear(&mut self) {
        match &mut self.value {
            Value::List(items) => items.clear(),
            Value::Set(set) => set.clear(),
            Value::SortedSet(set) => set.clear(),
            Value::Map(map) => map.clear(),
            _ => {}
        }
        self.actions.push(ChangeAction::Clear);
    }

    /// Returns a copy of the loaded state with an empty change log.
    pub fn fresh_copy(&self) -> Self {
        Self {
            value: self.value.clone(),
            actions: vec![],
        }
    }
}

fn add(container: &mut Value, element: Value) {
    match container {
        Value::List(items) => items.push(element),
        Value::Set(set) => {
            set.insert(element);
        }
        Value::SortedSet(set) => {
            set.insert(element);
        }
        _ => {}
    }
}
