use super::*;

use uuid::Uuid;

#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Boolean value
    Bool(bool),

    /// Signed 32-bit integer
    I32(i32),

    /// Signed 64-bit integer
    I64(i64),

    /// Unsigned 64-bit integer
    U64(u64),

    /// String value
    String(String),

    /// UUID value
    Uuid(Uuid),

    /// An unfetched reference to an entity, identified by its id
    Reference(Reference),

    /// Record value: a row, or a sub-object assembled from several columns
    Record(ValueRecord),

    /// An ordered list of values
    List(Vec<Value>),

    /// An insertion-ordered set of distinct values
    Set(ValueSet),

    /// A set kept in comparator order
    SortedSet(ValueSortedSet),

    /// An insertion-ordered map
    Map(ValueMap),

    /// A container that tracks changes made to it after loading
    Recording(Box<RecordingContainer>),

    /// Null value
    #[default]
    Null,
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn is_record(&self) -> bool {
        matches!(self, Self::Record(_))
    }

    pub fn record_from_vec(fields: Vec<Self>) -> Self {
        ValueRecord::from_vec(fields).into()
    }

    pub fn list_from_vec(items: Vec<Self>) -> Self {
        Self::List(items)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Returns `true` for list, set, sorted set, map and recording values.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Self::List(_) | Self::Set(_) | Self::SortedSet(_) | Self::Map(_) | Self::Recording(_)
        )
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(&**v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::I32(v) => Some(v as i64),
            Self::I64(v) => Some(v),
            Self::U64(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&ValueRecord> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Self::Reference(reference) => Some(reference),
            _ => None,
        }
    }

    /// Returns the number of elements of a container value, `None` otherwise.
    pub fn container_len(&self) -> Option<usize> {
        match self {
            Self::List(items) => Some(items.len()),
            Self::Set(set) => Some(set.len()),
            Self::SortedSet(set) => Some(set.len()),
            Self::Map(map) => Some(map.len()),
            Self::Recording(recording) => recording.value().container_len(),
            _ => None,
        }
    }

    /// Normalizes a value for use as a lookup key.
    ///
    /// References compare by the id they point to, so a reference and the
    /// raw id it wraps produce the same key.
    pub fn into_key(self) -> Value {
        match self {
            Self::Reference(reference) => reference.into_id(),
            value => value,
        }
    }

    /// Borrowing form of [`Value::into_key`].
    pub fn key(&self) -> &Value {
        match self {
            Self::Reference(reference) => reference.id(),
            value => value,
        }
    }

    #[track_caller]
    pub fn unwrap_record(self) -> ValueRecord {
        match self {
            Self::Record(record) => record,
            _ => panic!("expected Value::Record; actual={self:#?}"),
        }
    }

    #[track_caller]
    pub fn unwrap_list(self) -> Vec<Value> {
        match self {
            Self::List(list) => list,
            Self::Recording(recording) => (*recording).into_value().unwrap_list(),
            _ => panic!("expected Value::List; actual={self:#?}"),
        }
    }

    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

macro_rules! impl_from {
    ( $( $ty:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$ty> for Value {
                fn from(src: $ty) -> Self {
                    Self::$variant(src)
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i32 => I32,
    i64 => I64,
    u64 => U64,
    String => String,
    Uuid => Uuid,
    Reference => Reference,
    ValueRecord => Record,
    Vec<Value> => List,
    ValueSet => Set,
    ValueSortedSet => SortedSet,
    ValueMap => Map,
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl From<&String> for Value {
    fn from(src: &String) -> Self {
        Self::String(src.clone())
    }
}

impl From<RecordingContainer> for Value {
    fn from(src: RecordingContainer) -> Self {
        Self::Recording(Box::new(src))
    }
}

impl<T> From<Option<T>> for Value
where
    Value: From<T>,
{
    fn from(src: Option<T>) -> Self {
        match src {
            Some(value) => Value::from(value),
            None => Value::Null,
        }
    }
}
