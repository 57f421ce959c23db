//! Base implementation of records.
use crate::error::EpisodicError;
use std::collections::{
    hash_map::{Iter, Keys},
    HashMap,
};

/// Values stored in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A number, e.g., an episode return or a step index.
    Scalar(f32),

    /// A text value.
    String(String),
}

impl RecordValue {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "Scalar",
            Self::String(_) => "String",
        }
    }
}

/// Key-value pairs describing one event of a run.
#[derive(Debug, Clone, Default)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record holding one scalar.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Keys of the record, in no particular order.
    pub fn keys(&self) -> Keys<String, RecordValue> {
        self.0.keys()
    }

    /// Inserts a value, replacing the one under the same key.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Key-value pairs of the record.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// The value under `k`.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Merges two records. On a shared key the value of `record` is kept.
    pub fn merge(self, record: Record) -> Self {
        Record(self.0.into_iter().chain(record.0).collect())
    }

    fn typed<T>(
        &self,
        k: &str,
        expected: &str,
        f: impl FnOnce(&RecordValue) -> Option<T>,
    ) -> Result<T, EpisodicError> {
        let v = self
            .0
            .get(k)
            .ok_or_else(|| EpisodicError::RecordKeyError(k.to_string()))?;
        f(v).ok_or_else(|| {
            EpisodicError::RecordValueTypeError(format!(
                "{}: expected {}, found {}",
                k,
                expected,
                v.type_name()
            ))
        })
    }

    /// The scalar under `k`.
    pub fn get_scalar(&self, k: &str) -> Result<f32, EpisodicError> {
        self.typed(k, "Scalar", |v| match v {
            RecordValue::Scalar(x) => Some(*x),
            _ => None,
        })
    }

    /// The string under `k`.
    pub fn get_string(&self, k: &str) -> Result<String, EpisodicError> {
        self.typed(k, "String", |v| match v {
            RecordValue::String(s) => Some(s.clone()),
            _ => None,
        })
    }

    /// Returns `true` if the record has no values.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
