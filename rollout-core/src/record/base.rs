//! Base implementation of records for logging.
use crate::error::RolloutError;
use std::{
    collections::{
        hash_map::{IntoIter, Iter},
        HashMap,
    },
    convert::Into,
};

/// Represents possible types of values that can be stored in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A single floating-point value, typically used for metrics like fps or reward.
    Scalar(f32),

    /// A 1-dimensional array of floating-point values, e.g. a `(lower, upper)` bound pair.
    Array1(Vec<f32>),

    /// A text value.
    String(String),
}

/// A container for storing key-value pairs of various data types.
///
/// # Examples
///
/// ```rust
/// use rollout_core::record::{Record, RecordValue};
///
/// let mut record = Record::from_scalar("global/episode_reward", 21.0);
/// record.insert("global/episode_length", RecordValue::Scalar(812.0));
///
/// let length = record.get_scalar("global/episode_length").unwrap();
/// assert_eq!(length, 812.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns an iterator over the key-value pairs in the record.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Returns an iterator that consumes the record.
    pub fn into_iter_in_record(self) -> IntoIter<String, RecordValue> {
        self.0.into_iter()
    }

    /// Gets a reference to the value associated with the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Returns `true` if the record has a value for the key.
    pub fn contains_key(&self, k: &str) -> bool {
        self.0.contains_key(k)
    }

    /// Merges two records, consuming both.
    ///
    /// If both records contain the same key, the value from the second record
    /// overwrites the value from the first record.
    pub fn merge(self, record: Record) -> Self {
        Record(self.0.into_iter().chain(record.0).collect())
    }

    /// Merges another record into this one in place.
    pub fn merge_inplace(&mut self, record: Record) {
        for (k, v) in record.into_iter_in_record() {
            self.0.insert(k, v);
        }
    }

    /// Gets a scalar value from the record.
    ///
    /// # Errors
    ///
    /// Returns an error if the key does not exist or the value is not a scalar.
    pub fn get_scalar(&self, k: &str) -> Result<f32, RolloutError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(RolloutError::RecordValueTypeError("Scalar".to_string())),
            None => Err(RolloutError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a 1-dimensional array from the record.
    ///
    /// # Errors
    ///
    /// Returns an error if the key does not exist or the value is not an array.
    pub fn get_array1(&self, k: &str) -> Result<Vec<f32>, RolloutError> {
        match self.0.get(k) {
            Some(RecordValue::Array1(v)) => Ok(v.clone()),
            Some(_) => Err(RolloutError::RecordValueTypeError("Array1".to_string())),
            None => Err(RolloutError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a string value from the record.
    ///
    /// # Errors
    ///
    /// Returns an error if the key does not exist or the value is not a string.
    pub fn get_string(&self, k: &str) -> Result<String, RolloutError> {
        match self.0.get(k) {
            Some(RecordValue::String(s)) => Ok(s.clone()),
            Some(_) => Err(RolloutError::RecordValueTypeError("String".to_string())),
            None => Err(RolloutError::RecordKeyError(k.to_string())),
        }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks if the record is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_typed_getters() {
        let record = Record::from_slice(&[
            ("fps", RecordValue::Scalar(30.0)),
            ("lag", RecordValue::Array1(vec![0.5, 1.5])),
            ("name", RecordValue::String("pong".to_string())),
        ]);

        assert_eq!(record.get_scalar("fps").unwrap(), 30.0);
        assert_eq!(record.get_array1("lag").unwrap(), vec![0.5, 1.5]);
        assert_eq!(record.get_string("name").unwrap(), "pong");

        assert!(matches!(
            record.get_scalar("lag"),
            Err(RolloutError::RecordValueTypeError(_))
        ));
        assert!(matches!(
            record.get_scalar("missing"),
            Err(RolloutError::RecordKeyError(_))
        ));
    }

    #[test]
    fn test_merge_overwrites() {
        let mut r1 = Record::from_scalar("a", 1.0);
        r1.insert("b", RecordValue::Scalar(2.0));
        let r2 = Record::from_scalar("b", 3.0);

        let merged = r1.clone().merge(r2.clone());
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get_scalar("b").unwrap(), 3.0);

        r1.merge_inplace(r2);
        assert_eq!(r1.get_scalar("b").unwrap(), 3.0);
    }
}
