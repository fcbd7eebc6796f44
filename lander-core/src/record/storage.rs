//! Record storage and aggregation.
use super::{Record, RecordValue};
use std::collections::HashSet;
use xxhash_rust::xxh3::Xxh3Builder;

/// Stores records and aggregates them on demand.
///
/// Scalar values collected under the same key are reduced to min, max, mean
/// and median. For other value types the most recent occurrence wins.
pub struct RecordStorage {
    data: Vec<Record>,
}

fn min(vs: &Vec<f32>) -> RecordValue {
    RecordValue::Scalar(*vs.iter().min_by(|x, y| x.total_cmp(y)).unwrap())
}

fn max(vs: &Vec<f32>) -> RecordValue {
    RecordValue::Scalar(*vs.iter().min_by(|x, y| y.total_cmp(x)).unwrap())
}

fn mean(vs: &Vec<f32>) -> RecordValue {
    RecordValue::Scalar(vs.iter().map(|v| *v).sum::<f32>() / vs.len() as f32)
}

fn median(mut vs: Vec<f32>) -> RecordValue {
    vs.sort_by(|x, y| x.partial_cmp(y).unwrap());
    RecordValue::Scalar(vs[vs.len() / 2])
}

impl RecordStorage {
    fn get_keys(&self) -> HashSet<String, Xxh3Builder> {
        let mut keys = HashSet::<String, Xxh3Builder>::default();
        for record in self.data.iter() {
            for k in record.keys() {
                keys.insert(k.clone());
            }
        }
        keys
    }

    /// Finds the first occurrence of a value with the given key.
    fn find(&self, key: &String) -> &RecordValue {
        for record in self.data.iter() {
            if let Some(value) = record.get(key) {
                return value;
            }
        }
        panic!("Key '{}' was not found. ", key);
    }

    /// Takes the most recent value of a non-scalar key.
    fn latest(&self, key: &String) -> Record {
        for record in self.data.iter().rev() {
            if let Some(value) = record.get(key) {
                return Record::from_slice(&[(key, value.clone())]);
            }
        }
        panic!("Unexpected");
    }

    /// Aggregates scalar values with statistical measures.
    ///
    /// For a single value, returns it directly. For multiple values,
    /// calculates min, max, mean, and median.
    fn scalar(&self, key: &String) -> Record {
        let vs: Vec<f32> = self
            .data
            .iter()
            .filter_map(|record| match record.get(key) {
                Some(v) => match v {
                    RecordValue::Scalar(v) => Some(*v),
                    _ => panic!("Expect RecordValue::Scalar for {}", key),
                },
                None => None,
            })
            .collect();

        if vs.len() == 1 {
            Record::from_slice(&[(format!("{}", key), RecordValue::Scalar(vs[0]))])
        } else {
            Record::from_slice(&[
                (format!("{}_min", key), min(&vs)),
                (format!("{}_max", key), max(&vs)),
                (format!("{}_mean", key), mean(&vs)),
                (format!("{}_median", key), median(vs)),
            ])
        }
    }

    /// Creates a new empty record storage.
    pub fn new() -> Self {
        Self { data: vec![] }
    }

    /// Stores a record in the storage.
    pub fn store(&mut self, record: Record) {
        self.data.push(record);
    }

    /// Aggregates all stored records and clears the storage.
    pub fn aggregate(&mut self) -> Record {
        let mut record = Record::empty();

        for key in self.get_keys().iter() {
            let value = self.find(key);
            let r = match value {
                RecordValue::Scalar(..) => self.scalar(key),
                _ => self.latest(key),
            };
            record = record.merge(r);
        }

        self.data = vec![];

        record
    }
}

impl Default for RecordStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_scalars() {
        let mut storage = RecordStorage::new();
        storage.store(Record::from_scalar("loss", 1.0));
        storage.store(Record::from_scalar("loss", 3.0));
        storage.store(Record::from_scalar("loss", 2.0));

        let agg = storage.aggregate();
        assert_eq!(agg.get_scalar("loss_min").unwrap(), 1.0);
        assert_eq!(agg.get_scalar("loss_max").unwrap(), 3.0);
        assert_eq!(agg.get_scalar("loss_mean").unwrap(), 2.0);
        assert_eq!(agg.get_scalar("loss_median").unwrap(), 2.0);
    }

    #[test]
    fn test_aggregate_single_value_keeps_key() {
        let mut storage = RecordStorage::new();
        storage.store(Record::from_scalar("score", -5.0));
        let agg = storage.aggregate();
        assert_eq!(agg.get_scalar("score").unwrap(), -5.0);
    }
}
