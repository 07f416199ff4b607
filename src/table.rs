//! shared per light running totals
//!
//! all consumers merge into one table, guarded by its own lock which is
//! independent from the queue lock. totals are `u128` so summing any
//! number of `u64` counts cannot overflow in practice

use std::collections::BTreeMap;

use parking_lot::Mutex;

use crate::record::Record;

/// Map from light id to the accumulated vehicle count.
///
/// Keys are kept ordered so snapshots, and therefore reports, are
/// deterministic regardless of which consumer merged first.
#[derive(Debug, Default)]
pub struct AggregationTable {
    totals: Mutex<BTreeMap<String, u128>>,
}

impl AggregationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// add `count` to the total of `light_id`, creating the entry if needed
    ///
    /// the read-modify-write happens under one lock acquisition
    pub fn add(&self, light_id: &str, count: u64) {
        let count = u128::from(count);
        let mut totals = self.totals.lock();
        match totals.get_mut(light_id) {
            Some(total) => *total += count,
            None => {
                totals.insert(light_id.to_owned(), count);
            }
        }
    }

    pub fn merge(&self, record: &Record) {
        self.add(&record.light_id, record.vehicle_count);
    }

    pub fn get(&self, light_id: &str) -> Option<u128> {
        self.totals.lock().get(light_id).copied()
    }

    pub fn len(&self) -> usize {
        self.totals.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.lock().is_empty()
    }

    /// sum over every light
    pub fn grand_total(&self) -> u128 {
        self.totals.lock().values().sum()
    }

    /// a key ordered copy of the current totals
    pub fn snapshot(&self) -> BTreeMap<String, u128> {
        self.totals.lock().clone()
    }

    pub fn into_inner(self) -> BTreeMap<String, u128> {
        self.totals.into_inner()
    }
}
