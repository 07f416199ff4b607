//! consumer side of the pipeline
//!
//! a consumer pops lines until the queue reports `Closed`, parses each one
//! and merges it into the shared table. an empty queue alone never stops it

use std::thread;
use std::time::Duration;

use congestion_queue::BoundedQueue;

use crate::observer::Observer;
use crate::record::Record;
use crate::table::AggregationTable;

/// What one consumer did during its lifetime.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConsumerStats {
    /// well formed records merged into the table
    pub consumed: usize,
    /// malformed lines that were skipped
    pub rejected: usize,
}

pub fn consume<O: Observer + ?Sized>(
    id: usize,
    queue: &BoundedQueue<String>,
    table: &AggregationTable,
    throttle: Duration,
    observer: &O,
) -> ConsumerStats {
    let mut stats = ConsumerStats::default();
    // the queue guard is released inside pop, the table lock is taken after
    while let Ok(line) = queue.pop() {
        match Record::parse(&line) {
            Ok(record) => {
                table.merge(&record);
                stats.consumed += 1;
                observer.consumed(id, &record);
            }
            Err(err) => {
                stats.rejected += 1;
                observer.rejected(id, &line, &err);
            }
        }
        if !throttle.is_zero() {
            thread::sleep(throttle);
        }
    }
    observer.consumer_finished(id, &stats);
    stats
}
