//! the orchestrator
//!
//! lifetime of one run:
//!
//! 1. spawn the consumers, then one producer per input chunk
//! 2. join every producer, then close the queue
//! 3. join every consumer, then rank the table
//!
//! the two joins are hard barriers, closing before every producer is done
//! would let consumers see `Closed` while lines are still unpushed

use std::any::Any;
use std::collections::BTreeMap;
use std::panic;
use std::thread;

use congestion_queue::BoundedQueue;
use crossbeam::thread::{Scope, ScopedJoinHandle};

use crate::config::Config;
use crate::consumer::{consume, ConsumerStats};
use crate::error::Error;
use crate::observer::Observer;
use crate::producer::{produce, split_chunks};
use crate::report::{rank, RankingEntry};
use crate::table::AggregationTable;

/// Counters gathered over one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    /// lines pushed into the queue by all producers
    pub pushed: usize,
    /// well formed records merged into the table
    pub consumed: usize,
    /// malformed lines skipped by consumers
    pub rejected: usize,
    /// peak queue occupancy
    pub high_water: usize,
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// final per light totals, in key order
    pub totals: BTreeMap<String, u128>,
    /// the first `top_n` lights by total, descending
    pub ranking: Vec<RankingEntry>,
    pub stats: Stats,
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: Config,
}

type Panic = Box<dyn Any + Send + 'static>;

// closes the queue if the owning worker unwinds, so no peer stays parked
// on a queue that will never be drained or filled again
struct CloseOnPanic<'a>(&'a BoundedQueue<String>);

impl Drop for CloseOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.close();
        }
    }
}

// join all handles, keeping the first panic instead of unwinding right away
fn join_all<T>(handles: Vec<ScopedJoinHandle<'_, T>>, panicked: &mut Option<Panic>) -> Vec<T> {
    let mut results = Vec::with_capacity(handles.len());
    for h in handles {
        match h.join() {
            Ok(v) => results.push(v),
            Err(e) => {
                error!("worker panicked");
                panicked.get_or_insert(e);
            }
        }
    }
    results
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Pipeline { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the whole pipeline over `lines` and return the final report.
    ///
    /// A panic in any worker is resumed on the calling thread once the
    /// other workers have been shut down.
    pub fn run<O: Observer + ?Sized>(
        &self,
        lines: &[String],
        observer: &O,
    ) -> Result<Outcome, Error> {
        let config = &self.config;
        info!(
            "pipeline start: records={} producers={} consumers={} queue_size={}",
            lines.len(),
            config.producers(),
            config.consumers(),
            config.queue_size()
        );

        let queue = BoundedQueue::with_capacity(config.queue_size());
        let table = AggregationTable::new();

        let stats = crossbeam::thread::scope(|s| {
            self.run_workers(s, lines, &queue, &table, observer)
        })
        .unwrap_or_else(|e| panic::resume_unwind(e))?;

        let totals = table.into_inner();
        let ranking = rank(&totals, config.top_n());
        info!(
            "pipeline done: pushed={} consumed={} rejected={} lights={}",
            stats.pushed,
            stats.consumed,
            stats.rejected,
            totals.len()
        );

        Ok(Outcome {
            totals,
            ranking,
            stats,
        })
    }

    fn run_workers<'env, O: Observer + ?Sized>(
        &self,
        s: &Scope<'env>,
        lines: &'env [String],
        queue: &'env BoundedQueue<String>,
        table: &'env AggregationTable,
        observer: &'env O,
    ) -> Result<Stats, Error> {
        let config = &self.config;
        let throttle = config.throttle();
        let consumer_throttle = config.consumer_throttle();

        let mut consumers = Vec::with_capacity(config.consumers());
        for id in 0..config.consumers() {
            let spawned = s
                .builder()
                .name(format!("consumer-{}", id))
                .spawn(move |_| {
                    let _guard = CloseOnPanic(queue);
                    consume(id, queue, table, consumer_throttle, observer)
                });
            match spawned {
                Ok(h) => consumers.push(h),
                Err(e) => {
                    // already running consumers see `Closed` and exit
                    queue.close();
                    return Err(Error::Spawn(e));
                }
            }
        }

        let mut producers = Vec::with_capacity(config.producers());
        let chunks = split_chunks(lines, config.producers());
        for (id, chunk) in chunks.into_iter().enumerate() {
            let spawned = s
                .builder()
                .name(format!("producer-{}", id))
                .spawn(move |_| {
                    let _guard = CloseOnPanic(queue);
                    produce(id, chunk, queue, throttle, observer)
                });
            match spawned {
                Ok(h) => producers.push(h),
                Err(e) => {
                    // running producers get their lines back and stop
                    queue.close();
                    return Err(Error::Spawn(e));
                }
            }
        }

        let mut panicked = None;

        let pushed: usize = join_all(producers, &mut panicked).into_iter().sum();
        observer.queue_closed();
        queue.close();

        let finished: Vec<ConsumerStats> = join_all(consumers, &mut panicked);
        if let Some(e) = panicked {
            panic::resume_unwind(e);
        }

        Ok(Stats {
            pushed,
            consumed: finished.iter().map(|c| c.consumed).sum(),
            rejected: finished.iter().map(|c| c.rejected).sum(),
            high_water: queue.high_water(),
        })
    }
}
