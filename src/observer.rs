//! progress notifications from the worker pools
//!
//! every method has a no-op default, implement only what you care about.
//! methods are called from worker threads, so implementations must be `Sync`

use crate::consumer::ConsumerStats;
use crate::record::{ParseError, Record};

pub trait Observer: Sync {
    /// producer `worker` pushed `line` into the queue
    fn produced(&self, _worker: usize, _line: &str) {}

    /// consumer `worker` merged `record` into the table
    fn consumed(&self, _worker: usize, _record: &Record) {}

    /// consumer `worker` skipped a malformed line
    fn rejected(&self, _worker: usize, _line: &str, _err: &ParseError) {}

    /// producer `worker` is done after pushing `pushed` lines
    fn producer_finished(&self, _worker: usize, _pushed: usize) {}

    /// every producer is done, called right before the queue is closed
    fn queue_closed(&self) {}

    /// consumer `worker` saw the closed queue and stopped
    fn consumer_finished(&self, _worker: usize, _stats: &ConsumerStats) {}
}

/// Reports through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn produced(&self, worker: usize, line: &str) {
        info!("Producer {} added: {}", worker, line);
    }

    fn consumed(&self, worker: usize, record: &Record) {
        info!("Consumer {} processed: {}", worker, record);
    }

    fn rejected(&self, worker: usize, line: &str, err: &ParseError) {
        warn!("Consumer {} skipped {:?}: {}", worker, line, err);
    }

    fn producer_finished(&self, worker: usize, pushed: usize) {
        debug!("Producer {} finished, pushed={}", worker, pushed);
    }

    fn queue_closed(&self) {
        debug!("all producers finished, closing queue");
    }

    fn consumer_finished(&self, worker: usize, stats: &ConsumerStats) {
        debug!(
            "Consumer {} finished, consumed={} rejected={}",
            worker, stats.consumed, stats.rejected
        );
    }
}

/// Ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl Observer for NullObserver {}
