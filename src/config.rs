//! Pipeline configuration
//!

use std::time::Duration;

// default configs
const DEFAULT_PRODUCERS: usize = 2;
const DEFAULT_CONSUMERS: usize = 2;
const DEFAULT_QUEUE_SIZE: usize = 10;
const DEFAULT_TOP_N: usize = 3;

/// Sizes of the worker pools and the queue, plus report length.
///
/// The value is fixed once handed to a [`Pipeline`](crate::Pipeline);
/// there is no runtime reconfiguration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    producers: usize,
    consumers: usize,
    queue_size: usize,
    top_n: usize,
    throttle: Duration,
    consumer_throttle: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            producers: DEFAULT_PRODUCERS,
            consumers: DEFAULT_CONSUMERS,
            queue_size: DEFAULT_QUEUE_SIZE,
            top_n: DEFAULT_TOP_N,
            throttle: Duration::ZERO,
            consumer_throttle: Duration::ZERO,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// set the producer thread number
    ///
    /// if you pass 0 to it, will use internal default
    pub fn set_producers(&mut self, producers: usize) -> &mut Self {
        let producers = if producers == 0 {
            DEFAULT_PRODUCERS
        } else {
            producers
        };
        info!("set producers={:?}", producers);
        self.producers = producers;
        self
    }

    /// get the producer thread number
    pub fn producers(&self) -> usize {
        self.producers
    }

    /// set the consumer thread number
    ///
    /// if you pass 0 to it, one consumer per cpu is used
    pub fn set_consumers(&mut self, consumers: usize) -> &mut Self {
        let consumers = if consumers == 0 {
            num_cpus::get()
        } else {
            consumers
        };
        info!("set consumers={:?}", consumers);
        self.consumers = consumers;
        self
    }

    /// get the consumer thread number
    pub fn consumers(&self) -> usize {
        self.consumers
    }

    /// set the queue capacity
    ///
    /// if you pass 0 to it, will use internal default
    pub fn set_queue_size(&mut self, size: usize) -> &mut Self {
        let size = if size == 0 { DEFAULT_QUEUE_SIZE } else { size };
        info!("set queue size={:?}", size);
        self.queue_size = size;
        self
    }

    /// get the queue capacity
    pub fn queue_size(&self) -> usize {
        self.queue_size
    }

    /// set how many lights the report keeps, 0 gives an empty report
    pub fn set_top_n(&mut self, n: usize) -> &mut Self {
        info!("set top n={:?}", n);
        self.top_n = n;
        self
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// set the pause a producer takes after each push
    pub fn set_throttle(&mut self, throttle: Duration) -> &mut Self {
        info!("set throttle={:?}", throttle);
        self.throttle = throttle;
        self
    }

    pub fn throttle(&self) -> Duration {
        self.throttle
    }

    /// set the pause a consumer takes after handling each line
    pub fn set_consumer_throttle(&mut self, throttle: Duration) -> &mut Self {
        info!("set consumer throttle={:?}", throttle);
        self.consumer_throttle = throttle;
        self
    }

    pub fn consumer_throttle(&self) -> Duration {
        self.consumer_throttle
    }
}
