//! # Traffic congestion pipeline
//!
//! Ingests traffic sensor lines of the form `<timestamp>,<lightID>,<count>`,
//! sums the vehicle count per traffic light and reports the most congested
//! lights.
//!
//! ## Architecture
//! ```text
//! [Producer 0] ┐                              ┌ [Consumer 0] ┐
//! [Producer 1] ├─→ [BoundedQueue] ─→──────────┤ [Consumer 1] ├─→ [AggregationTable] ─→ [Ranking]
//! [Producer P] ┘   (blocking, closable)       └ [Consumer C] ┘
//! ```
//!
//! * the input is split into one contiguous chunk per producer, the
//!   remainder going to the last chunk
//! * producers block while the queue is full, consumers block while it is
//!   empty and not yet closed
//! * the queue is closed only after every producer has been joined, and the
//!   ranking is built only after every consumer has been joined
//! * malformed lines are reported and skipped, they never stop a worker
//!
//! ```rust
//! use congestion::{Config, NullObserver, Pipeline};
//!
//! let lines: Vec<String> = ["t,TL1,5", "t,TL2,3", "t,TL1,7", "t,TL2,1"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//!
//! let mut config = Config::new();
//! config.set_producers(2).set_consumers(3).set_queue_size(1).set_top_n(1);
//!
//! let outcome = Pipeline::new(config).run(&lines, &NullObserver).unwrap();
//! assert_eq!(outcome.totals["TL1"], 12);
//! assert_eq!(outcome.ranking[0].to_string(), "TL1: 12 cars");
//! ```

#[macro_use]
#[doc(hidden)]
extern crate log;

mod config;
mod error;
mod pipeline;
mod table;

pub mod consumer;
pub mod observer;
pub mod producer;
pub mod record;
pub mod report;
pub mod source;

pub use config::Config;
pub use congestion_queue::{BoundedQueue, Closed};
pub use error::Error;
pub use observer::{LogObserver, NullObserver, Observer};
pub use pipeline::{Outcome, Pipeline, Stats};
pub use record::{ParseError, Record};
pub use report::{rank, RankingEntry};
pub use table::AggregationTable;
