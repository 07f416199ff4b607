//! producer side of the pipeline
//!
//! the input is cut into contiguous chunks, one per producer, and each
//! producer pushes its chunk into the queue in order

use std::thread;
use std::time::Duration;

use congestion_queue::BoundedQueue;

use crate::observer::Observer;

/// Split `items` into `parts` contiguous chunks.
///
/// Every chunk gets `len / parts` items and the remainder is appended to
/// the last one, so the union of the chunks is exactly `items`.
///
/// panics if `parts` is zero
pub fn split_chunks<T>(items: &[T], parts: usize) -> Vec<&[T]> {
    assert!(parts > 0, "cannot split into zero chunks");
    let size = items.len() / parts;
    let mut chunks: Vec<&[T]> = (0..parts - 1)
        .map(|i| &items[i * size..(i + 1) * size])
        .collect();
    chunks.push(&items[(parts - 1) * size..]);
    chunks
}

/// Push every line of `chunk` into `queue`, blocking while it is full.
///
/// Returns how many lines were pushed. That is the whole chunk unless the
/// queue got closed underneath us, which only happens when the pipeline
/// is tearing down after a failure.
pub fn produce<O: Observer + ?Sized>(
    id: usize,
    chunk: &[String],
    queue: &BoundedQueue<String>,
    throttle: Duration,
    observer: &O,
) -> usize {
    let mut pushed = 0;
    for line in chunk {
        if queue.push(line.clone()).is_err() {
            warn!(
                "Producer {}: queue closed with {} lines left",
                id,
                chunk.len() - pushed
            );
            break;
        }
        pushed += 1;
        observer.produced(id, line);

        if !throttle.is_zero() {
            thread::sleep(throttle);
        }
    }
    observer.producer_finished(id, pushed);
    pushed
}
