//! fixed capacity blocking fifo queue
//!
//! producers block in `push` while the queue is full, consumers block in
//! `pop` while it is empty. once `close` is called no new item is accepted,
//! consumers drain what is left and then observe `Closed`.

use std::collections::VecDeque;
use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, MutexGuard};

/// returned by `pop` once the queue is closed and drained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Closed;

/// returned by `push` when the queue is closed, hands the item back
#[derive(PartialEq, Eq, Clone, Copy)]
pub struct PushError<T>(pub T);

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum TryPushError<T> {
    /// no capacity left, the item is handed back
    Full(T),
    /// the queue is closed, the item is handed back
    Closed(T),
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum TryPopError {
    Empty,
    Closed,
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum PopTimeoutError {
    Timeout,
    Closed,
}

impl fmt::Display for Closed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("receiving on a closed and empty queue")
    }
}

impl Error for Closed {}

impl<T> fmt::Debug for PushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("PushError { .. }")
    }
}

impl<T> fmt::Display for PushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("pushing on a closed queue")
    }
}

impl<T> Error for PushError<T> {}

impl<T> fmt::Display for TryPushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            TryPushError::Full(..) => f.write_str("pushing on a full queue"),
            TryPushError::Closed(..) => f.write_str("pushing on a closed queue"),
        }
    }
}

impl<T: fmt::Debug> Error for TryPushError<T> {}

impl fmt::Display for TryPopError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            TryPopError::Empty => f.write_str("receiving on an empty queue"),
            TryPopError::Closed => f.write_str("receiving on a closed and empty queue"),
        }
    }
}

impl Error for TryPopError {}

impl fmt::Display for PopTimeoutError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PopTimeoutError::Timeout => f.write_str("timed out waiting on queue"),
            PopTimeoutError::Closed => f.write_str("receiving on a closed and empty queue"),
        }
    }
}

impl Error for PopTimeoutError {}

struct State<T> {
    buf: VecDeque<T>,
    closed: bool,
    // the largest length ever reached
    high_water: usize,
}

/// A fixed capacity fifo shared by any number of producers and consumers.
///
/// The buffer, the closed flag and the occupancy counter all live behind
/// one mutex. Waiters park on one of two condition variables, `not_full`
/// for producers and `not_empty` for consumers, so nobody ever spins.
///
/// # Examples
///
/// ```rust
/// use std::thread;
/// use congestion_queue::{BoundedQueue, Closed};
///
/// let q = BoundedQueue::with_capacity(2);
/// thread::scope(|s| {
///     s.spawn(|| {
///         for i in 0..10 {
///             q.push(i).unwrap();
///         }
///         q.close();
///     });
///
///     let mut sum = 0;
///     while let Ok(v) = q.pop() {
///         sum += v;
///     }
///     assert_eq!(sum, 45);
///     assert_eq!(q.pop(), Err(Closed));
/// });
/// ```
pub struct BoundedQueue<T> {
    state: Mutex<State<T>>,
    not_full: Condvar,
    not_empty: Condvar,
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// create a queue that holds at most `capacity` items
    ///
    /// panics if `capacity` is zero, such a queue could never make progress
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "bounded queue capacity must be at least 1");
        BoundedQueue {
            state: Mutex::new(State {
                buf: VecDeque::with_capacity(capacity),
                closed: false,
                high_water: 0,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            capacity,
        }
    }

    // must be called with the lock held and room available
    fn enqueue(&self, mut state: MutexGuard<State<T>>, item: T) {
        state.buf.push_back(item);
        let len = state.buf.len();
        assert!(
            len <= self.capacity,
            "bounded queue overflow: len={} capacity={}",
            len,
            self.capacity
        );
        if len > state.high_water {
            state.high_water = len;
        }
        drop(state);
        self.not_empty.notify_one();
    }

    fn dequeue(&self, mut state: MutexGuard<State<T>>) -> Option<T> {
        let item = state.buf.pop_front();
        drop(state);
        if item.is_some() {
            self.not_full.notify_one();
        }
        item
    }

    /// append `item` at the tail, blocking while the queue is full
    ///
    /// if the queue is closed before room shows up the item is returned
    /// in the error, it is never dropped silently
    pub fn push(&self, item: T) -> Result<(), PushError<T>> {
        let mut state = self.state.lock();
        loop {
            if state.closed {
                return Err(PushError(item));
            }
            if state.buf.len() < self.capacity {
                break;
            }
            self.not_full.wait(&mut state);
        }
        self.enqueue(state, item);
        Ok(())
    }

    pub fn try_push(&self, item: T) -> Result<(), TryPushError<T>> {
        let state = self.state.lock();
        if state.closed {
            return Err(TryPushError::Closed(item));
        }
        if state.buf.len() >= self.capacity {
            return Err(TryPushError::Full(item));
        }
        self.enqueue(state, item);
        Ok(())
    }

    /// remove the head item, blocking while the queue is empty and open
    ///
    /// buffered items are still handed out after `close`, `Closed` is only
    /// returned once the queue is both closed and empty
    pub fn pop(&self) -> Result<T, Closed> {
        let mut state = self.state.lock();
        loop {
            if !state.buf.is_empty() {
                return self.dequeue(state).ok_or(Closed);
            }
            if state.closed {
                return Err(Closed);
            }
            self.not_empty.wait(&mut state);
        }
    }

    pub fn try_pop(&self) -> Result<T, TryPopError> {
        let state = self.state.lock();
        if state.buf.is_empty() {
            return Err(if state.closed {
                TryPopError::Closed
            } else {
                TryPopError::Empty
            });
        }
        self.dequeue(state).ok_or(TryPopError::Empty)
    }

    /// same as `pop` but gives up after `dur`
    ///
    /// a `dur` too large to express as a deadline waits like `pop`
    pub fn pop_timeout(&self, dur: Duration) -> Result<T, PopTimeoutError> {
        let deadline = match Instant::now().checked_add(dur) {
            Some(deadline) => deadline,
            None => return self.pop().map_err(|Closed| PopTimeoutError::Closed),
        };
        let mut state = self.state.lock();
        loop {
            if !state.buf.is_empty() {
                return self.dequeue(state).ok_or(PopTimeoutError::Timeout);
            }
            if state.closed {
                return Err(PopTimeoutError::Closed);
            }
            if self.not_empty.wait_until(&mut state, deadline).timed_out() {
                // one last look, an item may have landed right at the deadline
                if !state.buf.is_empty() {
                    return self.dequeue(state).ok_or(PopTimeoutError::Timeout);
                }
                return Err(if state.closed {
                    PopTimeoutError::Closed
                } else {
                    PopTimeoutError::Timeout
                });
            }
        }
    }

    /// mark the queue as "no more input coming"
    ///
    /// wakes every blocked producer and consumer. returns `true` only for
    /// the call that actually closed the queue
    pub fn close(&self) -> bool {
        let mut state = self.state.lock();
        if state.closed {
            return false;
        }
        state.closed = true;
        drop(state);
        self.not_full.notify_all();
        self.not_empty.notify_all();
        true
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub fn len(&self) -> usize {
        self.state.lock().buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// the largest number of items the queue ever held at once
    pub fn high_water(&self) -> usize {
        self.state.lock().high_water
    }
}

impl<T> fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("BoundedQueue")
            .field("len", &state.buf.len())
            .field("capacity", &self.capacity)
            .field("closed", &state.closed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn smoke() {
        let q = BoundedQueue::with_capacity(1);
        q.push(1).unwrap();
        assert_eq!(q.len(), 1);
        assert_eq!(q.pop(), Ok(1));
        assert!(q.is_empty());
    }

    #[test]
    #[should_panic]
    fn zero_capacity() {
        let _q = BoundedQueue::<u32>::with_capacity(0);
    }

    #[test]
    fn fifo_order() {
        let q = BoundedQueue::with_capacity(8);
        for i in 0..8 {
            q.push(i).unwrap();
        }
        for i in 0..8 {
            assert_eq!(q.pop(), Ok(i));
        }
    }

    #[test]
    fn try_push_full() {
        let q = BoundedQueue::with_capacity(2);
        q.try_push(1).unwrap();
        q.try_push(2).unwrap();
        assert_eq!(q.try_push(3), Err(TryPushError::Full(3)));
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn try_pop_empty_then_closed() {
        let q = BoundedQueue::<u32>::with_capacity(2);
        assert_eq!(q.try_pop(), Err(TryPopError::Empty));
        q.close();
        assert_eq!(q.try_pop(), Err(TryPopError::Closed));
    }

    #[test]
    fn close_drains_first() {
        let q = BoundedQueue::with_capacity(4);
        q.push("a").unwrap();
        q.push("b").unwrap();
        assert!(q.close());
        assert!(!q.close());
        assert_eq!(q.pop(), Ok("a"));
        assert_eq!(q.pop(), Ok("b"));
        assert_eq!(q.pop(), Err(Closed));
        assert_eq!(q.pop(), Err(Closed));
    }

    #[test]
    fn push_after_close() {
        let q = BoundedQueue::with_capacity(4);
        q.close();
        let err = q.push(7).unwrap_err();
        assert_eq!(err.0, 7);
        assert_eq!(q.try_push(8), Err(TryPushError::Closed(8)));
    }

    #[test]
    fn push_blocks_until_pop() {
        let q = Arc::new(BoundedQueue::with_capacity(1));
        q.push(1).unwrap();

        let q2 = q.clone();
        let (tx, rx) = channel();
        let h = thread::spawn(move || {
            q2.push(2).unwrap();
            tx.send(()).unwrap();
        });

        // the producer must still be parked on the full queue
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
        assert_eq!(q.pop(), Ok(1));
        rx.recv().unwrap();
        h.join().unwrap();
        assert_eq!(q.pop(), Ok(2));
        assert_eq!(q.high_water(), 1);
    }

    #[test]
    fn pop_blocks_until_close() {
        let q = Arc::new(BoundedQueue::<u32>::with_capacity(1));
        let q2 = q.clone();
        let (tx, rx) = channel();
        let h = thread::spawn(move || {
            tx.send(q2.pop()).unwrap();
        });

        // empty but still open, the consumer must keep waiting
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
        q.close();
        assert_eq!(rx.recv().unwrap(), Err(Closed));
        h.join().unwrap();
    }

    #[test]
    fn close_wakes_blocked_producer() {
        let q = Arc::new(BoundedQueue::with_capacity(1));
        q.push(1).unwrap();
        let q2 = q.clone();
        let h = thread::spawn(move || q2.push(2));
        thread::sleep(Duration::from_millis(20));
        q.close();
        assert_eq!(h.join().unwrap().unwrap_err().0, 2);
        assert_eq!(q.pop(), Ok(1));
        assert_eq!(q.pop(), Err(Closed));
    }

    #[test]
    fn pop_timeout() {
        let q = BoundedQueue::with_capacity(1);
        assert_eq!(
            q.pop_timeout(Duration::from_millis(10)),
            Err(PopTimeoutError::Timeout)
        );
        q.push(3).unwrap();
        assert_eq!(q.pop_timeout(Duration::from_millis(10)), Ok(3));
        q.close();
        assert_eq!(
            q.pop_timeout(Duration::from_millis(10)),
            Err(PopTimeoutError::Closed)
        );
    }

    #[test]
    fn pop_timeout_unbounded_duration() {
        let q = BoundedQueue::with_capacity(2);
        q.push(1).unwrap();
        assert_eq!(q.pop_timeout(Duration::MAX), Ok(1));

        let (tx, rx) = channel();
        thread::scope(|s| {
            let q = &q;
            s.spawn(move || tx.send(q.pop_timeout(Duration::MAX)).unwrap());
            assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
            q.push(2).unwrap();
            assert_eq!(rx.recv().unwrap(), Ok(2));
        });

        q.close();
        assert_eq!(q.pop_timeout(Duration::MAX), Err(PopTimeoutError::Closed));
    }

    #[test]
    fn multi_producer_multi_consumer() {
        const PRODUCERS: usize = 4;
        const CONSUMERS: usize = 3;
        const PER_PRODUCER: usize = 1000;
        const CAP: usize = 5;

        let q = BoundedQueue::with_capacity(CAP);
        let (tx, rx) = channel();

        thread::scope(|s| {
            let producers: Vec<_> = (0..PRODUCERS)
                .map(|p| {
                    let q = &q;
                    s.spawn(move || {
                        for i in 0..PER_PRODUCER {
                            q.push((p, i)).unwrap();
                        }
                    })
                })
                .collect();

            for _ in 0..CONSUMERS {
                let q = &q;
                let tx = tx.clone();
                s.spawn(move || {
                    let mut seen = Vec::new();
                    while let Ok(v) = q.pop() {
                        seen.push(v);
                    }
                    tx.send(seen).unwrap();
                });
            }
            drop(tx);

            for h in producers {
                h.join().unwrap();
            }
            q.close();
        });

        let mut all: Vec<(usize, usize)> = rx.iter().flatten().collect();
        assert_eq!(all.len(), PRODUCERS * PER_PRODUCER);
        all.sort();
        all.dedup();
        assert_eq!(all.len(), PRODUCERS * PER_PRODUCER);
        assert!(q.high_water() <= CAP);
    }

    #[test]
    fn per_producer_fifo_single_consumer() {
        let q = BoundedQueue::with_capacity(3);
        thread::scope(|s| {
            for p in 0..2 {
                let q = &q;
                s.spawn(move || {
                    for i in 0..200 {
                        q.push((p, i)).unwrap();
                    }
                });
            }

            let mut last = [None::<usize>; 2];
            let mut count = 0;
            while count < 400 {
                let (p, i) = q.pop().unwrap();
                if let Some(prev) = last[p] {
                    assert!(i > prev);
                }
                last[p] = Some(i);
                count += 1;
            }
        });
    }
}
