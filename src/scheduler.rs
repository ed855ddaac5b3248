use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::dom::Document;

/// Time source for the scheduler. Production code uses [`SystemClock`];
/// tests inject a [`ManualClock`] and advance it explicitly, so timer
/// behavior is deterministic without wall-clock waits.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap()
    }
}

/// Token for a scheduled callback. Cancelling a handle whose timer has
/// already fired is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

type TimerCallback = Box<dyn FnOnce(&mut Document) + Send>;

struct TimerEntry {
    deadline: Instant,
    seq: u64,
    id: u64,
    callback: TimerCallback,
}

// Min-heap on (deadline, seq): earliest deadline first, insertion order
// breaking ties.
impl Ord for TimerEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then(other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Eq for TimerEntry {}

/// Single-threaded timer queue: the setTimeout/clearTimeout analog.
/// Schedule-once-after-delay plus cancel-a-pending-schedule; the owning
/// event loop pumps due callbacks with [`Scheduler::run_due`].
pub struct Scheduler {
    clock: Arc<dyn Clock>,
    queue: BinaryHeap<TimerEntry>,
    live: HashSet<u64>,
    next_id: u64,
}

impl Scheduler {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            queue: BinaryHeap::new(),
            live: HashSet::new(),
            next_id: 0,
        }
    }

    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Schedule `callback` to run once, `delay` after now.
    pub fn schedule_after<F>(&mut self, delay: Duration, callback: F) -> TimerHandle
    where
        F: FnOnce(&mut Document) + Send + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.live.insert(id);
        self.queue.push(TimerEntry {
            deadline: self.clock.now() + delay,
            seq: id,
            id,
            callback: Box::new(callback),
        });
        TimerHandle(id)
    }

    /// Cancel a pending timer. Harmless if it already fired or was
    /// cancelled before.
    pub fn cancel(&mut self, handle: TimerHandle) {
        self.live.remove(&handle.0);
    }

    pub fn pending(&self) -> usize {
        self.live.len()
    }

    /// Fire every callback whose deadline has passed, in deadline order.
    /// Returns how many ran.
    pub fn run_due(&mut self, doc: &mut Document) -> usize {
        let now = self.clock.now();
        let mut fired = 0;
        while let Some(entry) = self.queue.peek() {
            if entry.deadline > now {
                break;
            }
            let entry = self.queue.pop().unwrap();
            if !self.live.remove(&entry.id) {
                continue; // cancelled
            }
            (entry.callback)(doc);
            fired += 1;
        }
        fired
    }
}
