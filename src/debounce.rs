use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::dom::Document;
use crate::scheduler::{Scheduler, TimerHandle};

type DebouncedFn<T> = Arc<Mutex<dyn FnMut(&mut Document, T) + Send>>;

/// Trailing-edge debouncer: coalesces a burst of calls into one delayed
/// invocation of the wrapped callback, carrying the last call's
/// arguments. Each instance owns its own timer; two debouncers over the
/// same callback are fully independent.
pub struct Debouncer<T> {
    callback: DebouncedFn<T>,
    wait: Duration,
    pending: Option<TimerHandle>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(wait: Duration, callback: F) -> Self
    where
        F: FnMut(&mut Document, T) + Send + 'static,
    {
        Self {
            callback: Arc::new(Mutex::new(callback)),
            wait,
            pending: None,
        }
    }

    /// Cancel any pending invocation and schedule a new one `wait` from
    /// now with `args`. Only the last call in a burst ever runs.
    pub fn call(&mut self, sched: &mut Scheduler, args: T) {
        if let Some(handle) = self.pending.take() {
            sched.cancel(handle);
        }
        let callback = Arc::clone(&self.callback);
        let handle = sched.schedule_after(self.wait, move |doc| {
            let mut callback = callback.lock().unwrap();
            (*callback)(doc, args);
        });
        self.pending = Some(handle);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
