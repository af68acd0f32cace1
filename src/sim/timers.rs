//! Virtual-clock scheduler
//!
//! Delayed actions are queued as typed values and handed back from `advance`
//! instead of running callbacks, so the owner processes them in a fixed order
//! inside its own frame. Dropping or `cancel_all` discards everything pending.

/// Handle returned by `schedule_*`, used to cancel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Entry<A> {
    handle: TimerHandle,
    due: f64,
    /// Re-arm interval for repeating timers
    every: Option<f64>,
    action: A,
}

/// Timer queue on a clock that only moves when `advance` is called
#[derive(Debug, Clone)]
pub struct Scheduler<A> {
    now: f64,
    next_id: u64,
    entries: Vec<Entry<A>>,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_id: 1,
            entries: Vec::new(),
        }
    }

    /// Current clock value (seconds)
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Number of pending timers
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    fn push(&mut self, delay: f32, every: Option<f64>, action: A) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            handle,
            due: self.now + delay.max(0.0) as f64,
            every,
            action,
        });
        handle
    }

    /// Fire `action` once after `delay` seconds
    pub fn schedule_once(&mut self, delay: f32, action: A) -> TimerHandle {
        self.push(delay, None, action)
    }

    /// Fire `action` every `interval` seconds (first after one interval)
    pub fn schedule_repeating(&mut self, interval: f32, action: A) -> TimerHandle {
        let interval = interval.max(crate::consts::SPEED_EPSILON);
        self.push(interval, Some(interval as f64), action)
    }

    /// Cancel a pending timer; returns false if it already fired or was cancelled
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }

    /// Drop every pending timer (scene teardown)
    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }
}

impl<A: Clone> Scheduler<A> {
    /// Move the clock forward and return the actions that came due,
    /// ordered by due time then by scheduling order
    pub fn advance(&mut self, dt: f32) -> Vec<A> {
        self.now += dt.max(0.0) as f64;
        let now = self.now;

        let mut fired: Vec<(f64, TimerHandle, A)> = Vec::new();
        let mut kept = Vec::with_capacity(self.entries.len());
        for mut entry in self.entries.drain(..) {
            if entry.due > now {
                kept.push(entry);
                continue;
            }
            match entry.every {
                Some(every) => {
                    // A long frame can owe several repeats
                    while entry.due <= now {
                        fired.push((entry.due, entry.handle, entry.action.clone()));
                        entry.due += every;
                    }
                    kept.push(entry);
                }
                None => fired.push((entry.due, entry.handle, entry.action)),
            }
        }
        self.entries = kept;

        fired.sort_by(|(due_a, TimerHandle(id_a), _), (due_b, TimerHandle(id_b), _)| {
            due_a
                .partial_cmp(due_b)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(id_a.cmp(id_b))
        });
        fired.into_iter().map(|(_, _, action)| action).collect()
    }
}
