//! Cancellable tick-driven timer queue
//!
//! The orchestrator schedules staggered reel starts and stops as delayed
//! actions. Everything runs on the caller's tick; there are no threads.
//! Cancelling drops every pending action, which is how an aborted spin
//! guarantees no stale stop can fire later.

use log::debug;

/// An action the orchestrator deferred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduledAction {
    /// Begin spinning reel `column`
    StartReel { column: u8 },
    /// Land reel `column` on its committed targets
    StopReel { column: u8 },
}

#[derive(Debug)]
struct Entry {
    fire_at_ms: f64,
    action: ScheduledAction,
    /// Monotonic sequence for stable ordering of equal deadlines
    seq: u64,
}

/// Delay queue driven by [`tick`](SpinScheduler::tick).
#[derive(Debug, Default)]
pub struct SpinScheduler {
    now_ms: f64,
    next_seq: u64,
    entries: Vec<Entry>,
}

impl SpinScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Internal clock (ms since construction)
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Schedule `action` to fire `delay_ms` from now. A non-positive delay
    /// fires on the next tick.
    pub fn schedule(&mut self, delay_ms: f64, action: ScheduledAction) {
        let fire_at_ms = self.now_ms + delay_ms.max(0.0);
        debug!("scheduled {action:?} at {fire_at_ms:.0} ms");
        self.entries.push(Entry {
            fire_at_ms,
            action,
            seq: self.next_seq,
        });
        self.next_seq += 1;
    }

    /// Advance the clock and drain every action that came due, in deadline
    /// order (insertion order for ties).
    pub fn tick(&mut self, dt_ms: f64) -> Vec<ScheduledAction> {
        if dt_ms > 0.0 {
            self.now_ms += dt_ms;
        }

        let now = self.now_ms;
        let mut due: Vec<&Entry> = self
            .entries
            .iter()
            .filter(|e| e.fire_at_ms <= now)
            .collect();
        if due.is_empty() {
            return Vec::new();
        }
        due.sort_by(|a, b| {
            a.fire_at_ms
                .partial_cmp(&b.fire_at_ms)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.seq.cmp(&b.seq))
        });
        let actions: Vec<ScheduledAction> = due.iter().map(|e| e.action.clone()).collect();
        self.entries.retain(|e| e.fire_at_ms > now);
        actions
    }

    /// Drop every pending action.
    pub fn cancel_all(&mut self) {
        if !self.entries.is_empty() {
            debug!("cancelled {} pending actions", self.entries.len());
            self.entries.clear();
        }
    }
}
