//! Cooperative timer queue.
//!
//! The toolkit's only form of asynchrony: deadlines polled from the host's
//! event loop. There is no thread behind this; the host calls
//! [`TimerQueue::process_expired`] once per loop iteration and dispatches the
//! returned timer ids. Rescheduling a pending timer simply moves its
//! deadline.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use slotmap::{SlotMap, new_key_type};

use crate::error::{Result, Status};

new_key_type! {
    /// A unique identifier for a timer.
    pub struct TimerId;
}

/// The type of timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Fires once after the specified duration.
    OneShot,
    /// Fires repeatedly at the specified interval.
    Repeating,
}

#[derive(Debug)]
struct TimerData {
    next_fire: Instant,
    interval: Duration,
    kind: TimerKind,
    active: bool,
}

/// An entry in the timer queue (min-heap by fire time).
///
/// Entries are not removed eagerly on reschedule; stale entries are filtered
/// when popped by comparing against the timer's authoritative deadline.
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    id: TimerId,
    fire_time: Instant,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_time == other.fire_time
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other.fire_time.cmp(&self.fire_time)
    }
}

/// Manages all pending timers.
pub struct TimerQueue {
    timers: SlotMap<TimerId, TimerData>,
    queue: BinaryHeap<QueueEntry>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            queue: BinaryHeap::new(),
        }
    }

    /// Start a one-shot timer that fires after the specified duration.
    pub fn start_one_shot(&mut self, duration: Duration) -> TimerId {
        self.start_one_shot_at(Instant::now(), duration)
    }

    /// Start a one-shot timer measured from an explicit `now`.
    pub fn start_one_shot_at(&mut self, now: Instant, duration: Duration) -> TimerId {
        let next_fire = now + duration;
        let id = self.timers.insert(TimerData {
            next_fire,
            interval: duration,
            kind: TimerKind::OneShot,
            active: true,
        });
        self.queue.push(QueueEntry {
            id,
            fire_time: next_fire,
        });
        id
    }

    /// Start a repeating timer; the first fire occurs after `interval`.
    pub fn start_repeating(&mut self, interval: Duration) -> TimerId {
        let next_fire = Instant::now() + interval;
        let id = self.timers.insert(TimerData {
            next_fire,
            interval,
            kind: TimerKind::Repeating,
            active: true,
        });
        self.queue.push(QueueEntry {
            id,
            fire_time: next_fire,
        });
        id
    }

    /// Move a pending timer's deadline to `duration` from `now`.
    ///
    /// This is the coalescing primitive: rescheduling never cancels, it only
    /// replaces the deadline.
    pub fn reschedule(&mut self, id: TimerId, now: Instant, duration: Duration) -> Result<()> {
        let timer = self.timers.get_mut(id).ok_or(Status::NotFound)?;
        timer.next_fire = now + duration;
        timer.interval = duration;
        let fire_time = timer.next_fire;
        self.queue.push(QueueEntry { id, fire_time });
        Ok(())
    }

    /// Stop and remove a timer.
    pub fn stop(&mut self, id: TimerId) -> Result<()> {
        if self.timers.remove(id).is_some() {
            Ok(())
        } else {
            Err(Status::NotFound)
        }
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.get(id).is_some_and(|t| t.active)
    }

    /// Duration until the next timer fires, `None` with no active timers.
    pub fn time_until_next(&mut self) -> Option<Duration> {
        let now = Instant::now();
        loop {
            let entry = *self.queue.peek()?;
            match self.timers.get(entry.id) {
                // Stale heap entry from a reschedule; drop it.
                Some(t) if t.next_fire != entry.fire_time => {
                    self.queue.pop();
                }
                Some(t) => {
                    return Some(t.next_fire.saturating_duration_since(now));
                }
                None => {
                    self.queue.pop();
                }
            }
        }
    }

    /// Process all timers due at the current instant.
    pub fn process_expired(&mut self) -> Vec<TimerId> {
        self.process_at(Instant::now())
    }

    /// Process all timers due at an explicit instant.
    ///
    /// Returns the ids that fired, in deadline order. One-shot timers are
    /// removed after firing; repeating timers are re-queued.
    pub fn process_at(&mut self, now: Instant) -> Vec<TimerId> {
        let mut fired = Vec::new();

        while let Some(entry) = self.queue.peek() {
            if entry.fire_time > now {
                break;
            }
            let entry = *entry;
            self.queue.pop();

            let Some(timer) = self.timers.get_mut(entry.id) else {
                continue;
            };
            // Stale entry left behind by a reschedule.
            if timer.next_fire != entry.fire_time || !timer.active {
                continue;
            }

            tracing::trace!(target: "horizon_trellis_core::timer", id = ?entry.id, "timer fired");
            fired.push(entry.id);

            match timer.kind {
                TimerKind::OneShot => {
                    self.timers.remove(entry.id);
                }
                TimerKind::Repeating => {
                    timer.next_fire = now + timer.interval;
                    let fire_time = timer.next_fire;
                    self.queue.push(QueueEntry {
                        id: entry.id,
                        fire_time,
                    });
                }
            }
        }

        fired
    }

    pub fn active_count(&self) -> usize {
        self.timers.iter().filter(|(_, t)| t.active).count()
    }
}

impl Default for TimerQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_fires_once() {
        let mut q = TimerQueue::new();
        let now = Instant::now();
        let id = q.start_one_shot_at(now, Duration::from_millis(20));

        assert!(q.process_at(now + Duration::from_millis(10)).is_empty());
        assert_eq!(q.process_at(now + Duration::from_millis(25)), vec![id]);
        // Removed after firing.
        assert!(!q.is_active(id));
        assert!(q.process_at(now + Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn reschedule_moves_deadline() {
        let mut q = TimerQueue::new();
        let now = Instant::now();
        let id = q.start_one_shot_at(now, Duration::from_millis(10));

        // Push the deadline out before it fires.
        q.reschedule(id, now, Duration::from_millis(50)).unwrap();
        assert!(q.process_at(now + Duration::from_millis(20)).is_empty());
        assert_eq!(q.process_at(now + Duration::from_millis(60)), vec![id]);
    }

    #[test]
    fn repeating_fires_again() {
        let mut q = TimerQueue::new();
        let id = q.start_repeating(Duration::from_millis(5));
        let later = Instant::now() + Duration::from_millis(10);
        assert_eq!(q.process_at(later), vec![id]);
        assert!(q.is_active(id));
        assert_eq!(q.process_at(later + Duration::from_millis(10)), vec![id]);
        q.stop(id).unwrap();
        assert!(q.process_at(later + Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn stop_unknown_timer_fails() {
        let mut q = TimerQueue::new();
        let id = q.start_one_shot(Duration::from_millis(1));
        q.stop(id).unwrap();
        assert_eq!(q.stop(id), Err(Status::NotFound));
    }
}
