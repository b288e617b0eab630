//! Delayed task scheduling.
//!
//! Expanding a card happens in two phases: the card opens immediately and
//! its progress bars start filling after a configured delay. The second
//! phase is modelled as a [`PhaseTask`] handed to a [`Scheduler`]; the host
//! feeds it back to the controller when the delay has elapsed.

use std::time::Duration;

use crate::era::EraId;

/// Work deferred until after a card has started expanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseTask {
    /// Animate every bar of the era's card from zero to its level.
    FillBars { era: EraId },
}

/// One-shot delayed callback source.
pub trait Scheduler {
    /// Deliver `task` no earlier than `delay` from now.
    fn schedule(&mut self, delay: Duration, task: PhaseTask);
}

/// Deterministic scheduler driven by explicit time advancement.
///
/// Used for headless rendering and tests, where wall-clock timers would
/// make output depend on timing.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_seq: u64,
    queue: Vec<Entry>,
}

#[derive(Debug)]
struct Entry {
    due: Duration,
    seq: u64,
    task: PhaseTask,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of tasks not yet due.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Move the clock forward and return every task that became due,
    /// ordered by due time and then by scheduling order.
    pub fn advance(&mut self, by: Duration) -> Vec<PhaseTask> {
        self.now += by;
        let now = self.now;

        let (mut due, pending): (Vec<Entry>, Vec<Entry>) =
            self.queue.drain(..).partition(|entry| entry.due <= now);
        self.queue = pending;

        due.sort_by_key(|entry| (entry.due, entry.seq));
        due.into_iter().map(|entry| entry.task).collect()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration, task: PhaseTask) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Entry {
            due: self.now + delay,
            seq,
            task,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(id: u32) -> PhaseTask {
        PhaseTask::FillBars { era: EraId(id) }
    }

    #[test]
    fn test_task_not_due_before_delay() {
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule(Duration::from_millis(100), fill(1));

        assert!(scheduler.advance(Duration::from_millis(99)).is_empty());
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.advance(Duration::from_millis(1)), vec![fill(1)]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_tasks_fire_in_due_order() {
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule(Duration::from_millis(200), fill(1));
        scheduler.schedule(Duration::from_millis(100), fill(2));
        scheduler.schedule(Duration::from_millis(100), fill(3));

        let fired = scheduler.advance(Duration::from_millis(500));
        assert_eq!(fired, vec![fill(2), fill(3), fill(1)]);
        assert_eq!(scheduler.now(), Duration::from_millis(500));
    }

    #[test]
    fn test_zero_delay_fires_on_next_advance() {
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule(Duration::ZERO, fill(4));
        assert_eq!(scheduler.advance(Duration::ZERO), vec![fill(4)]);
    }
}
