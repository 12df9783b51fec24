//! Deadline ordered refresh scheduler.
//!
//! Jobs are plain keys. The owner polls [`PeriodicRefreshScheduler::due`]
//! from its single execution context and runs whatever comes back, so no
//! callback ever runs concurrently with another one or with user input.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Shortest interval accepted; anything smaller is rounded up.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

struct Entry {
    interval: Option<Duration>,
    deadline: Instant,
    generation: u64,
}

pub struct PeriodicRefreshScheduler<J> {
    entries: HashMap<J, Entry>,
    queue: BinaryHeap<Reverse<(Instant, u64, J)>>,
    next_generation: u64,
}

impl<J> PeriodicRefreshScheduler<J>
where
    J: Copy + Eq + Hash + Ord + std::fmt::Debug,
{
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            queue: BinaryHeap::new(),
            next_generation: 0,
        }
    }

    /// Run `job` every `interval`, first at `now + interval`. Replaces any
    /// earlier registration of the same job.
    pub fn every(&mut self, job: J, interval: Duration, now: Instant) {
        let interval = interval.max(MIN_INTERVAL);
        self.arm(job, Some(interval), now + interval);
    }

    /// Run `job` once at `now + delay`. Scheduling it again before it fires
    /// pushes the deadline back instead of adding a second run.
    pub fn once(&mut self, job: J, delay: Duration, now: Instant) {
        self.arm(job, None, now + delay);
    }

    /// Forget `job`. Returns `false` if it was not scheduled.
    pub fn cancel(&mut self, job: J) -> bool {
        self.entries.remove(&job).is_some()
    }

    pub fn is_scheduled(&self, job: J) -> bool {
        self.entries.contains_key(&job)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.values().map(|e| e.deadline).min()
    }

    /// Pop every job whose deadline is at or before `now`, in deadline order.
    ///
    /// Periodic jobs are re-armed one interval later. A job that fell more
    /// than one interval behind runs once and is re-armed from `now` rather
    /// than firing a burst of catch-up runs.
    pub fn due(&mut self, now: Instant) -> Vec<J> {
        let mut fired = Vec::new();
        while let Some(Reverse((deadline, generation, job))) = self.queue.peek().copied() {
            if deadline > now {
                break;
            }
            self.queue.pop();
            let interval = match self.entries.get(&job) {
                Some(entry) if entry.generation == generation => entry.interval,
                // cancelled or re-armed since this was queued
                _ => continue,
            };
            fired.push(job);
            match interval {
                Some(interval) => {
                    let mut next = deadline + interval;
                    if next <= now {
                        next = now + interval;
                    }
                    self.arm(job, Some(interval), next);
                }
                None => {
                    self.entries.remove(&job);
                }
            }
        }
        if !fired.is_empty() {
            tracing::trace!(?fired, "scheduler jobs due");
        }
        fired
    }

    fn arm(&mut self, job: J, interval: Option<Duration>, deadline: Instant) {
        let generation = self.next_generation;
        self.next_generation += 1;
        self.entries.insert(
            job,
            Entry {
                interval,
                deadline,
                generation,
            },
        );
        self.queue.push(Reverse((deadline, generation, job)));
    }
}

impl<J> Default for PeriodicRefreshScheduler<J>
where
    J: Copy + Eq + Hash + Ord + std::fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
