use std::collections::BTreeMap;
use std::fmt;

use crate::models::scheduler::{PolicyMemory, Scheduler};
use crate::{Ratio, SchedulingError};

use super::{Job, JobSet, TimeStep};

/// A running job's submission time and accumulated progress in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunningEntry {
    pub submitted: TimeStep,
    pub progress: Ratio,
}

/// A finished job's submission and finish times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EndedEntry {
    pub submitted: TimeStep,
    pub finished: TimeStep,
}

impl EndedEntry {
    /// Turnaround: finish time minus submission time.
    pub fn execution_time(&self) -> TimeStep {
        self.finished.saturating_sub(self.submitted)
    }
}

/// Running jobs keyed by job, enumerated in ascending id order.
pub type RunningSet = BTreeMap<Job, RunningEntry>;
pub type EndedSet = BTreeMap<Job, EndedEntry>;

/// One point of a scheduling timeline.
///
/// States are values: `schedule` and `tick` return new states and never
/// touch the receiver. Equality is structural over the running and ended
/// jobs plus the policy memory of this branch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimelineState {
    running: RunningSet,  // Jobs in service, disjoint from `ended`
    ended: EndedSet,      // Jobs that reached full progress
    memory: PolicyMemory, // This branch's policy state
}

impl TimelineState {
    /// Creates an empty timeline carrying the given policy memory.
    pub fn new(memory: PolicyMemory) -> Self {
        Self {
            running: RunningSet::new(),
            ended: EndedSet::new(),
            memory,
        }
    }

    /// Creates an empty timeline for `scheduler`.
    pub fn for_scheduler(scheduler: &dyn Scheduler) -> Self {
        Self::new(scheduler.initial_memory())
    }

    /// Returns a copy of this state with `job` already running since `submitted`.
    ///
    /// Unlike `schedule`, no dependency check is made; this is how a
    /// simulation is seeded.
    pub fn with_running(&self, job: Job, submitted: TimeStep) -> Self {
        let mut next = self.clone();
        next.ended.remove(&job);
        next.running.insert(
            job,
            RunningEntry {
                submitted,
                progress: Ratio::ZERO,
            },
        );
        next
    }

    pub fn running(&self) -> &RunningSet {
        &self.running
    }

    pub fn ended(&self) -> &EndedSet {
        &self.ended
    }

    pub fn memory(&self) -> &PolicyMemory {
        &self.memory
    }

    /// Whether `job` is running or has ended.
    pub fn contains(&self, job: &Job) -> bool {
        self.running.contains_key(job) || self.ended.contains_key(job)
    }

    fn contains_id(&self, id: crate::ID) -> bool {
        self.running.keys().chain(self.ended.keys()).any(|job| job.id() == id)
    }

    /// Whether `job` may arrive now: absent, and its predecessor (if any) present.
    pub fn can_arrive(&self, job: &Job) -> bool {
        if self.contains(job) {
            return false;
        }
        job.predecessor().map_or(true, |id| self.contains_id(id))
    }

    /// The state after `job` arrives at `time`, or `None` if it cannot arrive.
    pub fn arrive(&self, job: &Job, time: TimeStep) -> Option<Self> {
        if !self.can_arrive(job) {
            return None;
        }
        Some(self.with_running(*job, time))
    }

    /// Submits `job` at `time`.
    ///
    /// # Returns
    /// A new state with `job` running from `time` at zero progress, or an
    /// identical copy if `job` is already present or its predecessor is not.
    pub fn schedule(&self, job: &Job, time: TimeStep) -> Self {
        self.arrive(job, time).unwrap_or_else(|| self.clone())
    }

    /// Advances the timeline by the tick at `time`.
    ///
    /// Jobs submitted strictly before `time` are handed to the policy; every
    /// job whose progress reaches 1 moves to `ended` with finish time `time`.
    ///
    /// # Arguments
    /// * `scheduler` - The policy distributing service this tick.
    /// * `time` - The current tick.
    ///
    /// # Returns
    /// The next state, unchanged if no job was eligible, or the policy's error.
    pub fn tick(&self, scheduler: &dyn Scheduler, time: TimeStep) -> Result<Self, SchedulingError> {
        let mut eligible: RunningSet = self
            .running
            .iter()
            .filter(|(_, entry)| entry.submitted < time)
            .map(|(job, entry)| (*job, *entry))
            .collect();

        if eligible.is_empty() {
            return Ok(self.clone());
        }

        let mut memory = self.memory.clone();
        scheduler.add_progress(&mut eligible, time, &mut memory)?;

        let mut running = self.running.clone();
        let mut ended = self.ended.clone();
        for (job, entry) in eligible {
            if entry.progress >= Ratio::ONE {
                running.remove(&job);
                ended.insert(
                    job,
                    EndedEntry {
                        submitted: entry.submitted,
                        finished: time,
                    },
                );
            } else if let Some(slot) = running.get_mut(&job) {
                slot.progress = entry.progress.max(slot.progress);
            }
        }

        Ok(Self {
            running,
            ended,
            memory,
        })
    }

    /// True if some ended job took longer than its deadline.
    pub fn is_violated(&self) -> bool {
        self.ended
            .iter()
            .any(|(job, entry)| entry.execution_time() > job.deadline())
    }

    /// True if some job never arrived, or a running job cannot finish within `steps`.
    pub fn is_unfeasible(&self, jobs: &JobSet, steps: TimeStep) -> bool {
        jobs.iter().any(|job| match self.running.get(job) {
            Some(entry) => entry.submitted + job.duration() > steps,
            None => !self.ended.contains_key(job),
        })
    }

    /// True if the horizon allowed a still running job to finish but the policy did not.
    ///
    /// Never holds together with a violation or an unfeasibility.
    pub fn is_scenario_violated(&self, jobs: &JobSet, steps: TimeStep) -> bool {
        if self.is_violated() || self.is_unfeasible(jobs, steps) {
            return false;
        }
        jobs.iter().any(|job| {
            self.running
                .get(job)
                .is_some_and(|entry| entry.submitted + job.duration() <= steps)
        })
    }

    /// True if none of the other three categories hold.
    pub fn is_non_violated(&self, jobs: &JobSet, steps: TimeStep) -> bool {
        !self.is_violated()
            && !self.is_unfeasible(jobs, steps)
            && !self.is_scenario_violated(jobs, steps)
    }

    /// Earliness and tardiness of this timeline.
    ///
    /// Each ended job contributes `e = (deadline - execution) / deadline`;
    /// positive `e` adds to earliness, negative `e` (negated) to tardiness.
    /// Both totals are divided by the number of jobs.
    ///
    /// # Returns
    /// `(eA, eD)`, or `(0, 0)` for an empty job set.
    pub fn error(&self, jobs: &JobSet) -> (Ratio, Ratio) {
        if jobs.is_empty() {
            return (Ratio::ZERO, Ratio::ZERO);
        }

        let mut early = Ratio::ZERO;
        let mut late = Ratio::ZERO;
        for (job, entry) in &self.ended {
            let deadline = job.deadline() as i128;
            let e = Ratio::new(deadline - entry.execution_time() as i128, deadline);
            if e.is_negative() {
                late += -e;
            } else {
                early += e;
            }
        }

        let n = Ratio::from(jobs.len());
        (early / n, late / n)
    }
}

impl fmt::Display for TimelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r:{{")?;
        for (i, (job, entry)) in self.running.iter().enumerate() {
            let sep = if i == 0 { "" } else { ", " };
            write!(f, "{sep}{job}: ({}, {})", entry.submitted, entry.progress)?;
        }
        write!(f, "}}, e:{{")?;
        for (i, (job, entry)) in self.ended.iter().enumerate() {
            let sep = if i == 0 { "" } else { ", " };
            write!(f, "{sep}{job}: ({}, {})", entry.submitted, entry.finished)?;
        }
        write!(f, "}}")
    }
}
