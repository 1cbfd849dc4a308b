use std::collections::VecDeque;

use super::scheduler::{serve, Scheduler};
use super::PolicyMemory;
use crate::models::{RunningSet, TimeStep, ID};
use crate::{ConfigError, Ratio, SchedulingError};

/// Multilevel feedback queue.
///
/// New jobs enter queue 0. Each tick the head of the highest-priority
/// non-empty queue is served for that queue's slice and, if still
/// unfinished, demoted one level (the last queue keeps it).
#[derive(Debug, Clone)]
pub struct MultilevelFeedbackQueue {
    time_slices: Vec<TimeStep>, // One slice per queue, index 0 is the highest priority
}

impl MultilevelFeedbackQueue {
    /// Creates the policy.
    ///
    /// # Arguments
    /// * `num_queues` - Number of queues, at least one.
    /// * `time_slices` - Service units granted per queue; extra entries are ignored.
    ///
    /// # Returns
    /// The policy, or a `ConfigError` if the queues or slices are unusable.
    pub fn new(num_queues: usize, time_slices: &[TimeStep]) -> Result<Self, ConfigError> {
        if num_queues == 0 {
            return Err(ConfigError::InvalidQueueCount);
        }
        if time_slices.len() < num_queues {
            return Err(ConfigError::MissingTimeSlices {
                queues: num_queues,
                slices: time_slices.len(),
            });
        }
        if let Some(&slice) = time_slices[..num_queues].iter().find(|&&s| s == 0) {
            return Err(ConfigError::InvalidTimeSlice { slice });
        }

        Ok(Self {
            time_slices: time_slices[..num_queues].to_vec(),
        })
    }

    pub fn num_queues(&self) -> usize {
        self.time_slices.len()
    }

    pub fn time_slices(&self) -> &[TimeStep] {
        &self.time_slices
    }
}

/// Drops jobs no longer running and enqueues newly running ones at level 0.
fn synchronize(queues: &mut [VecDeque<ID>], running: &RunningSet) {
    for queue in queues.iter_mut() {
        queue.retain(|id| running.keys().any(|job| job.id() == *id));
    }

    for job in running.keys() {
        if !queues.iter().any(|queue| queue.contains(&job.id())) {
            queues[0].push_back(job.id());
        }
    }
}

impl Scheduler for MultilevelFeedbackQueue {
    fn name(&self) -> String {
        "MultilevelFeedbackQueue".to_string()
    }

    fn initial_memory(&self) -> PolicyMemory {
        PolicyMemory::feedback(self.num_queues())
    }

    fn add_progress(
        &self,
        running: &mut RunningSet,
        _time: TimeStep,
        memory: &mut PolicyMemory,
    ) -> Result<(), SchedulingError> {
        let queues = match memory {
            PolicyMemory::Feedback { queues } if queues.len() == self.num_queues() => queues,
            _ => return Err(SchedulingError::MemoryMismatch { policy: self.name() }),
        };

        if running.is_empty() {
            return Ok(());
        }

        synchronize(queues, running);

        let Some(level) = queues.iter().position(|queue| !queue.is_empty()) else {
            return Ok(());
        };
        let Some(id) = queues[level].pop_front() else {
            return Ok(());
        };
        let Some(job) = running.keys().find(|job| job.id() == id).copied() else {
            return Ok(());
        };

        serve(running, &job, job.nominal_rate() * Ratio::from(self.time_slices[level]));

        let finished = running
            .get(&job)
            .map_or(true, |entry| entry.progress >= Ratio::ONE);
        if !finished {
            let next = (level + 1).min(self.num_queues() - 1);
            queues[next].push_back(id);
        }
        Ok(())
    }
}
