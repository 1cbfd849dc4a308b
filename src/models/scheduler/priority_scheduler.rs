use std::cmp::Reverse;
use std::collections::HashMap;

use super::scheduler::{select_min_by, serve, Scheduler};
use super::PolicyMemory;
use crate::models::{JobSet, RunningSet, TimeStep, ID};
use crate::{ConfigError, SchedulingError};

/// Serves the running job with the highest externally assigned priority.
#[derive(Debug, Clone, Default)]
pub struct PriorityScheduler {
    priorities: HashMap<ID, i64>, // Job id -> priority, larger is served first
}

impl PriorityScheduler {
    pub fn new(priorities: HashMap<ID, i64>) -> Self {
        Self { priorities }
    }

    /// Builds the table `job id -> priority`, assigning `priorities[i]` to job `i + 1`.
    pub fn from_ordered(priorities: &[i64]) -> Self {
        Self::new((1..).zip(priorities.iter().copied()).collect())
    }

    pub fn priority(&self, id: ID) -> Option<i64> {
        self.priorities.get(&id).copied()
    }
}

impl Scheduler for PriorityScheduler {
    fn name(&self) -> String {
        "Priority".to_string()
    }

    fn validate(&self, jobs: &JobSet) -> Result<(), ConfigError> {
        match jobs.iter().find(|job| !self.priorities.contains_key(&job.id())) {
            Some(job) => Err(ConfigError::MissingPriority { job: job.id() }),
            None => Ok(()),
        }
    }

    fn add_progress(
        &self,
        running: &mut RunningSet,
        _time: TimeStep,
        _memory: &mut PolicyMemory,
    ) -> Result<(), SchedulingError> {
        if let Some(job) = running.keys().find(|job| self.priority(job.id()).is_none()) {
            return Err(SchedulingError::MissingPriority { job: job.id() });
        }

        let highest = select_min_by(running, |job, _| Reverse(self.priority(job.id())));
        if let Some(highest) = highest {
            serve(running, &highest, highest.nominal_rate());
        }
        Ok(())
    }
}
