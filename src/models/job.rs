use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::{ConfigError, Ratio};

use super::{TimeStep, ID};

/// One application in the dependency chain. Identity is the `id` alone.
#[derive(Debug, Clone, Copy)]
pub struct Job {
    id: ID,                // Position in the arrival chain, starting at 1
    duration: TimeStep,    // Units of dedicated service needed to finish
    deadline: TimeStep,    // Units after submission by which the job should finish
    nominal_rate: Ratio,   // Progress gained per unit of dedicated service (1 / duration)
}

impl Job {
    /// Creates a new job.
    ///
    /// # Arguments
    /// * `id` - Position of the job in the arrival chain.
    /// * `duration` - Required processing units, must be positive.
    /// * `deadline` - Relative deadline, must be positive.
    ///
    /// # Returns
    /// The job, or a `ConfigError` if `duration` or `deadline` is zero.
    pub fn new(id: ID, duration: TimeStep, deadline: TimeStep) -> Result<Self, ConfigError> {
        if duration == 0 {
            return Err(ConfigError::InvalidDuration { job: id, duration });
        }
        if deadline == 0 {
            return Err(ConfigError::InvalidDeadline { job: id, deadline });
        }

        Ok(Self {
            id,
            duration,
            deadline,
            nominal_rate: Ratio::new(1, duration as i128),
        })
    }

    pub fn id(&self) -> ID {
        self.id
    }

    pub fn duration(&self) -> TimeStep {
        self.duration
    }

    pub fn deadline(&self) -> TimeStep {
        self.deadline
    }

    pub fn nominal_rate(&self) -> Ratio {
        self.nominal_rate
    }

    /// Id of the job that must be present before this one can arrive, if any.
    pub fn predecessor(&self) -> Option<ID> {
        self.id.checked_sub(1).filter(|&id| id >= crate::constants::FIRST_JOB_ID)
    }
}

impl PartialEq for Job {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Job {}

impl Hash for Job {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Job {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Job {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "app{}", self.id)
    }
}
