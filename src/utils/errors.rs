use std::error::Error;
use std::fmt;

use crate::models::{TimeStep, ID};

/// Errors raised while building jobs, job sets or policies, before any simulation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidDuration { job: ID, duration: TimeStep },
    InvalidDeadline { job: ID, deadline: TimeStep },
    NonSequentialId { expected: ID, found: ID },
    InvalidTimeSlice { slice: TimeStep },
    InvalidQueueCount,
    MissingTimeSlices { queues: usize, slices: usize },
    MissingPriority { job: ID },
    UnknownPolicy(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDuration { job, duration } => {
                write!(f, "job {job}: duration must be positive (got {duration})")
            }
            Self::InvalidDeadline { job, deadline } => {
                write!(f, "job {job}: deadline must be positive (got {deadline})")
            }
            Self::NonSequentialId { expected, found } => {
                write!(f, "job ids must run 1..n in order: expected {expected}, found {found}")
            }
            Self::InvalidTimeSlice { slice } => {
                write!(f, "time slice must be positive (got {slice})")
            }
            Self::InvalidQueueCount => write!(f, "at least one feedback queue is required"),
            Self::MissingTimeSlices { queues, slices } => {
                write!(f, "{queues} queues need {queues} time slices, got {slices}")
            }
            Self::MissingPriority { job } => write!(f, "no priority assigned to job {job}"),
            Self::UnknownPolicy(name) => write!(f, "unknown scheduling policy '{name}'"),
        }
    }
}

impl Error for ConfigError {}

/// Errors raised while a policy runs against a timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulingError {
    MissingPriority { job: ID },
    MemoryMismatch { policy: String }, // Policy handed another policy's memory
    Config(ConfigError),
}

impl fmt::Display for SchedulingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPriority { job } => write!(f, "running job {job} has no priority"),
            Self::MemoryMismatch { policy } => {
                write!(f, "{policy} was given memory it did not create")
            }
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
        }
    }
}

impl Error for SchedulingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for SchedulingError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}
