use super::scheduler::{serve, Scheduler};
use super::PolicyMemory;
use crate::models::{RunningSet, TimeStep};
use crate::{ConfigError, Ratio, SchedulingError};

/// Cycles through the running jobs in ascending id order, one per tick,
/// serving the selected job for `time_slice` units.
#[derive(Debug, Clone, Copy)]
pub struct RoundRobin {
    time_slice: TimeStep,
}

impl RoundRobin {
    pub fn new(time_slice: TimeStep) -> Result<Self, ConfigError> {
        if time_slice == 0 {
            return Err(ConfigError::InvalidTimeSlice { slice: time_slice });
        }
        Ok(Self { time_slice })
    }

    pub fn time_slice(&self) -> TimeStep {
        self.time_slice
    }
}

impl Scheduler for RoundRobin {
    fn name(&self) -> String {
        format!("RoundRobin (ts={})", self.time_slice)
    }

    fn initial_memory(&self) -> PolicyMemory {
        PolicyMemory::RoundRobin { last_index: None }
    }

    fn add_progress(
        &self,
        running: &mut RunningSet,
        _time: TimeStep,
        memory: &mut PolicyMemory,
    ) -> Result<(), SchedulingError> {
        let PolicyMemory::RoundRobin { last_index } = memory else {
            return Err(SchedulingError::MemoryMismatch { policy: self.name() });
        };

        if running.is_empty() {
            return Ok(());
        }

        // Select the next job in a circular fashion
        let index = last_index.map_or(0, |i| i + 1) % running.len();
        *last_index = Some(index);

        if let Some(job) = running.keys().nth(index).copied() {
            serve(running, &job, job.nominal_rate() * Ratio::from(self.time_slice));
        }
        Ok(())
    }
}
