use super::scheduler::{select_min_by, serve, Scheduler};
use super::PolicyMemory;
use crate::models::{RunningSet, TimeStep};
use crate::SchedulingError;

/// Serves every running job at full rate, as if each had its own resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdfAll;

impl Scheduler for EdfAll {
    fn name(&self) -> String {
        "EDFAll".to_string()
    }

    fn add_progress(
        &self,
        running: &mut RunningSet,
        _time: TimeStep,
        _memory: &mut PolicyMemory,
    ) -> Result<(), SchedulingError> {
        for (job, entry) in running.iter_mut() {
            entry.progress += job.nominal_rate();
        }
        Ok(())
    }
}

/// Serves the job with the earliest relative deadline at full rate.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdfPure;

impl Scheduler for EdfPure {
    fn name(&self) -> String {
        "EDFPure".to_string()
    }

    fn add_progress(
        &self,
        running: &mut RunningSet,
        _time: TimeStep,
        _memory: &mut PolicyMemory,
    ) -> Result<(), SchedulingError> {
        if let Some(earliest) = select_min_by(running, |job, _| job.deadline()) {
            serve(running, &earliest, earliest.nominal_rate());
        }
        Ok(())
    }
}
