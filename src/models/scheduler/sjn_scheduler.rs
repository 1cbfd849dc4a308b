use super::scheduler::{select_min_by, serve, Scheduler};
use super::PolicyMemory;
use crate::models::{RunningSet, TimeStep};
use crate::SchedulingError;

/// Serves the running job with the smallest total duration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortestJobNext;

impl Scheduler for ShortestJobNext {
    fn name(&self) -> String {
        "ShortestJobNext".to_string()
    }

    fn add_progress(
        &self,
        running: &mut RunningSet,
        _time: TimeStep,
        _memory: &mut PolicyMemory,
    ) -> Result<(), SchedulingError> {
        if let Some(shortest) = select_min_by(running, |job, _| job.duration()) {
            serve(running, &shortest, shortest.nominal_rate());
        }
        Ok(())
    }
}
