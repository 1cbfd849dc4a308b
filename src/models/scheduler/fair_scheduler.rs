use super::scheduler::Scheduler;
use super::PolicyMemory;
use crate::models::{RunningSet, TimeStep};
use crate::{Ratio, SchedulingError};

/// Splits the resource evenly: every running job gets `rate / count`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fair;

impl Scheduler for Fair {
    fn name(&self) -> String {
        "Fair".to_string()
    }

    fn add_progress(
        &self,
        running: &mut RunningSet,
        _time: TimeStep,
        _memory: &mut PolicyMemory,
    ) -> Result<(), SchedulingError> {
        let share = Ratio::from(running.len().max(1));
        for (job, entry) in running.iter_mut() {
            entry.progress += job.nominal_rate() / share;
        }
        Ok(())
    }
}
