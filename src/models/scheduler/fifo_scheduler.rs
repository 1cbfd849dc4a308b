use super::scheduler::{select_min_by, serve, Scheduler};
use super::PolicyMemory;
use crate::models::{RunningSet, TimeStep};
use crate::SchedulingError;

/// Serves the earliest submitted job at full rate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fifo;

impl Scheduler for Fifo {
    fn name(&self) -> String {
        "FIFO".to_string()
    }

    fn add_progress(
        &self,
        running: &mut RunningSet,
        _time: TimeStep,
        _memory: &mut PolicyMemory,
    ) -> Result<(), SchedulingError> {
        if let Some(first) = select_min_by(running, |_, entry| entry.submitted) {
            serve(running, &first, first.nominal_rate());
        }
        Ok(())
    }
}
