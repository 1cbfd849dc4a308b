use crate::models::{Job, JobSet, RunningEntry, RunningSet, TimeStep};
use crate::{ConfigError, Ratio, SchedulingError};

use super::PolicyMemory;

/// A progress-accumulation policy for the shared resource.
///
/// A policy is immutable configuration. Anything it must remember between
/// ticks lives in the `PolicyMemory` carried by each timeline state, so
/// branches of the exploration never observe each other's history.
pub trait Scheduler: Send + Sync {
    /// Display name used in reports.
    fn name(&self) -> String;

    /// Memory a fresh timeline starts with.
    fn initial_memory(&self) -> PolicyMemory {
        PolicyMemory::Stateless
    }

    /// Checks the policy against the jobs it will be run on.
    fn validate(&self, _jobs: &JobSet) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Advances the progress of one or more running jobs for the tick at `time`.
    ///
    /// # Arguments
    /// * `running` - Jobs eligible for service; only their progress may change, and only upwards.
    /// * `time` - The current tick.
    /// * `memory` - This timeline's policy memory, updated in place.
    ///
    /// # Returns
    /// `Ok(())`, or a `SchedulingError` if the policy cannot decide.
    fn add_progress(
        &self,
        running: &mut RunningSet,
        time: TimeStep,
        memory: &mut PolicyMemory,
    ) -> Result<(), SchedulingError>;
}

/// Adds `amount` to the progress of `job`.
pub(crate) fn serve(running: &mut RunningSet, job: &Job, amount: Ratio) {
    if let Some(entry) = running.get_mut(job) {
        entry.progress += amount;
    }
}

/// Returns the first running job (lowest id) with the smallest key.
pub(crate) fn select_min_by<K, F>(running: &RunningSet, key: F) -> Option<Job>
where
    K: Ord,
    F: Fn(&Job, &RunningEntry) -> K,
{
    running
        .iter()
        .min_by_key(|(job, entry)| key(job, entry))
        .map(|(job, _)| *job)
}
