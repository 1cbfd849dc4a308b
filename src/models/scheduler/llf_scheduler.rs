use super::scheduler::{select_min_by, serve, Scheduler};
use super::PolicyMemory;
use crate::models::{Job, RunningEntry, RunningSet, TimeStep};
use crate::{Ratio, SchedulingError};

/// Serves the job with the least laxity at full rate.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeastLaxityFirst;

/// Laxity of a running job: `(deadline - time) - (1 - progress)`.
pub fn laxity(job: &Job, entry: &RunningEntry, time: TimeStep) -> Ratio {
    let until_deadline = Ratio::from_integer(job.deadline() as i128 - time as i128);
    until_deadline - (Ratio::ONE - entry.progress)
}

impl Scheduler for LeastLaxityFirst {
    fn name(&self) -> String {
        "LeastLaxityFirst".to_string()
    }

    fn add_progress(
        &self,
        running: &mut RunningSet,
        time: TimeStep,
        _memory: &mut PolicyMemory,
    ) -> Result<(), SchedulingError> {
        if let Some(least_lax) = select_min_by(running, |job, entry| laxity(job, entry, time)) {
            serve(running, &least_lax, least_lax.nominal_rate());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scheduler::test_support::{job, progress, running};

    #[test]
    fn test_laxity_can_be_negative() {
        let entry = RunningEntry {
            submitted: 0,
            progress: Ratio::new(1, 4),
        };
        assert_eq!(laxity(&job(1, 4, 2), &entry, 5), Ratio::new(-15, 4));
    }

    #[test]
    fn test_least_laxity_is_served() {
        // laxities at t=2: job1 = 3 - 1/2 = 5/2, job2 = 3 - 1 = 2
        let mut set = running(&[
            (job(1, 2, 5), 0, Ratio::new(1, 2)),
            (job(2, 4, 5), 0, Ratio::ZERO),
        ]);
        LeastLaxityFirst.add_progress(&mut set, 2, &mut PolicyMemory::Stateless).unwrap();

        assert_eq!(progress(&set, 1), Ratio::new(1, 2));
        assert_eq!(progress(&set, 2), Ratio::new(1, 4));
    }
}
