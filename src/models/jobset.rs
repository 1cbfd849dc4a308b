use crate::constants::FIRST_JOB_ID;
use crate::ConfigError;

use super::{Job, TimeStep, ID};

/// The ordered chain of jobs a simulation explores.
///
/// Ids run `1..=n` without gaps, so every job except the first has its
/// predecessor in the set.
#[derive(Debug, Clone, Default)]
pub struct JobSet {
    jobs: Vec<Job>,
}

impl JobSet {
    /// Builds a job set from jobs given in arrival order.
    ///
    /// # Arguments
    /// * `jobs` - The jobs, ids must be `1, 2, ..., n` in this order.
    ///
    /// # Returns
    /// The job set, or `ConfigError::NonSequentialId` on the first gap or duplicate.
    pub fn new(jobs: Vec<Job>) -> Result<Self, ConfigError> {
        for (expected, job) in (FIRST_JOB_ID..).zip(jobs.iter()) {
            if job.id() != expected {
                return Err(ConfigError::NonSequentialId {
                    expected,
                    found: job.id(),
                });
            }
        }

        Ok(Self { jobs })
    }

    /// Builds a job set from `(duration, deadline)` pairs, numbering jobs from 1.
    pub fn from_specs(specs: &[(TimeStep, TimeStep)]) -> Result<Self, ConfigError> {
        let jobs = (FIRST_JOB_ID..)
            .zip(specs.iter())
            .map(|(id, &(duration, deadline))| Job::new(id, duration, deadline))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(jobs)
    }

    pub fn get_jobs(&self) -> &Vec<Job> {
        &self.jobs
    }

    pub fn get(&self, id: ID) -> Option<&Job> {
        let index = id.checked_sub(FIRST_JOB_ID)? as usize;
        self.jobs.get(index)
    }

    pub fn first(&self) -> Option<&Job> {
        self.jobs.first()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Job> {
        self.jobs.iter()
    }
}

impl<'a> IntoIterator for &'a JobSet {
    type Item = &'a Job;
    type IntoIter = std::slice::Iter<'a, Job>;

    fn into_iter(self) -> Self::IntoIter {
        self.jobs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_specs_numbers_jobs() {
        let jobs = JobSet::from_specs(&[(2, 3), (4, 5)]).unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs.get(1).unwrap().duration(), 2);
        assert_eq!(jobs.get(2).unwrap().deadline(), 5);
        assert!(jobs.get(0).is_none());
        assert!(jobs.get(3).is_none());
    }

    #[test]
    fn test_gap_in_ids_is_rejected() {
        let jobs = vec![Job::new(1, 1, 1).unwrap(), Job::new(3, 1, 1).unwrap()];
        assert_eq!(
            JobSet::new(jobs).unwrap_err(),
            ConfigError::NonSequentialId { expected: 2, found: 3 }
        );
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let jobs = vec![Job::new(1, 1, 1).unwrap(), Job::new(1, 2, 2).unwrap()];
        assert!(JobSet::new(jobs).is_err());
    }

    #[test]
    fn test_invalid_spec_is_rejected() {
        assert_eq!(
            JobSet::from_specs(&[(1, 1), (0, 1)]).unwrap_err(),
            ConfigError::InvalidDuration { job: 2, duration: 0 }
        );
    }

    #[test]
    fn test_empty_set_is_allowed() {
        let jobs = JobSet::new(Vec::new()).unwrap();
        assert!(jobs.is_empty());
        assert!(jobs.first().is_none());
    }
}
