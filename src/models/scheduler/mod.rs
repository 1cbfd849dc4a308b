pub mod scheduler;
pub mod memory;
pub mod fifo_scheduler;
pub mod fair_scheduler;
pub mod edf_scheduler;
pub mod rr_scheduler;
pub mod sjn_scheduler;
pub mod llf_scheduler;
pub mod priority_scheduler;
pub mod mlfq_scheduler;

pub use scheduler::Scheduler;
pub use memory::PolicyMemory;
pub use fifo_scheduler::Fifo;
pub use fair_scheduler::Fair;
pub use edf_scheduler::{EdfAll, EdfPure};
pub use rr_scheduler::RoundRobin;
pub use sjn_scheduler::ShortestJobNext;
pub use llf_scheduler::LeastLaxityFirst;
pub use priority_scheduler::PriorityScheduler;
pub use mlfq_scheduler::MultilevelFeedbackQueue;

use crate::constants::{DEFAULT_QUEUE_COUNT, DEFAULT_QUEUE_SLICES, DEFAULT_TIME_SLICE};
use crate::{ConfigError, PolicyKind, TimeStep};

/// Parameters for the policies that take any.
#[derive(Debug, Clone)]
pub struct PolicyOptions {
    pub time_slice: TimeStep,        // Round robin slice
    pub num_queues: usize,           // Feedback queue count
    pub queue_slices: Vec<TimeStep>, // Feedback slice per queue
    pub priorities: Vec<i64>,        // Priority of job i + 1 at index i
}

impl Default for PolicyOptions {
    fn default() -> Self {
        Self {
            time_slice: DEFAULT_TIME_SLICE,
            num_queues: DEFAULT_QUEUE_COUNT,
            queue_slices: DEFAULT_QUEUE_SLICES.to_vec(),
            priorities: Vec::new(),
        }
    }
}

/// Builds the policy of the given kind.
pub fn build_policy(kind: PolicyKind, options: &PolicyOptions) -> Result<Box<dyn Scheduler>, ConfigError> {
    let policy: Box<dyn Scheduler> = match kind {
        PolicyKind::Fifo => Box::new(Fifo),
        PolicyKind::Fair => Box::new(Fair),
        PolicyKind::EdfAll => Box::new(EdfAll),
        PolicyKind::EdfPure => Box::new(EdfPure),
        PolicyKind::RoundRobin => Box::new(RoundRobin::new(options.time_slice)?),
        PolicyKind::ShortestJobNext => Box::new(ShortestJobNext),
        PolicyKind::LeastLaxityFirst => Box::new(LeastLaxityFirst),
        PolicyKind::Priority => Box::new(PriorityScheduler::from_ordered(&options.priorities)),
        PolicyKind::MultilevelFeedbackQueue => Box::new(MultilevelFeedbackQueue::new(
            options.num_queues,
            &options.queue_slices,
        )?),
    };
    Ok(policy)
}

/// Builds a policy from its command line name (`fifo`, `rr`, `mlfq`, ...).
pub fn policy_from_name(name: &str, options: &PolicyOptions) -> Result<Box<dyn Scheduler>, ConfigError> {
    let kind = PolicyKind::from_cli_name(name)
        .ok_or_else(|| ConfigError::UnknownPolicy(name.to_string()))?;
    build_policy(kind, options)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_builds_with_defaults() {
        let options = PolicyOptions {
            priorities: vec![1, 2, 3],
            ..PolicyOptions::default()
        };
        let names: Vec<String> = PolicyKind::ALL
            .iter()
            .map(|&kind| build_policy(kind, &options).unwrap().name())
            .collect();

        assert_eq!(
            names,
            vec![
                "FIFO",
                "Fair",
                "EDFAll",
                "EDFPure",
                "RoundRobin (ts=10)",
                "ShortestJobNext",
                "LeastLaxityFirst",
                "Priority",
                "MultilevelFeedbackQueue",
            ]
        );
    }

    #[test]
    fn test_policy_from_name() {
        let options = PolicyOptions::default();
        assert_eq!(policy_from_name("llf", &options).unwrap().name(), "LeastLaxityFirst");
        assert!(matches!(
            policy_from_name("lottery", &options),
            Err(ConfigError::UnknownPolicy(name)) if name == "lottery"
        ));
    }

    #[test]
    fn test_bad_parameters_surface_at_build() {
        let options = PolicyOptions {
            time_slice: 0,
            ..PolicyOptions::default()
        };
        assert!(build_policy(PolicyKind::RoundRobin, &options).is_err());
        assert!(build_policy(PolicyKind::Fifo, &options).is_ok());
    }
}
