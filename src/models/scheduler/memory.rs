use std::collections::VecDeque;

use crate::ID;

/// Per-timeline policy state.
///
/// Stored inside each `TimelineState` and cloned along with it, so every
/// branch of the exploration advances its own cursor or queues.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PolicyMemory {
    #[default]
    Stateless,
    /// Index of the job served last, in ascending id order.
    RoundRobin { last_index: Option<usize> },
    /// Job ids waiting in each feedback queue, highest priority first.
    Feedback { queues: Vec<VecDeque<ID>> },
}

impl PolicyMemory {
    pub fn feedback(num_queues: usize) -> Self {
        Self::Feedback {
            queues: vec![VecDeque::new(); num_queues],
        }
    }
}
