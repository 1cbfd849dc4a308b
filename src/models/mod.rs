mod job;
pub mod jobset;
pub mod metrics;
pub mod scheduler;
pub mod timeline;

pub use job::Job;
pub use jobset::JobSet;
pub use metrics::SimulationMetrics;
pub use timeline::{EndedEntry, EndedSet, RunningEntry, RunningSet, TimelineState};

pub type TimeStep = usize;

pub type ID = u32;
