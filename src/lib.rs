//! Exhaustive exploration of scheduling policies for a chain of dependent,
//! deadline-bound jobs sharing one processing resource.
//!
//! Every combination of "which job arrived on which tick" is enumerated up to
//! a fixed horizon, each policy advances progress with exact fractions, and
//! the resulting terminal states are classified and reduced into comparison
//! metrics.

pub mod core;
pub mod models;
pub mod report;
pub mod utils;

pub use models::scheduler;
pub use models::{Job, JobSet, SimulationMetrics, TimeStep, TimelineState, ID};
pub use utils::{constants, errors};
pub use utils::{ConfigError, ExitCode, PolicyKind, Ratio, SchedulingError};
