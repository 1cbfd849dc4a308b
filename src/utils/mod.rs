pub mod constants;
pub mod errors;
pub mod ratio;

pub use constants::{ExitCode, PolicyKind};
pub use errors::{ConfigError, SchedulingError};
pub use ratio::Ratio;
