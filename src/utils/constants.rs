use crate::{TimeStep, ID};

/// Id of the job that opens the dependency chain; it has no predecessor.
pub const FIRST_JOB_ID: ID = 1;

/// Submission time of the first job in the default seeded state.
pub const DEFAULT_SEED_TIME: TimeStep = 1;

pub const DEFAULT_TIME_SLICE: TimeStep = 10;
pub const DEFAULT_QUEUE_COUNT: usize = 3;
pub const DEFAULT_QUEUE_SLICES: [TimeStep; 3] = [10, 20, 30];

/// Process exit codes of the command line tool.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ExitCode {
    Success = 0,
    PolicyFailed = 2,
    InvalidInput = 5,
}

/// The scheduling policies the tool knows how to build.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PolicyKind {
    Fifo,
    Fair,
    EdfAll,
    EdfPure,
    RoundRobin,
    ShortestJobNext,
    LeastLaxityFirst,
    Priority,
    MultilevelFeedbackQueue,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 9] = [
        PolicyKind::Fifo,
        PolicyKind::Fair,
        PolicyKind::EdfAll,
        PolicyKind::EdfPure,
        PolicyKind::RoundRobin,
        PolicyKind::ShortestJobNext,
        PolicyKind::LeastLaxityFirst,
        PolicyKind::Priority,
        PolicyKind::MultilevelFeedbackQueue,
    ];

    /// Short name used on the command line.
    pub fn cli_name(&self) -> &'static str {
        match self {
            PolicyKind::Fifo => "fifo",
            PolicyKind::Fair => "fair",
            PolicyKind::EdfAll => "edf-all",
            PolicyKind::EdfPure => "edf-pure",
            PolicyKind::RoundRobin => "rr",
            PolicyKind::ShortestJobNext => "sjn",
            PolicyKind::LeastLaxityFirst => "llf",
            PolicyKind::Priority => "priority",
            PolicyKind::MultilevelFeedbackQueue => "mlfq",
        }
    }

    pub fn from_cli_name(name: &str) -> Option<PolicyKind> {
        Self::ALL.into_iter().find(|kind| kind.cli_name() == name)
    }
}
