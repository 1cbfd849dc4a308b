//! Aggregate comparison statistics over a terminal state set.
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Avg turnaround | mean(finish - submission) over every (state, ended job) pair |
//! | Avg waiting | mean(max(0, turnaround - duration)) over the same pairs |
//! | Deadline adherence | pairs with turnaround <= deadline / all pairs |
//! | eA / eD | mean per-state earliness / tardiness |
//! | Category shares | states violated, scenario-violated, unfeasible, non-violated |

use crate::Ratio;

use super::{JobSet, TimeStep, TimelineState};

/// One metrics record per policy run. Percentages lie in `[0, 100]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationMetrics {
    pub avg_turnaround_time: f64,
    pub avg_waiting_time: f64,
    pub deadline_adherence_pct: f64,
    pub ea_pct: f64,
    pub ed_pct: f64,
    pub violations_pct: f64,
    pub scenario_violations_pct: f64,
    pub unfeasibles_pct: f64,
    pub non_violations_pct: f64,
    /// Distinct terminal states. Policy memory is part of a state's identity,
    /// so round robin and feedback queue runs can count several states with
    /// the same running and ended jobs.
    pub num_states: usize,
    pub num_tasks: usize, // Ended (state, job) pairs
}

/// `part / whole`, or zero when `whole` is zero.
fn mean(part: Ratio, whole: usize) -> Ratio {
    if whole == 0 {
        Ratio::ZERO
    } else {
        part / Ratio::from(whole)
    }
}

fn pct(part: Ratio, whole: usize) -> f64 {
    (mean(part, whole) * Ratio::from_integer(100)).to_f64()
}

impl SimulationMetrics {
    /// Column names, in the order `values` returns them.
    pub const FIELDS: [&'static str; 11] = [
        "avg_turnaround_time",
        "avg_waiting_time",
        "deadline_adherence_pct",
        "eA_pct",
        "eD_pct",
        "violations_pct",
        "scenario_violations_pct",
        "unfeasibles_pct",
        "non_violations_pct",
        "num_states",
        "num_tasks",
    ];

    /// Reduces the terminal states of one run to comparison statistics.
    ///
    /// # Arguments
    /// * `states` - The terminal state set.
    /// * `jobs` - The simulated jobs.
    /// * `steps` - The exploration horizon.
    pub fn compute<'a, I>(states: I, jobs: &JobSet, steps: TimeStep) -> Self
    where
        I: IntoIterator<Item = &'a TimelineState>,
    {
        let mut num_states = 0;
        let mut num_tasks = 0;
        let mut on_time = 0;
        let mut turnaround = 0;
        let mut waiting = 0;
        let mut early = Ratio::ZERO;
        let mut late = Ratio::ZERO;
        let (mut violated, mut scenario, mut unfeasible, mut clean) = (0, 0, 0, 0);

        for state in states {
            num_states += 1;

            for job in jobs {
                if let Some(entry) = state.ended().get(job) {
                    let execution = entry.execution_time();
                    turnaround += execution;
                    waiting += execution.saturating_sub(job.duration());
                    num_tasks += 1;
                    if execution <= job.deadline() {
                        on_time += 1;
                    }
                }
            }

            let (ea, ed) = state.error(jobs);
            early += ea;
            late += ed;

            violated += state.is_violated() as usize;
            scenario += state.is_scenario_violated(jobs, steps) as usize;
            unfeasible += state.is_unfeasible(jobs, steps) as usize;
            clean += state.is_non_violated(jobs, steps) as usize;
        }

        Self {
            avg_turnaround_time: mean(Ratio::from(turnaround), num_tasks).to_f64(),
            avg_waiting_time: mean(Ratio::from(waiting), num_tasks).to_f64(),
            deadline_adherence_pct: pct(Ratio::from(on_time), num_tasks),
            ea_pct: pct(early, num_states),
            ed_pct: pct(late, num_states),
            violations_pct: pct(Ratio::from(violated), num_states),
            scenario_violations_pct: pct(Ratio::from(scenario), num_states),
            unfeasibles_pct: pct(Ratio::from(unfeasible), num_states),
            non_violations_pct: pct(Ratio::from(clean), num_states),
            num_states,
            num_tasks,
        }
    }

    /// The metric values in `FIELDS` order, formatted for tables.
    pub fn values(&self) -> [String; 11] {
        [
            format!("{:.2}", self.avg_turnaround_time),
            format!("{:.2}", self.avg_waiting_time),
            format!("{:.1}", self.deadline_adherence_pct),
            format!("{:.1}", self.ea_pct),
            format!("{:.9}", self.ed_pct),
            format!("{:.1}", self.violations_pct),
            format!("{:.1}", self.scenario_violations_pct),
            format!("{:.1}", self.unfeasibles_pct),
            format!("{:.1}", self.non_violations_pct),
            self.num_states.to_string(),
            self.num_tasks.to_string(),
        ]
    }
}
