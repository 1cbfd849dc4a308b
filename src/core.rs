use std::collections::BTreeSet;
use std::thread;

use tracing::{debug, info, warn};

use crate::models::scheduler::Scheduler;
use crate::{JobSet, SchedulingError, SimulationMetrics, TimeStep, TimelineState};

/// Terminal states of one exploration, deduplicated and in a stable order.
pub type StateSet = BTreeSet<TimelineState>;

/// Every successor of `state` at `time` obtained by letting each job either
/// arrive now or not.
///
/// Jobs are visited in order, so a job may arrive on the same tick as its
/// predecessor. Jobs that are already present, or whose predecessor is not,
/// do not branch. Within each split the arrival branch comes first.
pub fn next_states(jobs: &JobSet, state: TimelineState, time: TimeStep) -> Vec<TimelineState> {
    let mut branches = vec![state];

    for job in jobs {
        let mut split = Vec::with_capacity(branches.len() * 2);
        for branch in branches {
            if let Some(arrived) = branch.arrive(job, time) {
                split.push(arrived);
            }
            split.push(branch);
        }
        branches = split;
    }

    branches
}

/// The default starting point: the first job already running
/// since `seed_time`, nothing else present.
pub fn seeded_state(scheduler: &dyn Scheduler, jobs: &JobSet, seed_time: TimeStep) -> TimelineState {
    let empty = TimelineState::for_scheduler(scheduler);
    match jobs.first() {
        Some(first) => empty.with_running(*first, seed_time),
        None => empty,
    }
}

/// Explores every arrival scenario from `initial` for ticks `0..=steps`.
///
/// # Arguments
/// * `scheduler` - The policy under test.
/// * `initial` - The starting state.
/// * `jobs` - The job chain.
/// * `steps` - The last tick simulated.
///
/// # Returns
/// The terminal state set, or the first error the policy raised.
pub fn simulate(
    scheduler: &dyn Scheduler,
    initial: TimelineState,
    jobs: &JobSet,
    steps: TimeStep,
) -> Result<StateSet, SchedulingError> {
    scheduler.validate(jobs)?;

    let mut states = StateSet::from([initial]);

    for t in 0..=steps {
        let mut successors = StateSet::new();
        for state in &states {
            let ticked = state.tick(scheduler, t)?;
            successors.extend(next_states(jobs, ticked, t));
        }
        states = successors;
        debug!(policy = %scheduler.name(), time = t, states = states.len(), "tick explored");
    }

    info!(policy = %scheduler.name(), steps, states = states.len(), "exploration finished");
    Ok(states)
}

/// Explores and reduces one policy in a single call.
pub fn evaluate(
    scheduler: &dyn Scheduler,
    initial: TimelineState,
    jobs: &JobSet,
    steps: TimeStep,
) -> Result<SimulationMetrics, SchedulingError> {
    let states = simulate(scheduler, initial, jobs, steps)?;
    Ok(SimulationMetrics::compute(&states, jobs, steps))
}

/// Result of one policy in a comparison.
#[derive(Debug)]
pub struct PolicyReport {
    pub name: String,
    pub outcome: Result<SimulationMetrics, SchedulingError>,
}

/// Runs every policy against the same jobs and horizon.
///
/// Runs are spread over at most `workers` threads. Each run has its own
/// states and memory, so a failing policy only affects its own report.
///
/// # Arguments
/// * `policies` - The policies to compare.
/// * `jobs` - The job chain.
/// * `steps` - The last tick simulated.
/// * `seed_time` - Submission time of the seeded first job, `None` to start empty.
/// * `workers` - Maximum number of threads.
///
/// # Returns
/// One report per policy, in the order given.
pub fn compare(
    policies: &[Box<dyn Scheduler>],
    jobs: &JobSet,
    steps: TimeStep,
    seed_time: Option<TimeStep>,
    workers: usize,
) -> Vec<PolicyReport> {
    let run = |scheduler: &dyn Scheduler| {
        let initial = match seed_time {
            Some(t) => seeded_state(scheduler, jobs, t),
            None => TimelineState::for_scheduler(scheduler),
        };
        let outcome = evaluate(scheduler, initial, jobs, steps);
        if let Err(err) = &outcome {
            warn!(policy = %scheduler.name(), error = %err, "policy run failed");
        }
        PolicyReport {
            name: scheduler.name(),
            outcome,
        }
    };

    let chunk_size = policies.len().div_ceil(workers.max(1)).max(1);

    thread::scope(|scope| {
        let handles: Vec<_> = policies
            .chunks(chunk_size)
            .map(|chunk| {
                let run = &run;
                scope.spawn(move || chunk.iter().map(|p| run(p.as_ref())).collect::<Vec<_>>())
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| match handle.join() {
                Ok(reports) => reports,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scheduler::{
        build_policy, EdfAll, Fair, Fifo, MultilevelFeedbackQueue, PolicyOptions, PriorityScheduler,
        RoundRobin,
    };
    use crate::models::{EndedEntry, Job};
    use crate::{PolicyKind, Ratio};
    use proptest::prelude::*;

    fn jobs(specs: &[(TimeStep, TimeStep)]) -> JobSet {
        JobSet::from_specs(specs).unwrap()
    }

    #[test]
    fn test_next_states_branches_in_dependency_order() {
        let set = jobs(&[(1, 1), (1, 1), (1, 1)]);
        let branches = next_states(&set, TimelineState::default(), 0);

        // {}, {1}, {1,2}, {1,2,3}
        assert_eq!(branches.len(), 4);
        assert_eq!(branches[0].running().len(), 3);
        assert!(branches.last().unwrap().running().is_empty());
    }

    #[test]
    fn test_present_jobs_do_not_branch() {
        let set = jobs(&[(3, 3), (3, 3)]);
        let first = *set.first().unwrap();
        let state = TimelineState::default().with_running(first, 0);

        let branches = next_states(&set, state, 1);
        assert_eq!(branches.len(), 2);
        assert_eq!(branches[0].running().len(), 2);
        assert_eq!(branches[1].running().len(), 1);
    }

    #[test]
    fn test_seeded_job_finishes_after_its_duration() {
        let set = jobs(&[(2, 2)]);
        let job = *set.first().unwrap();
        let initial = seeded_state(&Fifo, &set, 1);

        let states = simulate(&Fifo, initial, &set, 3).unwrap();
        assert_eq!(states.len(), 1);

        let terminal = states.first().unwrap();
        assert!(terminal.running().is_empty());
        assert_eq!(
            terminal.ended().get(&job),
            Some(&EndedEntry {
                submitted: 1,
                finished: 3
            })
        );

        let metrics = SimulationMetrics::compute(&states, &set, 3);
        assert_eq!(metrics.violations_pct, 0.0);
        assert_eq!(metrics.non_violations_pct, 100.0);
        assert_eq!(metrics.deadline_adherence_pct, 100.0);
    }

    #[test]
    fn test_two_job_fair_exploration_by_hand() {
        let set = jobs(&[(1, 1), (1, 1)]);
        let states = simulate(&Fair, TimelineState::default(), &set, 2).unwrap();
        assert_eq!(states.len(), 10);

        // Job 2 never runs or ends without job 1
        let second = *set.get(2).unwrap();
        let first = *set.get(1).unwrap();
        for state in &states {
            if state.contains(&second) {
                assert!(state.contains(&first));
            }
        }

        let metrics = SimulationMetrics::compute(&states, &set, 2);
        assert_eq!(metrics.num_states, 10);
        assert_eq!(metrics.num_tasks, 8);
        assert_eq!(metrics.avg_turnaround_time, 1.25);
        assert_eq!(metrics.avg_waiting_time, 0.25);
        assert_eq!(metrics.deadline_adherence_pct, 75.0);
        assert_eq!(metrics.ea_pct, 0.0);
        assert_eq!(metrics.ed_pct, 10.0);
        assert_eq!(metrics.violations_pct, 10.0);
        assert_eq!(metrics.scenario_violations_pct, 10.0);
        assert_eq!(metrics.unfeasibles_pct, 70.0);
        assert_eq!(metrics.non_violations_pct, 10.0);
    }

    #[test]
    fn test_coprime_deadlines_keep_error_sums_exact() {
        let set = jobs(&[(1, 673), (1, 677), (1, 683), (1, 691), (1, 701), (1, 709), (1, 719)]);
        let states = simulate(&EdfAll, seeded_state(&EdfAll, &set, 0), &set, 4).unwrap();
        let metrics = SimulationMetrics::compute(&states, &set, 4);

        assert!(metrics.num_tasks > 0);
        assert!(metrics.ea_pct > 0.0 && metrics.ea_pct <= 100.0);
        assert_eq!(metrics.ed_pct, 0.0);

        let reports = compare(&[Box::new(EdfAll) as Box<dyn Scheduler>, Box::new(Fifo)], &set, 4, Some(0), 2);
        assert!(reports.iter().all(|r| r.outcome.is_ok()));
    }

    #[test]
    fn test_missing_priority_aborts_before_exploring() {
        let set = jobs(&[(1, 1), (1, 1), (1, 1)]);
        let scheduler = PriorityScheduler::from_ordered(&[1, 2]);
        let result = simulate(&scheduler, TimelineState::default(), &set, 3);
        assert_eq!(
            result,
            Err(SchedulingError::Config(crate::ConfigError::MissingPriority { job: 3 }))
        );
    }

    #[test]
    fn test_stateful_branches_do_not_share_memory() {
        // Job 2 arriving at t=0 or t=1 must not shift the cursor seen by the other branch
        let set = jobs(&[(2, 5), (2, 5)]);
        let rr = RoundRobin::new(1).unwrap();
        let initial = TimelineState::for_scheduler(&rr);
        let states = simulate(&rr, initial.clone(), &set, 1).unwrap();

        let first = *set.get(1).unwrap();
        let second = *set.get(2).unwrap();
        let both_from_zero = initial.with_running(first, 0).with_running(second, 0);
        let expected = both_from_zero.tick(&rr, 1).unwrap();
        assert!(states.contains(&expected));
        assert_eq!(expected.running()[&first].progress, Ratio::new(1, 2));
        assert_eq!(expected.running()[&second].progress, Ratio::ZERO);
    }

    #[test]
    fn test_mlfq_runs_to_completion() {
        let set = jobs(&[(2, 4), (3, 6)]);
        let mlfq = MultilevelFeedbackQueue::new(2, &[1, 2]).unwrap();
        let states = simulate(&mlfq, seeded_state(&mlfq, &set, 0), &set, 6).unwrap();

        assert!(states.iter().any(|s| s.ended().len() == 2));
    }

    #[test]
    fn test_compare_isolates_failures() {
        let set = jobs(&[(1, 2), (2, 2)]);
        let policies: Vec<Box<dyn Scheduler>> = vec![
            Box::new(Fifo),
            Box::new(PriorityScheduler::from_ordered(&[1])),
            Box::new(EdfAll),
        ];

        let reports = compare(&policies, &set, 3, Some(1), 2);
        let names: Vec<&str> = reports.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["FIFO", "Priority", "EDFAll"]);
        assert!(reports[0].outcome.is_ok());
        assert!(reports[1].outcome.is_err());
        assert!(reports[2].outcome.is_ok());
    }

    #[test]
    fn test_compare_matches_sequential_runs() {
        let set = jobs(&[(2, 3), (1, 2), (2, 2)]);
        let options = PolicyOptions {
            priorities: vec![1, 2, 3],
            time_slice: 1,
            ..PolicyOptions::default()
        };
        let policies: Vec<Box<dyn Scheduler>> = PolicyKind::ALL
            .iter()
            .map(|&kind| build_policy(kind, &options).unwrap())
            .collect();

        let parallel = compare(&policies, &set, 4, Some(1), 4);
        let sequential = compare(&policies, &set, 4, Some(1), 1);
        for (a, b) in parallel.iter().zip(sequential.iter()) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.outcome, b.outcome);
        }
    }

    fn assert_invariants(state: &TimelineState, set: &JobSet) -> Result<(), TestCaseError> {
        for job in state.running().keys() {
            prop_assert!(!state.ended().contains_key(job));
        }
        for job in state.running().keys().chain(state.ended().keys()) {
            prop_assert_eq!(set.iter().filter(|j| *j == job).count(), 1);
            if let Some(pred) = job.predecessor() {
                let pred: &Job = set.get(pred).unwrap();
                prop_assert!(state.contains(pred));
            }
        }
        for entry in state.running().values() {
            prop_assert!(entry.progress < Ratio::ONE);
        }
        Ok(())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_reachable_states_keep_invariants(
            specs in proptest::collection::vec((1usize..4, 1usize..5), 1..4),
            steps in 0usize..5,
            kind in proptest::sample::select(PolicyKind::ALL.to_vec()),
        ) {
            let set = JobSet::from_specs(&specs).unwrap();
            let options = PolicyOptions {
                priorities: (1..=specs.len() as i64).collect(),
                time_slice: 2,
                ..PolicyOptions::default()
            };
            let policy = build_policy(kind, &options).unwrap();
            let states = simulate(policy.as_ref(), TimelineState::for_scheduler(policy.as_ref()), &set, steps).unwrap();

            prop_assert!(!states.is_empty());
            for state in &states {
                assert_invariants(state, &set)?;

                let categories = [
                    state.is_violated(),
                    state.is_unfeasible(&set, steps),
                    state.is_scenario_violated(&set, steps),
                ];
                prop_assert_eq!(state.is_non_violated(&set, steps), !categories.iter().any(|&c| c));
            }

            let metrics = SimulationMetrics::compute(&states, &set, steps);
            for pct in [
                metrics.deadline_adherence_pct,
                metrics.violations_pct,
                metrics.scenario_violations_pct,
                metrics.unfeasibles_pct,
                metrics.non_violations_pct,
            ] {
                prop_assert!((0.0..=100.0).contains(&pct));
            }
        }

        #[test]
        fn prop_single_call_progress_is_bounded(
            specs in proptest::collection::vec((1usize..5, 1usize..5), 1..4),
            done in proptest::collection::vec(0usize..5, 3),
            kind in proptest::sample::select(PolicyKind::ALL.to_vec()),
            time in 1usize..6,
        ) {
            let set = JobSet::from_specs(&specs).unwrap();
            let options = PolicyOptions {
                priorities: (1..=specs.len() as i64).collect(),
                ..PolicyOptions::default()
            };
            let policy = build_policy(kind, &options).unwrap();
            let factor = match kind {
                PolicyKind::RoundRobin => options.time_slice,
                PolicyKind::MultilevelFeedbackQueue => options.queue_slices.iter().copied().max().unwrap_or(1),
                _ => 1,
            };

            let mut state = TimelineState::for_scheduler(policy.as_ref());
            for job in &set {
                state = state.with_running(*job, 0);
            }

            // Start anywhere in [0, 1) so jobs close to completion are covered
            let mut initial = state.running().clone();
            for (entry, (job, &steps)) in initial.values_mut().zip(set.iter().zip(&done)) {
                let d = job.duration();
                entry.progress = Ratio::new(steps.min(d - 1) as i128, d as i128);
            }

            let mut running = initial.clone();
            let mut memory = state.memory().clone();
            policy.add_progress(&mut running, time, &mut memory).unwrap();

            for (job, before) in &initial {
                let after = running[job];
                let increment = job.nominal_rate() * Ratio::from(factor);
                prop_assert!(after.progress >= before.progress);
                prop_assert_eq!(after.submitted, before.submitted);
                prop_assert!(after.progress <= before.progress + increment);
                prop_assert!(after.progress <= Ratio::ONE + increment);
            }
        }
    }
}
