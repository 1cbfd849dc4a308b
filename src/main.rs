use std::error::Error;
use std::fs::File;
use std::process;
use std::thread::available_parallelism;

use clap::{Arg, ArgAction, ArgMatches, Command};
use csv::ReaderBuilder;
use tracing_subscriber::EnvFilter;

use sparksim::core::compare;
use sparksim::report::{render_policy, render_table, write_csv};
use sparksim::scheduler::{policy_from_name, PolicyOptions, Scheduler};
use sparksim::{ExitCode, Job, JobSet, PolicyKind, TimeStep, ID};

/// Reads a job file and returns a `JobSet`.
///
/// One job per line, `duration, deadline`, no header. Jobs are numbered from 1
/// in file order, which is also their arrival order.
pub fn read_job_file(file_path: &str) -> Result<JobSet, Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new().has_headers(false).from_path(file_path)?;
    let mut jobs = Vec::new();

    let mut id: ID = 1;

    for result in rdr.records() {
        let record = result?;
        if record.len() < 2 {
            return Err(format!("line {id}: expected 'duration, deadline'").into());
        }

        let duration: TimeStep = record[0].trim().parse()?;
        let deadline: TimeStep = record[1].trim().parse()?;

        jobs.push(Job::new(id, duration, deadline)?);
        id += 1;
    }

    Ok(JobSet::new(jobs)?)
}

/// Parses a comma separated list such as `10,20,30`.
fn parse_list<T: std::str::FromStr>(raw: &str) -> Result<Vec<T>, T::Err> {
    raw.split(',').map(|item| item.trim().parse()).collect()
}

pub fn build_cli_command() -> Command {
    Command::new("sparksim")
    .version("0.1.0")
    .about("Exhaustively compares scheduling policies on a chain of deadline-bound jobs")

    .arg(Arg::new("job_file")
        .required(true)
        .help("Path to the job file (one 'duration, deadline' per line)"))

    .arg(Arg::new("steps")
        .required(true)
        .help("Last simulated tick"))

    .arg(Arg::new("policy")
        .short('p')
        .long("policy")
        .action(ArgAction::Append)
        .value_parser(PolicyKind::ALL.map(|kind| kind.cli_name()))
        .help("Policy to evaluate, repeatable (default: all)"))

    .arg(Arg::new("workers")
        .short('w')
        .long("workers")
        .help("Number of policies simulated in parallel"))

    .arg(Arg::new("time_slice")
        .short('t')
        .long("time-slice")
        .default_value("10")
        .help("Round robin time slice"))

    .arg(Arg::new("queues")
        .short('q')
        .long("queues")
        .default_value("3")
        .help("Number of feedback queues"))

    .arg(Arg::new("slices")
        .long("slices")
        .default_value("10,20,30")
        .help("Feedback queue time slices, comma separated"))

    .arg(Arg::new("priorities")
        .long("priorities")
        .help("Priority of each job in file order, comma separated (default: job id)"))

    .arg(Arg::new("seed_time")
        .long("seed-time")
        .default_value("1")
        .help("Submission time of the first job in the seeded start state"))

    .arg(Arg::new("no_seed")
        .long("no-seed")
        .action(ArgAction::SetTrue)
        .help("Start from an empty timeline instead of a seeded one"))

    .arg(Arg::new("output")
        .short('o')
        .long("output")
        .help("Write the comparative table to this CSV file"))
}

/// Collects policy parameters from the command line.
fn policy_options(matches: &ArgMatches, jobs: &JobSet) -> Result<PolicyOptions, Box<dyn Error>> {
    let priorities = match matches.get_one::<String>("priorities") {
        Some(raw) => parse_list::<i64>(raw)?,
        None => jobs.iter().map(|job| job.id() as i64).collect(),
    };

    Ok(PolicyOptions {
        time_slice: parse_arg(matches, "time_slice")?,
        num_queues: parse_arg(matches, "queues")?,
        queue_slices: parse_list(&string_arg(matches, "slices")?)?,
        priorities,
    })
}

fn string_arg(matches: &ArgMatches, name: &str) -> Result<String, Box<dyn Error>> {
    matches
        .get_one::<String>(name)
        .cloned()
        .ok_or_else(|| format!("missing argument '{name}'").into())
}

fn parse_arg<T>(matches: &ArgMatches, name: &str) -> Result<T, Box<dyn Error>>
where
    T: std::str::FromStr,
    T::Err: Error + 'static,
{
    Ok(string_arg(matches, name)?.trim().parse::<T>()?)
}

fn build_policies(matches: &ArgMatches, options: &PolicyOptions) -> Result<Vec<Box<dyn Scheduler>>, Box<dyn Error>> {
    let names: Vec<String> = match matches.get_many::<String>("policy") {
        Some(values) => values.cloned().collect(),
        None => PolicyKind::ALL.iter().map(|kind| kind.cli_name().to_string()).collect(),
    };

    names
        .iter()
        .map(|name| policy_from_name(name, options).map_err(|err| Box::new(err) as Box<dyn Error>))
        .collect()
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {message}");
    process::exit(ExitCode::InvalidInput as i32);
}

fn main() {
    // cargo run <job_file> <steps> [-p fifo -p rr ...] [-w <w>] [-t <ts>] [-q <n> --slices a,b,c]
    // example : cargo run jobs.csv 12 -p fair -p mlfq -w 4
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let matches: ArgMatches = build_cli_command().get_matches();

    let job_file = string_arg(&matches, "job_file").unwrap_or_else(|e| fail(e));
    let jobs = read_job_file(&job_file).unwrap_or_else(|e| fail(format!("reading job file: {e}")));

    let steps: TimeStep = parse_arg(&matches, "steps").unwrap_or_else(|e| fail(e));
    let seed_time: Option<TimeStep> = if matches.get_flag("no_seed") {
        None
    } else {
        Some(parse_arg(&matches, "seed_time").unwrap_or_else(|e| fail(e)))
    };

    let default_parallelism_approx = available_parallelism().map_or(1, |n| n.get());
    let workers = match matches.get_one::<String>("workers") {
        Some(raw) => raw.parse::<usize>().unwrap_or_else(|e| fail(e)),
        None => default_parallelism_approx,
    };

    let options = policy_options(&matches, &jobs).unwrap_or_else(|e| fail(e));
    let policies = build_policies(&matches, &options).unwrap_or_else(|e| fail(e));

    let reports = compare(&policies, &jobs, steps, seed_time, workers);

    for report in &reports {
        println!("{}", render_policy(report));
    }

    println!("\nComparative Analysis Summary:");
    println!("{}", render_table(&reports));

    if let Some(path) = matches.get_one::<String>("output") {
        let written = File::create(path)
            .map_err(|e| Box::new(e) as Box<dyn Error>)
            .and_then(|file| write_csv(file, &reports));
        if let Err(e) = written {
            fail(format!("writing {path}: {e}"));
        }
    }

    let code = if reports.iter().all(|r| r.outcome.is_ok()) {
        ExitCode::Success
    } else {
        ExitCode::PolicyFailed
    };
    process::exit(code as i32);
}
