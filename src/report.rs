use std::error::Error;
use std::io::Write;

use csv::Writer;

use crate::core::PolicyReport;
use crate::SimulationMetrics;

/// Renders the per-policy text block printed after each run.
pub fn render_policy(report: &PolicyReport) -> String {
    let metrics = match &report.outcome {
        Ok(metrics) => metrics,
        Err(err) => return format!("Scheduler: {}\n  Failed: {}\n{}", report.name, err, "-".repeat(40)),
    };

    [
        format!("Scheduler: {}", report.name),
        format!("  Number of final states: {}", metrics.num_states),
        format!("  Avg Turnaround Time: {:.2} time units", metrics.avg_turnaround_time),
        format!("  Avg Waiting Time: {:.2} time units", metrics.avg_waiting_time),
        format!("  Deadline Adherence: {:.1}%", metrics.deadline_adherence_pct),
        format!("  eA: {:.1}%   eD: {:.9}%", metrics.ea_pct, metrics.ed_pct),
        format!("  Violations: {:.1}%", metrics.violations_pct),
        format!("  Scenario Violations: {:.1}%", metrics.scenario_violations_pct),
        format!("  Unfeasibles: {:.1}%", metrics.unfeasibles_pct),
        format!("  Non Violations: {:.1}%", metrics.non_violations_pct),
        "-".repeat(40),
    ]
    .join("\n")
}

/// Renders the comparative summary as an aligned text table, one row per
/// successful policy.
pub fn render_table(reports: &[PolicyReport]) -> String {
    let mut rows: Vec<Vec<String>> = vec![std::iter::once("Scheduler".to_string())
        .chain(SimulationMetrics::FIELDS.iter().map(|f| f.to_string()))
        .collect()];

    for report in reports {
        if let Ok(metrics) = &report.outcome {
            rows.push(std::iter::once(report.name.clone()).chain(metrics.values()).collect());
        }
    }

    let widths: Vec<usize> = (0..rows[0].len())
        .map(|col| rows.iter().map(|row| row[col].len()).max().unwrap_or(0))
        .collect();

    rows.iter()
        .map(|row| {
            row.iter()
                .zip(widths.iter())
                .enumerate()
                .map(|(i, (cell, &w))| if i == 0 { format!("{cell:<w$}") } else { format!("{cell:>w$}") })
                .collect::<Vec<_>>()
                .join("  ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Writes the comparative summary as CSV, one record per successful policy.
pub fn write_csv<W: Write>(writer: W, reports: &[PolicyReport]) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_writer(writer);

    let mut header = vec!["Scheduler"];
    header.extend(SimulationMetrics::FIELDS);
    wtr.write_record(&header)?;

    for report in reports {
        if let Ok(metrics) = &report.outcome {
            let mut record = vec![report.name.clone()];
            record.extend(metrics.values());
            wtr.write_record(&record)?;
        }
    }

    wtr.flush()?;
    Ok(())
}
