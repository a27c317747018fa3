//! Builds the summary [Report][report::Report] from collected stats.
pub mod report;
mod table_formatter_utils;

use self::report::{Report, RunSummary, StatSummary};
use super::format_optional_energy;
use crate::util::*;

/// Creates the summary [Report] of the collected stats.
pub fn make_report(collector: &StatsCollector, processing_time: Duration) -> Report {
    let mut report = Report::new(processing_time);
    let convergence = collector.convergence();

    report.add_stat(StatSummary::new(
        "Total errors".to_string(),
        collector.err_count().to_string(),
        None,
    ));
    report.add_stat(StatSummary::new(
        "Runs started".to_string(),
        convergence.runs_started().to_string(),
        None,
    ));
    report.add_stat(StatSummary::new(
        "Iterations".to_string(),
        convergence.iterations().to_string(),
        Some(format!(
            "Longest run: {}",
            convergence.max_iterations()
        )),
    ));
    report.add_stat(StatSummary::new(
        "Minimum energy seen".to_string(),
        format_optional_energy(convergence.min_energy()),
        None,
    ));
    report.add_stat(StatSummary::new(
        "Final mean".to_string(),
        format_optional_energy(convergence.final_mean()),
        Some("Over the lowest energy of each finished run".to_string()),
    ));
    report.add_stat(StatSummary::new(
        "Final std. deviation".to_string(),
        format_optional_energy(convergence.final_std()),
        None,
    ));

    // The implicit first run only shows up if iterations were written before any run header
    convergence
        .runs()
        .iter()
        .enumerate()
        .filter(|(idx, run)| *idx > 0 || !run.is_empty())
        .for_each(|(idx, run)| {
            report.add_run(RunSummary {
                run: idx.to_string(),
                iterations: run.len().to_string(),
                final_energy: format_optional_energy(run.iter().copied().reduce(f64::min)),
            })
        });

    if let Some(fatal) = collector.fatal_err() {
        report.add_fatal_error(fatal.to_string());
    }
    report
}
