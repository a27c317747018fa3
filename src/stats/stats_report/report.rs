//! The Report struct is used by the controller to structure the report printed at the end of execution
//!
//! Report contains several StatSummary structs that are used to generate the report table
use tabled::{
    settings::{object::Rows, Alignment, Format, Modify, Panel},
    Table, Tabled,
};

use super::table_formatter_utils::format_global_stats_sub_table;
use super::table_formatter_utils::format_sub_table;
use super::table_formatter_utils::format_super_table;
use owo_colors::{AnsiColors, OwoColorize};
use std::io::Write;

/// Describes the columns of the report table
#[derive(Tabled)]
pub struct StatSummary {
    /// Name of the statistic
    pub statistic: String,
    /// Value of the statistic
    pub value: String,
    /// Optional notes
    pub notes: String,
}

impl StatSummary {
    /// Create a new row of the global stats table
    pub fn new(statistic: String, value: String, notes: Option<String>) -> Self {
        Self {
            statistic,
            value,
            notes: notes.unwrap_or_default(),
        }
    }
}

/// Describes the columns of the runs table
#[derive(Tabled)]
pub struct RunSummary {
    /// Run number
    pub run: String,
    /// Iterations in the run
    pub iterations: String,
    /// Lowest energy of the run
    #[tabled(rename = "final energy")]
    pub final_energy: String,
}

/// The Report struct is used by the controller to structure the report printed at the end of execution
///
/// Contains convenience methods to add stats to the report, and to generate the report table
pub struct Report {
    pub(crate) stats: Vec<StatSummary>,
    pub(crate) runs: Vec<RunSummary>,
    processing_time: std::time::Duration,
    fatal_error: Option<String>,
}

impl Report {
    /// Create an empty report
    pub fn new(processing_time: std::time::Duration) -> Self {
        Self {
            stats: Vec::new(),
            runs: Vec::new(),
            processing_time,
            fatal_error: None,
        }
    }

    /// Add a row to the global stats
    pub fn add_stat(&mut self, stat: StatSummary) {
        self.stats.push(stat);
    }

    /// Add a row to the runs table
    pub fn add_run(&mut self, run: RunSummary) {
        self.runs.push(run);
    }

    /// Mark the report as an early termination caused by `error`
    pub fn add_fatal_error(&mut self, error: String) {
        self.fatal_error = Some(error);
    }

    /// Build the complete report table
    pub fn table(&self) -> Table {
        let mut global_stats_table = Table::new(&self.stats);
        format_global_stats_sub_table(&mut global_stats_table);

        let mut multi_table = if self.runs.is_empty() {
            tabled::col![global_stats_table]
        } else {
            let runs_table = format_sub_table(
                Table::new(&self.runs),
                "Runs".to_string(),
                AnsiColors::Yellow,
            );
            tabled::col![global_stats_table, runs_table]
        };
        let multi_table = multi_table.with(tabled::settings::Style::rounded());
        let mut report_table = format_super_table(multi_table, self.processing_time);

        if let Some(fatal_error) = &self.fatal_error {
            let _ = report_table
                .with(Panel::header(format!(
                    "FATAL ERROR - EARLY TERMINATION: {fatal_error}"
                )))
                .with(Modify::new(Rows::single(0)).with(Alignment::center()).with(
                    Format::content(|x| {
                        let x = x.to_uppercase();
                        x.red().to_string()
                    }),
                ));
        }
        report_table
    }

    /// Print the report to stdout
    pub fn print(&self) {
        let mut lock = std::io::stdout().lock();
        if let Err(e) = writeln!(lock, "{final_report}", final_report = self.table()) {
            if e.kind() == std::io::ErrorKind::BrokenPipe {
                log::warn!("Broken pipe, stdout was closed before report could be written");
            } else {
                log::error!("Failed to write report to stdout: {e}");
            }
        }
    }
}
