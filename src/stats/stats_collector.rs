//! Contains the [StatsCollector] that collects stats from the follower, and the serializable [ConvergenceSummary].

use crate::util::*;

/// Collects stats from the follower.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StatsCollector {
    /// Set once the first stream file was opened.
    source_opened: bool,
    convergence: Convergence,
    error_stats: ErrorStats,
}

/// The final stats, as written with `--output-stats`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceSummary {
    /// Number of run headers seen.
    pub runs_started: usize,
    /// Total optimiser iterations seen.
    pub iterations: usize,
    /// Lowest energy seen.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_energy: Option<f64>,
    /// The lowest energy of each finished run.
    pub final_energies: Vec<f64>,
    /// Mean of the final energies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_mean: Option<f64>,
    /// Population standard deviation of the final energies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_std: Option<f64>,
    /// Number of malformed lines and other non-fatal errors.
    pub errors: u64,
}

impl StatsCollector {
    /// Record a stat.
    pub fn collect(&mut self, stat: StatType) {
        match stat {
            StatType::Reset => {
                self.source_opened = true;
                self.convergence.reset();
            }
            StatType::RunStarted => self.convergence.start_run(),
            StatType::Energy(energy) => self.convergence.record(energy),
            StatType::Error(_) => self.error_stats.add_err(),
            StatType::Fatal(msg) => self.error_stats.add_fatal_err(msg),
        }
    }

    /// Finalize stats collection, the last run counts as finished.
    pub fn finalize(&mut self) {
        self.convergence.finalize();
    }

    /// Returns if a stream file was opened at any point.
    pub fn source_opened(&self) -> bool {
        self.source_opened
    }

    /// Returns a reference to the [Convergence] of the current stream file.
    pub fn convergence(&self) -> &Convergence {
        &self.convergence
    }

    /// Returns the number of errors reported.
    pub fn err_count(&self) -> u64 {
        self.error_stats.err_count()
    }

    /// Return if any errors were reported.
    pub fn any_errors(&self) -> bool {
        self.error_stats.err_count() > 0
    }

    /// Returns the fatal error if one was reported.
    pub fn fatal_err(&self) -> Option<&str> {
        self.error_stats.fatal_err()
    }

    /// Snapshot of the stats collected so far.
    pub fn summary(&self) -> ConvergenceSummary {
        ConvergenceSummary {
            runs_started: self.convergence.runs_started(),
            iterations: self.convergence.iterations(),
            min_energy: self.convergence.min_energy(),
            final_energies: self.convergence.final_energies(),
            final_mean: self.convergence.final_mean(),
            final_std: self.convergence.final_std(),
            errors: self.error_stats.err_count(),
        }
    }

    pub(crate) fn write_stats(&self, mode: &DataOutputMode, format: DataOutputFormat) -> io::Result<()> {
        if *mode == DataOutputMode::None {
            return Ok(());
        }
        let summary = self.summary();
        let stats_str = match format {
            DataOutputFormat::JSON => serde_json::to_string_pretty(&summary)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?,
            DataOutputFormat::TOML => toml::to_string_pretty(&summary)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?,
        };
        write_stats_str(mode, &stats_str)
    }
}

fn write_stats_str(mode: &DataOutputMode, stats_str: &str) -> io::Result<()> {
    match mode {
        DataOutputMode::File(path) => fs::write(path, stats_str),
        DataOutputMode::Stdout => {
            println!("{stats_str}");
            Ok(())
        }
        DataOutputMode::None => Ok(()),
    }
}
