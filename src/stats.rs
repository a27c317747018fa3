//! Contains the [StatType] events sent from the follower to the controller, and the stats built from them.

use crate::util::*;

pub mod convergence;
pub mod error_stats;
pub mod stats_collector;
pub mod stats_report;

/// Possible stats that can be sent to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum StatType {
    /// The stream file was (re)opened, all data from before is discarded.
    Reset,
    /// A run header was read, a new experiment run starts.
    RunStarted,
    /// The energy estimate of one optimiser iteration in the current run.
    Energy(f64),
    /// A non-fatal error, e.g. a malformed line.
    Error(Box<str>),
    /// A fatal error, processing stops.
    Fatal(Box<str>),
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatType::Reset => write!(f, "Reset"),
            StatType::RunStarted => write!(f, "Run started"),
            StatType::Energy(energy) => write!(f, "Energy: {energy}"),
            StatType::Error(msg) => write!(f, "Error: {msg}"),
            StatType::Fatal(msg) => write!(f, "Fatal: {msg}"),
        }
    }
}

/// Displays an error message if the config doesn't have the mute error flag set.
pub(crate) fn display_error(error: &str, config: &impl UtilOpt) {
    if !config.mute_errors() {
        crate::display_error(error);
    }
}

/// Formats an energy value, or a placeholder if there's too little data for it.
pub(crate) fn format_optional_energy(energy: Option<f64>) -> String {
    match energy {
        Some(energy) => format!("{energy}"),
        None => "Insufficient data".to_string(),
    }
}
