//! Contains [Convergence] that holds the energy estimates of every run in the current stream file.

use crate::util::*;

/// Energy estimates grouped by experiment run.
///
/// There is always at least one run: iterations before the first run header land in an implicit first run.
/// Every run but the last is finished, the last one is still in progress unless [Convergence::finalize] was called.
#[derive(Debug, Clone, PartialEq)]
pub struct Convergence {
    runs: Vec<Vec<f64>>,
    is_finalized: bool,
}

impl Default for Convergence {
    fn default() -> Self {
        Self {
            runs: vec![Vec::new()],
            is_finalized: false,
        }
    }
}

impl Convergence {
    /// Discard all runs.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Start a new run.
    pub fn start_run(&mut self) {
        self.runs.push(Vec::new());
    }

    /// Record an energy estimate in the current run.
    pub fn record(&mut self, energy: f64) {
        if let Some(run) = self.runs.last_mut() {
            run.push(energy);
        }
    }

    /// Treat the last run as finished too, used when the stream file is read to the end once.
    pub fn finalize(&mut self) {
        self.is_finalized = true;
    }

    /// The energy estimates of all runs, including the implicit first run.
    pub fn runs(&self) -> &[Vec<f64>] {
        &self.runs
    }

    /// Number of run headers seen.
    pub fn runs_started(&self) -> usize {
        self.runs.len().saturating_sub(1)
    }

    /// Total number of iterations over all runs.
    pub fn iterations(&self) -> usize {
        self.runs.iter().map(Vec::len).sum()
    }

    /// Length of the longest run.
    pub fn max_iterations(&self) -> usize {
        self.runs.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Lowest energy seen in any run.
    pub fn min_energy(&self) -> Option<f64> {
        self.runs.iter().flatten().copied().reduce(f64::min)
    }

    /// Highest energy seen in any run.
    pub fn max_energy(&self) -> Option<f64> {
        self.runs.iter().flatten().copied().reduce(f64::max)
    }

    /// Runs that are finished.
    fn finished_runs(&self) -> &[Vec<f64>] {
        if self.is_finalized {
            &self.runs
        } else {
            &self.runs[..self.runs.len().saturating_sub(1)]
        }
    }

    /// The final energy (the lowest energy found) of each finished run with any iterations.
    pub fn final_energies(&self) -> Vec<f64> {
        self.finished_runs()
            .iter()
            .filter_map(|run| run.iter().copied().reduce(f64::min))
            .collect()
    }

    /// Mean of the final energies, if there's at least 2.
    pub fn final_mean(&self) -> Option<f64> {
        let finals = self.final_energies();
        if finals.len() < 2 {
            return None;
        }
        Some(mean(&finals))
    }

    /// Population standard deviation of the final energies, if there's at least 2.
    pub fn final_std(&self) -> Option<f64> {
        let finals = self.final_energies();
        if finals.len() < 2 {
            return None;
        }
        let mean = mean(&finals);
        let variance = finals.iter().map(|e| (e - mean).powi(2)).sum::<f64>() / finals.len() as f64;
        Some(variance.sqrt())
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn from_events(events: &[Option<f64>]) -> Convergence {
        let mut convergence = Convergence::default();
        for event in events {
            match event {
                Some(energy) => convergence.record(*energy),
                None => convergence.start_run(),
            }
        }
        convergence
    }

    #[test]
    fn test_empty() {
        let convergence = Convergence::default();
        assert_eq!(convergence.runs_started(), 0);
        assert_eq!(convergence.iterations(), 0);
        assert_eq!(convergence.max_iterations(), 0);
        assert_eq!(convergence.min_energy(), None);
        assert!(convergence.final_energies().is_empty());
        assert_eq!(convergence.final_mean(), None);
        assert_eq!(convergence.final_std(), None);
    }

    #[test]
    fn test_last_run_is_in_progress() {
        let convergence = from_events(&[None, Some(-1.0), Some(-1.5), None, Some(-1.2)]);
        assert_eq!(convergence.runs_started(), 2);
        assert_eq!(convergence.iterations(), 3);
        assert_eq!(convergence.max_iterations(), 2);
        assert_eq!(convergence.min_energy(), Some(-1.5));
        assert_eq!(convergence.max_energy(), Some(-1.0));
        // The implicit first run is empty, the last one is in progress
        assert_eq!(convergence.final_energies(), vec![-1.5]);
        assert_eq!(convergence.final_mean(), None);
    }

    #[test]
    fn test_final_stats_of_finished_runs() {
        let convergence = from_events(&[
            None,
            Some(-1.0),
            Some(-2.0),
            None,
            Some(-1.5),
            Some(-1.0),
            None,
            Some(-9.0),
        ]);
        assert_eq!(convergence.final_energies(), vec![-2.0, -1.5]);
        assert_eq!(convergence.final_mean(), Some(-1.75));
        assert_eq!(convergence.final_std(), Some(0.25));
    }

    #[test]
    fn test_finalize_includes_last_run() {
        let mut convergence = from_events(&[None, Some(-1.0), None, Some(-3.0)]);
        assert_eq!(convergence.final_energies(), vec![-1.0]);
        convergence.finalize();
        assert_eq!(convergence.final_energies(), vec![-1.0, -3.0]);
        assert_eq!(convergence.final_mean(), Some(-2.0));
        assert_eq!(convergence.final_std(), Some(1.0));
    }

    #[test]
    fn test_iterations_before_first_header() {
        let convergence = from_events(&[Some(-0.5), None, Some(-0.7)]);
        assert_eq!(convergence.runs_started(), 1);
        assert_eq!(convergence.final_energies(), vec![-0.5]);
        assert_eq!(convergence.min_energy(), Some(-0.7));
    }

    #[test]
    fn test_positive_energies_min() {
        let convergence = from_events(&[None, Some(0.5), Some(0.25)]);
        assert_eq!(convergence.min_energy(), Some(0.25));
    }

    #[test]
    fn test_reset() {
        let mut convergence = from_events(&[None, Some(-1.0), None]);
        convergence.finalize();
        convergence.reset();
        assert_eq!(convergence, Convergence::default());
    }
}
