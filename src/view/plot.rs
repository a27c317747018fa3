//! ASCII scatter plot of the energy estimates of every run against the optimiser iteration.

use crate::util::*;

/// Marker of the run that's currently in progress.
pub const CURRENT_RUN_MARKER: char = ',';
/// Marker of finished runs when numerical markers are off.
pub const PLAIN_MARKER: char = '.';

/// Plots a [Convergence] with a fixed minimum y-range that's widened to fit the data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyPlot {
    y_range: (f64, f64),
    numerical_markers: bool,
}

impl EnergyPlot {
    /// Create a plot that always shows at least `y_range`.
    pub fn new(y_range: (f64, f64), numerical_markers: bool) -> Self {
        Self {
            y_range,
            numerical_markers,
        }
    }

    /// The marker of run `run` out of `run_count` runs.
    pub fn marker(&self, run: usize, run_count: usize) -> char {
        if run + 1 == run_count {
            CURRENT_RUN_MARKER
        } else if self.numerical_markers {
            char::from_digit((run % 10) as u32, 10).unwrap_or(PLAIN_MARKER)
        } else {
            PLAIN_MARKER
        }
    }

    /// The (min, max) energy shown on the y-axis.
    pub fn y_domain(&self, convergence: &Convergence) -> (f64, f64) {
        let (mut min, mut max) = self.y_range;
        convergence
            .runs()
            .iter()
            .flatten()
            .filter(|energy| energy.is_finite())
            .for_each(|&energy| {
                min = min.min(energy);
                max = max.max(energy);
            });
        (min, max)
    }

    /// The largest iteration index shown on the x-axis.
    pub fn x_max(convergence: &Convergence) -> usize {
        convergence.max_iterations().saturating_sub(1).max(1)
    }

    /// Render the plot with its axis labels to a `width` x `height` [Canvas].
    ///
    /// The y-labels take up a gutter on the left, the x-labels the bottom row.
    /// If there's no room left for the plot area, the canvas is left blank.
    pub fn render(&self, convergence: &Convergence, width: usize, height: usize) -> Canvas {
        let mut canvas = Canvas::new(width, height);
        let (y_min, y_max) = self.y_domain(convergence);
        let x_max = Self::x_max(convergence);

        let plot_height = height.saturating_sub(1);
        let bottom_row = plot_height.saturating_sub(1);
        let y_labels: Vec<(usize, String)> = [0, bottom_row / 2, bottom_row]
            .into_iter()
            .dedup()
            .map(|row| {
                let label = format!("{:.4}", row_value(row, plot_height, y_min, y_max));
                (row, label)
            })
            .collect();
        let label_width = y_labels
            .iter()
            .map(|(_, label)| label.len())
            .max()
            .unwrap_or(0);
        // Labels, then the y-axis
        let gutter = label_width + 1;
        let plot_width = width.saturating_sub(gutter);
        if plot_width < 1 || plot_height < 1 {
            return canvas;
        }

        for (row, label) in &y_labels {
            canvas.put_str(label_width - label.len(), *row, label, CellStyle::Title);
        }
        for row in 0..plot_height {
            canvas.put(label_width, row, '|', CellStyle::Plain);
        }
        canvas.put_str(gutter, plot_height, "0", CellStyle::Title);
        let x_max_label = x_max.to_string();
        canvas.put_str(
            width.saturating_sub(x_max_label.len()),
            plot_height,
            &x_max_label,
            CellStyle::Title,
        );

        let run_count = convergence.runs().len();
        for (run, energies) in convergence.runs().iter().enumerate() {
            let marker = self.marker(run, run_count);
            energies
                .iter()
                .enumerate()
                .filter(|(_, energy)| energy.is_finite())
                .for_each(|(iteration, &energy)| {
                    let col = scale(iteration as f64 / x_max as f64, plot_width);
                    let row = scale((y_max - energy) / (y_max - y_min), plot_height);
                    canvas.put(gutter + col, row, marker, CellStyle::Run(run));
                });
        }
        canvas
    }
}

/// Map `fraction` in `0..=1` to a cell index in `0..cells`, by rounding.
fn scale(fraction: f64, cells: usize) -> usize {
    let max_idx = cells.saturating_sub(1);
    let idx = (fraction * max_idx as f64).round();
    if idx <= 0.0 {
        0
    } else {
        (idx as usize).min(max_idx)
    }
}

/// The energy shown at `row` of a plot area `plot_height` rows tall.
fn row_value(row: usize, plot_height: usize, y_min: f64, y_max: f64) -> f64 {
    if plot_height <= 1 {
        return y_max;
    }
    y_max - (y_max - y_min) * row as f64 / (plot_height - 1) as f64
}
