//! The terminal UI layout: the graph window on top, the stats and usage windows below.
//!
//! ```text
//! ┌───────────────────Optimiser iteration──────┐
//! │                                             │
//! E          (plot, ceil(2/3) of the rows)      │
//! └─────────────────────────────────────────────┘
//! ┌─stats──────────────────────┐┌─usage─────────┐
//! │N runs = ...                ││Quit: q        │
//! └────────────────────────────┘└───────────────┘
//! ```

use crate::util::*;

/// Number of reported errors kept for the usage window.
pub const ERROR_HISTORY: usize = 8;
/// Column of the graph window title.
const GRAPH_TITLE_COL: usize = 20;
const GRAPH_TITLE: &str = "Optimiser iteration";
/// First row of the vertical y-axis label.
const Y_LABEL_ROW: usize = 10;
const Y_LABEL: &str = "Energy";
const USAGE_LINES: [&str; 3] = ["Toggle numerical markers: n", "Toggle colour: c", "Quit: q"];

/// What the controller should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Stop monitoring.
    Quit,
    /// Display settings changed.
    Redraw,
    /// Unbound key.
    Ignored,
}

/// Holds the display state toggled by the user, and the recently reported errors.
pub struct Dashboard {
    numerical_markers: bool,
    color: bool,
    y_range: (f64, f64),
    errors: ConstGenericRingBuffer<Box<str>, ERROR_HISTORY>,
}

impl Dashboard {
    /// Create a dashboard with the initial display settings of the config.
    pub fn new(config: &impl DisplayOpt) -> Self {
        Self {
            numerical_markers: config.numerical_markers(),
            color: DisplayOpt::color(config),
            y_range: config.y_range(),
            errors: ConstGenericRingBuffer::new(),
        }
    }

    /// Apply the command bound to `key`.
    pub fn handle_key(&mut self, key: u8) -> KeyAction {
        match key {
            b'q' | b'Q' => KeyAction::Quit,
            b'n' | b'N' => {
                self.numerical_markers = !self.numerical_markers;
                log::debug!("Numerical markers: {}", self.numerical_markers);
                KeyAction::Redraw
            }
            b'c' | b'C' => {
                self.color = !self.color;
                log::debug!("Colour: {}", self.color);
                KeyAction::Redraw
            }
            _ => KeyAction::Ignored,
        }
    }

    /// Keep a reported error for display, only the last [ERROR_HISTORY] are kept.
    pub fn push_error(&mut self, error: Box<str>) {
        self.errors.push(error);
    }

    /// If numerical markers are shown for finished runs.
    pub fn numerical_markers(&self) -> bool {
        self.numerical_markers
    }

    /// If colours are enabled.
    pub fn color(&self) -> bool {
        self.color
    }

    /// Render a full frame of `cols` x `rows` characters.
    pub fn render(&self, collector: &StatsCollector, cols: usize, rows: usize) -> Vec<String> {
        self.render_canvas(collector, cols, rows).to_lines(self.color)
    }

    pub(crate) fn render_canvas(
        &self,
        collector: &StatsCollector,
        cols: usize,
        rows: usize,
    ) -> Canvas {
        let mut canvas = Canvas::new(cols, rows);
        let graph_rows = (2 * rows).div_ceil(3);
        let bottom_rows = rows / 3;
        let stats_cols = (2 * cols).div_ceil(3);
        let usage_cols = cols - stats_cols;

        self.draw_graph_window(&mut canvas, collector, cols, graph_rows);
        draw_window(
            &mut canvas,
            (0, graph_rows),
            (stats_cols, bottom_rows),
            "stats",
            &stats_lines(collector),
        );
        let usage_lines: Vec<String> = USAGE_LINES.iter().map(|s| s.to_string()).collect();
        draw_window(
            &mut canvas,
            (stats_cols, graph_rows),
            (usage_cols, bottom_rows),
            "usage",
            &usage_lines,
        );
        // Errors go below the key bindings, the most recent ones are kept if they don't all fit
        let inner_rows = bottom_rows.saturating_sub(2);
        let error_rows = inner_rows.saturating_sub(USAGE_LINES.len());
        let errors = self.errors.to_vec();
        errors[errors.len().saturating_sub(error_rows)..]
            .iter()
            .enumerate()
            .for_each(|(idx, error)| {
                put_clipped(
                    &mut canvas,
                    (stats_cols + 1, graph_rows + 1 + USAGE_LINES.len() + idx),
                    usage_cols.saturating_sub(2),
                    error,
                    CellStyle::Error,
                );
            });
        canvas
    }

    fn draw_graph_window(
        &self,
        canvas: &mut Canvas,
        collector: &StatsCollector,
        cols: usize,
        graph_rows: usize,
    ) {
        canvas.draw_box(0, 0, cols, graph_rows);
        if graph_rows >= 2 && cols >= 2 && collector.source_opened() {
            let plot = EnergyPlot::new(self.y_range, self.numerical_markers).render(
                collector.convergence(),
                cols - 2,
                graph_rows - 2,
            );
            canvas.blit(1, 1, &plot);
        }
        canvas.put_str(GRAPH_TITLE_COL, 0, GRAPH_TITLE, CellStyle::Title);
        let label_row = Y_LABEL_ROW.min(graph_rows.saturating_sub(Y_LABEL.len() + 1));
        Y_LABEL
            .chars()
            .enumerate()
            .for_each(|(idx, ch)| canvas.put(0, label_row + idx, ch, CellStyle::Title));
    }
}

/// The content of the stats window.
pub(crate) fn stats_lines(collector: &StatsCollector) -> Vec<String> {
    if !collector.source_opened() {
        return vec!["No data yet!".to_string()];
    }
    let convergence = collector.convergence();
    vec![
        format!("N runs = {}", convergence.runs_started()),
        format!(
            "Minimum energy seen = {}",
            stats::format_optional_energy(convergence.min_energy())
        ),
        format!(
            "Final mean = {}",
            stats::format_optional_energy(convergence.final_mean())
        ),
        format!(
            "Final std. deviation = {}",
            stats::format_optional_energy(convergence.final_std())
        ),
    ]
}

/// Draw a bordered window with a title in the top border, and `lines` inside it.
fn draw_window(
    canvas: &mut Canvas,
    (x, y): (usize, usize),
    (width, height): (usize, usize),
    title: &str,
    lines: &[String],
) {
    if width < 2 || height < 2 {
        return;
    }
    canvas.draw_box(x, y, width, height);
    put_clipped(canvas, (x + 2, y), width.saturating_sub(3), title, CellStyle::Title);
    lines
        .iter()
        .take(height - 2)
        .enumerate()
        .for_each(|(idx, line)| {
            put_clipped(canvas, (x + 1, y + 1 + idx), width - 2, line, CellStyle::Plain);
        });
}

/// Put at most `max_len` characters of `text`.
fn put_clipped(
    canvas: &mut Canvas,
    (x, y): (usize, usize),
    max_len: usize,
    text: &str,
    style: CellStyle,
) {
    let clipped: String = text.chars().take(max_len).collect();
    canvas.put_str(x, y, &clipped, style);
}
