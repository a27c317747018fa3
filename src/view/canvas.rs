//! A grid of styled characters that frames are drawn to before they're written to the terminal.

use crate::util::*;
use owo_colors::AnsiColors;

/// Colours used for the markers of each run, run `r` uses `RUN_PALETTE[r % RUN_PALETTE.len()]`.
pub const RUN_PALETTE: [AnsiColors; 12] = [
    AnsiColors::Red,
    AnsiColors::Green,
    AnsiColors::Yellow,
    AnsiColors::Blue,
    AnsiColors::Magenta,
    AnsiColors::Cyan,
    AnsiColors::BrightRed,
    AnsiColors::BrightGreen,
    AnsiColors::BrightYellow,
    AnsiColors::BrightBlue,
    AnsiColors::BrightMagenta,
    AnsiColors::BrightCyan,
];

/// Style of a single cell, only applied when colour is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellStyle {
    /// No styling.
    #[default]
    Plain,
    /// Window titles and labels.
    Title,
    /// Reported errors.
    Error,
    /// A marker of the run with the given index.
    Run(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    style: CellStyle,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: CellStyle::Plain,
        }
    }
}

/// A `width` x `height` grid of styled characters.
///
/// Drawing outside the grid is silently clipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Canvas {
    /// Create a blank canvas.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width * height],
        }
    }

    /// Width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Put a character at column `x` of row `y`.
    pub fn put(&mut self, x: usize, y: usize, ch: char, style: CellStyle) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = Cell { ch, style };
        }
    }

    /// Put a string starting at column `x` of row `y`, anything past the right edge is cut off.
    pub fn put_str(&mut self, x: usize, y: usize, text: &str, style: CellStyle) {
        text.chars()
            .enumerate()
            .for_each(|(offset, ch)| self.put(x + offset, y, ch, style));
    }

    /// Draw a border around the `w` x `h` area with its top left corner at (`x`, `y`).
    pub fn draw_box(&mut self, x: usize, y: usize, w: usize, h: usize) {
        if w < 2 || h < 2 {
            return;
        }
        let (right, bottom) = (x + w - 1, y + h - 1);
        for col in x + 1..right {
            self.put(col, y, '─', CellStyle::Plain);
            self.put(col, bottom, '─', CellStyle::Plain);
        }
        for row in y + 1..bottom {
            self.put(x, row, '│', CellStyle::Plain);
            self.put(right, row, '│', CellStyle::Plain);
        }
        self.put(x, y, '┌', CellStyle::Plain);
        self.put(right, y, '┐', CellStyle::Plain);
        self.put(x, bottom, '└', CellStyle::Plain);
        self.put(right, bottom, '┘', CellStyle::Plain);
    }

    /// Copy all of `other` onto this canvas with its top left corner at (`x`, `y`).
    pub fn blit(&mut self, x: usize, y: usize, other: &Canvas) {
        for (row_idx, row) in other.cells.chunks(other.width.max(1)).enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                self.put(x + col_idx, y + row_idx, cell.ch, cell.style);
            }
        }
    }

    /// The character at column `x` of row `y`.
    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x].ch)
    }

    /// The style at column `x` of row `y`.
    pub fn style_at(&self, x: usize, y: usize) -> Option<CellStyle> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x].style)
    }

    /// Render every row to a string of exactly `width` characters, styled with ANSI escapes if `color` is set.
    pub fn to_lines(&self, color: bool) -> Vec<String> {
        if self.width == 0 {
            return vec![String::new(); self.height];
        }
        self.cells
            .chunks(self.width)
            .map(|row| {
                if !color {
                    return row.iter().map(|cell| cell.ch).collect();
                }
                let mut line = String::with_capacity(self.width);
                for (style, group) in &row.iter().group_by(|cell| cell.style) {
                    let text: String = group.map(|cell| cell.ch).collect();
                    let styled = match style {
                        CellStyle::Plain => text,
                        CellStyle::Title => text.bold().to_string(),
                        CellStyle::Error => text.red().to_string(),
                        CellStyle::Run(run) => text
                            .color(RUN_PALETTE[run % RUN_PALETTE.len()])
                            .to_string(),
                    };
                    line.push_str(&styled);
                }
                line
            })
            .collect()
    }
}
