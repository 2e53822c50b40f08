//! Terminal output encoder (ASCII / ANSI half-blocks).
//!
//! Downsamples a framebuffer onto a grid of character cells by averaging
//! the pixels each cell covers.
//! - ASCII: mean cell luminance on a ten-step ramp ` .:-=+*#%@`, for
//!   terminals without color
//! - Half-block: `▀` with 24-bit foreground/background, two pixels per cell

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;
use std::fmt::Write as FmtWrite;

/// Terminal rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminalMode {
    /// ASCII grayscale characters (widest compatibility)
    Ascii,
    /// Unicode half-block characters with 24-bit color (2x vertical resolution)
    #[default]
    HalfBlock,
}

/// Terminal encoder configuration.
#[derive(Debug, Clone, Default)]
pub struct TerminalEncoder {
    mode: TerminalMode,
    columns: Option<u16>,
    lines: Option<u16>,
}

impl TerminalEncoder {
    /// ASCII grayscale ramp from dark to light (10 levels).
    const ASCII_RAMP: &'static [char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

    /// Monospace cells are roughly twice as tall as wide.
    const CELL_ASPECT: f32 = 2.0;

    /// Create a new terminal encoder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rendering mode.
    #[must_use]
    pub fn mode(mut self, mode: TerminalMode) -> Self {
        self.mode = mode;
        self
    }

    /// Fix the output to exactly `columns` x `lines` cells.
    #[must_use]
    pub fn size(mut self, columns: u16, lines: u16) -> Self {
        self.columns = Some(columns.max(1));
        self.lines = Some(lines.max(1));
        self
    }

    /// Largest cell grid that fits in `columns` x `lines` and keeps the
    /// framebuffer's aspect ratio.
    #[must_use]
    pub fn fit(mut self, fb: &Framebuffer, columns: u16, lines: u16) -> Self {
        let aspect = fb.width() as f32 / fb.height() as f32;
        let columns = f32::from(columns.max(1));
        let lines = f32::from(lines.max(1));

        let mut w = columns;
        let mut h = w / aspect / Self::CELL_ASPECT;
        if h > lines {
            h = lines;
            w = h * aspect * Self::CELL_ASPECT;
        }
        self.columns = Some(w.round().clamp(1.0, columns) as u16);
        self.lines = Some(h.round().clamp(1.0, lines) as u16);
        self
    }

    /// Render a framebuffer to a string, one `\n`-terminated line per row.
    #[must_use]
    pub fn render(&self, fb: &Framebuffer) -> String {
        let mut out = String::new();
        for line in self.render_lines(fb) {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    /// Render a framebuffer to one string per terminal line.
    #[must_use]
    pub fn render_lines(&self, fb: &Framebuffer) -> Vec<String> {
        let (columns, lines) = self.dimensions(fb);
        match self.mode {
            TerminalMode::Ascii => Self::ascii_lines(fb, columns, lines),
            TerminalMode::HalfBlock => Self::half_block_lines(fb, columns, lines),
        }
    }

    /// Output size in cells.
    #[must_use]
    pub fn dimensions(&self, fb: &Framebuffer) -> (u32, u32) {
        let aspect = fb.width() as f32 / fb.height() as f32;
        match (self.columns, self.lines) {
            (Some(w), Some(h)) => (u32::from(w), u32::from(h)),
            (Some(w), None) => {
                let h = (f32::from(w) / aspect / Self::CELL_ASPECT).round() as u32;
                (u32::from(w), h.max(1))
            }
            (None, Some(h)) => {
                let w = (f32::from(h) * aspect * Self::CELL_ASPECT).round() as u32;
                (w.max(1), u32::from(h))
            }
            (None, None) => {
                let w = 80u32.min(fb.width());
                let h = (w as f32 / aspect / Self::CELL_ASPECT).round() as u32;
                (w, h.max(1))
            }
        }
    }

    fn ascii_lines(fb: &Framebuffer, columns: u32, lines: u32) -> Vec<String> {
        (0..lines)
            .map(|y| {
                (0..columns)
                    .map(|x| {
                        let (x0, y0, x1, y1) = cell_bounds(fb, x, y, columns, lines);
                        let luma = fb.mean_luminance(x0, y0, x1, y1);
                        Self::ASCII_RAMP[luma_index(luma, Self::ASCII_RAMP.len())]
                    })
                    .collect()
            })
            .collect()
    }

    fn half_block_lines(fb: &Framebuffer, columns: u32, lines: u32) -> Vec<String> {
        let rows = lines * 2;
        (0..lines)
            .map(|y| {
                let mut line = String::with_capacity(columns as usize * 8);
                let mut last: Option<(Rgba, Rgba)> = None;
                for x in 0..columns {
                    let top = average(fb, x, y * 2, columns, rows);
                    let bottom = average(fb, x, y * 2 + 1, columns, rows);
                    // Only emit escapes when the cell colors change.
                    if last != Some((top, bottom)) {
                        let _ = write!(
                            line,
                            "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m",
                            top.r, top.g, top.b, bottom.r, bottom.g, bottom.b
                        );
                        last = Some((top, bottom));
                    }
                    line.push('▀');
                }
                line.push_str("\x1b[0m");
                line
            })
            .collect()
    }
}

/// Pixel bounds `(x0, y0, x1, y1)`, end-exclusive, of cell `(cx, cy)` in a
/// `cols` x `rows` grid laid over the framebuffer. Every cell covers at
/// least one pixel column and row.
fn cell_bounds(fb: &Framebuffer, cx: u32, cy: u32, cols: u32, rows: u32) -> (u32, u32, u32, u32) {
    let x0 = (u64::from(cx) * u64::from(fb.width()) / u64::from(cols)) as u32;
    let x1 = ((u64::from(cx + 1) * u64::from(fb.width()) / u64::from(cols)) as u32).max(x0 + 1);
    let y0 = (u64::from(cy) * u64::from(fb.height()) / u64::from(rows)) as u32;
    let y1 = ((u64::from(cy + 1) * u64::from(fb.height()) / u64::from(rows)) as u32).max(y0 + 1);
    (x0, y0, x1, y1)
}

/// Mean color of the pixels covered by cell `(cx, cy)`.
fn average(fb: &Framebuffer, cx: u32, cy: u32, cols: u32, rows: u32) -> Rgba {
    let (x0, y0, x1, y1) = cell_bounds(fb, cx, cy, cols, rows);

    let mut sum = [0u64; 3];
    let mut n = 0u64;
    for y in y0..y1.min(fb.height()) {
        for x in x0..x1.min(fb.width()) {
            if let Some(p) = fb.get_pixel(x, y) {
                sum[0] += u64::from(p.r);
                sum[1] += u64::from(p.g);
                sum[2] += u64::from(p.b);
                n += 1;
            }
        }
    }
    if n == 0 {
        return Rgba::BLACK;
    }
    Rgba::rgb((sum[0] / n) as u8, (sum[1] / n) as u8, (sum[2] / n) as u8)
}

/// Luminance (0-255) mapped onto a ramp of `steps` characters.
fn luma_index(luma: f32, steps: usize) -> usize {
    ((luma / 255.0 * (steps - 1) as f32).round().max(0.0) as usize).min(steps - 1)
}
