//! Scale functions for data-to-visual mappings.
//!
//! Scales transform data values to visual properties (position, color).
//! Based on the Grammar of Graphics [Wilkinson 2005]. Tick generation uses
//! the 1-2-5 "nice number" progression.

use crate::color::Rgba;
use crate::error::{Error, Result};

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);

    /// Get the range extent.
    fn range(&self) -> (R, R);
}

/// Position of `value` between `lo` and `hi`, as a fraction of the span.
///
/// Works in f64 so spreads far below f32 precision still separate, and
/// halves both ends first when the span itself overflows. An empty span
/// (`lo == hi`) maps everything to 0.5.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn unit_interval(value: f64, lo: f64, hi: f64) -> f64 {
    if lo == hi {
        return 0.5;
    }
    let span = hi - lo;
    if span.is_finite() {
        (value - lo) / span
    } else {
        (value / 2.0 - lo / 2.0) / (hi / 2.0 - lo / 2.0)
    }
}

/// Linear scale for continuous-to-continuous mapping.
///
/// A degenerate domain (min == max) maps every value to the middle of the
/// range, so flat surfaces and single-column grids still have a position.
#[derive(Debug, Clone, Copy)]
pub struct LinearScale {
    domain_min: f64,
    domain_max: f64,
    range_min: f64,
    range_max: f64,
}

impl LinearScale {
    /// Create a new linear scale.
    #[must_use]
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain_min: domain.0, domain_max: domain.1, range_min: range.0, range_max: range.1 }
    }
}

impl Scale<f64, f64> for LinearScale {
    fn scale(&self, value: f64) -> f64 {
        let t = unit_interval(value, self.domain_min, self.domain_max);
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }
}

/// Color scale for mapping values to colors.
///
/// The domain is kept as given. A flat domain puts every value on the
/// middle color.
#[derive(Debug, Clone)]
pub struct ColorScale {
    colors: Vec<Rgba>,
    domain_min: f64,
    domain_max: f64,
}

/// Plasma stops, evenly spaced from low to high.
const PLASMA: [&str; 10] = [
    "#0d0887", "#46039f", "#7201a8", "#9c179e", "#bd3786", "#d8576b", "#ed7953", "#fb9f3a",
    "#fdca26", "#f0f921",
];

impl ColorScale {
    /// Create a new color scale.
    ///
    /// # Errors
    ///
    /// Returns an error if colors is empty or the domain is not finite.
    pub fn new(colors: Vec<Rgba>, domain: (f64, f64)) -> Result<Self> {
        if colors.is_empty() {
            return Err(Error::InvalidConfig("color scale requires at least one color".into()));
        }
        if !domain.0.is_finite() || !domain.1.is_finite() {
            return Err(Error::InvalidConfig(format!("color domain {domain:?} is not finite")));
        }

        Ok(Self { colors, domain_min: domain.0, domain_max: domain.1 })
    }

    /// Plasma color scale, the default for surfaces.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain is not finite.
    pub fn plasma(domain: (f64, f64)) -> Result<Self> {
        let colors = PLASMA.iter().filter_map(|hex| Rgba::from_hex(hex)).collect();
        Self::new(colors, domain)
    }

    /// Viridis color scale (perceptually uniform).
    ///
    /// # Errors
    ///
    /// Returns an error if the domain is not finite.
    pub fn viridis(domain: (f64, f64)) -> Result<Self> {
        Self::new(
            vec![
                Rgba::rgb(68, 1, 84),
                Rgba::rgb(59, 82, 139),
                Rgba::rgb(33, 145, 140),
                Rgba::rgb(94, 201, 98),
                Rgba::rgb(253, 231, 37),
            ],
            domain,
        )
    }

    /// Greyscale color scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain is not finite.
    pub fn greyscale(domain: (f64, f64)) -> Result<Self> {
        Self::new(vec![Rgba::BLACK, Rgba::WHITE], domain)
    }

    /// Number of color stops.
    #[must_use]
    pub fn stop_count(&self) -> usize {
        self.colors.len()
    }

    /// Where `value` falls along the scale, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn position(&self, value: f64) -> f32 {
        unit_interval(value, self.domain_min, self.domain_max).clamp(0.0, 1.0) as f32
    }

    /// Color at fraction `t` of the way from the first stop to the last.
    #[must_use]
    pub fn at(&self, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        if self.colors.len() == 1 {
            return self.colors[0];
        }

        let segment_count = self.colors.len() - 1;
        let segment = ((t * segment_count as f32).floor() as usize).min(segment_count - 1);
        let local_t = t * segment_count as f32 - segment as f32;

        self.colors[segment].lerp(self.colors[segment + 1], local_t)
    }
}

impl Scale<f64, Rgba> for ColorScale {
    fn scale(&self, value: f64) -> Rgba {
        self.at(self.position(value))
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (Rgba, Rgba) {
        (*self.colors.first().unwrap_or(&Rgba::BLACK), *self.colors.last().unwrap_or(&Rgba::WHITE))
    }
}

/// Largest tick index that still converts to `i64` and back exactly.
const MAX_TICK_INDEX: f64 = 9.0e15;

/// Axis tick positions with the step that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticks {
    /// Tick values in ascending order, all within the requested extent.
    pub values: Vec<f64>,
    /// Distance between consecutive ticks.
    pub step: f64,
}

impl Ticks {
    /// About `target` ticks on a 1-2-5 step covering `[min, max]`.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn nice(min: f64, max: f64, target: usize) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        if !min.is_finite() || !max.is_finite() {
            return Self { values: Vec::new(), step: 1.0 };
        }
        if max == min {
            return Self { values: vec![min], step: 1.0 };
        }

        let step = nice_step((max - min) / target.max(1) as f64);
        Self::stepped(min, max, step)
    }

    /// Like [`Ticks::nice`] but never steps below 1, for index axes.
    #[must_use]
    pub fn integers(min: f64, max: f64, target: usize) -> Self {
        let ticks = Self::nice(min, max, target);
        if ticks.step >= 1.0 || ticks.values.len() <= 1 {
            return ticks;
        }
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        Self::stepped(lo, hi, 1.0)
    }

    fn stepped(min: f64, max: f64, step: f64) -> Self {
        let first = (min / step).ceil();
        let last = (max / step + 1e-9).floor();
        // Steps the index range cannot count exactly fall back to the ends.
        if !(first.abs() <= MAX_TICK_INDEX && last.abs() <= MAX_TICK_INDEX) {
            return Self { values: vec![min, max], step: max - min };
        }
        let values = (first as i64..=last as i64)
            .map(|k| {
                let v = k as f64 * step;
                // Avoid "-0" labels.
                if v == 0.0 {
                    0.0
                } else {
                    v
                }
            })
            .collect();
        Self { values, step }
    }

    /// Format a tick value with just enough decimals for this step.
    #[must_use]
    pub fn label(&self, value: f64) -> String {
        format_tick(value, self.step)
    }
}

/// Tick values for `[min, max]` on a 1-2-5 step, about `target` of them.
#[must_use]
pub fn nice_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    Ticks::nice(min, max, target).values
}

/// Round a raw step up to the next 1, 2 or 5 times a power of ten.
#[must_use]
pub fn nice_step(raw: f64) -> f64 {
    if raw <= 0.0 || !raw.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let norm = raw / magnitude;
    // Tolerance absorbs powf/log10 round-off on exact 1-2-5 steps.
    let nice = if norm <= 1.0 + 1e-9 {
        1.0
    } else if norm <= 2.0 + 1e-9 {
        2.0
    } else if norm <= 5.0 + 1e-9 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Format `value` with the decimals implied by `step`.
#[must_use]
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 || step <= 0.0 {
        0
    } else {
        (-step.log10().floor()).max(0.0) as usize
    };
    format!("{value:.decimals$}")
}
