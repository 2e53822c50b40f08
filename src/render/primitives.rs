//! Primitive rendering functions.
//!
//! Implements rasterization algorithms for lines and filled polygons.

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;
use crate::geometry::Point;

// ============================================================================
// Line Drawing
// ============================================================================

/// Draw an anti-aliased line between two points using Wu's algorithm.
///
/// # References
///
/// Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.
pub fn draw_line_aa(fb: &mut Framebuffer, from: Point, to: Point, color: Rgba) {
    let (mut x0, mut y0, mut x1, mut y1) = (from.x, from.y, to.x, to.y);
    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    if steep {
        std::mem::swap(&mut x0, &mut y0);
        std::mem::swap(&mut x1, &mut y1);
    }
    if x0 > x1 {
        std::mem::swap(&mut x0, &mut x1);
        std::mem::swap(&mut y0, &mut y1);
    }

    let dx = x1 - x0;
    let gradient = if dx.abs() < f32::EPSILON { 1.0 } else { (y1 - y0) / dx };

    // Plot with axes swapped back for steep lines.
    let mut put = |major: i32, minor: i32, coverage: f32| {
        if steep {
            plot(fb, minor, major, color, coverage);
        } else {
            plot(fb, major, minor, color, coverage);
        }
    };

    let xend = x0.round();
    let yend = y0 + gradient * (xend - x0);
    let xgap = rfpart(x0 + 0.5);
    let xpxl1 = xend as i32;
    put(xpxl1, yend.floor() as i32, rfpart(yend) * xgap);
    put(xpxl1, yend.floor() as i32 + 1, fpart(yend) * xgap);
    let mut intery = yend + gradient;

    let xend = x1.round();
    let yend = y1 + gradient * (xend - x1);
    let xgap = fpart(x1 + 0.5);
    let xpxl2 = xend as i32;
    put(xpxl2, yend.floor() as i32, rfpart(yend) * xgap);
    put(xpxl2, yend.floor() as i32 + 1, fpart(yend) * xgap);

    for x in (xpxl1 + 1)..xpxl2 {
        let ipart = intery.floor() as i32;
        put(x, ipart, rfpart(intery));
        put(x, ipart + 1, fpart(intery));
        intery += gradient;
    }
}

#[inline]
fn plot(fb: &mut Framebuffer, x: i32, y: i32, color: Rgba, coverage: f32) {
    if x >= 0 && y >= 0 {
        let alpha = (f32::from(color.a) * coverage.clamp(0.0, 1.0)) as u8;
        fb.blend_pixel(x as u32, y as u32, color.with_alpha(alpha));
    }
}

#[inline]
fn fpart(x: f32) -> f32 {
    x - x.floor()
}

#[inline]
fn rfpart(x: f32) -> f32 {
    1.0 - fpart(x)
}

// ============================================================================
// Polygon Filling
// ============================================================================

/// Fill a triangle, sampling at pixel centers.
///
/// A pixel is covered when its center `(x + 0.5, y + 0.5)` lies inside the
/// triangle (left and top edges inclusive); pixels outside the framebuffer
/// are skipped.
pub fn fill_triangle(fb: &mut Framebuffer, a: Point, b: Point, c: Point, color: Rgba) {
    let pts = [a, b, c];
    if pts.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return;
    }

    let min_y = a.y.min(b.y).min(c.y);
    let max_y = a.y.max(b.y).max(c.y);
    let y_start = ((min_y - 0.5).ceil().max(0.0)) as i64;
    let y_end = ((max_y - 0.5).floor()).min(fb.height() as f32 - 1.0) as i64;

    for y in y_start..=y_end {
        let yc = y as f32 + 0.5;
        let mut lo = f32::INFINITY;
        let mut hi = f32::NEG_INFINITY;

        for i in 0..3 {
            let p = pts[i];
            let q = pts[(i + 1) % 3];
            let crosses = (p.y <= yc && yc < q.y) || (q.y <= yc && yc < p.y);
            if crosses {
                let t = (yc - p.y) / (q.y - p.y);
                let x = p.x + t * (q.x - p.x);
                lo = lo.min(x);
                hi = hi.max(x);
            }
        }

        if lo > hi {
            continue;
        }
        // Half-open [lo, hi) so shared edges are not filled twice.
        let x0 = (lo - 0.5).ceil().max(0.0);
        let x1 = (hi - 0.5).ceil();
        if x1 > x0 {
            fb.fill_span(y as u32, x0 as u32, x1.min(fb.width() as f32) as u32, color);
        }
    }
}

/// Fill a polygon by fanning triangles out from its first vertex.
///
/// Exact for convex polygons; projected surface quads are split this way.
pub fn fill_polygon(fb: &mut Framebuffer, points: &[Point], color: Rgba) {
    if points.len() < 3 {
        return;
    }
    for i in 1..points.len() - 1 {
        fill_triangle(fb, points[0], points[i], points[i + 1], color);
    }
}

// ============================================================================
// Tests
// ============================================================================
